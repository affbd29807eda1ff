//! Tokenizer shared by the fit and query phases.

/// Lowercases, splits on every non-alphanumeric character and drops short tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokenizer {
    min_token_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self { min_token_len: 1 }
    }
}

impl Tokenizer {
    pub fn new(min_token_len: usize) -> Self {
        Self {
            min_token_len: min_token_len.max(1),
        }
    }

    pub fn min_token_len(&self) -> usize {
        self.min_token_len
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.chars().count() >= self.min_token_len)
            .map(str::to_string)
            .collect()
    }
}
