//! In-memory knowledge base: ordered, immutable question → answer table.

use super::bootstrap::BUILTIN_FAQS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("failed to read knowledge file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("knowledge file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported knowledge file layout: {0}")]
    Layout(String),
    #[error("entry {index} has a blank question")]
    BlankQuestion { index: usize },
    #[error("duplicate question: {0:?}")]
    DuplicateQuestion(String),
}

/// One canonical question and its fixed answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Ordered FAQ table. Questions are unique; order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<FaqEntry>,
}

impl KnowledgeBase {
    /// Builds a knowledge base, rejecting blank or duplicate questions. An empty list is allowed.
    pub fn new(entries: Vec<FaqEntry>) -> Result<Self, KnowledgeError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let question = entry.question.trim();
            if question.is_empty() {
                return Err(KnowledgeError::BlankQuestion { index });
            }
            if !seen.insert(question) {
                return Err(KnowledgeError::DuplicateQuestion(question.to_string()));
            }
        }
        Ok(Self { entries })
    }

    /// The reference university table.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_FAQS
                .iter()
                .map(|(q, a)| FaqEntry::new(*q, *a))
                .collect(),
        }
    }

    /// Loads a JSON knowledge file.
    ///
    /// Two layouts are accepted:
    /// - an array of `{ "question": ..., "answer": ... }` objects
    /// - an object mapping question → answer (key order is kept)
    pub fn load_json_path<P: AsRef<Path>>(path: P) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = Self::from_json_str(&raw)?;
        tracing::debug!(
            target: "faq::knowledge",
            path = %path.display(),
            entries = kb.len(),
            "Knowledge file loaded"
        );
        Ok(kb)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, KnowledgeError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let entries = match value {
            serde_json::Value::Array(_) => serde_json::from_value::<Vec<FaqEntry>>(value)?,
            // Re-read the raw text: the parsed map has already collapsed duplicate keys.
            serde_json::Value::Object(_) => serde_json::from_str::<QuestionMap>(raw)?
                .0
                .into_iter()
                .map(|(question, answer)| match answer {
                    serde_json::Value::String(answer) => Ok(FaqEntry { question, answer }),
                    other => Err(KnowledgeError::Layout(format!(
                        "answer for {:?} must be a string, found {}",
                        question, other
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            other => {
                return Err(KnowledgeError::Layout(format!(
                    "expected an array or object at the top level, found {}",
                    other
                )))
            }
        };
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FaqEntry> {
        self.entries.get(index)
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.answer.as_str())
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &FaqEntry> {
        self.entries.iter()
    }

    /// Questions in corpus order (the fit input for the matcher).
    pub fn questions(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.question.as_str()).collect()
    }

    /// Questions with the first letter capitalized, for topic listings.
    pub fn topics(&self) -> Vec<String> {
        self.entries.iter().map(|e| capitalize(&e.question)).collect()
    }
}

/// Object-layout pairs in document order, duplicates included.
struct QuestionMap(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for QuestionMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairsVisitor;

        impl<'de> serde::de::Visitor<'de> for PairsVisitor {
            type Value = QuestionMap;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an object mapping question to answer")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(self, mut map: A) -> Result<QuestionMap, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(pair) = map.next_entry::<String, serde_json::Value>()? {
                    pairs.push(pair);
                }
                Ok(QuestionMap(pairs))
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
