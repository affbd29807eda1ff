//! TF-IDF vector space over the knowledge-base questions.
//!
//! Fit once (vocabulary, smoothed IDF, L2-normalized rows), then project each
//! incoming query into the same space and score it against every row.

use super::tokenize::Tokenizer;
use std::collections::BTreeMap;

/// Fitted vector space. Immutable after [`TfidfModel::fit`].
#[derive(Debug, Clone)]
pub struct TfidfModel {
    tokenizer: Tokenizer,
    /// term -> column index; sorted so column order is deterministic.
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    rows: Vec<Vec<f64>>,
}

impl TfidfModel {
    /// Fit phase: builds vocabulary, IDF weights and the normalized corpus matrix.
    ///
    /// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, so a term present in every
    /// question still keeps a weight of 1.
    pub fn fit<S: AsRef<str>>(questions: &[S], tokenizer: Tokenizer) -> Self {
        let docs: Vec<Vec<String>> = questions
            .iter()
            .map(|q| tokenizer.tokenize(q.as_ref()))
            .collect();

        let mut vocabulary: BTreeMap<String, usize> = docs
            .iter()
            .flatten()
            .map(|term| (term.clone(), 0))
            .collect();
        for (column, slot) in vocabulary.values_mut().enumerate() {
            *slot = column;
        }

        let mut df = vec![0usize; vocabulary.len()];
        for doc in &docs {
            let mut seen = vec![false; vocabulary.len()];
            for term in doc {
                let column = vocabulary[term];
                if !seen[column] {
                    seen[column] = true;
                    df[column] += 1;
                }
            }
        }

        let n = docs.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let mut model = Self {
            tokenizer,
            vocabulary,
            idf,
            rows: Vec::with_capacity(docs.len()),
        };
        let rows: Vec<Vec<f64>> = docs.iter().map(|doc| model.weigh(doc)).collect();
        model.rows = rows;

        tracing::debug!(
            target: "faq::matcher",
            rows = model.rows.len(),
            vocabulary = model.vocabulary.len(),
            "TF-IDF model fitted"
        );
        model
    }

    /// Projects `text` into the fitted space. Out-of-vocabulary terms are dropped;
    /// a query with no known terms stays the zero vector.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        self.weigh(&self.tokenizer.tokenize(text))
    }

    /// Query phase: best row and its cosine score, first row wins ties.
    /// `None` when the corpus has no rows.
    pub fn query(&self, text: &str) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, score) in self.scores(text).into_iter().enumerate() {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((index, score)),
            }
        }
        best
    }

    /// Cosine similarity of `text` against every row, in corpus order. Each score is in `[0, 1]`.
    pub fn scores(&self, text: &str) -> Vec<f64> {
        let query = self.transform(text);
        self.rows
            .iter()
            .map(|row| cosine_similarity(&query, row).clamp(0.0, 1.0))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&column| self.idf[column])
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    fn weigh(&self, terms: &[String]) -> Vec<f64> {
        let mut vector = vec![0.0; self.vocabulary.len()];
        for term in terms {
            if let Some(&column) = self.vocabulary.get(term) {
                vector[column] += 1.0;
            }
        }
        for (weight, idf) in vector.iter_mut().zip(&self.idf) {
            *weight *= idf;
        }
        l2_normalize(&mut vector);
        vector
    }
}

fn magnitude(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Scales `v` to unit length in place. The zero vector is left untouched.
fn l2_normalize(v: &mut [f64]) {
    let norm = magnitude(v);
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

/// `dot(a, b) / (|a| * |b|)`, or 0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let (norm_a, norm_b) = (magnitude(a), magnitude(b));
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (norm_a * norm_b)
}
