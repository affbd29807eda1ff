//! Similarity matcher: TF-IDF fit over the knowledge-base questions, cosine scoring, thresholded answer.

mod tfidf;
mod tokenize;

pub use tfidf::{cosine_similarity, TfidfModel};
pub use tokenize::Tokenizer;

use crate::knowledge::{FaqEntry, KnowledgeBase};
use crate::shared::{MatchSettings, SettingsError};

/// Result of matching one query.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome<'a> {
    /// Best score strictly exceeded the threshold.
    Matched {
        index: usize,
        score: f64,
        entry: &'a FaqEntry,
    },
    /// No confident match (includes empty input and an empty knowledge base).
    Fallback { best_score: f64, response: &'a str },
}

impl<'a> MatchOutcome<'a> {
    /// The text to show the user.
    pub fn response(&self) -> &'a str {
        match self {
            Self::Matched { entry, .. } => entry.answer.as_str(),
            Self::Fallback { response, .. } => response,
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            Self::Matched { score, .. } => *score,
            Self::Fallback { best_score, .. } => *best_score,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// Canonical question of the matched entry.
    pub fn question(&self) -> Option<&'a str> {
        match self {
            Self::Matched { entry, .. } => Some(entry.question.as_str()),
            Self::Fallback { .. } => None,
        }
    }
}

/// Knowledge base plus its fitted model. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct FaqMatcher {
    knowledge: KnowledgeBase,
    model: TfidfModel,
    settings: MatchSettings,
}

impl FaqMatcher {
    pub fn new(knowledge: KnowledgeBase, settings: MatchSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let model = TfidfModel::fit(&knowledge.questions(), Tokenizer::new(settings.min_token_len));
        if knowledge.is_empty() {
            tracing::warn!(
                target: "faq::matcher",
                "Knowledge base is empty; every query will get the fallback response"
            );
        }
        tracing::info!(
            target: "faq::matcher",
            entries = knowledge.len(),
            vocabulary = model.vocabulary_len(),
            threshold = settings.threshold,
            "FAQ matcher ready"
        );
        Ok(Self {
            knowledge,
            model,
            settings,
        })
    }

    /// Matches `query` against the knowledge base. Never fails.
    pub fn answer(&self, query: &str) -> MatchOutcome<'_> {
        let fallback = |best_score: f64| MatchOutcome::Fallback {
            best_score,
            response: self.settings.fallback_response.as_str(),
        };
        let Some((index, score)) = self.model.query(query) else {
            return fallback(0.0);
        };
        match self.knowledge.get(index) {
            Some(entry) if score > self.settings.threshold => MatchOutcome::Matched { index, score, entry },
            _ => fallback(score),
        }
    }

    /// Answer text for `query` (knowledge-base answer or the fallback).
    pub fn respond(&self, query: &str) -> &str {
        self.answer(query).response()
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn model(&self) -> &TfidfModel {
        &self.model
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn threshold(&self) -> f64 {
        self.settings.threshold
    }

    pub fn fallback_response(&self) -> &str {
        &self.settings.fallback_response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::DEFAULT_FALLBACK_RESPONSE;

    fn builtin() -> FaqMatcher {
        FaqMatcher::new(KnowledgeBase::builtin(), MatchSettings::default()).unwrap()
    }

    #[test]
    fn every_question_matches_its_own_answer() {
        let matcher = builtin();
        for entry in matcher.knowledge().iter() {
            let outcome = matcher.answer(&entry.question);
            assert!(outcome.is_match(), "{:?}", entry.question);
            assert_eq!(outcome.response(), entry.answer);
            assert!((outcome.score() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn fee_structure_question_returns_fee_answer() {
        let matcher = builtin();
        assert_eq!(
            matcher.respond("what is the fee structure"),
            "The fee varies depending on the course. Please check the official website fee section for detailed information."
        );
    }

    #[test]
    fn partial_overlap_finds_hostel_facilities() {
        let matcher = builtin();
        let outcome = matcher.answer("tell me about hostel life");
        assert_eq!(outcome.question(), Some("what are the hostel facilities"));
        assert!(outcome.response().starts_with("Hostels are available"));
        assert!(outcome.score() > 0.2 && outcome.score() < 1.0);
    }

    #[test]
    fn gibberish_gets_fallback() {
        let matcher = builtin();
        let outcome = matcher.answer("asdkjasdkj random gibberish");
        assert!(!outcome.is_match());
        assert_eq!(outcome.score(), 0.0);
        assert_eq!(outcome.response(), DEFAULT_FALLBACK_RESPONSE);
    }

    #[test]
    fn empty_and_symbol_only_queries_get_fallback() {
        let matcher = builtin();
        for query in ["", "   ", "?!", "🎓💰"] {
            assert_eq!(matcher.respond(query), DEFAULT_FALLBACK_RESPONSE, "{:?}", query);
        }
    }

    #[test]
    fn short_preset_phrase_matches_like_typed_text() {
        let matcher = builtin();
        let outcome = matcher.answer("fee structure");
        assert_eq!(outcome.question(), Some("what is the fee structure"));
        assert_eq!(outcome.response(), matcher.respond("what is the fee structure"));
    }

    #[test]
    fn score_equal_to_threshold_falls_back() {
        let base = builtin();
        let score = base.answer("tell me about hostel life").score();
        let strict = FaqMatcher::new(
            KnowledgeBase::builtin(),
            MatchSettings::default().with_threshold(score),
        )
        .unwrap();
        let outcome = strict.answer("tell me about hostel life");
        assert!(!outcome.is_match());
        assert_eq!(outcome.score(), score);
    }

    #[test]
    fn matching_is_deterministic() {
        let matcher = builtin();
        let first = matcher.answer("how do i apply for a scholarship");
        for _ in 0..10 {
            assert_eq!(matcher.answer("how do i apply for a scholarship"), first);
        }
    }

    #[test]
    fn empty_knowledge_base_always_falls_back() {
        let matcher = FaqMatcher::new(
            KnowledgeBase::new(Vec::new()).unwrap(),
            MatchSettings::default().with_fallback("no idea"),
        )
        .unwrap();
        assert_eq!(matcher.respond("what is the fee structure"), "no idea");
        assert_eq!(matcher.answer("").score(), 0.0);
    }

    #[test]
    fn synthetic_corpus_uses_configured_fallback() {
        let kb = KnowledgeBase::new(vec![
            FaqEntry::new("reset my password", "Use the self-service portal."),
            FaqEntry::new("printer is jammed", "Call facilities."),
        ])
        .unwrap();
        let matcher = FaqMatcher::new(kb, MatchSettings::default().with_fallback("Ask IT.")).unwrap();
        assert_eq!(matcher.respond("Password reset please"), "Use the self-service portal.");
        assert_eq!(matcher.respond("coffee machine"), "Ask IT.");
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let err = FaqMatcher::new(KnowledgeBase::builtin(), MatchSettings::default().with_threshold(2.0)).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
    }
}
