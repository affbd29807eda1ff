//! Static FAQ knowledge base.
//!
//! An ordered table of canonical question → answer. It is loaded once at startup
//! (built-in table or a JSON file) and never mutated afterwards. The matcher only
//! needs two things from it: enumeration of the questions and lookup by position.

mod bootstrap;
mod store;

pub use bootstrap::TOPIC_HIGHLIGHTS;
pub use store::{FaqEntry, KnowledgeBase, KnowledgeError};
