//! Preset quick-question buttons. Each one is just a canned query string.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub id: String,
    pub label: String,
    pub query: String,
}

impl QuickAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            query: query.into(),
        }
    }
}

/// Ordered set of quick actions (display order = button order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickActions {
    actions: Vec<QuickAction>,
}

impl Default for QuickActions {
    fn default() -> Self {
        Self::defaults()
    }
}

impl QuickActions {
    pub fn new(actions: Vec<QuickAction>) -> Self {
        Self { actions }
    }

    /// The six reference buttons, two rows of three.
    pub fn defaults() -> Self {
        Self::new(vec![
            QuickAction::new("admissions", "📝 Admissions", "admission process"),
            QuickAction::new("fees", "💰 Fees", "fee structure"),
            QuickAction::new("hostel", "🏫 Hostel", "hostel facilities"),
            QuickAction::new("courses", "📚 Courses", "courses available"),
            QuickAction::new("placements", "💼 Placements", "placement record"),
            QuickAction::new("scholarships", "🎓 Scholarships", "scholarships available"),
        ])
    }

    /// Case-insensitive lookup by id.
    pub fn find(&self, id: &str) -> Option<&QuickAction> {
        let id = id.trim();
        self.actions.iter().find(|a| a.id.eq_ignore_ascii_case(id))
    }

    pub fn all(&self) -> &[QuickAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
