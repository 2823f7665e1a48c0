//! Typed confirmation gate for lifecycle actions.

use serde::{Deserialize, Serialize};

/// The three record lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// Active → Hidden (soft delete).
    Hide,
    /// Hidden → Active.
    Restore,
    /// Hidden → Destroyed. Irreversible.
    PermanentDelete,
}

impl LifecycleAction {
    /// The literal the user must type to arm the confirm button.
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::Hide => "HIDE",
            Self::Restore => "RESTORE",
            Self::PermanentDelete => "DELETE",
        }
    }

    /// Whether a record with the given hidden flag may take this transition.
    pub const fn allowed_from(self, is_hidden: bool) -> bool {
        match self {
            Self::Hide => !is_hidden,
            Self::Restore | Self::PermanentDelete => is_hidden,
        }
    }
}

/// Anti-accident gate: the confirm action is enabled only while the typed
/// text equals the action's phrase exactly (case-sensitive, no trimming).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationGate {
    action: LifecycleAction,
    typed: String,
}

impl ConfirmationGate {
    pub fn new(action: LifecycleAction) -> Self {
        Self {
            action,
            typed: String::new(),
        }
    }

    pub fn action(&self) -> LifecycleAction {
        self.action
    }

    pub fn expected(&self) -> &'static str {
        self.action.phrase()
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn type_text(&mut self, text: impl Into<String>) {
        self.typed = text.into();
    }

    pub fn is_armed(&self) -> bool {
        self.typed == self.action.phrase()
    }
}
