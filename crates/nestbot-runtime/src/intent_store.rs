use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A user's single outstanding multi-step operation awaiting a free-text
/// reply. Setting a new intent overwrites the prior one; the abandoned
/// operation is never completed.
pub enum PendingIntent {
    AwaitingFeedback,
    AwaitingBugReport,
}

impl PendingIntent {
    /// Operation label rendered in `/cancel` replies.
    pub fn label(self) -> &'static str {
        match self {
            Self::AwaitingFeedback => "feedback",
            Self::AwaitingBugReport => "bug",
        }
    }
}

#[derive(Debug, Default)]
/// In-memory map from user identity to pending intent. Single-owner, not
/// persisted, no eviction; abandoned intents live until overwritten or
/// cleared.
pub struct IntentStore {
    states: HashMap<i64, PendingIntent>,
}

impl IntentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, user_id: i64, intent: PendingIntent) {
        self.states.insert(user_id, intent);
    }

    pub fn get(&self, user_id: i64) -> Option<PendingIntent> {
        self.states.get(&user_id).copied()
    }

    /// Removes and returns the user's pending intent, if any.
    pub fn clear(&mut self, user_id: i64) -> Option<PendingIntent> {
        self.states.remove(&user_id)
    }
}
