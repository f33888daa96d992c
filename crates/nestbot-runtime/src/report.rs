use nestbot_github::Report;
use nestbot_telegram::UserRef;

use crate::intent_store::PendingIntent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BugPriority {
    Urgent,
    High,
    Normal,
}

impl BugPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Normal => "normal",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Urgent => "🚨",
            Self::High => "🔴",
            Self::Normal => "🟡",
        }
    }
}

/// Ordered keyword table scanned over the lowercased text. The scan order is
/// an observable tie-break (first match wins), not an implementation detail.
const PRIORITY_KEYWORDS: [(&str, BugPriority); 6] = [
    ("crash", BugPriority::Urgent),
    ("plantage", BugPriority::Urgent),
    ("bug critique", BugPriority::Urgent),
    ("bloque", BugPriority::High),
    ("erreur", BugPriority::High),
    ("ne fonctionne", BugPriority::High),
];

pub fn classify_bug_priority(text: &str) -> BugPriority {
    let lowered = text.to_lowercase();
    for (keyword, priority) in PRIORITY_KEYWORDS {
        if lowered.contains(keyword) {
            return priority;
        }
    }
    BugPriority::Normal
}

/// Builds the tracker payload for one free-text submission. Callers must
/// reject empty or whitespace-only text first.
pub fn build_report(intent: PendingIntent, sender: &UserRef, text: &str) -> Report {
    match intent {
        PendingIntent::AwaitingFeedback => build_feedback_report(sender, text),
        PendingIntent::AwaitingBugReport => build_bug_report(sender, text).0,
    }
}

pub fn build_feedback_report(sender: &UserRef, text: &str) -> Report {
    let name = sender.display_name();
    Report {
        title: format!("[FEEDBACK] Suggestion de {name}"),
        body: format!(
            "📝 **Feedback de l'utilisateur @{name}**\n\n\
             **Message :**\n{text}\n\n\
             **Informations :**\n- ID utilisateur: {}",
            sender.id
        ),
        labels: ["feedback", "user-request", "enhancement"]
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

pub fn build_bug_report(sender: &UserRef, text: &str) -> (Report, BugPriority) {
    let priority = classify_bug_priority(text);
    let name = sender.display_name();
    let title = format!(
        "{} [BUG-{}] Signalement de {name}",
        priority.emoji(),
        priority.as_str().to_uppercase()
    );
    let body = format!(
        "🐛 **Bug signalé par @{name}**\n\n\
         **Priorité:** {}\n\n\
         **Description du problème:**\n{text}\n\n\
         **Informations techniques:**\n- ID utilisateur: {}\n\n\
         **Note pour les développeurs:**\n_Priorité détectée automatiquement basée sur les mots-clés dans le message._",
        priority.as_str().to_uppercase(),
        sender.id
    );
    let mut labels: std::collections::BTreeSet<String> =
        ["bug"].into_iter().map(str::to_string).collect();
    match priority {
        BugPriority::Urgent => {
            labels.insert("urgent".to_string());
            labels.insert("priority-urgent".to_string());
        }
        BugPriority::High => {
            labels.insert("high-priority".to_string());
        }
        BugPriority::Normal => {}
    }
    (Report { title, body, labels }, priority)
}
