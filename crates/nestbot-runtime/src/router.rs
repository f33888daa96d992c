use std::sync::Arc;

use nestbot_github::IssueTracker;
use nestbot_telegram::{ChatMessage, EventPayload, InboundEvent};
use serde_json::Value;

use crate::intent_store::{IntentStore, PendingIntent};
use crate::messages;
use crate::report::{build_bug_report, build_feedback_report};

/// One outbound action produced by routing a single event. The dispatch loop
/// executes it against the chat transport.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SendText { chat_id: i64, text: String },
    SendTextWithOptions { chat_id: i64, text: String, options: Value },
    AcknowledgeAction { action_id: String },
    NoOp,
}

/// Maps inbound events to outbound effects. Commands hit a fixed handler
/// table; free text is interpreted through the sender's pending intent and,
/// when an intent is armed, submitted to the issue tracker.
pub struct CommandRouter {
    intents: IntentStore,
    tracker: Arc<dyn IssueTracker>,
    repo_slug: String,
}

impl CommandRouter {
    pub fn new(tracker: Arc<dyn IssueTracker>, repo_slug: impl Into<String>) -> Self {
        Self {
            intents: IntentStore::new(),
            tracker,
            repo_slug: repo_slug.into(),
        }
    }

    pub fn pending_intent(&self, user_id: i64) -> Option<PendingIntent> {
        self.intents.get(user_id)
    }

    pub async fn route(&mut self, event: &InboundEvent) -> Effect {
        match &event.payload {
            EventPayload::CallbackAction(action) => Effect::AcknowledgeAction {
                action_id: action.action_id.clone(),
            },
            EventPayload::Message(message) => {
                let trimmed = message.text.trim();
                if trimmed.is_empty() {
                    // Whitespace-only replies neither complete nor cancel a
                    // pending intent.
                    return Effect::NoOp;
                }
                if trimmed.starts_with('/') {
                    self.route_command(message, trimmed)
                } else {
                    self.route_free_text(message, trimmed).await
                }
            }
        }
    }

    fn route_command(&mut self, message: &ChatMessage, trimmed: &str) -> Effect {
        let command = trimmed.split_whitespace().next().unwrap_or(trimmed);
        let chat_id = message.chat_id;
        match command {
            "/start" => Effect::SendTextWithOptions {
                chat_id,
                text: messages::WELCOME_TEXT.to_string(),
                options: messages::start_menu_options(),
            },
            "/help" => Effect::SendText {
                chat_id,
                text: messages::HELP_TEXT.to_string(),
            },
            "/status" => Effect::SendText {
                chat_id,
                text: messages::status_text(self.tracker.is_configured(), &self.repo_slug),
            },
            "/cancel" => {
                let cancelled = self.intents.clear(message.sender.id);
                Effect::SendText {
                    chat_id,
                    text: messages::cancel_text(cancelled),
                }
            }
            "/feedback" => {
                self.intents
                    .set(message.sender.id, PendingIntent::AwaitingFeedback);
                Effect::SendText {
                    chat_id,
                    text: messages::FEEDBACK_PROMPT.to_string(),
                }
            }
            "/bug" => {
                self.intents
                    .set(message.sender.id, PendingIntent::AwaitingBugReport);
                Effect::SendText {
                    chat_id,
                    text: messages::BUG_PROMPT.to_string(),
                }
            }
            _ => Effect::SendText {
                chat_id,
                text: messages::UNRECOGNIZED_COMMAND_TEXT.to_string(),
            },
        }
    }

    async fn route_free_text(&mut self, message: &ChatMessage, trimmed: &str) -> Effect {
        let chat_id = message.chat_id;
        // The intent is consumed up front; a tracker failure must not leave
        // the user stuck in submission mode.
        let Some(intent) = self.intents.clear(message.sender.id) else {
            return Effect::SendText {
                chat_id,
                text: messages::UNRECOGNIZED_TEXT.to_string(),
            };
        };
        let text = match intent {
            PendingIntent::AwaitingFeedback => {
                let report = build_feedback_report(&message.sender, trimmed);
                match self.tracker.create_issue(&report).await {
                    Ok(issue) => messages::feedback_confirmation(&issue),
                    Err(error) => {
                        eprintln!(
                            "issue submission failed: kind=feedback user={} error={error}",
                            message.sender.id
                        );
                        messages::FEEDBACK_FAILURE_TEXT.to_string()
                    }
                }
            }
            PendingIntent::AwaitingBugReport => {
                let (report, priority) = build_bug_report(&message.sender, trimmed);
                match self.tracker.create_issue(&report).await {
                    Ok(issue) => messages::bug_confirmation(&issue, priority),
                    Err(error) => {
                        eprintln!(
                            "issue submission failed: kind=bug user={} error={error}",
                            message.sender.id
                        );
                        messages::BUG_FAILURE_TEXT.to_string()
                    }
                }
            }
        };
        Effect::SendText { chat_id, text }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use nestbot_github::{IssueRef, Report, TrackerError};
    use nestbot_telegram::{CallbackAction, UserRef};

    use super::*;

    struct RecordingTracker {
        configured: bool,
        fail: bool,
        calls: Mutex<Vec<Report>>,
    }

    impl RecordingTracker {
        fn new() -> Self {
            Self {
                configured: true,
                fail: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl IssueTracker for RecordingTracker {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn create_issue(&self, report: &Report) -> Result<IssueRef, TrackerError> {
            self.calls.lock().unwrap().push(report.clone());
            if self.fail {
                return Err(TrackerError::Status {
                    status: 500,
                    detail: "boom".to_string(),
                });
            }
            Ok(IssueRef {
                number: 42,
                url: "https://github.com/ken-andre/ngonnest/issues/42".to_string(),
            })
        }
    }

    fn message_event(id: u64, text: &str) -> InboundEvent {
        InboundEvent {
            id,
            payload: EventPayload::Message(ChatMessage {
                chat_id: 100,
                sender: UserRef {
                    id: 7,
                    username: Some("ops".to_string()),
                    first_name: None,
                },
                text: text.to_string(),
            }),
        }
    }

    fn sent_text(effect: &Effect) -> &str {
        match effect {
            Effect::SendText { text, .. } => text,
            other => panic!("expected SendText, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn functional_feedback_flow_submits_report_and_clears_intent() {
        let tracker = Arc::new(RecordingTracker::new());
        let mut router = CommandRouter::new(tracker.clone(), "ken-andre/ngonnest");

        let prompt = router.route(&message_event(1, "/feedback")).await;
        assert!(sent_text(&prompt).contains("feedback"));
        assert_eq!(router.pending_intent(7), Some(PendingIntent::AwaitingFeedback));

        let reply = router.route(&message_event(2, "ajoutez une recherche")).await;
        assert!(sent_text(&reply).contains("#42"));
        assert_eq!(router.pending_intent(7), None);

        let calls = tracker.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].title.starts_with("[FEEDBACK]"));
        assert!(calls[0].labels.contains("feedback"));
    }

    #[tokio::test]
    async fn functional_bug_flow_reports_detected_priority() {
        let tracker = Arc::new(RecordingTracker::new());
        let mut router = CommandRouter::new(tracker.clone(), "ken-andre/ngonnest");

        router.route(&message_event(1, "/bug")).await;
        let reply = router
            .route(&message_event(2, "plantage au démarrage de l'app"))
            .await;
        assert!(sent_text(&reply).contains("🚨 urgente"));

        let calls = tracker.calls.lock().unwrap();
        assert!(calls[0].title.contains("[BUG-URGENT]"));
        assert!(calls[0].labels.contains("priority-urgent"));
    }

    #[tokio::test]
    async fn functional_free_text_without_intent_never_reaches_the_tracker() {
        let tracker = Arc::new(RecordingTracker::new());
        let mut router = CommandRouter::new(tracker.clone(), "ken-andre/ngonnest");

        let reply = router.route(&message_event(1, "bonjour")).await;
        assert!(sent_text(&reply).contains("/feedback"));
        assert_eq!(tracker.call_count(), 0);
    }

    #[tokio::test]
    async fn regression_tracker_failure_still_clears_the_intent() {
        let tracker = Arc::new(RecordingTracker {
            fail: true,
            ..RecordingTracker::new()
        });
        let mut router = CommandRouter::new(tracker.clone(), "ken-andre/ngonnest");

        router.route(&message_event(1, "/feedback")).await;
        let reply = router.route(&message_event(2, "une idée")).await;
        assert!(sent_text(&reply).contains("n'a pas pu être transmis"));
        assert_eq!(router.pending_intent(7), None);
        assert_eq!(tracker.call_count(), 1);
    }

    #[tokio::test]
    async fn regression_whitespace_reply_preserves_the_pending_intent() {
        let tracker = Arc::new(RecordingTracker::new());
        let mut router = CommandRouter::new(tracker.clone(), "ken-andre/ngonnest");

        router.route(&message_event(1, "/bug")).await;
        let reply = router.route(&message_event(2, "   \n  ")).await;
        assert_eq!(reply, Effect::NoOp);
        assert_eq!(router.pending_intent(7), Some(PendingIntent::AwaitingBugReport));
        assert_eq!(tracker.call_count(), 0);
    }

    #[tokio::test]
    async fn unit_newer_intent_command_overwrites_the_prior_intent() {
        let tracker = Arc::new(RecordingTracker::new());
        let mut router = CommandRouter::new(tracker, "ken-andre/ngonnest");

        router.route(&message_event(1, "/feedback")).await;
        router.route(&message_event(2, "/bug")).await;
        assert_eq!(router.pending_intent(7), Some(PendingIntent::AwaitingBugReport));
    }

    #[tokio::test]
    async fn unit_cancel_names_the_cancelled_operation() {
        let tracker = Arc::new(RecordingTracker::new());
        let mut router = CommandRouter::new(tracker, "ken-andre/ngonnest");

        router.route(&message_event(1, "/feedback")).await;
        let reply = router.route(&message_event(2, "/cancel")).await;
        assert!(sent_text(&reply).contains("*feedback*"));
        assert_eq!(router.pending_intent(7), None);

        let reply = router.route(&message_event(3, "/cancel")).await;
        assert!(sent_text(&reply).contains("Aucune opération"));
    }

    #[tokio::test]
    async fn unit_start_reply_carries_the_inline_menu() {
        let tracker = Arc::new(RecordingTracker::new());
        let mut router = CommandRouter::new(tracker, "ken-andre/ngonnest");

        match router.route(&message_event(1, "/start")).await {
            Effect::SendTextWithOptions { chat_id, text, options } => {
                assert_eq!(chat_id, 100);
                assert!(text.contains("Bienvenue"));
                assert!(options["inline_keyboard"].is_array());
            }
            other => panic!("expected SendTextWithOptions, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unit_status_reports_degraded_tracker() {
        let tracker = Arc::new(RecordingTracker {
            configured: false,
            ..RecordingTracker::new()
        });
        let mut router = CommandRouter::new(tracker, "ken-andre/ngonnest");

        let reply = router.route(&message_event(1, "/status")).await;
        assert!(sent_text(&reply).contains("❌ Token manquant"));
    }

    #[tokio::test]
    async fn unit_unknown_command_gets_a_help_pointer() {
        let tracker = Arc::new(RecordingTracker::new());
        let mut router = CommandRouter::new(tracker.clone(), "ken-andre/ngonnest");

        let reply = router.route(&message_event(1, "/export")).await;
        assert!(sent_text(&reply).contains("/help"));
        assert_eq!(tracker.call_count(), 0);
    }

    #[tokio::test]
    async fn unit_callback_actions_are_acknowledged() {
        let tracker = Arc::new(RecordingTracker::new());
        let mut router = CommandRouter::new(tracker, "ken-andre/ngonnest");

        let event = InboundEvent {
            id: 5,
            payload: EventPayload::CallbackAction(CallbackAction {
                action_id: "cb-91".to_string(),
                chat_id: 100,
                sender: UserRef {
                    id: 7,
                    username: None,
                    first_name: Some("Ada".to_string()),
                },
                data: "menu_feedback".to_string(),
            }),
        };
        assert_eq!(
            router.route(&event).await,
            Effect::AcknowledgeAction {
                action_id: "cb-91".to_string()
            }
        );
    }
}
