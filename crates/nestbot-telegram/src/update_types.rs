use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
/// Raw `getUpdates` entry as delivered by the Bot API.
pub struct TelegramUpdate {
    pub update_id: u64,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
    #[serde(default)]
    pub callback_query: Option<TelegramCallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    #[serde(default)]
    pub from: Option<TelegramUser>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Sender identity attached to every inbound event.
pub struct UserRef {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl UserRef {
    /// Handle if present, else first name, else a fallback built from the
    /// numeric identity.
    pub fn display_name(&self) -> String {
        if let Some(username) = self.username.as_deref().map(str::trim) {
            if !username.is_empty() {
                return username.to_string();
            }
        }
        if let Some(first_name) = self.first_name.as_deref().map(str::trim) {
            if !first_name.is_empty() {
                return first_name.to_string();
            }
        }
        format!("User_{}", self.id)
    }
}

impl From<TelegramUser> for UserRef {
    fn from(user: TelegramUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramCallbackQuery {
    pub id: String,
    pub from: TelegramUser,
    #[serde(default)]
    pub message: Option<TelegramMessage>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Free-form chat message. `text` may be empty.
pub struct ChatMessage {
    pub chat_id: i64,
    pub sender: UserRef,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Inline-keyboard button press awaiting acknowledgement.
pub struct CallbackAction {
    pub action_id: String,
    pub chat_id: i64,
    pub sender: UserRef,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    Message(ChatMessage),
    CallbackAction(CallbackAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One inbound event; `id` is the update id the dispatch cursor advances past.
pub struct InboundEvent {
    pub id: u64,
    pub payload: EventPayload,
}

impl InboundEvent {
    /// Maps a raw update to a domain event. With `allowed_updates` restricted
    /// to messages and callback queries this is total in practice; anything
    /// else is dropped.
    pub fn from_update(update: TelegramUpdate) -> Option<Self> {
        if let Some(callback) = update.callback_query {
            // A callback without an attached message falls back to the
            // sender id; private chat ids match user ids on Telegram.
            let chat_id = callback
                .message
                .as_ref()
                .map(|message| message.chat.id)
                .unwrap_or(callback.from.id);
            return Some(Self {
                id: update.update_id,
                payload: EventPayload::CallbackAction(CallbackAction {
                    action_id: callback.id,
                    chat_id,
                    sender: callback.from.into(),
                    data: callback.data.unwrap_or_default(),
                }),
            });
        }
        let message = update.message?;
        let chat_id = message.chat.id;
        let sender = message
            .from
            .map(UserRef::from)
            .unwrap_or(UserRef {
                id: chat_id,
                username: None,
                first_name: None,
            });
        Some(Self {
            id: update.update_id,
            payload: EventPayload::Message(ChatMessage {
                chat_id,
                sender,
                text: message.text.unwrap_or_default(),
            }),
        })
    }
}
