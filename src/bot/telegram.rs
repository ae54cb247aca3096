//! Telegram Bot API transport: long polling in, `sendMessage` out.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::dispatcher::{Incoming, IncomingKind};
use super::strings::{Button, Text, text};
use super::{ChatTransport, Markup, Reply};
use crate::config::TelegramConfig;

pub const POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

impl Update {
    /// Reduce an update to what the dispatcher understands. Anything else
    /// (stickers, edits, channel posts) yields `None`.
    pub fn into_incoming(self) -> Option<Incoming> {
        if let Some(query) = self.callback_query {
            let chat_id = query
                .message
                .as_ref()
                .map(|m| m.chat.id)
                .unwrap_or(query.from.id);
            return Some(Incoming {
                chat_id,
                user_id: query.from.id,
                contact: contact_of(&query.from),
                kind: IncomingKind::Callback {
                    id: query.id,
                    data: query.data.unwrap_or_default(),
                },
            });
        }

        let message = self.message?;
        let text = message.text?;
        let from = message.from?;
        Some(Incoming {
            chat_id: message.chat.id,
            user_id: from.id,
            contact: contact_of(&from),
            kind: IncomingKind::Text(text),
        })
    }
}

fn contact_of(user: &User) -> String {
    match &user.username {
        Some(name) if !name.is_empty() => format!("@{name}"),
        _ => user.first_name.clone(),
    }
}

pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    webapp_url: Option<String>,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            // Must outlive the long-poll timeout
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 15))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/bot{}",
                config.api_base.trim_end_matches('/'),
                config.token
            ),
            webapp_url: config.webapp_url.clone(),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T, String> {
        let resp = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| format!("{method} request failed: {e}"))?;

        let parsed: ApiResponse<T> = resp
            .json()
            .await
            .map_err(|e| format!("{method} returned an unreadable body: {e}"))?;

        if !parsed.ok {
            return Err(format!(
                "{method} failed: {}",
                parsed.description.unwrap_or_else(|| "unknown error".to_string())
            ));
        }
        parsed
            .result
            .ok_or_else(|| format!("{method} returned no result"))
    }

    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, String> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": POLL_TIMEOUT_SECS,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send(&self, chat_id: i64, reply: &Reply) -> Result<(), String> {
        let mut body = json!({ "chat_id": chat_id, "text": reply.text });
        if let Some(markup) = render_markup(&reply.markup, self.webapp_url.as_deref()) {
            body["reply_markup"] = markup;
        }
        self.call::<Value>("sendMessage", &body).await.map(|_| ())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), String> {
        self.call::<Value>(
            "answerCallbackQuery",
            &json!({ "callback_query_id": callback_id }),
        )
        .await
        .map(|_| ())
    }
}

/// Telegram `reply_markup` for a reply, or `None` to leave the keyboard as is.
pub fn render_markup(markup: &Markup, webapp_url: Option<&str>) -> Option<Value> {
    match markup {
        Markup::None => None,
        Markup::LanguagePicker => Some(json!({
            "inline_keyboard": [
                [{ "text": "🇺🇦 UA", "callback_data": "lang_ua" }],
                [{ "text": "🇺🇸 EN", "callback_data": "lang_en" }],
            ]
        })),
        Markup::MainMenu { lang, admin } => {
            let lang = *lang;
            let button = |b: Button| json!({ "text": b.label(lang) });
            let mut rows = vec![
                json!([button(Button::SubmitComplaint), button(Button::SubmitSuggestion)]),
                json!([button(Button::MySubmissions), button(Button::DeleteSubmission)]),
                json!([button(Button::Faq), button(Button::ChooseLanguage)]),
            ];
            if *admin {
                rows.push(json!([button(Button::AdminPanel)]));
            }
            if let Some(url) = webapp_url {
                rows.push(json!([{
                    "text": text(lang, Text::OpenWebApp),
                    "web_app": { "url": url },
                }]));
            }
            Some(json!({ "keyboard": rows, "resize_keyboard": true }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::strings::Lang;

    #[test]
    fn text_message_becomes_incoming() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 10,
            "message": {
                "message_id": 1,
                "chat": { "id": 555, "type": "private" },
                "from": { "id": 555, "is_bot": false, "first_name": "Olena", "username": "olena" },
                "text": "Submit a Complaint"
            }
        }))
        .unwrap();

        let incoming = update.into_incoming().unwrap();
        assert_eq!(incoming.chat_id, 555);
        assert_eq!(incoming.user_id, 555);
        assert_eq!(incoming.contact, "@olena");
        assert_eq!(
            incoming.kind,
            IncomingKind::Text("Submit a Complaint".to_string())
        );
    }

    #[test]
    fn callback_query_uses_message_chat() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 11,
            "callback_query": {
                "id": "cb1",
                "from": { "id": 7, "is_bot": false, "first_name": "Ivan" },
                "message": { "message_id": 2, "chat": { "id": 700 } },
                "data": "lang_en"
            }
        }))
        .unwrap();

        let incoming = update.into_incoming().unwrap();
        assert_eq!(incoming.chat_id, 700);
        assert_eq!(incoming.contact, "Ivan");
        assert_eq!(
            incoming.kind,
            IncomingKind::Callback {
                id: "cb1".to_string(),
                data: "lang_en".to_string()
            }
        );
    }

    #[test]
    fn non_text_updates_are_skipped() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 12,
            "message": {
                "message_id": 3,
                "chat": { "id": 1 },
                "from": { "id": 1, "is_bot": false, "first_name": "A" },
                "sticker": {}
            }
        }))
        .unwrap();
        assert!(update.into_incoming().is_none());
    }

    #[test]
    fn admin_menu_has_extra_row_and_webapp_button() {
        let user = render_markup(
            &Markup::MainMenu {
                lang: Lang::En,
                admin: false,
            },
            None,
        )
        .unwrap();
        let admin = render_markup(
            &Markup::MainMenu {
                lang: Lang::En,
                admin: true,
            },
            Some("https://example.test/app"),
        )
        .unwrap();

        assert_eq!(user["keyboard"].as_array().unwrap().len(), 3);
        let rows = admin["keyboard"].as_array().unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[3][0]["text"], "Admin Panel");
        assert_eq!(rows[4][0]["web_app"]["url"], "https://example.test/app");
    }

    #[test]
    fn plain_replies_keep_the_keyboard() {
        assert!(render_markup(&Markup::None, None).is_none());
        let picker = render_markup(&Markup::LanguagePicker, None).unwrap();
        assert_eq!(picker["inline_keyboard"][1][0]["callback_data"], "lang_en");
    }
}
