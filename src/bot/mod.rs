//! Conversational front end.
//!
//! The dispatcher turns chat input into submission/response service calls,
//! the relay pushes live events back into chats, and the Telegram client is
//! the only piece that knows about the chat platform.

pub mod dispatcher;
pub mod queue;
pub mod session;
pub mod strings;
pub mod telegram;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::auth::AuthUser;
use crate::live::{Delivery, EventKind};
use crate::models::Role;
use crate::state::SharedState;

use dispatcher::{Dispatcher, describe};
use session::{MemorySessionStore, SessionStore};
use strings::{Lang, Text, text};
use telegram::TelegramClient;

const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub markup: Markup,
}

impl Reply {
    pub fn new(text: impl Into<String>, markup: Markup) -> Self {
        Self {
            text: text.into(),
            markup,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Markup::None)
    }
}

/// Keyboard to attach to a reply; rendering is the transport's job.
#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    None,
    MainMenu { lang: Lang, admin: bool },
    LanguagePicker,
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, chat_id: i64, reply: &Reply) -> Result<(), String>;
    async fn answer_callback(&self, callback_id: &str) -> Result<(), String>;
}

/// Start the bot if a Telegram token is configured. Returns the polling and
/// relay tasks; both stop when `shutdown` flips to true.
pub fn spawn(state: SharedState, shutdown: watch::Receiver<bool>) -> Option<Vec<JoinHandle<()>>> {
    let config = state.config.telegram.clone()?;

    let client = match TelegramClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("Telegram bot disabled: {e}");
            return None;
        }
    };

    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let transport: Arc<dyn ChatTransport> = client.clone();
    let dispatcher = Arc::new(Dispatcher::new(state.clone(), transport.clone(), sessions.clone()));

    let poller = tokio::spawn(poll(client, dispatcher, shutdown.clone()));
    let relay = tokio::spawn(relay(state, transport, sessions, shutdown));

    tracing::info!("Telegram bot started");
    Some(vec![poller, relay])
}

/// Long-poll loop. Each update is handed to the dispatcher without waiting
/// for it, so a slow chat never holds up fetching the next batch.
async fn poll(
    client: Arc<TelegramClient>,
    dispatcher: Arc<Dispatcher>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut offset = 0;

    loop {
        if *shutdown.borrow() {
            break;
        }

        let updates = tokio::select! {
            result = client.get_updates(offset) => result,
            _ = shutdown.changed() => break,
        };

        match updates {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    if let Some(incoming) = update.into_incoming() {
                        dispatcher.dispatch(incoming);
                    }
                }
            }
            Err(e) => {
                tracing::error!("Telegram polling error: {e}");
                tokio::select! {
                    _ = tokio::time::sleep(RETRY_DELAY) => {}
                    _ = shutdown.changed() => {}
                }
            }
        }
    }

    tracing::info!("Telegram polling stopped");
}

/// Forward live events into chats: new submissions to the administrator,
/// answers to the submission's owner.
async fn relay(
    state: SharedState,
    transport: Arc<dyn ChatTransport>,
    sessions: Arc<dyn SessionStore>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut subscription = state.notifier.subscribe(AuthUser::new("telegram-relay", Role::Admin));
    let admin_chat = state
        .config
        .admin_id
        .as_deref()
        .and_then(|id| id.parse::<i64>().ok());

    loop {
        let delivery = tokio::select! {
            delivery = subscription.next() => delivery,
            _ = shutdown.changed() => break,
        };
        let event = match delivery {
            Some(Delivery::Event(event)) => event,
            // Chats are not a mirrored list, so there is nothing to resync
            Some(Delivery::Resync) => continue,
            None => break,
        };

        let Some((chat_id, header)) = chat_target(event.kind, &event.submission.user_id, admin_chat)
        else {
            continue;
        };

        let lang = sessions.load(chat_id).lang;
        let reply = format!("{}\n\n{}", text(lang, header), describe(lang, &event.submission));
        if let Err(e) = transport.send(chat_id, &Reply::plain(reply)).await {
            tracing::warn!("Failed to relay {} to chat {chat_id}: {e}", event.kind.wire_name());
        }
    }

    tracing::info!("Telegram relay stopped");
}

/// Which chat, if any, hears about an event.
fn chat_target(kind: EventKind, owner: &str, admin_chat: Option<i64>) -> Option<(i64, Text)> {
    match kind {
        EventKind::Created => {
            let admin = admin_chat?;
            // The administrator does not need to hear about their own submissions
            (owner != admin.to_string()).then_some((admin, Text::NewSubmissionAlert))
        }
        EventKind::Updated => owner.parse::<i64>().ok().map(|chat| (chat, Text::AnswerAlert)),
        EventKind::Deleted => None,
    }
}
