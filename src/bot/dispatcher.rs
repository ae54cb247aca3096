use std::sync::Arc;

use tokio::task::JoinHandle;
use uuid::Uuid;

use super::queue::ChatQueue;
use super::session::{Pending, Session, SessionStore};
use super::strings::{Button, Lang, Text, kind_label, status_label, text};
use super::{ChatTransport, Markup, Reply};
use crate::auth::{self, AuthUser};
use crate::error::AppError;
use crate::models::{Role, Submission, SubmissionKind, SubmissionStatus};
use crate::state::SharedState;
use crate::submission::input::{SubmissionInput, validate_response_text};
use crate::submission::{pipeline, response};

/// One inbound chat interaction, already stripped of transport details.
#[derive(Debug, Clone, PartialEq)]
pub struct Incoming {
    pub chat_id: i64,
    pub user_id: i64,
    /// Username or first name, used as the submission's contact info.
    pub contact: String,
    pub kind: IncomingKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IncomingKind {
    Text(String),
    Callback { id: String, data: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ShowLanguagePicker,
    SetLanguage(Lang),
    StartSubmission(SubmissionKind),
    Submit { kind: SubmissionKind, message: String },
    ListOwn,
    StartDelete,
    Delete(String),
    Faq,
    AdminPanel,
    Reply { id: String, text: String },
    ReplyUsage,
    Cancel,
    Unknown,
}

/// Decide what an input means given the chat's session. Menu buttons and
/// slash commands always win over a pending prompt.
pub fn route(session: &Session, input: &IncomingKind) -> Command {
    let raw = match input {
        IncomingKind::Callback { data, .. } => {
            return Lang::from_callback(data)
                .map(Command::SetLanguage)
                .unwrap_or(Command::Unknown);
        }
        IncomingKind::Text(raw) => raw,
    };
    let text = raw.trim();

    if text == "/start" {
        return Command::ShowLanguagePicker;
    }
    if text == "/cancel" {
        return Command::Cancel;
    }
    if let Some(rest) = text.strip_prefix("/reply") {
        return parse_reply(rest);
    }

    if let Some(button) = Button::from_label(text) {
        return match button {
            Button::SubmitComplaint => Command::StartSubmission(SubmissionKind::Complaint),
            Button::SubmitSuggestion => Command::StartSubmission(SubmissionKind::Suggestion),
            Button::MySubmissions => Command::ListOwn,
            Button::DeleteSubmission => Command::StartDelete,
            Button::Faq => Command::Faq,
            Button::AdminPanel => Command::AdminPanel,
            Button::ChooseLanguage => Command::ShowLanguagePicker,
        };
    }

    match session.pending {
        // Stored as typed, like submissions over HTTP
        Some(Pending::Message(kind)) => Command::Submit {
            kind,
            message: raw.to_string(),
        },
        Some(Pending::DeleteId) => Command::Delete(text.to_string()),
        None => Command::Unknown,
    }
}

fn parse_reply(rest: &str) -> Command {
    // "/replyX" is not the reply command
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return Command::Unknown;
    }
    let rest = rest.trim_start();
    match rest.split_once(char::is_whitespace) {
        Some((id, text)) if !text.trim().is_empty() => Command::Reply {
            id: id.to_string(),
            text: text.trim().to_string(),
        },
        _ => Command::ReplyUsage,
    }
}

/// Drives the submission and response services from chat input. Sessions are
/// loaded per interaction and written back when they change.
pub struct Dispatcher {
    state: SharedState,
    transport: Arc<dyn ChatTransport>,
    sessions: Arc<dyn SessionStore>,
    queue: Arc<ChatQueue>,
}

impl Dispatcher {
    pub fn new(
        state: SharedState,
        transport: Arc<dyn ChatTransport>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            state,
            transport,
            sessions,
            queue: Arc::new(ChatQueue::new()),
        }
    }

    /// Handle `incoming` on its own task. Chats proceed independently;
    /// updates from one chat are handled one at a time, in arrival order.
    pub fn dispatch(self: &Arc<Self>, incoming: Incoming) -> JoinHandle<()> {
        let dispatcher = Arc::clone(self);
        self.queue
            .run(incoming.chat_id, async move { dispatcher.handle(incoming).await })
    }

    pub async fn handle(&self, incoming: Incoming) {
        if let IncomingKind::Callback { id, .. } = &incoming.kind {
            if let Err(e) = self.transport.answer_callback(id).await {
                tracing::warn!("Failed to answer callback {id}: {e}");
            }
        }

        let mut session = self.sessions.load(incoming.chat_id);
        let command = route(&session, &incoming.kind);
        let auth = auth::bind(&incoming.user_id.to_string(), &self.state.config);

        tracing::debug!(
            "Chat {} ({}): {:?}",
            incoming.chat_id,
            auth.user_id,
            command
        );

        let replies = self
            .execute(command, &mut session, &auth, &incoming.contact)
            .await;
        self.sessions.save(incoming.chat_id, session);

        for reply in replies {
            if let Err(e) = self.transport.send(incoming.chat_id, &reply).await {
                tracing::error!("Failed to send reply to chat {}: {e}", incoming.chat_id);
            }
        }
    }

    async fn execute(
        &self,
        command: Command,
        session: &mut Session,
        auth: &AuthUser,
        contact: &str,
    ) -> Vec<Reply> {
        let lang = session.lang;
        let menu = Markup::MainMenu {
            lang,
            admin: auth.is_admin(),
        };

        match command {
            Command::ShowLanguagePicker => {
                session.pending = None;
                vec![Reply::new(text(lang, Text::ChooseLanguage), Markup::LanguagePicker)]
            }
            Command::SetLanguage(lang) => {
                session.lang = lang;
                session.pending = None;
                vec![Reply::new(
                    text(lang, Text::Greeting),
                    Markup::MainMenu {
                        lang,
                        admin: auth.is_admin(),
                    },
                )]
            }
            Command::StartSubmission(kind) => {
                session.pending = Some(Pending::Message(kind));
                let prompt = match kind {
                    SubmissionKind::Complaint => Text::AskComplaint,
                    SubmissionKind::Suggestion => Text::AskSuggestion,
                };
                vec![Reply::plain(text(lang, prompt))]
            }
            Command::Submit { kind, message } => {
                session.pending = None;
                let result = async {
                    let input =
                        SubmissionInput::validate(Some(kind_name(kind)), Some(&message), Some(contact))?;
                    pipeline::submit(&self.state, auth, input).await
                }
                .await;
                match result {
                    Ok(_) => vec![Reply::new(text(lang, Text::Submitted), menu)],
                    Err(e) => vec![Reply::new(error_text(lang, &e), menu)],
                }
            }
            Command::ListOwn => {
                session.pending = None;
                // Own records only, even for the administrator
                let owner = AuthUser::new(auth.user_id.clone(), Role::User);
                match pipeline::list(&self.state, &owner).await {
                    Ok(list) if list.is_empty() => {
                        vec![Reply::new(text(lang, Text::NoSubmissions), menu)]
                    }
                    Ok(list) => vec![Reply::new(
                        render_list(lang, text(lang, Text::YourSubmissions), &list),
                        menu,
                    )],
                    Err(e) => vec![Reply::new(error_text(lang, &e), menu)],
                }
            }
            Command::StartDelete => {
                let owner = AuthUser::new(auth.user_id.clone(), Role::User);
                match pipeline::list(&self.state, &owner).await {
                    Ok(list) if list.is_empty() => {
                        session.pending = None;
                        vec![Reply::new(text(lang, Text::NoSubmissions), menu)]
                    }
                    Ok(list) => {
                        session.pending = Some(Pending::DeleteId);
                        vec![
                            Reply::plain(render_list(lang, text(lang, Text::YourSubmissions), &list)),
                            Reply::plain(text(lang, Text::AskDeleteId)),
                        ]
                    }
                    Err(e) => vec![Reply::new(error_text(lang, &e), menu)],
                }
            }
            Command::Delete(raw_id) => {
                session.pending = None;
                // Deleting from the chat is always scoped to the caller's own records
                let owner = AuthUser::new(auth.user_id.clone(), Role::User);
                let result = match Uuid::parse_str(raw_id.trim()) {
                    Ok(id) => pipeline::delete(&self.state, &owner, id).await,
                    Err(_) => Err(AppError::NotFound("Complaint not found".to_string())),
                };
                match result {
                    Ok(_) => vec![Reply::new(text(lang, Text::Deleted), menu)],
                    Err(e) => vec![Reply::new(error_text(lang, &e), menu)],
                }
            }
            Command::Faq => vec![Reply::plain(text(lang, Text::Faq))],
            Command::AdminPanel => {
                session.pending = None;
                if let Err(e) = auth.require_admin() {
                    return vec![Reply::new(error_text(lang, &e), menu)];
                }
                match crate::db::submissions::list_by_status(&self.state.pool, SubmissionStatus::New)
                    .await
                {
                    Ok(list) if list.is_empty() => {
                        vec![Reply::new(text(lang, Text::AdminNothingNew), menu)]
                    }
                    Ok(list) => vec![Reply::new(
                        render_list(lang, text(lang, Text::AdminHeader), &list),
                        menu,
                    )],
                    Err(e) => vec![Reply::new(error_text(lang, &AppError::from(e)), menu)],
                }
            }
            Command::Reply { id, text: body } => {
                session.pending = None;
                let result = async {
                    auth.require_admin()?;
                    let id = Uuid::parse_str(&id)
                        .map_err(|_| AppError::NotFound("Complaint not found".to_string()))?;
                    let body = validate_response_text(Some(&body))?;
                    response::respond(&self.state, auth, id, body).await
                }
                .await;
                match result {
                    Ok(_) => vec![Reply::new(text(lang, Text::Replied), menu)],
                    Err(e) => vec![Reply::new(error_text(lang, &e), menu)],
                }
            }
            Command::ReplyUsage => vec![Reply::plain(text(lang, Text::ReplyUsage))],
            Command::Cancel => {
                session.pending = None;
                vec![Reply::new(text(lang, Text::Cancelled), menu)]
            }
            Command::Unknown => vec![Reply::new(text(lang, Text::Unknown), menu)],
        }
    }
}

fn kind_name(kind: SubmissionKind) -> &'static str {
    match kind {
        SubmissionKind::Complaint => "complaint",
        SubmissionKind::Suggestion => "suggestion",
    }
}

fn error_text(lang: Lang, err: &AppError) -> &'static str {
    match err {
        AppError::Forbidden(_) | AppError::Unauthorized(_) => text(lang, Text::AdminOnly),
        AppError::NotFound(_) => text(lang, Text::NotFound),
        AppError::Conflict(_) => text(lang, Text::AlreadyAnswered),
        AppError::BadRequest(_) => text(lang, Text::Invalid),
        AppError::RateLimited(_) => text(lang, Text::TooMany),
        AppError::Internal(_) | AppError::Database(_) => {
            tracing::error!("Bot command failed: {err}");
            text(lang, Text::Failed)
        }
    }
}

/// One chat-friendly paragraph per submission.
pub fn describe(lang: Lang, submission: &Submission) -> String {
    let mut out = format!(
        "[{}] {}\n{}\nid: {}",
        kind_label(lang, submission.kind),
        status_label(lang, submission.status),
        submission.message,
        submission.id
    );
    if let Some(answer) = submission.response_text() {
        out.push_str("\n> ");
        out.push_str(answer);
    }
    out
}

fn render_list(lang: Lang, header: &str, submissions: &[Submission]) -> String {
    let mut out = header.to_string();
    for submission in submissions {
        out.push_str("\n\n");
        out.push_str(&describe(lang, submission));
    }
    out
}
