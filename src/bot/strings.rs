//! Localized bot strings. Ukrainian is the default language.

use crate::models::{SubmissionKind, SubmissionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Ua,
    En,
}

impl Lang {
    pub fn from_callback(data: &str) -> Option<Self> {
        match data {
            "lang_ua" => Some(Lang::Ua),
            "lang_en" => Some(Lang::En),
            _ => None,
        }
    }
}

/// Main-menu buttons. Labels are recognized in either language so a chat
/// keeps working after switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    SubmitComplaint,
    SubmitSuggestion,
    MySubmissions,
    DeleteSubmission,
    Faq,
    AdminPanel,
    ChooseLanguage,
}

impl Button {
    pub const MENU: [Button; 6] = [
        Button::SubmitComplaint,
        Button::SubmitSuggestion,
        Button::MySubmissions,
        Button::DeleteSubmission,
        Button::Faq,
        Button::ChooseLanguage,
    ];

    pub fn label(&self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Button::SubmitComplaint, Lang::Ua) => "Надіслати скаргу",
            (Button::SubmitComplaint, Lang::En) => "Submit a Complaint",
            (Button::SubmitSuggestion, Lang::Ua) => "Надіслати пропозицію",
            (Button::SubmitSuggestion, Lang::En) => "Submit a Suggestion",
            (Button::MySubmissions, Lang::Ua) => "Мої звернення",
            (Button::MySubmissions, Lang::En) => "My Submissions",
            (Button::DeleteSubmission, Lang::Ua) => "Видалити звернення",
            (Button::DeleteSubmission, Lang::En) => "Delete a Submission",
            (Button::Faq, _) => "FAQ",
            (Button::AdminPanel, Lang::Ua) => "Адмінка",
            (Button::AdminPanel, Lang::En) => "Admin Panel",
            (Button::ChooseLanguage, Lang::Ua) => "Оберіть мову",
            (Button::ChooseLanguage, Lang::En) => "Choose language",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        Button::MENU
            .iter()
            .chain(std::iter::once(&Button::AdminPanel))
            .find(|b| b.label(Lang::Ua) == text || b.label(Lang::En) == text)
            .copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    ChooseLanguage,
    Greeting,
    AskComplaint,
    AskSuggestion,
    Submitted,
    NoSubmissions,
    YourSubmissions,
    AskDeleteId,
    Deleted,
    Faq,
    AdminOnly,
    AdminNothingNew,
    AdminHeader,
    Replied,
    ReplyUsage,
    AlreadyAnswered,
    NotFound,
    Invalid,
    TooMany,
    Failed,
    Unknown,
    Cancelled,
    NewSubmissionAlert,
    AnswerAlert,
    OpenWebApp,
}

pub fn text(lang: Lang, key: Text) -> &'static str {
    use Text::*;
    match (lang, key) {
        (_, ChooseLanguage) => "Оберіть мову / Choose your language:",
        (Lang::Ua, Greeting) => "Я бот \"Рупор Клієнта\" для залишення скарг або пропозицій.",
        (Lang::En, Greeting) => {
            "I am a \"Customer Mouthpiece\" bot for leaving complaints or suggestions."
        }
        (Lang::Ua, AskComplaint) => "Опишіть, будь ласка, вашу скаргу одним повідомленням.",
        (Lang::En, AskComplaint) => "Please describe your complaint in one message.",
        (Lang::Ua, AskSuggestion) => "Опишіть, будь ласка, вашу пропозицію одним повідомленням.",
        (Lang::En, AskSuggestion) => "Please describe your suggestion in one message.",
        (Lang::Ua, Submitted) => "Звернення успішно надіслано!",
        (Lang::En, Submitted) => "Feedback submitted successfully!",
        (Lang::Ua, NoSubmissions) => "Немає звернень",
        (Lang::En, NoSubmissions) => "No feedback available",
        (Lang::Ua, YourSubmissions) => "Ваші звернення:",
        (Lang::En, YourSubmissions) => "Your submissions:",
        (Lang::Ua, AskDeleteId) => "Надішліть ідентифікатор звернення, яке потрібно видалити.",
        (Lang::En, AskDeleteId) => "Send the id of the submission you want to delete.",
        (Lang::Ua, Deleted) => "Звернення видалено.",
        (Lang::En, Deleted) => "Submission deleted.",
        (Lang::Ua, Faq) => {
            "Як надіслати скаргу? Натисніть \"Надіслати скаргу\" та опишіть проблему.\n\
             Коли буде відповідь? Адміністратор відповідає якнайшвидше, ви отримаєте сповіщення тут."
        }
        (Lang::En, Faq) => {
            "How do I file a complaint? Press \"Submit a Complaint\" and describe the problem.\n\
             When will I get an answer? The administrator replies as soon as possible and you will be notified here."
        }
        (Lang::Ua, AdminOnly) => "Доступ лише для адміністратора.",
        (Lang::En, AdminOnly) => "Access denied: administrators only.",
        (Lang::Ua, AdminNothingNew) => "Нових звернень немає.",
        (Lang::En, AdminNothingNew) => "There are no new submissions.",
        (Lang::Ua, AdminHeader) => "Нові звернення (відповідь: /reply <id> <текст>):",
        (Lang::En, AdminHeader) => "New submissions (answer with /reply <id> <text>):",
        (Lang::Ua, Replied) => "Відповідь надіслано.",
        (Lang::En, Replied) => "Response sent.",
        (Lang::Ua, ReplyUsage) => "Використання: /reply <id> <текст відповіді>",
        (Lang::En, ReplyUsage) => "Usage: /reply <id> <response text>",
        (Lang::Ua, AlreadyAnswered) => "На це звернення вже надано відповідь.",
        (Lang::En, AlreadyAnswered) => "This submission has already been answered.",
        (Lang::Ua, NotFound) => "Звернення не знайдено.",
        (Lang::En, NotFound) => "Submission not found.",
        (Lang::Ua, Invalid) => "Повідомлення не може бути порожнім.",
        (Lang::En, Invalid) => "The message cannot be empty.",
        (Lang::Ua, TooMany) => "Забагато звернень. Спробуйте пізніше.",
        (Lang::En, TooMany) => "Too many submissions. Please try again later.",
        (Lang::Ua, Failed) => "Помилка при надсиланні звернення",
        (Lang::En, Failed) => "Error submitting feedback",
        (Lang::Ua, Unknown) => "Оберіть дію з меню.",
        (Lang::En, Unknown) => "Please choose an action from the menu.",
        (Lang::Ua, Cancelled) => "Скасовано.",
        (Lang::En, Cancelled) => "Cancelled.",
        (Lang::Ua, NewSubmissionAlert) => "Нове звернення:",
        (Lang::En, NewSubmissionAlert) => "New submission:",
        (Lang::Ua, AnswerAlert) => "Адміністратор відповів на ваше звернення:",
        (Lang::En, AnswerAlert) => "The administrator answered your submission:",
        (Lang::Ua, OpenWebApp) => "Відкрити застосунок",
        (Lang::En, OpenWebApp) => "Open the app",
    }
}

pub fn kind_label(lang: Lang, kind: SubmissionKind) -> &'static str {
    match (lang, kind) {
        (Lang::Ua, SubmissionKind::Complaint) => "Скарга",
        (Lang::Ua, SubmissionKind::Suggestion) => "Пропозиція",
        (Lang::En, SubmissionKind::Complaint) => "Complaint",
        (Lang::En, SubmissionKind::Suggestion) => "Suggestion",
    }
}

pub fn status_label(lang: Lang, status: SubmissionStatus) -> &'static str {
    match (lang, status) {
        (Lang::Ua, SubmissionStatus::New) => "Нове",
        (Lang::Ua, SubmissionStatus::Answered) => "Відповідь надано",
        (Lang::En, SubmissionStatus::New) => "New",
        (Lang::En, SubmissionStatus::Answered) => "Answered",
    }
}
