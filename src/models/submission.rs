use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

pub const NO_CONTACT_INFO: &str = "No contact information";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "submission_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Complaint,
    Suggestion,
}

impl SubmissionKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "complaint" => Some(SubmissionKind::Complaint),
            "suggestion" => Some(SubmissionKind::Suggestion),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "submission_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    New,
    Answered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminResponse {
    pub text: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub user_id: String,
    pub user_role: Role,
    #[serde(rename = "type")]
    pub kind: SubmissionKind,
    pub message: String,
    pub contact_info: String,
    pub attachments: Json<Vec<String>>,
    pub status: SubmissionStatus,
    pub admin_response: Option<Json<AdminResponse>>,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn response_text(&self) -> Option<&str> {
        self.admin_response.as_ref().map(|r| r.text.as_str())
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}
