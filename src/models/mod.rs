mod audit_event;
mod submission;

pub use audit_event::AuditEvent;
pub use submission::{
    AdminResponse, NO_CONTACT_INFO, Role, Submission, SubmissionKind, SubmissionStatus,
};
