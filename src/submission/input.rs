use crate::error::AppError;
use crate::models::{NO_CONTACT_INFO, SubmissionKind};

pub const MAX_MESSAGE_CHARS: usize = 4000;
pub const MAX_RESPONSE_CHARS: usize = 4000;

/// A validated submission payload, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionInput {
    pub kind: SubmissionKind,
    pub message: String,
    pub contact_info: String,
}

impl SubmissionInput {
    pub fn validate(
        kind: Option<&str>,
        message: Option<&str>,
        contact_info: Option<&str>,
    ) -> Result<Self, AppError> {
        let kind = kind
            .and_then(SubmissionKind::parse)
            .ok_or_else(|| {
                AppError::BadRequest("type must be 'complaint' or 'suggestion'".to_string())
            })?;

        let message = message.unwrap_or_default();
        if message.trim().is_empty() {
            return Err(AppError::BadRequest("message is required".to_string()));
        }
        reject_nul("message", message)?;
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AppError::BadRequest(format!(
                "message must be at most {MAX_MESSAGE_CHARS} characters"
            )));
        }

        if let Some(contact) = contact_info {
            reject_nul("contactInfo", contact)?;
        }

        Ok(Self {
            kind,
            message: message.to_string(),
            contact_info: contact_or_default(contact_info),
        })
    }
}

/// Postgres text cannot hold U+0000.
fn reject_nul(field: &str, value: &str) -> Result<(), AppError> {
    if value.contains('\0') {
        return Err(AppError::BadRequest(format!(
            "{field} must not contain NUL characters"
        )));
    }
    Ok(())
}

fn contact_or_default(contact_info: Option<&str>) -> String {
    match contact_info.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => NO_CONTACT_INFO.to_string(),
    }
}

pub fn validate_response_text(text: Option<&str>) -> Result<String, AppError> {
    let text = text.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(AppError::BadRequest("response is required".to_string()));
    }
    reject_nul("response", text)?;
    if text.chars().count() > MAX_RESPONSE_CHARS {
        return Err(AppError::BadRequest(format!(
            "response must be at most {MAX_RESPONSE_CHARS} characters"
        )));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_contact_gets_the_placeholder() {
        let input =
            SubmissionInput::validate(Some("complaint"), Some("broken heater"), Some("  ")).unwrap();
        assert_eq!(input.contact_info, "No contact information");
        assert_eq!(input.kind, SubmissionKind::Complaint);

        let input = SubmissionInput::validate(Some("suggestion"), Some("more chairs"), None).unwrap();
        assert_eq!(input.contact_info, "No contact information");
    }

    #[test]
    fn message_is_kept_verbatim() {
        let input =
            SubmissionInput::validate(Some("complaint"), Some(" spaced out "), Some("@me")).unwrap();
        assert_eq!(input.message, " spaced out ");
        assert_eq!(input.contact_info, "@me");
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(matches!(
            SubmissionInput::validate(Some("praise"), Some("nice"), None),
            Err(AppError::BadRequest(_))
        ));
        assert!(SubmissionInput::validate(None, Some("nice"), None).is_err());
    }

    #[test]
    fn type_is_case_insensitive() {
        let input = SubmissionInput::validate(Some("Suggestion"), Some("x"), None).unwrap();
        assert_eq!(input.kind, SubmissionKind::Suggestion);
    }

    #[test]
    fn empty_or_whitespace_message_is_rejected() {
        assert!(SubmissionInput::validate(Some("complaint"), Some(""), None).is_err());
        assert!(SubmissionInput::validate(Some("complaint"), Some(" \n\t"), None).is_err());
        assert!(SubmissionInput::validate(Some("complaint"), None, None).is_err());
    }

    #[test]
    fn oversized_message_is_rejected() {
        let long = "a".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(SubmissionInput::validate(Some("complaint"), Some(&long), None).is_err());
    }

    #[test]
    fn nul_characters_are_rejected() {
        assert!(matches!(
            SubmissionInput::validate(Some("complaint"), Some("heater\0broken"), None),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            SubmissionInput::validate(Some("complaint"), Some("heater"), Some("@u\0")),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate_response_text(Some("fixed\0")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn response_text_must_not_be_blank() {
        assert!(validate_response_text(Some("   ")).is_err());
        assert!(validate_response_text(None).is_err());
        assert_eq!(
            validate_response_text(Some(" fixed ")).unwrap(),
            "fixed".to_string()
        );
    }
}
