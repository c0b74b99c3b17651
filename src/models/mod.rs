use serde::{Deserialize, Serialize};
use std::fmt;

/// One card on the wall. The backend wire format is camelCase.
///
/// `id` is generated on the client when the note is composed and never
/// changes afterwards; `owner_id` and `created_at` are likewise write-once.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Note {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub body: String,
    /// RFC 3339 timestamp from the browser clock at creation.
    pub created_at: String,
}

/// Identity the external provider reports for the current session.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SessionUser {
    pub name: Option<String>,
    pub email: String,
}

impl SessionUser {
    /// Single character for the header avatar.
    pub fn initial(&self) -> String {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    }
}

/// A note draft that passed validation: both fields trimmed and non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NoteInput {
    pub title: String,
    pub body: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ValidationError {
    TitleRequired,
    BodyRequired,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TitleRequired => write!(f, "Note title is required"),
            ValidationError::BodyRequired => write!(f, "Note body is required"),
        }
    }
}

/// Gate for every mutation: whitespace-only fields never reach the cache or
/// the network.
pub(crate) fn validate_note_input(title: &str, body: &str) -> Result<NoteInput, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }

    let body = body.trim();
    if body.is_empty() {
        return Err(ValidationError::BodyRequired);
    }

    Ok(NoteInput {
        title: title.to_string(),
        body: body.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_wire_contract_camel_case() {
        let json = r#"{
            "id": "6f1f3e9a-0b0e-4f0d-9d1a-59c3f31c1a10",
            "ownerId": "u@example.com",
            "title": "A",
            "body": "b",
            "createdAt": "2026-01-02T03:04:05.000Z"
        }"#;
        let n: Note = serde_json::from_str(json).expect("note should parse");
        assert_eq!(n.owner_id, "u@example.com");
        assert_eq!(n.created_at, "2026-01-02T03:04:05.000Z");

        let v = serde_json::to_value(&n).expect("note should serialize");
        assert!(v.get("ownerId").is_some());
        assert!(v.get("createdAt").is_some());
        assert!(v.get("owner_id").is_none());
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        assert_eq!(
            validate_note_input("", "body"),
            Err(ValidationError::TitleRequired)
        );
        assert_eq!(
            validate_note_input("   ", "body"),
            Err(ValidationError::TitleRequired)
        );
    }

    #[test]
    fn test_validate_rejects_empty_body() {
        assert_eq!(
            validate_note_input("title", ""),
            Err(ValidationError::BodyRequired)
        );
        assert_eq!(
            validate_note_input("title", "\n\t "),
            Err(ValidationError::BodyRequired)
        );
    }

    #[test]
    fn test_validate_trims_fields() {
        let input = validate_note_input("  Groceries \n", "  milk, eggs  ").expect("valid input");
        assert_eq!(input.title, "Groceries");
        assert_eq!(input.body, "milk, eggs");
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::TitleRequired.to_string(),
            "Note title is required"
        );
        assert_eq!(
            ValidationError::BodyRequired.to_string(),
            "Note body is required"
        );
    }

    #[test]
    fn test_session_user_initial_prefers_name() {
        let u = SessionUser {
            name: Some("ada".to_string()),
            email: "a@example.com".to_string(),
        };
        assert_eq!(u.initial(), "A");

        let u = SessionUser {
            name: None,
            email: "bob@example.com".to_string(),
        };
        assert_eq!(u.initial(), "B");
    }
}
