//! User entity and its inputs.

use super::validation::{require_email, require_text, ValidationError};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Persisted user row.
///
/// `email` is unique across all users; the store enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Epoch ms, set once at insert.
    pub created_at: i64,
    /// Epoch ms, refreshed on every successful update.
    pub updated_at: i64,
}

/// Input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_email(&self.email)
    }
}

/// Partial update for a user; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(email) = &self.email {
            require_email(email)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{NewUser, User, UserPatch};
    use crate::model::validation::ValidationError;

    #[test]
    fn new_user_validation_checks_name_then_email() {
        assert!(NewUser::new("Alice", "a@x.com").validate().is_ok());
        assert_eq!(
            NewUser::new(" ", "bad").validate(),
            Err(ValidationError::BlankField("name"))
        );
        assert!(matches!(
            NewUser::new("Alice", "bad").validate(),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn patch_only_validates_present_fields() {
        assert!(UserPatch::default().is_empty());
        assert!(UserPatch::default().validate().is_ok());

        let patch = UserPatch {
            email: Some("nope".to_string()),
            ..UserPatch::default()
        };
        assert!(!patch.is_empty());
        assert!(patch.validate().is_err());
    }

    #[test]
    fn inputs_deserialize_from_request_json_and_skip_absent_fields() {
        let input: NewUser = serde_json::from_str(r#"{"name": "Alice", "email": "a@x.com"}"#).unwrap();
        assert_eq!(input, NewUser::new("Alice", "a@x.com"));

        let patch: UserPatch = serde_json::from_str(r#"{"name": "X"}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("X"));
        assert!(patch.email.is_none());
        assert_eq!(serde_json::to_value(&patch).unwrap(), serde_json::json!({"name": "X"}));
    }

    #[test]
    fn user_serializes_with_camel_case_timestamps() {
        let user = User {
            id: 1,
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            created_at: 10,
            updated_at: 20,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["createdAt"], 10);
        assert_eq!(json["updatedAt"], 20);
        assert!(json.get("created_at").is_none());
    }
}
