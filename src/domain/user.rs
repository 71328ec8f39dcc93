//! User domain entity and related types.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::password::HashedPassword;
use crate::config::{
    DEFAULT_USER_ENABLED, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH,
    ROLE_USER,
};

/// Persisted user account.
///
/// Created once, on successful registration.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Store-assigned identity
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: HashedPassword,
    pub enabled: bool,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// A user record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: HashedPassword,
    pub enabled: bool,
    pub role: String,
}

impl NewUser {
    /// Build a registration record with the default role, enabled.
    pub fn new(username: String, email: String, password_hash: HashedPassword) -> Self {
        Self {
            username,
            email,
            password_hash,
            enabled: DEFAULT_USER_ENABLED,
            role: ROLE_USER.to_string(),
        }
    }

    /// Attach the identity and timestamp assigned by the store.
    pub fn into_user(self, id: i64, created_at: DateTime<Utc>) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            enabled: self.enabled,
            role: self.role,
            created_at,
        }
    }
}

/// Registration input, validated before it reaches the workflow.
///
/// Absent fields deserialize as empty strings and fail the
/// "required" rules.
#[derive(Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct RegistrationRequest {
    /// Unique account name (3-50 characters)
    #[validate(
        custom(function = "username_present"),
        length(
            min = MIN_USERNAME_LENGTH,
            max = MAX_USERNAME_LENGTH,
            message = "Username must be between 3 and 50 characters"
        )
    )]
    #[schema(example = "testuser", min_length = 3, max_length = 50)]
    pub username: String,
    /// Unique email address
    #[validate(
        custom(function = "email_present"),
        email(message = "Email must be valid")
    )]
    #[schema(example = "test@example.com")]
    pub email: String,
    /// Plaintext password (minimum 6 characters), discarded after hashing
    #[validate(
        custom(function = "password_present"),
        length(
            min = MIN_PASSWORD_LENGTH,
            message = "Password must be at least 6 characters"
        )
    )]
    #[schema(example = "password123", min_length = 6)]
    pub password: String,
}

impl RegistrationRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

// Never print the plaintext password
impl std::fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn username_present(value: &str) -> Result<(), ValidationError> {
    require_present(value, "Username is required")
}

fn email_present(value: &str) -> Result<(), ValidationError> {
    require_present(value, "Email is required")
}

fn password_present(value: &str) -> Result<(), ValidationError> {
    require_present(value, "Password is required")
}

/// Reject empty and whitespace-only values.
fn require_present(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(message)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(request: &RegistrationRequest) -> Vec<String> {
        match request.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let request = RegistrationRequest::new("validuser", "valid@example.com", "validpassword123");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_username_length_bounds() {
        let min = MIN_USERNAME_LENGTH as usize;
        let max = MAX_USERNAME_LENGTH as usize;

        let short = RegistrationRequest::new("a".repeat(min - 1), "valid@example.com", "password123");
        assert_eq!(messages(&short), vec!["Username must be between 3 and 50 characters"]);

        let long = RegistrationRequest::new("a".repeat(max + 1), "valid@example.com", "password123");
        assert_eq!(messages(&long), vec!["Username must be between 3 and 50 characters"]);

        let lower = RegistrationRequest::new("a".repeat(min), "valid@example.com", "password123");
        assert!(lower.validate().is_ok());

        let upper = RegistrationRequest::new("a".repeat(max), "valid@example.com", "password123");
        assert!(upper.validate().is_ok());
    }

    #[test]
    fn test_length_limits_match_messages() {
        assert_eq!((MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH), (3, 50));
        assert_eq!(MIN_PASSWORD_LENGTH, 6);
    }

    #[test]
    fn test_blank_username_is_required() {
        let request = RegistrationRequest::new("   ", "valid@example.com", "password123");
        assert_eq!(messages(&request), vec!["Username is required"]);
    }

    #[test]
    fn test_missing_fields_are_required() {
        let request: RegistrationRequest = serde_json::from_str("{}").unwrap();
        let found = messages(&request);

        assert!(found.contains(&"Username is required".to_string()));
        assert!(found.contains(&"Email is required".to_string()));
        assert!(found.contains(&"Password is required".to_string()));
    }

    #[test]
    fn test_invalid_email() {
        let request = RegistrationRequest::new("validuser", "not-an-email", "password123");
        assert_eq!(messages(&request), vec!["Email must be valid"]);
    }

    #[test]
    fn test_short_password() {
        let min = MIN_PASSWORD_LENGTH as usize;

        let short = RegistrationRequest::new("validuser", "valid@example.com", "1".repeat(min - 1));
        assert_eq!(messages(&short), vec!["Password must be at least 6 characters"]);

        let edge = RegistrationRequest::new("validuser", "valid@example.com", "1".repeat(min));
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_password() {
        let request = RegistrationRequest::new("testuser", "test@example.com", "password123");
        let debug = format!("{:?}", request);
        assert!(debug.contains("testuser"));
        assert!(!debug.contains("password123"));
    }

    #[test]
    fn test_new_user_defaults() {
        let user = NewUser::new(
            "testuser".to_string(),
            "test@example.com".to_string(),
            HashedPassword::from_hash("encodedPassword".to_string()),
        );

        assert!(user.enabled);
        assert_eq!(user.role, "USER");
    }

    #[test]
    fn test_serialized_user_omits_hash() {
        let user = NewUser::new(
            "testuser".to_string(),
            "test@example.com".to_string(),
            HashedPassword::from_hash("encodedPassword".to_string()),
        )
        .into_user(7, Utc::now());

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["username"], "testuser");
        assert!(json.get("password_hash").is_none());
    }
}
