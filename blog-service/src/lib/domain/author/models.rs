use std::fmt;

use uuid::Uuid;

use crate::author::errors::AuthorError;
use crate::author::errors::AuthorIdError;
use crate::author::errors::PasswordPolicyError;
use crate::author::errors::UsernameError;

/// Author aggregate entity.
///
/// A registered credential holder. `password_hash` is always an Argon2id PHC
/// string produced by the service, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: AuthorId,
    pub first_name: String,
    pub last_name: String,
    pub username: Username,
    pub password_hash: String,
}

impl Author {
    /// Kind tag of author documents in the store.
    pub const KIND: &'static str = "author";
}

/// Author unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthorId(pub Uuid);

impl AuthorId {
    /// Generate a new random author ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an author ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AuthorIdError> {
        Uuid::parse_str(s)
            .map(AuthorId)
            .map_err(|e| AuthorIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AuthorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Not blank, at most 64 characters. Uniqueness is enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 64;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is empty or only whitespace
    /// * `TooLong` - Username longer than 64 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if username.trim().is_empty() {
            Err(UsernameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(username))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password that satisfies the password policy.
///
/// Only lives long enough to be hashed; its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 4;

    /// # Errors
    /// * `TooShort` - Password shorter than 4 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

fn required(value: String, field: &'static str) -> Result<String, AuthorError> {
    if value.trim().is_empty() {
        Err(AuthorError::MissingField(field))
    } else {
        Ok(value)
    }
}

/// Command to register a new author with validated fields
#[derive(Debug)]
pub struct RegisterAuthorCommand {
    pub first_name: String,
    pub last_name: String,
    pub username: Username,
    pub password: Password,
}

impl RegisterAuthorCommand {
    /// Validate raw registration input.
    ///
    /// # Errors
    /// * `MissingField` - First or last name is empty
    /// * `InvalidUsername` - Username is empty or too long
    /// * `InvalidPassword` - Password is shorter than the minimum
    pub fn new(
        first_name: String,
        last_name: String,
        username: String,
        password: String,
    ) -> Result<Self, AuthorError> {
        Ok(Self {
            first_name: required(first_name, "firstname")?,
            last_name: required(last_name, "lastname")?,
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }
}

/// Command to update an existing author.
///
/// All fields are optional; only provided fields are changed, each one
/// independently of the others.
#[derive(Debug, Default)]
pub struct UpdateAuthorCommand {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<Username>,
    pub password: Option<Password>,
}

impl UpdateAuthorCommand {
    /// Validate raw update input. Empty strings count as "not provided".
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, AuthorError> {
        let provided = |value: Option<String>| value.filter(|v| !v.is_empty());

        Ok(Self {
            first_name: provided(first_name),
            last_name: provided(last_name),
            username: provided(username).map(Username::new).transpose()?,
            password: provided(password).map(Password::new).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.username.is_none()
            && self.password.is_none()
    }
}

/// Field-level changes handed to the store, password already hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<Username>,
    pub password_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_command_requires_fields() {
        let result = RegisterAuthorCommand::new(
            "Ada".to_string(),
            "Lovelace".to_string(),
            String::new(),
            "secret".to_string(),
        );
        assert!(matches!(
            result,
            Err(AuthorError::InvalidUsername(UsernameError::Empty))
        ));

        let result = RegisterAuthorCommand::new(
            " ".to_string(),
            "Lovelace".to_string(),
            "ada".to_string(),
            "secret".to_string(),
        );
        assert!(matches!(result, Err(AuthorError::MissingField("firstname"))));
    }

    #[test]
    fn test_blank_username_rejected() {
        assert_eq!(Username::new("   ".to_string()), Err(UsernameError::Empty));
        assert_eq!(Username::new("\t\n".to_string()), Err(UsernameError::Empty));
        assert!(Username::new("ada".to_string()).is_ok());

        let result = UpdateAuthorCommand::new(None, None, Some("  ".to_string()), None);
        assert!(matches!(
            result,
            Err(AuthorError::InvalidUsername(UsernameError::Empty))
        ));
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(matches!(
            Password::new("abc".to_string()),
            Err(PasswordPolicyError::TooShort { min: 4, actual: 3 })
        ));
        assert!(Password::new("abcd".to_string()).is_ok());
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("hunter22".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("hunter22"));
    }

    #[test]
    fn test_update_command_treats_empty_as_absent() {
        let command = UpdateAuthorCommand::new(
            Some(String::new()),
            None,
            Some("grace".to_string()),
            Some(String::new()),
        )
        .unwrap();

        assert!(command.first_name.is_none());
        assert_eq!(command.username.as_ref().map(Username::as_str), Some("grace"));
        assert!(command.password.is_none());
        assert!(!command.is_empty());
    }

    #[test]
    fn test_update_command_rejects_short_password() {
        let result = UpdateAuthorCommand::new(None, None, None, Some("abc".to_string()));
        assert!(matches!(result, Err(AuthorError::InvalidPassword(_))));
    }

    #[test]
    fn test_author_id_round_trip() {
        let id = AuthorId::new();
        assert_eq!(AuthorId::from_string(&id.to_string()), Ok(id));
        assert!(AuthorId::from_string("not-a-uuid").is_err());
    }
}
