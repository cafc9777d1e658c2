//! User entity - a forum account
//!
//! A `User` can only be obtained through [`User::register`] or [`User::restore`],
//! both of which run the full rule set, so an instance is always valid.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::value_objects::ProfileChanges;

pub const EMAIL_MAX_LEN: usize = 255;
pub const NAME_MAX_LEN: usize = 100;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// User entity
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Plain-text candidate before hashing, PHC/bcrypt hash afterwards
    password: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Every stored column of a user, used to rebuild the entity
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a brand new account from sign-up input
    ///
    /// # Errors
    /// Returns `DomainError::Validation` naming the first field that breaks a rule
    pub fn register(
        id: Uuid,
        email: impl Into<String>,
        password: impl Into<String>,
        name: Option<String>,
    ) -> Result<Self, DomainError> {
        let email = email.into();
        let password = password.into();

        validate_email(&email)?;
        validate_password(&password)?;
        validate_name(name.as_deref())?;

        let now = Utc::now();
        Ok(Self {
            id,
            email,
            password,
            name,
            bio: None,
            avatar: None,
            email_verified: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a stored account
    ///
    /// # Errors
    /// Returns `DomainError::Validation` if the stored data breaks a rule
    pub fn restore(record: UserRecord) -> Result<Self, DomainError> {
        validate_email(&record.email)?;
        validate_password(&record.password_hash)?;
        validate_name(record.name.as_deref())?;

        Ok(Self {
            id: record.id,
            email: record.email,
            password: record.password_hash,
            name: record.name,
            bio: record.bio,
            avatar: record.avatar,
            email_verified: record.email_verified,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// The stored password value
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Check whether the password has been hashed yet
    pub fn has_hashed_password(&self) -> bool {
        is_password_hash(&self.password)
    }

    /// Swap the plain-text candidate for its hash
    ///
    /// # Errors
    /// Returns a validation error if `hash` is not a recognized hash format
    pub fn with_password_hash(mut self, hash: String) -> Result<Self, DomainError> {
        if !is_password_hash(&hash) {
            return Err(DomainError::validation(
                "password",
                "Password hash format is not recognized",
            ));
        }
        self.password = hash;
        Ok(self)
    }

    /// Name to show publicly, falling back to the email's local part
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }

    /// Apply profile changes after validating the merged result
    ///
    /// # Errors
    /// Returns a validation error if the resulting name breaks a rule
    pub fn apply_profile_changes(&mut self, changes: ProfileChanges) -> Result<(), DomainError> {
        let name = changes.name.apply(self.name.clone());
        validate_name(name.as_deref())?;

        self.name = name;
        self.bio = changes.bio.apply(self.bio.clone());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Update the avatar URL
    pub fn set_avatar(&mut self, avatar: Option<String>) {
        self.avatar = avatar;
        self.updated_at = Utc::now();
    }

    /// Mark the email address as verified
    pub fn verify_email(&mut self) {
        self.email_verified = true;
        self.updated_at = Utc::now();
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("name", &self.name)
            .field("bio", &self.bio)
            .field("avatar", &self.avatar)
            .field("email_verified", &self.email_verified)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Validate an email address
///
/// Equivalent to `^[^\s@]+@[^\s@]+\.[^\s@]+$` with a length cap.
///
/// # Errors
/// Returns a validation error on the `email` field
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.trim().is_empty() {
        return Err(DomainError::validation("email", "Email is required"));
    }

    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(DomainError::validation(
            "email",
            format!("Email cannot exceed {EMAIL_MAX_LEN} characters"),
        ));
    }

    let invalid = || DomainError::validation("email", "Email format is invalid");

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    // Some dot in the domain must have at least one character on each side
    let len = domain.len();
    let has_inner_dot = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < len);
    if !has_inner_dot {
        return Err(invalid());
    }

    Ok(())
}

/// Validate a password candidate
///
/// Already-hashed values are accepted as-is.
///
/// # Errors
/// Returns a validation error on the `password` field
pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.trim().is_empty() {
        return Err(DomainError::validation("password", "Password is required"));
    }

    if is_password_hash(password) {
        return Ok(());
    }

    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(DomainError::validation(
            "password",
            format!("Password must be at least {PASSWORD_MIN_LEN} characters long"),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(DomainError::validation(
            "password",
            "Password must contain at least one uppercase letter",
        ));
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(DomainError::validation(
            "password",
            "Password must contain at least one lowercase letter",
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation(
            "password",
            "Password must contain at least one digit",
        ));
    }

    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        return Err(DomainError::validation(
            "password",
            format!("Password must contain at least one special character ({PASSWORD_SPECIAL_CHARS})"),
        ));
    }

    Ok(())
}

/// Validate an optional display name
///
/// # Errors
/// Returns a validation error on the `name` field
pub fn validate_name(name: Option<&str>) -> Result<(), DomainError> {
    match name {
        Some(name) if name.chars().count() > NAME_MAX_LEN => Err(DomainError::validation(
            "name",
            format!("Name cannot exceed {NAME_MAX_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

/// Recognize a stored password hash
///
/// Accepts Argon2 PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`)
/// and bcrypt strings (`$2b$12$` followed by 53 characters).
pub fn is_password_hash(value: &str) -> bool {
    is_argon2_phc(value) || is_bcrypt(value)
}

fn is_argon2_phc(value: &str) -> bool {
    let parts: Vec<&str> = value.split('$').collect();
    let ["", algorithm, version, params, salt, hash] = parts.as_slice() else {
        return false;
    };

    let is_b64 = |s: &str| {
        !s.is_empty()
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/')
    };

    matches!(*algorithm, "argon2id" | "argon2i" | "argon2d")
        && version
            .strip_prefix("v=")
            .is_some_and(|v| !v.is_empty() && v.chars().all(|c| c.is_ascii_digit()))
        && params.split(',').count() == 3
        && params.starts_with("m=")
        && is_b64(salt)
        && is_b64(hash)
}

fn is_bcrypt(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 60
        && value.is_ascii()
        && bytes[0] == b'$'
        && bytes[1] == b'2'
        && matches!(bytes[2], b'a' | b'b' | b'y')
        && bytes[3] == b'$'
        && bytes[4].is_ascii_digit()
        && bytes[5].is_ascii_digit()
        && bytes[6] == b'$'
}
