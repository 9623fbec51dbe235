//! # Identity Newtypes
//!
//! Identifiers for the records of both directories, and the e-mail match key
//! that joins them.
//!
//! Both record identifiers are opaque strings assigned by their owning system
//! (ERPNext document names such as `HR-EMP-00042`, chat platform ids such as
//! `8xk3...`). They are validated only for non-emptiness: an empty string on
//! the wire means "no reference" and is decoded to `None` at the record level.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of an employee record, assigned by the HR system.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Create an employee identifier, rejecting empty or whitespace input.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier { kind: "employee id" });
        }
        Ok(Self(raw))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmployeeId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmployeeId> for String {
    fn from(id: EmployeeId) -> Self {
        id.0
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a chat account, assigned by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChatAccountId(String);

impl ChatAccountId {
    /// Create a chat account identifier, rejecting empty or whitespace input.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier {
                kind: "chat account id",
            });
        }
        Ok(Self(raw))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first `n` characters of the id, used to build fallback usernames.
    pub fn prefix(&self, n: usize) -> &str {
        match self.0.char_indices().nth(n) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl TryFrom<String> for ChatAccountId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChatAccountId> for String {
    fn from(id: ChatAccountId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChatAccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The join key between the two directories: a normalized e-mail address.
///
/// Normalization trims surrounding whitespace and lowercases ASCII letters,
/// so two keys compare equal exactly when the addresses match
/// case-insensitively. Blank addresses produce no key and are never matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey(String);

impl MatchKey {
    /// Build a match key from a raw address, or `None` if it is blank.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_ascii_lowercase()))
    }

    /// The normalized address.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `other` normalizes to this key.
    pub fn matches(&self, other: &str) -> bool {
        MatchKey::parse(other).is_some_and(|k| k == *self)
    }
}

impl std::fmt::Display for MatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
