//! # Directory Records
//!
//! Typed records for both directories and the payloads used to write them.
//!
//! Remote documents carry many optional, nullable fields. Each record models
//! them as explicit `Option`s and tolerates `null`, absent keys and blank
//! strings alike, so a legacy HR record with `"custom_chat_id": ""` decodes to
//! an unlinked employee rather than an error.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use zeroize::Zeroizing;

use crate::identity::{ChatAccountId, EmployeeId, MatchKey};

/// Name of the HR-side custom field holding the linked chat account id.
pub const CROSS_REFERENCE_FIELD: &str = "custom_chat_id";

/// HR document type holding employee records.
pub const EMPLOYEE_DOCTYPE: &str = "Employee";

// -- Wire helpers -------------------------------------------------------------

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    match blank_as_none(deserializer)? {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid date `{raw}`: {e}"))),
    }
}

fn blank_chat_id_as_none<'de, D>(deserializer: D) -> Result<Option<ChatAccountId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(blank_as_none(deserializer)?.and_then(|raw| ChatAccountId::new(raw).ok()))
}

fn int_as_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }
    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(i)) => i != 0,
        None => false,
    })
}

fn default_true() -> bool {
    true
}

// -- HR side ------------------------------------------------------------------

/// Employment status of an HR record.
///
/// Only [`EmployeeStatus::Active`] records take part in reconciliation.
/// Statuses this crate does not know are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmployeeStatus {
    /// Currently employed.
    Active,
    /// Not currently employed.
    Inactive,
    /// Temporarily suspended.
    Suspended,
    /// Has left the organization.
    Left,
    /// Any other status string reported by the HR system.
    Other(String),
}

impl EmployeeStatus {
    /// True for [`EmployeeStatus::Active`].
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// The wire name of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Suspended => "Suspended",
            Self::Left => "Left",
            Self::Other(s) => s,
        }
    }
}

impl Default for EmployeeStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for EmployeeStatus {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Active" => Self::Active,
            "Inactive" => Self::Inactive,
            "Suspended" => Self::Suspended,
            "Left" => Self::Left,
            _ => Self::Other(raw),
        }
    }
}

impl From<EmployeeStatus> for String {
    fn from(status: EmployeeStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Other(s) if s.trim().is_empty() => f.write_str("Unknown"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// An employee record as stored by the HR system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Record identifier (the HR document `name`).
    #[serde(rename = "name")]
    pub id: EmployeeId,
    /// Company e-mail; the matching key. Blank values decode to `None`.
    #[serde(rename = "company_email", default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    /// Given name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    /// Family name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    /// Gender as recorded by HR.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gender: Option<String>,
    /// Date of birth.
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub date_of_birth: Option<NaiveDate>,
    /// Date of joining.
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub date_of_joining: Option<NaiveDate>,
    /// Employment status.
    #[serde(default)]
    pub status: EmployeeStatus,
    /// Linked chat account, if any. The wire empty string means unlinked.
    #[serde(
        rename = "custom_chat_id",
        default,
        deserialize_with = "blank_chat_id_as_none"
    )]
    pub chat_account_id: Option<ChatAccountId>,
}

impl EmployeeRecord {
    /// The record's match key, if it has a usable e-mail.
    pub fn match_key(&self) -> Option<MatchKey> {
        self.email.as_deref().and_then(MatchKey::parse)
    }

    /// "First Last", trimmed, falling back to the record id.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.id.to_string()
        } else {
            full.to_string()
        }
    }
}

/// Payload for creating an employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeDraft {
    /// Company e-mail.
    #[serde(rename = "company_email")]
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Gender.
    pub gender: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Date of joining.
    pub date_of_joining: NaiveDate,
    /// Employment status.
    pub status: EmployeeStatus,
    /// Chat account to link on creation.
    #[serde(rename = "custom_chat_id")]
    pub chat_account_id: ChatAccountId,
}

/// Partial update of an employee record.
///
/// The only field this engine ever writes on an existing HR record is the
/// cross-reference, so the patch can carry nothing else. Serializes to a
/// single-key object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeePatch {
    #[serde(rename = "custom_chat_id")]
    chat_account_id: ChatAccountId,
}

impl EmployeePatch {
    /// Patch that points the employee at `account`.
    pub fn link(account: ChatAccountId) -> Self {
        Self {
            chat_account_id: account,
        }
    }

    /// The chat account the patch links to.
    pub fn chat_account_id(&self) -> &ChatAccountId {
        &self.chat_account_id
    }
}

/// Definition of a custom field the engine needs on the HR side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFieldSpec {
    /// Field name (`fieldname`).
    pub fieldname: String,
    /// Label shown in the HR UI.
    pub label: String,
    /// Document type the field is attached to.
    pub doctype: String,
    /// Field type (`Data`, `Link`, ...).
    pub fieldtype: String,
    /// Whether the field is mandatory.
    pub required: bool,
    /// Field after which the new field is inserted.
    pub insert_after: String,
}

impl CustomFieldSpec {
    /// The cross-reference field on the employee doctype.
    pub fn cross_reference(label: impl Into<String>) -> Self {
        Self {
            fieldname: CROSS_REFERENCE_FIELD.to_string(),
            label: label.into(),
            doctype: EMPLOYEE_DOCTYPE.to_string(),
            fieldtype: "Data".to_string(),
            required: false,
            insert_after: "employee_name".to_string(),
        }
    }
}

/// A login account in the HR system itself (not an employee record).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginUser {
    /// Login user id (the HR document `name`).
    #[serde(rename = "name")]
    pub id: String,
    /// E-mail address.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    /// Username.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub username: Option<String>,
    /// Whether the login is enabled (wire `0`/`1`).
    #[serde(default, deserialize_with = "int_as_bool")]
    pub enabled: bool,
    /// Assigned role profile.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub role_profile_name: Option<String>,
}

/// Payload for creating an HR login user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginUserDraft {
    /// E-mail address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Username.
    pub username: String,
    /// Whether the login starts enabled.
    pub enabled: bool,
    /// Role profile to assign.
    pub role_profile_name: String,
    /// Whether the HR system should send its own welcome e-mail.
    pub send_welcome_email: bool,
}

// -- Chat side ----------------------------------------------------------------

/// A chat platform account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAccount {
    /// Platform-assigned id.
    pub id: ChatAccountId,
    /// E-mail address.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    /// Username.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    /// Given name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    /// Family name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    /// Whether the account may log in.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether the account is a bot.
    #[serde(default)]
    pub is_bot: bool,
    /// Soft-delete timestamp in epoch milliseconds; zero while alive.
    #[serde(default)]
    pub delete_at: i64,
}

impl ChatAccount {
    /// True when the account is neither soft-deleted nor disabled.
    pub fn is_alive(&self) -> bool {
        self.delete_at == 0 && self.enabled
    }

    /// True when the account's e-mail matches `email` case-insensitively.
    pub fn email_matches(&self, email: &str) -> bool {
        MatchKey::parse(&self.email).is_some_and(|k| k.matches(email))
    }

    /// The account's match key, if it has a usable e-mail.
    pub fn match_key(&self) -> Option<MatchKey> {
        MatchKey::parse(&self.email)
    }
}

/// Payload for creating a chat account.
#[derive(Clone, PartialEq, Eq)]
pub struct ChatAccountDraft {
    /// E-mail address.
    pub email: String,
    /// Requested username.
    pub username: String,
    /// Initial password.
    pub password: Zeroizing<String>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Whether the e-mail is already verified.
    pub email_verified: bool,
}

impl std::fmt::Debug for ChatAccountDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatAccountDraft")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email_verified", &self.email_verified)
            .finish()
    }
}

/// Credentials handed to a newly created account holder.
#[derive(Clone)]
pub struct TemporaryCredentials {
    /// Username of the new account.
    pub username: String,
    /// Temporary password.
    pub password: Zeroizing<String>,
}

impl std::fmt::Debug for TemporaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemporaryCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
