//! # Directory Capability Traits
//!
//! The engine never talks HTTP. It sees each directory through one of the
//! traits below; the client crates implement them over the wire and
//! `memory` (behind the `test-util` feature) implements them in-process for
//! tests.
//!
//! ## Contract
//!
//! - All calls are blocking and bounded by the implementation's per-call
//!   timeout.
//! - Any non-2xx answer surfaces as [`DirectoryError::Remote`] with the body
//!   verbatim. Implementations do not retry.
//! - "Not found" on a single-record lookup is `Ok(None)`, not an error.
//! - Traits are object-safe and `Send + Sync`, so the engine can hold them as
//!   `&dyn` or `Arc<dyn>`.

#[cfg(any(test, feature = "test-util"))]
pub mod memory;

use crate::error::DirectoryError;
use crate::filter::EmployeeFilter;
use crate::identity::{ChatAccountId, EmployeeId};
use crate::paging::{PageRequest, Paged};
use crate::record::{
    ChatAccount, ChatAccountDraft, CustomFieldSpec, EmployeeDraft, EmployeePatch,
    EmployeeRecord, LoginUser, LoginUserDraft, TemporaryCredentials,
};

/// The HR-side employee directory.
pub trait EmployeeDirectory: Send + Sync {
    /// Enumerate every employee matching `filter`, following pagination to
    /// the end or to the implementation's page ceiling.
    fn list_employees(&self, filter: &EmployeeFilter) -> Result<Paged<EmployeeRecord>, DirectoryError>;

    /// Look up one employee by company e-mail. When the remote holds several
    /// records with the same e-mail the first one wins.
    fn find_employee_by_email(&self, email: &str) -> Result<Option<EmployeeRecord>, DirectoryError>;

    /// Create an employee and return the id assigned by the HR system.
    fn create_employee(&self, draft: &EmployeeDraft) -> Result<EmployeeId, DirectoryError>;

    /// Apply a partial update. Only the fields carried by `patch` are sent.
    fn update_employee(&self, id: &EmployeeId, patch: &EmployeePatch) -> Result<(), DirectoryError>;

    /// Create the custom field unless it already exists.
    fn ensure_custom_field(&self, spec: &CustomFieldSpec) -> Result<(), DirectoryError>;

    /// Create the role profile granting `roles` unless it already exists.
    /// An existing profile is left as it is.
    fn ensure_role_profile(&self, name: &str, roles: &[String]) -> Result<(), DirectoryError>;

    /// Look up the HR system's own login user for `email`.
    fn find_login_user_by_email(&self, email: &str) -> Result<Option<LoginUser>, DirectoryError>;

    /// Create an HR login user.
    fn create_login_user(&self, draft: &LoginUserDraft) -> Result<LoginUser, DirectoryError>;

    /// Count employees matching `filter`.
    fn count_employees(&self, filter: &EmployeeFilter) -> Result<u64, DirectoryError>;

    /// Human-readable name of this implementation, used in logs and errors.
    fn directory_name(&self) -> &str;
}

/// The chat-side account directory.
pub trait ChatDirectory: Send + Sync {
    /// One page of active accounts.
    fn list_active_accounts(&self, page: PageRequest) -> Result<Vec<ChatAccount>, DirectoryError>;

    /// Fetch an account by id.
    fn get_account(&self, id: &ChatAccountId) -> Result<Option<ChatAccount>, DirectoryError>;

    /// Exact lookup by e-mail.
    fn find_by_email(&self, email: &str) -> Result<Option<ChatAccount>, DirectoryError>;

    /// Exact lookup by username.
    fn find_by_username(&self, username: &str) -> Result<Option<ChatAccount>, DirectoryError>;

    /// Fuzzy search over e-mail, username and names. Best-effort only; the
    /// caller must re-check whatever it gets back.
    fn search_by_term(&self, term: &str, limit: usize) -> Result<Vec<ChatAccount>, DirectoryError>;

    /// Create an account. A username collision is reported as
    /// [`DirectoryError::UsernameTaken`].
    fn create_account(&self, draft: &ChatAccountDraft) -> Result<ChatAccount, DirectoryError>;

    /// Human-readable name of this implementation.
    fn directory_name(&self) -> &str;
}

/// Out-of-band delivery of temporary credentials to a new account holder.
pub trait CredentialDelivery: Send + Sync {
    /// Deliver `credentials` to the owner of `account`.
    fn deliver(&self, account: &ChatAccount, credentials: &TemporaryCredentials) -> Result<(), DirectoryError>;
}
