#![deny(missing_docs)]

//! # hrsync-core -- Foundational Types for hrsync
//!
//! This crate defines the types every other crate in the workspace depends on:
//! the records of the two directories being reconciled, the identifiers that
//! cross-reference them, the per-record outcomes and the run-level
//! [`SyncResult`] document, and the capability traits through which the
//! reconciliation engine talks to each directory.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** An [`EmployeeId`] can never be
//!    written where a [`ChatAccountId`] is expected, which keeps the
//!    cross-reference field honest.
//!
//! 2. **Explicit optional fields, no generic maps.** Remote payloads are
//!    modeled as structs. Partial updates go through [`EmployeePatch`], which
//!    can only carry the cross-reference field.
//!
//! 3. **Build-once results.** A [`SyncResult`] is produced only by consuming a
//!    [`SyncResultBuilder`], so a caller never sees a half-built run report.
//!
//! 4. **Blocking, object-safe directory traits.** The engine is a single
//!    sequential batch; [`EmployeeDirectory`], [`ChatDirectory`] and
//!    [`CredentialDelivery`] are plain `Send + Sync` traits with in-memory
//!    implementations in `directory::memory` (feature `test-util`).

pub mod directory;
pub mod error;
pub mod filter;
pub mod identity;
pub mod normalize;
pub mod outcome;
pub mod paging;
pub mod record;

// Re-export primary types at crate root for ergonomic imports.
pub use directory::{ChatDirectory, CredentialDelivery, EmployeeDirectory};
pub use error::{DirectoryError, ValidationError};
pub use filter::{EmployeeFilter, FilterTriple};
pub use identity::{ChatAccountId, EmployeeId, MatchKey};
pub use normalize::{generate_password, random_token, slugify, username_with_suffix};
pub use outcome::{
    RecordReport, SkipReason, SyncCounts, SyncDirection, SyncOutcome, SyncResult,
    SyncResultBuilder,
};
pub use paging::{collect_pages, PageRequest, Paged};
pub use record::{
    ChatAccount, ChatAccountDraft, CustomFieldSpec, EmployeeDraft, EmployeePatch, EmployeeRecord,
    EmployeeStatus, LoginUser, LoginUserDraft, TemporaryCredentials, CROSS_REFERENCE_FIELD,
    EMPLOYEE_DOCTYPE,
};
