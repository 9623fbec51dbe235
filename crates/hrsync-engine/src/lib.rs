//! # hrsync-engine -- Reconciliation Engine
//!
//! Point-in-time batch reconciliation between an HR employee directory and a
//! chat account directory. A run walks one source directory, matches each
//! record by e-mail, decides link/create/skip, writes through the directory
//! traits from [`hrsync_core`], and returns a complete [`hrsync_core::SyncResult`].
//!
//! ## Directions
//!
//! - [`SyncDirection::HrToChat`](hrsync_core::SyncDirection::HrToChat):
//!   employees drive chat account linking and creation.
//! - [`SyncDirection::ChatToHr`](hrsync_core::SyncDirection::ChatToHr):
//!   chat accounts drive employee linking and creation, plus HR login users.
//!
//! ## Failure model
//!
//! Only schema bootstrap and source enumeration abort a run ([`SyncError`]).
//! Every remote failure while handling a single record becomes that record's
//! `Failed` outcome and the run continues. The deadline is cooperative and
//! checked between records.
//!
//! Runs are single-threaded and sequential: each remote write is attributable
//! to exactly one record line.

mod bootstrap;
mod chat_to_hr;
pub mod config;
mod create;
pub mod deadline;
pub mod engine;
pub mod error;
mod hr_to_chat;

pub use config::{ConfigError, EmployeeDefaults, SyncConfig};
pub use deadline::Deadline;
pub use engine::SyncEngine;
pub use error::{BootstrapStep, SyncError};
