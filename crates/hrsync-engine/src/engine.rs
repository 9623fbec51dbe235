//! # Sync Engine
//!
//! [`SyncEngine`] wires one immutable [`SyncConfig`] snapshot to the three
//! collaborators a run needs and executes runs one direction at a time.
//!
//! ## Run lifecycle
//!
//! 1. Start the deadline clock.
//! 2. Ensure the HR-side schema ([`crate::bootstrap`]). Failure is fatal.
//! 3. Enumerate the source directory. Failure is fatal.
//! 4. For each source record: check the deadline, then run the direction's
//!    match/decide/write state machine and append its report.
//! 5. Return the finished [`SyncResult`], marked `timed_out` when step 4
//!    was cut short.

use std::sync::Arc;
use std::time::Duration;

use hrsync_core::{
    ChatDirectory, CredentialDelivery, EmployeeDirectory, SyncDirection, SyncResult,
};

use crate::bootstrap;
use crate::config::SyncConfig;
use crate::deadline::Deadline;
use crate::error::SyncError;
use crate::{chat_to_hr, hr_to_chat};

/// Everything a direction needs while walking its source.
pub(crate) struct RunContext<'a> {
    pub(crate) config: &'a SyncConfig,
    pub(crate) hr: &'a dyn EmployeeDirectory,
    pub(crate) chat: &'a dyn ChatDirectory,
    pub(crate) delivery: &'a dyn CredentialDelivery,
    pub(crate) deadline: Deadline,
}

impl RunContext<'_> {
    /// Emit a progress event every `progress_every` records.
    pub(crate) fn progress(&self, processed: usize, total: usize) {
        let every = self.config.progress_every;
        if every == 0 || processed == 0 || processed % every != 0 {
            return;
        }
        let percent = if total == 0 {
            100.0
        } else {
            processed as f64 * 100.0 / total as f64
        };
        tracing::info!(
            processed,
            total,
            percent = %format!("{percent:.1}"),
            elapsed_ms = self.deadline.elapsed().as_millis() as u64,
            "sync progress"
        );
    }
}

/// The reconciliation engine.
pub struct SyncEngine<'a> {
    config: Arc<SyncConfig>,
    hr: &'a dyn EmployeeDirectory,
    chat: &'a dyn ChatDirectory,
    delivery: &'a dyn CredentialDelivery,
}

impl<'a> SyncEngine<'a> {
    /// Build an engine over the given collaborators. The config is validated
    /// once here and never re-read.
    pub fn new(
        config: impl Into<Arc<SyncConfig>>,
        hr: &'a dyn EmployeeDirectory,
        chat: &'a dyn ChatDirectory,
        delivery: &'a dyn CredentialDelivery,
    ) -> Result<Self, SyncError> {
        let config = config.into();
        config.validate()?;
        Ok(Self {
            config,
            hr,
            chat,
            delivery,
        })
    }

    /// The config snapshot this engine runs with.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run `direction` with its configured deadline.
    pub fn run(&self, direction: SyncDirection) -> Result<SyncResult, SyncError> {
        self.run_with_deadline(direction, self.config.max_duration(direction))
    }

    /// Run `direction` with an explicit deadline.
    pub fn run_with_deadline(
        &self,
        direction: SyncDirection,
        max_duration: Duration,
    ) -> Result<SyncResult, SyncError> {
        let ctx = RunContext {
            config: &self.config,
            hr: self.hr,
            chat: self.chat,
            delivery: self.delivery,
            deadline: Deadline::start(max_duration),
        };

        tracing::info!(
            %direction,
            hr = self.hr.directory_name(),
            chat = self.chat.directory_name(),
            max_duration_secs = max_duration.as_secs(),
            "sync started"
        );

        bootstrap::ensure_schema(self.hr, &self.config, direction)?;

        let result = match direction {
            SyncDirection::HrToChat => hr_to_chat::run(&ctx)?,
            SyncDirection::ChatToHr => chat_to_hr::run(&ctx)?,
        };

        tracing::info!(
            %direction,
            processed = result.total_processed,
            already_linked = result.counts.already_linked,
            linked = result.counts.linked,
            created = result.counts.created,
            skipped = result.counts.skipped,
            failed = result.counts.failed,
            login_users_created = result.login_users_created,
            deliveries_failed = result.credential_deliveries_failed,
            timed_out = result.timed_out,
            elapsed_ms = result.elapsed_ms,
            "sync finished"
        );
        Ok(result)
    }
}

impl std::fmt::Debug for SyncEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("config", &self.config)
            .field("hr", &self.hr.directory_name())
            .field("chat", &self.chat.directory_name())
            .finish()
    }
}
