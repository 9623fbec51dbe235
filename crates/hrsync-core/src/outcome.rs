//! # Sync Outcomes and the Run Report
//!
//! Every source record processed by a run ends in exactly one
//! [`SyncOutcome`]. Outcomes accumulate in a [`SyncResultBuilder`] owned by the
//! run; the builder is consumed by [`SyncResultBuilder::finish`] or
//! [`SyncResultBuilder::finish_timed_out`] to produce the [`SyncResult`]
//! returned to the caller. There is no way to read a result before the run
//! has finished with it.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::ChatAccountId;

/// Which directory drives a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncDirection {
    /// HR employees drive chat account creation and linking.
    HrToChat,
    /// Chat accounts drive HR employee creation and linking.
    ChatToHr,
}

impl SyncDirection {
    /// The kebab-case name used on the command line and in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HrToChat => "hr-to-chat",
            Self::ChatToHr => "chat-to-hr",
        }
    }
}

impl std::fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SyncDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hr-to-chat" | "erp-to-mm" => Ok(Self::HrToChat),
            "chat-to-hr" | "mm-to-erp" => Ok(Self::ChatToHr),
            _ => Err(ValidationError::UnknownDirection(s.to_string())),
        }
    }
}

/// Why a source record was skipped without touching the write path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The record has no usable e-mail.
    NoEmail,
    /// The HR record is not Active.
    Inactive {
        /// The status the record carried.
        status: String,
    },
    /// The chat account is a bot.
    Bot,
    /// The chat account is soft-deleted or disabled.
    Deleted,
    /// The matching HR record is already linked to another live account.
    LinkedElsewhere {
        /// The account the HR record points at.
        account: ChatAccountId,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoEmail => f.write_str("No Email"),
            Self::Inactive { status } => write!(f, "Inactive: {status}"),
            Self::Bot => f.write_str("Bot"),
            Self::Deleted => f.write_str("Deleted"),
            Self::LinkedElsewhere { account } => write!(f, "Linked To Other Account {account}"),
        }
    }
}

/// Final state of one source record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The cross-reference was already set and still valid.
    AlreadyLinked,
    /// An existing counterpart was found and the cross-reference written.
    Linked,
    /// A counterpart was created and the cross-reference written.
    Created,
    /// The record was not eligible.
    Skipped(SkipReason),
    /// A remote call failed; the reason is kept for the audit trail.
    Failed(String),
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyLinked => f.write_str("Already Linked"),
            Self::Linked => f.write_str("Linked"),
            Self::Created => f.write_str("Created"),
            Self::Skipped(reason) => write!(f, "Skipped ({reason})"),
            Self::Failed(reason) => write!(f, "Failed: {reason}"),
        }
    }
}

/// The structured twin of one human-readable result line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordReport {
    /// Id of the source record.
    pub source_id: String,
    /// Display label (name or username).
    pub subject: String,
    /// E-mail of the source record, if any.
    pub email: Option<String>,
    /// Final outcome.
    pub outcome: SyncOutcome,
    /// Extra detail that does not change the outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RecordReport {
    /// Build a report without a note.
    pub fn new(
        source_id: impl Into<String>,
        subject: impl Into<String>,
        email: Option<&str>,
        outcome: SyncOutcome,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            subject: subject.into(),
            email: email.map(str::to_string),
            outcome,
            note: None,
        }
    }

    /// Attach a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// The human-readable audit line for this record.
    pub fn line(&self) -> String {
        let mut line = format!(
            "{} ({}) - {}",
            self.subject,
            self.email.as_deref().unwrap_or(""),
            self.outcome
        );
        if let Some(note) = &self.note {
            line.push_str("; ");
            line.push_str(note);
        }
        line
    }
}

/// Per-outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCounts {
    /// Records already linked to a valid counterpart.
    pub already_linked: usize,
    /// Records linked to an existing counterpart during this run.
    pub linked: usize,
    /// Records for which a counterpart was created.
    pub created: usize,
    /// Ineligible records.
    pub skipped: usize,
    /// Records whose processing failed.
    pub failed: usize,
}

impl SyncCounts {
    fn add(&mut self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::AlreadyLinked => self.already_linked += 1,
            SyncOutcome::Linked => self.linked += 1,
            SyncOutcome::Created => self.created += 1,
            SyncOutcome::Skipped(_) => self.skipped += 1,
            SyncOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Number of records that reached a final outcome.
    pub fn total(&self) -> usize {
        self.already_linked + self.linked + self.created + self.skipped + self.failed
    }
}

/// The complete report of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    /// Direction of the run.
    pub direction: SyncDirection,
    /// Counters per outcome kind.
    pub counts: SyncCounts,
    /// Records that reached a final outcome.
    pub total_processed: usize,
    /// Number of records enumerated from the source directory.
    pub source_size: usize,
    /// True when source enumeration hit its page ceiling.
    pub source_truncated: bool,
    /// Structured per-record reports, in processing order.
    pub records: Vec<RecordReport>,
    /// Human-readable lines, in processing order. A timed-out run ends with
    /// one terminal `TIMEOUT` line.
    pub lines: Vec<String>,
    /// True when the run stopped at its deadline.
    pub timed_out: bool,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u64,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// HR login users created during a chat-to-HR run.
    pub login_users_created: usize,
    /// HR login users found already present during a chat-to-HR run.
    pub login_users_existing: usize,
    /// Created accounts whose credentials could not be delivered.
    pub credential_deliveries_failed: usize,
}

impl SyncResult {
    /// Run duration.
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    /// True when any record failed.
    pub fn has_failures(&self) -> bool {
        self.counts.failed > 0
    }

    /// One-line summary of the counters.
    pub fn summary(&self) -> String {
        format!(
            "Sync {} completed in {:.1?}. Total Processed: {}, Already Linked: {}, Linked: {}, Created: {}, Skipped: {}, Failed: {}, Timed Out: {}",
            self.direction,
            self.elapsed(),
            self.total_processed,
            self.counts.already_linked,
            self.counts.linked,
            self.counts.created,
            self.counts.skipped,
            self.counts.failed,
            self.timed_out
        )
    }
}

/// Append-only accumulator for one run.
#[derive(Debug)]
pub struct SyncResultBuilder {
    direction: SyncDirection,
    started_at: DateTime<Utc>,
    counts: SyncCounts,
    records: Vec<RecordReport>,
    lines: Vec<String>,
    source_size: usize,
    source_truncated: bool,
    login_users_created: usize,
    login_users_existing: usize,
    credential_deliveries_failed: usize,
}

impl SyncResultBuilder {
    /// Start accumulating a run in `direction`.
    pub fn new(direction: SyncDirection) -> Self {
        Self {
            direction,
            started_at: Utc::now(),
            counts: SyncCounts::default(),
            records: Vec::new(),
            lines: Vec::new(),
            source_size: 0,
            source_truncated: false,
            login_users_created: 0,
            login_users_existing: 0,
            credential_deliveries_failed: 0,
        }
    }

    /// Record the size of the enumerated source.
    pub fn source(&mut self, size: usize, truncated: bool) -> &mut Self {
        self.source_size = size;
        self.source_truncated = truncated;
        self
    }

    /// Append one record's final outcome.
    pub fn record(&mut self, report: RecordReport) -> &mut Self {
        self.counts.add(&report.outcome);
        self.lines.push(report.line());
        self.records.push(report);
        self
    }

    /// Count an HR login user created.
    pub fn login_user_created(&mut self) -> &mut Self {
        self.login_users_created += 1;
        self
    }

    /// Count an HR login user found already present.
    pub fn login_user_existing(&mut self) -> &mut Self {
        self.login_users_existing += 1;
        self
    }

    /// Count a failed credential delivery.
    pub fn delivery_failed(&mut self) -> &mut Self {
        self.credential_deliveries_failed += 1;
        self
    }

    /// Records appended so far.
    pub fn processed(&self) -> usize {
        self.counts.total()
    }

    /// Finish a run that processed its whole source.
    pub fn finish(self, elapsed: Duration) -> SyncResult {
        self.build(elapsed, false)
    }

    /// Finish a run cut off by its deadline, appending the terminal line.
    pub fn finish_timed_out(mut self, elapsed: Duration) -> SyncResult {
        let processed = self.processed();
        self.lines.push(format!(
            "TIMEOUT: sync stopped after processing {processed} records due to timeout"
        ));
        self.build(elapsed, true)
    }

    fn build(self, elapsed: Duration, timed_out: bool) -> SyncResult {
        SyncResult {
            direction: self.direction,
            total_processed: self.counts.total(),
            counts: self.counts,
            source_size: self.source_size,
            source_truncated: self.source_truncated,
            records: self.records,
            lines: self.lines,
            timed_out,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            started_at: self.started_at,
            finished_at: Utc::now(),
            login_users_created: self.login_users_created,
            login_users_existing: self.login_users_existing,
            credential_deliveries_failed: self.credential_deliveries_failed,
        }
    }
}
