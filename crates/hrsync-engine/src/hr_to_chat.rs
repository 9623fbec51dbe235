//! HR → chat: every active employee ends up linked to a live chat account.
//!
//! Per employee:
//!
//! 1. No e-mail or not Active: skipped. Only Active employees are
//!    enumerated, so the status check only fires when the HR side ignores
//!    the filter.
//! 2. Cross-reference set and the account is alive with the same e-mail:
//!    already linked. Nothing else is called.
//! 3. Re-discovery by exact e-mail, then once by fuzzy term search. A live
//!    match is written as the cross-reference (linked).
//! 4. Otherwise an account is created, linked, and its credentials are
//!    delivered best-effort (created).

use hrsync_core::{
    ChatAccount, ChatDirectory, DirectoryError, EmployeeFilter, EmployeePatch, EmployeeRecord,
    EmployeeStatus, MatchKey, RecordReport, SkipReason, SyncDirection, SyncOutcome, SyncResult,
    SyncResultBuilder, TemporaryCredentials,
};

use crate::create::{provision_account, CreateAttempt};
use crate::engine::RunContext;
use crate::error::SyncError;

/// Result limit for the fuzzy re-discovery search.
const DISCOVERY_SEARCH_LIMIT: usize = 10;

pub(crate) fn run(ctx: &RunContext<'_>) -> Result<SyncResult, SyncError> {
    let mut result = SyncResultBuilder::new(SyncDirection::HrToChat);

    // Departed records must not eat into the page ceiling.
    let filter = EmployeeFilter::status(EmployeeStatus::Active.as_str());
    let employees = ctx
        .hr
        .list_employees(&filter)
        .map_err(|source| SyncError::Enumeration {
            directory: ctx.hr.directory_name().to_string(),
            source,
        })?;
    let total = employees.items.len();
    if employees.truncated {
        tracing::warn!(total, pages = employees.pages_fetched, "employee enumeration truncated");
    }
    tracing::info!(total, "employees enumerated");
    result.source(total, employees.truncated);

    for employee in &employees.items {
        if ctx.deadline.expired() {
            tracing::warn!(processed = result.processed(), total, "deadline reached, stopping");
            return Ok(result.finish_timed_out(ctx.deadline.elapsed()));
        }
        let report = reconcile(ctx, employee, &mut result);
        result.record(report);
        ctx.progress(result.processed(), total);
    }

    Ok(result.finish(ctx.deadline.elapsed()))
}

/// What re-discovery found for an e-mail.
enum Discovery {
    Live(ChatAccount),
    Unusable(SkipReason),
    NotFound,
}

fn usable(account: &ChatAccount, key: &MatchKey) -> bool {
    account.is_alive() && !account.is_bot && account.email_matches(key.as_str())
}

fn rediscover(chat: &dyn ChatDirectory, key: &MatchKey) -> Result<Discovery, DirectoryError> {
    match chat.find_by_email(key.as_str()) {
        Ok(Some(account)) if usable(&account, key) => return Ok(Discovery::Live(account)),
        Ok(Some(account)) if account.email_matches(key.as_str()) => {
            let reason = if account.is_bot {
                SkipReason::Bot
            } else {
                SkipReason::Deleted
            };
            return Ok(Discovery::Unusable(reason));
        }
        Ok(_) => tracing::debug!(email = %key, "no exact match, trying search"),
        Err(err) => tracing::warn!(email = %key, error = %err, "exact lookup failed, trying search"),
    }

    let hits = chat.search_by_term(key.as_str(), DISCOVERY_SEARCH_LIMIT)?;
    match hits.into_iter().find(|a| usable(a, key)) {
        Some(account) => {
            tracing::info!(email = %key, account = %account.id, "found account by search");
            Ok(Discovery::Live(account))
        }
        None => Ok(Discovery::NotFound),
    }
}

fn reconcile(
    ctx: &RunContext<'_>,
    employee: &EmployeeRecord,
    result: &mut SyncResultBuilder,
) -> RecordReport {
    let subject = employee.display_name();
    let email = employee.email.as_deref().map(str::trim);
    let report = |outcome| RecordReport::new(employee.id.as_str(), subject.as_str(), email, outcome);

    let (Some(key), Some(email)) = (employee.match_key(), email) else {
        return report(SyncOutcome::Skipped(SkipReason::NoEmail));
    };
    if !employee.status.is_active() {
        return report(SyncOutcome::Skipped(SkipReason::Inactive {
            status: employee.status.as_str().to_string(),
        }));
    }

    if let Some(linked) = &employee.chat_account_id {
        match ctx.chat.get_account(linked) {
            Ok(Some(account)) if account.is_alive() && account.email_matches(key.as_str()) => {
                return report(SyncOutcome::AlreadyLinked);
            }
            Ok(_) => tracing::info!(
                employee = %employee.id,
                stale = %linked,
                "linked account gone or mismatched, re-discovering"
            ),
            Err(err) => {
                tracing::error!(employee = %employee.id, account = %linked, error = %err, "validating link failed");
                return report(SyncOutcome::Failed(format!(
                    "validating linked account {linked}: {err}"
                )));
            }
        }
    }

    match rediscover(ctx.chat, &key) {
        Ok(Discovery::Live(account)) => link(ctx, employee, &account, report),
        Ok(Discovery::Unusable(reason)) => report(SyncOutcome::Skipped(reason)),
        Ok(Discovery::NotFound) => create(ctx, employee, email, result, report),
        Err(err) => {
            tracing::error!(employee = %employee.id, error = %err, "re-discovery failed");
            report(SyncOutcome::Failed(format!("looking up chat account: {err}")))
        }
    }
}

fn link(
    ctx: &RunContext<'_>,
    employee: &EmployeeRecord,
    account: &ChatAccount,
    report: impl Fn(SyncOutcome) -> RecordReport,
) -> RecordReport {
    match ctx
        .hr
        .update_employee(&employee.id, &EmployeePatch::link(account.id.clone()))
    {
        Ok(()) => {
            tracing::info!(employee = %employee.id, account = %account.id, "linked existing account");
            report(SyncOutcome::Linked).with_note(format!("account {}", account.username))
        }
        Err(err) => {
            tracing::error!(employee = %employee.id, error = %err, "writing cross-reference failed");
            report(SyncOutcome::Failed(format!("updating employee: {err}")))
        }
    }
}

fn create(
    ctx: &RunContext<'_>,
    employee: &EmployeeRecord,
    email: &str,
    result: &mut SyncResultBuilder,
    report: impl Fn(SyncOutcome) -> RecordReport,
) -> RecordReport {
    let provisioned = match provision_account(
        ctx.chat,
        employee,
        email,
        ctx.config.username_probe_attempts,
        ctx.config.password_length,
    ) {
        Ok(p) => p,
        Err(err) => {
            tracing::error!(employee = %employee.id, error = %err, "creating chat account failed");
            return report(SyncOutcome::Failed(format!("creating chat account: {err}")));
        }
    };
    let account = &provisioned.account;
    let credentials = &provisioned.credentials;

    let linked = ctx
        .hr
        .update_employee(&employee.id, &EmployeePatch::link(account.id.clone()));
    // Delivery does not depend on the link write: a later run links the
    // account by e-mail but never re-sends credentials.
    let handed_over = hand_over(ctx, account, credentials, result);

    if let Err(err) = linked {
        tracing::error!(
            employee = %employee.id,
            account = %account.id,
            error = %err,
            "account created but cross-reference write failed"
        );
        return report(SyncOutcome::Failed(format!(
            "account {} ({}) created but updating employee failed: {err}; {handed_over}",
            account.id, credentials.username
        )));
    }

    let mut note = format!("username {}", credentials.username);
    if provisioned.attempt == CreateAttempt::WithSuffix {
        note.push_str(" (suffixed after collision)");
    }
    note.push_str("; ");
    note.push_str(&handed_over);

    tracing::info!(employee = %employee.id, account = %account.id, "created chat account");
    report(SyncOutcome::Created).with_note(note)
}

/// Deliver the credentials of a new account. Returns the note fragment for
/// the record line; when delivery fails it carries the temporary password.
fn hand_over(
    ctx: &RunContext<'_>,
    account: &ChatAccount,
    credentials: &TemporaryCredentials,
    result: &mut SyncResultBuilder,
) -> String {
    match ctx.delivery.deliver(account, credentials) {
        Ok(()) => "credentials delivered".to_string(),
        Err(err) => {
            tracing::warn!(account = %account.id, error = %err, "credential delivery failed");
            result.delivery_failed();
            format!(
                "credential delivery failed ({err}); temporary password {}",
                credentials.password.as_str()
            )
        }
    }
}
