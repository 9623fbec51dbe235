//! Chat → HR: every live human chat account ends up with a linked employee
//! record, and optionally an HR login user.

use hrsync_core::{
    collect_pages, ChatAccount, ChatAccountId, EmployeeDraft, EmployeePatch, EmployeeRecord,
    EmployeeStatus, LoginUserDraft, MatchKey, RecordReport, SkipReason, SyncDirection,
    SyncOutcome, SyncResult, SyncResultBuilder,
};

use crate::engine::RunContext;
use crate::error::SyncError;

pub(crate) fn run(ctx: &RunContext<'_>) -> Result<SyncResult, SyncError> {
    let mut result = SyncResultBuilder::new(SyncDirection::ChatToHr);

    let accounts = collect_pages(ctx.config.chat_page_size, ctx.config.chat_max_pages, |page| {
        ctx.chat.list_active_accounts(page)
    })
    .map_err(|source| SyncError::Enumeration {
        directory: ctx.chat.directory_name().to_string(),
        source,
    })?;
    let total = accounts.items.len();
    if accounts.truncated {
        tracing::warn!(total, pages = accounts.pages_fetched, "chat account enumeration truncated");
    }
    tracing::info!(total, pages = accounts.pages_fetched, "chat accounts enumerated");
    result.source(total, accounts.truncated);

    for account in &accounts.items {
        if ctx.deadline.expired() {
            tracing::warn!(processed = result.processed(), total, "deadline reached, stopping");
            return Ok(result.finish_timed_out(ctx.deadline.elapsed()));
        }
        let report = reconcile(ctx, account, &mut result);
        result.record(report);
        ctx.progress(result.processed(), total);
    }

    Ok(result.finish(ctx.deadline.elapsed()))
}

fn subject(account: &ChatAccount) -> String {
    if account.username.trim().is_empty() {
        account.id.to_string()
    } else {
        account.username.clone()
    }
}

fn reconcile(ctx: &RunContext<'_>, account: &ChatAccount, result: &mut SyncResultBuilder) -> RecordReport {
    let subject = subject(account);
    let email = account.email.trim();
    let report = |outcome| {
        RecordReport::new(
            account.id.as_str(),
            subject.as_str(),
            Some(email).filter(|e| !e.is_empty()),
            outcome,
        )
    };

    let Some(key) = account.match_key() else {
        return report(SyncOutcome::Skipped(SkipReason::NoEmail));
    };
    if account.is_bot {
        return report(SyncOutcome::Skipped(SkipReason::Bot));
    }
    if !account.is_alive() {
        return report(SyncOutcome::Skipped(SkipReason::Deleted));
    }

    let outcome = match ctx.hr.find_employee_by_email(key.as_str()) {
        Ok(Some(employee)) => link_existing(ctx, account, &key, &employee),
        Ok(None) => create_employee(ctx, account, email),
        Err(err) => {
            tracing::error!(account = %account.id, error = %err, "employee lookup failed");
            return report(SyncOutcome::Failed(format!("looking up employee: {err}")));
        }
    };

    let (outcome, mut notes) = match outcome {
        Ok((outcome, note)) => (outcome, note.into_iter().collect::<Vec<_>>()),
        Err(failure) => return report(SyncOutcome::Failed(failure)),
    };

    let provisions = matches!(
        outcome,
        SyncOutcome::AlreadyLinked | SyncOutcome::Linked | SyncOutcome::Created
    );
    if provisions && ctx.config.provision_login_users {
        notes.push(ensure_login_user(ctx, account, &key, result));
    }

    let report = report(outcome);
    if notes.is_empty() {
        report
    } else {
        report.with_note(notes.join("; "))
    }
}

/// Decide the outcome for an account whose e-mail matched `employee`.
fn link_existing(
    ctx: &RunContext<'_>,
    account: &ChatAccount,
    key: &MatchKey,
    employee: &EmployeeRecord,
) -> Result<(SyncOutcome, Option<String>), String> {
    match &employee.chat_account_id {
        Some(linked) if linked == &account.id => return Ok((SyncOutcome::AlreadyLinked, None)),
        Some(other) => match linked_elsewhere(ctx, other, key) {
            Ok(true) => {
                return Ok((
                    SyncOutcome::Skipped(SkipReason::LinkedElsewhere {
                        account: other.clone(),
                    }),
                    None,
                ))
            }
            Ok(false) => tracing::info!(
                employee = %employee.id,
                stale = %other,
                account = %account.id,
                "replacing stale cross-reference"
            ),
            Err(err) => return Err(err),
        },
        None => {}
    }

    ctx.hr
        .update_employee(&employee.id, &EmployeePatch::link(account.id.clone()))
        .map_err(|err| {
            tracing::error!(employee = %employee.id, error = %err, "writing cross-reference failed");
            format!("updating employee {}: {err}", employee.id)
        })?;
    tracing::info!(employee = %employee.id, account = %account.id, "linked existing employee");
    Ok((SyncOutcome::Linked, Some(format!("employee {}", employee.id))))
}

/// True when `other` is a live account with the same e-mail, so the
/// existing link must be left alone.
fn linked_elsewhere(ctx: &RunContext<'_>, other: &ChatAccountId, key: &MatchKey) -> Result<bool, String> {
    match ctx.chat.get_account(other) {
        Ok(Some(acc)) => Ok(acc.is_alive() && acc.email_matches(key.as_str())),
        Ok(None) => Ok(false),
        Err(err) => {
            tracing::error!(account = %other, error = %err, "validating existing link failed");
            Err(format!("validating linked account {other}: {err}"))
        }
    }
}

fn create_employee(
    ctx: &RunContext<'_>,
    account: &ChatAccount,
    email: &str,
) -> Result<(SyncOutcome, Option<String>), String> {
    let defaults = &ctx.config.employee_defaults;
    let first_name = match account.first_name.trim() {
        "" => subject(account),
        name => name.to_string(),
    };
    let draft = EmployeeDraft {
        email: email.to_string(),
        first_name,
        last_name: account.last_name.trim().to_string(),
        gender: defaults.gender.clone(),
        date_of_birth: defaults.date_of_birth,
        date_of_joining: defaults.date_of_joining,
        status: EmployeeStatus::Active,
        chat_account_id: account.id.clone(),
    };

    let id = ctx.hr.create_employee(&draft).map_err(|err| {
        tracing::error!(account = %account.id, error = %err, "creating employee failed");
        format!("creating employee: {err}")
    })?;
    tracing::info!(employee = %id, account = %account.id, "created employee");
    Ok((SyncOutcome::Created, Some(format!("employee {id}"))))
}

/// Login username for `key`: the e-mail local part, or `user_<id prefix>`.
pub(crate) fn login_username(key: &MatchKey, account: &ChatAccountId) -> String {
    match key.as_str().split_once('@') {
        Some((local, _)) if !local.is_empty() => local.to_string(),
        _ => format!("user_{}", account.prefix(8)),
    }
}

/// Ensure an HR login user exists for the account. Returns the note for the
/// record line; never changes the outcome.
fn ensure_login_user(
    ctx: &RunContext<'_>,
    account: &ChatAccount,
    key: &MatchKey,
    result: &mut SyncResultBuilder,
) -> String {
    match ctx.hr.find_login_user_by_email(key.as_str()) {
        Ok(Some(_)) => {
            result.login_user_existing();
            "login user exists".to_string()
        }
        Ok(None) => {
            let draft = LoginUserDraft {
                email: account.email.trim().to_string(),
                first_name: account.first_name.trim().to_string(),
                last_name: account.last_name.trim().to_string(),
                username: login_username(key, &account.id),
                enabled: true,
                role_profile_name: ctx.config.default_role_profile.clone(),
                send_welcome_email: false,
            };
            match ctx.hr.create_login_user(&draft) {
                Ok(user) => {
                    tracing::info!(user = %user.id, account = %account.id, "created login user");
                    result.login_user_created();
                    "login user created".to_string()
                }
                Err(err) => {
                    tracing::warn!(account = %account.id, error = %err, "creating login user failed");
                    format!("login user creation failed: {err}")
                }
            }
        }
        Err(err) => {
            tracing::warn!(account = %account.id, error = %err, "login user lookup failed");
            format!("login user lookup failed: {err}")
        }
    }
}
