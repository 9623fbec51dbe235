//! Chat account creation for HR → chat runs.
//!
//! Creation is two explicit steps rather than a retry loop:
//!
//! ```text
//! Attempt(username) --UsernameTaken--> AttemptWithSuffix(username_<token>) --any error--> Failed
//!        |                                      |
//!        +--ok--> Created                       +--ok--> Created
//! ```
//!
//! Username probing happens before the first attempt and is not a retry of
//! the create call.

use hrsync_core::{
    generate_password, random_token, slugify, username_with_suffix, ChatAccount, ChatAccountDraft,
    ChatDirectory, DirectoryError, EmployeeRecord, TemporaryCredentials,
};
use zeroize::Zeroizing;

/// Length of the random token appended after a username collision.
const COLLISION_TOKEN_LEN: usize = 4;

/// Which of the two create steps produced the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CreateAttempt {
    /// The probed username was accepted.
    Initial,
    /// The username collided and the suffixed variant was accepted.
    WithSuffix,
}

/// A freshly created account and the credentials to hand to its owner.
#[derive(Debug)]
pub(crate) struct ProvisionedAccount {
    pub(crate) account: ChatAccount,
    pub(crate) credentials: TemporaryCredentials,
    pub(crate) attempt: CreateAttempt,
}

/// Pick the first free username among `attempts` candidates: `base`, then
/// `base_1`, `base_2`, and so on. At least the base is always probed.
///
/// Probe errors stop probing and keep the current candidate; the collision
/// step still guards the create call. When every candidate is taken the
/// last one is used.
pub(crate) fn probe_username(chat: &dyn ChatDirectory, base: &str, attempts: usize) -> String {
    let mut candidate = base.to_string();
    for n in 0..attempts.max(1) {
        if n > 0 {
            candidate = username_with_suffix(base, &n.to_string());
        }
        match chat.find_by_username(&candidate) {
            Ok(None) => return candidate,
            Ok(Some(_)) => tracing::debug!(username = %candidate, "username taken, probing next"),
            Err(err) => {
                tracing::warn!(username = %candidate, error = %err, "username probe failed");
                return candidate;
            }
        }
    }
    candidate
}

/// Build the create payload for `employee`.
pub(crate) fn draft_for(
    employee: &EmployeeRecord,
    email: &str,
    username: String,
    password_length: usize,
) -> ChatAccountDraft {
    ChatAccountDraft {
        email: email.to_string(),
        username,
        password: Zeroizing::new(generate_password(password_length)),
        first_name: employee.first_name.trim().to_string(),
        last_name: employee.last_name.trim().to_string(),
        email_verified: true,
    }
}

/// Derive, probe and create an account for `employee`.
pub(crate) fn provision_account(
    chat: &dyn ChatDirectory,
    employee: &EmployeeRecord,
    email: &str,
    probe_attempts: usize,
    password_length: usize,
) -> Result<ProvisionedAccount, DirectoryError> {
    let base = slugify(&employee.first_name, &employee.last_name);
    let username = probe_username(chat, &base, probe_attempts);
    create_account(chat, draft_for(employee, email, username, password_length))
}

/// Create the account, recovering from a single username collision.
pub(crate) fn create_account(
    chat: &dyn ChatDirectory,
    mut draft: ChatAccountDraft,
) -> Result<ProvisionedAccount, DirectoryError> {
    let attempt = match chat.create_account(&draft) {
        Ok(account) => return Ok(provisioned(account, draft, CreateAttempt::Initial)),
        Err(err) if err.is_username_conflict() => {
            let suffixed = username_with_suffix(&draft.username, &random_token(COLLISION_TOKEN_LEN));
            tracing::warn!(
                username = %draft.username,
                retry_username = %suffixed,
                "username collision, retrying once with suffix"
            );
            draft.username = suffixed;
            CreateAttempt::WithSuffix
        }
        Err(err) => return Err(err),
    };

    let account = chat.create_account(&draft)?;
    Ok(provisioned(account, draft, attempt))
}

fn provisioned(account: ChatAccount, draft: ChatAccountDraft, attempt: CreateAttempt) -> ProvisionedAccount {
    let username = if account.username.is_empty() {
        draft.username
    } else {
        account.username.clone()
    };
    ProvisionedAccount {
        credentials: TemporaryCredentials {
            username,
            password: draft.password,
        },
        account,
        attempt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrsync_core::directory::memory::MemoryChatDirectory;
    use hrsync_core::{ChatAccountId, EmployeeId, EmployeeStatus};

    fn account(id: &str, username: &str) -> ChatAccount {
        ChatAccount {
            id: ChatAccountId::new(id).unwrap(),
            email: format!("{username}@example.com"),
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            enabled: true,
            is_bot: false,
            delete_at: 0,
        }
    }

    fn employee() -> EmployeeRecord {
        EmployeeRecord {
            id: EmployeeId::new("HR-EMP-00001").unwrap(),
            email: Some("an.nguyen@example.com".into()),
            first_name: "Văn".into(),
            last_name: "Nguyễn".into(),
            gender: None,
            date_of_birth: None,
            date_of_joining: None,
            status: EmployeeStatus::Active,
            chat_account_id: None,
        }
    }

    #[test]
    fn username_search_returns_base_when_free() {
        let chat = MemoryChatDirectory::new();
        assert_eq!(probe_username(&chat, "van_nguyen", 5), "van_nguyen");
        assert_eq!(chat.calls("find_by_username"), 1);
    }

    #[test]
    fn username_search_walks_numbered_variants() {
        let chat = MemoryChatDirectory::new()
            .with_account(account("a", "van_nguyen"))
            .with_account(account("b", "van_nguyen_1"));
        assert_eq!(probe_username(&chat, "van_nguyen", 5), "van_nguyen_2");
        assert_eq!(chat.calls("find_by_username"), 3);
    }

    #[test]
    fn username_search_gives_up_after_attempts() {
        let chat = MemoryChatDirectory::new()
            .with_account(account("a", "ab_c"))
            .with_account(account("b", "ab_c_1"))
            .with_account(account("c", "ab_c_2"));
        assert_eq!(probe_username(&chat, "ab_c", 2), "ab_c_1");
        assert_eq!(chat.calls("find_by_username"), 2);
    }

    #[test]
    fn default_attempts_try_five_candidates() {
        let chat = MemoryChatDirectory::new();
        for (i, name) in ["anh", "anh_1", "anh_2", "anh_3", "anh_4", "anh_5"].iter().enumerate() {
            chat.insert(account(&format!("t{i}"), name));
        }
        let attempts = crate::SyncConfig::default().username_probe_attempts;
        assert_eq!(probe_username(&chat, "anh", attempts), "anh_4");
        assert_eq!(chat.calls("find_by_username"), 5);
    }

    #[test]
    fn zero_attempts_still_try_the_base() {
        let chat = MemoryChatDirectory::new();
        assert_eq!(probe_username(&chat, "van_nguyen", 0), "van_nguyen");
        assert_eq!(chat.calls("find_by_username"), 1);
    }

    #[test]
    fn create_succeeds_first_time() {
        let chat = MemoryChatDirectory::new();
        let draft = draft_for(&employee(), "an.nguyen@example.com", "van_nguyen".into(), 12);
        let out = create_account(&chat, draft).unwrap();
        assert_eq!(out.attempt, CreateAttempt::Initial);
        assert_eq!(out.credentials.username, "van_nguyen");
        assert_eq!(out.credentials.password.len(), 12);
        assert_eq!(chat.calls("create_account"), 1);
    }

    #[test]
    fn collision_retries_exactly_once_with_suffix() {
        let chat = MemoryChatDirectory::new();
        chat.reserve_username("van_nguyen");
        let draft = draft_for(&employee(), "an.nguyen@example.com", "van_nguyen".into(), 12);
        let out = create_account(&chat, draft).unwrap();
        assert_eq!(out.attempt, CreateAttempt::WithSuffix);
        assert!(out.credentials.username.starts_with("van_nguyen_"));
        assert_eq!(out.credentials.username.len(), "van_nguyen_".len() + COLLISION_TOKEN_LEN);
        assert_eq!(chat.calls("create_account"), 2);
    }

    #[test]
    fn second_collision_is_returned() {
        let chat = MemoryChatDirectory::new();
        let taken = || DirectoryError::UsernameTaken {
            username: "x".into(),
            detail: "taken".into(),
        };
        chat.fail_next("create_account", taken());
        chat.fail_next("create_account", taken());
        let draft = draft_for(&employee(), "an.nguyen@example.com", "van_nguyen".into(), 12);
        let err = create_account(&chat, draft).unwrap_err();
        assert!(err.is_username_conflict());
        assert_eq!(chat.calls("create_account"), 2);
    }

    #[test]
    fn other_errors_are_not_retried() {
        let chat = MemoryChatDirectory::new();
        chat.fail_next(
            "create_account",
            DirectoryError::Remote {
                endpoint: "POST /api/v4/users".into(),
                status: 500,
                body: "boom".into(),
            },
        );
        let draft = draft_for(&employee(), "an.nguyen@example.com", "van_nguyen".into(), 12);
        assert!(create_account(&chat, draft).is_err());
        assert_eq!(chat.calls("create_account"), 1);
    }

    #[test]
    fn provision_slugifies_names() {
        let chat = MemoryChatDirectory::new();
        let out = provision_account(&chat, &employee(), "an.nguyen@example.com", 5, 8).unwrap();
        assert_eq!(out.account.username, out.credentials.username);
        assert!(out
            .credentials
            .username
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        assert!(out.credentials.username.starts_with("van"));
    }
}
