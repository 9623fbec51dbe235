#![allow(dead_code)]

//! Fixtures shared by the engine tests.

use hrsync_core::{ChatAccount, ChatAccountId, DirectoryError, EmployeeId, EmployeeRecord, EmployeeStatus};
use hrsync_engine::SyncConfig;

pub fn employee(id: &str, first: &str, last: &str, email: &str) -> EmployeeRecord {
    EmployeeRecord {
        id: EmployeeId::new(id).unwrap(),
        email: Some(email.to_string()).filter(|e| !e.is_empty()),
        first_name: first.into(),
        last_name: last.into(),
        gender: Some("Female".into()),
        date_of_birth: None,
        date_of_joining: None,
        status: EmployeeStatus::Active,
        chat_account_id: None,
    }
}

pub fn linked(mut record: EmployeeRecord, chat_id: &str) -> EmployeeRecord {
    record.chat_account_id = Some(ChatAccountId::new(chat_id).unwrap());
    record
}

pub fn with_status(mut record: EmployeeRecord, status: EmployeeStatus) -> EmployeeRecord {
    record.status = status;
    record
}

pub fn account(id: &str, username: &str, email: &str) -> ChatAccount {
    ChatAccount {
        id: ChatAccountId::new(id).unwrap(),
        email: email.into(),
        username: username.into(),
        first_name: "Chat".into(),
        last_name: username.into(),
        enabled: true,
        is_bot: false,
        delete_at: 0,
    }
}

pub fn bot(id: &str, username: &str, email: &str) -> ChatAccount {
    ChatAccount {
        is_bot: true,
        ..account(id, username, email)
    }
}

pub fn deleted(id: &str, username: &str, email: &str) -> ChatAccount {
    ChatAccount {
        delete_at: 1_700_000_000_000,
        ..account(id, username, email)
    }
}

pub fn remote(status: u16, body: &str) -> DirectoryError {
    DirectoryError::Remote {
        endpoint: "test".into(),
        status,
        body: body.into(),
    }
}

/// Default policy with progress logging off.
pub fn config() -> SyncConfig {
    SyncConfig {
        progress_every: 0,
        ..SyncConfig::default()
    }
}
