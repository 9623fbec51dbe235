//! In-memory directory implementations.
//!
//! Each implementation keeps its records behind a mutex, counts calls per
//! operation and lets tests inject failures and per-call latency. Operation
//! names used by [`MemoryEmployeeDirectory::fail_on`] and friends are the
//! trait method names (`"create_account"`, `"update_employee"`, ...).

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use zeroize::Zeroizing;

use super::{ChatDirectory, CredentialDelivery, EmployeeDirectory};
use crate::error::DirectoryError;
use crate::filter::EmployeeFilter;
use crate::identity::{ChatAccountId, EmployeeId, MatchKey};
use crate::paging::{collect_pages, PageRequest, Paged};
use crate::record::{
    ChatAccount, ChatAccountDraft, CustomFieldSpec, EmployeeDraft, EmployeePatch,
    EmployeeRecord, LoginUser, LoginUserDraft, TemporaryCredentials,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Call accounting and fault injection shared by the in-memory directories.
#[derive(Debug, Default)]
struct Hooks {
    calls: HashMap<&'static str, usize>,
    always: HashMap<&'static str, DirectoryError>,
    once: HashMap<&'static str, VecDeque<DirectoryError>>,
    latency: Duration,
}

impl Hooks {
    /// Count the call, then either return the injected failure or the
    /// latency the caller should simulate.
    fn enter(&mut self, op: &'static str) -> Result<Duration, DirectoryError> {
        *self.calls.entry(op).or_default() += 1;
        if let Some(err) = self.once.get_mut(op).and_then(VecDeque::pop_front) {
            return Err(err);
        }
        if let Some(err) = self.always.get(op) {
            return Err(err.clone());
        }
        Ok(self.latency)
    }
}

fn enter(hooks: &Mutex<Hooks>, op: &'static str) -> Result<(), DirectoryError> {
    let latency = lock(hooks).enter(op)?;
    if !latency.is_zero() {
        std::thread::sleep(latency);
    }
    Ok(())
}

fn not_found(endpoint: String) -> DirectoryError {
    DirectoryError::Remote {
        endpoint,
        status: 404,
        body: "not found".into(),
    }
}

/// Generates the fault-injection surface shared by every memory directory.
macro_rules! hook_methods {
    () => {
        /// Number of calls made to `op` so far.
        pub fn calls(&self, op: &str) -> usize {
            lock(&self.hooks).calls.get(op).copied().unwrap_or(0)
        }

        /// Make every call to `op` fail with `err`.
        pub fn fail_on(&self, op: &'static str, err: DirectoryError) {
            lock(&self.hooks).always.insert(op, err);
        }

        /// Make the next call to `op` fail with `err`. Queues when called
        /// repeatedly.
        pub fn fail_next(&self, op: &'static str, err: DirectoryError) {
            lock(&self.hooks).once.entry(op).or_default().push_back(err);
        }

        /// Remove every injected failure.
        pub fn clear_failures(&self) {
            let mut hooks = lock(&self.hooks);
            hooks.always.clear();
            hooks.once.clear();
        }

        /// Sleep for `latency` on every call.
        pub fn set_latency(&self, latency: Duration) {
            lock(&self.hooks).latency = latency;
        }
    };
}

// -- HR side ------------------------------------------------------------------

#[derive(Debug, Default)]
struct HrState {
    employees: Vec<EmployeeRecord>,
    login_users: Vec<LoginUser>,
    custom_fields: Vec<CustomFieldSpec>,
    role_profiles: Vec<(String, Vec<String>)>,
    next_id: u64,
}

/// An [`EmployeeDirectory`] held in memory.
#[derive(Debug)]
pub struct MemoryEmployeeDirectory {
    state: Mutex<HrState>,
    hooks: Mutex<Hooks>,
    page_size: usize,
    max_pages: usize,
}

impl Default for MemoryEmployeeDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEmployeeDirectory {
    /// An empty directory paging 200 records at a time, up to 20 pages.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HrState::default()),
            hooks: Mutex::new(Hooks::default()),
            page_size: 200,
            max_pages: 20,
        }
    }

    /// Override the page size and page ceiling used by `list_employees`.
    pub fn with_paging(mut self, page_size: usize, max_pages: usize) -> Self {
        self.page_size = page_size;
        self.max_pages = max_pages;
        self
    }

    /// Seed an employee record.
    pub fn with_employee(self, record: EmployeeRecord) -> Self {
        self.insert(record);
        self
    }

    /// Insert or replace an employee record by id.
    pub fn insert(&self, record: EmployeeRecord) {
        let mut state = lock(&self.state);
        match state.employees.iter_mut().find(|e| e.id == record.id) {
            Some(existing) => *existing = record,
            None => state.employees.push(record),
        }
    }

    /// Seed an HR login user.
    pub fn insert_login_user(&self, user: LoginUser) {
        lock(&self.state).login_users.push(user);
    }

    /// Snapshot of all employees, in insertion order.
    pub fn employees(&self) -> Vec<EmployeeRecord> {
        lock(&self.state).employees.clone()
    }

    /// Snapshot of one employee.
    pub fn employee(&self, id: &str) -> Option<EmployeeRecord> {
        lock(&self.state)
            .employees
            .iter()
            .find(|e| e.id.as_str() == id)
            .cloned()
    }

    /// Snapshot of the login users.
    pub fn login_users(&self) -> Vec<LoginUser> {
        lock(&self.state).login_users.clone()
    }

    /// Custom fields created so far.
    pub fn custom_fields(&self) -> Vec<CustomFieldSpec> {
        lock(&self.state).custom_fields.clone()
    }

    /// Names of the role profiles created so far.
    pub fn role_profiles(&self) -> Vec<String> {
        lock(&self.state)
            .role_profiles
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Roles granted by the role profile `name`, if it exists.
    pub fn role_profile_roles(&self, name: &str) -> Option<Vec<String>> {
        lock(&self.state)
            .role_profiles
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, roles)| roles.clone())
    }

    hook_methods!();

    fn field<'a>(record: &'a EmployeeRecord, name: &str) -> Option<&'a str> {
        match name {
            "name" => Some(record.id.as_str()),
            "company_email" => record.email.as_deref(),
            "first_name" => Some(record.first_name.as_str()),
            "last_name" => Some(record.last_name.as_str()),
            "gender" => record.gender.as_deref(),
            "status" => Some(record.status.as_str()),
            "custom_chat_id" => record.chat_account_id.as_ref().map(ChatAccountId::as_str),
            _ => None,
        }
    }

    fn matching(&self, filter: &EmployeeFilter) -> Vec<EmployeeRecord> {
        lock(&self.state)
            .employees
            .iter()
            .filter(|rec| filter.matches_with(|f| Self::field(rec, f)))
            .cloned()
            .collect()
    }
}

impl EmployeeDirectory for MemoryEmployeeDirectory {
    fn list_employees(&self, filter: &EmployeeFilter) -> Result<Paged<EmployeeRecord>, DirectoryError> {
        enter(&self.hooks, "list_employees")?;
        let all = self.matching(filter);
        collect_pages(self.page_size, self.max_pages, |req: PageRequest| {
            enter(&self.hooks, "list_employees.page")?;
            Ok(all.iter().skip(req.offset).take(req.size).cloned().collect())
        })
    }

    fn find_employee_by_email(&self, email: &str) -> Result<Option<EmployeeRecord>, DirectoryError> {
        enter(&self.hooks, "find_employee_by_email")?;
        Ok(lock(&self.state)
            .employees
            .iter()
            .find(|e| e.match_key().is_some_and(|k| k.matches(email)))
            .cloned())
    }

    fn create_employee(&self, draft: &EmployeeDraft) -> Result<EmployeeId, DirectoryError> {
        enter(&self.hooks, "create_employee")?;
        let mut state = lock(&self.state);
        state.next_id += 1;
        let id = EmployeeId::new(format!("HR-EMP-{:05}", state.next_id)).map_err(|e| {
            DirectoryError::Decode {
                endpoint: "create_employee".into(),
                reason: e.to_string(),
            }
        })?;
        state.employees.push(EmployeeRecord {
            id: id.clone(),
            email: Some(draft.email.clone()),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            gender: Some(draft.gender.clone()),
            date_of_birth: Some(draft.date_of_birth),
            date_of_joining: Some(draft.date_of_joining),
            status: draft.status.clone(),
            chat_account_id: Some(draft.chat_account_id.clone()),
        });
        Ok(id)
    }

    fn update_employee(&self, id: &EmployeeId, patch: &EmployeePatch) -> Result<(), DirectoryError> {
        enter(&self.hooks, "update_employee")?;
        let mut state = lock(&self.state);
        let record = state
            .employees
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| not_found(format!("update_employee {id}")))?;
        record.chat_account_id = Some(patch.chat_account_id().clone());
        Ok(())
    }

    fn ensure_custom_field(&self, spec: &CustomFieldSpec) -> Result<(), DirectoryError> {
        enter(&self.hooks, "ensure_custom_field")?;
        let mut state = lock(&self.state);
        if !state
            .custom_fields
            .iter()
            .any(|f| f.fieldname == spec.fieldname && f.doctype == spec.doctype)
        {
            state.custom_fields.push(spec.clone());
        }
        Ok(())
    }

    fn ensure_role_profile(&self, name: &str, roles: &[String]) -> Result<(), DirectoryError> {
        enter(&self.hooks, "ensure_role_profile")?;
        let mut state = lock(&self.state);
        if !state.role_profiles.iter().any(|(p, _)| p == name) {
            state.role_profiles.push((name.to_string(), roles.to_vec()));
        }
        Ok(())
    }

    fn find_login_user_by_email(&self, email: &str) -> Result<Option<LoginUser>, DirectoryError> {
        enter(&self.hooks, "find_login_user_by_email")?;
        Ok(lock(&self.state)
            .login_users
            .iter()
            .find(|u| {
                u.email
                    .as_deref()
                    .and_then(MatchKey::parse)
                    .is_some_and(|k| k.matches(email))
            })
            .cloned())
    }

    fn create_login_user(&self, draft: &LoginUserDraft) -> Result<LoginUser, DirectoryError> {
        enter(&self.hooks, "create_login_user")?;
        let user = LoginUser {
            id: draft.email.clone(),
            email: Some(draft.email.clone()),
            username: Some(draft.username.clone()),
            enabled: draft.enabled,
            role_profile_name: Some(draft.role_profile_name.clone()),
        };
        lock(&self.state).login_users.push(user.clone());
        Ok(user)
    }

    fn count_employees(&self, filter: &EmployeeFilter) -> Result<u64, DirectoryError> {
        enter(&self.hooks, "count_employees")?;
        Ok(self.matching(filter).len() as u64)
    }

    fn directory_name(&self) -> &str {
        "memory-hr"
    }
}

// -- Chat side ----------------------------------------------------------------

#[derive(Debug, Default)]
struct ChatState {
    accounts: Vec<ChatAccount>,
    hidden_from_email_lookup: HashSet<ChatAccountId>,
    reserved_usernames: HashSet<String>,
    next_id: u64,
}

/// A [`ChatDirectory`] held in memory.
///
/// `list_active_accounts` returns every stored account, including bots,
/// disabled and soft-deleted ones, the way some backends ignore the active
/// filter. Callers apply their own liveness checks.
#[derive(Debug, Default)]
pub struct MemoryChatDirectory {
    state: Mutex<ChatState>,
    hooks: Mutex<Hooks>,
}

impl MemoryChatDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account.
    pub fn with_account(self, account: ChatAccount) -> Self {
        self.insert(account);
        self
    }

    /// Insert or replace an account by id.
    pub fn insert(&self, account: ChatAccount) {
        let mut state = lock(&self.state);
        match state.accounts.iter_mut().find(|a| a.id == account.id) {
            Some(existing) => *existing = account,
            None => state.accounts.push(account),
        }
    }

    /// Make `find_by_email` miss this account while search still finds it.
    pub fn hide_from_email_lookup(&self, id: &ChatAccountId) {
        lock(&self.state).hidden_from_email_lookup.insert(id.clone());
    }

    /// Make `create_account` reject `username` as taken even though
    /// `find_by_username` does not see it.
    pub fn reserve_username(&self, username: &str) {
        lock(&self.state)
            .reserved_usernames
            .insert(username.to_string());
    }

    /// Snapshot of all accounts, in insertion order.
    pub fn accounts(&self) -> Vec<ChatAccount> {
        lock(&self.state).accounts.clone()
    }

    hook_methods!();
}

impl ChatDirectory for MemoryChatDirectory {
    fn list_active_accounts(&self, page: PageRequest) -> Result<Vec<ChatAccount>, DirectoryError> {
        enter(&self.hooks, "list_active_accounts")?;
        Ok(lock(&self.state)
            .accounts
            .iter()
            .skip(page.offset)
            .take(page.size)
            .cloned()
            .collect())
    }

    fn get_account(&self, id: &ChatAccountId) -> Result<Option<ChatAccount>, DirectoryError> {
        enter(&self.hooks, "get_account")?;
        Ok(lock(&self.state).accounts.iter().find(|a| &a.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<ChatAccount>, DirectoryError> {
        enter(&self.hooks, "find_by_email")?;
        let state = lock(&self.state);
        Ok(state
            .accounts
            .iter()
            .filter(|a| !state.hidden_from_email_lookup.contains(&a.id))
            .find(|a| a.email_matches(email))
            .cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<ChatAccount>, DirectoryError> {
        enter(&self.hooks, "find_by_username")?;
        Ok(lock(&self.state)
            .accounts
            .iter()
            .find(|a| a.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    fn search_by_term(&self, term: &str, limit: usize) -> Result<Vec<ChatAccount>, DirectoryError> {
        enter(&self.hooks, "search_by_term")?;
        let needle = term.trim().to_lowercase();
        Ok(lock(&self.state)
            .accounts
            .iter()
            .filter(|a| a.is_alive())
            .filter(|a| {
                [&a.email, &a.username, &a.first_name, &a.last_name]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .take(limit)
            .cloned()
            .collect())
    }

    fn create_account(&self, draft: &ChatAccountDraft) -> Result<ChatAccount, DirectoryError> {
        enter(&self.hooks, "create_account")?;
        let mut state = lock(&self.state);
        let taken = state.reserved_usernames.contains(&draft.username)
            || state
                .accounts
                .iter()
                .any(|a| a.username.eq_ignore_ascii_case(&draft.username));
        if taken {
            return Err(DirectoryError::UsernameTaken {
                username: draft.username.clone(),
                detail: "An account with that username already exists.".into(),
            });
        }
        if state.accounts.iter().any(|a| a.email_matches(&draft.email)) {
            return Err(DirectoryError::Remote {
                endpoint: "create_account".into(),
                status: 400,
                body: "An account with that email already exists.".into(),
            });
        }
        state.next_id += 1;
        let id = ChatAccountId::new(format!("chat{:06}", state.next_id)).map_err(|e| {
            DirectoryError::Decode {
                endpoint: "create_account".into(),
                reason: e.to_string(),
            }
        })?;
        let account = ChatAccount {
            id,
            email: draft.email.clone(),
            username: draft.username.clone(),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            enabled: true,
            is_bot: false,
            delete_at: 0,
        };
        state.accounts.push(account.clone());
        Ok(account)
    }

    fn directory_name(&self) -> &str {
        "memory-chat"
    }
}

// -- Delivery -----------------------------------------------------------------

/// One credential hand-off captured by [`RecordingDelivery`].
#[derive(Clone)]
pub struct DeliveredCredentials {
    /// Account that received the credentials.
    pub account_id: ChatAccountId,
    /// Username delivered.
    pub username: String,
    /// Password delivered.
    pub password: Zeroizing<String>,
}

/// A [`CredentialDelivery`] that records every hand-off.
#[derive(Default)]
pub struct RecordingDelivery {
    delivered: Mutex<Vec<DeliveredCredentials>>,
    hooks: Mutex<Hooks>,
}

impl RecordingDelivery {
    /// A delivery sink with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every successful hand-off, in order.
    pub fn delivered(&self) -> Vec<DeliveredCredentials> {
        lock(&self.delivered).clone()
    }

    hook_methods!();
}

impl CredentialDelivery for RecordingDelivery {
    fn deliver(&self, account: &ChatAccount, credentials: &TemporaryCredentials) -> Result<(), DirectoryError> {
        enter(&self.hooks, "deliver")?;
        lock(&self.delivered).push(DeliveredCredentials {
            account_id: account.id.clone(),
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EmployeeStatus;

    fn employee(id: &str, email: &str, status: EmployeeStatus) -> EmployeeRecord {
        EmployeeRecord {
            id: EmployeeId::new(id).unwrap(),
            email: Some(email.into()),
            first_name: "First".into(),
            last_name: "Last".into(),
            gender: None,
            date_of_birth: None,
            date_of_joining: None,
            status,
            chat_account_id: None,
        }
    }

    fn account(id: &str, email: &str, username: &str) -> ChatAccount {
        ChatAccount {
            id: ChatAccountId::new(id).unwrap(),
            email: email.into(),
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            enabled: true,
            is_bot: false,
            delete_at: 0,
        }
    }

    #[test]
    fn list_employees_pages_and_filters() {
        let hr = MemoryEmployeeDirectory::new().with_paging(2, 10);
        for i in 0..4 {
            hr.insert(employee(&format!("E{i}"), &format!("e{i}@x.io"), EmployeeStatus::Active));
        }
        hr.insert(employee("E9", "gone@x.io", EmployeeStatus::Left));

        let all = hr.list_employees(&EmployeeFilter::all()).unwrap();
        assert_eq!(all.items.len(), 5);
        assert_eq!(all.pages_fetched, 3);

        let active = hr.list_employees(&EmployeeFilter::status("Active")).unwrap();
        assert_eq!(active.items.len(), 4);
        assert_eq!(active.pages_fetched, 3);
        assert_eq!(hr.calls("list_employees"), 2);
        assert_eq!(hr.calls("list_employees.page"), 6);
    }

    #[test]
    fn find_by_email_is_case_insensitive_and_first_wins() {
        let hr = MemoryEmployeeDirectory::new()
            .with_employee(employee("E1", "An@X.io", EmployeeStatus::Active))
            .with_employee(employee("E2", "an@x.io", EmployeeStatus::Active));
        let found = hr.find_employee_by_email("an@x.io").unwrap().unwrap();
        assert_eq!(found.id.as_str(), "E1");
    }

    #[test]
    fn update_of_unknown_employee_is_not_found() {
        let hr = MemoryEmployeeDirectory::new();
        let err = hr
            .update_employee(
                &EmployeeId::new("nope").unwrap(),
                &EmployeePatch::link(ChatAccountId::new("u1").unwrap()),
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn ensure_operations_are_idempotent() {
        let hr = MemoryEmployeeDirectory::new();
        let spec = CustomFieldSpec::cross_reference("Chat User ID");
        hr.ensure_custom_field(&spec).unwrap();
        hr.ensure_custom_field(&spec).unwrap();
        let roles = vec!["Employee".to_string()];
        hr.ensure_role_profile("Default", &roles).unwrap();
        hr.ensure_role_profile("Default", &["HR User".to_string()]).unwrap();
        assert_eq!(hr.custom_fields().len(), 1);
        assert_eq!(hr.role_profiles(), vec!["Default".to_string()]);
        assert_eq!(hr.role_profile_roles("Default"), Some(roles));
    }

    #[test]
    fn injected_failures_fire_once_or_always() {
        let chat = MemoryChatDirectory::new();
        let boom = DirectoryError::Transport {
            endpoint: "get".into(),
            reason: "reset".into(),
        };
        chat.fail_next("find_by_email", boom.clone());
        assert!(chat.find_by_email("a@x.io").is_err());
        assert!(chat.find_by_email("a@x.io").is_ok());

        chat.fail_on("search_by_term", boom);
        assert!(chat.search_by_term("a", 5).is_err());
        assert!(chat.search_by_term("a", 5).is_err());
        chat.clear_failures();
        assert!(chat.search_by_term("a", 5).is_ok());
        assert_eq!(chat.calls("search_by_term"), 3);
    }

    #[test]
    fn create_account_rejects_taken_and_reserved_usernames() {
        let chat = MemoryChatDirectory::new().with_account(account("u1", "a@x.io", "anna"));
        chat.reserve_username("bob");
        let draft = |username: &str, email: &str| ChatAccountDraft {
            email: email.into(),
            username: username.into(),
            password: Zeroizing::new("Pw1!pw1!".into()),
            first_name: String::new(),
            last_name: String::new(),
            email_verified: true,
        };
        assert!(chat
            .create_account(&draft("anna", "b@x.io"))
            .unwrap_err()
            .is_username_conflict());
        assert!(chat.find_by_username("bob").unwrap().is_none());
        assert!(chat
            .create_account(&draft("bob", "b@x.io"))
            .unwrap_err()
            .is_username_conflict());
        let created = chat.create_account(&draft("bob_2", "b@x.io")).unwrap();
        assert!(created.is_alive());
        assert_eq!(chat.accounts().len(), 2);
    }

    #[test]
    fn hidden_accounts_are_found_only_by_search() {
        let acc = account("u1", "legacy@x.io", "legacy");
        let chat = MemoryChatDirectory::new().with_account(acc.clone());
        chat.hide_from_email_lookup(&acc.id);
        assert!(chat.find_by_email("legacy@x.io").unwrap().is_none());
        assert_eq!(chat.search_by_term("legacy@x.io", 10).unwrap(), vec![acc]);
    }

    #[test]
    fn recording_delivery_captures_credentials() {
        let delivery = RecordingDelivery::new();
        let acc = account("u1", "a@x.io", "anna");
        let creds = TemporaryCredentials {
            username: "anna".into(),
            password: Zeroizing::new("Xy9!abcd".into()),
        };
        delivery.deliver(&acc, &creds).unwrap();
        let delivered = delivery.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].username, "anna");
        assert_eq!(delivered[0].password.as_str(), "Xy9!abcd");
    }
}
