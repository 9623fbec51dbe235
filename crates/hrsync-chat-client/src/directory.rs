//! [`ChatDirectory`] and [`CredentialDelivery`] over the chat REST API.

use hrsync_core::{
    ChatAccount, ChatAccountDraft, ChatAccountId, ChatDirectory, CredentialDelivery,
    DirectoryError, PageRequest, TemporaryCredentials,
};

use crate::ChatClient;

impl ChatDirectory for ChatClient {
    fn list_active_accounts(&self, page: PageRequest) -> Result<Vec<ChatAccount>, DirectoryError> {
        Ok(self.users().list_active(page)?)
    }

    fn get_account(&self, id: &ChatAccountId) -> Result<Option<ChatAccount>, DirectoryError> {
        Ok(self.users().get(id)?)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<ChatAccount>, DirectoryError> {
        Ok(self.users().get_by_email(email)?)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<ChatAccount>, DirectoryError> {
        Ok(self.users().get_by_username(username)?)
    }

    fn search_by_term(&self, term: &str, limit: usize) -> Result<Vec<ChatAccount>, DirectoryError> {
        let limit = if limit == 0 { self.search_limit() } else { limit };
        Ok(self.users().search(term, limit)?)
    }

    fn create_account(&self, draft: &ChatAccountDraft) -> Result<ChatAccount, DirectoryError> {
        self.users().create(draft).map_err(|e| {
            if e.is_username_taken() {
                DirectoryError::UsernameTaken {
                    username: draft.username.clone(),
                    detail: e.message(),
                }
            } else {
                e.into()
            }
        })
    }

    fn directory_name(&self) -> &str {
        "mattermost"
    }
}

impl CredentialDelivery for ChatClient {
    fn deliver(&self, account: &ChatAccount, credentials: &TemporaryCredentials) -> Result<(), DirectoryError> {
        Ok(self.messaging().send_credentials(account, credentials)?)
    }
}
