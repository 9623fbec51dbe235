//! [`EmployeeDirectory`] over the HR REST API.

use hrsync_core::{
    CustomFieldSpec, DirectoryError, EmployeeDirectory, EmployeeDraft, EmployeeFilter, EmployeeId,
    EmployeePatch, EmployeeRecord, LoginUser, LoginUserDraft, Paged,
};

use crate::ErpClient;

impl EmployeeDirectory for ErpClient {
    fn list_employees(&self, filter: &EmployeeFilter) -> Result<Paged<EmployeeRecord>, DirectoryError> {
        Ok(self.employees().list(filter)?)
    }

    fn find_employee_by_email(&self, email: &str) -> Result<Option<EmployeeRecord>, DirectoryError> {
        Ok(self.employees().find_by_email(email)?)
    }

    fn create_employee(&self, draft: &EmployeeDraft) -> Result<EmployeeId, DirectoryError> {
        Ok(self.employees().create(draft)?)
    }

    fn update_employee(&self, id: &EmployeeId, patch: &EmployeePatch) -> Result<(), DirectoryError> {
        Ok(self.employees().update(id, patch)?)
    }

    fn ensure_custom_field(&self, spec: &CustomFieldSpec) -> Result<(), DirectoryError> {
        self.metadata().ensure_custom_field(spec)?;
        Ok(())
    }

    fn ensure_role_profile(&self, name: &str, roles: &[String]) -> Result<(), DirectoryError> {
        self.metadata().ensure_role_profile(name, roles)?;
        Ok(())
    }

    fn find_login_user_by_email(&self, email: &str) -> Result<Option<LoginUser>, DirectoryError> {
        Ok(self.users().find_by_email(email)?)
    }

    fn create_login_user(&self, draft: &LoginUserDraft) -> Result<LoginUser, DirectoryError> {
        Ok(self.users().create(draft)?)
    }

    fn count_employees(&self, filter: &EmployeeFilter) -> Result<u64, DirectoryError> {
        Ok(self.employees().count(filter)?)
    }

    fn directory_name(&self) -> &str {
        "erpnext"
    }
}
