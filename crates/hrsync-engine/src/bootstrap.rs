//! Schema bootstrap run before enumeration.
//!
//! Every record write depends on the cross-reference field existing, so a
//! failure here aborts the run before any record is touched.

use hrsync_core::{CustomFieldSpec, EmployeeDirectory, SyncDirection};

use crate::config::SyncConfig;
use crate::error::{BootstrapStep, SyncError};

/// Ensure the HR-side schema a run in `direction` writes to.
///
/// Both directions need the cross-reference field. Chat → HR runs also need
/// the default role profile for the login users they provision.
pub(crate) fn ensure_schema(
    hr: &dyn EmployeeDirectory,
    config: &SyncConfig,
    direction: SyncDirection,
) -> Result<(), SyncError> {
    let field = CustomFieldSpec::cross_reference(config.cross_reference_label.clone());
    hr.ensure_custom_field(&field)
        .map_err(|source| SyncError::Bootstrap {
            step: BootstrapStep::CustomField,
            source,
        })?;
    tracing::debug!(field = %field.fieldname, doctype = %field.doctype, "custom field ensured");

    if direction == SyncDirection::ChatToHr {
        hr.ensure_role_profile(&config.default_role_profile, &config.role_profile_roles)
            .map_err(|source| SyncError::Bootstrap {
                step: BootstrapStep::RoleProfile,
                source,
            })?;
        tracing::debug!(
            profile = %config.default_role_profile,
            roles = config.role_profile_roles.len(),
            "role profile ensured"
        );
    }

    Ok(())
}
