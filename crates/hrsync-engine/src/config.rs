//! # Run Policy
//!
//! [`SyncConfig`] is the run policy: labels, deadlines, paging limits and the
//! defaults used for records the engine creates. It is loaded from YAML,
//! every field is optional, and it is frozen for the duration of a run.
//!
//! Connection credentials are not part of it; the directory clients read
//! those from the environment.
//!
//! ```yaml
//! cross_reference_label: Chat User ID
//! default_role_profile: Default
//! role_profile_roles: [Employee, Employee Self Service]
//! hr_to_chat_max_duration_secs: 1200
//! chat_to_hr_max_duration_secs: 900
//! employee_defaults:
//!   gender: Male
//!   date_of_birth: 2000-01-01
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use hrsync_core::SyncDirection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a [`SyncConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The YAML did not parse into a [`SyncConfig`].
    #[error("failed to parse config {origin}: {source}")]
    YamlParse {
        origin: String,
        source: serde_yaml::Error,
    },

    /// A field holds a value the engine cannot run with.
    #[error("invalid config field {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Roles granted by the default role profile when bootstrap creates it.
pub const DEFAULT_ROLE_PROFILE_ROLES: [&str; 21] = [
    "System Manager",
    "Administrator",
    "Employee",
    "Employee Self Service",
    "HR Manager",
    "HR User",
    "Accounts Manager",
    "Accounts User",
    "Sales Manager",
    "Sales User",
    "Purchase Manager",
    "Purchase User",
    "Stock Manager",
    "Stock User",
    "Manufacturing Manager",
    "Manufacturing User",
    "Projects Manager",
    "Projects User",
    "Website Manager",
    "Desk User",
    "All",
];

/// Fixed values for employee records created from chat accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmployeeDefaults {
    /// Gender written on created records.
    pub gender: String,
    /// Placeholder date of birth.
    pub date_of_birth: NaiveDate,
    /// Placeholder date of joining.
    pub date_of_joining: NaiveDate,
}

impl Default for EmployeeDefaults {
    fn default() -> Self {
        let placeholder = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
        Self {
            gender: "Male".to_string(),
            date_of_birth: placeholder,
            date_of_joining: placeholder,
        }
    }
}

/// Run policy for the reconciliation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Label of the cross-reference custom field in the HR UI.
    pub cross_reference_label: String,
    /// Role profile ensured at bootstrap and assigned to new login users.
    pub default_role_profile: String,
    /// Roles granted by the role profile when bootstrap has to create it.
    /// An existing profile keeps its roles.
    pub role_profile_roles: Vec<String>,
    /// Deadline for an HR → chat run.
    pub hr_to_chat_max_duration_secs: u64,
    /// Deadline for a chat → HR run.
    pub chat_to_hr_max_duration_secs: u64,
    /// Page size for chat account enumeration.
    pub chat_page_size: usize,
    /// Page ceiling for chat account enumeration.
    pub chat_max_pages: usize,
    /// Length of generated temporary passwords.
    pub password_length: usize,
    /// Username candidates probed before creating an account, counting the
    /// base name: 5 probes `base`, `base_1` .. `base_4`.
    pub username_probe_attempts: usize,
    /// Whether chat → HR runs ensure an HR login user per linked account.
    pub provision_login_users: bool,
    /// Defaults for employee records created from chat accounts.
    pub employee_defaults: EmployeeDefaults,
    /// Emit a progress event every this many records; 0 disables it.
    pub progress_every: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            cross_reference_label: "Chat User ID".to_string(),
            default_role_profile: "Default".to_string(),
            role_profile_roles: DEFAULT_ROLE_PROFILE_ROLES.iter().map(|r| r.to_string()).collect(),
            hr_to_chat_max_duration_secs: 1200,
            chat_to_hr_max_duration_secs: 900,
            chat_page_size: 200,
            chat_max_pages: 16,
            password_length: 12,
            username_probe_attempts: 5,
            provision_login_users: true,
            employee_defaults: EmployeeDefaults::default(),
            progress_every: 25,
        }
    }
}

impl SyncConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
            origin: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded sync config");
        Ok(config)
    }

    /// Parse and validate YAML text. An empty document yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|source| ConfigError::YamlParse {
                origin: "<inline>".to_string(),
                source,
            })?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run can proceed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cross_reference_label.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "cross_reference_label",
                reason: "must not be empty".into(),
            });
        }
        if self.default_role_profile.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "default_role_profile",
                reason: "must not be empty".into(),
            });
        }
        if self.role_profile_roles.iter().all(|r| r.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "role_profile_roles",
                reason: "must name at least one role".into(),
            });
        }
        if self.employee_defaults.gender.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "employee_defaults.gender",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// The deadline configured for `direction`.
    pub fn max_duration(&self, direction: SyncDirection) -> Duration {
        match direction {
            SyncDirection::HrToChat => Duration::from_secs(self.hr_to_chat_max_duration_secs),
            SyncDirection::ChatToHr => Duration::from_secs(self.chat_to_hr_max_duration_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let cfg = SyncConfig::default();
        assert_eq!(cfg.cross_reference_label, "Chat User ID");
        assert_eq!(cfg.max_duration(SyncDirection::HrToChat), Duration::from_secs(1200));
        assert_eq!(cfg.max_duration(SyncDirection::ChatToHr), Duration::from_secs(900));
        assert_eq!(cfg.chat_page_size, 200);
        assert_eq!(cfg.chat_max_pages, 16);
        assert_eq!(
            cfg.employee_defaults.date_of_birth,
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let cfg = SyncConfig::from_yaml_str(
            "hr_to_chat_max_duration_secs: 60\nemployee_defaults:\n  gender: Female\n",
        )
        .unwrap();
        assert_eq!(cfg.hr_to_chat_max_duration_secs, 60);
        assert_eq!(cfg.employee_defaults.gender, "Female");
        assert_eq!(
            cfg.employee_defaults.date_of_joining,
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
        assert_eq!(cfg.password_length, 12);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(SyncConfig::from_yaml_str("  \n").unwrap(), SyncConfig::default());
    }

    #[test]
    fn dates_parse_from_iso_strings() {
        let cfg = SyncConfig::from_yaml_str("employee_defaults:\n  date_of_birth: 1990-05-17\n").unwrap();
        assert_eq!(
            cfg.employee_defaults.date_of_birth,
            NaiveDate::from_ymd_opt(1990, 5, 17).unwrap()
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = SyncConfig::from_yaml_str("cross_reference_lable: typo\n").unwrap_err();
        assert!(matches!(err, ConfigError::YamlParse { .. }), "got {err:?}");
    }

    #[test]
    fn blank_label_is_invalid() {
        let err = SyncConfig::from_yaml_str("cross_reference_label: \"  \"\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "cross_reference_label",
                ..
            }
        ));
    }

    #[test]
    fn blank_role_profile_is_invalid() {
        let err = SyncConfig::from_yaml_str("default_role_profile: \"\"\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "default_role_profile",
                ..
            }
        ));
    }

    #[test]
    fn role_profile_roles_are_configurable() {
        let cfg = SyncConfig::from_yaml_str("role_profile_roles: [Employee]\n").unwrap();
        assert_eq!(cfg.role_profile_roles, vec!["Employee".to_string()]);
        assert!(SyncConfig::default()
            .role_profile_roles
            .iter()
            .any(|r| r == "Employee"));
    }

    #[test]
    fn empty_role_list_is_invalid() {
        let err = SyncConfig::from_yaml_str("role_profile_roles: []\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "role_profile_roles",
                ..
            }
        ));
    }

    #[test]
    fn zero_duration_is_valid() {
        let cfg = SyncConfig::from_yaml_str("chat_to_hr_max_duration_secs: 0\n").unwrap();
        assert!(cfg.max_duration(SyncDirection::ChatToHr).is_zero());
    }
}
