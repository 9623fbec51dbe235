//! # hrsync-cli -- Command-line trigger for hrsync
//!
//! ## Subcommands
//!
//! - `hrsync sync hr-to-chat|chat-to-hr` -- run one direction and print the result.
//! - `hrsync map` -- list chat accounts that have an employee with the same e-mail.
//! - `hrsync employees count` -- count employees, optionally by status.
//!
//! Connection credentials come from the environment (`ERP_*`, `CHAT_*`);
//! run policy comes from the optional `--config` YAML file.

pub mod employees;
pub mod map;
pub mod sync;

use std::path::Path;

use anyhow::{Context, Result};
use hrsync_chat_client::{ChatApiConfig, ChatClient};
use hrsync_engine::SyncConfig;
use hrsync_erp_client::{ErpApiConfig, ErpClient};

/// Load the run policy from `path`, or the defaults when no file is given.
pub fn load_sync_config(path: Option<&Path>) -> Result<SyncConfig> {
    match path {
        Some(path) => SyncConfig::load(path)
            .with_context(|| format!("loading sync config from {}", path.display())),
        None => Ok(SyncConfig::default()),
    }
}

/// HR client configured from `ERP_*` variables.
pub fn erp_client_from_env() -> Result<ErpClient> {
    let config = ErpApiConfig::from_env().context("reading HR API configuration")?;
    tracing::debug!(?config, "HR API configuration");
    ErpClient::new(config).context("building HR API client")
}

/// Chat client configured from `CHAT_*` variables.
pub fn chat_client_from_env() -> Result<ChatClient> {
    let config = ChatApiConfig::from_env().context("reading chat API configuration")?;
    tracing::debug!(?config, "chat API configuration");
    ChatClient::new(config).context("building chat API client")
}
