//! # Sync Subcommand
//!
//! Runs one direction synchronously and prints the complete result document.
//!
//! Exit codes:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Run completed and no record failed |
//! | 2 | Run timed out or at least one record failed |
//! | 1 | Fatal error (configuration, bootstrap, enumeration) |

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use hrsync_core::{SyncDirection, SyncResult};
use hrsync_engine::SyncEngine;

use crate::{chat_client_from_env, erp_client_from_env, load_sync_config};

/// Output format for the result document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// Summary line followed by the per-record lines.
    Text,
}

/// Arguments for `hrsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Direction to run: `hr-to-chat` or `chat-to-hr`.
    pub direction: SyncDirection,

    /// Override the configured deadline, in seconds.
    #[arg(long)]
    pub max_duration: Option<u64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the sync subcommand.
pub fn run_sync(args: &SyncArgs, config_path: Option<&Path>) -> Result<u8> {
    let config = load_sync_config(config_path)?;
    let deadline = args
        .max_duration
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.max_duration(args.direction));

    let hr = erp_client_from_env()?;
    let chat = chat_client_from_env()?;
    let engine = SyncEngine::new(config, &hr, &chat, &chat)?;

    let result = engine
        .run_with_deadline(args.direction, deadline)
        .with_context(|| format!("sync {} aborted", args.direction))?;

    println!("{}", render(&result, args.format)?);
    Ok(exit_code(&result))
}

/// Process exit code for a finished run.
pub fn exit_code(result: &SyncResult) -> u8 {
    if result.timed_out || result.has_failures() {
        2
    } else {
        0
    }
}

/// Render `result` in `format`.
pub fn render(result: &SyncResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(result).context("serializing sync result")
        }
        OutputFormat::Text => Ok(render_text(result)),
    }
}

fn render_text(result: &SyncResult) -> String {
    let mut out = result.summary();
    if result.source_truncated {
        out.push_str(&format!(
            "\nWARNING: source enumeration stopped at its page ceiling after {} records",
            result.source_size
        ));
    }
    if result.login_users_created + result.login_users_existing > 0 {
        out.push_str(&format!(
            "\nHR login users created: {}, already present: {}",
            result.login_users_created, result.login_users_existing
        ));
    }
    if result.credential_deliveries_failed > 0 {
        out.push_str(&format!(
            "\nCredential deliveries failed: {}",
            result.credential_deliveries_failed
        ));
    }
    if !result.lines.is_empty() {
        out.push('\n');
        for line in &result.lines {
            out.push('\n');
            out.push_str(line);
        }
    }
    out
}
