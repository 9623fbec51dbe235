//! # Map Subcommand
//!
//! Read-only report of which active chat accounts have an HR employee with
//! the same e-mail. Nothing is written to either directory.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use hrsync_core::{collect_pages, ChatDirectory, EmployeeDirectory};

use crate::{chat_client_from_env, erp_client_from_env, load_sync_config};

/// Arguments for `hrsync map`.
#[derive(Args, Debug)]
pub struct MapArgs {}

/// One matched pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRow {
    pub username: String,
    pub email: String,
    pub employee_id: String,
}

/// Execute the map subcommand.
pub fn run_map(_args: &MapArgs, config_path: Option<&Path>) -> Result<u8> {
    let config = load_sync_config(config_path)?;
    let hr = erp_client_from_env()?;
    let chat = chat_client_from_env()?;

    let rows = collect_rows(&hr, &chat, config.chat_page_size, config.chat_max_pages)?;
    println!("{}", render_map(&rows));
    Ok(0)
}

/// Match every live human chat account against the HR directory.
///
/// Lookup failures for a single account are logged and the account left
/// out of the report.
pub fn collect_rows(
    hr: &dyn EmployeeDirectory,
    chat: &dyn ChatDirectory,
    page_size: usize,
    max_pages: usize,
) -> Result<Vec<MapRow>> {
    let accounts = collect_pages(page_size, max_pages, |page| chat.list_active_accounts(page))
        .context("listing chat accounts")?;

    let mut rows = Vec::new();
    for account in accounts.items.iter().filter(|a| a.is_alive() && !a.is_bot) {
        let Some(key) = account.match_key() else {
            continue;
        };
        match hr.find_employee_by_email(key.as_str()) {
            Ok(Some(employee)) => rows.push(MapRow {
                username: account.username.clone(),
                email: account.email.trim().to_string(),
                employee_id: employee.id.to_string(),
            }),
            Ok(None) => {}
            Err(err) => tracing::error!(email = %key, error = %err, "employee lookup failed"),
        }
    }
    Ok(rows)
}

/// Markdown table of matched pairs with a total.
pub fn render_map(rows: &[MapRow]) -> String {
    if rows.is_empty() {
        return "No chat accounts matched HR employees by email.".to_string();
    }
    let mut out = String::from("### Chat Accounts Mapped to HR Employees\n\n");
    out.push_str("| Chat Username | Email | Employee ID |\n");
    out.push_str("|---------------|-------|-------------|\n");
    for row in rows {
        out.push_str(&format!("| {} | {} | {} |\n", row.username, row.email, row.employee_id));
    }
    out.push_str(&format!("\n**Total matched accounts:** {}", rows.len()));
    out
}
