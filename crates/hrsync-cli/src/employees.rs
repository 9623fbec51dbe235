//! # Employees Subcommand

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use hrsync_core::{EmployeeDirectory, EmployeeFilter};

use crate::erp_client_from_env;

/// Arguments for `hrsync employees`.
#[derive(Args, Debug)]
pub struct EmployeesArgs {
    #[command(subcommand)]
    pub command: EmployeesCommand,
}

/// Employee subcommands.
#[derive(Subcommand, Debug)]
pub enum EmployeesCommand {
    /// Print the number of employees.
    Count {
        /// Only count employees with this status (e.g. `Active`).
        #[arg(long)]
        status: Option<String>,
    },
}

/// Execute the employees subcommand.
pub fn run_employees(args: &EmployeesArgs) -> Result<u8> {
    match &args.command {
        EmployeesCommand::Count { status } => {
            let hr = erp_client_from_env()?;
            let count = count(&hr, status.as_deref())?;
            println!("{}", describe_count(count));
            Ok(0)
        }
    }
}

/// Count employees, optionally filtered by status.
pub fn count(hr: &dyn EmployeeDirectory, status: Option<&str>) -> Result<u64> {
    let filter = match status {
        Some(status) => EmployeeFilter::status(status),
        None => EmployeeFilter::all(),
    };
    hr.count_employees(&filter).context("counting employees")
}

/// Human-readable count.
pub fn describe_count(count: u64) -> String {
    match count {
        0 => "No employees found.".to_string(),
        1 => "There is 1 employee.".to_string(),
        n => format!("There are {n} employees."),
    }
}
