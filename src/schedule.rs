//! Pure date-based action selection.
//!
//! The wall clock is sampled once per invocation at the CLI edge; everything
//! in here is a plain function of that date and the persisted marker.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;

/// Operation mode requested per invocation, via subcommand or `MOLT_MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Auto,
    Retrieve,
    Delete,
    Initialize,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Auto => "auto",
            Mode::Retrieve => "retrieve",
            Mode::Delete => "delete",
            Mode::Initialize => "initialize",
        })
    }
}

/// What a single invocation will actually do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Retrieve,
    Delete,
    Initialize,
}

/// Maps the requested mode and calendar position to one action.
///
/// Explicit modes pass through untouched. `Auto` bootstraps when nothing is
/// on record, retrieves on the first of the month, and deletes on every
/// other day.
pub fn select_action(mode: Mode, today: NaiveDate, last_run: Option<NaiveDate>) -> Action {
    match mode {
        Mode::Retrieve => Action::Retrieve,
        Mode::Delete => Action::Delete,
        Mode::Initialize => Action::Initialize,
        Mode::Auto => {
            if last_run.is_none() {
                Action::Initialize
            } else if today.day() == 1 {
                Action::Retrieve
            } else {
                Action::Delete
            }
        }
    }
}

/// The daily delete budget is spent once any run has been stamped today.
pub fn daily_budget_spent(today: NaiveDate, last_run: Option<NaiveDate>) -> bool {
    last_run == Some(today)
}
