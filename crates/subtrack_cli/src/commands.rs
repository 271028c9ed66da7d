//! Command execution against an opened record store.
//!
//! Output goes to the supplied writer so commands can be exercised without a
//! terminal.

use crate::cli::Command;
use chrono::{Local, NaiveDate};
use log::warn;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use subtrack_core::{
    core_version, fire_test_alert, AddOutcome, KeyValueStore, LogNotifier, RecordStore,
    Subscription,
};

#[derive(Debug)]
pub enum CliError {
    Storage(subtrack_core::KvError),
    Output(io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "cannot open subscription storage: {err}"),
            Self::Output(err) => write!(f, "cannot write output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<subtrack_core::KvError> for CliError {
    fn from(value: subtrack_core::KvError) -> Self {
        Self::Storage(value)
    }
}

impl From<io::Error> for CliError {
    fn from(value: io::Error) -> Self {
        Self::Output(value)
    }
}

/// Runs one user action to completion.
pub fn run<S: KeyValueStore>(
    command: Command,
    store: &mut RecordStore<S>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::List => render_list(store.all(), out)?,
        Command::Add { name, amount, date } => {
            let renewal_date = date.unwrap_or_else(today);
            // A rejected amount is dropped without a message.
            if let AddOutcome::Added(record) = store.add(name, &amount, renewal_date) {
                writeln!(
                    out,
                    "Logged {} ({:.2}) renewing {}.",
                    record.name, record.amount, record.renewal_date
                )?;
            }
            report_save_failure(store);
        }
        Command::Remove { positions } => {
            let positions: BTreeSet<usize> = positions.into_iter().collect();
            let outcome = store.remove(&positions);
            writeln!(out, "Removed {} subscription(s).", outcome.removed.len())?;
            if !outcome.ignored_positions.is_empty() {
                let ignored: Vec<String> = outcome
                    .ignored_positions
                    .iter()
                    .map(usize::to_string)
                    .collect();
                writeln!(
                    out,
                    "No subscription at position(s) {}; the list has {} entries.",
                    ignored.join(", "),
                    store.len()
                )?;
            }
            report_save_failure(store);
        }
        Command::NotifyTest => {
            if fire_test_alert(&LogNotifier) {
                writeln!(out, "Test notification scheduled.")?;
            }
        }
        Command::Version => print_version(out)?,
    }
    Ok(())
}

/// Needs no storage, so callers may run it before opening the database.
pub fn print_version(out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "subtrack_core {}", core_version())?;
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn report_save_failure<S: KeyValueStore>(store: &RecordStore<S>) {
    if let Some(err) = store.last_save_error() {
        warn!("event=cli_save_warning module=cli status=error error={err}");
        eprintln!("warning: changes were not saved: {err}");
    }
}

fn render_list(records: &[Subscription], out: &mut impl Write) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No subscriptions logged.");
    }

    let name_width = records
        .iter()
        .map(|record| record.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    writeln!(out, "{:>3}  {:<name_width$}  {:>10}  RENEWS", "#", "NAME", "AMOUNT")?;
    for (position, record) in records.iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<name_width$}  {:>10.2}  {}",
            position, record.name, record.amount, record.renewal_date
        )?;
    }
    Ok(())
}
