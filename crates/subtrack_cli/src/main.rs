//! `subtrack` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration and bring up logging.
//! - Open storage, load the subscription list once, run one command.

mod cli;
mod commands;
mod config;

use clap::Parser;
use cli::{Cli, Command};
use commands::{print_version, run, CliError};
use config::AppConfig;
use log::info;
use std::io::Write;
use std::process::ExitCode;
use subtrack_core::{init_logging, RecordStore, SqliteKeyValueStore};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli);

    // Logging is diagnostics only; the command still runs without it.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let stdout = std::io::stdout();
    match execute(cli, &config, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli, config: &AppConfig, out: &mut impl Write) -> Result<(), CliError> {
    if cli.command == Command::Version {
        return print_version(out);
    }

    let kv = SqliteKeyValueStore::open(&config.db_path)?;
    let mut store = RecordStore::with_store(kv);
    info!(
        "event=cli_command module=cli status=start command={} count={}",
        cli.command.label(),
        store.len()
    );
    run(cli.command, &mut store, out)
}

#[cfg(test)]
mod tests {
    use super::execute;
    use crate::cli::Cli;
    use crate::config::AppConfig;
    use clap::Parser;
    use std::path::Path;

    fn launch(db_path: &Path, args: &[&str]) -> Result<String, String> {
        let db_arg = db_path.to_str().expect("temp path should be valid UTF-8");
        let argv = ["subtrack", "--db-path", db_arg]
            .into_iter()
            .chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).map_err(|err| err.to_string())?;
        let config = AppConfig::resolve(&cli);

        let mut out = Vec::new();
        execute(cli, &config, &mut out).map_err(|err| err.to_string())?;
        Ok(String::from_utf8(out).expect("output should be UTF-8"))
    }

    #[test]
    fn added_subscription_is_listed_by_next_launch() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("subtrack.sqlite3");

        let added = launch(
            &db_path,
            &["add", "--name", "Netflix", "--amount", "15.49", "--date", "2026-11-03"],
        )
        .unwrap();
        assert_eq!(added, "Logged Netflix (15.49) renewing 2026-11-03.\n");

        let listing = launch(&db_path, &["list"]).unwrap();
        let rows: Vec<&str> = listing.lines().skip(1).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].trim_start().starts_with("0  Netflix"));
        assert!(rows[0].ends_with("2026-11-03"));
    }

    #[test]
    fn removal_persists_across_launches() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("subtrack.sqlite3");
        for name in ["A", "B", "C"] {
            launch(&db_path, &["add", "--name", name, "--amount", "1"]).unwrap();
        }

        launch(&db_path, &["remove", "0", "2"]).unwrap();

        let listing = launch(&db_path, &["list"]).unwrap();
        let rows: Vec<&str> = listing.lines().skip(1).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].trim_start().starts_with("0  B"));
    }

    #[test]
    fn version_runs_without_usable_storage() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let db_path = blocker.join("subtrack.sqlite3");

        let err = launch(&db_path, &["list"]).unwrap_err();
        assert!(err.contains("cannot open subscription storage"), "{err}");

        let version = launch(&db_path, &["version"]).unwrap();
        assert!(version.starts_with("subtrack_core "));
    }
}
