//! Runtime configuration resolved from flags, environment and defaults.

use crate::cli::Cli;
use std::path::{Path, PathBuf};
use subtrack_core::default_log_level;

const APP_DIR_NAME: &str = "subtrack";
const DB_FILE_NAME: &str = "subtrack.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Fills unset options: the database goes to the platform data
    /// directory (temp dir if there is none), logs next to the database.
    pub fn resolve(cli: &Cli) -> Self {
        let db_path = cli
            .db_path
            .as_deref()
            .map(absolutize)
            .unwrap_or_else(default_db_path);
        let log_dir = cli
            .log_dir
            .as_deref()
            .map(absolutize)
            .unwrap_or_else(|| default_log_dir(&db_path));
        let log_level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());

        Self {
            db_path,
            log_level,
            log_dir,
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME))
        .join(DB_FILE_NAME)
}

fn default_log_dir(db_path: &Path) -> PathBuf {
    db_path
        .parent()
        .map(|dir| dir.join(LOG_DIR_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME).join(LOG_DIR_NAME))
}

// Log directories must be absolute; relative flags resolve against the cwd.
fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use crate::cli::Cli;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn explicit_flags_win() {
        let cli = Cli::try_parse_from([
            "subtrack",
            "--db-path",
            "/data/subs.sqlite3",
            "--log-dir",
            "/var/log/subtrack",
            "--log-level",
            "warn",
            "list",
        ])
        .unwrap();

        let config = AppConfig::resolve(&cli);
        assert_eq!(config.db_path, PathBuf::from("/data/subs.sqlite3"));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/subtrack"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn log_dir_defaults_next_to_database() {
        let cli =
            Cli::try_parse_from(["subtrack", "--db-path", "/data/subs.sqlite3", "list"]).unwrap();

        let config = AppConfig::resolve(&cli);
        assert_eq!(config.log_dir, PathBuf::from("/data/logs"));
    }

    #[test]
    fn relative_db_path_becomes_absolute() {
        let cli = Cli::try_parse_from(["subtrack", "--db-path", "subs.sqlite3", "list"]).unwrap();

        let config = AppConfig::resolve(&cli);
        assert!(config.db_path.is_absolute());
        assert!(config.log_dir.is_absolute());
        assert!(config.db_path.ends_with("subs.sqlite3"));
    }
}
