//! Configuration module for ipdedup
//!
//! Configuration is loaded with the following priority (highest first):
//! 1. Command line arguments
//! 2. Environment variables (prefixed with IPDEDUP_)
//! 3. Configuration file (config.toml/yaml or ipdedup.toml/yaml)
//! 4. Default values

use std::path::PathBuf;

use clap::Parser;
use config::{ConfigError, Environment, File};
use serde::Deserialize;

use crate::ingest::DEFAULT_PROGRESS_INTERVAL;

/// Default input file
const DEFAULT_INPUT_PATH: &str = "ip_addresses.txt";
/// Default database path
const DEFAULT_DATABASE_PATH: &str = "ip_addresses.db";

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "ipdedup")]
#[command(about = "Count distinct IP addresses in a newline-delimited file")]
pub struct CliArgs {
    /// File with one IP address per line
    #[arg(env = "IPDEDUP_INPUT_PATH")]
    pub input_path: Option<PathBuf>,

    /// Path to the SQLite database file (recreated on every run)
    #[arg(long, env = "IPDEDUP_DATABASE_PATH")]
    pub database_path: Option<PathBuf>,

    /// Lines between progress log events (0 disables)
    #[arg(long, env = "IPDEDUP_PROGRESS_INTERVAL")]
    pub progress_interval: Option<u64>,

    /// Path to configuration file
    #[arg(short, long, env = "IPDEDUP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// File-based configuration (for TOML/YAML)
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    input_path: Option<PathBuf>,
    database_path: Option<PathBuf>,
    progress_interval: Option<u64>,
}

/// Configuration for a counting run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Newline-delimited input file
    pub input_path: PathBuf,

    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Lines between progress events
    pub progress_interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl Config {
    /// Create a new configuration with explicit paths
    pub fn new(input_path: impl Into<PathBuf>, database_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            database_path: database_path.into(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Load configuration from all sources (CLI > env > file > defaults)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_args(CliArgs::parse())
    }

    /// Load configuration from provided CLI args (for testing)
    pub fn load_from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        let file_config = Self::load_file_config(&args.config)?;

        // File overrides defaults
        if let Some(input) = file_config.input_path {
            config.input_path = input;
        }
        if let Some(db) = file_config.database_path {
            config.database_path = db;
        }
        if let Some(n) = file_config.progress_interval {
            config.progress_interval = n;
        }

        // CLI overrides everything
        if let Some(input) = args.input_path {
            config.input_path = input;
        }
        if let Some(db) = args.database_path {
            config.database_path = db;
        }
        if let Some(n) = args.progress_interval {
            config.progress_interval = n;
        }

        Ok(config)
    }

    /// Load configuration from file
    fn load_file_config(config_path: &Option<PathBuf>) -> Result<FileConfig, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path.as_path()));
        } else {
            // Try default config files (optional)
            builder = builder
                .add_source(File::with_name("config").required(false))
                .add_source(File::with_name("ipdedup").required(false));
        }

        // Single underscore would split input_path into input.path
        builder = builder.add_source(
            Environment::with_prefix("IPDEDUP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.input_path, PathBuf::from("ip_addresses.txt"));
        assert_eq!(config.database_path, PathBuf::from("ip_addresses.db"));
        assert_eq!(config.progress_interval, 1_000_000);
    }

    #[test]
    fn test_config_new() {
        let config = Config::new("/data/in.txt", "/data/test.db");
        assert_eq!(config.input_path, PathBuf::from("/data/in.txt"));
        assert_eq!(config.database_path, PathBuf::from("/data/test.db"));
        assert_eq!(config.progress_interval, DEFAULT_PROGRESS_INTERVAL);
    }

    #[test]
    fn test_load_from_cli_args() {
        let args = CliArgs {
            input_path: Some(PathBuf::from("/cli/ips.txt")),
            database_path: Some(PathBuf::from("/cli/path.db")),
            progress_interval: Some(10),
            config: None,
        };
        let config = Config::load_from_args(args).unwrap();
        assert_eq!(config.input_path, PathBuf::from("/cli/ips.txt"));
        assert_eq!(config.database_path, PathBuf::from("/cli/path.db"));
        assert_eq!(config.progress_interval, 10);
    }

    #[test]
    fn test_parse_cli() {
        let args = CliArgs::try_parse_from([
            "ipdedup",
            "ips.txt",
            "--database-path",
            "out.db",
            "--progress-interval",
            "0",
        ])
        .unwrap();
        assert_eq!(args.input_path, Some(PathBuf::from("ips.txt")));
        assert_eq!(args.database_path, Some(PathBuf::from("out.db")));
        assert_eq!(args.progress_interval, Some(0));
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
input_path = "/toml/ips.txt"
database_path = "/toml/db.sqlite"
progress_interval = 500
"#
        )
        .unwrap();

        let args = CliArgs {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let config = Config::load_from_args(args).unwrap();
        assert_eq!(config.input_path, PathBuf::from("/toml/ips.txt"));
        assert_eq!(config.database_path, PathBuf::from("/toml/db.sqlite"));
        assert_eq!(config.progress_interval, 500);
    }

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            r#"
input_path: "/yaml/ips.txt"
database_path: "/yaml/db.sqlite"
"#
        )
        .unwrap();

        let args = CliArgs {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let config = Config::load_from_args(args).unwrap();
        assert_eq!(config.input_path, PathBuf::from("/yaml/ips.txt"));
        assert_eq!(config.database_path, PathBuf::from("/yaml/db.sqlite"));
        assert_eq!(config.progress_interval, DEFAULT_PROGRESS_INTERVAL);
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
input_path = "/file/ips.txt"
database_path = "/file/db.sqlite"
"#
        )
        .unwrap();

        let args = CliArgs {
            input_path: Some(PathBuf::from("/cli/ips.txt")),
            database_path: None, // Use file value
            progress_interval: None,
            config: Some(file.path().to_path_buf()),
        };
        let config = Config::load_from_args(args).unwrap();
        assert_eq!(config.input_path, PathBuf::from("/cli/ips.txt")); // CLI
        assert_eq!(config.database_path, PathBuf::from("/file/db.sqlite")); // File
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "progress_interval = \"lots\"").unwrap();

        let args = CliArgs {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert!(Config::load_from_args(args).is_err());
    }
}
