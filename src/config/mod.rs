pub mod toml_config;

pub use toml_config::GatewayConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "art-gateway")]
#[command(about = "Look up domain entities through a synthesized gateway adapter")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// JSON file holding the record table (overrides source.records_path)
    #[arg(long)]
    pub records: Option<String>,

    /// Record table name (overrides source.table)
    #[arg(long)]
    pub table: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List the operations the user gateway exposes
    Describe,
    /// Look a user up by id
    FindById { id: i64 },
    /// Look a user up by email
    FindByEmail { email: String },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數覆蓋 TOML 設定
    pub fn resolve(&self) -> Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::from_file(path)?,
            None => GatewayConfig::default(),
        };

        if let Some(records) = &self.records {
            config.source.records_path = Some(records.clone());
        }
        if let Some(table) = &self.table {
            config.source.table = Some(table.clone());
        }

        let logging = config.logging.get_or_insert_with(Default::default);
        if self.verbose {
            logging.verbose = Some(true);
        }
        if self.json_logs {
            logging.format = Some("json".to_string());
        }

        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_subcommands() {
        let cli = CliConfig::try_parse_from(["art-gateway", "find-by-id", "1"]).unwrap();
        assert_eq!(cli.command, Command::FindById { id: 1 });

        let cli = CliConfig::try_parse_from([
            "art-gateway",
            "--records",
            "users.json",
            "find-by-email",
            "luke@example.com",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::FindByEmail {
                email: "luke@example.com".to_string()
            }
        );
        assert_eq!(cli.records.as_deref(), Some("users.json"));
    }

    #[test]
    fn test_flags_override_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[source]\nrecords_path = \"from-file.json\"\ntable = \"people\"\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from([
            "art-gateway",
            "--config",
            path.as_str(),
            "--records",
            "from-flag.json",
            "--json-logs",
            "describe",
        ])
        .unwrap();

        let config = cli.resolve().unwrap();
        assert_eq!(config.records_path(), Some("from-flag.json"));
        assert_eq!(config.table(), "people");
        assert!(config.json_logs());
        assert!(!config.verbose());
    }

    #[test]
    fn test_resolve_without_file() {
        let cli = CliConfig::try_parse_from(["art-gateway", "-v", "describe"]).unwrap();
        let config = cli.resolve().unwrap();

        assert_eq!(config.records_path(), None);
        assert!(config.verbose());
    }
}
