use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TABLE: &str = "users";
pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub source: SourceConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub records_path: Option<String>,
    pub table: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub format: Option<String>,
}

impl GatewayConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GatewayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GatewayError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GatewayError::ConfigError {
            message: format!("environment pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        self.validated_records_path().map(|_| ())
    }

    /// Validates the whole config and hands back the records path it requires.
    pub fn validated_records_path(&self) -> Result<&str> {
        let records_path = validate_required_field("source.records_path", &self.source.records_path)?;
        validate_path("source.records_path", records_path)?;

        if let Some(table) = &self.source.table {
            validate_non_empty_string("source.table", table)?;
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            validate_one_of("logging.format", format, &LOG_FORMATS)?;
        }

        Ok(records_path.as_str())
    }

    pub fn records_path(&self) -> Option<&str> {
        self.source.records_path.as_deref()
    }

    pub fn table(&self) -> &str {
        self.source.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f == "json")
            .unwrap_or(false)
    }
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[source]
records_path = "./data/users.json"
table = "people"

[logging]
verbose = true
format = "json"
"#;

        let config = GatewayConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.records_path(), Some("./data/users.json"));
        assert_eq!(config.table(), "people");
        assert!(config.verbose());
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::from_toml_str("[source]\nrecords_path = \"users.json\"\n").unwrap();

        assert_eq!(config.table(), DEFAULT_TABLE);
        assert!(!config.verbose());
        assert!(!config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ART_GATEWAY_TEST_DATA_DIR", "/srv/data");

        let toml_content = r#"
[source]
records_path = "${ART_GATEWAY_TEST_DATA_DIR}/users.json"
"#;

        let config = GatewayConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.records_path(), Some("/srv/data/users.json"));

        std::env::remove_var("ART_GATEWAY_TEST_DATA_DIR");
    }

    #[test]
    fn test_unset_env_var_is_left_in_place() {
        let toml_content = r#"
[source]
records_path = "${ART_GATEWAY_SURELY_UNSET}/users.json"
"#;

        let config = GatewayConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.records_path(),
            Some("${ART_GATEWAY_SURELY_UNSET}/users.json")
        );
    }

    #[test]
    fn test_config_validation() {
        let missing_path = GatewayConfig::from_toml_str("[source]\ntable = \"users\"\n").unwrap();
        assert!(matches!(
            missing_path.validate(),
            Err(GatewayError::MissingConfigError { .. })
        ));

        let bad_format = GatewayConfig::from_toml_str(
            "[source]\nrecords_path = \"users.json\"\n[logging]\nformat = \"xml\"\n",
        )
        .unwrap();
        assert!(matches!(
            bad_format.validate(),
            Err(GatewayError::InvalidConfigValueError { .. })
        ));

        let blank_table = GatewayConfig::from_toml_str(
            "[source]\nrecords_path = \"users.json\"\ntable = \" \"\n",
        )
        .unwrap();
        assert!(blank_table.validate().is_err());
    }

    #[test]
    fn test_validated_records_path() {
        let config = GatewayConfig::from_toml_str("[source]\nrecords_path = \"users.json\"\n").unwrap();
        assert_eq!(config.validated_records_path().unwrap(), "users.json");

        let missing_path = GatewayConfig::default();
        assert!(matches!(
            missing_path.validated_records_path(),
            Err(GatewayError::MissingConfigError { .. })
        ));

        let bad_format = GatewayConfig::from_toml_str(
            "[source]\nrecords_path = \"users.json\"\n[logging]\nformat = \"xml\"\n",
        )
        .unwrap();
        assert!(bad_format.validated_records_path().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            GatewayConfig::from_toml_str("[source\nrecords_path = 1"),
            Err(GatewayError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[source]\nrecords_path = \"./users.json\"\n")
            .unwrap();

        let config = GatewayConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.records_path(), Some("./users.json"));
    }
}
