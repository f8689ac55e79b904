//! YAML configuration for the `ddl` and `sboot` commands.
//!
//! Command-line flags override file values, which override built-in defaults.

use crate::render::{SqlDialect, StackEnv, DEFAULT_STRING_TYPE};
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default output of the `ddl` command
pub const DEFAULT_DDL_FILE: &str = "src/main/resources/database/db_create.sql";

/// Default output of the `sboot` command
pub const DEFAULT_SBOOT_FILE: &str = "sboot_generate.sh";

/// DDL generation settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DdlConfig {
    pub dialect: Option<SqlDialect>,
    /// Output script path
    pub file: Option<PathBuf>,
    /// Column type for fields declared without a type
    pub default_string_type: Option<String>,
}

/// Scaffold generation settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SbootConfig {
    pub env: Option<StackEnv>,
    /// Output script path
    pub file: Option<PathBuf>,
}

/// Complete YAML configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct YamlConfig {
    pub ddl: DdlConfig,
    pub sboot: SbootConfig,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Load `path` when given, otherwise use defaults
    pub fn load_optional(path: Option<&Path>) -> anyhow::Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

/// Effective `ddl` settings after merging flags and file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlSettings {
    pub dialect: SqlDialect,
    pub file: PathBuf,
    pub default_string_type: String,
}

impl DdlSettings {
    pub fn resolve(dialect: Option<SqlDialect>, file: Option<PathBuf>, config: &DdlConfig) -> Self {
        Self {
            dialect: dialect.or(config.dialect).unwrap_or_default(),
            file: file
                .or_else(|| config.file.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DDL_FILE)),
            default_string_type: config
                .default_string_type
                .clone()
                .unwrap_or_else(|| DEFAULT_STRING_TYPE.to_string()),
        }
    }
}

/// Effective `sboot` settings after merging flags and file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbootSettings {
    pub env: StackEnv,
    pub file: PathBuf,
}

impl SbootSettings {
    pub fn resolve(env: Option<StackEnv>, file: Option<PathBuf>, config: &SbootConfig) -> Self {
        Self {
            env: env.or(config.env).unwrap_or_default(),
            file: file
                .or_else(|| config.file.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SBOOT_FILE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
ddl:
  dialect: oracle
  file: db/create.sql
  default_string_type: Varchar2(100)
sboot:
  env: api
"#;
        let config = YamlConfig::parse(yaml).unwrap();
        assert_eq!(config.ddl.dialect, Some(SqlDialect::Oracle));
        assert_eq!(config.ddl.file, Some(PathBuf::from("db/create.sql")));
        assert_eq!(config.sboot.env, Some(StackEnv::Api));
        assert_eq!(config.sboot.file, None);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(YamlConfig::parse("ddl:\n  dialekt: h2\n").is_err());
        assert!(YamlConfig::parse("output: x\n").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let config = YamlConfig::parse("ddl:\n  dialect: oracle\n  file: a.sql\n").unwrap();

        let settings = DdlSettings::resolve(Some(SqlDialect::H2), None, &config.ddl);
        assert_eq!(settings.dialect, SqlDialect::H2);
        assert_eq!(settings.file, PathBuf::from("a.sql"));
        assert_eq!(settings.default_string_type, DEFAULT_STRING_TYPE);

        let sboot = SbootSettings::resolve(None, None, &config.sboot);
        assert_eq!(sboot.env, StackEnv::Fullstack);
        assert_eq!(sboot.file, PathBuf::from(DEFAULT_SBOOT_FILE));
    }
}
