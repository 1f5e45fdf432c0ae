use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::DEFAULT_BASE_NUMBER;
use crate::error::{GroupnumError, Result};
use crate::export::ExportFormat;

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_RULES_FILE: &str = "rules.toml";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# groupnum configuration file
# Location: ~/.groupnum/config.toml

[numbering]
# Prefix for every generated number (free text)
# Default: "13"
base_number = "13"

[export]
# Output container: xlsx, csv or xls
# Default: "xlsx"
format = "xlsx"

# File name without extension; also used as the sheet name
# Default: "" (writes export.<format> with sheet Sheet1)
file_name = ""

[rules]
# Rules file used when --rules is not given
# Relative paths resolve against this directory
# Default: "rules.toml"
path = "rules.toml"
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub numbering: NumberingConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberingConfig {
    #[serde(default = "default_base_number")]
    pub base_number: String,
}

fn default_base_number() -> String {
    DEFAULT_BASE_NUMBER.to_string()
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            base_number: default_base_number(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExportConfig {
    #[serde(default)]
    pub format: ExportFormat,
    /// Empty means the default `export` name
    #[serde(default)]
    pub file_name: String,
}

impl ExportConfig {
    pub fn file_name(&self) -> Option<&str> {
        let name = self.file_name.trim();
        (!name.is_empty()).then_some(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "default_rules_path")]
    pub path: PathBuf,
}

fn default_rules_path() -> PathBuf {
    PathBuf::from(DEFAULT_RULES_FILE)
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            path: default_rules_path(),
        }
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| GroupnumError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self).map_err(|e| GroupnumError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Rules file location, resolved against the base directory
    pub fn rules_path(&self, base_dir: &Path) -> PathBuf {
        if self.rules.path.is_absolute() {
            self.rules.path.clone()
        } else {
            base_dir.join(&self.rules.path)
        }
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "numbering.base_number" => Some(self.numbering.base_number.clone()),
            "export.format" => Some(self.export.format.to_string()),
            "export.file_name" => Some(self.export.file_name.clone()),
            "rules.path" => Some(self.rules.path.display().to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "numbering.base_number" => {
                self.numbering.base_number = value.to_string();
                Ok(())
            }
            "export.format" => {
                self.export.format = value.parse()?;
                Ok(())
            }
            "export.file_name" => {
                self.export.file_name = value.trim().to_string();
                Ok(())
            }
            "rules.path" => {
                self.rules.path = PathBuf::from(value.trim());
                Ok(())
            }
            _ => Err(GroupnumError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        ["numbering.base_number", "export.format", "export.file_name", "rules.path"]
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.numbering.base_number, "13");
        assert_eq!(config.export.format, ExportFormat::Xlsx);
        assert_eq!(config.export.file_name(), None);
        assert_eq!(config.rules.path, PathBuf::from("rules.toml"));
    }

    #[test]
    fn test_template_matches_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.numbering.base_number, "13");
        assert_eq!(config.export.format, ExportFormat::Xlsx);
        assert_eq!(config.export.file_name(), None);
    }

    #[test]
    fn test_config_get_set() {
        let mut config = Config::default();

        config.set("numbering.base_number", "A-7").unwrap();
        config.set("export.format", "csv").unwrap();
        config.set("export.file_name", " fruits ").unwrap();

        assert_eq!(config.get("numbering.base_number").unwrap(), "A-7");
        assert_eq!(config.get("export.format").unwrap(), "csv");
        assert_eq!(config.export.file_name(), Some("fruits"));
    }

    #[test]
    fn test_config_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("export.format", "pdf"),
            Err(GroupnumError::InvalidExportFormat { .. })
        ));
        assert!(matches!(
            config.set("nope", "x"),
            Err(GroupnumError::ConfigKeyNotFound { .. })
        ));
    }

    #[test]
    fn test_list_covers_every_key() {
        let keys: Vec<String> = Config::default().list().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "numbering.base_number",
                "export.format",
                "export.file_name",
                "rules.path"
            ]
        );
    }

    #[test]
    fn test_save_load_and_init() {
        let temp = TempDir::new().unwrap();

        let path = Config::init(temp.path()).unwrap();
        assert!(path.exists());
        assert_eq!(Config::load(temp.path()).unwrap().numbering.base_number, "13");

        let mut config = Config::default();
        config.set("numbering.base_number", "99").unwrap();
        config.save(temp.path()).unwrap();
        assert_eq!(Config::load(temp.path()).unwrap().numbering.base_number, "99");
    }

    #[test]
    fn test_rules_path_resolution() {
        let mut config = Config::default();
        let base = Path::new("/home/user/.groupnum");
        assert_eq!(config.rules_path(base), base.join("rules.toml"));

        config.set("rules.path", "/tmp/other.toml").unwrap();
        assert_eq!(config.rules_path(base), PathBuf::from("/tmp/other.toml"));
    }
}
