use crate::dataset::TiePolicy;
use crate::standings::Category;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

fn default_save_debounce() -> String {
    "150ms".to_string()
}

/// Color scheme selection for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Detect from the terminal background
    #[default]
    Auto,
    Dark,
    Light,
}

/// Main configuration.
///
/// Example YAML:
/// ```yaml
/// data_path: ~/bonspiel/userbase.json
/// default_category: M
/// save_debounce: 250ms
/// tie_policy: reject
/// theme: dark
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Tournament dataset file (default: ~/.config/bonspiel/userbase.json)
    #[serde(default)]
    pub data_path: Option<String>,

    /// Category shown when nothing else is selected
    #[serde(default)]
    pub default_category: Category,

    /// Idle time after the last score edit before the dataset is written
    #[serde(default = "default_save_debounce")]
    pub save_debounce: String,

    /// What to do with completed matches that have equal scores
    #[serde(default)]
    pub tie_policy: TiePolicy,

    #[serde(default)]
    pub theme: ThemeMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            default_category: Category::All,
            save_debounce: default_save_debounce(),
            tie_policy: TiePolicy::Preserve,
            theme: ThemeMode::Auto,
        }
    }
}

impl Config {
    /// Resolved dataset path, with a leading `~/` expanded
    pub fn data_path(&self) -> PathBuf {
        match self.data_path.as_deref() {
            Some(path) => expand_home(path),
            None => crate::dataset::get_default_data_path(),
        }
    }

    /// Parsed save debounce window
    pub fn save_debounce(&self) -> anyhow::Result<Duration> {
        Ok(humantime::parse_duration(self.save_debounce.trim())?)
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.save_debounce().unwrap(), Duration::from_millis(150));
    }

    #[test]
    fn test_full_config_parses() {
        let yaml = r#"
data_path: /srv/bonspiel/userbase.json
default_category: W
save_debounce: 2s
tie_policy: reject
theme: light
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.default_category, Category::Women);
        assert_eq!(config.tie_policy, TiePolicy::Reject);
        assert_eq!(config.theme, ThemeMode::Light);
        assert_eq!(config.save_debounce().unwrap(), Duration::from_secs(2));
        assert_eq!(
            config.data_path(),
            PathBuf::from("/srv/bonspiel/userbase.json")
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("colour: blue\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_roundtrip_yaml() {
        let config = Config {
            default_category: Category::Men,
            ..Config::default()
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_home_expansion() {
        let config = Config {
            data_path: Some("~/scores/userbase.json".to_string()),
            ..Config::default()
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.data_path(), home.join("scores/userbase.json"));
        }
    }
}
