use super::schema::Config;

/// Upper bound for the save debounce; longer windows risk losing scores
const MAX_DEBOUNCE_SECS: u64 = 60;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref path) = config.data_path {
        if path.trim().is_empty() {
            errors.push("data_path: must not be empty".to_string());
        } else if config.data_path().is_dir() {
            errors.push(format!("data_path: '{}' is a directory", path));
        }
    }

    match humantime::parse_duration(config.save_debounce.trim()) {
        Ok(d) if d.as_secs() > MAX_DEBOUNCE_SECS => errors.push(format!(
            "save_debounce: '{}' is longer than {}s",
            config.save_debounce, MAX_DEBOUNCE_SECS
        )),
        Ok(_) => {}
        Err(e) => errors.push(format!(
            "save_debounce: invalid duration '{}' - {}",
            config.save_debounce, e
        )),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_debounce() {
        let config = Config {
            save_debounce: "soon".to_string(),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("save_debounce"));
    }

    #[test]
    fn test_debounce_too_long() {
        let config = Config {
            save_debounce: "5m".to_string(),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("longer than"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = Config {
            data_path: Some("  ".to_string()),
            save_debounce: "bad".to_string(),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_directory_data_path() {
        let config = Config {
            data_path: Some(std::env::temp_dir().display().to_string()),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("is a directory"));
    }
}
