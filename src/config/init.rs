use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, Config, ThemeMode};
use crate::dataset::{save_dataset_file, Dataset, TiePolicy};
use crate::standings::Category;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

fn parse_tie_policy(s: &str) -> Option<TiePolicy> {
    match s.trim().to_lowercase().as_str() {
        "preserve" | "p" => Some(TiePolicy::Preserve),
        "reject" | "r" => Some(TiePolicy::Reject),
        _ => None,
    }
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s.trim().to_lowercase().as_str() {
        "auto" => Some(ThemeMode::Auto),
        "dark" => Some(ThemeMode::Dark),
        "light" => Some(ThemeMode::Light),
        _ => None,
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Bonspiel Configuration Wizard");
    println!("=============================");
    println!();

    let defaults = Config::default();

    // 1. Dataset location
    println!("The dataset file holds teams, draws, pools and every score you enter.");
    let data_default = defaults.data_path().display().to_string();
    let data_path = prompt_with_default("Dataset file", &data_default)?;

    // 2. Default category
    println!();
    println!("Which division should open first? A = all, M = men, W = women.");
    let default_category: Category = loop {
        let input = prompt_with_default("Default category", "A")?;
        match input.parse() {
            Ok(category) => break category,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    // 3. Save debounce
    println!();
    println!("Scores are written to disk once you stop typing for a moment.");
    let save_debounce = loop {
        let input = prompt_with_default("Save after idle time", &defaults.save_debounce)?;
        match humantime::parse_duration(&input) {
            Ok(_) => break input,
            Err(e) => println!("  Invalid duration: {}. Try again.", e),
        }
    };

    // 4. Tie policy
    println!();
    println!("Curling games should not end tied. 'preserve' accepts a tied final and");
    println!("counts it as a loss for both teams; 'reject' refuses to save it.");
    let tie_policy = loop {
        let input = prompt_with_default("Tie policy (preserve/reject)", "preserve")?;
        match parse_tie_policy(&input) {
            Some(policy) => break policy,
            None => println!("  Invalid: expected 'preserve' or 'reject'. Try again."),
        }
    };

    // 5. Theme
    let theme = loop {
        let input = prompt_with_default("Theme (auto/dark/light)", "auto")?;
        match parse_theme(&input) {
            Some(theme) => break theme,
            None => println!("  Invalid: expected auto, dark or light. Try again."),
        }
    };

    // 6. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 7. Write config
    let data_path = if data_path == data_default {
        None
    } else {
        Some(data_path)
    };
    let config = Config {
        data_path,
        default_category,
        save_debounce,
        tie_policy,
        theme,
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());

    // 8. Offer an empty dataset skeleton
    let dataset_path = config.data_path();
    if !dataset_path.exists()
        && prompt_yes_no(
            &format!(
                "No dataset at {}. Create an empty one?",
                dataset_path.display()
            ),
            true,
        )?
    {
        save_dataset_file(&dataset_path, &Dataset::default())?;
        println!("Empty dataset written to {}", dataset_path.display());
        println!("Fill in teams, draws and pools, or run `bonspiel import <file>`.");
    }

    println!("Run `bonspiel` to get started.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tie_policy() {
        assert_eq!(parse_tie_policy("Reject"), Some(TiePolicy::Reject));
        assert_eq!(parse_tie_policy("p"), Some(TiePolicy::Preserve));
        assert_eq!(parse_tie_policy("maybe"), None);
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!(parse_theme("LIGHT"), Some(ThemeMode::Light));
        assert_eq!(parse_theme("sepia"), None);
    }
}
