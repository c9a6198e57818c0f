use super::store::{parse_dataset, validate_dataset, MatchStore, TiePolicy};
use super::types::Dataset;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Get the default dataset path (~/.config/bonspiel/userbase.json)
pub fn get_default_data_path() -> PathBuf {
    crate::config::get_config_dir().join("userbase.json")
}

/// Read and validate a dataset file without loading it anywhere
pub fn read_dataset_file(path: &Path, tie_policy: TiePolicy) -> Result<Dataset> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset at {}", path.display()))?;
    let dataset = parse_dataset(&contents)
        .with_context(|| format!("Failed to load dataset from {}", path.display()))?;
    validate_dataset(&dataset, tie_policy)
        .with_context(|| format!("Failed to load dataset from {}", path.display()))?;
    Ok(dataset)
}

/// Build a store from a dataset file
pub fn load_dataset_file(path: &Path, tie_policy: TiePolicy) -> Result<MatchStore> {
    let dataset = read_dataset_file(path, tie_policy)?;
    let mut store = MatchStore::new(tie_policy);
    store.load_dataset(dataset)?;
    Ok(store)
}

/// Write the whole dataset to a JSON file atomically
///
/// Uses atomic-write-file so a crash mid-write never leaves a truncated
/// dataset behind. Output is pretty-printed with 4-space indentation.
pub fn save_dataset_file(path: &Path, dataset: &Dataset) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut file, formatter);
    dataset
        .serialize(&mut serializer)
        .context("Failed to serialize dataset")?;

    file.commit()
        .with_context(|| format!("Failed to save dataset to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::store::fixtures::sample_store;
    use std::env;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_path = env::temp_dir().join("bonspiel_test_dataset_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut store = sample_store();
        store.commit_score(3, "B", 6, 2, true).unwrap();
        save_dataset_file(&temp_path, store.dataset()).unwrap();

        let loaded = load_dataset_file(&temp_path, TiePolicy::Preserve).unwrap();
        assert_eq!(loaded.dataset(), store.dataset());
        let m = loaded.find_match(3, "B").unwrap();
        assert_eq!((m.score1, m.score2, m.completed), (6, 2, true));
        assert!(!loaded.is_dirty());

        let raw = std::fs::read_to_string(&temp_path).unwrap();
        assert!(raw.contains("\n    \"teams\""));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let temp_path = env::temp_dir().join("bonspiel_test_dataset_missing.json");
        let _ = std::fs::remove_file(&temp_path);

        let err = load_dataset_file(&temp_path, TiePolicy::Preserve).unwrap_err();
        assert!(err.to_string().contains("Failed to read dataset"));
    }

    #[test]
    fn test_load_invalid_file_reports_dataset_error() {
        let temp_path = env::temp_dir().join("bonspiel_test_dataset_invalid.json");
        std::fs::write(&temp_path, r#"{"teams": []}"#).unwrap();

        let err = load_dataset_file(&temp_path, TiePolicy::Preserve).unwrap_err();
        let store_err = err.downcast_ref::<crate::dataset::StoreError>();
        assert!(matches!(
            store_err,
            Some(crate::dataset::StoreError::InvalidDataset(_))
        ));

        let _ = std::fs::remove_file(&temp_path);
    }
}
