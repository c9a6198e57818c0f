use super::types::SessionState;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default session state file path (~/.config/bonspiel/session.json)
pub fn get_session_path() -> PathBuf {
    crate::config::get_config_dir().join("session.json")
}

/// Load session state from a JSON file
///
/// If the file doesn't exist, returns a new empty state.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_session_state(path: &Path) -> Result<SessionState> {
    if !path.exists() {
        return Ok(SessionState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open session file at {}", path.display()))?;

    let state: SessionState =
        serde_json::from_reader(file).context("Failed to load session state")?;

    if state.version != 1 {
        anyhow::bail!("Unsupported session state version: {}", state.version);
    }

    Ok(state)
}

/// Save session state to a JSON file atomically
pub fn save_session_state(path: &Path, state: &SessionState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize session state")?;

    file.commit().context("Failed to save session state")?;

    Ok(())
}
