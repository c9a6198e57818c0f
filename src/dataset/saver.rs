use super::storage::save_dataset_file;
use super::store::MatchStore;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Wait between attempts after a failed write
const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing changed since the last save
    Clean,
    Saved,
}

/// Coalesces bursts of score commits into a single dataset write.
///
/// Every commit pushes the deadline out by the debounce window; the write
/// happens once the operator has been idle that long. A failed write keeps
/// the changes in memory and retries later.
#[derive(Debug)]
pub struct DebouncedSaver {
    path: PathBuf,
    debounce: Duration,
    deadline: Option<Instant>,
    last_saved: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl DebouncedSaver {
    pub fn new(path: PathBuf, debounce: Duration) -> Self {
        Self {
            path,
            debounce,
            deadline: None,
            last_saved: None,
            last_error: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mark_dirty(&mut self, now: Instant) {
        self.deadline = Some(now + self.debounce);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Write immediately if the store has unsaved changes
    pub fn flush(&mut self, store: &mut MatchStore) -> Result<SaveOutcome> {
        if !store.is_dirty() {
            self.deadline = None;
            return Ok(SaveOutcome::Clean);
        }

        let generation = store.generation();
        match save_dataset_file(&self.path, store.dataset()) {
            Ok(()) => {
                store.mark_saved(generation);
                self.deadline = None;
                self.last_saved = Some(Utc::now());
                self.last_error = None;
                Ok(SaveOutcome::Saved)
            }
            Err(e) => {
                self.deadline = Some(Instant::now() + RETRY_DELAY);
                self.last_error = Some(format!("{:#}", e));
                Err(e)
            }
        }
    }

    /// Flush if the debounce window has elapsed; None when nothing was due
    pub fn tick(&mut self, now: Instant, store: &mut MatchStore) -> Option<Result<SaveOutcome>> {
        if self.is_due(now) {
            Some(self.flush(store))
        } else {
            None
        }
    }
}
