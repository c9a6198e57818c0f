use crate::standings::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Screens of the interactive scoreboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Schedule,
    Teams,
    Matrix,
    Standings,
    Playoffs,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Schedule,
        View::Teams,
        View::Matrix,
        View::Standings,
        View::Playoffs,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            View::Schedule => "Schedule",
            View::Teams => "Teams",
            View::Matrix => "Matrix",
            View::Standings => "Standings",
            View::Playoffs => "Playoffs",
        }
    }

    pub fn index(&self) -> usize {
        View::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }
}

/// Operator preferences that outlive a run: pinned teams and where they
/// left off. Kept apart from the tournament dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub version: u32,
    #[serde(default)]
    pub pinned: Vec<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub view: Option<View>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Create a new empty session state with version 1
    pub fn new() -> Self {
        Self {
            version: 1,
            pinned: Vec::new(),
            category: None,
            view: None,
            updated_at: None,
        }
    }

    pub fn is_pinned(&self, team_id: &str) -> bool {
        self.pinned.iter().any(|id| id == team_id)
    }

    /// Pin a team. Returns false if it was already pinned.
    pub fn pin(&mut self, team_id: &str) -> bool {
        if self.is_pinned(team_id) {
            return false;
        }
        self.pinned.push(team_id.to_string());
        self.touch();
        true
    }

    /// Unpin a team. Returns true if it was pinned.
    pub fn unpin(&mut self, team_id: &str) -> bool {
        let before = self.pinned.len();
        self.pinned.retain(|id| id != team_id);
        let removed = self.pinned.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Flip the pin; returns the new pinned state
    pub fn toggle_pin(&mut self, team_id: &str) -> bool {
        if self.unpin(team_id) {
            false
        } else {
            self.pin(team_id)
        }
    }

    pub fn remember(&mut self, category: Category, view: View) {
        self.category = Some(category);
        self.view = Some(view);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
