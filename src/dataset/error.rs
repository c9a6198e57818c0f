use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Ingestion payload is malformed or structurally inconsistent
    InvalidDataset(String),
    MatchNotFound { draw_id: u32, sheet: String },
    TeamNotFound(String),
    /// A completed match with equal scores while ties are rejected
    TiedResult { draw_id: u32, sheet: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidDataset(msg) => write!(f, "Invalid dataset: {}", msg),
            StoreError::MatchNotFound { draw_id, sheet } => {
                write!(f, "No match on sheet {} in draw {}", sheet, draw_id)
            }
            StoreError::TeamNotFound(id) => write!(f, "No team with identifier {}", id),
            StoreError::TiedResult { draw_id, sheet } => write!(
                f,
                "Draw {} sheet {}: a final score cannot be tied",
                draw_id, sheet
            ),
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    /// True for the lookup failures (missing match or team)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::MatchNotFound { .. } | StoreError::TeamNotFound(_)
        )
    }
}
