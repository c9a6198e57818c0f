use super::error::StoreError;
use super::types::{clamp_score, Dataset, Draw, Match, Pool, Team};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a completed match with equal scores is treated.
///
/// The counting rule in standings never changes: a team wins only with the
/// strictly higher score, so a tie is a loss for both sides. `Reject` keeps
/// such results out of the store instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TiePolicy {
    #[default]
    Preserve,
    Reject,
}

/// Score fields of a match before a commit, kept so the edit can be undone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSnapshot {
    pub score1: u32,
    pub score2: u32,
    pub completed: bool,
}

impl From<&Match> for ScoreSnapshot {
    fn from(m: &Match) -> Self {
        Self {
            score1: m.score1,
            score2: m.score2,
            completed: m.completed,
        }
    }
}

/// Parse a dataset from JSON text
pub fn parse_dataset(json: &str) -> Result<Dataset, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::InvalidDataset(e.to_string()))
}

/// Build a dataset from an already-parsed JSON value
pub fn dataset_from_value(value: serde_json::Value) -> Result<Dataset, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::InvalidDataset(e.to_string()))
}

/// Structural checks serde cannot express: unique team identifiers, unique
/// (draw, sheet) pairs, and no tied finals when ties are rejected.
pub fn validate_dataset(dataset: &Dataset, tie_policy: TiePolicy) -> Result<(), StoreError> {
    let mut team_ids = HashSet::new();
    for team in &dataset.teams {
        if team.id.trim().is_empty() {
            return Err(StoreError::InvalidDataset(format!(
                "team '{}' has an empty identifier",
                team.name
            )));
        }
        if !team_ids.insert(team.id.as_str()) {
            return Err(StoreError::InvalidDataset(format!(
                "duplicate team identifier {}",
                team.id
            )));
        }
    }

    let mut slots = HashSet::new();
    for draw in &dataset.draws {
        for m in &draw.matches {
            if !slots.insert((draw.id, m.sheet.as_str())) {
                return Err(StoreError::InvalidDataset(format!(
                    "draw {} has more than one match on sheet {}",
                    draw.id, m.sheet
                )));
            }
            if tie_policy == TiePolicy::Reject && m.is_tied_final() {
                return Err(StoreError::InvalidDataset(format!(
                    "draw {} sheet {} is a completed tie",
                    draw.id, m.sheet
                )));
            }
        }
    }

    Ok(())
}

/// In-memory owner of the tournament dataset.
///
/// All reads and mutations go through this value; callers serialize their
/// mutations (single operator, one commit at a time).
#[derive(Debug, Clone, Default)]
pub struct MatchStore {
    dataset: Dataset,
    tie_policy: TiePolicy,
    generation: u64,
    saved_generation: u64,
}

impl MatchStore {
    pub fn new(tie_policy: TiePolicy) -> Self {
        Self {
            dataset: Dataset::default(),
            tie_policy,
            generation: 0,
            saved_generation: 0,
        }
    }

    /// Replace the entire dataset. Nothing from the previous one survives.
    ///
    /// The freshly loaded data is considered in sync with its source.
    pub fn load_dataset(&mut self, dataset: Dataset) -> Result<(), StoreError> {
        validate_dataset(&dataset, self.tie_policy)?;
        self.dataset = dataset;
        self.generation += 1;
        self.saved_generation = self.generation;
        Ok(())
    }

    /// Parse, validate and load a JSON document
    pub fn load_json(&mut self, json: &str) -> Result<(), StoreError> {
        let dataset = parse_dataset(json)?;
        self.load_dataset(dataset)
    }

    pub fn tie_policy(&self) -> TiePolicy {
        self.tie_policy
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn teams(&self) -> &[Team] {
        &self.dataset.teams
    }

    pub fn draws(&self) -> &[Draw] {
        &self.dataset.draws
    }

    pub fn pools(&self) -> &[Pool] {
        &self.dataset.pools
    }

    /// Every match with its draw, in draw order then sheet order
    pub fn all_matches(&self) -> impl Iterator<Item = (&Draw, &Match)> + '_ {
        self.dataset
            .draws
            .iter()
            .flat_map(|d| d.matches.iter().map(move |m| (d, m)))
    }

    pub fn get_team(&self, team_id: &str) -> Option<&Team> {
        self.dataset.teams.iter().find(|t| t.id == team_id)
    }

    /// A completed match between two teams of this dataset. Only these feed
    /// records and head-to-head; a slot naming an unlisted team does not.
    pub fn counts_toward_stats(&self, m: &Match) -> bool {
        m.completed
            && [&m.team1, &m.team2]
                .iter()
                .all(|slot| slot.team_id().is_some_and(|id| self.get_team(id).is_some()))
    }

    pub fn find_draw(&self, draw_id: u32) -> Option<&Draw> {
        self.dataset.draws.iter().find(|d| d.id == draw_id)
    }

    pub fn find_match(&self, draw_id: u32, sheet: &str) -> Option<&Match> {
        self.find_draw(draw_id)
            .and_then(|d| d.matches.iter().find(|m| m.sheet == sheet))
    }

    fn find_match_mut(&mut self, draw_id: u32, sheet: &str) -> Option<&mut Match> {
        self.dataset
            .draws
            .iter_mut()
            .find(|d| d.id == draw_id)
            .and_then(|d| d.matches.iter_mut().find(|m| m.sheet == sheet))
    }

    /// Overwrite a match's scores and completed flag in place.
    ///
    /// Negative scores are stored as 0. Returns the values that were replaced.
    pub fn commit_score(
        &mut self,
        draw_id: u32,
        sheet: &str,
        score1: i64,
        score2: i64,
        completed: bool,
    ) -> Result<ScoreSnapshot, StoreError> {
        let score1 = clamp_score(score1);
        let score2 = clamp_score(score2);
        let tie_policy = self.tie_policy;

        let m = self
            .find_match_mut(draw_id, sheet)
            .ok_or_else(|| StoreError::MatchNotFound {
                draw_id,
                sheet: sheet.to_string(),
            })?;

        if tie_policy == TiePolicy::Reject && completed && score1 == score2 {
            return Err(StoreError::TiedResult {
                draw_id,
                sheet: sheet.to_string(),
            });
        }

        let previous = ScoreSnapshot::from(&*m);
        m.score1 = score1;
        m.score2 = score2;
        m.completed = completed;
        self.generation += 1;
        Ok(previous)
    }

    /// Put back the score fields captured by an earlier commit
    pub fn restore_score(
        &mut self,
        draw_id: u32,
        sheet: &str,
        snapshot: ScoreSnapshot,
    ) -> Result<ScoreSnapshot, StoreError> {
        self.commit_score(
            draw_id,
            sheet,
            i64::from(snapshot.score1),
            i64::from(snapshot.score2),
            snapshot.completed,
        )
    }

    /// Set or clear a team's display color. The only mutable team field.
    pub fn set_team_color(
        &mut self,
        team_id: &str,
        color: Option<String>,
    ) -> Result<(), StoreError> {
        let team = self
            .dataset
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or_else(|| StoreError::TeamNotFound(team_id.to_string()))?;
        team.color = color;
        self.generation += 1;
        Ok(())
    }

    /// Completed matches with equal scores, as (draw id, sheet)
    pub fn tied_finals(&self) -> Vec<(u32, String)> {
        self.all_matches()
            .filter(|(_, m)| m.is_tied_final())
            .map(|(d, m)| (d.id, m.sheet.clone()))
            .collect()
    }

    /// Monotonic counter bumped by every mutation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when a mutation happened after the last recorded save
    pub fn is_dirty(&self) -> bool {
        self.generation != self.saved_generation
    }

    /// Record that the state as of `generation` reached durable storage
    pub fn mark_saved(&mut self, generation: u64) {
        self.saved_generation = generation;
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub const SAMPLE_JSON: &str = r##"{
        "teams": [
            { "UTID": "M1", "tname": "Team Alberta (Koe)", "UPID": "AB", "color": "#1d4ed8" },
            { "UTID": "M2", "tname": "Team Manitoba (Gushue)", "UPID": "MB" },
            { "UTID": "M3", "tname": "Team Ontario (Howard)", "UPID": "ON" },
            { "UTID": "W1", "tname": "Team Quebec (Homan)", "UPID": "QC" },
            { "UTID": "W2", "tname": "Team Yukon (Jones)", "UPID": "YT" }
        ],
        "draws": [
            { "id": 1, "time": "Jan 24, 9:00 AM", "matches": [
                { "sheet": "A", "t1": "M1", "t2": "M2", "s1": 8, "s2": 5, "completed": true },
                { "sheet": "B", "t1": "W1", "t2": "W2", "s1": 4, "s2": 6, "completed": true }
            ]},
            { "id": 2, "time": "Jan 24, 2:00 PM", "matches": [
                { "sheet": "A", "t1": "M2", "t2": "M3", "s1": 7, "s2": 3, "completed": true },
                { "sheet": "B", "t1": "M1", "t2": "M3", "s1": 2, "s2": 0, "completed": false }
            ]},
            { "id": 3, "time": "Jan 25, 9:00 AM", "matches": [
                { "sheet": "A", "t1": "TBD", "t2": "TBD" },
                { "sheet": "B", "t1": "M3", "t2": "M1" }
            ]}
        ],
        "pools": [
            { "id": "M-A", "name": "Men Pool A", "teams": ["M1", "M2", "M3"] },
            { "id": "W-A", "name": "Women Pool A", "teams": ["W1", "W2", "W9"] }
        ]
    }"##;

    pub fn sample_store() -> MatchStore {
        let mut store = MatchStore::new(TiePolicy::Preserve);
        store.load_json(SAMPLE_JSON).unwrap();
        store
    }
}
