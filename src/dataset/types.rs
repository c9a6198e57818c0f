use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Placeholder written into a match slot whose team is not decided yet
pub const TBD: &str = "TBD";

/// One side of a match: either a team identifier or the TBD placeholder.
///
/// Absent, `null`, empty and `"TBD"` all read back as [`Slot::Tbd`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Slot {
    Team(String),
    #[default]
    Tbd,
}

impl From<Option<String>> for Slot {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(id) if !id.trim().is_empty() && id != TBD => Slot::Team(id),
            _ => Slot::Tbd,
        }
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Team(id) => id,
            Slot::Tbd => TBD.to_string(),
        }
    }
}

impl Slot {
    pub fn team_id(&self) -> Option<&str> {
        match self {
            Slot::Team(id) => Some(id),
            Slot::Tbd => None,
        }
    }

    pub fn is_team(&self, team_id: &str) -> bool {
        self.team_id() == Some(team_id)
    }

    pub fn as_str(&self) -> &str {
        self.team_id().unwrap_or(TBD)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier; the leading character is the category prefix (`M`/`W`)
    #[serde(rename = "UTID")]
    pub id: String,
    #[serde(rename = "tname")]
    pub name: String,
    /// Home-region code, also used to pick a flag in richer front ends
    #[serde(rename = "UPID", default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Team {
    /// Short label for matrix rows: the text inside the first parentheses of
    /// the display name (the skip), falling back to the full name.
    pub fn skip_name(&self) -> &str {
        if let Some(open) = self.name.find('(') {
            let rest = &self.name[open + 1..];
            if let Some(close) = rest.find(')') {
                if close > 0 {
                    return &rest[..close];
                }
            }
        }
        &self.name
    }

    /// Display color as RGB, if one is set and parses as `#rrggbb`
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        self.color.as_deref().and_then(parse_hex_color)
    }
}

/// Parse `#rrggbb` (or `rrggbb`) into RGB components
pub fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub sheet: String,
    #[serde(rename = "t1", default)]
    pub team1: Slot,
    #[serde(rename = "t2", default)]
    pub team2: Slot,
    #[serde(rename = "s1", default, deserialize_with = "deserialize_score")]
    pub score1: u32,
    #[serde(rename = "s2", default, deserialize_with = "deserialize_score")]
    pub score2: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Scores are stored as non-negative integers; `null` reads as 0 and
/// negative values are clamped.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(clamp_score(raw.unwrap_or(0)))
}

/// Clamp raw score input into the stored range
pub fn clamp_score(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

impl Match {
    pub fn involves(&self, team_id: &str) -> bool {
        self.team1.is_team(team_id) || self.team2.is_team(team_id)
    }

    /// Both slots hold a team, so the match can count toward statistics
    pub fn is_resolvable(&self) -> bool {
        self.team1.team_id().is_some() && self.team2.team_id().is_some()
    }

    /// Scores from one team's perspective: (own, opponent).
    /// Returns None when the team is in neither slot.
    pub fn scores_for(&self, team_id: &str) -> Option<(u32, u32)> {
        if self.team1.is_team(team_id) {
            Some((self.score1, self.score2))
        } else if self.team2.is_team(team_id) {
            Some((self.score2, self.score1))
        } else {
            None
        }
    }

    /// Completed with equal scores
    pub fn is_tied_final(&self) -> bool {
        self.completed && self.score1 == self.score2
    }

    pub fn note_or_default(&self) -> &str {
        match self.note.as_deref() {
            Some(note) if !note.trim().is_empty() => note,
            _ => "Playoff",
        }
    }

    /// Label shown beside a match: its note, or the playoff default for a
    /// bracket match whose teams are not decided yet. Plain round-robin games
    /// have none.
    pub fn display_note(&self) -> Option<&str> {
        if self.note.is_some() || !self.is_resolvable() {
            Some(self.note_or_default())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub id: u32,
    /// Date and time label, e.g. "Jan 24, 9:00 AM"
    pub time: String,
    pub matches: Vec<Match>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Draw {
    /// Date part of the time label (everything before the first comma)
    pub fn date_label(&self) -> &str {
        self.time.split(',').next().unwrap_or("").trim()
    }

    pub fn is_finished(&self) -> bool {
        self.matches.iter().all(|m| m.completed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    pub name: String,
    pub teams: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Whole tournament document as ingested and persisted
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub teams: Vec<Team>,
    pub draws: Vec<Draw>,
    pub pools: Vec<Pool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_reads_placeholders_as_tbd() {
        let m: Match = serde_json::from_str(r#"{"sheet":"A","t1":"TBD","t2":""}"#).unwrap();
        assert_eq!(m.team1, Slot::Tbd);
        assert_eq!(m.team2, Slot::Tbd);

        let m: Match = serde_json::from_str(r#"{"sheet":"A","t1":null}"#).unwrap();
        assert_eq!(m.team1, Slot::Tbd);
        assert_eq!(m.team2, Slot::Tbd);
        assert!(!m.is_resolvable());
    }

    #[test]
    fn test_slot_serializes_tbd_literal() {
        let m: Match = serde_json::from_str(r#"{"sheet":"A","t1":"M1"}"#).unwrap();
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["t1"], "M1");
        assert_eq!(json["t2"], "TBD");
    }

    #[test]
    fn test_scores_default_and_clamp() {
        let m: Match =
            serde_json::from_str(r#"{"sheet":"A","t1":"M1","t2":"M2","s1":null,"s2":-4}"#)
                .unwrap();
        assert_eq!(m.score1, 0);
        assert_eq!(m.score2, 0);
        assert!(!m.completed);
    }

    #[test]
    fn test_scores_for_perspective() {
        let m: Match = serde_json::from_str(
            r#"{"sheet":"B","t1":"M1","t2":"M2","s1":7,"s2":5,"completed":true}"#,
        )
        .unwrap();
        assert_eq!(m.scores_for("M1"), Some((7, 5)));
        assert_eq!(m.scores_for("M2"), Some((5, 7)));
        assert_eq!(m.scores_for("W1"), None);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = r#"{"sheet":"C","t1":"W1","t2":"W2","time":"9:00","stream":true}"#;
        let m: Match = serde_json::from_str(raw).unwrap();
        assert_eq!(m.extra.get("stream"), Some(&Value::Bool(true)));
        let back = serde_json::to_value(&m).unwrap();
        assert_eq!(back["time"], "9:00");
    }

    #[test]
    fn test_skip_name() {
        let team = Team {
            id: "M1".to_string(),
            name: "Team Ontario (Howard)".to_string(),
            region: "ON".to_string(),
            color: None,
            extra: Map::new(),
        };
        assert_eq!(team.skip_name(), "Howard");

        let plain = Team {
            name: "Nova Scotia".to_string(),
            ..team
        };
        assert_eq!(plain.skip_name(), "Nova Scotia");
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#1d4ed8"), Some((0x1d, 0x4e, 0xd8)));
        assert_eq!(parse_hex_color("ffffff"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("red"), None);
    }

    #[test]
    fn test_draw_date_label() {
        let draw: Draw =
            serde_json::from_str(r#"{"id":1,"time":"Jan 24, 9:00 AM","matches":[]}"#).unwrap();
        assert_eq!(draw.date_label(), "Jan 24");
        assert!(draw.is_finished());
    }

    #[test]
    fn test_note_default() {
        let m: Match = serde_json::from_str(r#"{"sheet":"A"}"#).unwrap();
        assert_eq!(m.note_or_default(), "Playoff");
        assert_eq!(m.display_note(), Some("Playoff"));

        let m: Match =
            serde_json::from_str(r#"{"sheet":"A","t1":"M1","t2":"M2","note":"Semi-final"}"#)
                .unwrap();
        assert_eq!(m.display_note(), Some("Semi-final"));

        let m: Match = serde_json::from_str(r#"{"sheet":"A","t1":"M1","t2":"M2"}"#).unwrap();
        assert_eq!(m.display_note(), None);
    }
}
