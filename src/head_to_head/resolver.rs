use crate::dataset::MatchStore;

/// Result of the completed meeting between two teams, seen from the first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadToHead {
    Win,
    Loss,
    NoResult,
}

impl HeadToHead {
    pub fn symbol(&self) -> &'static str {
        match self {
            HeadToHead::Win => "W",
            HeadToHead::Loss => "L",
            HeadToHead::NoResult => "-",
        }
    }
}

/// Look up the first completed match between `team` and `opponent`, in
/// draw order, with the pair in either slot.
///
/// `team` wins only with the strictly higher score, so a completed tie reads
/// as a Loss from both sides. Either identifier missing from the store's
/// teams gives NoResult, even if a match names it.
pub fn head_to_head(store: &MatchStore, team: &str, opponent: &str) -> HeadToHead {
    if team == opponent || store.get_team(team).is_none() || store.get_team(opponent).is_none()
    {
        return HeadToHead::NoResult;
    }

    let meeting = store.all_matches().find(|(_, m)| {
        store.counts_toward_stats(m)
            && ((m.team1.is_team(team) && m.team2.is_team(opponent))
                || (m.team1.is_team(opponent) && m.team2.is_team(team)))
    });

    match meeting.and_then(|(_, m)| m.scores_for(team)) {
        Some((own, other)) if own > other => HeadToHead::Win,
        Some(_) => HeadToHead::Loss,
        None => HeadToHead::NoResult,
    }
}
