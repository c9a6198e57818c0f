use super::category::Category;
use crate::dataset::{MatchStore, Team};
use std::cmp::Ordering;

/// Completed-match totals for one team
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Record {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub points_for: u64,
    pub points_against: u64,
}

impl Record {
    pub fn differential(&self) -> i64 {
        self.points_for as i64 - self.points_against as i64
    }
}

/// One row of a standings table
#[derive(Debug, Clone, PartialEq)]
pub struct StandingRow<'a> {
    pub team: &'a Team,
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub points_for: u64,
    pub points_against: u64,
    pub differential: i64,
}

impl<'a> StandingRow<'a> {
    fn new(team: &'a Team, record: Record) -> Self {
        Self {
            team,
            games: record.games,
            wins: record.wins,
            losses: record.losses,
            points_for: record.points_for,
            points_against: record.points_against,
            differential: record.differential(),
        }
    }
}

/// Tally a team's completed matches across every draw.
///
/// A win needs the strictly higher score; anything else is a loss, so a
/// completed tie counts as a loss for both teams. Matches with a TBD slot
/// never count.
pub fn team_record(store: &MatchStore, team_id: &str) -> Record {
    let mut record = Record::default();

    for (_, m) in store.all_matches() {
        if !store.counts_toward_stats(m) {
            continue;
        }
        let Some((own, opponent)) = m.scores_for(team_id) else {
            continue;
        };

        record.games += 1;
        record.points_for += u64::from(own);
        record.points_against += u64::from(opponent);
        if own > opponent {
            record.wins += 1;
        } else {
            record.losses += 1;
        }
    }

    record
}

/// Ranking comparator: wins, then differential, then points for (all descending)
pub fn compare_rows(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.differential.cmp(&a.differential))
        .then_with(|| b.points_for.cmp(&a.points_for))
}

/// Rank the given teams. Always recomputed from the store.
///
/// The sort is stable: teams equal on all three keys keep the order they had
/// in `teams`. There is no further tie-break.
pub fn compute_standings<'a, I>(store: &'a MatchStore, teams: I) -> Vec<StandingRow<'a>>
where
    I: IntoIterator<Item = &'a Team>,
{
    let mut rows: Vec<StandingRow<'a>> = teams
        .into_iter()
        .map(|team| StandingRow::new(team, team_record(store, &team.id)))
        .collect();

    rows.sort_by(compare_rows);
    rows
}

/// Standings for every team whose identifier falls in the category
pub fn standings_for_category(store: &MatchStore, category: Category) -> Vec<StandingRow<'_>> {
    compute_standings(
        store,
        store.teams().iter().filter(|t| category.matches(&t.id)),
    )
}

/// A titled standings table, one per division
pub struct StandingsTable<'a> {
    pub title: &'static str,
    pub category: Category,
    pub rows: Vec<StandingRow<'a>>,
}

/// Separate men's and women's tables. `All` yields both; a single division
/// yields one.
pub fn division_tables(store: &MatchStore, category: Category) -> Vec<StandingsTable<'_>> {
    [
        (Category::Men, "MEN'S STANDINGS"),
        (Category::Women, "WOMEN'S STANDINGS"),
    ]
    .into_iter()
    .filter(|(division, _)| category == Category::All || category == *division)
    .map(|(division, title)| StandingsTable {
        title,
        category: division,
        rows: standings_for_category(store, division),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::store::fixtures::sample_store;
    use crate::dataset::TiePolicy;

    fn ids(rows: &[StandingRow]) -> Vec<String> {
        rows.iter().map(|r| r.team.id.clone()).collect()
    }

    fn two_team_store(s1: u32, s2: u32) -> MatchStore {
        let json = format!(
            r#"{{"teams": [{{"UTID": "M1", "tname": "One"}}, {{"UTID": "M2", "tname": "Two"}}],
                "pools": [],
                "draws": [{{"id": 1, "time": "Jan 24, 9:00 AM", "matches": [
                    {{"sheet": "A", "t1": "M1", "t2": "M2", "s1": {}, "s2": {}, "completed": true}}
                ]}}]}}"#,
            s1, s2
        );
        let mut store = MatchStore::new(TiePolicy::Preserve);
        store.load_json(&json).unwrap();
        store
    }

    #[test]
    fn test_single_match_end_to_end() {
        let store = two_team_store(8, 5);
        let rows = standings_for_category(&store, Category::Men);

        assert_eq!(ids(&rows), vec!["M1", "M2"]);
        let m1 = &rows[0];
        assert_eq!(
            (m1.games, m1.wins, m1.losses, m1.points_for, m1.points_against, m1.differential),
            (1, 1, 0, 8, 5, 3)
        );
        let m2 = &rows[1];
        assert_eq!((m2.games, m2.wins, m2.losses, m2.differential), (1, 0, 1, -3));
    }

    #[test]
    fn test_winner_in_second_slot_ranks_first() {
        let store = two_team_store(2, 6);
        let rows = standings_for_category(&store, Category::All);
        assert_eq!(ids(&rows), vec!["M2", "M1"]);
    }

    #[test]
    fn test_tie_counts_as_loss_for_both() {
        let store = two_team_store(4, 4);
        let rows = standings_for_category(&store, Category::All);
        for row in &rows {
            assert_eq!((row.games, row.wins, row.losses), (1, 0, 1));
        }
        // Fully tied rows keep input order
        assert_eq!(ids(&rows), vec!["M1", "M2"]);
    }

    #[test]
    fn test_incomplete_and_tbd_matches_ignored() {
        let store = sample_store();
        // M1: won draw 1 (8-5); draw 2 sheet B is not completed
        let record = team_record(&store, "M1");
        assert_eq!(record.games, 1);
        assert_eq!((record.points_for, record.points_against), (8, 5));

        let json = r#"{"teams": [{"UTID": "M1", "tname": "One"}], "pools": [],
            "draws": [{"id": 1, "time": "Jan 24", "matches": [
                {"sheet": "A", "t1": "M1", "t2": "TBD", "s1": 5, "s2": 0, "completed": true}
            ]}]}"#;
        let mut tbd = MatchStore::new(TiePolicy::Preserve);
        tbd.load_json(json).unwrap();
        assert_eq!(team_record(&tbd, "M1"), Record::default());
    }

    #[test]
    fn test_games_against_unlisted_team_ignored() {
        let json = r#"{"teams": [{"UTID": "M1", "tname": "One"}], "pools": [],
            "draws": [{"id": 1, "time": "Jan 24", "matches": [
                {"sheet": "A", "t1": "M1", "t2": "M9", "s1": 6, "s2": 2, "completed": true}
            ]}]}"#;
        let mut store = MatchStore::new(TiePolicy::Preserve);
        store.load_json(json).unwrap();
        assert_eq!(team_record(&store, "M1"), Record::default());
    }

    #[test]
    fn test_games_equal_wins_plus_losses() {
        let mut store = sample_store();
        store.commit_score(3, "B", 4, 4, true).unwrap();
        store.commit_score(2, "B", 1, 9, true).unwrap();
        for row in standings_for_category(&store, Category::All) {
            assert_eq!(row.games, row.wins + row.losses, "team {}", row.team.id);
        }
    }

    #[test]
    fn test_rows_satisfy_comparator() {
        let mut store = sample_store();
        store.commit_score(2, "B", 6, 1, true).unwrap();
        store.commit_score(3, "B", 3, 4, true).unwrap();
        let rows = standings_for_category(&store, Category::Men);
        for pair in rows.windows(2) {
            assert_ne!(compare_rows(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn test_differential_breaks_win_ties() {
        let json = r#"{"teams": [
                {"UTID": "M1", "tname": "One"}, {"UTID": "M2", "tname": "Two"},
                {"UTID": "M3", "tname": "Three"}, {"UTID": "M4", "tname": "Four"}
            ], "pools": [],
            "draws": [{"id": 1, "time": "Jan 24", "matches": [
                {"sheet": "A", "t1": "M1", "t2": "M2", "s1": 6, "s2": 5, "completed": true},
                {"sheet": "B", "t1": "M3", "t2": "M4", "s1": 9, "s2": 2, "completed": true}
            ]}]}"#;
        let mut store = MatchStore::new(TiePolicy::Preserve);
        store.load_json(json).unwrap();
        let rows = standings_for_category(&store, Category::All);
        assert_eq!(ids(&rows), vec!["M3", "M1", "M2", "M4"]);
    }

    #[test]
    fn test_points_for_breaks_differential_ties() {
        let json = r#"{"teams": [
                {"UTID": "M1", "tname": "One"}, {"UTID": "M2", "tname": "Two"},
                {"UTID": "M3", "tname": "Three"}, {"UTID": "M4", "tname": "Four"}
            ], "pools": [],
            "draws": [{"id": 1, "time": "Jan 24", "matches": [
                {"sheet": "A", "t1": "M1", "t2": "M2", "s1": 3, "s2": 1, "completed": true},
                {"sheet": "B", "t1": "M3", "t2": "M4", "s1": 8, "s2": 6, "completed": true}
            ]}]}"#;
        let mut store = MatchStore::new(TiePolicy::Preserve);
        store.load_json(json).unwrap();
        let rows = standings_for_category(&store, Category::All);
        assert_eq!(ids(&rows), vec!["M3", "M1", "M4", "M2"]);
    }

    #[test]
    fn test_standings_follow_latest_commit() {
        let mut store = two_team_store(8, 5);
        store.commit_score(1, "A", 8, 5, false).unwrap();
        let rows = standings_for_category(&store, Category::All);
        assert!(rows.iter().all(|r| r.games == 0));
    }

    #[test]
    fn test_division_tables() {
        let store = sample_store();
        let tables = division_tables(&store, Category::All);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].title, "MEN'S STANDINGS");
        assert_eq!(tables[0].rows.len(), 3);
        assert_eq!(tables[1].rows.len(), 2);

        let women = division_tables(&store, Category::Women);
        assert_eq!(women.len(), 1);
        assert_eq!(ids(&women[0].rows), vec!["W2", "W1"]);
    }
}
