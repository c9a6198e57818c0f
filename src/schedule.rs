use crate::dataset::{Draw, Match, MatchStore, Team};
use crate::standings::Category;

/// A match together with the draw it belongs to
#[derive(Debug, Clone, Copy)]
pub struct ScheduledMatch<'a> {
    pub draw: &'a Draw,
    pub game: &'a Match,
}

#[derive(Debug, Clone)]
pub struct DrawView<'a> {
    pub draw: &'a Draw,
    /// Matches in the selected category, in sheet order
    pub matches: Vec<&'a Match>,
    /// Every match of the draw is completed (regardless of category)
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct DateGroup<'a> {
    pub date: &'a str,
    pub draws: Vec<DrawView<'a>>,
    /// Every draw on this date is finished
    pub finished: bool,
}

/// A match is listed under a category by its first slot's identifier
fn in_category(m: &Match, category: Category) -> bool {
    match category {
        Category::All => true,
        _ => m.team1.team_id().is_some_and(|id| category.matches(id)),
    }
}

/// Draws grouped by date label, dates in first-appearance order.
///
/// Draws with no match in the category are left out, as are dates left empty.
pub fn draw_schedule(store: &MatchStore, category: Category) -> Vec<DateGroup<'_>> {
    let mut groups: Vec<DateGroup<'_>> = Vec::new();

    for draw in store.draws() {
        let date = draw.date_label();
        let idx = match groups.iter().position(|g| g.date == date) {
            Some(idx) => idx,
            None => {
                groups.push(DateGroup {
                    date,
                    draws: Vec::new(),
                    finished: true,
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[idx];
        group.finished &= draw.is_finished();

        let matches: Vec<&Match> = draw
            .matches
            .iter()
            .filter(|m| in_category(m, category))
            .collect();
        if !matches.is_empty() {
            group.draws.push(DrawView {
                draw,
                matches,
                finished: draw.is_finished(),
            });
        }
    }

    groups.retain(|g| !g.draws.is_empty());
    groups
}

/// Listed under a category if either slot holds a team of that category.
/// A bracket match with no decided team belongs to every category.
fn playoff_in_category(m: &Match, category: Category) -> bool {
    let mut ids = [&m.team1, &m.team2].into_iter().filter_map(|s| s.team_id()).peekable();
    category == Category::All || ids.peek().is_none() || ids.any(|id| category.matches(id))
}

/// Draws holding bracket matches (a note, or a slot still TBD), listing only
/// those matches, in draw order.
pub fn playoff_draws(store: &MatchStore, category: Category) -> Vec<DrawView<'_>> {
    store
        .draws()
        .iter()
        .filter_map(|draw| {
            let matches: Vec<&Match> = draw
                .matches
                .iter()
                .filter(|m| m.display_note().is_some() && playoff_in_category(m, category))
                .collect();
            (!matches.is_empty()).then(|| DrawView {
                draw,
                matches,
                finished: draw.is_finished(),
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct TeamSchedule<'a> {
    pub team: &'a Team,
    pub pinned: bool,
    /// Every match the team appears in, ordered by draw id
    pub matches: Vec<ScheduledMatch<'a>>,
}

/// All matches involving a team, ordered by draw id
pub fn matches_for_team<'a>(store: &'a MatchStore, team_id: &str) -> Vec<ScheduledMatch<'a>> {
    let mut matches: Vec<ScheduledMatch<'a>> = store
        .all_matches()
        .filter(|(_, m)| m.involves(team_id))
        .map(|(draw, game)| ScheduledMatch { draw, game })
        .collect();
    matches.sort_by_key(|sm| sm.draw.id);
    matches
}

/// Per-team schedules for the category: pinned teams first, then by name
pub fn team_schedule<'a>(
    store: &'a MatchStore,
    category: Category,
    pinned: &[String],
) -> Vec<TeamSchedule<'a>> {
    let mut teams: Vec<TeamSchedule<'a>> = store
        .teams()
        .iter()
        .filter(|t| category.matches(&t.id))
        .map(|team| TeamSchedule {
            team,
            pinned: pinned.iter().any(|p| p == &team.id),
            matches: matches_for_team(store, &team.id),
        })
        .collect();

    teams.sort_by(|a, b| {
        b.pinned.cmp(&a.pinned).then_with(|| {
            a.team
                .name
                .to_lowercase()
                .cmp(&b.team.name.to_lowercase())
        })
    });
    teams
}
