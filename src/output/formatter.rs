use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::dataset::{Match, MatchStore, Slot, Team, TBD};
use crate::head_to_head::{HeadToHead, MatrixCell, PoolMatrix};
use crate::schedule::{DateGroup, DrawView, TeamSchedule};
use crate::standings::{StandingRow, StandingsTable};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Pad to a fixed number of characters (format width counts bytes poorly
/// once color codes are involved, so pad before coloring)
fn pad_name(name: &str, width: usize) -> String {
    let truncated = truncate_name(name, width);
    let len = truncated.chars().count();
    format!("{}{}", truncated, " ".repeat(width.saturating_sub(len)))
}

/// Render a team name in its display color when colors are on
fn paint_team(text: &str, team: Option<&Team>, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match team.and_then(|t| t.rgb()) {
        Some((r, g, b)) => text.truecolor(r, g, b).bold().to_string(),
        None => text.bold().to_string(),
    }
}

/// Signed point differential: "+3", "-3", "0"
pub fn format_differential(diff: i64) -> String {
    if diff > 0 {
        format!("+{}", diff)
    } else {
        diff.to_string()
    }
}

/// Display name for a slot: the team's name, its raw identifier when the
/// dataset does not know it, or TBD
pub fn slot_name<'a>(store: &'a MatchStore, slot: &'a Slot) -> &'a str {
    match slot.team_id() {
        Some(id) => store.get_team(id).map(|t| t.name.as_str()).unwrap_or(id),
        None => TBD,
    }
}

fn slot_team<'a>(store: &'a MatchStore, slot: &Slot) -> Option<&'a Team> {
    slot.team_id().and_then(|id| store.get_team(id))
}

/// "7 - 5" with a trailing marker for final scores
pub fn format_score_pill(m: &Match) -> String {
    if m.completed {
        format!("{} - {} F", m.score1, m.score2)
    } else {
        format!("{} - {}  ", m.score1, m.score2)
    }
}

/// Format one or more standings tables
///
/// Columns: rank and name, games played, W, L, points for, points against,
/// differential. Pinned teams are marked with `*`.
pub fn format_standings(tables: &[StandingsTable], pinned: &[String], use_colors: bool) -> String {
    if tables.iter().all(|t| t.rows.is_empty()) {
        return "No teams found.".to_string();
    }

    tables
        .iter()
        .filter(|t| !t.rows.is_empty())
        .map(|t| format_standings_table(t, pinned, use_colors))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_standings_table(table: &StandingsTable, pinned: &[String], use_colors: bool) -> String {
    let name_width = match get_terminal_width() {
        Some(width) if width > 60 => (width - 40).min(36),
        Some(_) => 16,
        None => 36,
    };

    let mut lines = Vec::new();
    let title = if use_colors {
        table.title.bold().underline().to_string()
    } else {
        table.title.to_string()
    };
    lines.push(title);
    lines.push(format!(
        "{:>3}  {}  {:>3} {:>3} {:>3} {:>5} {:>5} {:>5}",
        "#",
        pad_name("Team", name_width),
        "GP",
        "W",
        "L",
        "PF",
        "PA",
        "DIFF"
    ));

    for (idx, row) in table.rows.iter().enumerate() {
        let marker = if pinned.iter().any(|p| p == &row.team.id) {
            "*"
        } else {
            " "
        };
        let name = paint_team(&pad_name(&row.team.name, name_width), Some(row.team), use_colors);
        let wins = format!("{:>3}", row.wins);
        let losses = format!("{:>3}", row.losses);
        let diff = format!("{:>5}", format_differential(row.differential));
        let (wins, losses, diff) = if use_colors {
            let diff = if row.differential < 0 {
                diff.red().to_string()
            } else {
                diff.green().to_string()
            };
            (wins.green().to_string(), losses.red().to_string(), diff)
        } else {
            (wins, losses, diff)
        };

        lines.push(format!(
            "{:>2}.{} {}  {:>3} {} {} {:>5} {:>5} {}",
            idx + 1,
            marker,
            name,
            row.games,
            wins,
            losses,
            row.points_for,
            row.points_against,
            diff
        ));
    }

    lines.join("\n")
}

/// Format standings rows as tab-separated values for scripting
/// Columns: rank, id, name, games, wins, losses, points for, points against, differential
pub fn format_standings_tsv(rows: &[StandingRow]) -> String {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                idx + 1,
                row.team.id,
                row.team.name,
                row.games,
                row.wins,
                row.losses,
                row.points_for,
                row.points_against,
                row.differential
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single match as one line: "B  Team A   7 - 5 F  Team B"
pub fn format_match_line(store: &MatchStore, m: &Match, use_colors: bool) -> String {
    let t1 = paint_team(
        &pad_name(slot_name(store, &m.team1), 24),
        slot_team(store, &m.team1),
        use_colors,
    );
    let t2 = paint_team(slot_name(store, &m.team2), slot_team(store, &m.team2), use_colors);
    let pill = format_score_pill(m);
    let pill = if use_colors && m.completed {
        pill.green().to_string()
    } else {
        pill
    };
    let sheet = if use_colors {
        m.sheet.cyan().bold().to_string()
    } else {
        m.sheet.clone()
    };
    let line = format!("{:<2} {}  {}  {}", sheet, t1, pill, t2);
    match m.display_note() {
        Some(note) if use_colors => format!("{}  {}", line, format!("[{}]", note).dimmed()),
        Some(note) => format!("{}  [{}]", line, note),
        None => line,
    }
}

/// Format the draw schedule grouped by date
pub fn format_schedule(store: &MatchStore, groups: &[DateGroup], use_colors: bool) -> String {
    if groups.is_empty() {
        return "No draws scheduled.".to_string();
    }

    let mut lines = Vec::new();
    for group in groups {
        let header = if group.finished {
            format!("{} (complete)", group.date)
        } else {
            group.date.to_string()
        };
        lines.push(if use_colors {
            header.bold().to_string()
        } else {
            header
        });

        for view in &group.draws {
            let heading = format!("  Draw {} - {}", view.draw.id, view.draw.time);
            lines.push(if use_colors {
                heading.dimmed().to_string()
            } else {
                heading
            });
            for m in &view.matches {
                lines.push(format!("    {}", format_match_line(store, m, use_colors)));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n").trim_end().to_string()
}

/// Format bracket draws: one heading per draw, its noted matches below
pub fn format_playoffs(store: &MatchStore, draws: &[DrawView], use_colors: bool) -> String {
    if draws.is_empty() {
        return "No playoff draws.".to_string();
    }

    let mut lines = Vec::new();
    for view in draws {
        let heading = format!("Draw {} - {}", view.draw.id, view.draw.time);
        lines.push(if use_colors {
            heading.bold().to_string()
        } else {
            heading
        });
        for m in &view.matches {
            lines.push(format!("  {}", format_match_line(store, m, use_colors)));
        }
    }

    lines.join("\n")
}

/// Format per-team schedules, pinned teams marked with `*`
pub fn format_team_schedule(
    store: &MatchStore,
    schedules: &[TeamSchedule],
    use_colors: bool,
) -> String {
    if schedules.is_empty() {
        return "No teams found.".to_string();
    }

    let mut lines = Vec::new();
    for schedule in schedules {
        let marker = if schedule.pinned { "* " } else { "" };
        let header = format!("{}{} ({})", marker, schedule.team.name, schedule.team.region);
        lines.push(paint_team(&header, Some(schedule.team), use_colors));
        if schedule.matches.is_empty() {
            lines.push("  No matches scheduled.".to_string());
        }
        for sm in &schedule.matches {
            lines.push(format!(
                "  Draw {:<3} {:<18} {}",
                sm.draw.id,
                truncate_name(&sm.draw.time, 18),
                format_match_line(store, sm.game, use_colors)
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n").trim_end().to_string()
}

fn format_cell(cell: &MatrixCell, use_colors: bool) -> String {
    let text = match cell {
        MatrixCell::Diagonal => "#".to_string(),
        MatrixCell::Result(result) => result.symbol().to_string(),
    };
    let padded = format!("{:^5}", text);
    if !use_colors {
        return padded;
    }
    match cell {
        MatrixCell::Diagonal => padded.dimmed().to_string(),
        MatrixCell::Result(HeadToHead::Win) => padded.green().bold().to_string(),
        MatrixCell::Result(HeadToHead::Loss) => padded.red().bold().to_string(),
        MatrixCell::Result(HeadToHead::NoResult) => padded.dimmed().to_string(),
    }
}

/// Format round-robin grids, one per pool. Row labels carry each team's W-L
/// against the pool; column headers are team identifiers.
pub fn format_matrices(matrices: &[PoolMatrix], use_colors: bool) -> String {
    if matrices.is_empty() {
        return "No pools found.".to_string();
    }

    let label_width = 18;
    matrices
        .iter()
        .map(|grid| {
            let mut lines = Vec::new();
            let title = grid.pool.name.to_uppercase();
            lines.push(if use_colors {
                title.bold().to_string()
            } else {
                title
            });

            let header: String = grid
                .teams
                .iter()
                .map(|t| format!("{:^5}", truncate_name(&t.id, 5)))
                .collect();
            lines.push(format!("{}  {}", pad_name("Team (W-L)", label_width), header));

            for row in &grid.rows {
                let label = format!("{} {}-{}", row.team.skip_name(), row.wins, row.losses);
                let label = paint_team(&pad_name(&label, label_width), Some(row.team), use_colors);
                let cells: String = row.cells.iter().map(|c| format_cell(c, use_colors)).collect();
                lines.push(format!("{}  {}", label, cells));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
