use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Tabs};

use crate::dataset::{Match, MatchStore, Slot, Team};
use crate::head_to_head::{category_matrices, HeadToHead, MatrixCell};
use crate::output::{format_differential, format_score_pill, slot_name};
use crate::schedule::{draw_schedule, matches_for_team, playoff_draws, team_schedule};
use crate::session::View;
use crate::standings::{division_tables, team_record};
use crate::tui::app::{App, FlashKind, InputMode, ScoreField};
use crate::tui::theme::ThemeColors;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 6 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.current_view {
        View::Schedule => render_schedule(frame, chunks[2], app),
        View::Teams => render_teams(frame, chunks[2], app),
        View::Matrix => render_matrix(frame, chunks[2], app),
        View::Standings => render_standings(frame, chunks[2], app),
        View::Playoffs => render_playoffs(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    match app.input_mode {
        InputMode::ScoreEdit => render_score_popup(frame, app),
        InputMode::Help => render_help_popup(frame, &app.colors),
        InputMode::Normal => {}
    }
}

fn team_color(team: Option<&Team>) -> Option<Color> {
    team.and_then(|t| t.rgb()).map(|(r, g, b)| Color::Rgb(r, g, b))
}

fn team_style(team: Option<&Team>) -> Style {
    match team_color(team) {
        Some(color) => Style::default().fg(color).bold(),
        None => Style::default(),
    }
}

fn slot_cell<'a>(store: &'a MatchStore, slot: &'a Slot, colors: &ThemeColors) -> Cell<'a> {
    let team = slot.team_id().and_then(|id| store.get_team(id));
    let style = if team.is_none() {
        Style::default().fg(colors.muted)
    } else {
        team_style(team)
    };
    Cell::from(slot_name(store, slot)).style(style)
}

fn alt_row_style(idx: usize, colors: &ThemeColors) -> Style {
    if idx % 2 == 1 {
        Style::default().bg(colors.row_alt_bg)
    } else {
        Style::default()
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let left = "Bonspiel";
    let mut spans = vec![Span::styled(
        left,
        Style::default().fg(app.colors.title_color).bold(),
    )];

    let save_status = if app.saver.last_error().is_some() {
        Span::styled("save failed", Style::default().fg(app.colors.flash_error))
    } else if app.store.is_dirty() {
        Span::styled("unsaved", Style::default().fg(app.colors.live_score))
    } else {
        match app.saver.last_saved() {
            Some(at) => Span::styled(
                format!("saved {}", at.with_timezone(&chrono::Local).format("%H:%M:%S")),
                Style::default().fg(app.colors.muted),
            ),
            None => Span::styled("saved", Style::default().fg(app.colors.muted)),
        }
    };
    let right = format!("{} | ", app.category.label());
    let padding_len = (area.width as usize)
        .saturating_sub(left.len() + right.len() + save_status.content.chars().count());

    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(right, Style::default().fg(app.colors.muted)));
    spans.push(save_status);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<&str> = View::ALL.iter().map(|v| v.title()).collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.colors.tab_inactive_style)
        .highlight_style(app.colors.tab_active_style.reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_empty(frame: &mut Frame, area: Rect, msg: &str) {
    let empty_msg = Paragraph::new(msg.to_string())
        .alignment(Alignment::Center)
        .block(Block::default());
    frame.render_widget(empty_msg, area);
}

fn score_cell<'a>(m: &Match, colors: &ThemeColors) -> Cell<'a> {
    let color = if m.completed {
        colors.final_score
    } else {
        colors.live_score
    };
    Cell::from(format_score_pill(m)).style(Style::default().fg(color))
}

fn render_schedule(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = app.colors.clone();
    let store = &app.store;
    let groups = draw_schedule(store, app.category);

    if groups.is_empty() {
        render_empty(frame, area, "No draws scheduled");
        return;
    }

    let mut rows = Vec::new();
    for group in &groups {
        for view in &group.draws {
            for (i, m) in view.matches.iter().enumerate() {
                // Draw heading only on its first sheet
                let (draw_label, time_label) = if i == 0 {
                    (format!("{}", view.draw.id), view.draw.time.clone())
                } else {
                    (String::new(), String::new())
                };
                let time_style = if group.finished {
                    Style::default().fg(colors.muted)
                } else {
                    colors.date_header
                };
                let idx = rows.len();
                rows.push(
                    Row::new(vec![
                        Cell::from(draw_label).style(Style::default().fg(colors.index_color)),
                        Cell::from(time_label).style(time_style),
                        Cell::from(m.sheet.clone()).style(colors.header_style),
                        slot_cell(store, &m.team1, &colors),
                        score_cell(m, &colors),
                        slot_cell(store, &m.team2, &colors),
                        Cell::from(m.display_note().unwrap_or_default().to_string())
                            .style(Style::default().fg(colors.muted)),
                    ])
                    .style(alt_row_style(idx, &colors)),
                );
            }
        }
    }

    let widths = [
        Constraint::Length(5),
        Constraint::Length(18),
        Constraint::Length(6),
        Constraint::Fill(2),
        Constraint::Length(9),
        Constraint::Fill(2),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Draw", "Time", "Sheet", "Team 1", "Score", "Team 2", "Note"])
                .style(colors.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn team_match_cells<'a>(
    store: &'a MatchStore,
    team: &Team,
    game: &'a Match,
    draw_id: u32,
    colors: &ThemeColors,
) -> Vec<Cell<'a>> {
    let opponent = if game.team1.is_team(&team.id) {
        &game.team2
    } else {
        &game.team1
    };
    let (result, color) = match game.scores_for(&team.id) {
        Some((own, other)) if game.completed && own > other => {
            (format!("W {}-{}", own, other), colors.win)
        }
        Some((own, other)) if game.completed => (format!("L {}-{}", own, other), colors.loss),
        Some((own, other)) => (format!("  {}-{}", own, other), colors.live_score),
        None => ("  -".to_string(), colors.muted),
    };
    vec![
        Cell::from(""),
        Cell::from(format!("  D{} {} vs {}", draw_id, game.sheet, slot_name(store, opponent)))
            .style(Style::default().fg(colors.muted)),
        Cell::from(""),
        Cell::from(result).style(Style::default().fg(color)),
    ]
}

fn render_playoffs(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = app.colors.clone();
    let store = &app.store;
    let draws = playoff_draws(store, app.category);

    if draws.is_empty() {
        render_empty(frame, area, "No playoff draws");
        return;
    }

    let mut rows = Vec::new();
    for view in &draws {
        let time_style = if view.finished {
            Style::default().fg(colors.muted)
        } else {
            colors.date_header
        };
        for (i, m) in view.matches.iter().enumerate() {
            let (draw_label, time_label) = if i == 0 {
                (format!("{}", view.draw.id), view.draw.time.clone())
            } else {
                (String::new(), String::new())
            };
            let idx = rows.len();
            rows.push(
                Row::new(vec![
                    Cell::from(draw_label).style(Style::default().fg(colors.index_color)),
                    Cell::from(time_label).style(time_style),
                    Cell::from(m.note_or_default().to_string()).style(colors.header_style),
                    Cell::from(m.sheet.clone()),
                    slot_cell(store, &m.team1, &colors),
                    score_cell(m, &colors),
                    slot_cell(store, &m.team2, &colors),
                ])
                .style(alt_row_style(idx, &colors)),
            );
        }
    }

    let widths = [
        Constraint::Length(5),
        Constraint::Length(18),
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Fill(2),
        Constraint::Length(9),
        Constraint::Fill(2),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Draw", "Time", "Stage", "Sheet", "Team 1", "Score", "Team 2"])
                .style(colors.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_teams(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = app.colors.clone();
    let store = &app.store;
    let schedules = team_schedule(store, app.category, &app.session.pinned);

    if schedules.is_empty() {
        render_empty(frame, area, "No teams found");
        return;
    }

    let chunks =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).split(area);

    // One row per team, then one per match it plays
    let mut rows = Vec::new();
    for (idx, schedule) in schedules.iter().enumerate() {
        let record = team_record(store, &schedule.team.id);
        let marker = if schedule.pinned { "*" } else { " " };
        let row_style = alt_row_style(idx, &colors);
        rows.push(
            Row::new(vec![
                Cell::from(marker).style(Style::default().fg(colors.pinned_marker).bold()),
                Cell::from(schedule.team.name.clone()).style(team_style(Some(schedule.team))),
                Cell::from(schedule.team.region.clone()).style(Style::default().fg(colors.muted)),
                Cell::from(format!("{}-{}", record.wins, record.losses)),
            ])
            .style(row_style),
        );
        for sm in &schedule.matches {
            rows.push(
                Row::new(team_match_cells(store, schedule.team, sm.game, sm.draw.id, &colors))
                    .style(row_style),
            );
        }
    }

    let widths = [
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["", "Team", "Reg", "W-L"])
                .style(colors.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(colors.row_selected);

    // Detail pane for the team owning the highlighted row
    let selected = app
        .selected_team_id()
        .and_then(|id| schedules.iter().find(|s| s.team.id == id))
        .map(|s| s.team);
    let detail_lines: Vec<Line> = match selected {
        Some(team) => {
            let record = team_record(store, &team.id);
            let games = matches_for_team(store, &team.id);
            let next = games.iter().find(|sm| !sm.game.completed);
            let mut lines = vec![
                Line::from(Span::styled(team.name.clone(), team_style(Some(team)))),
                Line::from(Span::styled(
                    format!("{} | skip {}", team.region, team.skip_name()),
                    Style::default().fg(colors.muted),
                )),
                Line::from(""),
                Line::from(format!(
                    "Played {}  W {}  L {}",
                    record.games, record.wins, record.losses
                )),
                Line::from(format!(
                    "For {}  Against {}  Diff {}",
                    record.points_for,
                    record.points_against,
                    format_differential(record.differential())
                )),
                Line::from(""),
            ];
            match next {
                Some(sm) => {
                    let opponent = if sm.game.team1.is_team(&team.id) {
                        &sm.game.team2
                    } else {
                        &sm.game.team1
                    };
                    lines.push(Line::from(vec![
                        Span::styled("Next: ", Style::default().fg(colors.muted)),
                        Span::raw(format!(
                            "draw {} ({}) sheet {} vs {}",
                            sm.draw.id,
                            sm.draw.time,
                            sm.game.sheet,
                            slot_name(store, opponent)
                        )),
                    ]));
                }
                None => lines.push(Line::from(Span::styled(
                    "No matches left to play",
                    Style::default().fg(colors.muted),
                ))),
            }
            lines
        }
        None => Vec::new(),
    };
    let detail = Paragraph::new(detail_lines).block(
        Block::bordered()
            .border_style(Style::default().fg(colors.divider_color))
            .title(" Team "),
    );

    frame.render_stateful_widget(table, chunks[0], &mut app.table_state);
    frame.render_widget(detail, chunks[1]);
}

fn matrix_cell<'a>(cell: &MatrixCell, colors: &ThemeColors) -> Cell<'a> {
    match cell {
        MatrixCell::Diagonal => {
            Cell::from("  #").style(Style::default().fg(colors.diagonal).bg(colors.diagonal))
        }
        MatrixCell::Result(result) => {
            let color = match result {
                HeadToHead::Win => colors.win,
                HeadToHead::Loss => colors.loss,
                HeadToHead::NoResult => colors.no_result,
            };
            Cell::from(format!("  {}", result.symbol())).style(Style::default().fg(color).bold())
        }
    }
}

fn render_matrix(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = app.colors.clone();
    let grids = category_matrices(&app.store, app.category);

    if grids.is_empty() {
        render_empty(frame, area, "No pools defined");
        return;
    }

    let max_teams = grids.iter().map(|g| g.teams.len()).max().unwrap_or(0);
    let mut rows = Vec::new();
    for grid in &grids {
        for (i, row) in grid.rows.iter().enumerate() {
            let pool_label = if i == 0 { grid.pool.name.clone() } else { String::new() };
            let mut cells = vec![
                Cell::from(pool_label).style(colors.date_header),
                Cell::from(format!("{}. {}", i + 1, row.team.skip_name()))
                    .style(team_style(Some(row.team))),
                Cell::from(format!("{}-{}", row.wins, row.losses)),
            ];
            cells.extend(row.cells.iter().map(|c| matrix_cell(c, &colors)));
            let idx = rows.len();
            rows.push(Row::new(cells).style(alt_row_style(idx, &colors)));
        }
    }

    let mut widths = vec![
        Constraint::Length(16),
        Constraint::Length(18),
        Constraint::Length(5),
    ];
    widths.extend(std::iter::repeat(Constraint::Length(4)).take(max_teams));

    let mut header = vec!["Pool".to_string(), "Team".to_string(), "W-L".to_string()];
    header.extend((1..=max_teams).map(|n| format!("{:>3}", n)));

    let table = Table::new(rows, widths)
        .header(Row::new(header).style(colors.header_style).bottom_margin(1))
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_standings(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = app.colors.clone();
    let tables = division_tables(&app.store, app.category);

    if tables.iter().all(|t| t.rows.is_empty()) {
        render_empty(frame, area, "No teams found");
        return;
    }

    let mut rows = Vec::new();
    for table in &tables {
        for (rank, row) in table.rows.iter().enumerate() {
            let pinned = app.session.is_pinned(&row.team.id);
            let diff_color = if row.differential < 0 {
                colors.loss
            } else {
                colors.win
            };
            let idx = rows.len();
            rows.push(
                Row::new(vec![
                    Cell::from(table.category.code()).style(Style::default().fg(colors.muted)),
                    Cell::from(format!("{}.", rank + 1))
                        .style(Style::default().fg(colors.index_color)),
                    Cell::from(if pinned { "*" } else { " " })
                        .style(Style::default().fg(colors.pinned_marker).bold()),
                    Cell::from(row.team.name.clone()).style(team_style(Some(row.team))),
                    Cell::from(format!("{:>3}", row.games)),
                    Cell::from(format!("{:>3}", row.wins)).style(Style::default().fg(colors.win)),
                    Cell::from(format!("{:>3}", row.losses))
                        .style(Style::default().fg(colors.loss)),
                    Cell::from(format!("{:>4}", row.points_for)),
                    Cell::from(format!("{:>4}", row.points_against)),
                    Cell::from(format!("{:>5}", format_differential(row.differential)))
                        .style(Style::default().fg(diff_color)),
                ])
                .style(alt_row_style(idx, &colors)),
            );
        }
    }

    let widths = [
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Div", "#", "", "Team", " GP", "  W", "  L", "  PF", "  PA", " DIFF"])
                .style(colors.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let text = if let Some((ref msg, kind, _)) = app.flash_message {
        let msg_color = match kind {
            FlashKind::Error => colors.flash_error,
            FlashKind::Info => colors.flash_success,
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let count = format!("{} rows", app.rows().len());

        let edit_hint = match app.current_view {
            View::Schedule => ("Enter", ":score "),
            _ => ("p", ":pin "),
        };
        let hints = [
            ("j/k", ":nav "),
            edit_hint,
            ("Tab", ":view "),
            ("c", ":category "),
            ("z", ":undo "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = vec![
            Span::styled(count, Style::default().fg(colors.muted)),
            Span::raw("  "),
        ];
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(colors.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(colors.status_bar_bg)),
        area,
    );
}

/// Render the score entry popup
fn render_score_popup(frame: &mut Frame, app: &App) {
    let Some(editor) = app.editor.as_ref() else {
        return;
    };
    let colors = &app.colors;
    let popup_area = centered_rect_fixed(50, 8, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(format!(" Draw {} - Sheet {} ", editor.draw_id, editor.sheet))
        .title_style(colors.popup_title)
        .border_style(Style::default().fg(colors.popup_border))
        .style(Style::default().bg(colors.popup_bg));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(inner);

    let Some(m) = app.store.find_match(editor.draw_id, &editor.sheet) else {
        return;
    };

    let field_line = |label: &str, value: &str, active: bool| {
        let value_style = if active {
            colors.field_active
        } else {
            Style::default()
        };
        let cursor = if active { "|" } else { " " };
        Line::from(vec![
            Span::raw(format!("{:<28}", label)),
            Span::styled(format!(" {:>2}{} ", value, cursor), value_style),
        ])
    };

    frame.render_widget(
        Paragraph::new(field_line(
            slot_name(&app.store, &m.team1),
            &editor.score1,
            editor.field == ScoreField::First,
        )),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(field_line(
            slot_name(&app.store, &m.team2),
            &editor.score2,
            editor.field == ScoreField::Second,
        )),
        chunks[1],
    );

    let final_text = if editor.completed { "[x] Final" } else { "[ ] Final" };
    let final_color = if editor.completed {
        colors.final_score
    } else {
        colors.muted
    };
    frame.render_widget(
        Paragraph::new(final_text).style(Style::default().fg(final_color)),
        chunks[2],
    );

    frame.render_widget(
        Paragraph::new("Tab: switch | Space: final | Enter: save | Esc: cancel")
            .style(Style::default().fg(colors.muted)),
        chunks[4],
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, colors: &ThemeColors) {
    let popup_area = centered_rect_fixed(56, 17, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Keyboard Shortcuts ")
        .title_style(colors.popup_title)
        .border_style(Style::default().fg(colors.popup_border))
        .style(Style::default().bg(colors.popup_bg));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(colors.status_key_color).bold();
    let entries = [
        ("j / Down", "Move down"),
        ("k / Up", "Move up"),
        ("Tab / l", "Next view"),
        ("S-Tab / h", "Previous view"),
        ("1-5", "Jump to view"),
        ("c", "Cycle category (all/men/women)"),
        ("Enter / e", "Edit score of selected match row"),
        ("p", "Pin / unpin selected team"),
        ("z", "Undo last change"),
        ("r", "Save, then reload dataset from disk"),
        ("?", "Show/hide this help"),
        ("q / Ctrl-c", "Save and quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{:<14}", key), key_style),
                Span::raw(*action),
            ])
        })
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(colors.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dataset::store::fixtures::sample_store;
    use crate::session::SessionState;
    use crate::tui::theme::Theme;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn test_app() -> App {
        let dir = std::env::temp_dir();
        App::new(
            sample_store(),
            dir.join("bonspiel_test_ui_data.json"),
            Duration::from_millis(150),
            SessionState::new(),
            dir.join("bonspiel_test_ui_session.json"),
            Config::default(),
            Theme::Dark,
        )
    }

    fn render_to_string(app: &mut App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_rect_fixed(50, 5, area);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.y, 2);
    }

    #[test]
    fn test_every_view_renders() {
        let mut app = test_app();
        for view in View::ALL {
            app.current_view = view;
            let screen = render_to_string(&mut app);
            assert!(screen.contains("Bonspiel"));
            assert!(screen.contains(view.title()));
        }
    }

    #[test]
    fn test_schedule_shows_scores() {
        let mut app = test_app();
        let screen = render_to_string(&mut app);
        assert!(screen.contains("8 - 5 F"));
        assert!(screen.contains("TBD"));
    }

    #[test]
    fn test_teams_view_shows_match_rows() {
        let mut app = test_app();
        app.switch_view(View::Teams);
        let screen = render_to_string(&mut app);
        assert!(screen.contains("D1 A vs Team Manitoba"));
        assert!(screen.contains("W 8-5"));
        assert!(screen.contains("Played 1"));
    }

    #[test]
    fn test_playoffs_view_shows_bracket() {
        let mut app = test_app();
        app.switch_view(View::Playoffs);
        let screen = render_to_string(&mut app);
        assert!(screen.contains("Playoff"));
        assert!(screen.contains("TBD"));
        assert!(!screen.contains("8 - 5 F"));
    }

    #[test]
    fn test_score_popup_renders() {
        let mut app = test_app();
        app.start_score_edit();
        let screen = render_to_string(&mut app);
        assert!(screen.contains("Draw 1 - Sheet A"));
        assert!(screen.contains("[x] Final"));
    }
}
