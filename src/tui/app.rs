use crate::config::Config;
use crate::dataset::{
    load_dataset_file, DebouncedSaver, MatchStore, SaveOutcome, ScoreSnapshot, StoreError,
};
use crate::head_to_head::category_matrices;
use crate::schedule::{draw_schedule, playoff_draws, team_schedule};
use crate::session::{save_session_state, SessionState, View};
use crate::standings::{division_tables, Category};
use crate::tui::theme::{Theme, ThemeColors};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const MAX_UNDO: usize = 50;
const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    ScoreEdit,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Error,
}

/// What a selectable row points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKey {
    Match { draw_id: u32, sheet: String },
    Team(String),
    /// A match listed under one team in the teams view
    TeamMatch {
        team_id: String,
        draw_id: u32,
        sheet: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreField {
    First,
    Second,
}

/// In-progress edit of one match's score
#[derive(Debug, Clone)]
pub struct ScoreEditor {
    pub draw_id: u32,
    pub sheet: String,
    pub score1: String,
    pub score2: String,
    pub completed: bool,
    pub field: ScoreField,
}

impl ScoreEditor {
    fn active_buffer(&mut self) -> &mut String {
        match self.field {
            ScoreField::First => &mut self.score1,
            ScoreField::Second => &mut self.score2,
        }
    }

    pub fn push_digit(&mut self, c: char) {
        let buffer = self.active_buffer();
        // Curling scores never need more than two digits
        if c.is_ascii_digit() && buffer.len() < 2 {
            if buffer.as_str() == "0" {
                buffer.clear();
            }
            buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.active_buffer().pop();
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            ScoreField::First => ScoreField::Second,
            ScoreField::Second => ScoreField::First,
        };
    }

    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    fn parsed(&self) -> (i64, i64) {
        let parse = |s: &str| s.trim().parse::<i64>().unwrap_or(0);
        (parse(&self.score1), parse(&self.score2))
    }
}

#[derive(Debug, Clone)]
pub enum UndoAction {
    ScoreCommitted {
        draw_id: u32,
        sheet: String,
        previous: ScoreSnapshot,
    },
    PinToggled {
        team_id: String,
    },
}

pub struct App {
    pub store: MatchStore,
    pub saver: DebouncedSaver,
    pub session: SessionState,
    pub session_path: PathBuf,
    pub config: Config,
    pub theme: Theme,
    pub colors: ThemeColors,
    pub table_state: ratatui::widgets::TableState,
    pub current_view: View,
    pub category: Category,
    pub input_mode: InputMode,
    pub editor: Option<ScoreEditor>,
    pub flash_message: Option<(String, FlashKind, Instant)>,
    pub undo_stack: VecDeque<UndoAction>,
    pub should_quit: bool,
    /// Set after a failed save on quit; a second quit leaves without saving
    pub quit_armed: bool,
}

impl App {
    pub fn new(
        store: MatchStore,
        data_path: PathBuf,
        save_debounce: Duration,
        session: SessionState,
        session_path: PathBuf,
        config: Config,
        theme: Theme,
    ) -> Self {
        let category = session.category.unwrap_or(config.default_category);
        let current_view = session.view.unwrap_or(View::Schedule);

        let mut app = Self {
            store,
            saver: DebouncedSaver::new(data_path, save_debounce),
            session,
            session_path,
            config,
            theme,
            colors: ThemeColors::for_theme(theme),
            table_state: ratatui::widgets::TableState::default(),
            current_view,
            category,
            input_mode: InputMode::Normal,
            editor: None,
            flash_message: None,
            undo_stack: VecDeque::new(),
            should_quit: false,
            quit_armed: false,
        };
        app.reset_selection();
        app
    }

    /// Selectable rows of the current view, top to bottom
    pub fn rows(&self) -> Vec<RowKey> {
        match self.current_view {
            View::Schedule => draw_schedule(&self.store, self.category)
                .iter()
                .flat_map(|group| group.draws.iter())
                .flat_map(|view| {
                    view.matches.iter().map(move |m| RowKey::Match {
                        draw_id: view.draw.id,
                        sheet: m.sheet.clone(),
                    })
                })
                .collect(),
            View::Teams => team_schedule(&self.store, self.category, &self.session.pinned)
                .iter()
                .flat_map(|s| {
                    let team_id = &s.team.id;
                    std::iter::once(RowKey::Team(team_id.clone())).chain(s.matches.iter().map(
                        move |sm| RowKey::TeamMatch {
                            team_id: team_id.clone(),
                            draw_id: sm.draw.id,
                            sheet: sm.game.sheet.clone(),
                        },
                    ))
                })
                .collect(),
            View::Matrix => category_matrices(&self.store, self.category)
                .iter()
                .flat_map(|grid| grid.rows.iter())
                .map(|row| RowKey::Team(row.team.id.clone()))
                .collect(),
            View::Standings => division_tables(&self.store, self.category)
                .iter()
                .flat_map(|table| table.rows.iter())
                .map(|row| RowKey::Team(row.team.id.clone()))
                .collect(),
            View::Playoffs => playoff_draws(&self.store, self.category)
                .iter()
                .flat_map(|view| {
                    view.matches.iter().map(move |m| RowKey::Match {
                        draw_id: view.draw.id,
                        sheet: m.sheet.clone(),
                    })
                })
                .collect(),
        }
    }

    pub fn selected_row(&self) -> Option<RowKey> {
        let index = self.table_state.selected()?;
        self.rows().into_iter().nth(index)
    }

    pub fn selected_team_id(&self) -> Option<String> {
        match self.selected_row()? {
            RowKey::Team(id) | RowKey::TeamMatch { team_id: id, .. } => Some(id),
            RowKey::Match { .. } => None,
        }
    }

    pub fn next_row(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    fn reset_selection(&mut self) {
        if self.rows().is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
    }

    /// Keep the selection inside the row list after the data changed
    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            match self.table_state.selected() {
                Some(selected) if selected >= len => self.table_state.select(Some(len - 1)),
                None => self.table_state.select(Some(0)),
                _ => {}
            }
        }
    }

    pub fn push_undo(&mut self, action: UndoAction) {
        self.undo_stack.push_front(action);
        if self.undo_stack.len() > MAX_UNDO {
            self.undo_stack.pop_back();
        }
    }

    pub fn update_flash(&mut self) {
        if let Some((_, _, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, FlashKind::Info, Instant::now()));
    }

    pub fn show_error(&mut self, msg: String) {
        self.flash_message = Some((msg, FlashKind::Error, Instant::now()));
    }

    /// Periodic housekeeping: expire the flash and run a due save
    pub fn on_tick(&mut self, now: Instant) {
        self.update_flash();
        match self.saver.tick(now, &mut self.store) {
            Some(Ok(SaveOutcome::Saved)) => {
                crate::verbose_eprintln!("Saved dataset to {}", self.saver.path().display());
            }
            Some(Ok(SaveOutcome::Clean)) | None => {}
            Some(Err(e)) => {
                crate::buffered_eprintln!("Save failed: {:#}", e);
                self.show_error(format!("Save failed, scores kept in memory only: {}", e));
            }
        }
    }

    pub fn switch_view(&mut self, view: View) {
        if self.current_view == view {
            return;
        }
        self.current_view = view;
        self.reset_selection();
        self.remember_position();
    }

    pub fn next_view(&mut self) {
        self.switch_view(self.current_view.next());
    }

    pub fn previous_view(&mut self) {
        self.switch_view(self.current_view.previous());
    }

    pub fn cycle_category(&mut self) {
        self.category = self.category.next();
        self.reset_selection();
        self.remember_position();
        self.show_flash(format!("Showing {}", self.category.label()));
    }

    fn remember_position(&mut self) {
        self.session.remember(self.category, self.current_view);
        self.persist_session();
    }

    fn persist_session(&mut self) {
        if let Err(e) = save_session_state(&self.session_path, &self.session) {
            crate::buffered_eprintln!("Failed to save session state: {:#}", e);
        }
    }

    /// Open the score editor on the selected match, if the row is one
    pub fn start_score_edit(&mut self) {
        let (draw_id, sheet) = match self.selected_row() {
            Some(RowKey::Match { draw_id, sheet }) => (draw_id, sheet),
            Some(RowKey::TeamMatch { draw_id, sheet, .. }) => (draw_id, sheet),
            _ => return,
        };
        let Some(m) = self.store.find_match(draw_id, &sheet) else {
            return;
        };

        self.editor = Some(ScoreEditor {
            draw_id,
            sheet,
            score1: m.score1.to_string(),
            score2: m.score2.to_string(),
            completed: m.completed,
            field: ScoreField::First,
        });
        self.input_mode = InputMode::ScoreEdit;
    }

    /// Commit the editor's values to the store and schedule a save
    pub fn confirm_score_edit(&mut self) {
        let Some(editor) = self.editor.clone() else {
            self.input_mode = InputMode::Normal;
            return;
        };
        let (score1, score2) = editor.parsed();

        match self
            .store
            .commit_score(editor.draw_id, &editor.sheet, score1, score2, editor.completed)
        {
            Ok(previous) => {
                self.push_undo(UndoAction::ScoreCommitted {
                    draw_id: editor.draw_id,
                    sheet: editor.sheet.clone(),
                    previous,
                });
                self.saver.mark_dirty(Instant::now());
                let status = if editor.completed { " final" } else { "" };
                self.show_flash(format!(
                    "Draw {} sheet {}: {}-{}{} (z to undo)",
                    editor.draw_id, editor.sheet, score1.max(0), score2.max(0), status
                ));
                self.editor = None;
                self.input_mode = InputMode::Normal;
            }
            Err(e @ StoreError::TiedResult { .. }) => {
                // Leave the editor open so the operator can fix the score
                self.show_error(e.to_string());
            }
            Err(e) => {
                self.show_error(e.to_string());
                self.editor = None;
                self.input_mode = InputMode::Normal;
            }
        }
    }

    pub fn cancel_score_edit(&mut self) {
        self.editor = None;
        self.input_mode = InputMode::Normal;
    }

    /// Pin or unpin the selected team
    pub fn toggle_pin_selected(&mut self) {
        let Some(team_id) = self.selected_team_id() else {
            return;
        };
        self.toggle_pin(&team_id);
        self.push_undo(UndoAction::PinToggled { team_id });
    }

    fn toggle_pin(&mut self, team_id: &str) {
        let pinned = self.session.toggle_pin(team_id);
        self.persist_session();

        let name = self
            .store
            .get_team(team_id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| team_id.to_string());
        if pinned {
            self.show_flash(format!("Pinned: {}", name));
        } else {
            self.show_flash(format!("Unpinned: {}", name));
        }
        // Pinned teams sort first in the teams view
        self.clamp_selection();
    }

    /// Undo the last score commit or pin toggle
    pub fn undo_last(&mut self) {
        let action = match self.undo_stack.pop_front() {
            Some(action) => action,
            None => {
                self.show_flash("Nothing to undo".to_string());
                return;
            }
        };

        match action {
            UndoAction::ScoreCommitted {
                draw_id,
                sheet,
                previous,
            } => match self.store.restore_score(draw_id, &sheet, previous) {
                Ok(_) => {
                    self.saver.mark_dirty(Instant::now());
                    self.show_flash(format!(
                        "Undid score: draw {} sheet {} back to {}-{}",
                        draw_id, sheet, previous.score1, previous.score2
                    ));
                }
                Err(e) => self.show_error(format!("Undo failed: {}", e)),
            },
            UndoAction::PinToggled { team_id } => self.toggle_pin(&team_id),
        }
    }

    /// Write pending changes, then re-read the dataset from disk
    pub fn reload(&mut self) {
        if let Err(e) = self.saver.flush(&mut self.store) {
            self.show_error(format!("Reload skipped, save failed: {}", e));
            return;
        }

        match load_dataset_file(self.saver.path(), self.config.tie_policy) {
            Ok(store) => {
                self.store = store;
                self.undo_stack.clear();
                self.clamp_selection();
                self.show_flash(format!(
                    "Reloaded ({} teams, {} draws)",
                    self.store.teams().len(),
                    self.store.draws().len()
                ));
            }
            Err(e) => self.show_error(format!("Reload failed: {:#}", e)),
        }
    }

    /// Save before leaving. A failed save keeps the TUI open once so the
    /// operator sees the error; quitting again discards the changes.
    pub fn request_quit(&mut self) {
        if self.quit_armed {
            self.should_quit = true;
            return;
        }
        match self.saver.flush(&mut self.store) {
            Ok(_) => self.should_quit = true,
            Err(e) => {
                self.quit_armed = true;
                self.show_error(format!(
                    "Save failed: {}. Press q again to quit without saving.",
                    e
                ));
            }
        }
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::store::fixtures::sample_store;
    use std::env;

    fn test_app(name: &str) -> App {
        let data_path = env::temp_dir().join(format!("bonspiel_test_app_{}.json", name));
        let session_path = env::temp_dir().join(format!("bonspiel_test_app_{}_session.json", name));
        let _ = std::fs::remove_file(&data_path);
        let _ = std::fs::remove_file(&session_path);
        App::new(
            sample_store(),
            data_path,
            Duration::from_millis(0),
            SessionState::new(),
            session_path,
            Config::default(),
            Theme::Dark,
        )
    }

    fn select_match(app: &mut App, draw_id: u32, sheet: &str) {
        let target = RowKey::Match {
            draw_id,
            sheet: sheet.to_string(),
        };
        let index = app.rows().iter().position(|r| *r == target).unwrap();
        app.table_state.select(Some(index));
    }

    #[test]
    fn test_starts_on_schedule_with_selection() {
        let app = test_app("start");
        assert_eq!(app.current_view, View::Schedule);
        assert_eq!(app.category, Category::All);
        assert_eq!(app.table_state.selected(), Some(0));
        assert_eq!(app.rows().len(), 6);
    }

    #[test]
    fn test_row_navigation_wraps() {
        let mut app = test_app("nav");
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(5));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_score_edit_commit_and_undo() {
        let mut app = test_app("edit");
        select_match(&mut app, 3, "B");
        app.start_score_edit();
        assert_eq!(app.input_mode, InputMode::ScoreEdit);

        let editor = app.editor.as_mut().unwrap();
        editor.push_digit('5');
        editor.switch_field();
        editor.push_digit('3');
        editor.toggle_completed();
        app.confirm_score_edit();

        assert_eq!(app.input_mode, InputMode::Normal);
        let m = app.store.find_match(3, "B").unwrap();
        assert_eq!((m.score1, m.score2, m.completed), (5, 3, true));
        assert!(app.saver.is_pending());

        app.undo_last();
        let m = app.store.find_match(3, "B").unwrap();
        assert_eq!((m.score1, m.score2, m.completed), (0, 0, false));
    }

    #[test]
    fn test_editor_digits() {
        let mut editor = ScoreEditor {
            draw_id: 1,
            sheet: "A".to_string(),
            score1: "0".to_string(),
            score2: String::new(),
            completed: false,
            field: ScoreField::First,
        };
        editor.push_digit('7');
        assert_eq!(editor.score1, "7");
        editor.push_digit('1');
        editor.push_digit('2');
        assert_eq!(editor.score1, "71");
        editor.push_digit('x');
        editor.backspace();
        assert_eq!(editor.score1, "7");
        assert_eq!(editor.parsed(), (7, 0));
    }

    #[test]
    fn test_tied_final_rejected_keeps_editor_open() {
        let mut app = test_app("tie");
        app.config.tie_policy = crate::dataset::TiePolicy::Reject;
        let mut store = crate::dataset::MatchStore::new(crate::dataset::TiePolicy::Reject);
        store
            .load_json(crate::dataset::store::fixtures::SAMPLE_JSON)
            .unwrap();
        app.store = store;

        select_match(&mut app, 3, "B");
        app.start_score_edit();
        app.editor.as_mut().unwrap().toggle_completed();
        app.confirm_score_edit();

        assert_eq!(app.input_mode, InputMode::ScoreEdit);
        assert!(matches!(app.flash_message, Some((_, FlashKind::Error, _))));
        assert!(!app.store.find_match(3, "B").unwrap().completed);
    }

    #[test]
    fn test_edit_ignored_outside_schedule() {
        let mut app = test_app("teams_edit");
        app.switch_view(View::Standings);
        app.start_score_edit();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.editor.is_none());
    }

    #[test]
    fn test_teams_view_lists_matches_under_each_team() {
        let mut app = test_app("teams_rows");
        app.switch_view(View::Teams);
        // Five teams; M1 and M3 play three matches, M2 two, W1 and W2 one each
        assert_eq!(app.rows().len(), 5 + 3 + 2 + 3 + 1 + 1);
        assert_eq!(app.rows()[0], RowKey::Team("M1".to_string()));
        assert_eq!(
            app.rows()[1],
            RowKey::TeamMatch {
                team_id: "M1".to_string(),
                draw_id: 1,
                sheet: "A".to_string(),
            }
        );
    }

    #[test]
    fn test_score_edit_from_teams_view() {
        let mut app = test_app("teams_score");
        app.switch_view(View::Teams);

        // A team row has nothing to edit
        app.start_score_edit();
        assert_eq!(app.input_mode, InputMode::Normal);

        let index = app
            .rows()
            .iter()
            .position(|r| {
                *r == RowKey::TeamMatch {
                    team_id: "M1".to_string(),
                    draw_id: 3,
                    sheet: "B".to_string(),
                }
            })
            .unwrap();
        app.table_state.select(Some(index));
        assert_eq!(app.selected_team_id().as_deref(), Some("M1"));

        app.start_score_edit();
        let editor = app.editor.as_mut().unwrap();
        assert_eq!((editor.draw_id, editor.sheet.as_str()), (3, "B"));
        editor.push_digit('4');
        editor.switch_field();
        editor.push_digit('7');
        editor.toggle_completed();
        app.confirm_score_edit();

        let m = app.store.find_match(3, "B").unwrap();
        assert_eq!((m.score1, m.score2, m.completed), (4, 7, true));
    }

    #[test]
    fn test_playoffs_view_edits_bracket_match() {
        let mut app = test_app("playoffs");
        app.switch_view(View::Playoffs);
        assert_eq!(
            app.rows(),
            vec![RowKey::Match {
                draw_id: 3,
                sheet: "A".to_string(),
            }]
        );
        app.start_score_edit();
        assert_eq!(app.input_mode, InputMode::ScoreEdit);
        assert!(app.selected_team_id().is_none());
    }

    #[test]
    fn test_pin_and_undo_pin() {
        let mut app = test_app("pin");
        app.switch_view(View::Standings);
        let team_id = app.selected_team_id().unwrap();
        app.toggle_pin_selected();
        assert!(app.session.is_pinned(&team_id));

        app.undo_last();
        assert!(!app.session.is_pinned(&team_id));
    }

    #[test]
    fn test_cycle_category_resets_rows() {
        let mut app = test_app("category");
        app.switch_view(View::Standings);
        assert_eq!(app.rows().len(), 5);
        app.cycle_category();
        assert_eq!(app.category, Category::Men);
        assert_eq!(app.rows().len(), 3);
        assert_eq!(app.session.category, Some(Category::Men));
        assert_eq!(app.session.view, Some(View::Standings));
    }

    #[test]
    fn test_tick_saves_and_quit_flushes() {
        let mut app = test_app("tick");
        select_match(&mut app, 2, "B");
        app.start_score_edit();
        app.editor.as_mut().unwrap().toggle_completed();
        app.confirm_score_edit();
        assert!(app.store.is_dirty());

        app.on_tick(Instant::now() + Duration::from_millis(1));
        assert!(!app.store.is_dirty());
        assert!(app.saver.path().exists());

        app.request_quit();
        assert!(app.should_quit);
        let _ = std::fs::remove_file(app.saver.path());
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut app = test_app("undo_empty");
        app.undo_last();
        let (msg, kind, _) = app.flash_message.clone().unwrap();
        assert_eq!(msg, "Nothing to undo");
        assert_eq!(kind, FlashKind::Info);
    }
}
