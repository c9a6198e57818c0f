pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use std::time::Instant;

use crate::session::View;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

const TICK_RATE_MS: u64 = 100;

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    // Ticks drive the debounced save, so keep them well under the debounce window
    let mut events = EventHandler::new(TICK_RATE_MS);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.on_tick(Instant::now()),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => {
            // Any key other than a second quit disarms quit-without-saving
            let is_quit = key.code == KeyCode::Char('q')
                || (key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL));
            if !is_quit {
                app.quit_armed = false;
            }

            match key.code {
                // Quit
                KeyCode::Char('q') => app.request_quit(),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.request_quit()
                }

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

                // View switching
                KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => app.next_view(),
                KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => app.previous_view(),
                KeyCode::Char(c @ '1'..='5') => {
                    let index = c as usize - '1' as usize;
                    app.switch_view(View::ALL[index]);
                }

                // Category filter
                KeyCode::Char('c') => app.cycle_category(),

                // Score entry
                KeyCode::Enter | KeyCode::Char('e') => app.start_score_edit(),

                // Pin
                KeyCode::Char('p') => app.toggle_pin_selected(),

                // Undo
                KeyCode::Char('z') => app.undo_last(),

                // Reload from disk
                KeyCode::Char('r') => app.reload(),

                // Help
                KeyCode::Char('?') => app.show_help(),

                _ => {}
            }
        }
        app::InputMode::ScoreEdit => {
            let Some(editor) = app.editor.as_mut() else {
                app.cancel_score_edit();
                return;
            };
            match key.code {
                KeyCode::Enter => app.confirm_score_edit(),
                KeyCode::Esc => app.cancel_score_edit(),
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                    editor.switch_field()
                }
                KeyCode::Char(' ') | KeyCode::Char('f') => editor.toggle_completed(),
                KeyCode::Backspace => editor.backspace(),
                KeyCode::Char(c) if c.is_ascii_digit() => editor.push_digit(c),

                // Ignore all other keys (don't propagate to Normal mode)
                _ => {}
            }
        }
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
