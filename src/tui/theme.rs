//! Color palettes for the TUI

use crate::config::ThemeMode;
use ratatui::prelude::*;

/// Terminal background luminance above which the light palette is used
const LIGHT_LUMA_THRESHOLD: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Results
    pub win: Color,
    pub loss: Color,
    pub no_result: Color,
    pub final_score: Color,
    pub live_score: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub pinned_marker: Color,
    pub date_header: Style,
    pub diagonal: Color,

    // Styles
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Tab colors
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    pub divider_color: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,
    pub field_active: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            win: Color::Green,
            loss: Color::Red,
            no_result: Color::DarkGray,
            final_score: Color::Green,
            live_score: Color::Yellow,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            pinned_marker: Color::Yellow,
            date_header: Style::new().fg(Color::Cyan).bold(),
            diagonal: Color::Indexed(238),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            tab_active_style: Style::new().fg(Color::Cyan).bold(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            divider_color: Color::Indexed(238),
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
            field_active: Style::new().fg(Color::Black).bg(Color::Cyan).bold(),
        }
    }

    pub fn light() -> Self {
        Self {
            win: Color::Rgb(21, 128, 61),
            loss: Color::Rgb(185, 28, 28),
            no_result: Color::Indexed(245),
            final_score: Color::Rgb(21, 128, 61),
            live_score: Color::Rgb(180, 83, 9),
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Indexed(245),
            pinned_marker: Color::Rgb(180, 83, 9),
            date_header: Style::new().fg(Color::Blue).bold(),
            diagonal: Color::Indexed(250),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Indexed(240),
            title_color: Color::Blue,
            tab_active_style: Style::new().fg(Color::Blue).bold(),
            tab_inactive_style: Style::new().fg(Color::Indexed(245)),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(21, 128, 61),
            flash_error: Color::Rgb(185, 28, 28),
            divider_color: Color::Indexed(250),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_bg: Color::Indexed(255),
            field_active: Style::new().fg(Color::White).bg(Color::Blue).bold(),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }
}

/// Pick a palette for the configured mode. `Auto` asks the terminal for its
/// background and falls back to dark when it cannot tell.
pub fn resolve_theme(mode: ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => Theme::Dark,
        ThemeMode::Light => Theme::Light,
        ThemeMode::Auto => match terminal_light::luma() {
            Ok(luma) if luma > LIGHT_LUMA_THRESHOLD => Theme::Light,
            Ok(_) => Theme::Dark,
            Err(e) => {
                crate::verbose_eprintln!("Could not detect terminal background: {}", e);
                Theme::Dark
            }
        },
    }
}
