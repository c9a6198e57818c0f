pub mod formatter;

pub use formatter::{
    format_differential, format_match_line, format_matrices, format_playoffs, format_schedule,
    format_score_pill, format_standings, format_standings_tsv, format_team_schedule,
    should_use_colors, slot_name,
};
