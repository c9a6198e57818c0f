pub mod category;
pub mod engine;

pub use category::Category;
pub use engine::{
    compare_rows, compute_standings, division_tables, standings_for_category, team_record,
    Record, StandingRow, StandingsTable,
};
