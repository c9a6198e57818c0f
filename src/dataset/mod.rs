pub mod error;
pub mod saver;
pub mod storage;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use saver::{DebouncedSaver, SaveOutcome};
pub use storage::{get_default_data_path, load_dataset_file, read_dataset_file, save_dataset_file};
pub use store::{
    dataset_from_value, parse_dataset, validate_dataset, MatchStore, ScoreSnapshot, TiePolicy,
};
pub use types::{parse_hex_color, Dataset, Draw, Match, Pool, Slot, Team, TBD};
