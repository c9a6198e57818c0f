pub mod storage;
pub mod types;

pub use storage::{get_session_path, load_session_state, save_session_state};
pub use types::{SessionState, View};
