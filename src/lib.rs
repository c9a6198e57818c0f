pub mod config;
pub mod dataset;
pub mod head_to_head;
pub mod output;
pub mod schedule;
pub mod session;
pub mod standings;
pub mod stderr_buffer;
pub mod tui;
