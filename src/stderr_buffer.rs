use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enable or disable verbose diagnostics (`--verbose`)
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Activate buffering. While active, diagnostics are stored instead of being
/// written over the TUI.
pub fn activate() {
    if let Ok(mut guard) = BUFFER.lock() {
        *guard = Some(Vec::new());
    }
}

/// Deactivate buffering and return all collected messages.
pub fn drain() -> Vec<String> {
    match BUFFER.lock() {
        Ok(mut guard) => guard.take().unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}

/// Write a diagnostic line. If buffering is active the message is stored;
/// otherwise it is printed to stderr immediately.
pub fn warn(msg: String) {
    let Ok(mut guard) = BUFFER.lock() else {
        eprintln!("{}", msg);
        return;
    };
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// Works like `eprintln!` but routes through the stderr buffer when it is
/// active.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::stderr_buffer::warn(format!($($arg)*))
    };
}

/// `buffered_eprintln!` that only prints under `--verbose`
#[macro_export]
macro_rules! verbose_eprintln {
    ($($arg:tt)*) => {
        if $crate::stderr_buffer::is_verbose() {
            $crate::stderr_buffer::warn(format!($($arg)*))
        }
    };
}
