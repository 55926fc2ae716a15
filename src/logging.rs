use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

const MAX_LOG_BYTES: u64 = 2 * 1024 * 1024;

pub fn init(data_dir: &Path) {
    let _ = std::fs::create_dir_all(data_dir);
    let log_path = data_dir.join("quotesync.log");

    // Rotate: if file is > 2MB, rename to .old and start fresh
    if let Ok(meta) = std::fs::metadata(&log_path) {
        if meta.len() > MAX_LOG_BYTES {
            let old_path = data_dir.join("quotesync.old.log");
            let _ = std::fs::rename(&log_path, old_path);
        }
    }

    if let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        if let Ok(mut guard) = LOG_FILE.lock() {
            *guard = Some(file);
        }
        log(
            log::Level::Info,
            &format!("=== quotesync v{} started ===", env!("CARGO_PKG_VERSION")),
        );
        log(log::Level::Info, &format!("Log file: {}", log_path.display()));
    }
}

pub fn log(level: log::Level, msg: &str) {
    log::log!(target: "quotesync", level, "{}", msg);

    let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "[{}] {:<5} {}", timestamp, level, msg);
            let _ = file.flush();
        }
    }
}

/// Convenience macro for logging with format args.
#[macro_export]
macro_rules! qlog {
    ($($arg:tt)*) => {
        $crate::logging::log(::log::Level::Info, &format!($($arg)*))
    };
}

/// Same as `qlog!` at warn level.
#[macro_export]
macro_rules! qwarn {
    ($($arg:tt)*) => {
        $crate::logging::log(::log::Level::Warn, &format!($($arg)*))
    };
}
