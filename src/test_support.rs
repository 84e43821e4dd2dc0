//! Log capture for tests.
//!
//! Installs a process-wide logger that keeps every record in memory. Tests
//! run in parallel, so callers filter entries by something unique to their
//! own test (usually the source URL).

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, Once};

struct CaptureLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let message = record.args().to_string();
        if let Ok(mut records) = self.records.lock() {
            records.push((record.level(), message));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

static INIT: Once = Once::new();

/// Install the capturing logger. Safe to call from every test.
pub fn init() {
    INIT.call_once(|| {
        // Fails only if another logger is already installed.
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });
}

/// Messages at any level containing `needle`.
pub fn entries_containing(needle: &str) -> Vec<(Level, String)> {
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, message)| message.contains(needle))
        .cloned()
        .collect()
}
