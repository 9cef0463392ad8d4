//! Unit tests for log.rs
//!
//! Tests Logger trait, LogEntry, LogSeverity, DefaultLogger and the global logger API.
//! Tests touching the global logger run under #[serial].

use crate::log::{self, DefaultLogger, LogEntry, LogSeverity, Logger};
use serial_test::serial;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Logger capturing entries for verification
struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn make_entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "gfx_bridge::test".to_string(),
        message: "message".to_string(),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_creation_without_file_line() {
    let entry = make_entry(LogSeverity::Info, None, None);
    assert_eq!(entry.severity, LogSeverity::Info);
    assert_eq!(entry.source, "gfx_bridge::test");
    assert!(entry.file.is_none());
    assert!(entry.line.is_none());
}

#[test]
fn test_log_entry_creation_with_file_line() {
    let entry = make_entry(LogSeverity::Error, Some("command_buffer.rs"), Some(42));
    assert_eq!(entry.file, Some("command_buffer.rs"));
    assert_eq!(entry.line, Some(42));
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        logger.log(&make_entry(severity, None, None));
        logger.log(&make_entry(severity, Some("log_tests.rs"), Some(1)));
    }
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
}

// ============================================================================
// GLOBAL LOGGER TESTS
// ============================================================================

#[test]
#[serial]
fn test_set_logger_routes_macros() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    log::set_logger(CaptureLogger { entries: entries.clone() });

    crate::engine_info!("gfx_bridge::test", "frame {} begun", 3);
    crate::engine_warn!("gfx_bridge::test", "slow present");

    log::reset_logger();

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].severity, LogSeverity::Info);
    assert_eq!(captured[0].message, "frame 3 begun");
    assert!(captured[0].file.is_none());
    assert_eq!(captured[1].severity, LogSeverity::Warn);
}

#[test]
#[serial]
fn test_engine_error_carries_file_and_line() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    log::set_logger(CaptureLogger { entries: entries.clone() });

    crate::engine_error!("gfx_bridge::test", "bad attachment");

    log::reset_logger();

    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Error);
    assert!(captured[0].file.unwrap().ends_with("log_tests.rs"));
    assert!(captured[0].line.is_some());
}

#[test]
#[serial]
fn test_reset_logger_stops_capture() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    log::set_logger(CaptureLogger { entries: entries.clone() });
    log::reset_logger();

    crate::engine_debug!("gfx_bridge::test", "not captured");

    assert!(entries.lock().unwrap().is_empty());
}
