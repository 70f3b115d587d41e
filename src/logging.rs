// src/logging.rs

use crate::errors::{ReviewBotError, ReviewBotResult};
use chrono::{DateTime, Utc};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use std::path::PathBuf;
use std::time::Duration;

/// Summary of one `/feedback` exchange.
#[derive(Debug, Clone)]
pub struct RequestLog {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub request_summary: String,
    /// `None` when no response arrived (connect error, timeout).
    pub response_status: Option<u16>,
    pub response_time_ms: u128,
}

impl RequestLog {
    pub fn new(endpoint: &str, request_summary: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            endpoint: endpoint.to_string(),
            request_summary: request_summary.into(),
            response_status: None,
            response_time_ms: 0,
        }
    }

    pub fn finish(mut self, status: Option<u16>, elapsed: Duration) -> Self {
        self.response_status = status;
        self.response_time_ms = elapsed.as_millis();
        self
    }

    pub fn to_line(&self) -> String {
        let status = self
            .response_status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "[{}] {} - {} - Status: {} - Time: {}ms",
            self.timestamp.to_rfc3339(),
            self.endpoint,
            self.request_summary,
            status,
            self.response_time_ms
        )
    }
}

/// Logs a finished request at info level.
pub fn log_request(log: &RequestLog) {
    log::info!(target: "reviewbot::requests", "{}", log.to_line());
}

pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("reviewbot")
        .join("logs")
}

/// Starts file logging. The terminal belongs to the UI, so nothing is
/// written to stdout or stderr. Keep the handle alive for the whole run.
pub fn init_logging(level: &str) -> ReviewBotResult<LoggerHandle> {
    Logger::try_with_str(level)
        .map_err(|e| ReviewBotError::config_error(format!("Invalid log level {}: {}", level, e)))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir())
                .basename("reviewbot"),
        )
        .rotate(
            Criterion::Size(1_000_000),
            Naming::Numbers,
            Cleanup::KeepLogFiles(5),
        )
        .format(flexi_logger::detailed_format)
        .start()
        .map_err(|e| ReviewBotError::config_error(format!("Failed to start logger: {}", e)))
}
