use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::StudioConfig;

static STUDIO_LOGGER: Lazy<StudioLogger> = Lazy::new(StudioLogger::new);
static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Installs the logger on first call; later calls only swap the config.
pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    let filter = config.min_level.to_level_filter();
    STUDIO_LOGGER.update_config(config);

    if !INSTALLED.swap(true, Ordering::SeqCst) {
        if let Err(e) = log::set_logger(&*STUDIO_LOGGER) {
            return Err(format!("Failed to set logger: {:?}", e));
        }
    }

    log::set_max_level(filter);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }

    pub fn from_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub module: String,
    pub file: String,
    pub line: u32,
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level: LogLevel::from_level(record.level()),
            message: record.args().to_string(),
            module: record.module_path().unwrap_or("unknown").to_string(),
            file: record.file().unwrap_or("unknown").to_string(),
            line: record.line().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_module: bool,
    pub show_file_location: bool,
    pub include_timestamp: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_module: false,
            show_file_location: false,
            include_timestamp: true,
            timestamp_format: "%H:%M:%S%.3f".to_string(),
            output_json: false,
            log_file: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_file_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn production() -> Self {
        Self {
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_module: true,
            show_file_location: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            ..Default::default()
        }
    }
}

pub struct StudioLogger {
    config: Mutex<LoggerConfig>,
    file: Mutex<Option<File>>,
}

impl StudioLogger {
    fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
            file: Mutex::new(None),
        }
    }

    fn update_config(&self, new_config: LoggerConfig) {
        let file = new_config.log_file.as_ref().and_then(|path| {
            OpenOptions::new().create(true).append(true).open(path).ok()
        });
        if let Ok(mut guard) = self.file.lock() {
            *guard = file;
        }
        if let Ok(mut guard) = self.config.lock() {
            *guard = new_config;
        }
    }

    fn format_line(entry: &LogEntry, config: &LoggerConfig) -> String {
        if config.output_json {
            return serde_json::to_string(entry).unwrap_or_default();
        }

        let mut line = String::new();
        if config.include_timestamp {
            let ts = entry.timestamp.format(&config.timestamp_format).to_string();
            if config.show_colors {
                line.push_str(&format!("{} ", ts.bright_black()));
            } else {
                line.push_str(&format!("{} ", ts));
            }
        }

        let level = if config.show_emojis {
            format!("{} {}", entry.level.emoji(), entry.level.as_str())
        } else {
            entry.level.as_str().to_string()
        };
        if config.show_colors {
            line.push_str(&format!("[{}] ", level.color(entry.level.color()).bold()));
        } else {
            line.push_str(&format!("[{}] ", level));
        }

        if config.show_module {
            line.push_str(&entry.module);
            line.push_str("::");
        }
        line.push_str(&entry.message);

        if config.show_file_location {
            line.push_str(&format!(" ({}:{})", entry.file, entry.line));
        }
        line
    }
}

impl log::Log for StudioLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.lock() {
            Ok(config) => metadata.level() <= config.min_level.to_level_filter(),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry::from_record(record);
        let Ok(config) = self.config.lock() else {
            return;
        };

        let line = Self::format_line(&entry, &config);
        // stdout is reserved for locator output.
        eprintln!("{}", line);

        if let Ok(mut guard) = self.file.lock() {
            if let Some(file) = guard.as_mut() {
                let plain = if config.show_colors {
                    let mut plain_config = config.clone();
                    plain_config.show_colors = false;
                    Self::format_line(&entry, &plain_config)
                } else {
                    line
                };
                let _ = writeln!(file, "{}", plain);
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
        if let Ok(mut guard) = self.file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Logs how long a named operation took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::debug!("⏱️  Starting timer: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::debug!(
            "⏱️  Timer '{}' completed in {}ms",
            self.name,
            self.elapsed().as_millis()
        );
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

pub fn log_config_info(config: &StudioConfig) {
    log::info!("⚙️  Configuration loaded:");
    log::info!("   Service: {}", config.base_url);
    log::info!("   Model: {}", config.model);
    log::info!(
        "   Batch: {} images at {}x{}",
        config.count,
        config.width,
        config.height
    );
    log::info!("   Safe mode: {}", if config.safe { "✅" } else { "❌" });
    log::info!(
        "   API key override: {}",
        if config.api_key.is_some() { "✅" } else { "❌" }
    );
    log::debug!(
        "   Download delay: {}ms, fetch concurrency: {}",
        config.download.delay.as_millis(),
        config.download.max_concurrent_fetches
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_levels() {
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Error.emoji(), "❌");
        assert_eq!(LogLevel::Debug.color(), Color::Blue);
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_logger_config_presets() {
        let dev = LoggerConfig::development();
        assert_eq!(dev.min_level, LogLevel::Debug);
        assert!(dev.show_colors);

        let prod = LoggerConfig::production();
        assert!(!prod.show_colors);
        assert!(prod.output_json);
    }

    #[test]
    fn test_plain_line_format() {
        let entry = LogEntry {
            id: "id".into(),
            timestamp: Utc::now(),
            level: LogLevel::Warn,
            message: "careful".into(),
            module: "cinegen::client".into(),
            file: "src/client/mod.rs".into(),
            line: 7,
        };
        let config = LoggerConfig {
            show_colors: false,
            show_emojis: false,
            include_timestamp: false,
            show_module: true,
            show_file_location: true,
            ..Default::default()
        };
        assert_eq!(
            StudioLogger::format_line(&entry, &config),
            "[WARN] cinegen::client::careful (src/client/mod.rs:7)"
        );
    }

    #[test]
    fn test_logger_initialization_is_repeatable() {
        assert!(init_with_config(LoggerConfig::development()).is_ok());
        assert!(init_with_config(LoggerConfig::default()).is_ok());
    }
}
