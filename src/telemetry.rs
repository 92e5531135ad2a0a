//! Telemetry and tracing utilities
//!
//! Helpers for installing a `tracing` subscriber that shows this crate's
//! request, verdict and rejection events.
//!
//! ## Example
//!
//! ```rust,ignore
//! use image_moderation::telemetry::{init_subscriber, OutputFormat, SubscriberConfig};
//!
//! let config = SubscriberConfig::builder()
//!     .log_level(tracing::Level::DEBUG)
//!     .output_format(OutputFormat::Json)
//!     .build();
//! let _guard = init_subscriber(config)?;
//! ```

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::ModerationError;
use crate::utils::env::process_env;

pub const LOG_LEVEL_ENV: &str = "IMAGE_MODERATION_LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "IMAGE_MODERATION_LOG_FORMAT";
pub const LOG_FILE_ENV: &str = "IMAGE_MODERATION_LOG_FILE";

type Result<T> = std::result::Result<T, ModerationError>;

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON, one object per event with span context
    Json,
    /// JSON with event fields flattened and no span context
    JsonCompact,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-compact" => Ok(Self::JsonCompact),
            _ => Err(ModerationError::ConfigurationError(format!(
                "Invalid log format: {value}. Valid options: text, json, json-compact"
            ))),
        }
    }
}

/// Configuration for tracing subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
    /// Write to stdout when no log file is set
    pub enable_console: bool,
    /// Write to this file instead of stdout
    pub log_file: Option<PathBuf>,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            enable_console: true,
            log_file: None,
        }
    }
}

impl SubscriberConfig {
    pub fn builder() -> SubscriberConfigBuilder {
        SubscriberConfigBuilder::default()
    }

    /// Debug level, text output to stdout
    pub fn debug() -> Self {
        Self {
            log_level: tracing::Level::DEBUG,
            ..Self::default()
        }
    }

    /// Warnings and errors as JSON into `log_file`
    pub fn production(log_file: PathBuf) -> Self {
        Self {
            log_level: tracing::Level::WARN,
            output_format: OutputFormat::Json,
            enable_console: false,
            log_file: Some(log_file),
        }
    }

    /// Filter directive scoped to this crate
    pub fn filter_directive(&self) -> String {
        format!(
            "image_moderation={}",
            self.log_level.as_str().to_lowercase()
        )
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            builder = builder.log_level_str(&level)?;
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            builder = builder.output_format(OutputFormat::parse(&format)?);
        }
        if let Some(path) = lookup(LOG_FILE_ENV).filter(|p| !p.trim().is_empty()) {
            builder = builder.log_file(PathBuf::from(path));
        }
        Ok(builder.build())
    }
}

/// Builder for SubscriberConfig
#[derive(Debug, Default)]
pub struct SubscriberConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
    enable_console: Option<bool>,
    log_file: Option<PathBuf>,
}

impl SubscriberConfigBuilder {
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the log level from a string
    pub fn log_level_str(mut self, level: &str) -> Result<Self> {
        let level = match level.trim().to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => {
                return Err(ModerationError::ConfigurationError(format!(
                    "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
                )));
            }
        };
        self.log_level = Some(level);
        Ok(self)
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn enable_console(mut self, enable: bool) -> Self {
        self.enable_console = Some(enable);
        self
    }

    pub fn log_file(mut self, path: PathBuf) -> Self {
        self.log_file = Some(path);
        self
    }

    pub fn build(self) -> SubscriberConfig {
        SubscriberConfig {
            log_level: self.log_level.unwrap_or(tracing::Level::INFO),
            output_format: self.output_format.unwrap_or_default(),
            enable_console: self.enable_console.unwrap_or(true),
            log_file: self.log_file,
        }
    }
}

/// Non-blocking writer appending to `path`. Keep the guard alive until shutdown.
pub fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            ModerationError::ConfigurationError(format!(
                "Log file path has no file name: {}",
                path.display()
            ))
        })?;
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|e| {
            ModerationError::ConfigurationError(format!(
                "Failed to open log file {}: {e}",
                path.display()
            ))
        })?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Initialize tracing subscriber with the given configuration
///
/// Returns the file writer's guard when `log_file` is set; it must outlive
/// every log call or buffered lines are lost. A subscriber that is already
/// installed is left in place.
pub fn init_subscriber(config: SubscriberConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(config.filter_directive())
        .map_err(|e| ModerationError::ConfigurationError(format!("Invalid log filter: {e}")))?;

    match &config.log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            try_init(filter, config.output_format, writer, false)?;
            Ok(Some(guard))
        }
        None if config.enable_console => {
            try_init(filter, config.output_format, std::io::stdout, true)?;
            Ok(None)
        }
        None => Ok(None),
    }
}

fn try_init<W>(filter: EnvFilter, format: OutputFormat, writer: W, ansi: bool) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);

    let init_result = match format {
        OutputFormat::Json => builder
            .with_thread_ids(true)
            .with_thread_names(true)
            .json()
            .try_init(),
        OutputFormat::JsonCompact => builder
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .try_init(),
        OutputFormat::Text => builder.try_init(),
    };

    match init_result {
        Ok(()) => Ok(()),
        Err(e) if e
            .to_string()
            .contains("global default trace dispatcher has already been set") =>
        {
            Ok(())
        }
        Err(e) => Err(ModerationError::ConfigurationError(format!(
            "Failed to initialize tracing: {e}"
        ))),
    }
}

/// Initialize tracing subscriber with default configuration
pub fn init_default() -> Result<Option<WorkerGuard>> {
    init_subscriber(SubscriberConfig::default())
}

/// Initialize tracing subscriber for debugging
pub fn init_debug() -> Result<Option<WorkerGuard>> {
    init_subscriber(SubscriberConfig::debug())
}

/// Initialize tracing subscriber from environment variables
///
/// - `IMAGE_MODERATION_LOG_LEVEL`: trace, debug, info, warn, error
/// - `IMAGE_MODERATION_LOG_FORMAT`: text, json, json-compact
/// - `IMAGE_MODERATION_LOG_FILE`: log file path
pub fn init_from_env() -> Result<Option<WorkerGuard>> {
    init_subscriber(SubscriberConfig::from_lookup(process_env)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builder_defaults() {
        let config = SubscriberConfig::builder().build();
        assert_eq!(config, SubscriberConfig::default());
        assert_eq!(config.filter_directive(), "image_moderation=info");
    }

    #[test]
    fn invalid_level_is_rejected() {
        let err = SubscriberConfig::builder()
            .log_level_str("loud")
            .unwrap_err();
        assert!(matches!(err, ModerationError::ConfigurationError(_)));
    }

    #[test]
    fn reads_environment_lookup() {
        let config = SubscriberConfig::from_lookup(|name| match name {
            LOG_LEVEL_ENV => Some("DEBUG".to_string()),
            LOG_FORMAT_ENV => Some("json-compact".to_string()),
            LOG_FILE_ENV => Some("/var/log/moderation.log".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert_eq!(config.output_format, OutputFormat::JsonCompact);
        assert_eq!(
            config.log_file.as_deref(),
            Some(Path::new("/var/log/moderation.log"))
        );
        assert_eq!(config.filter_directive(), "image_moderation=debug");
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = SubscriberConfig::from_lookup(|name| {
            (name == LOG_FORMAT_ENV).then(|| "yaml".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn file_writer_flushes_on_guard_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moderation.log");
        let (mut writer, guard) = file_writer(&path).unwrap();
        writer.write_all(b"rejecting image upload\n").unwrap();
        drop(guard);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("rejecting image upload"));
    }

    #[test]
    fn disabled_console_without_file_installs_nothing() {
        let config = SubscriberConfig::builder().enable_console(false).build();
        assert!(init_subscriber(config).unwrap().is_none());
    }
}
