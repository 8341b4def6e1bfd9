//! Global `tracing` subscriber assembled from the `logging` section.
//!
//! Console output goes through a fmt layer in one of four styles. The file
//! handler writes through a non-blocking daily-rotated appender and hands the
//! flush guard back to the caller, which must keep it alive for the life of
//! the process. Initialization is idempotent: when a subscriber is already
//! installed the existing one is kept.

use std::sync::Arc;

use tracing::debug;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use super::registry::ServiceRegistration;
use super::types::{ServiceError, ServiceResult, SharedService};
use crate::config::{FileLogSettings, LogHandler, LoggingSettings, Settings};

/// Container key for the built-in instance.
pub const SERVICE_NAME: &str = "logging";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Holder for the resolved logging configuration.
#[derive(Debug)]
pub struct LoggingService {
    settings: LoggingSettings,
}

impl LoggingService {
    pub fn new(settings: &Settings) -> Self {
        Self::from_settings(settings.logging.clone())
    }

    pub fn from_settings(settings: LoggingSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &LoggingSettings {
        &self.settings
    }

    /// Install the global subscriber.
    ///
    /// Returns the file writer guard when the file handler is enabled; drop
    /// it and buffered log lines are lost.
    pub fn init_global(&self) -> ServiceResult<Option<WorkerGuard>> {
        let filter = self.env_filter()?;

        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;
        if self.settings.handlers.contains(&LogHandler::Console) {
            layers.push(self.console_layer());
        }
        if self.settings.handlers.contains(&LogHandler::File) {
            let appender = Self::rolling_appender(&self.settings.file)?;
            let (writer, worker) = tracing_appender::non_blocking(appender);
            layers.push(fmt::layer().with_writer(writer).with_ansi(false).boxed());
            guard = Some(worker);
        }

        if tracing_subscriber::registry()
            .with(layers)
            .with(filter)
            .try_init()
            .is_err()
        {
            debug!("a global subscriber is already installed, keeping it");
        }
        Ok(guard)
    }

    fn console_layer(&self) -> BoxedLayer {
        match self.settings.format.as_str() {
            "compact" => fmt::layer().compact().boxed(),
            "pretty" => fmt::layer().pretty().boxed(),
            "json" => fmt::layer().json().boxed(),
            "full" => fmt::layer().boxed(),
            other => {
                debug!(format = other, "unknown log format, using full");
                fmt::layer().boxed()
            }
        }
    }

    fn env_filter(&self) -> ServiceResult<EnvFilter> {
        EnvFilter::try_new(&self.settings.level).map_err(|e| {
            ServiceError::LoggingInit(format!(
                "invalid log level '{}': {}",
                self.settings.level, e
            ))
        })
    }

    fn rolling_appender(file: &FileLogSettings) -> ServiceResult<RollingFileAppender> {
        // "app.log" rotates as app.<date>.log; a filename without an
        // extension becomes the whole prefix.
        let (prefix, suffix) = match file.filename.rsplit_once('.') {
            Some((prefix, suffix)) => (prefix, suffix),
            None => (file.filename.as_str(), "log"),
        };
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(prefix)
            .filename_suffix(suffix)
            .max_log_files(file.max_files)
            .build(&file.directory)
            .map_err(|e| ServiceError::LoggingInit(e.to_string()))
    }
}

fn construct(settings: &Settings) -> ServiceResult<SharedService> {
    Ok(Arc::new(LoggingService::new(settings)))
}

/// Registration hook, picked up by the service manifest.
pub fn register_service() -> ServiceRegistration {
    ServiceRegistration {
        name: SERVICE_NAME,
        constructor: construct,
    }
}
