//! Tracing setup and the in-app log console.
//!
//! Events go to a daily rolling file and to a [`LogConsole`] buffer that the
//! logger tab renders. The level filter sits behind a reload handle so the
//! options dialog can change it at runtime.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, reload};

const CONSOLE_CAPACITY: usize = 2000;

/// Severity used by the options dialog and the log console.
///
/// `Critical` is an error event carrying `critical = true`. `None` turns
/// logging off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
    None,
}

impl LogLevel {
    pub const ALL: [Self; 6] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
        Self::None,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Critical => "Critical",
            Self::None => "None",
        }
    }

    /// `EnvFilter` directive for this level.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error | Self::Critical => "error",
            Self::None => "off",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|l| *l == self).unwrap_or(0)
    }

    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Self::Info)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::from_index((self.index() + 1).min(Self::ALL.len() - 1))
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::from_index(self.index().saturating_sub(1))
    }

    fn from_event(level: Level, critical: bool) -> Self {
        match level {
            Level::ERROR if critical => Self::Critical,
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warning,
            Level::INFO => Self::Info,
            Level::DEBUG | Level::TRACE => Self::Debug,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    /// Single-line rendering used by the console and its text filter.
    #[must_use]
    pub fn line(&self) -> String {
        format!(
            "[{}] {} [{:<8}] {}",
            self.timestamp.format("%H:%M:%S"),
            self.target,
            self.level.name().to_uppercase(),
            self.message
        )
    }
}

/// Shared ring buffer of captured log entries.
#[derive(Debug, Clone, Default)]
pub struct LogConsole {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogConsole {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.lock();
        if entries.len() == CONSOLE_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Entries at or above `min_level` whose line contains `text`, ignoring case.
    #[must_use]
    pub fn filtered(&self, min_level: LogLevel, text: &str) -> Vec<LogEntry> {
        let needle = text.to_uppercase();
        self.lock()
            .iter()
            .filter(|e| e.level >= min_level && min_level != LogLevel::None)
            .filter(|e| needle.is_empty() || e.line().to_uppercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// A tracing layer that feeds this console.
    #[must_use]
    pub fn layer(&self) -> ConsoleLayer {
        ConsoleLayer {
            console: self.clone(),
        }
    }
}

pub struct ConsoleLayer {
    console: LogConsole,
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: String,
    critical: bool,
}

impl Visit for EventVisitor {
    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "critical" {
            self.critical = value;
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        self.console.push(LogEntry {
            timestamp: Local::now(),
            level: LogLevel::from_event(*metadata.level(), visitor.critical),
            target: metadata.target().to_string(),
            message: visitor.message + &visitor.fields,
        });
    }
}

/// Runtime control over the active level filter.
#[derive(Clone)]
pub struct LogControl {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
}

impl LogControl {
    /// A control that is not attached to any subscriber.
    #[must_use]
    pub const fn detached() -> Self {
        Self { handle: None }
    }

    pub fn set_level(&self, level: LogLevel) -> Result<()> {
        if let Some(handle) = &self.handle {
            handle.reload(EnvFilter::new(level.directive()))?;
        }
        tracing::info!("Log level set to {level}");
        Ok(())
    }
}

pub struct Logging {
    pub guard: WorkerGuard,
    pub console: LogConsole,
    pub control: LogControl,
}

fn log_directory() -> PathBuf {
    dirs::data_local_dir().map_or_else(
        || PathBuf::from("logs"),
        |path| path.join("partsbin").join("logs"),
    )
}

/// Install the global subscriber. `RUST_LOG` overrides `level` when set.
pub fn initialize_logging(level: LogLevel) -> Result<Logging> {
    let directory = log_directory();
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "partsbin.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level.directive())
    };
    let (filter, handle) = reload::Layer::new(filter);
    let console = LogConsole::new();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(console.layer())
        .init();

    Ok(Logging {
        guard,
        console,
        control: LogControl {
            handle: Some(handle),
        },
    })
}
