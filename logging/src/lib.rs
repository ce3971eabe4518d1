#[cfg(feature = "color")]
use colored::*;
use log::{Level, Log, Metadata, Record, SetLoggerError, warn};
use serde::de::Error as SerdeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};
use tokio::sync::RwLock;
use tokio::sync::broadcast::{Receiver, Sender};

const TIMESTAMP_FORMAT_LOCAL: &[FormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");
const TIMESTAMP_FORMAT_UTC: &[FormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]Z");

/// Number of events kept for late subscribers, e.g. a log pane opened after startup.
const HISTORY_LEN: usize = 256;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TimestampFormat {
    Local,
    UTC,
    Relative,
    None,
}

/// Parses a level name the way config files spell them.
pub fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::Error),
        "warn" | "warning" => Some(Level::Warn),
        "info" => Some(Level::Info),
        "debug" => Some(Level::Debug),
        "trace" => Some(Level::Trace),
        _ => None,
    }
}

pub struct PagerLogger {
    use_colors: bool,
    show_target: bool,
    level: Level,
    timestamp_format: TimestampFormat,
    target_levels: Vec<(String, Level)>,
    start_instant: Instant,
    printed_offset_warning: AtomicBool,
    history: Arc<RwLock<VecDeque<LogEvent>>>,
    channel: Sender<LogEvent>,
}

pub struct PagerLoggerBuilder {
    use_colors: bool,
    show_target: bool,
    level: Level,
    timestamp_format: TimestampFormat,
    target_levels: Vec<(String, Level)>,
}

impl Default for PagerLoggerBuilder {
    fn default() -> Self {
        Self {
            use_colors: cfg!(feature = "color"),
            show_target: true,
            level: Level::Info,
            timestamp_format: TimestampFormat::Local,
            target_levels: vec![],
        }
    }
}

impl PagerLoggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn use_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }
    pub fn show_target(mut self, show_target: bool) -> Self {
        self.show_target = show_target;
        self
    }
    pub fn timestamp_format(mut self, timestamp_format: TimestampFormat) -> Self {
        self.timestamp_format = timestamp_format;
        self
    }
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
    /// Overrides the level for every target starting with `target`,
    /// e.g. `reqwest` or `txpage_clients::rpc`.
    pub fn with_target_level(mut self, target: &str, level: Level) -> Self {
        self.target_levels.push((target.to_string(), level));
        self
    }
    pub fn build(mut self) -> PagerLogger {
        // longest prefix first so the most specific override wins
        self.target_levels
            .sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(&b.0)));
        PagerLogger {
            use_colors: self.use_colors,
            show_target: self.show_target,
            level: self.level,
            timestamp_format: self.timestamp_format,
            target_levels: self.target_levels,
            start_instant: Instant::now(),
            printed_offset_warning: AtomicBool::new(false),
            history: Arc::new(RwLock::new(VecDeque::with_capacity(HISTORY_LEN))),
            channel: Sender::new(1024),
        }
    }
    pub fn init(self) -> Result<Arc<PagerLogger>, SetLoggerError> {
        self.build().init()
    }
}

impl PagerLogger {
    pub fn builder() -> PagerLoggerBuilder {
        PagerLoggerBuilder::new()
    }
    pub fn init(self) -> Result<Arc<Self>, SetLoggerError> {
        let max_level = self
            .target_levels
            .iter()
            .map(|(_, l)| *l)
            .chain(std::iter::once(self.level))
            .max()
            .unwrap_or(self.level);
        let logger = Arc::new(self);
        // SAFETY: the clone handed to `Arc::into_raw` is never reclaimed, so the
        // allocation outlives the program and the reference is effectively 'static.
        let static_logger: &'static Self = unsafe { &*Arc::into_raw(logger.clone()) };
        log::set_logger(static_logger).map(|_| {
            log::set_max_level(max_level.to_level_filter());
            logger
        })
    }
    pub fn subscribe(&self) -> Receiver<LogEvent> {
        self.channel.subscribe()
    }
    /// Events already logged, oldest first.
    pub async fn history(&self) -> Vec<LogEvent> {
        self.history.read().await.iter().cloned().collect()
    }
    fn level_for(&self, target: &str) -> Level {
        self.target_levels
            .iter()
            .find(|(prefix, _)| target.starts_with(prefix.as_str()))
            .map(|(_, l)| *l)
            .unwrap_or(self.level)
    }
    fn now(&self) -> OffsetDateTime {
        match self.timestamp_format {
            TimestampFormat::Local => OffsetDateTime::now_local().unwrap_or_else(|_| {
                if !self.printed_offset_warning.swap(true, Ordering::SeqCst) {
                    warn!("Failed to detect local offset, defaulting to UTC");
                }
                OffsetDateTime::now_utc()
            }),
            _ => OffsetDateTime::now_utc(),
        }
    }
    fn format_timestamp(&self, timestamp: &OffsetDateTime) -> String {
        match self.timestamp_format {
            TimestampFormat::Local => timestamp.format(&TIMESTAMP_FORMAT_LOCAL).unwrap_or_default(),
            TimestampFormat::UTC => timestamp.format(&TIMESTAMP_FORMAT_UTC).unwrap_or_default(),
            TimestampFormat::Relative => {
                let elapsed = Instant::now().duration_since(self.start_instant);
                let secs = elapsed.as_secs();
                format!(
                    "{:02}:{:02}:{:02}.{:03}",
                    secs / 3600,
                    (secs % 3600) / 60,
                    secs % 60,
                    elapsed.subsec_millis()
                )
            }
            TimestampFormat::None => String::new(),
        }
    }
    fn level_prefix(&self, level: Level) -> String {
        let label = format!("{:<5}", level.to_string());
        #[cfg(feature = "color")]
        if self.use_colors {
            return match level {
                Level::Error => label.red().to_string(),
                Level::Warn => label.yellow().to_string(),
                Level::Info => label.cyan().to_string(),
                Level::Debug => label.purple().to_string(),
                Level::Trace => label.magenta().to_string(),
            };
        }
        label
    }
}

fn serialize_level<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&level.to_string().to_lowercase())
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_level(&s).ok_or_else(|| D::Error::custom(format!("Unknown log level: {s}")))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    #[serde(
        serialize_with = "serialize_level",
        deserialize_with = "deserialize_level"
    )]
    pub level: Level,
    pub target: String,
    pub message: String,
    pub timestamp: OffsetDateTime,
}

impl Log for PagerLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let event = LogEvent {
            level: record.level(),
            target: if record.target().is_empty() {
                record.module_path().unwrap_or_default()
            } else {
                record.target()
            }
            .to_string(),
            message: record.args().to_string(),
            timestamp: self.now(),
        };
        let timestamp = self.format_timestamp(&event.timestamp);
        let target = if self.show_target {
            format!("[{}] ", event.target)
        } else {
            String::new()
        };
        // stdout is left to the program's own output
        eprintln!(
            "{} {} {}{}",
            timestamp,
            self.level_prefix(event.level),
            target,
            event.message
        );
        if let Ok(mut history) = self.history.try_write() {
            if history.len() == HISTORY_LEN {
                history.pop_front();
            }
            history.push_back(event.clone());
        }
        let _ = self.channel.send(event);
    }

    fn flush(&self) {}
}
