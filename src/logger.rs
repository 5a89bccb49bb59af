//! Logging backends and the injected observer used by every component
//!
//! The process-wide backend (env_logger or JSON lines) is installed once by
//! the binary. Library code never reaches for it directly: components take an
//! `Arc<dyn Observer>` at construction and log through that.

use chrono::{Local, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::json;
use std::env;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Structured key/value pairs attached to an observer
pub type Fields = Vec<(&'static str, String)>;

/// Build one field from anything displayable
pub fn field(key: &'static str, value: impl fmt::Display) -> (&'static str, String) {
    (key, value.to_string())
}

/// Observability collaborator passed explicitly to components
pub trait Observer: fmt::Debug + Send + Sync {
    /// Emit one event at `level`
    fn log(&self, level: Level, message: &str);

    /// Derive an observer that attaches `fields` to every event
    fn with_fields(&self, fields: &[(&'static str, String)]) -> Arc<dyn Observer>;

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

fn merge(base: &Fields, extra: &[(&'static str, String)]) -> Fields {
    let mut merged = base.clone();
    for (key, value) in extra {
        match merged.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value.clone(),
            None => merged.push((key, value.clone())),
        }
    }
    merged
}

/// Forwards events to the `log` facade, rendering fields as `key=value`
#[derive(Debug, Clone)]
pub struct LogObserver {
    target: &'static str,
    fields: Fields,
}

impl LogObserver {
    pub fn new(target: &'static str) -> Self {
        LogObserver {
            target,
            fields: Vec::new(),
        }
    }

    /// Observer for the whole crate
    pub fn shared() -> Arc<dyn Observer> {
        Arc::new(LogObserver::new("fileproc"))
    }
}

impl Observer for LogObserver {
    fn log(&self, level: Level, message: &str) {
        if self.fields.is_empty() {
            log::log!(target: self.target, level, "{message}");
        } else {
            let rendered: Vec<String> = self
                .fields
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            log::log!(target: self.target, level, "{message} {}", rendered.join(" "));
        }
    }

    fn with_fields(&self, fields: &[(&'static str, String)]) -> Arc<dyn Observer> {
        Arc::new(LogObserver {
            target: self.target,
            fields: merge(&self.fields, fields),
        })
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn log(&self, _level: Level, _message: &str) {}

    fn with_fields(&self, _fields: &[(&'static str, String)]) -> Arc<dyn Observer> {
        Arc::new(NullObserver)
    }
}

/// One event captured by [`MemoryObserver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub level: Level,
    pub message: String,
    pub fields: Fields,
}

impl Event {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Records events in memory; derived observers share the same sink
#[derive(Debug, Clone, Default)]
pub struct MemoryObserver {
    sink: Arc<Mutex<Vec<Event>>>,
    fields: Fields,
}

impl MemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.sink
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }
}

impl Observer for MemoryObserver {
    fn log(&self, level: Level, message: &str) {
        let event = Event {
            level,
            message: message.to_string(),
            fields: self.fields.clone(),
        };
        match self.sink.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }

    fn with_fields(&self, fields: &[(&'static str, String)]) -> Arc<dyn Observer> {
        Arc::new(MemoryObserver {
            sink: Arc::clone(&self.sink),
            fields: merge(&self.fields, fields),
        })
    }
}

/// File that receives JSON lines; stderr when unset
pub const LOG_PATH_ENV: &str = "FILEPROC_LOG_PATH";

/// How the process-wide backend renders records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    JsonLines,
}

/// A parsed level setting: `debug`, `json` or `json:debug`.
/// Unknown levels fall back to info.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSpec {
    pub format: LogFormat,
    pub filter: LevelFilter,
}

impl LogSpec {
    pub fn parse(spec: &str) -> LogSpec {
        let spec = spec.trim().to_ascii_lowercase();
        let (format, level) = match spec.strip_prefix("json") {
            Some("") => (LogFormat::JsonLines, "info"),
            Some(rest) => match rest.strip_prefix(':') {
                Some(level) => (LogFormat::JsonLines, level),
                None => (LogFormat::Human, spec.as_str()),
            },
            None => (LogFormat::Human, spec.as_str()),
        };
        LogSpec {
            format,
            filter: level.parse().unwrap_or(LevelFilter::Info),
        }
    }

    /// Install the process-wide backend. Only the first call takes effect.
    pub fn install(&self) {
        let installed = match self.format {
            LogFormat::Human => env_logger::Builder::new()
                .filter_level(self.filter)
                .format(|buf, record| {
                    writeln!(
                        buf,
                        "[{} {:<5} {}] {}",
                        Local::now().format("%Y-%m-%dT%H:%M:%S"),
                        record.level(),
                        record.target(),
                        record.args()
                    )
                })
                .try_init()
                .map_err(|e| e.to_string()),
            LogFormat::JsonLines => {
                log::set_boxed_logger(Box::new(JsonLinesLogger::from_env(self.filter)))
                    .map(|()| log::set_max_level(self.filter))
                    .map_err(|e| e.to_string())
            }
        };
        if let Err(e) = installed {
            eprintln!("Failed to initialize logger: {e}");
        }
    }
}

/// `log` backend writing one JSON object per record
pub struct JsonLinesLogger {
    filter: LevelFilter,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl fmt::Debug for JsonLinesLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonLinesLogger")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl JsonLinesLogger {
    pub fn new(filter: LevelFilter, sink: Box<dyn Write + Send>) -> Self {
        JsonLinesLogger {
            filter,
            sink: Mutex::new(sink),
        }
    }

    /// Append to the file named by [`LOG_PATH_ENV`], or write to stderr
    pub fn from_env(filter: LevelFilter) -> Self {
        let file = env::var(LOG_PATH_ENV)
            .ok()
            .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok());
        match file {
            Some(file) => Self::new(filter, Box::new(file)),
            None => Self::new(filter, Box::new(io::stderr())),
        }
    }

    fn entry(record: &Record<'_>) -> serde_json::Value {
        json!({
            "@timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            "@level": record.level().as_str().to_ascii_lowercase(),
            "@target": record.target(),
            "@message": record.args().to_string(),
            "@pid": std::process::id(),
        })
    }
}

impl Log for JsonLinesLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut line = Self::entry(record).to_string();
        line.push('\n');

        let mut sink = match self.sink.lock() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = sink.write_all(line.as_bytes());
        let _ = sink.flush();
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_observer_fields_are_merged() {
        let observer = MemoryObserver::new();
        let scoped = observer.with_fields(&[field("step", 1), field("operation", "compress")]);
        let nested = scoped.with_fields(&[field("step", 2)]);

        observer.info("plain");
        nested.error("failed");

        let events = observer.events();
        assert_eq!(events.len(), 2);
        assert!(events[0].fields.is_empty());
        assert_eq!(events[1].level, Level::Error);
        assert_eq!(events[1].field("step"), Some("2"));
        assert_eq!(events[1].field("operation"), Some("compress"));
    }

    #[test]
    fn test_null_observer_is_silent() {
        let observer = NullObserver;
        observer.info("ignored");
        observer.with_fields(&[field("k", "v")]).warn("ignored");
    }

    /// Clonable in-memory sink
    #[derive(Debug, Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_log_spec_parsing() {
        assert_eq!(
            LogSpec::parse("debug"),
            LogSpec {
                format: LogFormat::Human,
                filter: LevelFilter::Debug
            }
        );
        assert_eq!(
            LogSpec::parse("json"),
            LogSpec {
                format: LogFormat::JsonLines,
                filter: LevelFilter::Info
            }
        );
        assert_eq!(LogSpec::parse("JSON:trace").filter, LevelFilter::Trace);
        assert_eq!(LogSpec::parse("off").filter, LevelFilter::Off);
        assert_eq!(LogSpec::parse("loud").filter, LevelFilter::Info);
    }

    #[test]
    fn test_json_lines_logger_filters_and_renders() {
        let buffer = SharedBuffer::default();
        let logger = JsonLinesLogger::new(LevelFilter::Info, Box::new(buffer.clone()));

        logger.log(
            &Record::builder()
                .args(format_args!("hello"))
                .level(Level::Info)
                .target("fileproc")
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("too chatty"))
                .level(Level::Debug)
                .target("fileproc")
                .build(),
        );
        logger.flush();

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 1);
        let entry: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(entry["@message"], "hello");
        assert_eq!(entry["@level"], "info");
        assert_eq!(entry["@target"], "fileproc");
    }
}
