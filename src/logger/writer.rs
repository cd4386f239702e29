//! Log writer module
//!
//! Provides thread-safe, level-filtered log writing to files or stdout/stderr.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log severity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    /// Parse a configured level name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" | "trace" => Some(Self::Debug),
            _ => None,
        }
    }

    const fn tag(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

/// Thread-safe log writer
pub struct LogWriter {
    /// Most verbose level that is written
    level: Level,
    /// Access and info log target
    access: LogTarget,
    /// Warning and error log target
    error: LogTarget,
}

impl LogWriter {
    fn new(
        level: Level,
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
    ) -> io::Result<Self> {
        let access = match access_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stderr,
        };

        Ok(Self {
            level,
            access,
            error,
        })
    }

    /// Write a leveled message; dropped when above the configured level
    pub fn write(&self, level: Level, message: &str) {
        if level > self.level {
            return;
        }
        let line = format_line(level, message);
        match level {
            Level::Error | Level::Warn => write_to_target(&self.error, &line),
            Level::Info | Level::Debug => write_to_target(&self.access, &line),
        }
    }

    /// Write an access log line verbatim
    pub fn write_access(&self, message: &str) {
        write_to_target(&self.access, message);
    }
}

fn format_line(level: Level, message: &str) -> String {
    format!(
        "{} [{}] {message}",
        Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"),
        level.tag()
    )
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn write_to_target(target: &LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => println!("{message}"),
        LogTarget::Stderr => eprintln!("{message}"),
        LogTarget::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// Initialize the global log writer
///
/// Should be called once at application startup. Unknown level names are
/// rejected so a typo in the config does not silently mute logging.
pub fn init(
    level: &str,
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
) -> io::Result<()> {
    let level = Level::parse(level).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Unknown log level '{level}'"),
        )
    })?;
    let writer = LogWriter::new(level, access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Write through the global writer, falling back to stdout/stderr at info
/// level before `init()` has run (unit tests, early startup errors)
pub fn write(level: Level, message: &str) {
    match LOG_WRITER.get() {
        Some(writer) => writer.write(level, message),
        None if level <= Level::Info => {
            let line = format_line(level, message);
            if level <= Level::Warn {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        }
        None => {}
    }
}

/// Write an access line through the global writer
pub fn write_access(message: &str) {
    match LOG_WRITER.get() {
        Some(writer) => writer.write_access(message),
        None => println!("{message}"),
    }
}
