//! Log writer module
//!
//! Thread-safe log writing to files or stdout/stderr. Configured file
//! targets can be reopened at runtime for log rotation (SIGHUP).

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Write to stderr
    Stderr,
    /// Write to file
    File(File),
}

/// Thread-safe log writer
struct LogWriter {
    /// Access/info log target
    access: Mutex<LogTarget>,
    /// Error log target
    error: Mutex<LogTarget>,
    /// Configured file paths, kept so rotation can reopen them
    access_path: Option<String>,
    error_path: Option<String>,
}

impl LogWriter {
    fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        let access = match access_log_file {
            Some(path) => LogTarget::File(open_log_file(path)?),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(open_log_file(path)?),
            None => LogTarget::Stderr,
        };

        Ok(Self {
            access: Mutex::new(access),
            error: Mutex::new(error),
            access_path: access_log_file.map(ToString::to_string),
            error_path: error_log_file.map(ToString::to_string),
        })
    }

    /// Re-open configured log files; streams without a file keep their
    /// stdout/stderr target.
    fn reopen(&self) -> io::Result<()> {
        if let Some(path) = &self.access_path {
            let file = open_log_file(path)?;
            if let Ok(mut target) = self.access.lock() {
                *target = LogTarget::File(file);
            }
        }
        if let Some(path) = &self.error_path {
            let file = open_log_file(path)?;
            if let Ok(mut target) = self.error.lock() {
                *target = LogTarget::File(file);
            }
        }
        Ok(())
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Write message to log target
fn write_to_target(target: &Mutex<LogTarget>, message: &str) {
    // A poisoned lock only loses this one line
    let Ok(mut target) = target.lock() else {
        return;
    };
    match &mut *target {
        LogTarget::Stdout => println!("{message}"),
        LogTarget::Stderr => eprintln!("{message}"),
        LogTarget::File(f) => {
            let _ = writeln!(f, "{message}");
        }
    }
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
/// Returns an error if log files cannot be opened.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Write to the access log (stdout before `init`)
pub fn access(message: &str) {
    match LOG_WRITER.get() {
        Some(writer) => write_to_target(&writer.access, message),
        None => println!("{message}"),
    }
}

/// Write an info message (shares the access target)
pub fn info(message: &str) {
    access(message);
}

/// Write to the error log (stderr before `init`)
pub fn error(message: &str) {
    match LOG_WRITER.get() {
        Some(writer) => write_to_target(&writer.error, message),
        None => eprintln!("{message}"),
    }
}

/// Re-open configured log files for rotation
///
/// A no-op before `init`.
pub fn reopen() -> io::Result<()> {
    match LOG_WRITER.get() {
        Some(writer) => writer.reopen(),
        None => Ok(()),
    }
}
