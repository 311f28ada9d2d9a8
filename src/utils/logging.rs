use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

pub const LOG_FILTER_ENV: &str = "CSV_NAVIGATOR_LOG";
pub const LOG_MIRROR_ENV: &str = "CSV_NAVIGATOR_DEBUG";
const DEFAULT_FILTER: &str = "info";

/// Appends formatted log lines to a file, optionally echoing them to stderr
#[derive(Clone)]
pub struct FileLogWriter {
    file: Arc<Mutex<File>>,
    mirror_to_stderr: bool,
}

impl FileLogWriter {
    pub fn new(file: File, mirror_to_stderr: bool) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
            mirror_to_stderr,
        }
    }
}

impl Write for FileLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        {
            let mut file = self
                .file
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
            file.write_all(buf)?;
        }
        if self.mirror_to_stderr {
            io::stderr().write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Ok(mut file) = self.file.lock() {
            file.flush()?;
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for FileLogWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Timestamped log file name, e.g. `csv-navigator_20240131_154500.log`
pub fn log_file_name() -> String {
    format!("csv-navigator_{}.log", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Initialize tracing into a fresh log file under `log_dir`. Returns the
/// path of the file so the caller can announce it.
pub fn init_tracing(log_dir: &Path) -> Result<PathBuf> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_path = log_dir.join(log_file_name());
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let mirror = std::env::var_os(LOG_MIRROR_ENV).is_some();
    let writer = FileLogWriter::new(file, mirror);

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .compact();

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!("Logging initialized at {}", log_path.display());
    Ok(log_path)
}
