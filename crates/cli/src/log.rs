use std::{
    collections::VecDeque,
    io::Write,
    sync::{Arc, Mutex},
};

use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use serde::{Deserialize, Serialize};

const CAPACITY: usize = 100;

pub static LOG: Mutex<Option<Arc<Mutex<dyn Repository>>>> = Mutex::new(None);

static LOGGER: Logger = Logger;

static STDERR_LEVEL: Mutex<LevelFilter> = Mutex::new(LevelFilter::Warn);

pub trait Repository: Send + Sync + 'static {
    fn read_entries(&self) -> VecDeque<Entry>;
    fn write_entry(&mut self, entry: Entry);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub time: String,
    #[serde(with = "LevelDef")]
    pub level: Level,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "Level")]
enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Keeps the most recent log entries, newest first.
#[derive(Debug, Default)]
pub struct Memory {
    entries: VecDeque<Entry>,
}

impl Repository for Memory {
    fn read_entries(&self) -> VecDeque<Entry> {
        self.entries.clone()
    }

    fn write_entry(&mut self, entry: Entry) {
        self.entries.push_front(entry);
        self.entries.truncate(CAPACITY);
    }
}

/// Installs the logger. Records of all levels are kept in the repository, records up to
/// `stderr_level` are also written to stderr.
///
/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(
    repository: Arc<Mutex<dyn Repository>>,
    stderr_level: LevelFilter,
) -> anyhow::Result<()> {
    if let Ok(mut log) = LOG.lock() {
        *log = Some(repository);
    }
    if let Ok(mut level) = STDERR_LEVEL.lock() {
        *level = stderr_level;
    }
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(LevelFilter::Trace))
        .map_err(|err| anyhow::anyhow!("failed to initialize logger: {err}"))
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with("club38")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = Entry {
            time: Local::now().format("%b %d %H:%M:%S").to_string(),
            level: record.level(),
            message: record.args().to_string(),
        };

        if STDERR_LEVEL
            .lock()
            .is_ok_and(|level| record.level() <= *level)
        {
            let _ = writeln!(
                std::io::stderr(),
                "{} {:<5} {}",
                entry.time,
                entry.level,
                entry.message
            );
        }

        if let Ok(log) = LOG.lock() {
            if let Some(repository) = log.as_ref() {
                if let Ok(mut repository) = repository.lock() {
                    repository.write_entry(entry);
                }
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
