use std::{cell::Cell, collections::VecDeque};

use chrono::Local;
use gymminder_domain::StorageError;
use gymminder_storage::{Storage, local_storage::KEY_LOG};
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};

/// Number of persisted log entries.
pub const CAPACITY: usize = 100;

pub trait Repository: Send + Sync + 'static {
    fn read_entries(&self) -> Result<VecDeque<Entry>, StorageError>;
    fn write_entry(&self, entry: Entry) -> Result<(), StorageError>;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub time: String,
    pub level: Level,
    pub message: String,
}

thread_local! {
    static PERSISTING: Cell<bool> = const { Cell::new(false) };
}

/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(repository: impl Repository, level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(Logger::new(repository, level)))
        .map(|()| log::set_max_level(level))
}

struct Logger<R> {
    repository: R,
    level: LevelFilter,
}

impl<R: Repository> Logger<R> {
    fn new(repository: R, level: LevelFilter) -> Self {
        Self { repository, level }
    }

    fn persist(&self, record: &Record) {
        // Writing an entry goes through the storage, which logs itself.
        if PERSISTING.with(Cell::get) {
            return;
        }
        PERSISTING.with(|p| p.set(true));
        if let Err(err) = self.repository.write_entry(Entry {
            time: Local::now().format("%b %d %H:%M:%S").to_string(),
            level: record.level(),
            message: record.args().to_string(),
        }) {
            eprintln!("failed to persist log entry: {err}");
        }
        PERSISTING.with(|p| p.set(false));
    }
}

impl<R: Repository> log::Log for Logger<R> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", record.level().as_str().to_lowercase(), record.args());
            self.persist(record);
        }
    }

    fn flush(&self) {}
}

impl Repository for Storage {
    fn read_entries(&self) -> Result<VecDeque<Entry>, StorageError> {
        self.get_or_default(KEY_LOG)
    }

    fn write_entry(&self, entry: Entry) -> Result<(), StorageError> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(CAPACITY);
        self.set(KEY_LOG, &entries)
    }
}
