use std::cell::RefCell;

use futures_util::lock::Mutex;
use log::debug;

use crate::{CreateError, DeleteError, Property, ReadError, Routine, RoutineID, SplitType, UpdateError};

pub const HISTORY_CAPACITY: usize = 100;

#[allow(async_fn_in_trait)]
pub trait HistoryRepository {
    async fn read_history(&self) -> Result<Vec<HistoryEntry>, ReadError>;
    async fn write_history(&self, entries: &[HistoryEntry]) -> Result<(), UpdateError>;
}

/// Summary of a saved routine referencing its artifact file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: RoutineID,
    pub date: String,
    pub split_type: SplitType,
    pub exercise_count: u32,
    pub estimated_minutes: u32,
    pub file_name: String,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(routine: &Routine, file_name: String) -> Self {
        Self {
            id: routine.id.clone(),
            date: routine.date.clone(),
            split_type: routine.split_type,
            exercise_count: u32::try_from(routine.exercises.len()).unwrap_or(u32::MAX),
            estimated_minutes: routine.estimated_minutes,
            file_name,
        }
    }

    /// Case-insensitive substring match against the date or the split type name.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.date.to_lowercase().contains(&term)
            || self.split_type.name().to_lowercase().contains(&term)
    }
}

/// Newest-first, capacity-bounded sequence of history entries.
///
/// Every read-modify-persist cycle holds `mutations`, so concurrent callers cannot lose each
/// other's updates. `entries` mirrors the last sequence read from or written to the repository.
pub struct HistoryIndex<R> {
    repository: R,
    capacity: usize,
    entries: RefCell<Vec<HistoryEntry>>,
    mutations: Mutex<()>,
}

impl<R: HistoryRepository> HistoryIndex<R> {
    pub fn new(repository: R) -> Self {
        Self::with_capacity(repository, HISTORY_CAPACITY)
    }

    pub fn with_capacity(repository: R, capacity: usize) -> Self {
        Self {
            repository,
            capacity,
            entries: RefCell::new(vec![]),
            mutations: Mutex::new(()),
        }
    }

    pub async fn load_all(&self) -> Result<Vec<HistoryEntry>, ReadError> {
        let entries = self.repository.read_history().await?;
        self.entries.replace(entries.clone());
        Ok(entries)
    }

    /// Inserts the entry at the front and returns the entries evicted by the capacity bound.
    pub async fn append(&self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>, CreateError> {
        let _guard = self.mutations.lock().await;
        let mut entries = self.repository.read_history().await?;
        entries.insert(0, entry);
        let evicted = if entries.len() > self.capacity {
            entries.split_off(self.capacity)
        } else {
            vec![]
        };
        self.repository.write_history(&entries).await?;
        if !evicted.is_empty() {
            debug!("evicted {} history entries", evicted.len());
        }
        self.entries.replace(entries);
        Ok(evicted)
    }

    pub async fn find_by_id(&self, id: &RoutineID) -> Result<HistoryEntry, ReadError> {
        self.load_all()
            .await?
            .into_iter()
            .find(|e| e.id == *id)
            .ok_or(ReadError::NotFound)
    }

    /// Returns `false` if no entry has the given ID.
    pub async fn remove_by_id(&self, id: &RoutineID) -> Result<bool, DeleteError> {
        let _guard = self.mutations.lock().await;
        let mut entries = self.repository.read_history().await?;
        let Some(position) = entries.iter().position(|e| e.id == *id) else {
            self.entries.replace(entries);
            return Ok(false);
        };
        entries.remove(position);
        self.repository.write_history(&entries).await?;
        self.entries.replace(entries);
        Ok(true)
    }

    /// Filters the in-memory sequence without reading the repository.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<HistoryEntry> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.matches(term))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.borrow().clone()
    }
}
