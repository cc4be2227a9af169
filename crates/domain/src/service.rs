use std::{collections::BTreeSet, path::PathBuf};

use futures_util::lock::Mutex;
use log::{debug, error, info, warn};

use crate::{
    ArtifactRepository, CreateError, DEFAULT_DATE_FORMAT, DeleteError, ExportDialog, ExportError,
    HistoryEntry, HistoryIndex, HistoryRepository, RandomSource, ReadError, Routine, RoutineID,
    RoutineRequest,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub date_format: String,
    /// Delete the artifact files of history entries evicted by the capacity bound.
    pub delete_evicted_artifacts: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            delete_evicted_artifacts: true,
        }
    }
}

pub struct Service<R> {
    repository: R,
    history: HistoryIndex<R>,
    options: Options,
    mutations: Mutex<()>,
}

macro_rules! log_on_error {
    ($func: expr, $action: literal, $entity: literal $(, $expected: pat)?) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            $(Err(ref err @ $expected) => {
                debug!("failed to {} {}: {err}", $action, $entity);
            })?
            Err(ref err) => {
                error!("failed to {} {}: {err}", $action, $entity);
            }
        }
        result
    }};
}

impl<R> Service<R>
where
    R: HistoryRepository + ArtifactRepository + Clone,
{
    pub fn new(repository: R, options: Options) -> Self {
        Self {
            history: HistoryIndex::new(repository.clone()),
            repository,
            options,
            mutations: Mutex::new(()),
        }
    }

    pub fn generate_routine(
        &self,
        request: &RoutineRequest,
        random: &mut impl RandomSource,
    ) -> Routine {
        let routine = Routine::generate(request, random, &self.options.date_format);
        debug!(
            "generated routine {} with {} exercises",
            routine.id,
            routine.exercises.len()
        );
        routine
    }

    pub async fn save_routine(&self, routine: &Routine) -> Result<HistoryEntry, CreateError> {
        log_on_error!(self.store_routine(routine), "save", "routine")
    }

    pub async fn export_routine(
        &self,
        routine: &Routine,
        dialog: &impl ExportDialog,
    ) -> Result<PathBuf, ExportError> {
        log_on_error!(
            self.write_export(routine, dialog),
            "export",
            "routine",
            ExportError::Cancelled
        )
    }

    pub async fn delete_routine(&self, id: &RoutineID) -> Result<HistoryEntry, DeleteError> {
        log_on_error!(
            self.remove_routine(id),
            "delete",
            "routine",
            DeleteError::NotFound
        )
    }

    pub async fn load_history(&self) -> Result<Vec<HistoryEntry>, ReadError> {
        log_on_error!(self.history.load_all(), "load", "history")
    }

    /// Searches the history as of the last load or mutation.
    #[must_use]
    pub fn search_history(&self, term: &str) -> Vec<HistoryEntry> {
        self.history.search(term)
    }

    pub async fn view_routine(&self, id: &RoutineID) -> Result<Routine, ReadError> {
        log_on_error!(
            self.read_routine(id),
            "view",
            "routine",
            ReadError::NotFound
        )
    }

    /// Deletes artifact files that are not referenced by any history entry.
    pub async fn prune_orphans(&self) -> Result<Vec<String>, DeleteError> {
        log_on_error!(self.remove_orphans(), "prune", "routines")
    }

    async fn store_routine(&self, routine: &Routine) -> Result<HistoryEntry, CreateError> {
        let _guard = self.mutations.lock().await;
        let file_name = routine.artifact_file_name();
        self.repository.write_artifact(&file_name, routine).await?;

        let entry = HistoryEntry::new(routine, file_name);
        let evicted = match self.history.append(entry.clone()).await {
            Ok(evicted) => evicted,
            Err(err) => {
                if let Err(cleanup_err) = self.repository.delete_artifact(&entry.file_name).await {
                    warn!(
                        "failed to remove artifact {} of unsaved routine: {cleanup_err}",
                        entry.file_name
                    );
                }
                return Err(err);
            }
        };
        info!("saved routine {} as {}", entry.id, entry.file_name);

        if self.options.delete_evicted_artifacts {
            for evicted_entry in evicted {
                match self.repository.delete_artifact(&evicted_entry.file_name).await {
                    Ok(_) => debug!("removed evicted artifact {}", evicted_entry.file_name),
                    Err(err) => warn!(
                        "failed to remove evicted artifact {}: {err}",
                        evicted_entry.file_name
                    ),
                }
            }
        }

        Ok(entry)
    }

    async fn write_export(
        &self,
        routine: &Routine,
        dialog: &impl ExportDialog,
    ) -> Result<PathBuf, ExportError> {
        let path = dialog
            .choose_destination(&routine.export_file_name())
            .await
            .ok_or(ExportError::Cancelled)?;
        self.repository.export_artifact(&path, routine).await?;
        info!("exported routine {} to {}", routine.id, path.display());
        Ok(path)
    }

    async fn remove_routine(&self, id: &RoutineID) -> Result<HistoryEntry, DeleteError> {
        let _guard = self.mutations.lock().await;
        let entry = self.history.find_by_id(id).await?;
        if !self.repository.delete_artifact(&entry.file_name).await? {
            debug!("artifact {} was already gone", entry.file_name);
        }
        if !self.history.remove_by_id(id).await? {
            return Err(DeleteError::NotFound);
        }
        info!("deleted routine {id}");
        Ok(entry)
    }

    async fn read_routine(&self, id: &RoutineID) -> Result<Routine, ReadError> {
        let entry = self.history.find_by_id(id).await?;
        self.repository.read_artifact(&entry.file_name).await
    }

    async fn remove_orphans(&self) -> Result<Vec<String>, DeleteError> {
        let _guard = self.mutations.lock().await;
        let referenced = self
            .history
            .load_all()
            .await?
            .into_iter()
            .map(|e| e.file_name)
            .collect::<BTreeSet<_>>();
        let mut removed = vec![];
        for file_name in self.repository.list_artifacts().await? {
            if referenced.contains(&file_name) {
                continue;
            }
            match self.repository.delete_artifact(&file_name).await {
                Ok(true) => removed.push(file_name),
                Ok(false) => {}
                Err(err) => warn!("failed to remove orphaned artifact {file_name}: {err}"),
            }
        }
        if !removed.is_empty() {
            info!("removed {} orphaned artifacts", removed.len());
        }
        Ok(removed)
    }
}
