use std::{
    ffi::OsStr,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use gymminder_domain::{self as domain, StorageError};
use log::debug;

use crate::{FileSystemError, Storage, model};

impl Storage {
    fn artifact_path(&self, file_name: &str) -> Result<PathBuf, StorageError> {
        if file_name.is_empty() || Path::new(file_name).file_name() != Some(OsStr::new(file_name)) {
            return Err(StorageError::Other(Box::new(
                FileSystemError::InvalidFileName(file_name.to_string()),
            )));
        }
        Ok(self.routines_dir().join(file_name))
    }
}

fn write_routine(path: &Path, routine: &domain::Routine) -> Result<(), StorageError> {
    let content = serde_json::to_string_pretty(&model::Routine::from(routine))
        .map_err(|err| StorageError::Other(Box::new(err)))?;
    fs::write(path, content)?;
    debug!("wrote {}", path.display());
    Ok(())
}

impl domain::ArtifactRepository for Storage {
    async fn write_artifact(
        &self,
        file_name: &str,
        routine: &domain::Routine,
    ) -> Result<(), domain::CreateError> {
        let path = self.artifact_path(file_name)?;
        fs::create_dir_all(self.routines_dir()).map_err(StorageError::from)?;
        Ok(write_routine(&path, routine)?)
    }

    async fn read_artifact(&self, file_name: &str) -> Result<domain::Routine, domain::ReadError> {
        let path = self.artifact_path(file_name)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(domain::ReadError::NotFound);
            }
            Err(err) => return Err(StorageError::from(err).into()),
        };
        let routine: model::Routine = serde_json::from_str(&content)
            .map_err(|err| StorageError::Corrupt(format!("{file_name}: {err}")))?;
        Ok(domain::Routine::try_from(routine)
            .map_err(|err| StorageError::Corrupt(format!("{file_name}: {err}")))?)
    }

    async fn delete_artifact(&self, file_name: &str) -> Result<bool, domain::DeleteError> {
        let path = self.artifact_path(file_name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("removed {}", path.display());
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StorageError::from(err).into()),
        }
    }

    async fn list_artifacts(&self) -> Result<Vec<String>, domain::ReadError> {
        let entries = match fs::read_dir(self.routines_dir()) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(err) => return Err(StorageError::from(err).into()),
        };
        let mut file_names = vec![];
        for entry in entries {
            let entry = entry.map_err(StorageError::from)?;
            if !entry.file_type().map_err(StorageError::from)?.is_file() {
                continue;
            }
            if let Some(file_name) = entry.file_name().to_str() {
                if file_name.starts_with("routine_") && file_name.ends_with(".json") {
                    file_names.push(file_name.to_string());
                }
            }
        }
        file_names.sort();
        Ok(file_names)
    }

    async fn export_artifact(
        &self,
        path: &Path,
        routine: &domain::Routine,
    ) -> Result<(), domain::CreateError> {
        Ok(write_routine(path, routine)?)
    }
}
