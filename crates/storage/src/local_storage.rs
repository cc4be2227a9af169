//! Key-value store persisted as a single JSON object.

use std::{fs, io::ErrorKind};

use gymminder_domain::{self as domain, StorageError};
use log::debug;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{Storage, model};

pub const CONFIG_FILE: &str = "config.json";

pub const KEY_ROUTINE_HISTORY: &str = "routineHistory";
pub const KEY_SETTINGS: &str = "settings";
pub const KEY_LOG: &str = "log";

impl Storage {
    /// Returns `None` if the key is absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.read_object()?.remove(key) {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|err| StorageError::Corrupt(format!("{key}: {err}"))),
            None => Ok(None),
        }
    }

    pub fn get_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> Result<T, StorageError> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let value =
            serde_json::to_value(value).map_err(|err| StorageError::Other(Box::new(err)))?;
        let mut object = self.read_object()?;
        object.insert(key.to_string(), value);
        self.write_object(&object)
    }

    pub fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut object = self.read_object()?;
        if object.remove(key).is_none() {
            return Ok(false);
        }
        self.write_object(&object)?;
        Ok(true)
    }

    fn read_object(&self) -> Result<Map<String, Value>, StorageError> {
        let content = match fs::read_to_string(self.config_path()) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&content).map_err(|err| {
            StorageError::Corrupt(format!("{}: {err}", self.config_path().display()))
        })
    }

    fn write_object(&self, object: &Map<String, Value>) -> Result<(), StorageError> {
        fs::create_dir_all(self.root())?;
        let content = serde_json::to_string_pretty(object)
            .map_err(|err| StorageError::Other(Box::new(err)))?;
        let path = self.config_path();
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &path)?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

impl domain::HistoryRepository for Storage {
    async fn read_history(&self) -> Result<Vec<domain::HistoryEntry>, domain::ReadError> {
        self.get_or_default::<Vec<model::HistoryEntry>>(KEY_ROUTINE_HISTORY)?
            .into_iter()
            .map(|entry| {
                domain::HistoryEntry::try_from(entry).map_err(|err| {
                    StorageError::Corrupt(format!("{KEY_ROUTINE_HISTORY}: {err}")).into()
                })
            })
            .collect()
    }

    async fn write_history(
        &self,
        entries: &[domain::HistoryEntry],
    ) -> Result<(), domain::UpdateError> {
        let entries = entries
            .iter()
            .map(model::HistoryEntry::from)
            .collect::<Vec<_>>();
        Ok(self.set(KEY_ROUTINE_HISTORY, &entries)?)
    }
}

#[cfg(test)]
mod tests {
    use gymminder_domain::HistoryRepository;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::tests::data::{HISTORY_ENTRY, HISTORY_ENTRY_2};

    fn storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("gymminder"));
        (dir, storage)
    }

    #[test]
    fn test_get_missing_file() {
        let (_dir, storage) = storage();
        assert_eq!(storage.get::<u32>("answer").unwrap(), None);
        assert!(storage.get_or_default::<Vec<u32>>("list").unwrap().is_empty());
    }

    #[test]
    fn test_set_get_remove() {
        let (_dir, storage) = storage();
        storage.set("answer", &42).unwrap();
        storage.set("list", &[1, 2, 3]).unwrap();

        assert_eq!(storage.get::<u32>("answer").unwrap(), Some(42));
        assert_eq!(storage.get::<Vec<u32>>("list").unwrap(), Some(vec![1, 2, 3]));

        assert!(storage.remove("answer").unwrap());
        assert!(!storage.remove("answer").unwrap());
        assert_eq!(storage.get::<u32>("answer").unwrap(), None);
        assert_eq!(storage.get::<Vec<u32>>("list").unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_set_keeps_other_keys() {
        let (_dir, storage) = storage();
        fs::create_dir_all(storage.root()).unwrap();
        fs::write(storage.config_path(), r#"{"windowBounds": {"width": 1400}}"#).unwrap();

        storage.set("answer", &42).unwrap();

        let content: Value =
            serde_json::from_str(&fs::read_to_string(storage.config_path()).unwrap()).unwrap();
        assert_eq!(
            content,
            json!({"windowBounds": {"width": 1400}, "answer": 42})
        );
    }

    #[test]
    fn test_get_corrupt_file() {
        let (_dir, storage) = storage();
        fs::create_dir_all(storage.root()).unwrap();
        fs::write(storage.config_path(), "{").unwrap();

        assert!(matches!(
            storage.get::<u32>("answer"),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn test_get_wrong_type() {
        let (_dir, storage) = storage();
        storage.set("answer", "forty-two").unwrap();

        assert!(matches!(
            storage.get::<u32>("answer"),
            Err(StorageError::Corrupt(msg)) if msg.starts_with("answer")
        ));
    }

    #[tokio::test]
    async fn test_history() {
        let (_dir, storage) = storage();
        assert!(storage.read_history().await.unwrap().is_empty());

        storage
            .write_history(&[HISTORY_ENTRY_2.clone(), HISTORY_ENTRY.clone()])
            .await
            .unwrap();

        assert_eq!(
            storage.read_history().await.unwrap(),
            vec![HISTORY_ENTRY_2.clone(), HISTORY_ENTRY.clone()]
        );
        assert_eq!(
            storage
                .get::<Vec<model::HistoryEntry>>(KEY_ROUTINE_HISTORY)
                .unwrap()
                .unwrap()[1],
            model::HistoryEntry::from(&*HISTORY_ENTRY)
        );
    }

    #[tokio::test]
    async fn test_history_invalid_entry() {
        let (_dir, storage) = storage();
        storage
            .set(
                KEY_ROUTINE_HISTORY,
                &json!([{
                    "id": "1",
                    "date": "2024. 3. 7.",
                    "splitType": "5분할",
                    "exerciseCount": 1,
                    "estimatedTime": 5,
                    "fileName": "routine_1.json"
                }]),
            )
            .unwrap();

        assert!(matches!(
            storage.read_history().await,
            Err(domain::ReadError::Storage(StorageError::Corrupt(_)))
        ));
    }
}
