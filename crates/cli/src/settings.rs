use gymminder_domain::{DEFAULT_DATE_FORMAT, Options, StorageError};
use gymminder_storage::{Storage, local_storage::KEY_SETTINGS};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, StorageError>;
    async fn write_settings(&self, settings: &Settings) -> Result<(), StorageError>;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub date_format: String,
    pub auto_save: bool,
    pub delete_evicted_artifacts: bool,
    pub log_level: LevelFilter,
}

impl Settings {
    /// Updates the field named `key` from its textual representation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let invalid = || SettingsError::InvalidValue(key.to_string(), value.to_string());
        match key {
            "date_format" => {
                if value.trim().is_empty() {
                    return Err(invalid());
                }
                self.date_format = value.to_string();
            }
            "auto_save" => self.auto_save = value.parse().map_err(|_| invalid())?,
            "delete_evicted_artifacts" => {
                self.delete_evicted_artifacts = value.parse().map_err(|_| invalid())?;
            }
            "log_level" => self.log_level = value.parse().map_err(|_| invalid())?,
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    #[must_use]
    pub fn options(&self) -> Options {
        Options {
            date_format: self.date_format.clone(),
            delete_evicted_artifacts: self.delete_evicted_artifacts,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            auto_save: false,
            delete_evicted_artifacts: true,
            log_level: LevelFilter::Info,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unknown setting: {0}")]
    UnknownKey(String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
    #[error("expected key=value, got: {0}")]
    Malformed(String),
}

/// Splits an assignment of the form `key=value`.
pub fn parse_assignment(assignment: &str) -> Result<(&str, &str), SettingsError> {
    assignment
        .split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| SettingsError::Malformed(assignment.to_string()))
}

impl SettingsRepository for Storage {
    async fn read_settings(&self) -> Result<Settings, StorageError> {
        self.get_or_default(KEY_SETTINGS)
    }

    async fn write_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        self.set(KEY_SETTINGS, settings)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    #[case("date_format", "%Y-%m-%d", Settings { date_format: "%Y-%m-%d".into(), ..Settings::default() })]
    #[case("auto_save", "true", Settings { auto_save: true, ..Settings::default() })]
    #[case("delete_evicted_artifacts", "false", Settings { delete_evicted_artifacts: false, ..Settings::default() })]
    #[case("log_level", "debug", Settings { log_level: LevelFilter::Debug, ..Settings::default() })]
    fn test_settings_set(#[case] key: &str, #[case] value: &str, #[case] expected: Settings) {
        let mut settings = Settings::default();
        settings.set(key, value).unwrap();
        assert_eq!(settings, expected);
    }

    #[rstest]
    #[case("theme", "dark", SettingsError::UnknownKey("theme".into()))]
    #[case("auto_save", "yes", SettingsError::InvalidValue("auto_save".into(), "yes".into()))]
    #[case("log_level", "loud", SettingsError::InvalidValue("log_level".into(), "loud".into()))]
    #[case("date_format", " ", SettingsError::InvalidValue("date_format".into(), " ".into()))]
    fn test_settings_set_invalid(
        #[case] key: &str,
        #[case] value: &str,
        #[case] expected: SettingsError,
    ) {
        let mut settings = Settings::default();
        assert_eq!(settings.set(key, value), Err(expected));
        assert_eq!(settings, Settings::default());
    }

    #[rstest]
    #[case("auto_save=true", Ok(("auto_save", "true")))]
    #[case(" date_format = %d.%m.%Y ", Ok(("date_format", "%d.%m.%Y")))]
    #[case("auto_save", Err(SettingsError::Malformed("auto_save".into())))]
    #[case("=true", Err(SettingsError::Malformed("=true".into())))]
    fn test_parse_assignment(
        #[case] assignment: &str,
        #[case] expected: Result<(&str, &str), SettingsError>,
    ) {
        assert_eq!(parse_assignment(assignment), expected);
    }

    #[test]
    fn test_settings_options() {
        assert_eq!(Settings::default().options(), Options::default());
    }

    #[test]
    fn test_settings_partial_json() {
        let settings: Settings = serde_json::from_value(json!({ "auto_save": true })).unwrap();
        assert_eq!(
            settings,
            Settings {
                auto_save: true,
                ..Settings::default()
            }
        );
    }

    #[tokio::test]
    async fn test_settings_repository() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());

        assert_eq!(storage.read_settings().await.unwrap(), Settings::default());

        let settings = Settings {
            auto_save: true,
            log_level: LevelFilter::Warn,
            ..Settings::default()
        };
        storage.write_settings(&settings).await.unwrap();

        assert_eq!(storage.read_settings().await.unwrap(), settings);
    }
}
