//! File-backed preferences: user settings, widget configurations and the
//! update status log in one JSON document.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockwidget_core::errors::{Error, Result};
use stockwidget_core::settings::{clamp_refresh_interval, Settings, SettingsStore};
use stockwidget_core::status::{StatusLog, UpdateStatus};
use stockwidget_core::widgets::{WidgetConfig, WidgetKey};
use tracing::{debug, info};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrefsDocument {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    status: UpdateStatus,
}

/// Preferences persisted to a single JSON file.
///
/// Every mutation rewrites the file through a temporary sibling and a rename.
/// The in-memory copy only changes once the write succeeded.
pub struct PrefsStore {
    path: PathBuf,
    doc: RwLock<PrefsDocument>,
}

impl PrefsStore {
    /// Opens the document at `path`. A missing file starts from defaults.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                Error::Settings(format!("Corrupted preferences at {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No preferences at {}, using defaults", path.display());
                PrefsDocument::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            doc: RwLock::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> Result<Settings> {
        Ok(self.read()?.settings.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, PrefsDocument>> {
        self.doc
            .read()
            .map_err(|e| Error::Settings(format!("preferences lock poisoned: {}", e)))
    }

    /// Applies `f` to a copy of the document, persists it, then commits.
    fn update<R>(&self, f: impl FnOnce(&mut PrefsDocument) -> R) -> Result<R> {
        let mut doc = self
            .doc
            .write()
            .map_err(|e| Error::Settings(format!("preferences lock poisoned: {}", e)))?;

        let mut next = doc.clone();
        let result = f(&mut next);
        if next != *doc {
            write_atomic(&self.path, &serde_json::to_string_pretty(&next)?)?;
            *doc = next;
        }
        Ok(result)
    }
}

fn write_atomic(path: &Path, payload: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let temp = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&temp)?;
        file.write_all(payload.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&temp, path)?;
    debug!("Wrote preferences to {}", path.display());
    Ok(())
}

impl SettingsStore for PrefsStore {
    fn credential(&self) -> Result<String> {
        Ok(self.read()?.settings.credential.clone())
    }

    fn refresh_interval_minutes(&self) -> Result<u32> {
        Ok(clamp_refresh_interval(
            self.read()?.settings.refresh_interval_minutes,
        ))
    }

    fn widgets(&self) -> Result<Vec<WidgetConfig>> {
        Ok(self.read()?.settings.widgets.clone())
    }

    fn upsert_widget(&self, config: WidgetConfig) -> Result<()> {
        self.update(|doc| doc.settings.upsert_widget(config))
    }

    fn remove_widget(&self, key: WidgetKey) -> Result<bool> {
        self.update(|doc| doc.settings.remove_widget(key))
    }

    fn retain_widgets(&self, installed: &[WidgetKey]) -> Result<usize> {
        self.update(|doc| doc.settings.retain_widgets(installed))
    }

    fn set_credential(&self, credential: &str) -> Result<()> {
        let credential = credential.trim().to_string();
        self.update(|doc| doc.settings.credential = credential)
    }

    fn set_refresh_interval_minutes(&self, minutes: u32) -> Result<u32> {
        let minutes = clamp_refresh_interval(minutes);
        self.update(|doc| doc.settings.refresh_interval_minutes = minutes)?;
        Ok(minutes)
    }
}

impl StatusLog for PrefsStore {
    fn status(&self) -> Result<UpdateStatus> {
        Ok(self.read()?.status)
    }

    fn record_attempt(&self, at: DateTime<Utc>) -> Result<()> {
        self.update(|doc| {
            doc.status.record_attempt(at);
        })
    }

    fn record_success(&self, at: DateTime<Utc>) -> Result<()> {
        self.update(|doc| {
            doc.status.record_success(at);
        })
    }

    fn record_widget_push(&self, at: DateTime<Utc>) -> Result<()> {
        self.update(|doc| {
            doc.status.record_widget_push(at);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockwidget_core::widgets::WidgetSize;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::open(dir.path().join("prefs.json")).unwrap();
        assert_eq!(store.settings().unwrap(), Settings::default());
        assert_eq!(store.status().unwrap(), UpdateStatus::default());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_changes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let now = Utc::now();

        let store = PrefsStore::open(&path).unwrap();
        store.set_credential(" secret ").unwrap();
        assert_eq!(store.set_refresh_interval_minutes(5).unwrap(), 15);
        store
            .upsert_widget(WidgetConfig::new(3, WidgetSize::Small))
            .unwrap();
        store.record_attempt(now).unwrap();

        let reopened = PrefsStore::open(&path).unwrap();
        assert_eq!(reopened.credential().unwrap(), "secret");
        assert_eq!(reopened.refresh_interval_minutes().unwrap(), 15);
        assert_eq!(reopened.widgets().unwrap().len(), 1);
        assert_eq!(
            reopened.status().unwrap().last_attempt.map(|t| t.timestamp_millis()),
            Some(now.timestamp_millis())
        );
    }

    #[test]
    fn test_corrupted_file_is_settings_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{oops").unwrap();
        assert!(matches!(PrefsStore::open(&path), Err(Error::Settings(_))));
    }

    #[test]
    fn test_retain_widgets_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = PrefsStore::open(&path).unwrap();
        store
            .upsert_widget(WidgetConfig::new(1, WidgetSize::Normal))
            .unwrap();
        store
            .upsert_widget(WidgetConfig::new(2, WidgetSize::Normal))
            .unwrap();

        let removed = store
            .retain_widgets(&[WidgetKey::new(WidgetSize::Normal, 2)])
            .unwrap();
        assert_eq!(removed, 1);

        let reopened = PrefsStore::open(&path).unwrap();
        assert_eq!(reopened.widgets().unwrap()[0].id, 2);
    }
}
