use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::{Error, Result};
use crate::settings::{clamp_refresh_interval, Settings, SettingsStore};
use crate::widgets::{WidgetConfig, WidgetKey};

/// Settings held in process memory.
#[derive(Default)]
pub struct InMemorySettingsStore {
    settings: RwLock<Settings>,
}

impl InMemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    /// Copy of the current settings.
    pub fn settings(&self) -> Result<Settings> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Settings>> {
        self.settings
            .read()
            .map_err(|e| Error::Settings(format!("settings lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Settings>> {
        self.settings
            .write()
            .map_err(|e| Error::Settings(format!("settings lock poisoned: {}", e)))
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn credential(&self) -> Result<String> {
        Ok(self.read()?.credential.clone())
    }

    fn refresh_interval_minutes(&self) -> Result<u32> {
        Ok(clamp_refresh_interval(self.read()?.refresh_interval_minutes))
    }

    fn widgets(&self) -> Result<Vec<WidgetConfig>> {
        Ok(self.read()?.widgets.clone())
    }

    fn upsert_widget(&self, config: WidgetConfig) -> Result<()> {
        self.write()?.upsert_widget(config);
        Ok(())
    }

    fn remove_widget(&self, key: WidgetKey) -> Result<bool> {
        Ok(self.write()?.remove_widget(key))
    }

    fn retain_widgets(&self, installed: &[WidgetKey]) -> Result<usize> {
        Ok(self.write()?.retain_widgets(installed))
    }

    fn set_credential(&self, credential: &str) -> Result<()> {
        self.write()?.credential = credential.trim().to_string();
        Ok(())
    }

    fn set_refresh_interval_minutes(&self, minutes: u32) -> Result<u32> {
        let minutes = clamp_refresh_interval(minutes);
        self.write()?.refresh_interval_minutes = minutes;
        Ok(minutes)
    }
}
