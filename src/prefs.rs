//! User preference store
//!
//! Loaded once at process start and injected into whatever needs it;
//! there is no ambient global preferences file. Currently the only
//! preference is a working-hours override.

use std::fs;

use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::calendar::WorkingHours;

pub trait PreferenceStore: Send + Sync {
    fn working_hours(&self) -> Option<WorkingHours>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FilePreferences {
    #[serde(default)]
    working_hours: Option<WorkingHours>,
}

impl FilePreferences {
    pub fn load(path: &str) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)?;
        let prefs = serde_json::from_str(&raw)?;
        Ok(prefs)
    }
}

impl PreferenceStore for FilePreferences {
    fn working_hours(&self) -> Option<WorkingHours> {
        self.working_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_loads_a_working_hours_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"working_hours": {"min_hour": 9, "max_hour": 18}}"#).unwrap();

        let prefs = FilePreferences::load(path.to_str().unwrap()).unwrap();
        let hours = prefs.working_hours().unwrap();
        assert_eq!(hours.min_hour, 9);
        assert_eq!(hours.max_hour, 18);
    }

    #[test]
    fn it_defaults_to_no_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{}").unwrap();

        let prefs = FilePreferences::load(path.to_str().unwrap()).unwrap();
        assert!(prefs.working_hours().is_none());
    }
}
