//! Persisted user preferences.
//!
//! One small JSON file in the data directory, read once at startup and
//! rewritten whenever the theme changes.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::theme::Theme;

const SETTINGS_FILE: &str = "settings.json";

/// User preferences that survive across sessions.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
}

impl Settings {
    /// Load settings from the data directory, falling back to defaults
    /// if the file doesn't exist.
    pub fn load(dir: &Path) -> Self {
        let path = Self::path(dir);
        if !path.exists() {
            return Settings::default();
        }
        let mut buf = String::new();
        match File::open(&path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Error parsing settings, using defaults: {e}");
                    Settings::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading settings, using defaults: {e}");
                Settings::default()
            }
        }
    }

    /// Save settings to the data directory using atomic write (temp
    /// file + rename).
    pub fn save(&self, dir: &Path) -> std::io::Result<()> {
        let path = Self::path(dir);
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(self).unwrap();
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    fn path(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn theme_persists_across_reload() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            theme: Theme::Dark,
        };
        settings.save(dir.path()).unwrap();

        // Fresh load simulates a restart.
        let reloaded = Settings::load(dir.path());
        assert_eq!(reloaded.theme, Theme::Dark);
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "not json {").unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn settings_file_stores_the_display_string() {
        let dir = tempdir().unwrap();
        Settings {
            theme: Theme::Blue,
        }
        .save(dir.path())
        .unwrap();
        let raw = fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap();
        assert!(raw.contains("\"Blue Theme\""));
    }
}
