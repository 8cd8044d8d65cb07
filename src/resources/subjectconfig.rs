//! Subject configuration.
//!
//! Holds the options a [`ResizeSubject`](crate::subject::ResizeSubject) is
//! built with. Defaults are usable as-is; values can also be loaded from or
//! saved to an INI file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [subject]
//! delay = 33
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::subject::DEFAULT_DELAY_MS;

const DEFAULT_CONFIG_PATH: &str = "./resize.ini";

/// Construction options for a resize subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectConfig {
    /// Debounce delay in milliseconds.
    pub delay_ms: u32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SubjectConfig {
    /// Configuration with default values.
    pub fn new() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Configuration backed by a custom file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Override the debounce delay.
    pub fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    /// Returns an error if the file cannot be read or parsed, or if `delay`
    /// is present but not a non-negative integer that fits in 32 bits.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [subject] section
        if let Some(delay) = config
            .getuint("subject", "delay")
            .map_err(|e| format!("Invalid subject.delay: {}", e))?
        {
            self.delay_ms = u32::try_from(delay)
                .map_err(|_| format!("subject.delay out of range: {}", delay))?;
        }

        info!("Loaded config: delay={}ms", self.delay_ms);

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [subject] section
        config.set("subject", "delay", Some(self.delay_ms.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "resizesubject-{}-{}.ini",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_default_delay_is_33() {
        let cfg = SubjectConfig::default();
        assert_eq!(cfg.delay_ms, 33);
        assert_eq!(cfg.config_path, PathBuf::from("./resize.ini"));
    }

    #[test]
    fn test_with_delay_overrides() {
        let cfg = SubjectConfig::new().with_delay(100);
        assert_eq!(cfg.delay_ms, 100);
    }

    #[test]
    fn test_missing_file_is_error_and_keeps_values() {
        let mut cfg = SubjectConfig::with_path(temp_path("missing")).with_delay(7);
        assert!(cfg.load_from_file().is_err());
        assert_eq!(cfg.delay_ms, 7);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        SubjectConfig::with_path(&path)
            .with_delay(250)
            .save_to_file()
            .unwrap();

        let mut loaded = SubjectConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded.delay_ms, 250);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_key_keeps_default() {
        let path = temp_path("nokey");
        std::fs::write(&path, "[other]\nvalue = 1\n").unwrap();
        let mut cfg = SubjectConfig::with_path(&path);
        cfg.load_from_file().unwrap();
        assert_eq!(cfg.delay_ms, 33);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_negative_delay_is_rejected() {
        let path = temp_path("negative");
        std::fs::write(&path, "[subject]\ndelay = -5\n").unwrap();
        let mut cfg = SubjectConfig::with_path(&path);
        assert!(cfg.load_from_file().is_err());
        assert_eq!(cfg.delay_ms, 33);
        let _ = std::fs::remove_file(path);
    }
}
