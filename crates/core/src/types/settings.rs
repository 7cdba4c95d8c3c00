// crates/core/src/types/settings.rs
//! Per-user settings blob

use crate::types::{Timestamp, Validator};
use serde::{Deserialize, Serialize};

/// UI theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// User settings, synced as a single document with whole-blob
/// last-writer-wins semantics (never merged per field)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Circle labels available when editing people
    pub circles: Vec<String>,
    /// Connection-type labels available when logging interactions
    pub connection_types: Vec<String>,
    /// How far ahead the reminders view looks, in days
    pub reminder_lookahead_days: u32,
    pub theme: Theme,
    /// Sync bookkeeping for the whole blob
    pub updated_at: Timestamp,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            circles: vec![
                "Family".to_string(),
                "Friends".to_string(),
                "Work".to_string(),
            ],
            connection_types: vec![
                "call".to_string(),
                "text".to_string(),
                "meet up".to_string(),
            ],
            reminder_lookahead_days: 14,
            theme: Theme::Light,
            updated_at: Timestamp::NEVER,
        }
    }
}

impl Validator for Settings {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.circles.iter().any(|c| c.trim().is_empty()) {
            errors.push("Circle labels cannot be empty".to_string());
        }

        if self.connection_types.iter().any(|c| c.trim().is_empty()) {
            errors.push("Connection types cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert!(settings.circles.contains(&"Family".to_string()));
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.reminder_lookahead_days, 14);
        assert!(settings.is_valid());
    }

    #[test]
    fn test_settings_validation_empty_circle() {
        let mut settings = Settings::default();
        settings.circles.push("  ".to_string());
        assert!(!settings.is_valid());
    }

    #[test]
    fn test_theme_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let theme: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(theme, Theme::Light);
    }
}
