//! Color theme selection.
//!
//! Six fixed themes, purely cosmetic and unrelated to task data. The
//! serde names match the strings written to the settings file, which
//! are also the labels shown in the theme picker.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A named color preset for the whole interface.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
pub enum Theme {
    #[default]
    #[serde(rename = "Light Theme")]
    Light,
    #[serde(rename = "Dark Theme")]
    Dark,
    #[serde(rename = "Gray Theme")]
    Gray,
    #[serde(rename = "Blue Theme")]
    Blue,
    #[serde(rename = "Green Theme")]
    Green,
    #[serde(rename = "Red Theme")]
    Red,
}

impl Theme {
    /// Every theme, in picker order.
    pub const ALL: [Theme; 6] = [
        Theme::Light,
        Theme::Dark,
        Theme::Gray,
        Theme::Blue,
        Theme::Green,
        Theme::Red,
    ];

    /// Display label, identical to the persisted settings string.
    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light Theme",
            Theme::Dark => "Dark Theme",
            Theme::Gray => "Gray Theme",
            Theme::Blue => "Blue Theme",
            Theme::Green => "Green Theme",
            Theme::Red => "Red Theme",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_light() {
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn serde_uses_display_labels() {
        assert_eq!(
            serde_json::to_string(&Theme::Dark).unwrap(),
            "\"Dark Theme\""
        );
        let parsed: Theme = serde_json::from_str("\"Green Theme\"").unwrap();
        assert_eq!(parsed, Theme::Green);
    }

    #[test]
    fn labels_match_serde_names() {
        for theme in Theme::ALL {
            let json = serde_json::to_string(&theme).unwrap();
            assert_eq!(json, format!("\"{}\"", theme.label()));
        }
    }
}
