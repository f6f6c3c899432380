//! Stored preference bags
//!
//! Configurations are stored as flat key/value bags. Switches are booleans;
//! numeric values are kept as text and parsed leniently: a malformed token
//! becomes 0 rather than failing the whole lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known preference keys
pub mod keys {
    /// Dynamic range compression on/off
    pub const COMPRESSION_ENABLE: &str = "dsp.compression.enable";

    /// Compression strength preset, stored as text
    pub const COMPRESSION_MODE: &str = "dsp.compression.mode";

    /// Bass boost on/off
    pub const BASS_ENABLE: &str = "dsp.bass.enable";

    /// Bass boost strength (0 to 1000), stored as text
    pub const BASS_MODE: &str = "dsp.bass.mode";

    /// Equalizer on/off
    pub const TONE_ENABLE: &str = "dsp.tone.enable";

    /// Equalizer curve, `;`-separated dB values
    pub const TONE_EQ: &str = "dsp.tone.eq.custom";

    /// Loudness correction, stored as text
    pub const TONE_LOUDNESS: &str = "dsp.tone.loudness";

    /// Headphone virtualizer on/off
    pub const HEADPHONE_ENABLE: &str = "dsp.headphone.enable";

    /// Virtualizer strength (0 to 1000), stored as text
    pub const HEADPHONE_MODE: &str = "dsp.headphone.mode";
}

/// A single stored preference value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    /// On/off switch
    Bool(bool),

    /// Free-form text; numeric values are stored in text form
    Text(String),
}

/// Flat key/value bag holding one stored configuration
///
/// Reads are total: missing keys fall back to caller-supplied defaults and
/// malformed numeric text parses to 0, so a broken stored value can never
/// take configuration lookup down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences {
    values: HashMap<String, PrefValue>,
}

impl Preferences {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a boolean value
    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.values.insert(key.into(), PrefValue::Bool(value));
    }

    /// Store a text value
    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), PrefValue::Text(value.into()));
    }

    /// Read a boolean
    ///
    /// Missing keys and non-boolean entries yield `default`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(PrefValue::Bool(value)) => *value,
            _ => default,
        }
    }

    /// Read a numeric value stored as text
    ///
    /// A missing key yields `default`; a present but malformed token
    /// yields 0.
    pub fn get_i16(&self, key: &str, default: i16) -> i16 {
        match self.text(key) {
            None => default,
            Some(raw) => raw.trim().parse().unwrap_or(0),
        }
    }

    /// Read an effect strength stored as text, clamped to 0..=1000
    ///
    /// Missing keys and malformed tokens both yield 0.
    pub fn get_strength(&self, key: &str) -> u16 {
        match self.text(key) {
            None => 0,
            Some(raw) => raw.trim().parse::<i32>().unwrap_or(0).clamp(0, 1000) as u16,
        }
    }

    /// Read a `;`-separated list of dB values stored as text
    ///
    /// Malformed tokens become 0.0; a missing key yields a copy of
    /// `default`.
    pub fn get_levels(&self, key: &str, default: &[f32]) -> Vec<f32> {
        match self.text(key) {
            None => default.to_vec(),
            Some(raw) => raw
                .split(';')
                .map(|token| token.trim().parse().unwrap_or(0.0))
                .collect(),
        }
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bag holds nothing
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(PrefValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let prefs = Preferences::new();
        assert!(!prefs.get_bool(keys::BASS_ENABLE, false));
        assert!(prefs.get_bool(keys::BASS_ENABLE, true));
        assert_eq!(prefs.get_i16(keys::TONE_LOUDNESS, 10_000), 10_000);
        assert_eq!(prefs.get_strength(keys::BASS_MODE), 0);
        assert_eq!(prefs.get_levels(keys::TONE_EQ, &[0.0; 5]), vec![0.0; 5]);
    }

    #[test]
    fn malformed_numeric_text_parses_to_zero() {
        let mut prefs = Preferences::new();
        prefs.set_text(keys::TONE_LOUDNESS, "loud");
        prefs.set_text(keys::BASS_MODE, "6oo");
        // Present but broken: the lenient policy says 0, not the default
        assert_eq!(prefs.get_i16(keys::TONE_LOUDNESS, 10_000), 0);
        assert_eq!(prefs.get_strength(keys::BASS_MODE), 0);
    }

    #[test]
    fn strength_clamps_to_range() {
        let mut prefs = Preferences::new();
        prefs.set_text(keys::BASS_MODE, "2000");
        assert_eq!(prefs.get_strength(keys::BASS_MODE), 1000);
        prefs.set_text(keys::BASS_MODE, "-50");
        assert_eq!(prefs.get_strength(keys::BASS_MODE), 0);
        prefs.set_text(keys::BASS_MODE, "600");
        assert_eq!(prefs.get_strength(keys::BASS_MODE), 600);
    }

    #[test]
    fn levels_parse_token_by_token() {
        let mut prefs = Preferences::new();
        prefs.set_text(keys::TONE_EQ, "1.5;-2.0;0;junk;3");
        assert_eq!(
            prefs.get_levels(keys::TONE_EQ, &[0.0; 5]),
            vec![1.5, -2.0, 0.0, 0.0, 3.0]
        );
    }

    #[test]
    fn empty_curve_is_one_malformed_token() {
        let mut prefs = Preferences::new();
        prefs.set_text(keys::TONE_EQ, "");
        assert_eq!(prefs.get_levels(keys::TONE_EQ, &[0.0; 5]), vec![0.0]);
    }

    #[test]
    fn bool_entry_does_not_coerce_to_text() {
        let mut prefs = Preferences::new();
        prefs.set_bool(keys::BASS_MODE, true);
        assert_eq!(prefs.get_strength(keys::BASS_MODE), 0);
        prefs.set_text(keys::BASS_ENABLE, "true");
        assert!(!prefs.get_bool(keys::BASS_ENABLE, false));
    }

    #[test]
    fn json_round_trip() {
        let mut prefs = Preferences::new();
        prefs.set_bool(keys::BASS_ENABLE, true);
        prefs.set_text(keys::BASS_MODE, "600");

        let json = serde_json::to_string(&prefs).unwrap();
        let back: Preferences = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefs);
        assert!(back.get_bool(keys::BASS_ENABLE, false));
        assert_eq!(back.get_strength(keys::BASS_MODE), 600);
    }

    #[test]
    fn size_tracks_stored_entries() {
        let mut prefs = Preferences::new();
        assert!(prefs.is_empty());

        prefs.set_bool(keys::BASS_ENABLE, true);
        prefs.set_text(keys::BASS_MODE, "600");
        assert_eq!(prefs.len(), 2);
        assert!(!prefs.is_empty());

        // Writing an existing key replaces the entry instead of growing the bag
        prefs.set_text(keys::BASS_MODE, "700");
        assert_eq!(prefs.len(), 2);
    }

    proptest! {
        #[test]
        fn strength_never_leaves_range(raw in ".*") {
            let mut prefs = Preferences::new();
            prefs.set_text(keys::BASS_MODE, raw);
            prop_assert!(prefs.get_strength(keys::BASS_MODE) <= 1000);
        }

        #[test]
        fn level_parsing_never_panics(raw in ".*") {
            let mut prefs = Preferences::new();
            prefs.set_text(keys::TONE_EQ, raw);
            let levels = prefs.get_levels(keys::TONE_EQ, &[0.0; 5]);
            prop_assert!(!levels.is_empty());
        }
    }
}
