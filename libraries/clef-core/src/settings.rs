//! Resolved effect settings

use crate::prefs::{keys, Preferences};
use serde::{Deserialize, Serialize};

/// Band count of the default (flat) equalizer curve
pub const DEFAULT_BAND_COUNT: usize = 5;

/// Default loudness correction value
pub const DEFAULT_LOUDNESS_CORRECTION: i16 = 10_000;

/// The complete, resolved settings for one effect chain
///
/// This is the value pushed to every live session when routing or stored
/// configuration changes. It is computed once per push and never mutated
/// by the apply path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSettings {
    /// Dynamic range compression on/off
    pub compression_enabled: bool,

    /// Compression strength preset
    pub compression_strength: i16,

    /// Bass boost on/off
    pub bass_enabled: bool,

    /// Bass boost strength (0 to 1000)
    pub bass_strength: u16,

    /// Equalizer on/off
    pub equalizer_enabled: bool,

    /// Per-band equalizer gain in dB, ascending band order
    pub equalizer_levels: Vec<f32>,

    /// Loudness correction pushed alongside the equalizer
    pub loudness_correction: i16,

    /// Headphone virtualizer on/off
    pub virtualizer_enabled: bool,

    /// Virtualizer strength (0 to 1000)
    pub virtualizer_strength: u16,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            compression_enabled: false,
            compression_strength: 0,
            bass_enabled: false,
            bass_strength: 0,
            equalizer_enabled: false,
            equalizer_levels: vec![0.0; DEFAULT_BAND_COUNT],
            loudness_correction: DEFAULT_LOUDNESS_CORRECTION,
            virtualizer_enabled: false,
            virtualizer_strength: 0,
        }
    }
}

impl ChainSettings {
    /// Build settings from a stored preference bag
    ///
    /// Missing keys fall back to the defaults; malformed numeric text
    /// follows the lenient policy in [`Preferences`].
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self {
            compression_enabled: prefs.get_bool(keys::COMPRESSION_ENABLE, false),
            compression_strength: prefs.get_i16(keys::COMPRESSION_MODE, 0),
            bass_enabled: prefs.get_bool(keys::BASS_ENABLE, false),
            bass_strength: prefs.get_strength(keys::BASS_MODE),
            equalizer_enabled: prefs.get_bool(keys::TONE_ENABLE, false),
            equalizer_levels: prefs.get_levels(keys::TONE_EQ, &[0.0; DEFAULT_BAND_COUNT]),
            loudness_correction: prefs.get_i16(keys::TONE_LOUDNESS, DEFAULT_LOUDNESS_CORRECTION),
            virtualizer_enabled: prefs.get_bool(keys::HEADPHONE_ENABLE, false),
            virtualizer_strength: prefs.get_strength(keys::HEADPHONE_MODE),
        }
    }
}
