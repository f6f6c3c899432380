//! Platform effect backend seam
//!
//! The host platform owns the native audio effects. Clef drives them through
//! [`EffectEngine`] (constructs one effect on one session) and
//! [`EffectHandle`] (one live native instance). A platform without a usable
//! implementation for an effect reports creation failure; nothing here falls
//! back to processing audio itself.

use crate::error::{EffectError, Result};
use clef_core::SessionId;
use std::fmt;
use uuid::Uuid;

/// Parameter index of the compression strength record
pub const PARAM_COMPRESSION_STRENGTH: i32 = 0;

/// Parameter index of the equalizer loudness-correction record
pub const PARAM_EQ_LOUDNESS_CORRECTION: i32 = 1000;

/// The four effect kinds a chain holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Dynamic range compression
    ///
    /// A hidden platform effect with no public constructor; backends must
    /// address it by its type id.
    Compression,

    /// Graphic equalizer
    Equalizer,

    /// Bass boost
    BassBoost,

    /// Headphone virtualizer
    Virtualizer,
}

impl EffectKind {
    /// Platform effect-type identifier
    pub fn type_uuid(&self) -> Uuid {
        match self {
            Self::Compression => Uuid::from_u128(0x09e8ede0_ddde_11db_b4f6_0002a5d5c51b),
            Self::Equalizer => Uuid::from_u128(0x0bed4300_ddd6_11db_8f34_0002a5d5c51b),
            Self::BassBoost => Uuid::from_u128(0x0634f220_ddd4_11db_a0fc_0002a5d5c51b),
            Self::Virtualizer => Uuid::from_u128(0x37cc2c00_dddd_11db_8577_0002a5d5c51b),
        }
    }

    /// Short lowercase name used in logs and error messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Compression => "compression",
            Self::Equalizer => "equalizer",
            Self::BassBoost => "bass boost",
            Self::Virtualizer => "virtualizer",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Factory for native effects
///
/// One engine serves every session; implementations must be shareable
/// across threads.
pub trait EffectEngine: Send + Sync {
    /// Construct one native effect attached to an audio session
    ///
    /// # Errors
    /// Returns `CreationFailed` when the platform cannot provide the effect
    /// (missing implementation, exhausted instances, dead session)
    fn create_effect(&self, kind: EffectKind, session: SessionId) -> Result<Box<dyn EffectHandle>>;
}

/// One live native effect instance
///
/// Dropping a handle frees the underlying native resources.
///
/// Strength and band-level writes are optional capabilities; the default
/// implementations report them unsupported.
pub trait EffectHandle: Send {
    /// Switch the effect on or off
    ///
    /// # Errors
    /// Returns `ApplyFailed` when the backend rejects the change
    fn set_enabled(&mut self, enabled: bool) -> Result<()>;

    /// Write a raw binary parameter record
    ///
    /// `param` carries the little-endian encoded parameter index, `value`
    /// the little-endian encoded payload.
    ///
    /// # Errors
    /// Returns `ApplyFailed` when the backend rejects the record
    fn set_parameter(&mut self, param: &[u8], value: &[u8]) -> Result<()>;

    /// Whether this handle accepts strength writes
    fn strength_supported(&self) -> bool {
        false
    }

    /// Set the effect strength (0 to 1000)
    ///
    /// # Errors
    /// Returns `Unsupported` unless the handle implements strength
    fn set_strength(&mut self, strength: u16) -> Result<()> {
        let _ = strength;
        Err(EffectError::Unsupported("strength"))
    }

    /// Set one equalizer band gain, in hundredths of a dB
    ///
    /// # Errors
    /// Returns `Unsupported` unless the handle implements band levels
    fn set_band_level(&mut self, band: u16, level: i16) -> Result<()> {
        let _ = band;
        let _ = level;
        Err(EffectError::Unsupported("band levels"))
    }
}
