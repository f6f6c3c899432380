//! Per-session effect chain
//!
//! An [`EffectChain`] owns the four native effects attached to one audio
//! session and pushes complete parameter snapshots into them. Creation is
//! all-or-nothing; configuration is best-effort per field with the first
//! failure reported after the full pass.

use crate::engine::{
    EffectEngine, EffectHandle, EffectKind, PARAM_COMPRESSION_STRENGTH,
    PARAM_EQ_LOUDNESS_CORRECTION,
};
use crate::error::{EffectError, Result};
use clef_core::{ChainSettings, SessionId};
use std::fmt::Debug;
use tracing::{debug, warn};

struct Handles {
    compression: Box<dyn EffectHandle>,
    equalizer: Box<dyn EffectHandle>,
    bass_boost: Box<dyn EffectHandle>,
    virtualizer: Box<dyn EffectHandle>,
}

/// The four effects bound to one audio session
pub struct EffectChain {
    session: SessionId,
    handles: Option<Handles>,
}

impl Debug for EffectChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectChain")
            .field("session", &self.session)
            .field("released", &self.is_released())
            .finish()
    }
}

impl EffectChain {
    /// Create all four effects on a session
    ///
    /// Either every effect comes up or none does: handles constructed before
    /// a failure are dropped, which frees their native resources.
    ///
    /// # Errors
    /// Returns the first creation failure reported by the engine
    pub fn create(engine: &dyn EffectEngine, session: SessionId) -> Result<Self> {
        let compression = engine.create_effect(EffectKind::Compression, session)?;
        let equalizer = engine.create_effect(EffectKind::Equalizer, session)?;
        let bass_boost = engine.create_effect(EffectKind::BassBoost, session)?;
        let virtualizer = engine.create_effect(EffectKind::Virtualizer, session)?;

        debug!("Created effect chain for session {}", session);

        Ok(Self {
            session,
            handles: Some(Handles {
                compression,
                equalizer,
                bass_boost,
                virtualizer,
            }),
        })
    }

    /// The audio session this chain is attached to
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Whether [`release`](Self::release) has already run
    pub fn is_released(&self) -> bool {
        self.handles.is_none()
    }

    /// Push a complete parameter snapshot into every effect
    ///
    /// Every field is attempted even after an earlier one fails, so a
    /// rejected write cannot leave later effects on stale values. Strength
    /// writes are skipped on handles that do not support them.
    ///
    /// # Errors
    /// Returns `Released` when the chain has been released, otherwise the
    /// first rejected write after the full pass
    pub fn apply(&mut self, settings: &ChainSettings) -> Result<()> {
        let session = self.session;
        let handles = self.handles.as_mut().ok_or(EffectError::Released)?;

        let mut first_failure: Option<EffectError> = None;
        let mut attempt = |kind: EffectKind, field: &str, result: Result<()>| {
            if let Err(err) = result {
                warn!("Failed to apply {} {} on session {}: {}", kind, field, session, err);
                first_failure.get_or_insert(err);
            }
        };

        attempt(
            EffectKind::Compression,
            "enable",
            handles.compression.set_enabled(settings.compression_enabled),
        );
        // The strength record is written even while disabled so the effect
        // holds the right value the moment it is switched on.
        attempt(
            EffectKind::Compression,
            "strength record",
            handles.compression.set_parameter(
                &PARAM_COMPRESSION_STRENGTH.to_le_bytes(),
                &settings.compression_strength.to_le_bytes(),
            ),
        );

        attempt(
            EffectKind::BassBoost,
            "enable",
            handles.bass_boost.set_enabled(settings.bass_enabled),
        );
        if handles.bass_boost.strength_supported() {
            attempt(
                EffectKind::BassBoost,
                "strength",
                handles.bass_boost.set_strength(settings.bass_strength),
            );
        }

        attempt(
            EffectKind::Equalizer,
            "enable",
            handles.equalizer.set_enabled(settings.equalizer_enabled),
        );
        for (band, level_db) in settings.equalizer_levels.iter().enumerate() {
            // Ties round half up: -12.5 maps to -12.
            let level = (level_db * 100.0 + 0.5).floor() as i16;
            attempt(
                EffectKind::Equalizer,
                "band level",
                handles.equalizer.set_band_level(band as u16, level),
            );
        }
        attempt(
            EffectKind::Equalizer,
            "loudness record",
            handles.equalizer.set_parameter(
                &PARAM_EQ_LOUDNESS_CORRECTION.to_le_bytes(),
                &settings.loudness_correction.to_le_bytes(),
            ),
        );

        attempt(
            EffectKind::Virtualizer,
            "enable",
            handles.virtualizer.set_enabled(settings.virtualizer_enabled),
        );
        if handles.virtualizer.strength_supported() {
            attempt(
                EffectKind::Virtualizer,
                "strength",
                handles.virtualizer.set_strength(settings.virtualizer_strength),
            );
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Drop all four handles, freeing their native resources
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn release(&mut self) {
        if self.handles.take().is_some() {
            debug!("Released effect chain for session {}", self.session);
        } else {
            debug!("Effect chain for session {} already released", self.session);
        }
    }
}
