//! Clef Effects
//!
//! Native effect plumbing for Clef: the backend seam the platform
//! implements and the per-session chain that drives it.
//!
//! This crate provides:
//! - The [`EffectEngine`] and [`EffectHandle`] traits a platform implements
//!   over its native effect API
//! - [`EffectChain`]: the compression, equalizer, bass boost and virtualizer
//!   instances bound to one audio session
//! - Snapshot application: a chain receives a complete settings bag, never
//!   a partial update
//! - A mock backend for tests, behind the `test-utils` feature
//!
//! # Example
//!
//! ```rust
//! use clef_core::{ChainSettings, SessionId};
//! use clef_effects::{EffectChain, EffectEngine, EffectHandle, EffectKind, Result};
//!
//! struct NullEngine;
//! struct NullHandle;
//!
//! impl EffectEngine for NullEngine {
//!     fn create_effect(
//!         &self,
//!         _kind: EffectKind,
//!         _session: SessionId,
//!     ) -> Result<Box<dyn EffectHandle>> {
//!         Ok(Box::new(NullHandle))
//!     }
//! }
//!
//! impl EffectHandle for NullHandle {
//!     fn set_enabled(&mut self, _enabled: bool) -> Result<()> {
//!         Ok(())
//!     }
//!     fn set_parameter(&mut self, _param: &[u8], _value: &[u8]) -> Result<()> {
//!         Ok(())
//!     }
//!     fn set_band_level(&mut self, _band: u16, _level: i16) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let mut chain = EffectChain::create(&NullEngine, SessionId(7)).unwrap();
//! chain.apply(&ChainSettings::default()).unwrap();
//! chain.release();
//! assert!(chain.is_released());
//! ```

mod chain;
mod engine;
mod error;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

// Public exports
pub use chain::EffectChain;
pub use engine::{
    EffectEngine, EffectHandle, EffectKind, PARAM_COMPRESSION_STRENGTH,
    PARAM_EQ_LOUDNESS_CORRECTION,
};
pub use error::{EffectError, Result};
