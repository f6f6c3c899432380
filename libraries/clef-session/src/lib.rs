//! Clef Session
//!
//! Session lifecycle and routing-driven effect control for Clef. This crate
//! ties the pieces together: it watches routing signals, picks the
//! configuration for the winning route and keeps every live session's
//! effect chain holding that profile.
//!
//! This crate provides:
//! - A session registry: one effect chain per open audio session, created
//!   on open and released on close
//! - Route resolution: signal edges collapse into a single route, and only
//!   an actual route change triggers a repush
//! - Broadcasts: configuration snapshots staged under one lock and pushed
//!   to every session, so no chain sees a half-updated profile
//! - An equalizer preview override for live band dragging, cleared to fall
//!   back to the stored curve
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use clef_core::{MemoryConfigStore, RouteSignal, SessionId};
//! use clef_effects::{EffectEngine, EffectHandle, EffectKind};
//! use clef_session::EffectManager;
//!
//! struct NullEngine;
//! struct NullHandle;
//!
//! impl EffectEngine for NullEngine {
//!     fn create_effect(
//!         &self,
//!         _kind: EffectKind,
//!         _session: SessionId,
//!     ) -> clef_effects::Result<Box<dyn EffectHandle>> {
//!         Ok(Box::new(NullHandle))
//!     }
//! }
//!
//! impl EffectHandle for NullHandle {
//!     fn set_enabled(&mut self, _enabled: bool) -> clef_effects::Result<()> {
//!         Ok(())
//!     }
//!     fn set_parameter(&mut self, _param: &[u8], _value: &[u8]) -> clef_effects::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let manager = EffectManager::new(Arc::new(NullEngine), Arc::new(MemoryConfigStore::new()));
//!
//! manager.session_opened(SessionId(1)).unwrap();
//! manager.signal_changed(RouteSignal::HeadsetConnected, true).unwrap();
//!
//! assert_eq!(manager.current_route().to_string(), "headset");
//! manager.shutdown().unwrap();
//! ```

mod error;
mod manager;
mod registry;

// Public exports
pub use error::{ManagerError, Result};
pub use manager::EffectManager;
