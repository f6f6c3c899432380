//! Clef Core
//!
//! Core types, routing resolution, and configuration handling for Clef.
//!
//! This crate provides the platform-agnostic foundation:
//! - **Routing**: [`RouteSignals`] and the strict-precedence [`RouteMode`] resolver
//! - **Settings**: [`ChainSettings`], the resolved per-route effect settings
//! - **Preferences**: stored key/value bags with lenient numeric parsing
//! - **Configuration**: the [`ConfigStore`] seam plus an in-memory/JSON store
//!
//! # Example
//!
//! ```rust
//! use clef_core::prefs::keys;
//! use clef_core::{ConfigStore, MemoryConfigStore, Preferences, RouteSignal, RouteSignals};
//!
//! // Store a headset configuration
//! let store = MemoryConfigStore::new();
//! let mut headset = Preferences::new();
//! headset.set_bool(keys::BASS_ENABLE, true);
//! headset.set_text(keys::BASS_MODE, "600");
//!
//! // Resolve the route the signals point at
//! let mut signals = RouteSignals::default();
//! signals.set(RouteSignal::HeadsetConnected, true);
//! let mode = signals.resolve();
//!
//! store.set_profile(mode, headset);
//!
//! // Lookup is total: stored values where present, defaults otherwise
//! let settings = store.load(mode);
//! assert!(settings.bass_enabled);
//! assert_eq!(settings.bass_strength, 600);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod prefs;
mod route;
mod session;
mod settings;
mod store;

// Re-export commonly used types
pub use error::{ConfigError, Result};
pub use prefs::{PrefValue, Preferences};
pub use route::{RouteMode, RouteSignal, RouteSignals};
pub use session::SessionId;
pub use settings::{ChainSettings, DEFAULT_BAND_COUNT, DEFAULT_LOUDNESS_CORRECTION};
pub use store::{ConfigStore, MemoryConfigStore, DEFAULT_NAMESPACE};
