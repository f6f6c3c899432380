//! In-memory effect backend for tests
//!
//! [`MockEngine`] stands in for the platform: it hands out handles that
//! record every write into shared state, and it can be told to fail
//! creation or writes for chosen effect kinds or sessions. Handle drops are
//! counted so tests can assert that native resources would have been freed.

use crate::engine::{EffectEngine, EffectHandle, EffectKind};
use crate::error::{EffectError, Result};
use clef_core::SessionId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// One write accepted by a mock handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    /// Session the handle belongs to
    pub session: SessionId,

    /// Effect the write went to
    pub kind: EffectKind,

    /// The write itself
    pub op: WriteOp,
}

/// The write operations a handle accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// `set_enabled`
    Enabled(bool),

    /// `set_parameter`, raw index and payload bytes
    Parameter(Vec<u8>, Vec<u8>),

    /// `set_strength`
    Strength(u16),

    /// `set_band_level`, band index and level
    BandLevel(u16, i16),
}

#[derive(Default)]
struct EngineState {
    created: Vec<(EffectKind, SessionId)>,
    live: usize,
    writes: Vec<WriteRecord>,
    fail_creation: HashSet<EffectKind>,
    fail_ops: HashSet<EffectKind>,
    fail_sessions: HashSet<SessionId>,
    strength_supported: bool,
}

/// Shared fake backend; clones observe the same state
#[derive(Clone)]
pub struct MockEngine {
    state: Arc<Mutex<EngineState>>,
}

impl MockEngine {
    /// A fresh engine where every operation succeeds
    pub fn new() -> Self {
        let state = EngineState {
            strength_supported: true,
            ..EngineState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Make future creations of `kind` fail
    pub fn fail_creation(&self, kind: EffectKind) {
        self.state.lock().unwrap().fail_creation.insert(kind);
    }

    /// Make future writes to `kind` handles fail
    pub fn fail_ops(&self, kind: EffectKind) {
        self.state.lock().unwrap().fail_ops.insert(kind);
    }

    /// Make future writes on one session's handles fail
    pub fn fail_session_ops(&self, session: SessionId) {
        self.state.lock().unwrap().fail_sessions.insert(session);
    }

    /// Toggle strength support on bass boost and virtualizer handles
    pub fn set_strength_supported(&self, supported: bool) {
        self.state.lock().unwrap().strength_supported = supported;
    }

    /// Every successful creation, in order
    pub fn created(&self) -> Vec<(EffectKind, SessionId)> {
        self.state.lock().unwrap().created.clone()
    }

    /// Handles created and not yet dropped
    pub fn live_handles(&self) -> usize {
        self.state.lock().unwrap().live
    }

    /// Every accepted write, in order
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.state.lock().unwrap().writes.clone()
    }

    /// Accepted writes to one effect kind, in order
    pub fn writes_for(&self, kind: EffectKind) -> Vec<WriteOp> {
        self.state
            .lock()
            .unwrap()
            .writes
            .iter()
            .filter(|record| record.kind == kind)
            .map(|record| record.op.clone())
            .collect()
    }

    /// Accepted writes to one session, in order
    pub fn session_ops(&self, session: SessionId) -> Vec<(EffectKind, WriteOp)> {
        self.state
            .lock()
            .unwrap()
            .writes
            .iter()
            .filter(|record| record.session == session)
            .map(|record| (record.kind, record.op.clone()))
            .collect()
    }

    /// Forget recorded writes, keeping live handles and failure settings
    pub fn clear_writes(&self) {
        self.state.lock().unwrap().writes.clear();
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectEngine for MockEngine {
    fn create_effect(&self, kind: EffectKind, session: SessionId) -> Result<Box<dyn EffectHandle>> {
        let mut state = self.state.lock().unwrap();
        if state.fail_creation.contains(&kind) {
            return Err(EffectError::creation(kind, session, "injected failure"));
        }
        state.created.push((kind, session));
        state.live += 1;
        Ok(Box::new(MockHandle {
            kind,
            session,
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockHandle {
    kind: EffectKind,
    session: SessionId,
    state: Arc<Mutex<EngineState>>,
}

impl MockHandle {
    fn record(&self, op: WriteOp) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_ops.contains(&self.kind) || state.fail_sessions.contains(&self.session) {
            return Err(EffectError::apply(self.kind, "write", "injected failure"));
        }
        state.writes.push(WriteRecord {
            session: self.session,
            kind: self.kind,
            op,
        });
        Ok(())
    }
}

impl EffectHandle for MockHandle {
    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.record(WriteOp::Enabled(enabled))
    }

    fn set_parameter(&mut self, param: &[u8], value: &[u8]) -> Result<()> {
        self.record(WriteOp::Parameter(param.to_vec(), value.to_vec()))
    }

    fn strength_supported(&self) -> bool {
        matches!(self.kind, EffectKind::BassBoost | EffectKind::Virtualizer)
            && self.state.lock().unwrap().strength_supported
    }

    fn set_strength(&mut self, strength: u16) -> Result<()> {
        self.record(WriteOp::Strength(strength))
    }

    fn set_band_level(&mut self, band: u16, level: i16) -> Result<()> {
        self.record(WriteOp::BandLevel(band, level))
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.state.lock().unwrap().live -= 1;
    }
}
