//! Routing-driven control of every live session chain
//!
//! [`EffectManager`] is the single entry point the host wires its callbacks
//! into: session open/close, routing signal edges, stored preference
//! changes and the transient equalizer override. All shared state sits
//! behind one mutex; pushes are staged under that lock and run against the
//! per-slot locks after it is dropped, so a slow backend write never stalls
//! the next signal.

use crate::error::{ManagerError, Result};
use crate::registry::{SessionRegistry, SessionSlot};
use clef_core::{ChainSettings, ConfigStore, RouteMode, RouteSignal, RouteSignals, SessionId};
use clef_effects::{EffectChain, EffectEngine};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Active,
    ShutDown,
}

struct ManagerState {
    signals: RouteSignals,
    override_levels: Option<Vec<f32>>,
    registry: SessionRegistry,
    /// Route whose profile the sessions currently hold; `None` until the
    /// first push
    applied_mode: Option<RouteMode>,
    next_push: u64,
    lifecycle: Lifecycle,
}

impl ManagerState {
    fn new() -> Self {
        Self {
            signals: RouteSignals::default(),
            override_levels: None,
            registry: SessionRegistry::new(),
            applied_mode: None,
            next_push: 0,
            lifecycle: Lifecycle::Active,
        }
    }

    fn check_active(&self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Active => Ok(()),
            Lifecycle::ShutDown => Err(ManagerError::ShutDown),
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.next_push += 1;
        self.next_push
    }
}

/// A push staged under the state lock, run after it is dropped
struct StagedPush {
    seq: u64,
    settings: ChainSettings,
    targets: Vec<(SessionId, Arc<Mutex<SessionSlot>>)>,
}

/// Owns the session registry and decides what every chain should hold
///
/// The manager is `Sync`; the host may call it from any thread. Methods
/// return [`ManagerError::ShutDown`] once [`shutdown`](Self::shutdown) has
/// run.
pub struct EffectManager {
    engine: Arc<dyn EffectEngine>,
    store: Arc<dyn ConfigStore>,
    state: Mutex<ManagerState>,
}

impl EffectManager {
    /// Create a manager over an effect backend and a configuration store
    pub fn new(engine: Arc<dyn EffectEngine>, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            engine,
            store,
            state: Mutex::new(ManagerState::new()),
        }
    }

    /// Record a routing signal edge and repush if the route changed
    ///
    /// Reporting a signal at its current value is a no-op. When the edge
    /// does not change the winning route (say USB attaching while a headset
    /// is up) nothing is pushed either.
    ///
    /// # Errors
    /// Returns `ShutDown` after [`shutdown`](Self::shutdown)
    pub fn signal_changed(&self, signal: RouteSignal, active: bool) -> Result<()> {
        let staged = {
            let mut state = self.state.lock().unwrap();
            state.check_active()?;

            if state.signals.get(signal) == active {
                debug!("Signal {:?} already {}, ignoring", signal, active);
                return Ok(());
            }
            state.signals.set(signal, active);

            let mode = state.signals.resolve();
            if state.applied_mode == Some(mode) {
                debug!("Signal {:?} changed but route stays {}, no push", signal, mode);
                return Ok(());
            }

            info!("Route changed to {}", mode);
            self.stage_push(&mut state, mode)
        };
        run_push(staged);
        Ok(())
    }

    /// Repush the current route's profile after stored preferences changed
    ///
    /// Always pushes: the route is unchanged but its stored values are not.
    ///
    /// # Errors
    /// Returns `ShutDown` after [`shutdown`](Self::shutdown)
    pub fn preferences_changed(&self) -> Result<()> {
        let staged = {
            let mut state = self.state.lock().unwrap();
            state.check_active()?;

            let mode = state.signals.resolve();
            info!("Preferences changed, repushing {} profile", mode);
            self.stage_push(&mut state, mode)
        };
        run_push(staged);
        Ok(())
    }

    /// Set or clear the transient equalizer curve override
    ///
    /// While set, the override replaces the stored equalizer curve in every
    /// push. Clearing it repushes the stored curve. Used for live preview
    /// while the user drags a band.
    ///
    /// # Errors
    /// Returns `ShutDown` after [`shutdown`](Self::shutdown)
    pub fn set_equalizer_override(&self, levels: Option<Vec<f32>>) -> Result<()> {
        let staged = {
            let mut state = self.state.lock().unwrap();
            state.check_active()?;

            match &levels {
                Some(levels) => debug!("Equalizer override set: {:?}", levels),
                None => debug!("Equalizer override cleared"),
            }
            state.override_levels = levels;

            let mode = state.signals.resolve();
            self.stage_push(&mut state, mode)
        };
        run_push(staged);
        Ok(())
    }

    /// Attach a chain to a newly opened audio session
    ///
    /// The new chain immediately receives the current route's profile.
    /// Other sessions are left alone. Opening an id that is already open is
    /// ignored.
    ///
    /// # Errors
    /// Returns `ShutDown` after [`shutdown`](Self::shutdown), or the
    /// backend's creation failure, in which case nothing stays registered
    pub fn session_opened(&self, session: SessionId) -> Result<()> {
        {
            let state = self.state.lock().unwrap();
            state.check_active()?;
            if state.registry.contains(session) {
                debug!("Session {} already open, ignoring", session);
                return Ok(());
            }
        }

        // Created outside the lock: backends may block in effect
        // construction, and a slow create must not stall signal handling.
        let mut chain = EffectChain::create(self.engine.as_ref(), session).map_err(|err| {
            error!("Failed to create effect chain for session {}: {}", session, err);
            err
        })?;

        let (slot, seq, settings) = {
            let mut state = self.state.lock().unwrap();
            // Revalidate: the world may have moved while we were creating
            if state.check_active().is_err() {
                drop(state);
                chain.release();
                return Err(ManagerError::ShutDown);
            }
            if state.registry.contains(session) {
                drop(state);
                chain.release();
                debug!("Session {} opened twice, keeping the first chain", session);
                return Ok(());
            }

            let slot = state.registry.insert(session, chain);
            let mode = state.signals.resolve();
            state.applied_mode = Some(mode);
            let seq = state.next_seq();
            let settings = self.compute_settings(&state, mode);
            info!("Session {} opened, applying {} profile", session, mode);
            (slot, seq, settings)
        };

        apply_to_slot(session, &slot, seq, &settings);
        Ok(())
    }

    /// Release the chain of a closed audio session
    ///
    /// Closing an id that is not open is ignored.
    ///
    /// # Errors
    /// Returns `ShutDown` after [`shutdown`](Self::shutdown)
    pub fn session_closed(&self, session: SessionId) -> Result<()> {
        let removed = {
            let mut state = self.state.lock().unwrap();
            state.check_active()?;
            state.registry.remove(session)
        };

        match removed {
            Some(slot) => {
                slot.lock().unwrap().chain.release();
                info!("Session {} closed, chain released", session);
            }
            None => debug!("Session {} not open, close ignored", session),
        }
        Ok(())
    }

    /// The route the current signals resolve to
    pub fn current_route(&self) -> RouteMode {
        self.state.lock().unwrap().signals.resolve()
    }

    /// Number of sessions with a live chain
    pub fn session_count(&self) -> usize {
        self.state.lock().unwrap().registry.len()
    }

    /// Release every chain and refuse further work
    ///
    /// # Errors
    /// Returns `ShutDown` when called a second time
    pub fn shutdown(&self) -> Result<()> {
        let drained = {
            let mut state = self.state.lock().unwrap();
            state.check_active()?;
            state.lifecycle = Lifecycle::ShutDown;
            state.registry.drain()
        };

        info!("Shutting down, releasing {} chain(s)", drained.len());
        for (_, slot) in drained {
            slot.lock().unwrap().chain.release();
        }
        Ok(())
    }

    /// Stage a push to every live session; must run under the state lock
    fn stage_push(&self, state: &mut ManagerState, mode: RouteMode) -> StagedPush {
        state.applied_mode = Some(mode);
        let seq = state.next_seq();
        let settings = self.compute_settings(state, mode);
        let targets = state.registry.snapshot();
        debug!("Push {}: {} profile to {} session(s)", seq, mode, targets.len());
        StagedPush {
            seq,
            settings,
            targets,
        }
    }

    fn compute_settings(&self, state: &ManagerState, mode: RouteMode) -> ChainSettings {
        let mut settings = self.store.load(mode);
        if let Some(levels) = &state.override_levels {
            settings.equalizer_levels = levels.clone();
        }
        settings
    }
}

fn run_push(staged: StagedPush) {
    for (session, slot) in &staged.targets {
        apply_to_slot(*session, slot, staged.seq, &staged.settings);
    }
}

/// Apply a snapshot to one slot unless a newer push already reached it
fn apply_to_slot(
    session: SessionId,
    slot: &Mutex<SessionSlot>,
    seq: u64,
    settings: &ChainSettings,
) {
    let mut slot = slot.lock().unwrap();
    if slot.last_push > seq {
        debug!("Session {}: push {} superseded, skipping", session, seq);
        return;
    }
    slot.last_push = seq;

    if slot.chain.is_released() {
        return;
    }
    if let Err(err) = slot.chain.apply(settings) {
        warn!("Failed to apply settings on session {}: {}", session, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clef_core::prefs::keys;
    use clef_core::{MemoryConfigStore, Preferences};
    use clef_effects::mock::{MockEngine, WriteOp};
    use clef_effects::EffectKind;

    fn manager(engine: &MockEngine, store: MemoryConfigStore) -> EffectManager {
        EffectManager::new(Arc::new(engine.clone()), Arc::new(store))
    }

    fn headset_bass_store() -> MemoryConfigStore {
        let store = MemoryConfigStore::new();
        let mut prefs = Preferences::new();
        prefs.set_bool(keys::BASS_ENABLE, true);
        prefs.set_text(keys::BASS_MODE, "600");
        store.set_profile(RouteMode::Headset, prefs);
        store
    }

    fn band_levels(engine: &MockEngine) -> Vec<i16> {
        engine
            .writes_for(EffectKind::Equalizer)
            .into_iter()
            .filter_map(|op| match op {
                WriteOp::BandLevel(_, level) => Some(level),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn same_signal_value_is_ignored() {
        let engine = MockEngine::new();
        let manager = manager(&engine, MemoryConfigStore::new());
        manager.session_opened(SessionId(1)).unwrap();
        engine.clear_writes();

        manager
            .signal_changed(RouteSignal::HeadsetConnected, false)
            .unwrap();

        assert!(engine.writes().is_empty());
        assert_eq!(manager.current_route(), RouteMode::Speaker);
    }

    #[test]
    fn route_change_pushes_the_new_profile() {
        let engine = MockEngine::new();
        let manager = manager(&engine, headset_bass_store());
        manager.session_opened(SessionId(1)).unwrap();
        engine.clear_writes();

        manager
            .signal_changed(RouteSignal::HeadsetConnected, true)
            .unwrap();

        assert_eq!(manager.current_route(), RouteMode::Headset);
        assert!(engine
            .writes_for(EffectKind::BassBoost)
            .contains(&WriteOp::Strength(600)));
    }

    #[test]
    fn edge_that_keeps_the_route_pushes_nothing() {
        let engine = MockEngine::new();
        let manager = manager(&engine, headset_bass_store());
        manager.session_opened(SessionId(1)).unwrap();
        manager
            .signal_changed(RouteSignal::HeadsetConnected, true)
            .unwrap();
        engine.clear_writes();

        // USB attaching loses to the headset, so nothing moves
        manager
            .signal_changed(RouteSignal::UsbConnected, true)
            .unwrap();
        assert!(engine.writes().is_empty());
        assert_eq!(manager.current_route(), RouteMode::Headset);

        // Unplugging the headset hands the route to USB
        manager
            .signal_changed(RouteSignal::HeadsetConnected, false)
            .unwrap();
        assert_eq!(manager.current_route(), RouteMode::Usb);
        assert!(!engine.writes().is_empty());
    }

    #[test]
    fn a_call_suspends_processing() {
        let engine = MockEngine::new();
        let manager = manager(&engine, headset_bass_store());
        manager
            .signal_changed(RouteSignal::HeadsetConnected, true)
            .unwrap();
        manager.session_opened(SessionId(1)).unwrap();
        engine.clear_writes();

        manager
            .signal_changed(RouteSignal::CallActive, true)
            .unwrap();

        assert_eq!(manager.current_route(), RouteMode::Disabled);
        assert_eq!(
            engine.writes_for(EffectKind::BassBoost),
            vec![WriteOp::Enabled(false), WriteOp::Strength(0)]
        );
    }

    #[test]
    fn preference_change_always_pushes() {
        let engine = MockEngine::new();
        let manager = manager(&engine, MemoryConfigStore::new());
        manager.session_opened(SessionId(1)).unwrap();
        engine.clear_writes();

        // Route is still speaker; the push happens anyway
        manager.preferences_changed().unwrap();

        assert!(!engine.writes().is_empty());
        assert_eq!(manager.current_route(), RouteMode::Speaker);
    }

    #[test]
    fn open_pushes_only_to_the_new_session() {
        let engine = MockEngine::new();
        let manager = manager(&engine, MemoryConfigStore::new());
        manager.session_opened(SessionId(1)).unwrap();
        engine.clear_writes();

        manager.session_opened(SessionId(2)).unwrap();

        assert!(engine.session_ops(SessionId(1)).is_empty());
        assert!(!engine.session_ops(SessionId(2)).is_empty());
        assert_eq!(manager.session_count(), 2);
    }

    #[test]
    fn duplicate_open_is_ignored() {
        let engine = MockEngine::new();
        let manager = manager(&engine, MemoryConfigStore::new());

        manager.session_opened(SessionId(1)).unwrap();
        manager.session_opened(SessionId(1)).unwrap();

        assert_eq!(manager.session_count(), 1);
        assert_eq!(engine.live_handles(), 4);
    }

    #[test]
    fn unknown_close_is_ignored() {
        let engine = MockEngine::new();
        let manager = manager(&engine, MemoryConfigStore::new());

        manager.session_closed(SessionId(99)).unwrap();
        assert_eq!(manager.session_count(), 0);
    }

    #[test]
    fn close_releases_the_chain() {
        let engine = MockEngine::new();
        let manager = manager(&engine, MemoryConfigStore::new());
        manager.session_opened(SessionId(1)).unwrap();
        assert_eq!(engine.live_handles(), 4);

        manager.session_closed(SessionId(1)).unwrap();

        assert_eq!(engine.live_handles(), 0);
        assert_eq!(manager.session_count(), 0);
    }

    #[test]
    fn creation_failure_leaves_nothing_registered() {
        let engine = MockEngine::new();
        engine.fail_creation(EffectKind::Equalizer);
        let manager = manager(&engine, MemoryConfigStore::new());

        let err = manager.session_opened(SessionId(1)).unwrap_err();

        assert!(matches!(err, ManagerError::Effect(_)));
        assert_eq!(manager.session_count(), 0);
        assert_eq!(engine.live_handles(), 0);
    }

    #[test]
    fn override_replaces_the_curve_until_cleared() {
        let engine = MockEngine::new();
        let store = MemoryConfigStore::new();
        let mut prefs = Preferences::new();
        prefs.set_bool(keys::TONE_ENABLE, true);
        prefs.set_text(keys::TONE_EQ, "0;0;0;0;0");
        prefs.set_bool(keys::BASS_ENABLE, true);
        prefs.set_text(keys::BASS_MODE, "600");
        store.set_profile(RouteMode::Headset, prefs);

        let manager = manager(&engine, store);
        manager
            .signal_changed(RouteSignal::HeadsetConnected, true)
            .unwrap();
        manager.session_opened(SessionId(1)).unwrap();
        engine.clear_writes();

        manager
            .set_equalizer_override(Some(vec![1.5, -2.0, 0.0, 0.0, 0.0]))
            .unwrap();

        assert_eq!(band_levels(&engine), vec![150, -200, 0, 0, 0]);
        // The rest of the profile rides along untouched
        assert!(engine
            .writes_for(EffectKind::BassBoost)
            .contains(&WriteOp::Strength(600)));

        engine.clear_writes();
        manager.set_equalizer_override(None).unwrap();

        assert_eq!(band_levels(&engine), vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn shutdown_releases_everything_and_sticks() {
        let engine = MockEngine::new();
        let manager = manager(&engine, MemoryConfigStore::new());
        manager.session_opened(SessionId(1)).unwrap();
        manager.session_opened(SessionId(2)).unwrap();
        assert_eq!(engine.live_handles(), 8);

        manager.shutdown().unwrap();

        assert_eq!(engine.live_handles(), 0);
        assert_eq!(manager.session_count(), 0);
        assert!(matches!(manager.shutdown(), Err(ManagerError::ShutDown)));
        assert!(matches!(
            manager.session_opened(SessionId(3)),
            Err(ManagerError::ShutDown)
        ));
        assert!(matches!(
            manager.session_closed(SessionId(1)),
            Err(ManagerError::ShutDown)
        ));
        assert!(matches!(
            manager.signal_changed(RouteSignal::CallActive, true),
            Err(ManagerError::ShutDown)
        ));
        assert!(matches!(
            manager.preferences_changed(),
            Err(ManagerError::ShutDown)
        ));
        assert!(matches!(
            manager.set_equalizer_override(None),
            Err(ManagerError::ShutDown)
        ));
    }

    #[test]
    fn one_failing_session_does_not_stop_the_broadcast() {
        let engine = MockEngine::new();
        let manager = manager(&engine, MemoryConfigStore::new());
        for id in [1, 2, 3] {
            manager.session_opened(SessionId(id)).unwrap();
        }
        engine.fail_session_ops(SessionId(2));
        engine.clear_writes();

        manager.preferences_changed().unwrap();

        assert!(!engine.session_ops(SessionId(1)).is_empty());
        assert!(engine.session_ops(SessionId(2)).is_empty());
        assert!(!engine.session_ops(SessionId(3)).is_empty());
    }
}
