//! Bookkeeping for live session chains

use clef_core::SessionId;
use clef_effects::EffectChain;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One registered session: its chain plus the sequence number of the
/// newest push that has reached it
pub(crate) struct SessionSlot {
    pub chain: EffectChain,
    pub last_push: u64,
}

impl SessionSlot {
    pub fn new(chain: EffectChain) -> Self {
        Self {
            chain,
            last_push: 0,
        }
    }
}

/// Live sessions keyed by id
///
/// Slots are individually locked so pushes to different sessions never
/// serialize on each other.
#[derive(Default)]
pub(crate) struct SessionRegistry {
    slots: HashMap<SessionId, Arc<Mutex<SessionSlot>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    pub fn contains(&self, session: SessionId) -> bool {
        self.slots.contains_key(&session)
    }

    pub fn insert(&mut self, session: SessionId, chain: EffectChain) -> Arc<Mutex<SessionSlot>> {
        let slot = Arc::new(Mutex::new(SessionSlot::new(chain)));
        self.slots.insert(session, Arc::clone(&slot));
        slot
    }

    pub fn remove(&mut self, session: SessionId) -> Option<Arc<Mutex<SessionSlot>>> {
        self.slots.remove(&session)
    }

    /// Clone out every slot for a broadcast pass
    pub fn snapshot(&self) -> Vec<(SessionId, Arc<Mutex<SessionSlot>>)> {
        self.slots
            .iter()
            .map(|(session, slot)| (*session, Arc::clone(slot)))
            .collect()
    }

    /// Empty the registry, handing back every slot
    pub fn drain(&mut self) -> Vec<(SessionId, Arc<Mutex<SessionSlot>>)> {
        self.slots.drain().collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
