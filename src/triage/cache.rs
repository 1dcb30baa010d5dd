//! Bounded draft cache for the summarizer.
//!
//! Keys are SHA-256 digests of the model tag plus the normalized prompt
//! payload, so identical resubmissions skip the oracle round-trip. Capacity
//! is fixed; the oldest entry is evicted first. The cache lives next to the
//! oracle adapter only — the rule engine and the state machine never see it.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use super::types::SummaryDraft;

/// Cache key: hex SHA-256 of (model, prompt payload).
pub fn draft_cache_key(model: &str, prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update(b"\x00");
    hasher.update(prompt.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Fixed-capacity insert-order cache.
pub struct DraftCache {
    capacity: usize,
    entries: Mutex<CacheState>,
}

struct CacheState {
    map: HashMap<String, SummaryDraft>,
    order: VecDeque<String>,
}

impl DraftCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(CacheState {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<SummaryDraft> {
        let state = self.entries.lock().expect("draft cache lock");
        state.map.get(key).cloned()
    }

    /// Insert a draft, evicting the oldest entry when full. Re-inserting an
    /// existing key refreshes the value without growing the cache.
    pub fn insert(&self, key: String, draft: SummaryDraft) {
        let mut state = self.entries.lock().expect("draft cache lock");
        if state.map.insert(key.clone(), draft).is_none() {
            state.order.push_back(key);
            if state.order.len() > self.capacity {
                if let Some(evicted) = state.order.pop_front() {
                    state.map.remove(&evicted);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("draft cache lock").map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
