// In-memory TransientStore
//
// One mutex guards the whole map, so every update is a single critical
// section.

use crate::error::Result;
use crate::port::{Rewrite, TimeProvider, Transient, TransientStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct State {
    entries: HashMap<String, Transient>,
    // Store-wide so a recreated key never repeats an old version
    revision: u64,
}

impl State {
    fn live(&self, key: &str, now: i64) -> Option<&Transient> {
        self.entries.get(key).filter(|t| t.expires_at > now)
    }

    fn write(&mut self, key: &str, value: &str, expires_at: i64) {
        self.revision += 1;
        self.entries.insert(
            key.to_string(),
            Transient {
                value: value.to_string(),
                version: self.revision,
                expires_at,
            },
        );
    }
}

pub struct MemoryTransientStore {
    state: Mutex<State>,
    time_provider: Arc<dyn TimeProvider>,
}

impl MemoryTransientStore {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            time_provider,
        }
    }
}

#[async_trait]
impl TransientStore for MemoryTransientStore {
    async fn get(&self, key: &str) -> Result<Option<Transient>> {
        let now = self.time_provider.now_millis();
        let state = self.state.lock().await;
        Ok(state.live(key, now).cloned())
    }

    async fn set(&self, key: &str, value: &str, ttl_ms: i64) -> Result<()> {
        let now = self.time_provider.now_millis();
        let mut state = self.state.lock().await;
        state.write(key, value, now.saturating_add(ttl_ms));
        Ok(())
    }

    async fn update(&self, key: &str, ttl_ms: i64, rewrite: &mut Rewrite<'_>) -> Result<bool> {
        let now = self.time_provider.now_millis();
        let mut state = self.state.lock().await;

        let current = state.live(key, now).map(|t| t.value.as_str());
        let Some(value) = rewrite(current)? else {
            return Ok(false);
        };

        state.write(key, &value, now.saturating_add(ttl_ms));
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let now = self.time_provider.now_millis();
        let mut state = self.state.lock().await;
        Ok(state
            .entries
            .remove(key)
            .is_some_and(|t| t.expires_at > now))
    }

    async fn purge_expired(&self) -> Result<u64> {
        let now = self.time_provider.now_millis();
        let mut state = self.state.lock().await;
        let before = state.entries.len();
        state.entries.retain(|_, t| t.expires_at > now);
        Ok((before - state.entries.len()) as u64)
    }
}
