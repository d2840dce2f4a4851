//! Per-user wizard sessions and the store that owns them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Opaque user identifier (the Telegram user id)
pub type UserKey = i64;

/// Position of a user inside the quote wizard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    #[default]
    Idle,
    ChoosingType,
    ChoosingExtras,
    AwaitingArea,
}

/// In-progress selections of one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserKey,
    pub step: WizardStep,
    pub base_type_key: Option<String>,
    /// Selected add-on keys in the order they were picked, without duplicates
    pub selected_extra_keys: Vec<String>,
    pub area: Option<f64>,
}

impl Session {
    pub fn new(user_id: UserKey) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    /// Back to `Idle` with every selection cleared
    pub fn clear(&mut self) {
        *self = Session::new(self.user_id);
    }

    /// Add the key if absent, remove it if present.
    /// Returns whether the key is selected afterwards.
    pub fn toggle_extra(&mut self, key: &str) -> bool {
        if let Some(pos) = self.selected_extra_keys.iter().position(|k| k == key) {
            self.selected_extra_keys.remove(pos);
            false
        } else {
            self.selected_extra_keys.push(key.to_string());
            true
        }
    }

    pub fn is_extra_selected(&self, key: &str) -> bool {
        self.selected_extra_keys.iter().any(|k| k == key)
    }
}

/// Keyed session storage. Every user id maps to exactly one session.
pub trait SessionStore: Send + Sync {
    /// Existing session, or a fresh idle one
    fn get(&self, user_id: UserKey) -> Session;

    /// Drop all stored selections for the user
    fn reset(&self, user_id: UserKey);

    /// Apply a mutation atomically with respect to other calls for the same user
    /// and return the resulting session.
    fn update<F>(&self, user_id: UserKey, mutator: F) -> Session
    where
        F: FnOnce(&mut Session);
}

/// Session store held in process memory. Sessions do not survive restarts.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<UserKey, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserKey, Session>> {
        // A panic inside a mutator cannot leave a session half-written, so the map stays usable.
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, user_id: UserKey) -> Session {
        self.lock()
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| Session::new(user_id))
    }

    fn reset(&self, user_id: UserKey) {
        self.lock().remove(&user_id);
    }

    fn update<F>(&self, user_id: UserKey, mutator: F) -> Session
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.lock();
        let mut session = sessions
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| Session::new(user_id));

        mutator(&mut session);

        if session.step == WizardStep::Idle {
            sessions.remove(&user_id);
        } else {
            sessions.insert(user_id, session.clone());
        }
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_fresh_idle_session() {
        let store = InMemorySessionStore::new();
        let session = store.get(7);

        assert_eq!(session.user_id, 7);
        assert_eq!(session.step, WizardStep::Idle);
        assert!(session.base_type_key.is_none());
        assert!(session.selected_extra_keys.is_empty());
        assert!(session.area.is_none());
    }

    #[test]
    fn test_update_persists_and_reset_clears() {
        let store = InMemorySessionStore::new();

        let updated = store.update(7, |s| {
            s.step = WizardStep::ChoosingExtras;
            s.base_type_key = Some("general_cleaning".to_string());
            s.toggle_extra("fridge_price");
        });
        assert_eq!(store.get(7), updated);
        assert_eq!(store.len(), 1);

        store.reset(7);
        assert_eq!(store.get(7), Session::new(7));
        assert!(store.is_empty());
    }

    #[test]
    fn test_sessions_are_isolated_per_user() {
        let store = InMemorySessionStore::new();
        store.update(1, |s| s.step = WizardStep::ChoosingType);

        assert_eq!(store.get(1).step, WizardStep::ChoosingType);
        assert_eq!(store.get(2).step, WizardStep::Idle);
    }

    #[test]
    fn test_toggle_keeps_insertion_order() {
        let mut session = Session::new(1);
        assert!(session.toggle_extra("oven_price"));
        assert!(session.toggle_extra("windows_price"));
        assert!(session.toggle_extra("fridge_price"));
        assert!(!session.toggle_extra("windows_price"));

        assert_eq!(session.selected_extra_keys, vec!["oven_price", "fridge_price"]);
    }
}
