//! Local mirror of the accounts created from this client.
//!
//! The server exposes no endpoint to list accounts, so the client remembers
//! the ones it created. The registry is updated only after the server accepted
//! a create or delete call, and every mutation rewrites the full persisted
//! snapshot (last writer wins).

use std::sync::Arc;

use log::warn;

use crate::error::StoreError;
use crate::models::LocalUser;
use crate::storage::KeyValueStore;

/// Storage key of the serialized registry.
pub const LOCAL_USERS_KEY: &str = "localUsers";

#[derive(Debug, Clone)]
pub struct UserRegistry {
    store: Arc<dyn KeyValueStore>,
    users: Vec<LocalUser>,
}

impl UserRegistry {
    /// Rehydrate the registry from durable storage.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let users = Self::read_snapshot(store.as_ref());
        Self { store, users }
    }

    /// Read the persisted snapshot. Absent or unparsable data reads as empty.
    pub fn read_snapshot(store: &dyn KeyValueStore) -> Vec<LocalUser> {
        let raw = match store.get(LOCAL_USERS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("Failed to read local users: {err}");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("Ignoring unparsable local users snapshot: {err}");
            Vec::new()
        })
    }

    pub fn users(&self) -> &[LocalUser] {
        &self.users
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.users.iter().any(|u| u.email == email)
    }

    /// Append a user. Duplicate emails are not rejected.
    pub fn append(&mut self, user: LocalUser) -> Result<(), StoreError> {
        self.users.push(user);
        self.persist()
    }

    /// Remove every entry with this email.
    pub fn remove(&mut self, email: &str) -> Result<(), StoreError> {
        self.users.retain(|u| u.email != email);
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let snapshot =
            serde_json::to_string(&self.users).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.store.set(LOCAL_USERS_KEY, &snapshot)
    }
}
