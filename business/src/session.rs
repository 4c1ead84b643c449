//! Session token storage.
//!
//! The token is opaque to this client: no format or expiry checks are done
//! here. An expired token is only discovered when the server rejects a call.

use std::sync::Arc;

use log::{info, warn};

use crate::error::{DashboardError, StoreError};
use crate::storage::KeyValueStore;

/// Storage key of the session token.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    token: Option<String>,
}

impl SessionStore {
    /// Rehydrate the session from durable storage.
    ///
    /// An unreadable store yields a signed-out session.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let token = match store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                warn!("Failed to read session token: {err}");
                None
            }
        };
        Self { store, token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The token, or [`DashboardError::MissingCredentials`] when signed out.
    pub fn require_token(&self) -> Result<&str, DashboardError> {
        self.token().ok_or(DashboardError::MissingCredentials)
    }

    pub fn set_token(&mut self, token: impl Into<String>) -> Result<(), StoreError> {
        let token = token.into();
        self.store.set(TOKEN_KEY, &token)?;
        self.token = Some(token);
        info!("Session token stored");
        Ok(())
    }

    /// Drop the token from memory and from storage.
    ///
    /// The in-memory token is cleared even when the storage write fails.
    pub fn clear_token(&mut self) -> Result<(), StoreError> {
        self.token = None;
        self.store.remove(TOKEN_KEY)?;
        info!("Session token cleared");
        Ok(())
    }
}
