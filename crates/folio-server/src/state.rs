//! Application state management.
//!
//! This module defines the shared state that is passed to all request handlers.

use folio_api::AuthState;

use crate::config::ServerConfig;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,

    /// Auth core: secret store, key issuer and key cache.
    pub auth: AuthState,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub const fn new(config: ServerConfig, auth: AuthState) -> Self {
        Self { config, auth }
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the auth state.
    #[must_use]
    pub const fn auth(&self) -> &AuthState {
        &self.auth
    }
}
