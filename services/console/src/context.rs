//! services/console/src/context.rs
//!
//! Defines the shared state every command handler runs against.

use crate::adapters::HttpProfileAdapter;
use crate::config::Config;
use crate::error::ConsoleError;
use roster_core::ports::PhotoRepository;
use roster_core::store::{ProfileStore, StoreOptions};
use std::sync::Arc;

//=========================================================================================
// AppContext (Shared Across All Commands)
//=========================================================================================

/// Created once at startup and handed to the command handlers.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub store: Arc<ProfileStore>,
    pub photos: Arc<dyn PhotoRepository>,
}

impl AppContext {
    /// Wires the HTTP adapter into both the profile store and the photo port.
    pub fn from_config(config: Arc<Config>) -> Result<Self, ConsoleError> {
        let adapter = Arc::new(HttpProfileAdapter::new(
            config.api_base_url.clone(),
            config.request_timeout,
        )?);
        let store = Arc::new(ProfileStore::new(
            adapter.clone(),
            StoreOptions {
                request_timeout: config.request_timeout,
            },
        ));
        Ok(Self {
            config,
            store,
            photos: adapter,
        })
    }
}
