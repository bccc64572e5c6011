//! Command implementations, one module per store.

pub mod cart;
pub mod catalog;
pub mod session;

use std::sync::Arc;

use shopsync_client::{
    CartStore, CatalogStore, ClientConfig, FileBackend, GraphqlApi, LocalStore, SessionStore,
};

/// The wired-up stores behind every command.
///
/// All three stores share one file-backed [`LocalStore`] rooted at the
/// configured data directory, so state persists across invocations.
pub struct App {
    pub session: SessionStore,
    pub catalog: CatalogStore,
    pub cart: CartStore,
}

impl App {
    /// Build the stores from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or invalid, the data
    /// directory cannot be created, or persisted state cannot be read.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = ClientConfig::from_env()?;
        let backend = Arc::new(FileBackend::open(&config.data_dir)?);
        let storage = LocalStore::new(backend);
        let remote = Arc::new(GraphqlApi::new(&config)?);

        let session = SessionStore::new(
            storage.clone(),
            remote.clone(),
            config.default_avatar.clone(),
        );
        let catalog = CatalogStore::new(
            storage.clone(),
            remote,
            config.category_policy.clone(),
        )?;
        let cart = CartStore::new(storage)?;

        Ok(Self {
            session,
            catalog,
            cart,
        })
    }
}
