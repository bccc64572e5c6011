//! The three collaborating stores.
//!
//! Each store is constructed once per process/session, owns its persisted
//! keys exclusively, and is injected into whatever needs it rather than
//! reached through ambient singleton access.

mod cart;
mod catalog;
mod session;

pub use cart::CartStore;
pub use catalog::{CatalogProduct, CatalogStore};
pub use session::SessionStore;
