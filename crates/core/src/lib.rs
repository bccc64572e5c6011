//! Shopsync Core - Shared domain types.
//!
//! This crate provides the common types used across all shopsync components:
//! - `client` - The state synchronization layer (session, catalog, cart)
//! - `cli` - Command-line collaborator exercising the operation surface
//!
//! # Architecture
//!
//! The core crate contains only types and helpers - no I/O, no HTTP clients,
//! no storage access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, categories, cart lines, users, and auth tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
