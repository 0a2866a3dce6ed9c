//! Bookshelf API server library.
//!
//! Exposes the building blocks (config, state, portal, error handling,
//! routes) so integration tests and the binary entrypoint can both access
//! them.

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod portal;
pub mod router;
pub mod routes;
pub mod state;
pub mod templates;
