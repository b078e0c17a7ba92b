//! Editorial scheduling API server library.
//!
//! Exposes the building blocks (config, state, error handling, bridges,
//! routes) so integration tests and the binary entrypoint can both access
//! them.

pub mod bridge;
pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
