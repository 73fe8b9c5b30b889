//! Integration test utilities for the auth server
//!
//! Spawns the full HTTP stack on in-memory storage and drives it over real
//! sockets with reqwest.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
