//! Server configuration, shared state, and initialization.

pub mod config;
pub mod init;
pub mod state;
