//! Core library components.
//!
//! Everything here is independent of the terminal: commands in `cli` build a
//! [`workspace::Workspace`] and call into these modules.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod files;
pub mod identity;
pub mod keys;
pub mod manifest;
pub mod prompt;
pub mod protect;
pub mod reencrypt;
pub mod repo;
pub mod status;
pub mod store;
pub mod types;
pub mod workflow;
pub mod workspace;
