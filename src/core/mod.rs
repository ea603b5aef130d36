//! Core building blocks for the release pipeline
//!
//! - **config**: shipway.toml parsing with full defaults
//! - **error**: failure taxonomy with exit codes and help messages
//! - **exec**: opaque external-command capability
//! - **session**: request/session state and the tier switch
//! - **vcs**: system-git operations

pub mod config;
pub mod error;
pub mod exec;
pub mod session;
pub mod vcs;
