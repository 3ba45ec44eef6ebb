//! # Common Components
//!
//! Shared utilities used by both the `hide` and `reveal` binaries.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration parsing
//! - [`logging`]: Log formatting and level selection

pub mod config;
pub mod logging;
