//! Configuration for the built-in registration pass
//!
//! Loaded from TOML (or built in code) and handed to
//! [`crate::runtime::stdlib::load_builtins`].

pub mod types;

pub use types::*;
