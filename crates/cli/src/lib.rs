//! Library interface for the dexter CLI
//!
//! Rendering and progress helpers live here so integration tests can drive
//! them without spawning the binary.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod output;
pub mod progress;

// Re-export commonly needed types for tests
pub use anyhow::Result;
pub use dexter_core::config::Config;
