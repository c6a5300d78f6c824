//! Core types for the dexter catalog engine
//!
//! This crate provides the foundational pieces shared by every other crate
//! in the workspace:
//!
//! - **Models**: index entries, joined catalog entities, detail records and filter criteria
//! - **Configuration**: layered loading of upstream, catalog and server settings
//! - **Error handling**: the unified error taxonomy
//!

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod models;

// Re-export main types for convenience
pub use config::{CatalogConfig, Config, ServerConfig, UpstreamConfig};
pub use error::{Error, Result};
pub use models::{
    CatalogEntity, DetailRecord, EvolutionStage, FilterCriteria, IndexEntry, FALLBACK_SPRITE_URL,
};
