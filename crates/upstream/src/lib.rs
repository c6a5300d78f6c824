//! Remote resource client for the upstream catalog API
//!
//! This crate issues GET requests against the upstream resource families
//! (entity index, entity detail, species, evolution chain, taxonomy lists)
//! and parses the JSON bodies into the typed records in [`wire`]. It is
//! stateless: no retries and no caching happen at this layer.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use async_trait::async_trait;
use dexter_core::config::UpstreamConfig;
use dexter_core::error::Result;
use std::sync::Arc;
use tracing::info;

mod http;
pub mod mock;
pub mod wire;

pub use http::HttpResourceClient;
pub use mock::MockResourceClient;
pub use wire::{ChainLink, EntityDetail, EvolutionChainRecord, IndexPage, SpeciesRecord};

/// Trait for upstream resource clients
///
/// Every operation either returns the parsed record or fails with
/// `Error::Upstream` (transport failure, non-2xx status) or `Error::Parse`
/// (body did not match the expected shape).
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Fetch one page of the entity index
    async fn fetch_index_page(&self, offset: usize, limit: usize) -> Result<IndexPage>;

    /// Fetch an entity detail record by its resource URL
    async fn fetch_entity(&self, url: &str) -> Result<EntityDetail>;

    /// Fetch an entity detail record by name
    async fn fetch_entity_by_name(&self, name: &str) -> Result<EntityDetail>;

    /// Fetch a species record by its resource URL
    async fn fetch_species(&self, url: &str) -> Result<SpeciesRecord>;

    /// Fetch an evolution chain graph by its resource URL
    async fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionChainRecord>;

    /// Names of all entity types
    async fn list_types(&self) -> Result<Vec<String>>;

    /// Names of all generations
    async fn list_generations(&self) -> Result<Vec<String>>;
}

/// Create the HTTP resource client from configuration
pub fn create_resource_client(config: &UpstreamConfig) -> Result<Arc<dyn ResourceClient>> {
    info!("Creating upstream resource client");
    let client = HttpResourceClient::new(config)?;
    Ok(Arc::new(client))
}
