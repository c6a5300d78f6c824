//! Detail joiner: detail → species → evolution chain for one index entry

use crate::evolution::related_stages;
use dexter_core::error::{Error, Result};
use dexter_core::{CatalogEntity, IndexEntry};
use dexter_upstream::ResourceClient;
use std::sync::Arc;
use tracing::{debug, warn};

/// Joins an index entry with the upstream records a catalog card needs
pub struct DetailJoiner {
    client: Arc<dyn ResourceClient>,
    max_chain_depth: usize,
}

impl DetailJoiner {
    pub fn new(client: Arc<dyn ResourceClient>, max_chain_depth: usize) -> Self {
        Self {
            client,
            max_chain_depth,
        }
    }

    /// Build the catalog record for one entry
    ///
    /// Any failed fetch or malformed chain fails the whole join with
    /// `Error::Join` carrying the entity name.
    pub async fn join(&self, entry: &IndexEntry) -> Result<CatalogEntity> {
        self.join_inner(entry).await.map_err(|e| {
            warn!("Join failed for '{}': {e}", entry.name);
            Error::join(&entry.name, e)
        })
    }

    async fn join_inner(&self, entry: &IndexEntry) -> Result<CatalogEntity> {
        debug!("Joining '{}'", entry.name);

        let detail = self.client.fetch_entity(&entry.url).await?;
        let species = self.client.fetch_species(&detail.species.url).await?;
        let chain = self
            .client
            .fetch_evolution_chain(&species.evolution_chain.url)
            .await?;

        let evolutions = related_stages(&chain.chain, &entry.name, self.max_chain_depth)?;

        Ok(CatalogEntity {
            name: entry.name.clone(),
            url: entry.url.clone(),
            generation: Some(species.generation.name),
            types: Some(detail.type_names()),
            evolutions,
        })
    }
}
