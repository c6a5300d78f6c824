//! Detail records for a single named entity
//!
//! Independent of the bulk catalog: every call goes to the upstream.

use crate::evolution::flatten_chain;
use dexter_core::error::{Error, Result};
use dexter_core::{DetailRecord, EvolutionStage, FALLBACK_SPRITE_URL};
use dexter_upstream::ResourceClient;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolves the detail view of one entity, including every chain stage with its sprite
pub struct DetailResolver {
    client: Arc<dyn ResourceClient>,
    max_chain_depth: usize,
    max_concurrent_fetches: usize,
}

impl DetailResolver {
    pub fn new(
        client: Arc<dyn ResourceClient>,
        max_chain_depth: usize,
        max_concurrent_fetches: usize,
    ) -> Self {
        Self {
            client,
            max_chain_depth,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
        }
    }

    /// Build the detail record for `name`
    ///
    /// An unknown name fails with `Error::NotFound`. A stage whose sprite is
    /// missing gets [`FALLBACK_SPRITE_URL`].
    pub async fn resolve(&self, name: &str) -> Result<DetailRecord> {
        let name = normalize_name(name)?;
        info!("Resolving detail for '{name}'");

        let detail = self
            .client
            .fetch_entity_by_name(&name)
            .await
            .map_err(|e| {
                if e.is_upstream_not_found() {
                    Error::not_found(&name)
                } else {
                    e
                }
            })?;
        let species = self.client.fetch_species(&detail.species.url).await?;
        let chain = self
            .client
            .fetch_evolution_chain(&species.evolution_chain.url)
            .await?;

        let stage_names = flatten_chain(&chain.chain, self.max_chain_depth)?;
        let evolutions: Vec<EvolutionStage> = stream::iter(stage_names)
            .map(|stage| self.resolve_stage(stage))
            .buffered(self.max_concurrent_fetches)
            .try_collect()
            .await?;

        Ok(DetailRecord {
            id: detail.id,
            name: detail.name.clone(),
            generation: species.generation.name,
            types: detail.type_names(),
            height: detail.height,
            weight: detail.weight,
            abilities: detail.ability_names(),
            stats: detail.stat_map(),
            evolutions,
        })
    }

    async fn resolve_stage(&self, name: String) -> Result<EvolutionStage> {
        debug!("Fetching sprite for stage '{name}'");
        match self.client.fetch_entity_by_name(&name).await {
            Ok(detail) => Ok(EvolutionStage {
                image: detail.sprite_or_fallback(),
                name,
            }),
            // Species without an entity of the same name have no sprite to show
            Err(e) if e.is_upstream_not_found() => {
                warn!("No entity record for stage '{name}', using fallback sprite");
                Ok(EvolutionStage {
                    name,
                    image: FALLBACK_SPRITE_URL.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }
}

/// Trim and lower-case a lookup name, rejecting anything that is not a path segment
fn normalize_name(name: &str) -> Result<String> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return Err(Error::invalid_input("entity name must not be empty"));
    }
    if name.contains(['/', '?', '#']) {
        return Err(Error::invalid_input(format!(
            "entity name '{name}' contains reserved characters"
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Pikachu ").unwrap(), "pikachu");
        assert!(matches!(normalize_name(""), Err(Error::InvalidInput(_))));
        assert!(matches!(
            normalize_name("../type"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            normalize_name("a?limit=1"),
            Err(Error::InvalidInput(_))
        ));
    }
}
