//! Shared fixtures for catalog integration tests

#![allow(dead_code)]

use dexter_core::config::CatalogConfig;
use dexter_upstream::{ChainLink, MockResourceClient};
use std::sync::Arc;

/// Catalog config with a small batch size so tests span several batches
pub fn small_batches(batch_size: usize) -> CatalogConfig {
    CatalogConfig {
        batch_size,
        page_size: 18,
        max_concurrent_joins: 4,
        max_chain_depth: 50,
        expected_total: 10,
    }
}

/// bulbasaur line, charmander line and a single-stage tauros, in that index order
pub fn starter_upstream() -> Arc<MockResourceClient> {
    let mock = MockResourceClient::new();
    mock.add_family(
        "generation-i",
        ChainLink::linear(&["bulbasaur", "ivysaur", "venusaur"]),
        &[
            ("bulbasaur", &["grass", "poison"]),
            ("ivysaur", &["grass", "poison"]),
            ("venusaur", &["grass", "poison"]),
        ],
    );
    mock.add_family(
        "generation-i",
        ChainLink::linear(&["charmander", "charmeleon", "charizard"]),
        &[
            ("charmander", &["fire"]),
            ("charmeleon", &["fire"]),
            ("charizard", &["fire", "flying"]),
        ],
    );
    mock.add_single("generation-i", "tauros", &["normal"]);
    mock.set_types(&["normal", "fire", "grass", "poison", "flying"]);
    mock.set_generations(&["generation-i", "generation-ii"]);
    Arc::new(mock)
}

pub fn names(entities: &[dexter_core::CatalogEntity]) -> Vec<&str> {
    entities.iter().map(|e| e.name.as_str()).collect()
}
