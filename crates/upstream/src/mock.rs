//! In-memory upstream for testing
//!
//! Serves a synthetic index, detail, species and chain graph with call
//! counters and per-URL failure injection.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use crate::wire::{
    AbilitySlot, ChainLink, EntityDetail, EvolutionChainRecord, IndexPage, NamedRef, ResourceRef,
    SpeciesRecord, Sprites, StatEntry, TypeSlot,
};
use crate::ResourceClient;
use async_trait::async_trait;
use dexter_core::error::{Error, Result};
use dexter_core::IndexEntry;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

const MOCK_BASE_URL: &str = "http://mock.upstream/api/v2";

#[derive(Debug, Default)]
struct MockData {
    index: Vec<IndexEntry>,
    entities: HashMap<String, EntityDetail>, // detail url -> record
    names: HashMap<String, String>,          // name -> detail url
    species: HashMap<String, SpeciesRecord>,
    chains: HashMap<String, EvolutionChainRecord>,
    types: Vec<String>,
    generations: Vec<String>,
    failing_urls: HashSet<String>,
    next_id: u32,
    next_chain_id: u32,
    index_offsets: Vec<usize>,
    entity_calls: usize,
}

/// Mock upstream resource client
#[derive(Debug, Default)]
pub struct MockResourceClient {
    data: Mutex<MockData>,
}

impl MockResourceClient {
    /// Create an empty mock upstream
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detail_url(id: u32) -> String {
        format!("{MOCK_BASE_URL}/pokemon/{id}/")
    }

    pub fn species_url(id: u32) -> String {
        format!("{MOCK_BASE_URL}/pokemon-species/{id}/")
    }

    pub fn chain_url(id: u32) -> String {
        format!("{MOCK_BASE_URL}/evolution-chain/{id}/")
    }

    /// Register every member of an evolution family
    ///
    /// Members are appended to the index in the given order, each with its
    /// own detail and species record pointing at one shared chain.
    pub fn add_family(&self, generation: &str, chain: ChainLink, members: &[(&str, &[&str])]) {
        let mut data = self.data.lock().unwrap();
        data.next_chain_id += 1;
        let chain_url = Self::chain_url(data.next_chain_id);
        data.chains
            .insert(chain_url.clone(), EvolutionChainRecord { chain });

        for (name, types) in members {
            data.next_id += 1;
            let id = data.next_id;
            let detail_url = Self::detail_url(id);
            let species_url = Self::species_url(id);

            data.species.insert(
                species_url.clone(),
                SpeciesRecord {
                    generation: NamedRef {
                        name: generation.to_string(),
                    },
                    evolution_chain: ResourceRef {
                        url: chain_url.clone(),
                    },
                },
            );
            data.entities.insert(
                detail_url.clone(),
                mock_detail(id, name, &species_url, types),
            );
            data.names.insert(name.to_string(), detail_url.clone());
            data.index.push(IndexEntry::new(*name, detail_url));
        }
    }

    /// Register a single-stage entity
    pub fn add_single(&self, generation: &str, name: &str, types: &[&str]) {
        self.add_family(generation, ChainLink::new(name, Vec::new()), &[(name, types)]);
    }

    /// Append `count` single-stage entities named `{prefix}-{n}`
    pub fn add_many(&self, prefix: &str, count: usize) {
        for n in 0..count {
            self.add_single("generation-i", &format!("{prefix}-{n}"), &["normal"]);
        }
    }

    /// Append an index entry that repeats an already registered name
    pub fn push_duplicate_index_entry(&self, name: &str) {
        let mut data = self.data.lock().unwrap();
        let url = data.names.get(name).cloned().expect("name must be registered");
        data.index.push(IndexEntry::new(name, url));
    }

    /// Append an index entry whose detail URL is not served
    pub fn push_dangling_index_entry(&self, name: &str) {
        let mut data = self.data.lock().unwrap();
        let url = format!("{MOCK_BASE_URL}/pokemon/missing-{name}/");
        data.index.push(IndexEntry::new(name, url));
    }

    /// Make every request to `url` fail with a 500
    pub fn fail_url(&self, url: &str) {
        self.data.lock().unwrap().failing_urls.insert(url.to_string());
    }

    /// Stop failing requests to `url`
    pub fn heal_url(&self, url: &str) {
        self.data.lock().unwrap().failing_urls.remove(url);
    }

    /// Make the index page at `offset` fail
    pub fn fail_index_offset(&self, offset: usize) {
        self.fail_url(&index_key(offset));
    }

    /// Stop failing the index page at `offset`
    pub fn heal_index_offset(&self, offset: usize) {
        self.heal_url(&index_key(offset));
    }

    /// Replace the front sprite of a registered entity
    pub fn set_sprite(&self, name: &str, sprite: Option<&str>) {
        let mut data = self.data.lock().unwrap();
        let url = data.names.get(name).cloned().expect("name must be registered");
        if let Some(detail) = data.entities.get_mut(&url) {
            detail.sprites.front_default = sprite.map(str::to_string);
        }
    }

    pub fn set_types(&self, types: &[&str]) {
        self.data.lock().unwrap().types = types.iter().map(|t| t.to_string()).collect();
    }

    pub fn set_generations(&self, generations: &[&str]) {
        self.data.lock().unwrap().generations =
            generations.iter().map(|g| g.to_string()).collect();
    }

    /// Number of index page requests served so far
    pub fn index_calls(&self) -> usize {
        self.data.lock().unwrap().index_offsets.len()
    }

    /// Offsets requested from the index, in call order
    pub fn index_offsets(&self) -> Vec<usize> {
        self.data.lock().unwrap().index_offsets.clone()
    }

    /// Number of entity detail requests served so far
    pub fn entity_calls(&self) -> usize {
        self.data.lock().unwrap().entity_calls
    }

    fn check_failure(data: &MockData, url: &str) -> Result<()> {
        if data.failing_urls.contains(url) {
            return Err(Error::upstream(url, Some(500), "injected failure"));
        }
        Ok(())
    }
}

fn index_key(offset: usize) -> String {
    format!("{MOCK_BASE_URL}/pokemon/?offset={offset}")
}

fn mock_detail(id: u32, name: &str, species_url: &str, types: &[&str]) -> EntityDetail {
    EntityDetail {
        id,
        name: name.to_string(),
        species: ResourceRef {
            url: species_url.to_string(),
        },
        types: types
            .iter()
            .map(|t| TypeSlot {
                kind: NamedRef {
                    name: t.to_string(),
                },
            })
            .collect(),
        height: 7,
        weight: 69,
        abilities: vec![AbilitySlot {
            ability: NamedRef {
                name: "overgrow".to_string(),
            },
        }],
        stats: vec![
            StatEntry {
                stat: NamedRef {
                    name: "hp".to_string(),
                },
                base_stat: 45,
            },
            StatEntry {
                stat: NamedRef {
                    name: "speed".to_string(),
                },
                base_stat: 45,
            },
        ],
        sprites: Sprites {
            front_default: Some(format!("http://mock.sprites/{id}.png")),
        },
    }
}

#[async_trait]
impl ResourceClient for MockResourceClient {
    async fn fetch_index_page(&self, offset: usize, limit: usize) -> Result<IndexPage> {
        {
            let mut data = self.data.lock().unwrap();
            data.index_offsets.push(offset);
        }

        // Suspend once so concurrent callers observe the request in flight
        tokio::task::yield_now().await;

        let data = self.data.lock().unwrap();
        Self::check_failure(&data, &index_key(offset))?;

        let results: Vec<IndexEntry> = data.index.iter().skip(offset).take(limit).cloned().collect();
        let next = (offset + limit < data.index.len()).then(|| index_key(offset + limit));
        Ok(IndexPage { results, next })
    }

    async fn fetch_entity(&self, url: &str) -> Result<EntityDetail> {
        tokio::task::yield_now().await;

        let mut data = self.data.lock().unwrap();
        data.entity_calls += 1;
        Self::check_failure(&data, url)?;
        data.entities
            .get(url)
            .cloned()
            .ok_or_else(|| Error::upstream(url, Some(404), "not found"))
    }

    async fn fetch_entity_by_name(&self, name: &str) -> Result<EntityDetail> {
        let url = {
            let data = self.data.lock().unwrap();
            data.names.get(name).cloned()
        };
        match url {
            Some(url) => self.fetch_entity(&url).await,
            None => Err(Error::upstream(
                format!("{MOCK_BASE_URL}/pokemon/{name}"),
                Some(404),
                "not found",
            )),
        }
    }

    async fn fetch_species(&self, url: &str) -> Result<SpeciesRecord> {
        tokio::task::yield_now().await;

        let data = self.data.lock().unwrap();
        Self::check_failure(&data, url)?;
        data.species
            .get(url)
            .cloned()
            .ok_or_else(|| Error::upstream(url, Some(404), "not found"))
    }

    async fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionChainRecord> {
        tokio::task::yield_now().await;

        let data = self.data.lock().unwrap();
        Self::check_failure(&data, url)?;
        data.chains
            .get(url)
            .cloned()
            .ok_or_else(|| Error::upstream(url, Some(404), "not found"))
    }

    async fn list_types(&self) -> Result<Vec<String>> {
        Ok(self.data.lock().unwrap().types.clone())
    }

    async fn list_generations(&self) -> Result<Vec<String>> {
        Ok(self.data.lock().unwrap().generations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_index_is_paged_by_offset() {
        let mock = MockResourceClient::new();
        mock.add_many("mon", 5);

        let first = mock.fetch_index_page(0, 3).await.expect("page");
        assert_eq!(first.results.len(), 3);
        assert!(first.next.is_some());

        let last = mock.fetch_index_page(3, 3).await.expect("page");
        assert_eq!(last.results.len(), 2);
        assert_eq!(last.next, None);
        assert_eq!(mock.index_offsets(), vec![0, 3]);
    }

    #[tokio::test]
    async fn test_family_members_share_chain() {
        let mock = MockResourceClient::new();
        mock.add_family(
            "generation-i",
            ChainLink::linear(&["a", "b"]),
            &[("a", &["grass"]), ("b", &["grass"])],
        );

        let a = mock.fetch_entity_by_name("a").await.expect("a");
        let b = mock.fetch_entity_by_name("b").await.expect("b");
        let species_a = mock.fetch_species(&a.species.url).await.expect("species");
        let species_b = mock.fetch_species(&b.species.url).await.expect("species");
        assert_eq!(species_a.evolution_chain, species_b.evolution_chain);
        assert_eq!(species_a.generation.name, "generation-i");
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let mock = MockResourceClient::new();
        mock.add_single("generation-i", "mew", &["psychic"]);
        mock.fail_url(&MockResourceClient::detail_url(1));

        let err = mock.fetch_entity_by_name("mew").await.unwrap_err();
        assert!(matches!(err, Error::Upstream { status: Some(500), .. }));
    }
}
