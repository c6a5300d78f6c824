//! JSON shapes of the upstream REST resources
//!
//! Only the fields the engine reads are modelled; everything else in the
//! upstream payloads is ignored by serde.

use dexter_core::{IndexEntry, FALLBACK_SPRITE_URL};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `{ name }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// `{ url }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub url: String,
}

/// One page of the entity index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPage {
    pub results: Vec<IndexEntry>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub stat: NamedRef,
    pub base_stat: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// Entity detail record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDetail {
    pub id: u32,
    pub name: String,
    pub species: ResourceRef,
    pub types: Vec<TypeSlot>,
    pub height: u32,
    pub weight: u32,
    pub abilities: Vec<AbilitySlot>,
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub sprites: Sprites,
}

impl EntityDetail {
    /// Type names in upstream slot order
    pub fn type_names(&self) -> Vec<String> {
        self.types.iter().map(|t| t.kind.name.clone()).collect()
    }

    pub fn ability_names(&self) -> Vec<String> {
        self.abilities
            .iter()
            .map(|a| a.ability.name.clone())
            .collect()
    }

    /// Stat name to base value; a repeated stat name keeps the last value
    pub fn stat_map(&self) -> BTreeMap<String, i64> {
        self.stats
            .iter()
            .map(|s| (s.stat.name.clone(), s.base_stat))
            .collect()
    }

    /// Front sprite, or the fallback image when the upstream has none
    pub fn sprite_or_fallback(&self) -> String {
        match self.sprites.front_default.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => FALLBACK_SPRITE_URL.to_string(),
        }
    }
}

/// Species record, linking an entity to its generation and evolution chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub generation: NamedRef,
    pub evolution_chain: ResourceRef,
}

/// A node of the evolution tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub species: NamedRef,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

impl ChainLink {
    pub fn new(name: impl Into<String>, evolves_to: Vec<ChainLink>) -> Self {
        Self {
            species: NamedRef { name: name.into() },
            evolves_to,
        }
    }

    /// A chain where each stage has exactly one successor
    pub fn linear(names: &[&str]) -> Self {
        names
            .iter()
            .rev()
            .fold(None, |child: Option<ChainLink>, name| {
                Some(ChainLink::new(*name, child.into_iter().collect()))
            })
            .unwrap_or_else(|| ChainLink::new("", Vec::new()))
    }

    pub fn name(&self) -> &str {
        &self.species.name
    }
}

/// Evolution chain record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionChainRecord {
    pub chain: ChainLink,
}

/// `{ results: [{ name }] }` as returned by the taxonomy endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedList {
    pub results: Vec<NamedRef>,
}

impl NamedList {
    pub fn into_names(self) -> Vec<String> {
        self.results.into_iter().map(|r| r.name).collect()
    }
}
