//! Catalog data model
//!
//! These are the records produced by joining upstream resources. They are
//! deliberately plain data: the catalog crate owns the behaviour.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Image returned for an evolution stage whose sprite is missing upstream
pub const FALLBACK_SPRITE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/0.png";

/// Base location of the per-id card artwork
const ARTWORK_BASE_URL: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// One item of the paged upstream index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub url: String,
}

impl IndexEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A fully joined catalog item
///
/// `name` is the catalog key. `evolutions` lists the *other* stages of this
/// entity's chain in depth-first order and never contains `name` itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntity {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(default)]
    pub evolutions: Vec<String>,
}

impl CatalogEntity {
    /// Numeric id embedded in the resource URL (`.../pokemon/25/` -> 25)
    pub fn numeric_id(&self) -> Option<u32> {
        id_from_resource_url(&self.url)
    }

    /// Card artwork derived from the numeric id, or the fallback sprite
    pub fn artwork_url(&self) -> String {
        match self.numeric_id() {
            Some(id) => format!("{ARTWORK_BASE_URL}/{id}.png"),
            None => FALLBACK_SPRITE_URL.to_string(),
        }
    }

    /// Exact membership test against the entity's types
    pub fn has_type(&self, entity_type: &str) -> bool {
        self.types
            .as_ref()
            .is_some_and(|types| types.iter().any(|t| t == entity_type))
    }
}

/// Extract the trailing numeric path segment of a resource URL
pub fn id_from_resource_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

/// One stage of an evolution chain, as shown on the detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionStage {
    pub name: String,
    pub image: String,
}

/// Everything the detail view needs for a single entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: u32,
    pub name: String,
    pub generation: String,
    pub types: Vec<String>,
    pub height: u32,
    pub weight: u32,
    pub abilities: Vec<String>,
    pub stats: BTreeMap<String, i64>,
    pub evolutions: Vec<EvolutionStage>,
}

/// Criteria applied by the catalog view. Empty strings disable a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub generation: String,
}

impl FilterCriteria {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = entity_type.into();
        self
    }

    pub fn with_generation(mut self, generation: impl Into<String>) -> Self {
        self.generation = generation.into();
        self
    }

    /// Trimmed, lower-cased search term
    pub fn normalized_search(&self) -> String {
        self.search_term.trim().to_lowercase()
    }
}
