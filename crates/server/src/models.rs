//! Request and response bodies for the REST API

use dexter_catalog::{BatchOutcome, CatalogStatus};
use dexter_core::{CatalogEntity, FilterCriteria};
use serde::{Deserialize, Serialize};

/// Query string of `GET /api/v1/catalog`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, rename = "type")]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub generation: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
}

impl CatalogQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search_term: self.search.clone().unwrap_or_default(),
            entity_type: self.entity_type.clone().unwrap_or_default(),
            generation: self.generation.clone().unwrap_or_default(),
        }
    }
}

/// Catalog item as rendered on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCard {
    pub name: String,
    pub url: String,
    pub id: Option<u32>,
    pub artwork_url: String,
    pub generation: Option<String>,
    pub types: Option<Vec<String>>,
    pub evolutions: Vec<String>,
}

impl From<CatalogEntity> for EntityCard {
    fn from(entity: CatalogEntity) -> Self {
        Self {
            id: entity.numeric_id(),
            artwork_url: entity.artwork_url(),
            name: entity.name,
            url: entity.url,
            generation: entity.generation,
            types: entity.types,
            evolutions: entity.evolutions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub items: Vec<EntityCard>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub status: CatalogStatus,
}

/// Result of `POST /api/v1/catalog/next-batch`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// `loaded`, `already_loading` or `complete`
    pub outcome: String,
    pub offset: Option<usize>,
    pub fetched: usize,
    pub added: usize,
    pub status: CatalogStatus,
}

impl BatchResponse {
    pub fn new(outcome: BatchOutcome, status: CatalogStatus) -> Self {
        match outcome {
            BatchOutcome::Loaded {
                offset,
                fetched,
                added,
                ..
            } => Self {
                outcome: "loaded".to_string(),
                offset: Some(offset),
                fetched,
                added,
                status,
            },
            BatchOutcome::AlreadyLoading => Self::idle("already_loading", status),
            BatchOutcome::Complete => Self::idle("complete", status),
        }
    }

    fn idle(outcome: &str, status: CatalogStatus) -> Self {
        Self {
            outcome: outcome.to_string(),
            offset: None,
            fetched: 0,
            added: 0,
            status,
        }
    }
}
