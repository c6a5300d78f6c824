//! Filtered, paginated view over the catalog
//!
//! Pure functions of the entity list and the criteria: calling them never
//! mutates the catalog and the same inputs always give the same page.
//!
//! Filtering runs in a fixed order:
//! 1. case-insensitive name search (direct matches)
//! 2. evolution inclusion: every entity whose chain contains a direct match
//! 3. union of both, deduplicated by name, direct matches first
//! 4. type filter, then generation filter, on the union
//! 5. pagination

use dexter_core::{CatalogEntity, FilterCriteria};
use serde::Serialize;
use std::collections::HashSet;

/// One page of the filtered catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogPage {
    pub items: Vec<CatalogEntity>,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Filter `entities` and return page `page` (1-based) of `page_size` items
///
/// A page outside `1..=total_pages` yields an empty slice; clamping is the
/// caller's job (see [`clamp_page`]).
pub fn view(
    entities: &[CatalogEntity],
    criteria: &FilterCriteria,
    page: usize,
    page_size: usize,
) -> CatalogPage {
    let filtered = filter_entities(entities, criteria);
    let total_items = filtered.len();

    if page_size == 0 {
        return CatalogPage {
            items: Vec::new(),
            total_pages: 0,
            total_items,
        };
    }

    let total_pages = total_items.div_ceil(page_size);
    let items = match page.checked_sub(1) {
        Some(index) => filtered
            .into_iter()
            .skip(index.saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    CatalogPage {
        items,
        total_pages,
        total_items,
    }
}

/// Apply search, evolution inclusion, type and generation filters
pub fn filter_entities<'a>(
    entities: &'a [CatalogEntity],
    criteria: &FilterCriteria,
) -> Vec<&'a CatalogEntity> {
    let term = criteria.normalized_search();

    let mut selected: Vec<&CatalogEntity> = if term.is_empty() {
        entities.iter().collect()
    } else {
        search_with_evolutions(entities, &term)
    };

    if !criteria.entity_type.is_empty() {
        selected.retain(|entity| entity.has_type(&criteria.entity_type));
    }

    if !criteria.generation.is_empty() {
        selected.retain(|entity| entity.generation.as_deref() == Some(criteria.generation.as_str()));
    }

    selected
}

/// Direct name matches followed by their chain relatives
fn search_with_evolutions<'a>(entities: &'a [CatalogEntity], term: &str) -> Vec<&'a CatalogEntity> {
    let direct: Vec<&CatalogEntity> = entities
        .iter()
        .filter(|entity| entity.name.to_lowercase().contains(term))
        .collect();

    let direct_names: HashSet<String> = direct
        .iter()
        .map(|entity| entity.name.to_lowercase())
        .collect();

    let relatives = entities.iter().filter(|entity| {
        entity
            .evolutions
            .iter()
            .any(|stage| direct_names.contains(&stage.to_lowercase()))
    });

    let mut seen = HashSet::new();
    direct
        .into_iter()
        .chain(relatives)
        .filter(|&entity| seen.insert(entity.name.as_str()))
        .collect()
}

/// Clamp a requested page into `1..=total_pages` (page 1 when there are none)
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}
