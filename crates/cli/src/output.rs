//! Plain-text rendering of catalog pages, detail records and status

use dexter_catalog::{CatalogPage, CatalogStatus};
use dexter_core::{CatalogEntity, DetailRecord};
use std::fmt::Write;

/// Render one catalog page as an aligned table with a summary line
pub fn render_catalog_page(page: &CatalogPage, page_number: usize, status: &CatalogStatus) -> String {
    let mut out = String::new();

    if page.items.is_empty() {
        out.push_str("No entities match the given filters.\n");
    } else {
        for entity in &page.items {
            out.push_str(&render_row(entity));
            out.push('\n');
        }
    }

    let _ = writeln!(
        out,
        "\nPage {page_number}/{} ({} matches, {} loaded{})",
        page.total_pages.max(1),
        page.total_items,
        status.loaded,
        if status.complete {
            ""
        } else {
            ", more available"
        }
    );
    out
}

fn render_row(entity: &CatalogEntity) -> String {
    let id = entity
        .numeric_id()
        .map(|id| format!("#{id}"))
        .unwrap_or_else(|| "#?".to_string());
    let types = entity
        .types
        .as_ref()
        .map(|types| types.join("/"))
        .unwrap_or_else(|| "-".to_string());
    let generation = entity.generation.as_deref().unwrap_or("-");

    format!(
        "{id:>6}  {:<24} {types:<18} {generation}",
        entity.name
    )
}

/// Render a detail record: header, physical data, stats, then evolution stages
pub fn render_detail(record: &DetailRecord) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "#{} {}", record.id, record.name);
    let _ = writeln!(out, "  generation: {}", record.generation);
    let _ = writeln!(out, "  types:      {}", record.types.join(", "));
    // Upstream units are decimetres and hectograms
    let _ = writeln!(
        out,
        "  height:     {:.1} m",
        f64::from(record.height) / 10.0
    );
    let _ = writeln!(
        out,
        "  weight:     {:.1} kg",
        f64::from(record.weight) / 10.0
    );
    let _ = writeln!(out, "  abilities:  {}", record.abilities.join(", "));

    if !record.stats.is_empty() {
        out.push_str("  stats:\n");
        for (stat, value) in &record.stats {
            let _ = writeln!(out, "    {stat:<16} {value:>3}");
        }
    }

    out.push_str("  evolutions:\n");
    for stage in &record.evolutions {
        let marker = if stage.name == record.name { "*" } else { " " };
        let _ = writeln!(out, "   {marker} {:<20} {}", stage.name, stage.image);
    }

    out
}

/// One-line loading summary
pub fn render_status(status: &CatalogStatus, expected_total: usize) -> String {
    let state = if status.complete {
        "complete"
    } else if status.loading {
        "loading"
    } else {
        "partial"
    };

    format!(
        "{state}: {} of ~{expected_total} entities loaded, next offset {}",
        status.loaded, status.next_offset
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dexter_core::EvolutionStage;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn pikachu() -> CatalogEntity {
        CatalogEntity {
            name: "pikachu".to_string(),
            url: "https://pokeapi.co/api/v2/pokemon/25/".to_string(),
            generation: Some("generation-i".to_string()),
            types: Some(vec!["electric".to_string()]),
            evolutions: vec!["pichu".to_string(), "raichu".to_string()],
        }
    }

    #[test]
    fn test_row_includes_id_types_and_generation() {
        let row = render_row(&pikachu());
        assert!(row.trim_start().starts_with("#25"));
        assert!(row.contains("pikachu"));
        assert!(row.contains("electric"));
        assert!(row.ends_with("generation-i"));
    }

    #[test]
    fn test_empty_page_message() {
        let page = CatalogPage {
            items: Vec::new(),
            total_pages: 0,
            total_items: 0,
        };
        let text = render_catalog_page(&page, 1, &CatalogStatus::default());
        assert!(text.starts_with("No entities match"));
        assert!(text.contains("Page 1/1 (0 matches, 0 loaded, more available)"));
    }

    #[test]
    fn test_detail_marks_current_stage() {
        let record = DetailRecord {
            id: 25,
            name: "pikachu".to_string(),
            generation: "generation-i".to_string(),
            types: vec!["electric".to_string()],
            height: 4,
            weight: 60,
            abilities: vec!["static".to_string()],
            stats: BTreeMap::from([("hp".to_string(), 35)]),
            evolutions: vec![
                EvolutionStage {
                    name: "pichu".to_string(),
                    image: "p.png".to_string(),
                },
                EvolutionStage {
                    name: "pikachu".to_string(),
                    image: "k.png".to_string(),
                },
            ],
        };

        let text = render_detail(&record);
        assert!(text.starts_with("#25 pikachu\n"));
        assert!(text.contains("height:     0.4 m"));
        assert!(text.contains("weight:     6.0 kg"));
        assert!(text.contains("* pikachu"));
        assert!(text.contains("  pichu"));
    }

    #[test]
    fn test_status_line() {
        let status = CatalogStatus {
            loaded: 200,
            next_offset: 200,
            complete: false,
            loading: true,
        };
        assert_eq!(
            render_status(&status, 1302),
            "loading: 200 of ~1302 entities loaded, next offset 200"
        );
    }
}
