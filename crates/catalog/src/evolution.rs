//! Evolution chain flattening
//!
//! The upstream graph is a tree, so a depth-first pre-order walk visits every
//! stage exactly once. Depth is still bounded to reject corrupt payloads.

use dexter_core::error::{Error, Result};
use dexter_upstream::ChainLink;

/// All stage names of a chain, root first, depth-first, first child first
pub fn flatten_chain(root: &ChainLink, max_depth: usize) -> Result<Vec<String>> {
    let mut names = Vec::new();
    walk(root, 1, max_depth, &mut names)?;
    Ok(names)
}

/// Stage names of the chain other than `own_name`, in chain order
pub fn related_stages(root: &ChainLink, own_name: &str, max_depth: usize) -> Result<Vec<String>> {
    let mut names = flatten_chain(root, max_depth)?;
    names.retain(|name| name != own_name);
    Ok(names)
}

fn walk(link: &ChainLink, depth: usize, max_depth: usize, out: &mut Vec<String>) -> Result<()> {
    if depth > max_depth {
        return Err(Error::malformed_chain(format!(
            "chain exceeds {max_depth} stages below '{}'",
            out.first().map(String::as_str).unwrap_or_default()
        )));
    }

    let name = link.name().trim();
    if name.is_empty() {
        return Err(Error::malformed_chain(format!(
            "stage at depth {depth} has no species name"
        )));
    }

    out.push(name.to_string());
    for child in &link.evolves_to {
        walk(child, depth + 1, max_depth, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_linear_chain_in_order() {
        let chain = ChainLink::linear(&["charmander", "charmeleon", "charizard"]);
        assert_eq!(
            flatten_chain(&chain, 50).unwrap(),
            vec!["charmander", "charmeleon", "charizard"]
        );
    }

    #[test]
    fn test_branching_chain_is_depth_first() {
        // a -> (b -> d), c
        let chain = ChainLink::new(
            "a",
            vec![
                ChainLink::new("b", vec![ChainLink::new("d", Vec::new())]),
                ChainLink::new("c", Vec::new()),
            ],
        );
        assert_eq!(flatten_chain(&chain, 50).unwrap(), vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_related_stages_excludes_self() {
        let chain = ChainLink::linear(&["charmander", "charmeleon", "charizard"]);
        assert_eq!(
            related_stages(&chain, "charmeleon", 50).unwrap(),
            vec!["charmander", "charizard"]
        );
    }

    #[test]
    fn test_single_stage_species() {
        let chain = ChainLink::new("tauros", Vec::new());
        assert!(related_stages(&chain, "tauros", 50).unwrap().is_empty());
        assert_eq!(flatten_chain(&chain, 50).unwrap(), vec!["tauros"]);
    }

    #[test]
    fn test_depth_guard() {
        let names: Vec<String> = (0..51).map(|i| format!("stage-{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let chain = ChainLink::linear(&refs);

        let err = flatten_chain(&chain, 50).unwrap_err();
        assert!(matches!(err, Error::MalformedChain(_)));

        assert_eq!(flatten_chain(&chain, 51).unwrap().len(), 51);
    }

    #[test]
    fn test_empty_species_name_is_malformed() {
        let chain = ChainLink::new("a", vec![ChainLink::new("  ", Vec::new())]);
        assert!(matches!(
            flatten_chain(&chain, 50),
            Err(Error::MalformedChain(_))
        ));
    }
}
