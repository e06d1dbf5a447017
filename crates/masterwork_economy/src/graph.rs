//! # Resolution Graph
//!
//! The catalog's own validation proves recipes are acyclic. Resolution has
//! a second kind of edge the recipe graph cannot see: searching an item
//! prices every candidate supplement, and pricing a supplement crafts its
//! object, which searches that object's ingredients.
//!
//! ```text
//! search(item)      -> search(ingredient)    for each craftable ingredient
//! search(item)      -> baseline(supplement)  for each candidate supplement
//! baseline(supply)  -> search(ingredient)    for each craftable ingredient
//! ```
//!
//! A cycle here would make a search wait on its own single-flight guard,
//! so the engine refuses such catalogs up front.

use std::collections::{HashMap, HashSet};
use std::fmt;

use masterwork_catalog::{strip_quality_marker, Catalog, CraftableObject};

use crate::error::{EngineError, EngineResult};

/// A memoized computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Node<'a> {
    Search(&'a str),
    Baseline(&'a str),
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search(name) => write!(f, "search {name}"),
            Self::Baseline(name) => write!(f, "baseline {name}"),
        }
    }
}

/// Fails with `MalformedCatalog` if any search or supplement baseline
/// would depend on itself.
pub(crate) fn check_resolution_graph(catalog: &Catalog) -> EngineResult<()> {
    let edges = build_edges(catalog);
    let mut visited = HashSet::new();
    let mut on_stack = HashSet::new();
    let mut path = Vec::new();

    let roots = catalog
        .craftables()
        .map(|object| Node::Search(object.name.as_str()))
        .chain(catalog.supplements().iter().map(|supplement| Node::Baseline(supplement.name.as_str())));

    for root in roots {
        if visited.contains(&root) {
            continue;
        }
        if let Some(cycle) = find_cycle(root, &edges, &mut visited, &mut on_stack, &mut path) {
            let rendered: Vec<String> = cycle.iter().map(ToString::to_string).collect();
            return Err(EngineError::malformed(format!(
                "resolution cycle: {}",
                rendered.join(" -> ")
            )));
        }
    }
    Ok(())
}

fn build_edges(catalog: &Catalog) -> HashMap<Node<'_>, Vec<Node<'_>>> {
    let mut edges: HashMap<Node<'_>, Vec<Node<'_>>> = HashMap::new();

    for object in catalog.craftables() {
        let mut targets = craftable_ingredients(catalog, object);
        if object.profession.is_some() {
            targets.extend(
                catalog
                    .supplements()
                    .iter()
                    .filter(|supplement| supplement.name != object.name)
                    .map(|supplement| Node::Baseline(supplement.name.as_str())),
            );
        }
        edges.insert(Node::Search(object.name.as_str()), targets);
    }

    for supplement in catalog.supplements() {
        let (base, _) = strip_quality_marker(&supplement.name);
        if let Some(object) = catalog.craftable(base) {
            edges.insert(
                Node::Baseline(supplement.name.as_str()),
                craftable_ingredients(catalog, object),
            );
        }
    }
    edges
}

fn craftable_ingredients<'a>(catalog: &'a Catalog, object: &'a CraftableObject) -> Vec<Node<'a>> {
    object
        .recipe
        .iter()
        .filter_map(|entry| catalog.craftable(strip_quality_marker(&entry.name).0))
        .map(|ingredient| Node::Search(ingredient.name.as_str()))
        .collect()
}

fn find_cycle<'a>(
    node: Node<'a>,
    edges: &HashMap<Node<'a>, Vec<Node<'a>>>,
    visited: &mut HashSet<Node<'a>>,
    on_stack: &mut HashSet<Node<'a>>,
    path: &mut Vec<Node<'a>>,
) -> Option<Vec<Node<'a>>> {
    visited.insert(node);
    on_stack.insert(node);
    path.push(node);

    for &next in edges.get(&node).map_or(&[][..], Vec::as_slice) {
        if on_stack.contains(&next) {
            let start = path.iter().position(|&entry| entry == next).unwrap_or(0);
            let mut cycle = path[start..].to_vec();
            cycle.push(next);
            return Some(cycle);
        }
        if !visited.contains(&next) {
            if let Some(cycle) = find_cycle(next, edges, visited, on_stack, path) {
                return Some(cycle);
            }
        }
    }

    path.pop();
    on_stack.remove(&node);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use masterwork_catalog::{Resource, Supplement};

    fn base_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_resource(Resource::new("Herb", 1.0)).unwrap();
        catalog
            .add_craftable(
                CraftableObject::new("Bar", 1.0, 100, 0)
                    .with_profession("Blacksmithing")
                    .with_input(2.0, "Ore"),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_resource_supplements_are_fine() {
        let mut catalog = base_catalog();
        catalog.add_supplement(Supplement::new("Herb +1", 10.0, 0.0)).unwrap();
        assert!(check_resolution_graph(&catalog).is_ok());
    }

    #[test]
    fn test_supplement_made_from_searched_item() {
        let mut catalog = base_catalog();
        // Oil is made from Bar, and Bar's search prices Oil
        catalog
            .add_craftable(
                CraftableObject::new("Oil", 1.0, 100, 0)
                    .with_profession("Alchemy")
                    .with_input(1.0, "Bar"),
            )
            .unwrap();
        catalog.add_supplement(Supplement::new("Oil", 10.0, 0.0)).unwrap();

        let Err(EngineError::MalformedCatalog { reason }) = check_resolution_graph(&catalog) else {
            panic!("expected a resolution cycle");
        };
        assert!(reason.contains("baseline Oil"), "{reason}");
        assert!(reason.contains("search Bar"), "{reason}");
    }

    #[test]
    fn test_items_without_profession_are_not_searched_for_supplements() {
        let mut catalog = Catalog::new();
        catalog.add_craftable(CraftableObject::new("Bar", 1.0, 100, 0)).unwrap();
        catalog
            .add_craftable(CraftableObject::new("Oil", 1.0, 100, 0).with_input(1.0, "Bar"))
            .unwrap();
        catalog.add_supplement(Supplement::new("Oil", 10.0, 0.0)).unwrap();
        assert!(check_resolution_graph(&catalog).is_ok());
    }

    #[test]
    fn test_self_named_supplement_excluded() {
        let mut catalog = Catalog::new();
        catalog.add_resource(Resource::new("Herb", 1.0)).unwrap();
        catalog
            .add_craftable(
                CraftableObject::new("Tea", 1.0, 100, 0)
                    .with_profession("Alchemy")
                    .with_input(2.0, "Herb"),
            )
            .unwrap();
        catalog.add_supplement(Supplement::new("Tea", 10.0, 0.0)).unwrap();
        catalog.add_supplement(Supplement::new("Tea +1", 10.0, 0.0)).unwrap();
        assert!(check_resolution_graph(&catalog).is_ok());
    }
}
