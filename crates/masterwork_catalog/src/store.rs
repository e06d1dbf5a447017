//! # Catalog Store
//!
//! **Read-only name -> entity mapping with load-time validation**
//!
//! This module holds every entity the engine can reason about, with the
//! following guarantees once loading is done:
//!
//! 1. **Unique names**: no two entries of one kind share a name, and an item
//!    never shares a name with a material
//! 2. **Sane arithmetic**: output quantities and intrinsic proficiency are
//!    positive, chances lie in [0, 1]
//! 3. **No cycles**: the craftable recipe graph is a DAG
//!
//! ## Lookup Order
//!
//! ```text
//! name -> strip " +1" -> items -> materials -> resources -> placeholder / NotFound
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::crafter::{Artisan, Supplement, Tool};
use crate::entity::{Commission, CraftableObject, Entity, Resource};
use crate::error::{CatalogError, CatalogResult};
use crate::quality::strip_quality_marker;

/// What to do when a lookup finds nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Synthesize a zero-price resource carrying the name.
    #[default]
    Placeholder,
    /// Report `NotFound`.
    Strict,
}

/// The in-memory catalog of everything craftable.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    /// Raw resources by name.
    resources: HashMap<String, Arc<Resource>>,
    /// Finished items (dab hand capable) by name.
    items: HashMap<String, Arc<CraftableObject>>,
    /// Intermediate materials by name.
    materials: HashMap<String, Arc<CraftableObject>>,
    /// Craftable names in insertion order.
    craftable_order: Vec<String>,
    /// Artisans in roster order.
    agents: Vec<Arc<Artisan>>,
    /// Tools in catalog order.
    tools: Vec<Arc<Tool>>,
    /// Supplements in catalog order.
    supplements: Vec<Arc<Supplement>>,
    /// Supplement index by name.
    supplement_index: HashMap<String, usize>,
    /// Commissions in catalog order.
    commissions: Vec<Arc<Commission>>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a raw resource.
    ///
    /// # Errors
    ///
    /// Returns error if the name exists or the price is invalid.
    pub fn add_resource(&mut self, resource: Resource) -> CatalogResult<()> {
        resource.validate()?;
        if self.resources.contains_key(&resource.name) {
            return Err(duplicate("resource", &resource.name));
        }
        self.resources.insert(resource.name.clone(), Arc::new(resource));
        Ok(())
    }

    /// Adds a craftable object, filed as an item if it can dab hand and as a
    /// material otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if the name exists or the entry is malformed.
    pub fn add_craftable(&mut self, object: CraftableObject) -> CatalogResult<()> {
        object.validate()?;
        if self.items.contains_key(&object.name) || self.materials.contains_key(&object.name) {
            return Err(duplicate("craftable", &object.name));
        }
        self.craftable_order.push(object.name.clone());
        let shelf = if object.can_dab_hand {
            &mut self.items
        } else {
            &mut self.materials
        };
        shelf.insert(object.name.clone(), Arc::new(object));
        Ok(())
    }

    /// Adds an artisan to the roster.
    ///
    /// Artisan names repeat across disciplines, so no uniqueness check.
    ///
    /// # Errors
    ///
    /// Returns error if the artisan's stats are invalid.
    pub fn add_agent(&mut self, agent: Artisan) -> CatalogResult<()> {
        agent.validate()?;
        self.agents.push(Arc::new(agent));
        Ok(())
    }

    /// Adds a tool.
    ///
    /// # Errors
    ///
    /// Returns error if the name exists or the stats are invalid.
    pub fn add_tool(&mut self, tool: Tool) -> CatalogResult<()> {
        tool.validate()?;
        if self.tools.iter().any(|existing| existing.name == tool.name) {
            return Err(duplicate("tool", &tool.name));
        }
        self.tools.push(Arc::new(tool));
        Ok(())
    }

    /// Adds a supplement.
    ///
    /// # Errors
    ///
    /// Returns error if the name exists or the stats are invalid.
    pub fn add_supplement(&mut self, supplement: Supplement) -> CatalogResult<()> {
        supplement.validate()?;
        if self.supplement_index.contains_key(&supplement.name) {
            return Err(duplicate("supplement", &supplement.name));
        }
        self.supplement_index.insert(supplement.name.clone(), self.supplements.len());
        self.supplements.push(Arc::new(supplement));
        Ok(())
    }

    /// Adds a commission.
    ///
    /// # Errors
    ///
    /// Returns error if the name exists or the reward is not positive.
    pub fn add_commission(&mut self, commission: Commission) -> CatalogResult<()> {
        commission.validate()?;
        if self.commissions.iter().any(|existing| existing.name == commission.name) {
            return Err(duplicate("commission", &commission.name));
        }
        self.commissions.push(Arc::new(commission));
        Ok(())
    }

    // ========================================================================
    // Entity Lookup
    // ========================================================================

    /// Resolves a name to an entity.
    ///
    /// The quality marker is stripped first. Finished items shadow
    /// materials, which shadow resources.
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing matches under `FallbackPolicy::Strict`.
    pub fn resolve(&self, name: &str, policy: FallbackPolicy) -> CatalogResult<Entity> {
        let (base, _) = strip_quality_marker(name);
        if let Some(object) = self.craftable(base) {
            return Ok(Entity::Craftable(Arc::clone(object)));
        }
        if let Some(resource) = self.resources.get(base) {
            return Ok(Entity::Resource(Arc::clone(resource)));
        }
        match policy {
            FallbackPolicy::Placeholder => Ok(Entity::Resource(Arc::new(Resource::placeholder(base)))),
            FallbackPolicy::Strict => Err(CatalogError::NotFound(name.to_string())),
        }
    }

    /// Unit price of a name, zero for anything that is not a known resource.
    #[must_use]
    pub fn price_of(&self, name: &str) -> f64 {
        let (base, _) = strip_quality_marker(name);
        if self.craftable(base).is_some() {
            return 0.0;
        }
        self.resources.get(base).map_or(0.0, |resource| resource.price)
    }

    /// Gets a craftable (item first, then material) by exact name.
    #[must_use]
    pub fn craftable(&self, name: &str) -> Option<&Arc<CraftableObject>> {
        self.items.get(name).or_else(|| self.materials.get(name))
    }

    /// Returns all craftables in insertion order.
    pub fn craftables(&self) -> impl Iterator<Item = &Arc<CraftableObject>> {
        self.craftable_order.iter().filter_map(|name| self.craftable(name))
    }

    /// Gets a resource by exact name.
    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&Arc<Resource>> {
        self.resources.get(name)
    }

    /// Returns the artisans able to work the profession, in roster order.
    #[must_use]
    pub fn agents_for<'a>(&'a self, profession: &'a str) -> impl Iterator<Item = &'a Arc<Artisan>> + 'a {
        self.agents
            .iter()
            .filter(move |agent| agent.discipline.admits(profession))
    }

    /// Returns the whole roster.
    #[must_use]
    pub fn agents(&self) -> &[Arc<Artisan>] {
        &self.agents
    }

    /// Finds an artisan by name, optionally restricted to a profession.
    #[must_use]
    pub fn find_agent(&self, name: &str, profession: Option<&str>) -> Option<&Arc<Artisan>> {
        self.agents.iter().find(|agent| {
            agent.name == name && profession.map_or(true, |profession| agent.discipline.admits(profession))
        })
    }

    /// Gets a tool by name.
    #[must_use]
    pub fn tool(&self, name: &str) -> Option<&Arc<Tool>> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    /// Returns all tools in catalog order.
    #[must_use]
    pub fn tools(&self) -> &[Arc<Tool>] {
        &self.tools
    }

    /// Gets a supplement by exact name (marker included).
    #[must_use]
    pub fn supplement(&self, name: &str) -> Option<&Arc<Supplement>> {
        self.supplement_index.get(name).map(|&index| &self.supplements[index])
    }

    /// Returns all supplements in catalog order.
    #[must_use]
    pub fn supplements(&self) -> &[Arc<Supplement>] {
        &self.supplements
    }

    /// Returns all commissions in catalog order.
    #[must_use]
    pub fn commissions(&self) -> &[Arc<Commission>] {
        &self.commissions
    }

    /// Returns the number of craftables.
    #[must_use]
    pub fn craftable_count(&self) -> usize {
        self.items.len() + self.materials.len()
    }

    // ========================================================================
    // Recipe Graph Validation
    // ========================================================================

    /// Validates that no craftable requires itself, even transitively.
    ///
    /// Uses Kahn's algorithm over the craftable dependency graph; on
    /// failure the offending path is reported.
    ///
    /// # Errors
    ///
    /// `CycleDetected` with the cycle's names.
    pub fn validate(&self) -> CatalogResult<()> {
        let adjacency = self.dependency_edges();

        let mut in_degree: HashMap<&str, usize> =
            self.craftable_order.iter().map(|name| (name.as_str(), 0)).collect();
        for consumers in adjacency.values() {
            for &consumer in consumers {
                *in_degree.entry(consumer).or_insert(0) += 1;
            }
        }

        let mut queue: VecDeque<&str> = self
            .craftable_order
            .iter()
            .map(String::as_str)
            .filter(|name| in_degree.get(name) == Some(&0))
            .collect();

        let mut sorted_count = 0;
        while let Some(name) = queue.pop_front() {
            sorted_count += 1;
            if let Some(consumers) = adjacency.get(name) {
                for &consumer in consumers {
                    if let Some(degree) = in_degree.get_mut(consumer) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(consumer);
                        }
                    }
                }
            }
        }

        if sorted_count == self.craftable_order.len() {
            Ok(())
        } else {
            Err(CatalogError::CycleDetected(self.find_cycle().unwrap_or_default()))
        }
    }

    /// Finds one recipe cycle, as a path that starts and ends on the same name.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let adjacency = self.dependency_edges();
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();
        let mut path = Vec::new();

        for start in &self.craftable_order {
            if !visited.contains(start.as_str()) {
                if let Some(cycle) = dfs_find_cycle(start, &adjacency, &mut visited, &mut on_stack, &mut path) {
                    return Some(cycle);
                }
            }
        }
        None
    }

    /// Ingredient -> consumer edges between craftables.
    fn dependency_edges(&self) -> HashMap<&str, Vec<&str>> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for consumer in self.craftables() {
            for entry in &consumer.recipe {
                let (ingredient, _) = strip_quality_marker(&entry.name);
                if let Some(producer) = self.craftable(ingredient) {
                    adjacency
                        .entry(producer.name.as_str())
                        .or_default()
                        .push(consumer.name.as_str());
                }
            }
        }
        adjacency
    }
}

/// DFS helper for cycle detection.
fn dfs_find_cycle<'a>(
    name: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    on_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    visited.insert(name);
    on_stack.insert(name);
    path.push(name);

    if let Some(consumers) = adjacency.get(name) {
        for &consumer in consumers {
            if !visited.contains(consumer) {
                if let Some(cycle) = dfs_find_cycle(consumer, adjacency, visited, on_stack, path) {
                    return Some(cycle);
                }
            } else if on_stack.contains(consumer) {
                let start = path.iter().position(|&entry| entry == consumer).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|entry| (*entry).to_string()).collect();
                cycle.push(consumer.to_string());
                return Some(cycle);
            }
        }
    }

    path.pop();
    on_stack.remove(name);
    None
}

fn duplicate(kind: &'static str, name: &str) -> CatalogError {
    CatalogError::DuplicateName {
        kind,
        name: name.to_string(),
    }
}
