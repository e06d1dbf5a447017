//! # Recipe Aggregates
//!
//! The value every resolution returns: what was made, how, and the full
//! expanded bill of materials.
//!
//! Aggregates are values. `multiply` builds a new aggregate with copied
//! ledgers; `absorb` only ever touches the receiver.

use masterwork_catalog::{Catalog, Entity, QualityTier};

use crate::ledger::QuantityLedger;
use crate::outcome::YieldStats;
use crate::setup::Setup;

/// A resolved recipe and its cost breakdown.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecipeAggregate {
    /// What this aggregate produces. `None` for synthetic aggregates.
    pub result: Option<Entity>,
    /// Units this aggregate represents.
    pub quantity: f64,
    /// Setup used for the top-level craft.
    pub setup: Option<Setup>,
    /// Raw resources consumed, recursively.
    pub materials: QuantityLedger,
    /// Supplements burned, by name. Bookkeeping only, carries no price.
    pub supplements: QuantityLedger,
    /// Raw resources consumed producing the burned supplements.
    pub supplement_materials: QuantityLedger,
    /// Tier of the top-level craft.
    pub tier: QualityTier,
    /// Expected attempts and results. `None` for resources.
    pub yields: Option<YieldStats>,
}

impl RecipeAggregate {
    /// Creates an empty aggregate for `quantity` units of `result`.
    #[must_use]
    pub fn new(result: Option<Entity>, quantity: f64, tier: QualityTier) -> Self {
        Self {
            result,
            quantity,
            tier,
            ..Self::default()
        }
    }

    /// The aggregate for raw resources: the resource itself, nothing else.
    #[must_use]
    pub fn for_resource(entity: Entity, quantity: f64) -> Self {
        let materials = QuantityLedger::single(quantity, entity.name());
        Self {
            materials,
            ..Self::new(Some(entity), quantity, QualityTier::Normal)
        }
    }

    /// Total cost: materials plus supplement materials at catalog prices.
    #[must_use]
    pub fn cost(&self, catalog: &Catalog) -> f64 {
        self.material_cost(catalog) + self.supplement_cost(catalog)
    }

    /// Cost of the direct materials.
    #[must_use]
    pub fn material_cost(&self, catalog: &Catalog) -> f64 {
        self.materials.value(|name| catalog.price_of(name))
    }

    /// Cost of producing the burned supplements.
    #[must_use]
    pub fn supplement_cost(&self, catalog: &Catalog) -> f64 {
        self.supplement_materials.value(|name| catalog.price_of(name))
    }

    /// Merges another aggregate's three ledgers into this one.
    pub fn absorb(&mut self, other: &Self) {
        self.materials.merge(&other.materials);
        self.supplements.merge(&other.supplements);
        self.supplement_materials.merge(&other.supplement_materials);
    }

    /// Returns a copy scaled by `factor`. The receiver is left unchanged.
    #[must_use]
    pub fn multiply(&self, factor: f64) -> Self {
        Self {
            result: self.result.clone(),
            quantity: self.quantity * factor,
            setup: self.setup.clone(),
            materials: self.materials.scaled(factor),
            supplements: self.supplements.scaled(factor),
            supplement_materials: self.supplement_materials.scaled(factor),
            tier: self.tier,
            yields: self.yields.map(|yields| yields.scaled(factor)),
        }
    }

    /// Name of the produced entity, if any.
    #[must_use]
    pub fn result_name(&self) -> Option<&str> {
        self.result.as_ref().map(Entity::name)
    }
}

/// A recipe paired with its total cost, as ranked by the setup search.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedRecipe {
    /// The single-unit recipe.
    pub recipe: RecipeAggregate,
    /// Its total cost.
    pub cost: f64,
}

impl RankedRecipe {
    /// Prices a recipe.
    #[must_use]
    pub fn new(recipe: RecipeAggregate, catalog: &Catalog) -> Self {
        let cost = recipe.cost(catalog);
        Self { recipe, cost }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use masterwork_catalog::Resource;
    use std::sync::Arc;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_resource(Resource::new("Ore", 10.0)).unwrap();
        catalog.add_resource(Resource::new("Coal", 5.0)).unwrap();
        catalog.add_resource(Resource::new("Herb", 2.0)).unwrap();
        catalog
    }

    fn sample() -> RecipeAggregate {
        let mut aggregate = RecipeAggregate::new(None, 1.0, QualityTier::Normal);
        aggregate.materials.add(4.0, "Ore");
        aggregate.materials.add(1.0, "Coal");
        aggregate.supplements.add(2.0, "Tea");
        aggregate.supplement_materials.add(3.0, "Herb");
        aggregate
    }

    #[test]
    fn test_cost_ignores_supplement_bookkeeping() {
        let catalog = catalog();
        let aggregate = sample();
        assert_eq!(aggregate.material_cost(&catalog), 45.0);
        assert_eq!(aggregate.supplement_cost(&catalog), 6.0);
        assert_eq!(aggregate.cost(&catalog), 51.0);
    }

    #[test]
    fn test_multiply_is_deep_copy() {
        let catalog = catalog();
        let original = sample();
        let tripled = original.multiply(3.0);

        assert!((tripled.cost(&catalog) - 3.0 * original.cost(&catalog)).abs() < 1e-9);
        assert_eq!(tripled.quantity, 3.0);
        assert_eq!(tripled.supplements.quantity_of("Tea"), 6.0);
        assert_eq!(original.materials.quantity_of("Ore"), 4.0);
        assert_eq!(original.quantity, 1.0);
        assert_eq!(original.multiply(0.0).cost(&catalog), 0.0);
    }

    #[test]
    fn test_absorb_merges_all_ledgers() {
        let mut left = sample();
        let mut right = RecipeAggregate::new(None, 1.0, QualityTier::Normal);
        right.materials.add(2.0, "Ore");
        right.materials.add(1.0, "Silver");
        right.supplements.add(1.0, "Tea");

        left.absorb(&right);
        let names: Vec<&str> = left.materials.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, vec!["Ore", "Coal", "Silver"]);
        assert_eq!(left.materials.quantity_of("Ore"), 6.0);
        assert_eq!(left.supplements.quantity_of("Tea"), 3.0);
        assert_eq!(right.materials.quantity_of("Ore"), 2.0);
    }

    #[test]
    fn test_resource_aggregate() {
        let ore = Entity::Resource(Arc::new(Resource::new("Ore", 10.0)));
        let aggregate = RecipeAggregate::for_resource(ore, 7.0);
        assert_eq!(aggregate.result_name(), Some("Ore"));
        assert_eq!(aggregate.cost(&catalog()), 70.0);
        assert!(aggregate.setup.is_none());
        assert!(aggregate.supplements.is_empty());
    }
}
