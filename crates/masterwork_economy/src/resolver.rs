//! # Recipe Resolver
//!
//! **Recursive expected-cost propagation over the recipe graph**
//!
//! Resolving `q` units of a craftable with a setup:
//!
//! ```text
//! crafts      = q / output_quantity
//! supplements += expected_attempts * crafts                 (the setup's supplement)
//! for each (n, ingredient) in recipe:
//!     absorb resolve(ingredient, n * material_multiplier * crafts, Normal, no setup)
//! supplement_materials = sum over supplements of baseline(supplement) * count
//! ```
//!
//! Ingredients are always resolved at normal quality with their own optimal
//! setup. `supplement_materials` is rebuilt from the accumulated
//! `supplements` ledger after every ingredient has been absorbed, so
//! supplements burned deep in the tree are priced exactly once.
//!
//! ## Supplement Baselines
//!
//! A supplement is priced by crafting one unit of its own object with the
//! fixed reference setup, at the supplement's tier. Searching for the
//! supplement's optimal setup instead would make its price depend on itself.
//! Baselines count raw materials only.

use std::sync::Arc;

use masterwork_catalog::{strip_quality_marker, Catalog, CraftableObject, Entity, FallbackPolicy, QualityTier};

use crate::aggregate::RecipeAggregate;
use crate::engine::CraftingEngine;
use crate::error::{EngineError, EngineResult};
use crate::ledger::QuantityLedger;
use crate::outcome::OutcomeModel;
use crate::setup::Setup;

/// Something a recipe line can resolve to.
///
/// Implemented for the closed set of catalog [`Entity`] kinds.
pub trait Resolvable {
    /// Resolves `quantity` units into a full recipe aggregate.
    ///
    /// Craftables without a setup use their optimal setup. Resources ignore
    /// the setup and the tier.
    ///
    /// # Errors
    ///
    /// `MalformedCatalog` when a craft cannot be evaluated.
    fn resolve_full<M: OutcomeModel>(
        &self,
        engine: &CraftingEngine<M>,
        setup: Option<&Setup>,
        quantity: f64,
        tier: QualityTier,
    ) -> EngineResult<RecipeAggregate>;

    /// Estimates raw materials for `quantity` units with fixed rates.
    /// Missing ingredients are looked up under `fallback`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for rates outside their ranges, `NotFound` for a
    /// missing ingredient under `FallbackPolicy::Strict`.
    fn resolve_by_fixed_rates(
        &self,
        catalog: &Catalog,
        quantity: f64,
        rates: &FixedRates,
        fallback: FallbackPolicy,
    ) -> EngineResult<QuantityLedger>;
}

impl Resolvable for Entity {
    fn resolve_full<M: OutcomeModel>(
        &self,
        engine: &CraftingEngine<M>,
        setup: Option<&Setup>,
        quantity: f64,
        tier: QualityTier,
    ) -> EngineResult<RecipeAggregate> {
        match (self, setup) {
            (Self::Resource(_), _) => Ok(RecipeAggregate::for_resource(self.clone(), quantity)),
            (Self::Craftable(object), Some(setup)) => {
                engine.craft_with_setup(object, setup, quantity, tier, SupplementCosting::Baselines)
            }
            (Self::Craftable(object), None) => engine.craft_optimally(object, quantity, tier),
        }
    }

    fn resolve_by_fixed_rates(
        &self,
        catalog: &Catalog,
        quantity: f64,
        rates: &FixedRates,
        fallback: FallbackPolicy,
    ) -> EngineResult<QuantityLedger> {
        rates.validate()?;
        let mut ledger = QuantityLedger::new();
        expand_fixed(catalog, self, quantity, rates, fallback, &mut ledger)?;
        Ok(ledger)
    }
}

/// Whether a craft prices the supplements it burns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SupplementCosting {
    /// Price every burned supplement from its baseline.
    Baselines,
    /// Leave `supplement_materials` empty. Used for baselines themselves.
    Skip,
}

impl<M: OutcomeModel> CraftingEngine<M> {
    /// Resolves a craft with a concrete setup.
    pub(crate) fn craft_with_setup(
        &self,
        object: &Arc<CraftableObject>,
        setup: &Setup,
        quantity: f64,
        tier: QualityTier,
        costing: SupplementCosting,
    ) -> EngineResult<RecipeAggregate> {
        let outcome = self.model.evaluate(object, setup, tier)?;
        let crafts = quantity / object.output_quantity;

        let mut aggregate = RecipeAggregate::new(Some(Entity::Craftable(Arc::clone(object))), quantity, tier);
        aggregate.setup = Some(setup.clone());
        aggregate
            .supplements
            .add(outcome.expected_attempts * crafts, setup.supplement.name.as_str());

        for entry in &object.recipe {
            let ingredient = self.catalog.resolve(&entry.name, self.config.ingredient_fallback)?;
            let share = entry.quantity * outcome.material_multiplier * crafts;
            let resolved = ingredient.resolve_full(self, None, share, QualityTier::Normal)?;
            aggregate.absorb(&resolved);
        }

        aggregate.supplement_materials.clear();
        if costing == SupplementCosting::Baselines {
            let mut supplement_materials = QuantityLedger::new();
            for entry in &aggregate.supplements {
                let baseline = self.supplement_baseline(&entry.name)?;
                let scaled = baseline.multiply(entry.quantity / baseline.quantity);
                supplement_materials.merge(&scaled.materials);
            }
            aggregate.supplement_materials = supplement_materials;
        }

        aggregate.yields = Some(outcome.yields(crafts));
        Ok(aggregate)
    }

    /// Resolves a craft with the item's optimal setup, scaling the cached
    /// single-unit recipe.
    pub(crate) fn craft_optimally(
        &self,
        object: &Arc<CraftableObject>,
        quantity: f64,
        tier: QualityTier,
    ) -> EngineResult<RecipeAggregate> {
        let ranking = self.ranking(object, tier)?;
        let best = ranking
            .first()
            .ok_or_else(|| EngineError::malformed(format!("no ranked setup for {}", object.name)))?;
        Ok(best.recipe.multiply(quantity / best.recipe.quantity))
    }

    /// Single-unit raw material cost of a supplement, crafted with the
    /// reference setup. Computed once per catalog supplement.
    ///
    /// Unknown names are priced as zero-cost resources.
    ///
    /// # Errors
    ///
    /// `MalformedCatalog` if the supplement's object cannot be crafted.
    pub fn supplement_baseline(&self, name: &str) -> EngineResult<Arc<RecipeAggregate>> {
        match self.baselines.get(name) {
            Some(slot) => slot.get_or_try_init(|| self.compute_baseline(name)).map(Arc::clone),
            None => self.compute_baseline(name),
        }
    }

    fn compute_baseline(&self, name: &str) -> EngineResult<Arc<RecipeAggregate>> {
        let (_, tier) = strip_quality_marker(name);
        let baseline = match self.catalog.resolve(name, FallbackPolicy::Placeholder)? {
            resource @ Entity::Resource(_) => RecipeAggregate::for_resource(resource, 1.0),
            Entity::Craftable(object) => {
                self.craft_with_setup(&object, &self.reference, 1.0, tier, SupplementCosting::Skip)?
            }
        };
        tracing::debug!(
            supplement = name,
            cost = baseline.material_cost(&self.catalog),
            "supplement baseline"
        );
        Ok(Arc::new(baseline))
    }
}

// ============================================================================
// Fixed-Rate Estimates
// ============================================================================

/// Success, dab hand and recycle chances for one kind of craft.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepRates {
    /// Chance an attempt succeeds, in (0, 1].
    pub success: f64,
    /// Chance of a bonus unit, in [0, 1].
    pub dab_hand: f64,
    /// Chance a failure refunds its materials, in [0, 1].
    pub recycle: f64,
}

impl StepRates {
    /// Creates a set of rates.
    #[must_use]
    pub const fn new(success: f64, dab_hand: f64, recycle: f64) -> Self {
        Self {
            success,
            dab_hand,
            recycle,
        }
    }

    fn validate(&self) -> EngineResult<()> {
        if !(self.success > 0.0 && self.success <= 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "success rate {} must lie in (0, 1]",
                self.success
            )));
        }
        for (label, rate) in [("dab hand", self.dab_hand), ("recycle", self.recycle)] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(EngineError::InvalidConfig(format!("{label} rate {rate} must lie in [0, 1]")));
            }
        }
        Ok(())
    }
}

impl Default for StepRates {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}

/// Fixed rates for a quick estimate that skips the setup search.
///
/// Intermediate materials use the primary rates and never dab hand.
/// Finished items use the auxiliary rates when given, else the primary ones.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedRates {
    /// Rates for intermediate materials.
    pub primary: StepRates,
    /// Rates for finished (dab hand capable) items.
    pub auxiliary: Option<StepRates>,
}

impl FixedRates {
    /// Uses the same rates for every craft.
    #[must_use]
    pub const fn uniform(rates: StepRates) -> Self {
        Self {
            primary: rates,
            auxiliary: None,
        }
    }

    /// Sets the rates for finished items.
    #[must_use]
    pub const fn with_auxiliary(mut self, rates: StepRates) -> Self {
        self.auxiliary = Some(rates);
        self
    }

    /// Rates applied to a finished item.
    #[must_use]
    pub fn for_items(&self) -> StepRates {
        self.auxiliary.unwrap_or(self.primary)
    }

    /// Checks every rate lies in its range.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the first bad rate.
    pub fn validate(&self) -> EngineResult<()> {
        self.primary.validate()?;
        if let Some(auxiliary) = &self.auxiliary {
            auxiliary.validate()?;
        }
        Ok(())
    }

    /// Ingredient units consumed per nominal recipe unit.
    #[must_use]
    pub fn multiplier(&self, object: &CraftableObject) -> f64 {
        if object.can_dab_hand {
            let rates = self.for_items();
            (1.0 + (1.0 / rates.success - 1.0) * (1.0 - rates.recycle)) / (1.0 + rates.dab_hand)
        } else {
            1.0 + (1.0 / self.primary.success - 1.0) * (1.0 - self.primary.recycle)
        }
    }
}

fn expand_fixed(
    catalog: &Catalog,
    entity: &Entity,
    quantity: f64,
    rates: &FixedRates,
    fallback: FallbackPolicy,
    ledger: &mut QuantityLedger,
) -> EngineResult<()> {
    match entity {
        Entity::Resource(resource) => {
            ledger.add(quantity, resource.name.as_str());
            Ok(())
        }
        Entity::Craftable(object) => {
            let scale = rates.multiplier(object) * quantity / object.output_quantity;
            for entry in &object.recipe {
                let ingredient = catalog.resolve(&entry.name, fallback)?;
                expand_fixed(catalog, &ingredient, entry.quantity * scale, rates, fallback, ledger)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use masterwork_catalog::Resource;

    const EPSILON: f64 = 1e-9;

    fn forge() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_resource(Resource::new("Ore", 10.0)).unwrap();
        catalog
            .add_craftable(CraftableObject::new("Bar", 2.0, 100, 0).with_input(4.0, "Ore"))
            .unwrap();
        catalog
            .add_craftable(
                CraftableObject::new("Sword", 1.0, 100, 0)
                    .with_dab_hand(true)
                    .with_input(3.0, "Bar")
                    .with_input(1.0, "Leather"),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_fixed_rates_perfect_crafting() {
        let catalog = forge();
        let sword = catalog.resolve("Sword", FallbackPolicy::Strict).unwrap();
        let ledger = sword
            .resolve_by_fixed_rates(&catalog, 2.0, &FixedRates::default(), FallbackPolicy::Placeholder)
            .unwrap();
        // 2 swords -> 6 bars -> 3 crafts of 4 ore
        assert!((ledger.quantity_of("Ore") - 12.0).abs() < EPSILON);
        // Unknown ingredients pass through as free resources
        assert!((ledger.quantity_of("Leather") - 2.0).abs() < EPSILON);

        assert_eq!(
            sword.resolve_by_fixed_rates(&catalog, 2.0, &FixedRates::default(), FallbackPolicy::Strict),
            Err(EngineError::NotFound {
                name: "Leather".to_string()
            })
        );
    }

    #[test]
    fn test_fixed_rates_split_by_kind() {
        let catalog = forge();
        let rates = FixedRates::uniform(StepRates::new(0.5, 0.0, 0.0)).with_auxiliary(StepRates::new(1.0, 0.25, 0.0));

        let bar = catalog.craftable("Bar").unwrap();
        let sword = catalog.craftable("Sword").unwrap();
        assert!((rates.multiplier(bar) - 2.0).abs() < EPSILON);
        assert!((rates.multiplier(sword) - 0.8).abs() < EPSILON);

        let ledger = Entity::Craftable(Arc::clone(sword))
            .resolve_by_fixed_rates(&catalog, 1.0, &rates, FallbackPolicy::Placeholder)
            .unwrap();
        // 0.8 * 3 = 2.4 bars -> 1.2 crafts * 2.0 -> 2.4 * 4 = 9.6 ore
        assert!((ledger.quantity_of("Ore") - 9.6).abs() < EPSILON);
    }

    #[test]
    fn test_fixed_rates_recycle() {
        let rates = FixedRates::uniform(StepRates::new(0.5, 0.0, 0.5));
        let bar = CraftableObject::new("Bar", 1.0, 100, 0);
        assert!((rates.multiplier(&bar) - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_invalid_rates() {
        let catalog = forge();
        let ore = catalog.resolve("Ore", FallbackPolicy::Strict).unwrap();
        for rates in [
            FixedRates::uniform(StepRates::new(0.0, 0.0, 0.0)),
            FixedRates::uniform(StepRates::new(1.0, 1.5, 0.0)),
            FixedRates::default().with_auxiliary(StepRates::new(1.0, 0.0, -0.1)),
        ] {
            assert!(matches!(
                ore.resolve_by_fixed_rates(&catalog, 1.0, &rates, FallbackPolicy::Placeholder),
                Err(EngineError::InvalidConfig(_))
            ));
        }
    }
}
