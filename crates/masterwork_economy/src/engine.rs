//! # Crafting Engine
//!
//! The public entry point. Owns the catalog, the outcome model and every
//! memo table, and exposes the three core operations:
//!
//! - [`CraftingEngine::resolve_entity`]: name -> catalog entity
//! - [`CraftingEngine::craft`]: full cost breakdown for N units
//! - [`CraftingEngine::optimal_rankings`]: best setups for one unit
//!
//! Memo slots for every craftable (per tier) and every supplement are
//! created up front, so no map is ever locked after construction.

use std::collections::HashMap;
use std::sync::Arc;

use masterwork_catalog::{Catalog, Entity, FallbackPolicy, QualityTier};

use crate::aggregate::{RankedRecipe, RecipeAggregate};
use crate::config::{EngineConfig, ReferenceSetup};
use crate::error::{EngineError, EngineResult};
use crate::graph::check_resolution_graph;
use crate::ledger::QuantityLedger;
use crate::memo::MemoSlot;
use crate::outcome::{OutcomeModel, StandardOutcomeModel};
use crate::resolver::{FixedRates, Resolvable};
use crate::search::Ranking;
use crate::setup::{Setup, SetupRequest};

/// Cost resolution and setup optimisation over one catalog.
///
/// The engine is `Sync`; share it behind an `Arc` and call it from as many
/// threads as needed.
pub struct CraftingEngine<M = StandardOutcomeModel> {
    pub(crate) catalog: Catalog,
    pub(crate) config: EngineConfig,
    pub(crate) model: M,
    /// Setup used to craft supplement baselines.
    pub(crate) reference: Setup,
    /// Per craftable, one ranking slot per tier.
    pub(crate) rankings: HashMap<String, [MemoSlot<Ranking>; 2]>,
    /// Per catalog supplement, its baseline recipe.
    pub(crate) baselines: HashMap<String, MemoSlot<Arc<RecipeAggregate>>>,
}

impl CraftingEngine<StandardOutcomeModel> {
    /// Creates an engine with the standard outcome model.
    ///
    /// # Errors
    ///
    /// See [`CraftingEngine::with_model`].
    pub fn new(catalog: Catalog, config: EngineConfig) -> EngineResult<Self> {
        let model = StandardOutcomeModel::from_config(&config);
        Self::with_model(catalog, config, model)
    }
}

impl<M: OutcomeModel> CraftingEngine<M> {
    /// Creates an engine with a custom outcome model.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the configuration is unusable
    /// - `MalformedCatalog` if recipes or supplement baselines form a cycle
    /// - `NotFound` if a part of the reference setup is not in the catalog
    pub fn with_model(catalog: Catalog, config: EngineConfig, model: M) -> EngineResult<Self> {
        config.validate()?;
        catalog.validate()?;
        check_resolution_graph(&catalog)?;
        let reference = resolve_reference(&catalog, &config.reference_setup)?;

        let rankings: HashMap<String, [MemoSlot<Ranking>; 2]> = catalog
            .craftables()
            .map(|object| (object.name.clone(), Default::default()))
            .collect();
        let baselines: HashMap<String, MemoSlot<Arc<RecipeAggregate>>> = catalog
            .supplements()
            .iter()
            .map(|supplement| (supplement.name.clone(), MemoSlot::default()))
            .collect();

        tracing::info!(
            craftables = catalog.craftable_count(),
            supplements = catalog.supplements().len(),
            reference = %reference,
            "crafting engine ready"
        );

        Ok(Self {
            catalog,
            config,
            model,
            reference,
            rankings,
            baselines,
        })
    }

    /// The catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The outcome model.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The setup used to price supplements.
    #[must_use]
    pub fn reference_setup(&self) -> &Setup {
        &self.reference
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Resolves a name to a catalog entity.
    ///
    /// # Errors
    ///
    /// `NotFound` under `FallbackPolicy::Strict` when nothing matches.
    pub fn resolve_entity(&self, name: &str, policy: FallbackPolicy) -> EngineResult<Entity> {
        Ok(self.catalog.resolve(name, policy)?)
    }

    /// Resolves `quantity` units of an item into a full cost breakdown.
    ///
    /// Without a setup the item's optimal setup is used. Resources ignore
    /// the setup.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the item or a named setup part does not exist, or an
    ///   ingredient is missing under a strict `ingredient_fallback`
    /// - `MalformedCatalog` if the craft cannot be evaluated
    pub fn craft(
        &self,
        item_name: &str,
        quantity: f64,
        tier: QualityTier,
        setup: Option<&SetupRequest>,
    ) -> EngineResult<RecipeAggregate> {
        let entity = self.catalog.resolve(item_name, FallbackPolicy::Strict)?;
        let setup = match (setup, &entity) {
            (Some(request), Entity::Craftable(object)) => Some(self.setup_for(request, object.profession.as_deref())?),
            _ => None,
        };
        entity.resolve_full(self, setup.as_ref(), quantity, tier)
    }

    /// The best setups for one unit of an item, cheapest first, at most
    /// `ranking_len` long.
    ///
    /// A resource ranks as a single entry: buying it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the item does not exist
    /// - `MalformedCatalog` if the item has no eligible setup
    pub fn optimal_rankings(&self, item_name: &str, tier: QualityTier) -> EngineResult<Vec<RankedRecipe>> {
        self.list_best(item_name, tier)
    }

    /// The cheapest single-unit recipe for an item.
    ///
    /// # Errors
    ///
    /// As [`CraftingEngine::optimal_rankings`].
    pub fn find_best(&self, item_name: &str, tier: QualityTier) -> EngineResult<RankedRecipe> {
        self.list_best(item_name, tier)?
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::malformed(format!("no ranked setup for {item_name}")))
    }

    /// The first `ranking_len` entries of an item's ranking.
    ///
    /// # Errors
    ///
    /// As [`CraftingEngine::optimal_rankings`].
    pub fn list_best(&self, item_name: &str, tier: QualityTier) -> EngineResult<Vec<RankedRecipe>> {
        match self.catalog.resolve(item_name, FallbackPolicy::Strict)? {
            resource @ Entity::Resource(_) => {
                let recipe = RecipeAggregate::for_resource(resource, 1.0);
                Ok(vec![RankedRecipe::new(recipe, &self.catalog)])
            }
            Entity::Craftable(object) => {
                let ranking = self.ranking(&object, tier)?;
                Ok(ranking.iter().take(self.config.ranking_len).cloned().collect())
            }
        }
    }

    /// True once the item's ranking for `tier` has been computed.
    #[must_use]
    pub fn is_ranked(&self, item_name: &str, tier: QualityTier) -> bool {
        self.rankings
            .get(item_name)
            .is_some_and(|slots| slots[tier.index()].get().is_some())
    }

    /// Every setup the search considers for an item, in enumeration order.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown names, `MalformedCatalog` if the entity is not
    /// craftable or has no eligible setup.
    pub fn candidate_setups(&self, item_name: &str) -> EngineResult<Vec<Setup>> {
        match self.catalog.resolve(item_name, FallbackPolicy::Strict)? {
            Entity::Craftable(object) => self.candidates(&object),
            Entity::Resource(resource) => Err(EngineError::malformed(format!(
                "{} is a resource and has no setups",
                resource.name
            ))),
        }
    }

    /// Resolves a setup request against the catalog.
    ///
    /// # Errors
    ///
    /// `NotFound` naming the first missing part.
    pub fn setup(&self, request: &SetupRequest) -> EngineResult<Setup> {
        self.setup_for(request, None)
    }

    /// Raw material estimate for `quantity` units with fixed rates.
    ///
    /// # Errors
    ///
    /// `NotFound` if the item (or, under a strict `ingredient_fallback`, an
    /// ingredient) does not exist, `InvalidConfig` for bad rates.
    pub fn craft_by_fixed_rates(
        &self,
        item_name: &str,
        quantity: f64,
        rates: &FixedRates,
    ) -> EngineResult<QuantityLedger> {
        self.catalog
            .resolve(item_name, FallbackPolicy::Strict)?
            .resolve_by_fixed_rates(&self.catalog, quantity, rates, self.config.ingredient_fallback)
    }

    /// Prefers an artisan serving the profession when names repeat.
    fn setup_for(&self, request: &SetupRequest, profession: Option<&str>) -> EngineResult<Setup> {
        let agent = profession
            .and_then(|profession| self.catalog.find_agent(&request.agent, Some(profession)))
            .or_else(|| self.catalog.find_agent(&request.agent, None))
            .ok_or_else(|| not_found(&request.agent))?;
        let tool = self.catalog.tool(&request.tool).ok_or_else(|| not_found(&request.tool))?;
        let supplement = self
            .catalog
            .supplement(&request.supplement)
            .ok_or_else(|| not_found(&request.supplement))?;
        Ok(Setup::new(Arc::clone(agent), Arc::clone(tool), Arc::clone(supplement)))
    }
}

fn resolve_reference(catalog: &Catalog, reference: &ReferenceSetup) -> EngineResult<Setup> {
    let agent = catalog
        .find_agent(&reference.agent, reference.discipline.as_deref())
        .ok_or_else(|| not_found(&reference.agent))?;
    let tool = catalog.tool(&reference.tool).ok_or_else(|| not_found(&reference.tool))?;
    let supplement = catalog
        .supplement(&reference.supplement)
        .ok_or_else(|| not_found(&reference.supplement))?;
    Ok(Setup::new(Arc::clone(agent), Arc::clone(tool), Arc::clone(supplement)))
}

fn not_found(name: &str) -> EngineError {
    EngineError::NotFound { name: name.to_string() }
}
