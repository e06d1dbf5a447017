//! # Optimal Setup Search
//!
//! **Parallel brute force over artisan x tool x supplement, memoized once
//! per item and tier**
//!
//! ## Phases
//!
//! ```text
//! candidates:  agents_for(profession) x tools x supplements  (catalog order)
//! evaluate:    N workers pull candidate indices, send (index, result)
//! collect:     results land in a slot per candidate, all workers joined
//! rank:        stable sort by cost, cache the full ranking
//! ```
//!
//! Every candidate is evaluated; there is no early exit. Ties keep
//! enumeration order. The ranking is written once behind the item's own
//! single-flight guard, so concurrent lookups of one item share a single
//! search and lookups of different items never contend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::bounded;
use masterwork_catalog::{CraftableObject, QualityTier};

use crate::aggregate::RankedRecipe;
use crate::engine::CraftingEngine;
use crate::error::{EngineError, EngineResult};
use crate::outcome::OutcomeModel;
use crate::resolver::SupplementCosting;
use crate::setup::Setup;

/// Full ranking of an item's setups, best first.
pub(crate) type Ranking = Arc<[RankedRecipe]>;

impl<M: OutcomeModel> CraftingEngine<M> {
    /// Returns the item's ranking, searching on first use.
    pub(crate) fn ranking(&self, object: &Arc<CraftableObject>, tier: QualityTier) -> EngineResult<Ranking> {
        match self.rankings.get(object.name.as_str()) {
            Some(slots) => slots[tier.index()]
                .get_or_try_init(|| self.search(object, tier))
                .map(Arc::clone),
            None => self.search(object, tier),
        }
    }

    /// Every setup the search considers for an item, in enumeration order.
    pub(crate) fn candidates(&self, object: &CraftableObject) -> EngineResult<Vec<Setup>> {
        let profession = object
            .profession
            .as_deref()
            .ok_or_else(|| EngineError::malformed(format!("{} has no profession", object.name)))?;

        let agents: Vec<_> = self.catalog.agents_for(profession).collect();
        let tools = self.catalog.tools();
        let supplements = self.catalog.supplements();

        let mut candidates = Vec::with_capacity(agents.len() * tools.len() * supplements.len());
        for &agent in &agents {
            for tool in tools {
                for supplement in supplements {
                    // An item never supplements its own craft
                    if supplement.name == object.name {
                        continue;
                    }
                    candidates.push(Setup::new(Arc::clone(agent), Arc::clone(tool), Arc::clone(supplement)));
                }
            }
        }

        if candidates.is_empty() {
            return Err(EngineError::malformed(format!(
                "no eligible setup for {} ({profession})",
                object.name
            )));
        }
        Ok(candidates)
    }

    fn search(&self, object: &Arc<CraftableObject>, tier: QualityTier) -> EngineResult<Ranking> {
        let start = Instant::now();
        let candidates = self.candidates(object)?;
        let mut ranked = self.evaluate_all(object, tier, &candidates)?;
        ranked.sort_by(|a, b| a.cost.total_cmp(&b.cost));

        if let Some(best) = ranked.first() {
            tracing::info!(
                item = %object.name,
                %tier,
                candidates = candidates.len(),
                best_cost = best.cost,
                elapsed_us = start.elapsed().as_micros() as u64,
                "setup search complete"
            );
        }
        Ok(ranked.into())
    }

    /// Resolves a single-unit craft per candidate on a fixed worker pool.
    ///
    /// Results are returned in candidate order. The first failing candidate
    /// (by index) fails the whole search.
    fn evaluate_all(
        &self,
        object: &Arc<CraftableObject>,
        tier: QualityTier,
        candidates: &[Setup],
    ) -> EngineResult<Vec<RankedRecipe>> {
        let count = candidates.len();
        let workers = self.config.worker_count().clamp(1, count.max(1));
        let next = AtomicUsize::new(0);
        let (sender, receiver) = bounded(count);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let sender = sender.clone();
                let next = &next;
                scope.spawn(move || loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(setup) = candidates.get(index) else {
                        break;
                    };
                    let result = self
                        .craft_with_setup(object, setup, 1.0, tier, SupplementCosting::Baselines)
                        .map(|recipe| RankedRecipe::new(recipe, &self.catalog));
                    if sender.send((index, result)).is_err() {
                        break;
                    }
                });
            }
        });
        drop(sender);

        let mut slots: Vec<Option<EngineResult<RankedRecipe>>> = (0..count).map(|_| None).collect();
        for (index, result) in receiver.iter() {
            slots[index] = Some(result);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    Err(EngineError::malformed(format!(
                        "candidate {index} for {} produced no result",
                        object.name
                    )))
                })
            })
            .collect()
    }
}
