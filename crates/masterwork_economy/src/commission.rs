//! # Commission Ranking
//!
//! Orders commissions by how much crafting cost each point of reward
//! takes. Lower is better.

use std::sync::Arc;

use masterwork_catalog::{Commission, QualityTier};

use crate::aggregate::RecipeAggregate;
use crate::engine::CraftingEngine;
use crate::error::{EngineError, EngineResult};
use crate::outcome::OutcomeModel;

/// A commission with the optimal cost of delivering it.
#[derive(Clone, Debug, PartialEq)]
pub struct CommissionRanking {
    /// The commission.
    pub commission: Arc<Commission>,
    /// Optimal single-unit recipe for its target.
    pub recipe: RecipeAggregate,
    /// Cost of that recipe.
    pub cost: f64,
    /// `cost / reward_value`.
    pub cost_per_reward: f64,
}

impl<M: OutcomeModel> CraftingEngine<M> {
    /// Ranks every catalog commission by cost per unit of reward, ascending.
    /// Ties keep catalog order. Commissions whose target is not in the
    /// catalog are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Any other error from resolving a target.
    pub fn rank_commissions(&self) -> EngineResult<Vec<CommissionRanking>> {
        let mut rankings = Vec::with_capacity(self.catalog.commissions().len());
        for commission in self.catalog.commissions() {
            let recipe = match self.craft(commission.target_name(), 1.0, QualityTier::Normal, None) {
                Ok(recipe) => recipe,
                Err(EngineError::NotFound { name }) => {
                    tracing::warn!(commission = %commission.name, missing = %name, "commission skipped");
                    continue;
                }
                Err(error) => return Err(error),
            };
            let cost = recipe.cost(&self.catalog);
            rankings.push(CommissionRanking {
                commission: Arc::clone(commission),
                recipe,
                cost,
                cost_per_reward: cost / commission.reward_value,
            });
        }
        rankings.sort_by(|a, b| a.cost_per_reward.total_cmp(&b.cost_per_reward));
        Ok(rankings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use masterwork_catalog::{Artisan, Catalog, CraftableObject, Resource, Supplement, Tool};

    fn guild(commissions: &[Commission]) -> CraftingEngine {
        let mut catalog = Catalog::new();
        catalog.add_resource(Resource::new("Ore", 10.0)).unwrap();
        catalog.add_resource(Resource::new("Silk", 3.0)).unwrap();
        catalog
            .add_craftable(
                CraftableObject::new("Bar", 1.0, 100, 0)
                    .with_profession("Blacksmithing")
                    .with_input(2.0, "Ore"),
            )
            .unwrap();
        catalog.add_agent(Artisan::new("Beatrice", "Alchemy", 100.0, 0.0)).unwrap();
        catalog.add_agent(Artisan::new("Grim", "Blacksmithing", 100.0, 0.0)).unwrap();
        catalog.add_tool(Tool::new("Forgehammer of Gond", "Any", 0.0, 0.0)).unwrap();
        catalog.add_supplement(Supplement::new("Wintergreen Tea +1", 0.0, 0.0)).unwrap();
        for commission in commissions {
            catalog.add_commission(commission.clone()).unwrap();
        }
        CraftingEngine::new(catalog, EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_commissions_ranked_by_cost_per_reward() {
        let engine = guild(&[Commission::new("Bar", 40.0), Commission::new("Silk", 30.0)]);
        let rankings = engine.rank_commissions().unwrap();

        let names: Vec<&str> = rankings.iter().map(|ranking| ranking.commission.name.as_str()).collect();
        assert_eq!(names, vec!["Silk", "Bar"]);
        assert!((rankings[0].cost_per_reward - 0.1).abs() < 1e-12);
        assert!((rankings[1].cost - 20.0).abs() < 1e-12);
        assert!((rankings[1].cost_per_reward - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_target_is_skipped() {
        let mut bounty = Commission::new("Bounty", 10.0);
        bounty.target = Some("Dragon Scale".to_string());
        let engine = guild(&[bounty, Commission::new("Bar", 40.0)]);

        let rankings = engine.rank_commissions().unwrap();
        let names: Vec<&str> = rankings.iter().map(|ranking| ranking.commission.name.as_str()).collect();
        assert_eq!(names, vec!["Bar"]);
    }
}
