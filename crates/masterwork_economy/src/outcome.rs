//! # Crafting Outcome Model
//!
//! **Probability model for a single craft under a given setup**
//!
//! ```text
//! success       = min(1, (agent.prof + tool.prof + supplement.prof) / item.proficiency)
//! differential  = item.focus - agent.focus - tool.prof - supplement.focus
//! high_quality  = clamp(1 - FOCUS_MULTIPLIER * differential, floor, 1)
//! attempts      = (1 / success) / (1 + dab)           [/ high_quality at +1]
//! multiplier    = (1 + (1/success - 1)(1 - recycle)) / (1 + dab)   [/ high_quality at +1]
//! ```
//!
//! The tool contributes its proficiency to the focus differential, not its
//! focus. Recycle and dab hand chances of the three parts are combined with
//! one engine-wide [`AbilityCombination`].

use masterwork_catalog::{CraftableObject, QualityTier};

use crate::config::{AbilityCombination, EngineConfig};
use crate::error::{EngineError, EngineResult};
use crate::setup::Setup;

/// Evaluates crafts. Implementations must be pure: the engine memoizes
/// whatever the first evaluation of a setup produces.
pub trait OutcomeModel: Send + Sync {
    /// Computes the outcome of crafting `object` with `setup` at `tier`.
    ///
    /// # Errors
    ///
    /// `MalformedCatalog` when the numbers cannot support a craft.
    fn evaluate(&self, object: &CraftableObject, setup: &Setup, tier: QualityTier) -> EngineResult<CraftingOutcome>;
}

/// Probabilities and expected counts for one craft.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CraftingOutcome {
    /// Tier the outcome was computed for.
    pub tier: QualityTier,
    /// Chance an attempt succeeds, in (0, 1].
    pub success_chance: f64,
    /// Chance a success is high quality.
    pub high_quality_chance: f64,
    /// Combined chance a failure refunds its materials.
    pub recycle_chance: f64,
    /// Combined chance of a bonus unit. Zero for objects that cannot dab hand.
    pub dab_hand_chance: f64,
    /// `1 / success_chance`.
    pub attempts_per_success: f64,
    /// Attempts (and supplements burned) per craft of the requested tier.
    pub expected_attempts: f64,
    /// Ingredient units consumed per nominal recipe unit.
    pub material_multiplier: f64,
}

impl CraftingOutcome {
    /// Yield statistics for a number of crafts.
    #[must_use]
    pub fn yields(&self, crafts: f64) -> YieldStats {
        let attempts = self.expected_attempts * crafts;
        let successes = attempts * self.success_chance;
        let bonus = 1.0 + self.dab_hand_chance;
        YieldStats {
            expected_attempts: attempts,
            expected_failures: attempts * (1.0 - self.success_chance),
            expected_normal_results: successes * (1.0 - self.high_quality_chance) * bonus,
            expected_high_quality_results: successes * self.high_quality_chance * bonus,
        }
    }
}

/// Expected counts for a batch of crafts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct YieldStats {
    /// Attempts made.
    pub expected_attempts: f64,
    /// Attempts that failed.
    pub expected_failures: f64,
    /// Normal quality units produced.
    pub expected_normal_results: f64,
    /// High quality units produced.
    pub expected_high_quality_results: f64,
}

impl YieldStats {
    /// Returns the stats scaled by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            expected_attempts: self.expected_attempts * factor,
            expected_failures: self.expected_failures * factor,
            expected_normal_results: self.expected_normal_results * factor,
            expected_high_quality_results: self.expected_high_quality_results * factor,
        }
    }
}

/// The standard outcome model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandardOutcomeModel {
    focus_multiplier: f64,
    high_quality_floor: f64,
    combination: AbilityCombination,
}

impl Default for StandardOutcomeModel {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl StandardOutcomeModel {
    /// Creates the model from the engine's balance constants.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            focus_multiplier: config.focus_multiplier,
            high_quality_floor: config.high_quality_floor,
            combination: config.ability_combination,
        }
    }

    /// Chance of a high quality success, floored and capped at one.
    #[must_use]
    pub fn high_quality_chance(&self, object: &CraftableObject, setup: &Setup) -> f64 {
        let differential = f64::from(object.intrinsic_focus)
            - setup.agent.focus
            - setup.tool.proficiency
            - setup.supplement.focus;
        (1.0 - self.focus_multiplier * differential).clamp(self.high_quality_floor, 1.0)
    }
}

impl OutcomeModel for StandardOutcomeModel {
    fn evaluate(&self, object: &CraftableObject, setup: &Setup, tier: QualityTier) -> EngineResult<CraftingOutcome> {
        let proficiency = setup.combined_proficiency();
        if proficiency.is_nan() || proficiency <= 0.0 {
            return Err(EngineError::malformed(format!(
                "setup {setup} has no proficiency to craft {}",
                object.name
            )));
        }
        if object.intrinsic_proficiency == 0 {
            return Err(EngineError::malformed(format!(
                "{} has zero intrinsic proficiency",
                object.name
            )));
        }

        let success_chance = (proficiency / f64::from(object.intrinsic_proficiency)).min(1.0);
        let high_quality_chance = self.high_quality_chance(object, setup);
        let recycle_chance = self.combination.combine(&[
            setup.agent.recycle_chance(),
            setup.tool.recycle_chance(),
            setup.supplement.recycle_chance(),
        ]);
        let dab_hand_chance = if object.can_dab_hand {
            self.combination.combine(&[
                setup.agent.dab_hand_chance(),
                setup.tool.dab_hand_chance(),
                setup.supplement.dab_hand_chance(),
            ])
        } else {
            0.0
        };

        let attempts_per_success = 1.0 / success_chance;
        let bonus = 1.0 + dab_hand_chance;
        let mut expected_attempts = attempts_per_success / bonus;
        let mut material_multiplier = (1.0 + (attempts_per_success - 1.0) * (1.0 - recycle_chance)) / bonus;
        // Quality applies after recycling: only failures refund materials
        if tier.is_high() {
            expected_attempts /= high_quality_chance;
            material_multiplier /= high_quality_chance;
        }

        Ok(CraftingOutcome {
            tier,
            success_chance,
            high_quality_chance,
            recycle_chance,
            dab_hand_chance,
            attempts_per_success,
            expected_attempts,
            material_multiplier,
        })
    }
}
