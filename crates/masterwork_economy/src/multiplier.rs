//! # Setup Multiplier Ranking
//!
//! Ranks setups for a whole profession without a concrete recipe: every
//! triple is scored by its material multiplier against a reference item
//! profile. Useful for deciding which artisans and supplements to invest in.

use masterwork_catalog::{CraftableObject, QualityTier};

use crate::engine::CraftingEngine;
use crate::error::EngineResult;
use crate::outcome::OutcomeModel;
use crate::setup::Setup;

/// Intrinsic stats of a hypothetical item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemProfile {
    /// Proficiency needed for guaranteed success.
    pub intrinsic_proficiency: u32,
    /// Focus the high quality chance is measured against.
    pub intrinsic_focus: u32,
    /// Whether the item can dab hand.
    pub can_dab_hand: bool,
}

impl Default for ItemProfile {
    fn default() -> Self {
        Self {
            intrinsic_proficiency: 1400,
            intrinsic_focus: 1400,
            can_dab_hand: true,
        }
    }
}

impl ItemProfile {
    fn as_object(self, profession: &str) -> CraftableObject {
        CraftableObject::new("reference item", 1.0, self.intrinsic_proficiency, self.intrinsic_focus)
            .with_profession(profession)
            .with_dab_hand(self.can_dab_hand)
    }
}

/// Which tier the multiplier is scored for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QualityTarget {
    /// Normal quality multiplier.
    #[default]
    Normal,
    /// High quality multiplier.
    High,
    /// `(3 * normal + high) / 4`, leaning on the usually much lower normal one.
    Blended,
}

/// A setup and its score.
#[derive(Clone, Debug, PartialEq)]
pub struct SetupMultiplier {
    /// The setup.
    pub setup: Setup,
    /// Material multiplier, lower is better.
    pub multiplier: f64,
}

impl<M: OutcomeModel> CraftingEngine<M> {
    /// Ranks a profession's setups by material multiplier, ascending, at most
    /// `ranking_len` long. Ties keep enumeration order.
    ///
    /// # Errors
    ///
    /// `MalformedCatalog` if the profession has no setups or a setup has no
    /// proficiency.
    pub fn rank_setup_multipliers(
        &self,
        profession: &str,
        profile: &ItemProfile,
        target: QualityTarget,
    ) -> EngineResult<Vec<SetupMultiplier>> {
        let object = profile.as_object(profession);
        let mut ranked = Vec::new();
        for setup in self.candidates(&object)? {
            let multiplier = self.score(&object, &setup, target)?;
            ranked.push(SetupMultiplier { setup, multiplier });
        }
        ranked.sort_by(|a, b| a.multiplier.total_cmp(&b.multiplier));
        ranked.truncate(self.config.ranking_len);
        Ok(ranked)
    }

    fn score(&self, object: &CraftableObject, setup: &Setup, target: QualityTarget) -> EngineResult<f64> {
        let normal = || {
            self.model
                .evaluate(object, setup, QualityTier::Normal)
                .map(|outcome| outcome.material_multiplier)
        };
        let high = || {
            self.model
                .evaluate(object, setup, QualityTier::High)
                .map(|outcome| outcome.material_multiplier)
        };
        match target {
            QualityTarget::Normal => normal(),
            QualityTarget::High => high(),
            QualityTarget::Blended => Ok((3.0 * normal()? + high()?) / 4.0),
        }
    }
}
