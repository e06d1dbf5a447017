//! # Engine Configuration
//!
//! Balance constants and search settings, loaded once from TOML.
//!
//! ```toml
//! focus_multiplier = 0.0022
//! ability_combination = "complement_product"
//! ranking_len = 10
//! ingredient_fallback = "placeholder"
//!
//! [reference_setup]
//! agent = "Beatrice"
//! discipline = "Alchemy"
//! tool = "Forgehammer of Gond"
//! supplement = "Wintergreen Tea +1"
//! ```

use masterwork_catalog::FallbackPolicy;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

/// How independent per-source ability chances are combined.
///
/// One rule applies to every craft the engine evaluates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityCombination {
    /// `1 - (1 - a)(1 - b)(1 - c)`: at least one source triggers.
    #[default]
    ComplementProduct,
    /// `min(1, a + b + c)`.
    Additive,
}

impl AbilityCombination {
    /// Combines per-source chances.
    #[must_use]
    pub fn combine(self, chances: &[f64]) -> f64 {
        match self {
            Self::ComplementProduct => 1.0 - chances.iter().map(|chance| 1.0 - chance).product::<f64>(),
            Self::Additive => chances.iter().sum::<f64>().min(1.0),
        }
    }
}

/// The fixed setup used to cost supplements wherever they are consumed.
///
/// Using a fixed triple instead of an optimised one keeps a supplement's
/// cost from depending on itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceSetup {
    /// Artisan name.
    pub agent: String,
    /// Discipline to pick the artisan from, when names repeat.
    #[serde(default)]
    pub discipline: Option<String>,
    /// Tool name.
    pub tool: String,
    /// Supplement name. A craftable supplement is priced by its raw
    /// materials alone.
    pub supplement: String,
}

impl Default for ReferenceSetup {
    fn default() -> Self {
        Self {
            agent: "Beatrice".to_string(),
            discipline: Some("Alchemy".to_string()),
            tool: "Forgehammer of Gond".to_string(),
            supplement: "Wintergreen Tea +1".to_string(),
        }
    }
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// High quality chance lost per point of focus differential.
    pub focus_multiplier: f64,
    /// Lower bound on the high quality chance.
    pub high_quality_floor: f64,
    /// Rule for combining recycle and dab hand chances.
    pub ability_combination: AbilityCombination,
    /// Number of ranked setups returned per item.
    pub ranking_len: usize,
    /// Worker threads per search. Zero means one per available core.
    pub search_workers: usize,
    /// Setup used to cost supplements.
    pub reference_setup: ReferenceSetup,
    /// Lookup policy for recipe ingredients missing from the catalog.
    pub ingredient_fallback: FallbackPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            focus_multiplier: 0.0022,
            high_quality_floor: 0.000_000_1,
            ability_combination: AbilityCombination::default(),
            ranking_len: 10,
            search_workers: 0,
            reference_setup: ReferenceSetup::default(),
            ingredient_fallback: FallbackPolicy::Placeholder,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the text does not parse or fails validation.
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::InvalidConfig(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks the constants are usable.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.focus_multiplier.is_finite() || self.focus_multiplier < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "focus_multiplier {} must be a non-negative number",
                self.focus_multiplier
            )));
        }
        if !(self.high_quality_floor > 0.0 && self.high_quality_floor <= 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "high_quality_floor {} must lie in (0, 1]",
                self.high_quality_floor
            )));
        }
        if self.ranking_len == 0 {
            return Err(EngineError::InvalidConfig("ranking_len must be positive".to_string()));
        }
        Ok(())
    }

    /// Number of worker threads a search uses.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        if self.search_workers > 0 {
            return self.search_workers;
        }
        std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ranking_len, 10);
        assert_eq!(config.reference_setup.tool, "Forgehammer of Gond");
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn test_parse_partial_document() {
        let config = EngineConfig::from_toml_str(
            r#"
ability_combination = "additive"
search_workers = 3

[reference_setup]
agent = "Ada"
tool = "Hammer"
supplement = "Tea"
"#,
        )
        .unwrap();
        assert_eq!(config.ability_combination, AbilityCombination::Additive);
        assert_eq!(config.worker_count(), 3);
        assert_eq!(config.reference_setup.discipline, None);
        assert_eq!(config.focus_multiplier, 0.0022);
        assert_eq!(config.ingredient_fallback, FallbackPolicy::Placeholder);
        assert_eq!(
            EngineConfig::from_toml_str("ingredient_fallback = \"strict\"")
                .unwrap()
                .ingredient_fallback,
            FallbackPolicy::Strict
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(EngineConfig::from_toml_str("ranking_len = 0").is_err());
        assert!(EngineConfig::from_toml_str("high_quality_floor = 0.0").is_err());
        assert!(EngineConfig::from_toml_str("focus_multiplier = -1.0").is_err());
        assert!(EngineConfig::from_toml_str("mystery = 1").is_err());
    }

    #[test]
    fn test_combination_rules() {
        let chances = [0.5, 0.5];
        assert!((AbilityCombination::ComplementProduct.combine(&chances) - 0.75).abs() < 1e-12);
        assert!((AbilityCombination::Additive.combine(&chances) - 1.0).abs() < 1e-12);
        assert_eq!(AbilityCombination::ComplementProduct.combine(&[0.0, 0.0, 0.0]), 0.0);
        assert!((AbilityCombination::Additive.combine(&[0.9, 0.9]) - 1.0).abs() < 1e-12);
    }
}
