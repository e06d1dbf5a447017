//! # Crafters
//!
//! The three parts of a crafting setup: the artisan doing the work, the
//! tool in their hand and the consumable supplement burned per attempt.
//! Each may carry at most one special ability.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::malformed;
use crate::error::CatalogResult;
use crate::quality::{has_quality_marker, QualityTier};

/// A special ability. A crafter has at most one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "chance", rename_all = "snake_case")]
pub enum Ability {
    /// Chance of a free extra unit on a successful craft.
    DabHand(f64),
    /// Chance of refunding the materials of a failed attempt.
    Recycle(f64),
}

impl Ability {
    fn chance(self) -> f64 {
        match self {
            Self::DabHand(chance) | Self::Recycle(chance) => chance,
        }
    }
}

/// Dab hand chance of an optional ability.
#[inline]
#[must_use]
pub fn dab_hand_chance(ability: Option<Ability>) -> f64 {
    match ability {
        Some(Ability::DabHand(chance)) => chance,
        _ => 0.0,
    }
}

/// Recycle chance of an optional ability.
#[inline]
#[must_use]
pub fn recycle_chance(ability: Option<Ability>) -> f64 {
    match ability {
        Some(Ability::Recycle(chance)) => chance,
        _ => 0.0,
    }
}

fn validate_stats(name: &str, proficiency: f64, focus: f64, ability: Option<Ability>) -> CatalogResult<()> {
    if !proficiency.is_finite() || proficiency < 0.0 {
        return Err(malformed(name, format!("proficiency {proficiency} is invalid")));
    }
    if !focus.is_finite() || focus < 0.0 {
        return Err(malformed(name, format!("focus {focus} is invalid")));
    }
    if let Some(ability) = ability {
        let chance = ability.chance();
        if !(0.0..=1.0).contains(&chance) {
            return Err(malformed(name, format!("ability chance {chance} is outside [0, 1]")));
        }
    }
    Ok(())
}

fn ability_suffix(ability: Option<Ability>) -> String {
    match ability {
        Some(Ability::DabHand(chance)) if chance > 0.0 => format!(" {chance}d"),
        Some(Ability::Recycle(chance)) if chance > 0.0 => format!(" {chance}r"),
        _ => String::new(),
    }
}

/// Which crafting disciplines a crafter serves.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Discipline {
    /// Serves every profession.
    Any,
    /// Serves one named profession.
    Profession(String),
}

impl Discipline {
    /// Wildcard spelling in catalog documents.
    pub const WILDCARD: &'static str = "Any";

    /// Returns true if this discipline may work on the profession.
    #[must_use]
    pub fn admits(&self, profession: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Profession(own) => own == profession,
        }
    }
}

impl From<String> for Discipline {
    fn from(value: String) -> Self {
        if value == Self::WILDCARD {
            Self::Any
        } else {
            Self::Profession(value)
        }
    }
}

impl From<&str> for Discipline {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Discipline> for String {
    fn from(value: Discipline) -> Self {
        match value {
            Discipline::Any => Discipline::WILDCARD.to_string(),
            Discipline::Profession(profession) => profession,
        }
    }
}

/// A crafting character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artisan {
    /// Character name. Not unique across disciplines.
    pub name: String,
    /// Professions this artisan serves.
    pub discipline: Discipline,
    /// Rarity label.
    #[serde(default)]
    pub rarity: String,
    /// Contribution to success chance.
    pub proficiency: f64,
    /// Contribution to high quality chance.
    #[serde(default)]
    pub focus: f64,
    /// Special ability, if any.
    #[serde(default)]
    pub ability: Option<Ability>,
}

impl Artisan {
    /// Creates an artisan without a special ability.
    #[must_use]
    pub fn new(name: impl Into<String>, discipline: impl Into<Discipline>, proficiency: f64, focus: f64) -> Self {
        Self {
            name: name.into(),
            discipline: discipline.into(),
            rarity: String::new(),
            proficiency,
            focus,
            ability: None,
        }
    }

    /// Sets the special ability.
    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    /// Sets the rarity label.
    #[must_use]
    pub fn with_rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = rarity.into();
        self
    }

    /// Dab hand chance (zero without that ability).
    #[must_use]
    pub fn dab_hand_chance(&self) -> f64 {
        dab_hand_chance(self.ability)
    }

    /// Recycle chance (zero without that ability).
    #[must_use]
    pub fn recycle_chance(&self) -> f64 {
        recycle_chance(self.ability)
    }

    pub(crate) fn validate(&self) -> CatalogResult<()> {
        validate_stats(&self.name, self.proficiency, self.focus, self.ability)
    }
}

impl fmt::Display for Artisan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] ({:.0}/{:.0}{})",
            self.name,
            self.rarity,
            self.proficiency,
            self.focus,
            ability_suffix(self.ability)
        )
    }
}

/// A crafting tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Professions the tool is made for.
    pub discipline: Discipline,
    /// Unique name.
    pub name: String,
    /// Contribution to success chance, and to high quality chance.
    pub proficiency: f64,
    /// Listed focus. The outcome model does not read it.
    #[serde(default)]
    pub focus: f64,
    /// Special ability, if any.
    #[serde(default)]
    pub ability: Option<Ability>,
}

impl Tool {
    /// Creates a tool without a special ability.
    #[must_use]
    pub fn new(name: impl Into<String>, discipline: impl Into<Discipline>, proficiency: f64, focus: f64) -> Self {
        Self {
            discipline: discipline.into(),
            name: name.into(),
            proficiency,
            focus,
            ability: None,
        }
    }

    /// Sets the special ability.
    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    /// Dab hand chance (zero without that ability).
    #[must_use]
    pub fn dab_hand_chance(&self) -> f64 {
        dab_hand_chance(self.ability)
    }

    /// Recycle chance (zero without that ability).
    #[must_use]
    pub fn recycle_chance(&self) -> f64 {
        recycle_chance(self.ability)
    }

    pub(crate) fn validate(&self) -> CatalogResult<()> {
        validate_stats(&self.name, self.proficiency, self.focus, self.ability)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.0}/{:.0}{})",
            self.name,
            self.proficiency,
            self.focus,
            ability_suffix(self.ability)
        )
    }
}

/// A consumable crafting aid, burned once per attempt.
///
/// Supplements are crafted things themselves; the object they are made
/// from is found by looking their name up in the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supplement {
    /// Unique name, possibly carrying the quality marker.
    pub name: String,
    /// Contribution to success chance.
    pub proficiency: f64,
    /// Contribution to high quality chance.
    #[serde(default)]
    pub focus: f64,
    /// Special ability, if any.
    #[serde(default)]
    pub ability: Option<Ability>,
}

impl Supplement {
    /// Creates a supplement without a special ability.
    #[must_use]
    pub fn new(name: impl Into<String>, proficiency: f64, focus: f64) -> Self {
        Self {
            name: name.into(),
            proficiency,
            focus,
            ability: None,
        }
    }

    /// Sets the special ability.
    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    /// True when this is the +1 variant.
    #[must_use]
    pub fn is_high_quality_variant(&self) -> bool {
        has_quality_marker(&self.name)
    }

    /// Tier this supplement is crafted at.
    #[must_use]
    pub fn quality_tier(&self) -> QualityTier {
        QualityTier::from_high_quality(self.is_high_quality_variant())
    }

    /// Dab hand chance (zero without that ability).
    #[must_use]
    pub fn dab_hand_chance(&self) -> f64 {
        dab_hand_chance(self.ability)
    }

    /// Recycle chance (zero without that ability).
    #[must_use]
    pub fn recycle_chance(&self) -> f64 {
        recycle_chance(self.ability)
    }

    pub(crate) fn validate(&self) -> CatalogResult<()> {
        validate_stats(&self.name, self.proficiency, self.focus, self.ability)
    }
}

impl fmt::Display for Supplement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.0}/{:.0}{})",
            self.name,
            self.proficiency,
            self.focus,
            ability_suffix(self.ability)
        )
    }
}
