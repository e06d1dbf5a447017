//! # Catalog Entities
//!
//! Things that can appear in a recipe: raw resources and craftable
//! objects (finished items and intermediate materials).

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{CatalogError, CatalogResult};

/// A raw, gathered material. Resources have no recipe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique name.
    pub name: String,
    /// Currency per unit. Zero when unknown.
    #[serde(default)]
    pub price: f64,
}

impl Resource {
    /// Creates a priced resource.
    #[must_use]
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Creates the zero-price stand-in used for unknown names.
    #[must_use]
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::new(name, 0.0)
    }

    pub(crate) fn validate(&self) -> CatalogResult<()> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(malformed(&self.name, format!("price {} is not a non-negative number", self.price)));
        }
        Ok(())
    }
}

/// One line of a recipe: how much of which sub-item one craft consumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecipeEntry {
    /// Units consumed per craft.
    pub quantity: f64,
    /// Name of the sub-item; resolved through the catalog lookup.
    pub name: String,
}

impl RecipeEntry {
    /// Creates a recipe line.
    #[must_use]
    pub fn new(quantity: f64, name: impl Into<String>) -> Self {
        Self {
            quantity,
            name: name.into(),
        }
    }
}

/// A finished item or intermediate material produced by crafting.
///
/// Items and materials share this shape. Only finished items can receive
/// the dab hand bonus, and the catalog files them accordingly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CraftableObject {
    /// Unique name.
    pub name: String,
    /// Units produced by one craft.
    pub output_quantity: f64,
    /// Whether a successful craft may yield a bonus unit.
    #[serde(default)]
    pub can_dab_hand: bool,
    /// Proficiency needed for guaranteed success.
    pub intrinsic_proficiency: u32,
    /// Focus the high quality chance is measured against.
    #[serde(default)]
    pub intrinsic_focus: u32,
    /// Crafting discipline that produces this object.
    #[serde(default)]
    pub profession: Option<String>,
    /// Free-form unlock text the profession can be derived from.
    #[serde(default)]
    pub unlock: Option<String>,
    /// Sub-items consumed per craft, in order.
    #[serde(default)]
    pub recipe: Vec<RecipeEntry>,
}

impl CraftableObject {
    /// Creates a craftable with no recipe lines.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        output_quantity: f64,
        intrinsic_proficiency: u32,
        intrinsic_focus: u32,
    ) -> Self {
        Self {
            name: name.into(),
            output_quantity,
            can_dab_hand: false,
            intrinsic_proficiency,
            intrinsic_focus,
            profession: None,
            unlock: None,
            recipe: Vec::new(),
        }
    }

    /// Sets the profession.
    #[must_use]
    pub fn with_profession(mut self, profession: impl Into<String>) -> Self {
        self.profession = Some(profession.into());
        self
    }

    /// Marks the object as able to dab hand.
    #[must_use]
    pub fn with_dab_hand(mut self, can_dab_hand: bool) -> Self {
        self.can_dab_hand = can_dab_hand;
        self
    }

    /// Appends a recipe line.
    #[must_use]
    pub fn with_input(mut self, quantity: f64, name: impl Into<String>) -> Self {
        self.recipe.push(RecipeEntry::new(quantity, name));
        self
    }

    /// Derives the profession from the unlock text.
    ///
    /// Every known profession is matched as a substring; the last match wins.
    /// An explicit profession is never overwritten.
    pub fn derive_profession<S: AsRef<str>>(&mut self, professions: &[S]) {
        if self.profession.is_some() {
            return;
        }
        let Some(unlock) = self.unlock.as_deref() else {
            return;
        };
        self.profession = professions
            .iter()
            .map(AsRef::as_ref)
            .filter(|profession| unlock.contains(profession))
            .last()
            .map(str::to_string);
    }

    pub(crate) fn validate(&self) -> CatalogResult<()> {
        if !self.output_quantity.is_finite() || self.output_quantity <= 0.0 {
            return Err(malformed(
                &self.name,
                format!("output quantity {} must be positive", self.output_quantity),
            ));
        }
        if self.intrinsic_proficiency == 0 {
            return Err(malformed(&self.name, "intrinsic proficiency must be positive".to_string()));
        }
        for entry in &self.recipe {
            if !entry.quantity.is_finite() || entry.quantity < 0.0 {
                return Err(malformed(
                    &self.name,
                    format!("recipe quantity {} of {} is invalid", entry.quantity, entry.name),
                ));
            }
        }
        Ok(())
    }
}

/// A commission: a reward paid for delivering one unit of a target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Commission {
    /// Commission name.
    pub name: String,
    /// Reward credited per delivery.
    pub reward_value: f64,
    /// Name of the entity to deliver. Defaults to the commission name.
    #[serde(default)]
    pub target: Option<String>,
}

impl Commission {
    /// Creates a commission whose target shares its name.
    #[must_use]
    pub fn new(name: impl Into<String>, reward_value: f64) -> Self {
        Self {
            name: name.into(),
            reward_value,
            target: None,
        }
    }

    /// Name of the entity this commission asks for.
    #[must_use]
    pub fn target_name(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.name)
    }

    pub(crate) fn validate(&self) -> CatalogResult<()> {
        if !self.reward_value.is_finite() || self.reward_value <= 0.0 {
            return Err(malformed(
                &self.name,
                format!("reward {} must be positive", self.reward_value),
            ));
        }
        Ok(())
    }
}

/// Anything a recipe line can resolve to.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    /// A gathered resource (the recursion base case).
    Resource(Arc<Resource>),
    /// An item or material with its own recipe.
    Craftable(Arc<CraftableObject>),
}

impl Entity {
    /// The entity's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Resource(resource) => &resource.name,
            Self::Craftable(object) => &object.name,
        }
    }

    /// Unit price. Craftables are valued through their recipes, so zero.
    #[must_use]
    pub fn price(&self) -> f64 {
        match self {
            Self::Resource(resource) => resource.price,
            Self::Craftable(_) => 0.0,
        }
    }

    /// Returns the craftable, if this is one.
    #[must_use]
    pub fn as_craftable(&self) -> Option<&Arc<CraftableObject>> {
        match self {
            Self::Craftable(object) => Some(object),
            Self::Resource(_) => None,
        }
    }
}

pub(crate) fn malformed(name: &str, reason: String) -> CatalogError {
    CatalogError::MalformedEntry {
        name: name.to_string(),
        reason,
    }
}
