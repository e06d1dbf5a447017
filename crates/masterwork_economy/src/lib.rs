//! # Masterwork Economy
//!
//! Minimum-cost crafting over a [`masterwork_catalog::Catalog`].
//!
//! Crafting is a gamble: attempts fail, failures may recycle their
//! materials, lucky successes yield a bonus unit and only some successes
//! reach high quality. This crate turns a nominal recipe into the expected
//! raw materials it really consumes, and finds the cheapest artisan, tool
//! and supplement for every item in the recipe tree.
//!
//! ## Design Principles
//!
//! 1. **Expected values** - every cost is an expectation, never a sample
//! 2. **Search once** - each item's setup ranking is computed at most once per tier
//! 3. **Parallel search** - candidate setups are evaluated on a worker pool
//! 4. **External configuration** - balance constants live in TOML files
//!
//! ## Example
//!
//! ```rust,ignore
//! use masterwork_catalog::{Catalog, QualityTier};
//! use masterwork_economy::{CraftingEngine, EngineConfig};
//!
//! let catalog = Catalog::from_toml_file("data/catalog.toml")?;
//! let engine = CraftingEngine::new(catalog, EngineConfig::from_toml_file("data/engine.toml")?)?;
//!
//! let recipe = engine.craft("Iron Sword", 10.0, QualityTier::High, None)?;
//! println!("{:.2} for {}", recipe.cost(engine.catalog()), recipe.materials);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod aggregate;
pub mod commission;
pub mod config;
pub mod engine;
pub mod error;
mod graph;
pub mod ledger;
mod memo;
pub mod multiplier;
pub mod outcome;
pub mod resolver;
mod search;
pub mod setup;

pub use aggregate::{RankedRecipe, RecipeAggregate};
pub use commission::CommissionRanking;
pub use config::{AbilityCombination, EngineConfig, ReferenceSetup};
pub use engine::CraftingEngine;
pub use error::{EngineError, EngineResult};
pub use ledger::{LedgerEntry, QuantityLedger};
pub use multiplier::{ItemProfile, QualityTarget, SetupMultiplier};
pub use outcome::{CraftingOutcome, OutcomeModel, StandardOutcomeModel, YieldStats};
pub use resolver::{FixedRates, Resolvable, StepRates};
pub use setup::{Setup, SetupRequest};
