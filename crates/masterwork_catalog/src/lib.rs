//! # Masterwork Catalog
//!
//! Read-only catalog of everything the crafting engine can reason about:
//! raw resources, craftable items and materials, and the artisans, tools
//! and supplements that make up a crafting setup.
//!
//! ## Design Principles
//!
//! 1. **Read-only after load** - entities are shared as `Arc`s and never mutated
//! 2. **Graceful lookup** - unknown ingredient names become zero-price resources
//! 3. **Validated input** - malformed entries and recipe cycles fail at load time
//!
//! ## Example
//!
//! ```rust,ignore
//! use masterwork_catalog::{Catalog, FallbackPolicy};
//!
//! let catalog = Catalog::from_toml_file("data/catalog.toml")?;
//! let bar = catalog.resolve("Iron Bar +1", FallbackPolicy::Strict)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod crafter;
pub mod document;
pub mod entity;
pub mod error;
pub mod quality;
pub mod store;

pub use crafter::{Ability, Artisan, Discipline, Supplement, Tool};
pub use document::{CatalogDocument, DEFAULT_PROFESSIONS};
pub use entity::{Commission, CraftableObject, Entity, RecipeEntry, Resource};
pub use error::{CatalogError, CatalogResult};
pub use quality::{strip_quality_marker, QualityTier, QUALITY_MARKER};
pub use store::{Catalog, FallbackPolicy};
