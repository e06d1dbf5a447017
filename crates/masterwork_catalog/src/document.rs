//! # Catalog Documents
//!
//! A catalog can be described in a TOML file and loaded once at startup:
//!
//! ```toml
//! [[resources]]
//! name = "Ore"
//! price = 10.0
//!
//! [[craftables]]
//! name = "Bar"
//! output_quantity = 2.0
//! intrinsic_proficiency = 100
//! unlock = "Blacksmithing rank 1"
//! recipe = [{ quantity = 4.0, name = "Ore" }]
//!
//! [[agents]]
//! name = "Grim"
//! discipline = "Blacksmithing"
//! proficiency = 100.0
//! ability = { kind = "recycle", chance = 0.3 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::crafter::{Artisan, Supplement, Tool};
use crate::entity::{Commission, CraftableObject, Resource};
use crate::error::{CatalogError, CatalogResult};
use crate::store::Catalog;

/// Professions recognised in unlock text when none is configured.
pub const DEFAULT_PROFESSIONS: [&str; 7] = [
    "Alchemy",
    "Armorsmithing",
    "Artificing",
    "Blacksmithing",
    "Jewelcrafting",
    "Leatherworking",
    "Tailoring",
];

/// Serialized form of a catalog.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogDocument {
    /// Professions matched against craftable unlock text.
    pub professions: Vec<String>,
    /// Raw resources.
    pub resources: Vec<Resource>,
    /// Items and materials.
    pub craftables: Vec<CraftableObject>,
    /// Artisan roster.
    pub agents: Vec<Artisan>,
    /// Tools.
    pub tools: Vec<Tool>,
    /// Supplements.
    pub supplements: Vec<Supplement>,
    /// Commissions.
    pub commissions: Vec<Commission>,
}

impl CatalogDocument {
    /// Parses a document from TOML text.
    ///
    /// # Errors
    ///
    /// `Parse` if the text is not a valid document.
    pub fn from_toml_str(text: &str) -> CatalogResult<Self> {
        toml::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Builds and validates the catalog this document describes.
    ///
    /// # Errors
    ///
    /// Any entry error from the `add_*` calls, or a recipe cycle.
    pub fn into_catalog(self) -> CatalogResult<Catalog> {
        let mut catalog = Catalog::new();
        for resource in self.resources {
            catalog.add_resource(resource)?;
        }
        for mut object in self.craftables {
            if self.professions.is_empty() {
                object.derive_profession(&DEFAULT_PROFESSIONS);
            } else {
                object.derive_profession(&self.professions);
            }
            if object.profession.is_none() {
                tracing::warn!(craftable = %object.name, "no profession; it cannot be optimised");
            }
            catalog.add_craftable(object)?;
        }
        for agent in self.agents {
            catalog.add_agent(agent)?;
        }
        for tool in self.tools {
            catalog.add_tool(tool)?;
        }
        for supplement in self.supplements {
            catalog.add_supplement(supplement)?;
        }
        for commission in self.commissions {
            catalog.add_commission(commission)?;
        }
        catalog.validate()?;

        tracing::info!(
            craftables = catalog.craftable_count(),
            agents = catalog.agents().len(),
            tools = catalog.tools().len(),
            supplements = catalog.supplements().len(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

impl Catalog {
    /// Parses and validates a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// `Parse` for malformed TOML, otherwise any validation error.
    pub fn from_toml_str(text: &str) -> CatalogResult<Self> {
        CatalogDocument::from_toml_str(text)?.into_catalog()
    }

    /// Reads, parses and validates a catalog file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as `from_toml_str`.
    pub fn from_toml_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }
}
