//! # Engine Error Types
//!
//! All errors that can occur while resolving or optimising a craft.

use masterwork_catalog::CatalogError;
use thiserror::Error;

/// Errors that can occur in the crafting engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A name resolved to nothing and fallback was not allowed.
    #[error("not found: {name}")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },

    /// The catalog cannot support the computation (zero stats, no eligible
    /// setup, crafting cycle). Fatal for the request.
    #[error("malformed catalog: {reason}")]
    MalformedCatalog {
        /// What is wrong.
        reason: String,
    },

    /// Some but not all of agent, tool and supplement were given.
    #[error("incomplete crafting setup: missing {missing}")]
    IncompleteSetup {
        /// The parts that were not given.
        missing: String,
    },

    /// Invalid engine configuration or caller-supplied rates.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Shorthand for a `MalformedCatalog` error.
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCatalog {
            reason: reason.into(),
        }
    }
}

impl From<CatalogError> for EngineError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::NotFound(name) => Self::NotFound { name },
            other => Self::malformed(other.to_string()),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_errors_map_to_taxonomy() {
        assert_eq!(
            EngineError::from(CatalogError::NotFound("Ore".to_string())),
            EngineError::NotFound {
                name: "Ore".to_string()
            }
        );
        let cycle = EngineError::from(CatalogError::CycleDetected(vec!["A".to_string(), "A".to_string()]));
        assert!(matches!(cycle, EngineError::MalformedCatalog { .. }));
        assert_eq!(cycle.to_string(), "malformed catalog: recipe cycle detected: A -> A");
    }
}
