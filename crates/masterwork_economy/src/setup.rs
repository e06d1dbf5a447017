//! # Crafting Setups
//!
//! A setup is the artisan, tool and supplement used for a craft. It is
//! always complete: a partial triple is a caller error, never a default.

use std::fmt;
use std::sync::Arc;

use masterwork_catalog::{Artisan, Supplement, Tool};

use crate::error::{EngineError, EngineResult};

/// A resolved artisan, tool and supplement.
#[derive(Clone, Debug, PartialEq)]
pub struct Setup {
    /// The artisan.
    pub agent: Arc<Artisan>,
    /// The tool.
    pub tool: Arc<Tool>,
    /// The supplement burned per attempt.
    pub supplement: Arc<Supplement>,
}

impl Setup {
    /// Creates a setup.
    #[must_use]
    pub fn new(agent: Arc<Artisan>, tool: Arc<Tool>, supplement: Arc<Supplement>) -> Self {
        Self {
            agent,
            tool,
            supplement,
        }
    }

    /// Combined proficiency of the three parts.
    #[must_use]
    pub fn combined_proficiency(&self) -> f64 {
        self.agent.proficiency + self.tool.proficiency + self.supplement.proficiency
    }
}

impl fmt::Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.agent, self.tool, self.supplement)
    }
}

/// A setup named by its parts, resolved against the catalog on use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupRequest {
    /// Artisan name.
    pub agent: String,
    /// Tool name.
    pub tool: String,
    /// Supplement name, marker included.
    pub supplement: String,
}

impl SetupRequest {
    /// Creates a complete request.
    #[must_use]
    pub fn new(agent: impl Into<String>, tool: impl Into<String>, supplement: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            tool: tool.into(),
            supplement: supplement.into(),
        }
    }

    /// Builds a request from optional parts.
    ///
    /// No parts means "pick the optimal setup" and yields `None`.
    ///
    /// # Errors
    ///
    /// `IncompleteSetup` naming the missing parts when only some are given.
    pub fn from_parts(
        agent: Option<&str>,
        tool: Option<&str>,
        supplement: Option<&str>,
    ) -> EngineResult<Option<Self>> {
        match (agent, tool, supplement) {
            (None, None, None) => Ok(None),
            (Some(agent), Some(tool), Some(supplement)) => Ok(Some(Self::new(agent, tool, supplement))),
            _ => {
                let missing: Vec<&str> = [("agent", agent), ("tool", tool), ("supplement", supplement)]
                    .into_iter()
                    .filter(|(_, part)| part.is_none())
                    .map(|(label, _)| label)
                    .collect();
                Err(EngineError::IncompleteSetup {
                    missing: missing.join(", "),
                })
            }
        }
    }
}
