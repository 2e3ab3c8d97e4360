//! Adaptation options.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AdaptError, AdaptResult};

/// How orphaned satellites are grouped into unmanaged placeholders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanGrouping {
    /// One placeholder per distinct missing target; satellites that name
    /// no target at all each get their own.
    #[default]
    PerReference,
    /// Every orphan of a family shares one placeholder.
    Shared,
}

impl OrphanGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrphanGrouping::PerReference => "per_reference",
            OrphanGrouping::Shared => "shared",
        }
    }
}

impl FromStr for OrphanGrouping {
    type Err = AdaptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "per_reference" => Ok(OrphanGrouping::PerReference),
            "shared" => Ok(OrphanGrouping::Shared),
            other => Err(AdaptError::InvalidConfiguration(format!(
                "unknown orphan grouping '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for OrphanGrouping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options for one adaptation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptOptions {
    /// Families to run; empty means every registered adapter.
    pub families: Vec<String>,
    pub orphan_grouping: OrphanGrouping,
    /// Run families concurrently.
    pub parallel: bool,
}

impl Default for AdaptOptions {
    fn default() -> Self {
        Self {
            families: Vec::new(),
            orphan_grouping: OrphanGrouping::default(),
            parallel: true,
        }
    }
}

impl AdaptOptions {
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.families.push(family.into());
        self
    }

    pub fn with_orphan_grouping(mut self, grouping: OrphanGrouping) -> Self {
        self.orphan_grouping = grouping;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Whether a family is selected by these options.
    pub fn includes(&self, family: &str) -> bool {
        self.families.is_empty() || self.families.iter().any(|f| f == family)
    }

    /// Load options from a YAML file.
    pub fn from_file(path: &Path) -> AdaptResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> AdaptResult<Self> {
        serde_yaml::from_str(yaml).map_err(AdaptError::from)
    }

    pub fn to_yaml(&self) -> AdaptResult<String> {
        serde_yaml::to_string(self).map_err(AdaptError::from)
    }
}
