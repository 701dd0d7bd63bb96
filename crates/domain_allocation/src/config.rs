//! Workflow configuration

use core_kernel::{load_section, ConfigSource, CoreError};
use serde::{Deserialize, Serialize};

/// How a submission treats a decrease that is not fully allocated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// Refuse to submit until every decrease is fully allocated
    #[default]
    Block,
    /// Submit anyway; the unallocated remainder produces no transfer
    RetainAtRetailer,
}

/// Settings for verification sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub remainder_policy: RemainderPolicy,
}

impl WorkflowConfig {
    /// Loads the `workflow` section from the default configuration sources
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&ConfigSource::default())
    }

    pub fn load_from(source: &ConfigSource) -> Result<Self, CoreError> {
        load_section("workflow", source)
    }

    pub fn with_remainder_policy(mut self, policy: RemainderPolicy) -> Self {
        self.remainder_policy = policy;
        self
    }
}
