//! Sub-provider classification
//!
//! Records are attributed to a sub-provider by looking up their
//! building facet value in an ordered table; the first sub-provider
//! whose building list contains the value wins, and anything
//! unmatched falls back to the default provider.

use crate::config::SubProvider;

/// Ordered building-to-sub-provider lookup table
#[derive(Clone, Debug)]
pub struct SubProviderTable {
    default_provider: String,
    entries: Vec<SubProvider>,
}

impl SubProviderTable {
    /// Build a table from the configured default provider and entries
    ///
    /// Entry order is classification precedence.
    pub fn new(default_provider: impl Into<String>, entries: Vec<SubProvider>) -> Self {
        Self {
            default_provider: default_provider.into(),
            entries,
        }
    }

    /// The provider name used when no sub-provider matches
    pub fn default_provider(&self) -> &str {
        &self.default_provider
    }

    /// Classify a building into a sub-provider name
    ///
    /// Returns the first entry whose building list contains the value,
    /// else the default provider.
    pub fn classify(&self, building: &str) -> &str {
        self.entries
            .iter()
            .find(|entry| entry.buildings.iter().any(|b| b == building))
            .map(|entry| entry.name.as_str())
            .unwrap_or(&self.default_provider)
    }
}
