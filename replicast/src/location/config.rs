//! Configuration for [`LocationResolver`](super::LocationResolver).

use serde::{Deserialize, Serialize};

use super::Region;

/// Prefix of the per-region replica names.
pub const DEFAULT_NAME_PREFIX: &str = "global-";

/// How regional replicas are named and where unplaceable requests go.
///
/// # Example
///
/// ```rust
/// use replicast::location::{LocatorConfig, Region};
///
/// // Defaults: "global-<region>" names, unknown origins read from wnam.
/// let config = LocatorConfig::default();
/// assert_eq!(config.fallback_region(), Region::Wnam);
///
/// let config = LocatorConfig::builder()
///     .name_prefix("chat-")
///     .fallback_region(Region::Weur)
///     .build();
/// assert_eq!(config.name_prefix(), "chat-");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    name_prefix: String,
    fallback_region: Region,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            fallback_region: Region::default(),
        }
    }
}

impl LocatorConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> LocatorConfigBuilder {
        LocatorConfigBuilder::default()
    }

    /// Prefix prepended to a region code to name its replica.
    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    /// Region used when the origin is absent or unknown.
    pub fn fallback_region(&self) -> Region {
        self.fallback_region
    }
}

/// Builder for [`LocatorConfig`].
#[derive(Debug, Clone, Default)]
pub struct LocatorConfigBuilder {
    name_prefix: Option<String>,
    fallback_region: Option<Region>,
}

impl LocatorConfigBuilder {
    /// Set the replica name prefix.
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    /// Set the fallback region.
    pub fn fallback_region(mut self, region: Region) -> Self {
        self.fallback_region = Some(region);
        self
    }

    /// Build the configuration (infallible).
    pub fn build(self) -> LocatorConfig {
        let defaults = LocatorConfig::default();
        LocatorConfig {
            name_prefix: self.name_prefix.unwrap_or(defaults.name_prefix),
            fallback_region: self.fallback_region.unwrap_or(defaults.fallback_region),
        }
    }
}
