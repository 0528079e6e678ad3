//! Hydration configuration.

use rowmap_core::IdentityPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HydrateConfig {
    /// Treatment of partially-null composite identity keys.
    #[serde(default)]
    pub identity_policy: IdentityPolicy,
}
