//! Named-parameter configuration.

use rowmap_core::ParameterCase;
use serde::{Deserialize, Serialize};

const fn default_require_all_bound() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParamsConfig {
    /// Whether parameter names are case-sensitive or uppercased.
    #[serde(default)]
    pub case: ParameterCase,

    /// Fail when producing positional values while a parameter is unset.
    #[serde(default = "default_require_all_bound")]
    pub require_all_bound: bool,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            case: ParameterCase::default(),
            require_all_bound: default_require_all_bound(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ParamsConfig::default();
        assert_eq!(config.case, ParameterCase::Preserve);
        assert!(config.require_all_bound);
    }
}
