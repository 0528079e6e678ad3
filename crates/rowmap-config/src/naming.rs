//! Column naming configuration.

use rowmap_core::ColumnNaming;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NamingConfig {
    /// Policy for properties without an explicit column name.
    #[serde(default)]
    pub columns: ColumnNaming,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_upper_snake() {
        assert_eq!(NamingConfig::default().columns, ColumnNaming::UpperSnake);
    }
}
