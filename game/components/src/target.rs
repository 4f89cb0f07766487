//! Target classification.

use engine_component::Component;
use serde::{Deserialize, Serialize};

/// Kind of enemy, published on the kill bus when one dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    ZomBunny,
    ZomBear,
    Hellephant,
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::ZomBunny => "ZomBunny",
            Self::ZomBear => "ZomBear",
            Self::Hellephant => "Hellephant",
        })
    }
}

pub trait TargetTypeComponent: Component {
    fn target_type(&self) -> TargetType;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_type_names() {
        assert_eq!(
            serde_json::to_string(&TargetType::ZomBunny).unwrap(),
            "\"zom_bunny\""
        );
        let parsed: TargetType = serde_json::from_str("\"hellephant\"").unwrap();
        assert_eq!(parsed, TargetType::Hellephant);
        assert_eq!(TargetType::ZomBear.to_string(), "ZomBear");
    }
}
