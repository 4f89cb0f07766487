//! Damage events.

use engine_component::Component;
use engine_math::Vec3;
use engine_observable::EventBus;
use serde::{Deserialize, Serialize};

/// Payload of one hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageInfo {
    /// Hit points to subtract.
    pub damage_per_shot: i32,
    /// World-space hit point.
    pub damage_point: Vec3,
}

impl DamageInfo {
    /// Create a new damage payload.
    #[must_use]
    pub fn new(damage_per_shot: i32, damage_point: Vec3) -> Self {
        Self {
            damage_per_shot,
            damage_point,
        }
    }
}

/// Receives damage through an event bus.
pub trait DamageEventComponent: Component {
    fn damage_received(&self) -> EventBus<DamageInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_info_json_shape() {
        let info = DamageInfo::new(25, Vec3::new(1.0, 0.0, 2.0));
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["damage_per_shot"], 25);
        assert_eq!(json["damage_point"], serde_json::json!([1.0, 0.0, 2.0]));
    }
}
