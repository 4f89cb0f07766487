//! Enemies.

use engine_component::{Component, Entity};
use engine_observable::{DispatcherOnSet, EventBus};
use serde::{Deserialize, Serialize};

use crate::damage::{DamageEventComponent, DamageInfo};
use crate::health::HealthComponent;
use crate::target::{TargetType, TargetTypeComponent};

/// Spawn parameters for one enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySettings {
    pub target_type: TargetType,
    #[serde(default = "EnemySettings::default_health")]
    pub starting_health: i32,
}

impl EnemySettings {
    fn default_health() -> i32 {
        100
    }

    /// Create new settings with the default starting health.
    #[must_use]
    pub fn new(target_type: TargetType) -> Self {
        Self {
            target_type,
            starting_health: Self::default_health(),
        }
    }

    /// Override the starting health.
    #[must_use]
    pub fn with_health(mut self, health: i32) -> Self {
        self.starting_health = health;
        self
    }
}

/// A shootable enemy. Backs health, damage events, and target type.
#[derive(Debug)]
pub struct Enemy {
    target_type: TargetType,
    current_health: i32,
    is_dead: DispatcherOnSet<bool>,
    damage_received: EventBus<DamageInfo>,
}

impl Enemy {
    /// Create a new enemy from its settings.
    #[must_use]
    pub fn new(entity: Entity, settings: &EnemySettings) -> Self {
        Self {
            target_type: settings.target_type,
            current_health: settings.starting_health,
            is_dead: DispatcherOnSet::new(entity, false),
            damage_received: EventBus::new(),
        }
    }
}

impl Component for Enemy {}

impl HealthComponent for Enemy {
    fn current_health(&self) -> i32 {
        self.current_health
    }

    fn set_current_health(&mut self, health: i32) {
        self.current_health = health;
    }

    fn is_dead(&self) -> DispatcherOnSet<bool> {
        self.is_dead.clone()
    }
}

impl DamageEventComponent for Enemy {
    fn damage_received(&self) -> EventBus<DamageInfo> {
        self.damage_received.clone()
    }
}

impl TargetTypeComponent for Enemy {
    fn target_type(&self) -> TargetType {
        self.target_type
    }
}
