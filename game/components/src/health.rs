//! Health.

use engine_component::{Component, Entity};
use engine_observable::{DispatcherOnSet, EventBus};

use crate::damage::{DamageEventComponent, DamageInfo};

/// Hit points the player starts with.
pub const STARTING_HEALTH: i32 = 100;

/// Hit points plus a death flag other engines can subscribe to.
///
/// `is_dead` is written by whichever engine decides the entity died; the
/// component does not derive it from `current_health`.
pub trait HealthComponent: Component {
    fn current_health(&self) -> i32;
    fn set_current_health(&mut self, health: i32);
    fn is_dead(&self) -> DispatcherOnSet<bool>;
}

/// The player's body: health and a damage receiver.
#[derive(Debug)]
pub struct PlayerHealth {
    current_health: i32,
    is_dead: DispatcherOnSet<bool>,
    damage_received: EventBus<DamageInfo>,
}

impl PlayerHealth {
    /// Full health, alive.
    #[must_use]
    pub fn new(entity: Entity) -> Self {
        Self::with_health(entity, STARTING_HEALTH)
    }

    /// Create a new player body with `health` points.
    #[must_use]
    pub fn with_health(entity: Entity, health: i32) -> Self {
        Self {
            current_health: health,
            is_dead: DispatcherOnSet::new(entity, false),
            damage_received: EventBus::new(),
        }
    }
}

impl Component for PlayerHealth {}

impl HealthComponent for PlayerHealth {
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

impl DamageEventComponent for PlayerHealth {
    fn damage_received(&self) -> EventBus<DamageInfo> {
        self.damage_received.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_starts_alive_at_full_health() {
        let player = PlayerHealth::new(Entity::from_raw(1));
        assert_eq!(player.current_health(), STARTING_HEALTH);
        assert!(!player.is_dead().value());
        assert_eq!(player.is_dead().sender(), Entity::from_raw(1));
    }

    #[test]
    fn test_handles_share_state() {
        let mut player = PlayerHealth::with_health(Entity::from_raw(2), 10);
        player.set_current_health(4);
        assert_eq!(player.current_health(), 4);

        let flag = player.is_dead();
        player.is_dead().set_value(true);
        assert!(flag.value());
        assert!(player.damage_received().same_channel(&player.damage_received()));
    }
}
