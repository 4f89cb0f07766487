//! Applies damage events to health.
//!
//! Each damageable entity's damage bus is subscribed while its node is
//! alive. Damage is subtracted and clamped at zero; the hit that reaches zero
//! writes `is_dead = true` and queues the entity for removal at frame end.
//! Damage to an entity already at zero is ignored.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use engine_component::Entity;
use engine_node::{AnyNode, NodeDescriptor};
use engine_observable::SubscriptionId;
use engine_runtime::{Engine, EntityCommands, NodeRoutes};
use game_components::{DamageInfo, HealthComponent};
use tracing::{debug, info};

use crate::nodes::DamageableNode;

/// Subtracts incoming damage from health and retires entities that run out.
pub struct DamageEngine {
    routes: Rc<NodeRoutes<Self>>,
    commands: EntityCommands,
    subscriptions: HashMap<Entity, SubscriptionId>,
}

impl DamageEngine {
    pub const NAME: &'static str = "damage";

    /// Create a new damage engine queueing removals on `commands`.
    #[must_use]
    pub fn new(commands: EntityCommands) -> Self {
        Self {
            routes: Rc::new(
                NodeRoutes::new(Self::NAME)
                    .route::<DamageableNode>(Self::add_damageable, Self::remove_damageable),
            ),
            commands,
            subscriptions: HashMap::new(),
        }
    }

    /// Number of entities currently listened to.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.subscriptions.len()
    }

    fn add_damageable(&mut self, node: &DamageableNode) {
        let health = Rc::downgrade(&node.health);
        let commands = self.commands.clone();
        let entity = node.entity;
        let id = node
            .damage
            .borrow()
            .damage_received()
            .subscribe(move |info| apply_damage(&health, &commands, entity, info));
        self.subscriptions.insert(entity, id);
    }

    fn remove_damageable(&mut self, node: &DamageableNode) {
        if let Some(id) = self.subscriptions.remove(&node.entity) {
            node.damage.borrow().damage_received().unsubscribe(id);
        }
    }
}

fn apply_damage(
    health: &Weak<RefCell<dyn HealthComponent>>,
    commands: &EntityCommands,
    entity: Entity,
    info: &mut DamageInfo,
) {
    let Some(health) = health.upgrade() else {
        return;
    };

    let remaining = {
        let mut health = health.borrow_mut();
        let before = health.current_health();
        if before <= 0 {
            return;
        }
        let after = (before - info.damage_per_shot.max(0)).max(0);
        health.set_current_health(after);
        after
    };
    debug!(
        entity = entity.id(),
        damage = info.damage_per_shot,
        remaining,
        "damage applied"
    );

    if remaining == 0 {
        info!(entity = entity.id(), "health depleted");
        // Fetch the handle first: death subscribers may borrow this component.
        let is_dead = health.borrow().is_dead();
        is_dead.set_value(true);
        commands.remove(entity);
    }
}

impl Engine for DamageEngine {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn accepted_nodes(&self) -> Vec<NodeDescriptor> {
        self.routes.accepted()
    }

    fn add(&mut self, node: &AnyNode) {
        let routes = Rc::clone(&self.routes);
        routes.add(self, node);
    }

    fn remove(&mut self, node: &AnyNode) {
        let routes = Rc::clone(&self.routes);
        routes.remove(self, node);
    }
}

#[cfg(test)]
mod tests {
    use engine_component::ComponentSet;
    use engine_math::Vec3;
    use engine_runtime::EnginesRoot;
    use game_components::{
        DamageEventComponent, Enemy, EnemySettings, TargetType, TargetTypeComponent,
    };

    use super::*;
    use crate::nodes::enemy_descriptor;

    fn spawn(root: &mut EnginesRoot, health: i32) -> (Entity, Rc<RefCell<Enemy>>) {
        let entity = root.reserve_entity();
        let enemy = Rc::new(RefCell::new(Enemy::new(
            entity,
            &EnemySettings::new(TargetType::ZomBunny).with_health(health),
        )));
        let components = ComponentSet::new()
            .with::<dyn HealthComponent>(enemy.clone())
            .with::<dyn DamageEventComponent>(enemy.clone())
            .with::<dyn TargetTypeComponent>(enemy.clone());
        root.build_entity_with(entity, &enemy_descriptor(), &components)
            .unwrap();
        (entity, enemy)
    }

    fn hit(enemy: &Rc<RefCell<Enemy>>, amount: i32) {
        let bus = enemy.borrow().damage_received();
        bus.dispatch(&mut DamageInfo::new(amount, Vec3::ZERO));
    }

    #[test]
    fn test_damage_subtracts() {
        let mut root = EnginesRoot::new();
        root.add_engine(DamageEngine::new(root.commands())).unwrap();
        let (_, enemy) = spawn(&mut root, 100);

        hit(&enemy, 25);
        assert_eq!(enemy.borrow().current_health(), 75);
        assert!(!enemy.borrow().is_dead().value());
    }

    #[test]
    fn test_lethal_damage_marks_dead_once() {
        let mut root = EnginesRoot::new();
        root.add_engine(DamageEngine::new(root.commands())).unwrap();
        let (entity, enemy) = spawn(&mut root, 30);

        let deaths = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&deaths);
        enemy.borrow().is_dead().subscribe(move |_, dead| {
            if *dead {
                *counter.borrow_mut() += 1;
            }
        });

        hit(&enemy, 25);
        hit(&enemy, 25);
        hit(&enemy, 25);

        assert_eq!(enemy.borrow().current_health(), 0);
        assert_eq!(*deaths.borrow(), 1);
        assert!(root.commands().is_pending(entity));

        root.flush_removals();
        assert_eq!(root.entity_count(), 0);
    }

    #[test]
    fn test_removed_entity_stops_listening() {
        let mut root = EnginesRoot::new();
        root.add_engine(DamageEngine::new(root.commands())).unwrap();
        let (entity, enemy) = spawn(&mut root, 100);
        let bus = enemy.borrow().damage_received();
        assert_eq!(bus.subscriber_count(), 1);

        root.remove_entity(entity).unwrap();
        assert_eq!(bus.subscriber_count(), 0);
        hit(&enemy, 25);
        assert_eq!(enemy.borrow().current_health(), 100);
    }
}
