//! Keeps the scene in step with target lifetimes.
//!
//! A target's collider is placed when the target is spawned and withdrawn
//! here when its node is removed, so shots stop resolving to an entity that
//! no longer exists.

use std::rc::Rc;

use engine_node::{AnyNode, NodeDescriptor};
use engine_runtime::{Engine, NodeRoutes};
use tracing::debug;

use crate::nodes::PlayerTargetNode;
use crate::scene::SphereScene;

/// Withdraws a target's colliders from the scene when the target goes.
pub struct ColliderEngine {
    routes: Rc<NodeRoutes<Self>>,
    scene: Rc<SphereScene>,
}

impl ColliderEngine {
    pub const NAME: &'static str = "colliders";

    /// Create a new engine over `scene`.
    #[must_use]
    pub fn new(scene: Rc<SphereScene>) -> Self {
        Self {
            routes: Rc::new(
                NodeRoutes::new(Self::NAME)
                    .route::<PlayerTargetNode>(Self::add_target, Self::remove_target),
            ),
            scene,
        }
    }

    fn add_target(&mut self, _node: &PlayerTargetNode) {}

    fn remove_target(&mut self, node: &PlayerTargetNode) {
        let removed = self.scene.remove_owner(node.entity);
        debug!(entity = node.entity.id(), removed, "colliders withdrawn");
    }
}

impl Engine for ColliderEngine {
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
    use std::cell::RefCell;

    use engine_component::{ComponentSet, Entity};
    use engine_math::Vec3;
    use engine_runtime::EnginesRoot;
    use game_components::{
        DamageEventComponent, Enemy, EnemySettings, HealthComponent, TargetType,
        TargetTypeComponent,
    };

    use super::*;
    use crate::config::ShootingConfig;
    use crate::nodes::enemy_descriptor;
    use crate::scene::SphereCollider;

    fn spawn(root: &mut EnginesRoot, scene: &SphereScene) -> (Entity, Rc<RefCell<Enemy>>) {
        let entity = root.reserve_entity();
        let enemy = Rc::new(RefCell::new(Enemy::new(
            entity,
            &EnemySettings::new(TargetType::ZomBunny),
        )));
        let components = ComponentSet::new()
            .with::<dyn HealthComponent>(enemy.clone())
            .with::<dyn DamageEventComponent>(enemy.clone())
            .with::<dyn TargetTypeComponent>(enemy.clone());
        root.build_entity_with(entity, &enemy_descriptor(), &components)
            .unwrap();
        scene.add(SphereCollider {
            center: Vec3::new(0.0, 0.0, 5.0),
            radius: 0.5,
            layer: ShootingConfig::default().enemy_layer,
            owner: Some(entity),
        });
        (entity, enemy)
    }

    #[test]
    fn test_removal_withdraws_collider() {
        let scene = Rc::new(SphereScene::new());
        let mut root = EnginesRoot::new();
        root.add_engine(ColliderEngine::new(scene.clone())).unwrap();

        let (first, _) = spawn(&mut root, &scene);
        let (_second, _) = spawn(&mut root, &scene);
        assert_eq!(scene.len(), 2);

        root.remove_entity(first).unwrap();
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_no_subscription_left_on_death_signal() {
        let scene = Rc::new(SphereScene::new());
        let mut root = EnginesRoot::new();
        root.add_engine(ColliderEngine::new(scene.clone())).unwrap();

        let (entity, enemy) = spawn(&mut root, &scene);
        let is_dead = enemy.borrow().is_dead();
        assert_eq!(is_dead.subscriber_count(), 0);

        root.commands().remove(entity);
        root.flush_removals();
        assert!(scene.is_empty());
        assert_eq!(is_dead.subscriber_count(), 0);
    }
}
