//! Assembles a playable session: the composition root, both engines, a
//! sphere scene, one player, and a line of enemies.

use std::cell::RefCell;
use std::rc::Rc;

use engine_component::{ComponentSet, Entity};
use engine_math::Vec3;
use engine_observable::EventBus;
use engine_runtime::{EnginesRoot, RuntimeError};
use game_components::{
    DamageEventComponent, Enemy, GunAttributesComponent, GunHitTargetComponent, GunSettings,
    HealthComponent, PlayerGun, PlayerHealth, TargetType, TargetTypeComponent,
};
use tracing::info;

use crate::colliders::ColliderEngine;
use crate::config::{DemoConfig, EnemySpawn, ShootingConfig};
use crate::damage::DamageEngine;
use crate::nodes::{enemy_descriptor, player_descriptor};
use crate::scene::{SphereCollider, SphereScene};
use crate::shooting::PlayerShootingEngine;

/// Handles to the player's components, kept for inspection.
#[derive(Debug, Clone)]
pub struct PlayerHandles {
    pub entity: Entity,
    pub gun: Rc<RefCell<PlayerGun>>,
    pub body: Rc<RefCell<PlayerHealth>>,
}

/// A composition root with the shooting engines and a sphere scene.
pub struct ShootingWorld {
    pub root: EnginesRoot,
    pub scene: Rc<SphereScene>,
    pub kills: EventBus<TargetType>,
    config: ShootingConfig,
}

impl ShootingWorld {
    /// Root with the damage, collider and shooting engines registered, in
    /// that order.
    ///
    /// # Errors
    ///
    /// Engine registration failures.
    pub fn new(config: ShootingConfig) -> Result<Self, RuntimeError> {
        let mut root = EnginesRoot::new();
        let scene = Rc::new(SphereScene::new());

        root.add_engine(DamageEngine::new(root.commands()))?;
        root.add_engine(ColliderEngine::new(scene.clone()))?;
        let shooting = PlayerShootingEngine::new(
            root.nodes_db(),
            scene.clone(),
            root.signals(),
            config,
        );
        let kills = shooting.kills();
        root.add_engine(shooting)?;

        Ok(Self {
            root,
            scene,
            kills,
            config,
        })
    }

    /// Build the whole demo scene from a config.
    ///
    /// # Errors
    ///
    /// Engine registration or entity composition failures.
    pub fn from_config(config: &DemoConfig) -> Result<(Self, PlayerHandles), RuntimeError> {
        let mut world = Self::new(config.shooting)?;
        let player = world.spawn_player(config.gun.clone())?;
        for spawn in &config.enemies {
            world.spawn_enemy(spawn)?;
        }
        if let Some(distance) = config.wall_distance {
            world.add_wall(distance);
        }
        info!(
            player = player.entity.id(),
            enemies = config.enemies.len(),
            "scene ready"
        );
        Ok((world, player))
    }

    /// Spawn the player at the origin, aiming down +Z.
    ///
    /// # Errors
    ///
    /// Composition failures.
    pub fn spawn_player(&mut self, gun: GunSettings) -> Result<PlayerHandles, RuntimeError> {
        let entity = self.root.reserve_entity();
        let gun = Rc::new(RefCell::new(PlayerGun::new(entity, gun)));
        let body = Rc::new(RefCell::new(PlayerHealth::new(entity)));
        let components = ComponentSet::new()
            .with::<dyn GunAttributesComponent>(gun.clone())
            .with::<dyn GunHitTargetComponent>(gun.clone())
            .with::<dyn HealthComponent>(body.clone())
            .with::<dyn DamageEventComponent>(body.clone());
        self.root
            .build_entity_with(entity, &player_descriptor(), &components)?;
        Ok(PlayerHandles { entity, gun, body })
    }

    /// Spawn an enemy `spawn.distance` ahead of the origin. Its collider
    /// leaves the scene when the enemy is removed.
    ///
    /// # Errors
    ///
    /// Composition failures.
    pub fn spawn_enemy(&mut self, spawn: &EnemySpawn) -> Result<Entity, RuntimeError> {
        let entity = self.root.reserve_entity();
        let enemy = Rc::new(RefCell::new(Enemy::new(entity, &spawn.settings)));
        let components = ComponentSet::new()
            .with::<dyn HealthComponent>(enemy.clone())
            .with::<dyn DamageEventComponent>(enemy.clone())
            .with::<dyn TargetTypeComponent>(enemy.clone());
        self.root
            .build_entity_with(entity, &enemy_descriptor(), &components)?;

        self.scene.add(SphereCollider {
            center: Vec3::new(0.0, 0.0, spawn.distance),
            radius: spawn.radius,
            layer: self.config.enemy_layer,
            owner: Some(entity),
        });
        Ok(entity)
    }

    /// A scenery collider straight ahead that stops shots but takes no damage.
    pub fn add_wall(&self, distance: f32) {
        self.scene.add(SphereCollider {
            center: Vec3::new(0.0, 0.0, distance + 2.0),
            radius: 2.0,
            layer: self.config.shootable_layer,
            owner: None,
        });
    }
}

impl std::fmt::Debug for ShootingWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShootingWorld")
            .field("entities", &self.root.entity_count())
            .field("colliders", &self.scene.len())
            .field("config", &self.config)
            .finish()
    }
}
