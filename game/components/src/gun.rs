//! The player's gun.

use engine_component::{Component, Entity};
use engine_math::{Quat, Ray, Vec3};
use engine_observable::DispatcherOnSet;
use serde::{Deserialize, Serialize};

/// Firing parameters and cooldown state of a gun.
pub trait GunAttributesComponent: Component {
    /// Minimum seconds between shots.
    fn time_between_bullets(&self) -> f32;
    /// Where the gun points right now.
    fn shoot_ray(&self) -> Ray;
    /// Maximum probe distance.
    fn range(&self) -> f32;
    fn damage_per_shot(&self) -> i32;
    /// Seconds since the last shot, as accumulated by the shooting engine.
    fn timer(&self) -> f32;
    fn set_timer(&mut self, timer: f32);
    fn last_target_position(&self) -> Vec3;
    fn set_last_target_position(&mut self, position: Vec3);
}

/// Reports whether the last shot hit a target.
pub trait GunHitTargetComponent: Component {
    fn target_hit(&self) -> DispatcherOnSet<bool>;
}

/// Tunable gun parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GunSettings {
    pub time_between_bullets: f32,
    pub range: f32,
    pub damage_per_shot: i32,
}

impl Default for GunSettings {
    fn default() -> Self {
        Self {
            time_between_bullets: 0.15,
            range: 100.0,
            damage_per_shot: 20,
        }
    }
}

/// A gun held by the player. Backs both gun capabilities.
#[derive(Debug)]
pub struct PlayerGun {
    settings: GunSettings,
    position: Vec3,
    rotation: Quat,
    timer: f32,
    last_target_position: Vec3,
    target_hit: DispatcherOnSet<bool>,
}

impl PlayerGun {
    /// Create a new gun at the origin, aiming down +Z.
    #[must_use]
    pub fn new(entity: Entity, settings: GunSettings) -> Self {
        Self {
            settings,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            timer: 0.0,
            last_target_position: Vec3::ZERO,
            target_hit: DispatcherOnSet::new(entity, false),
        }
    }

    /// Place the muzzle. The shoot ray leaves `position` along the rotated
    /// forward axis.
    pub fn set_pose(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
    }

    #[must_use]
    pub fn settings(&self) -> &GunSettings {
        &self.settings
    }
}

impl Component for PlayerGun {}

impl GunAttributesComponent for PlayerGun {
    fn time_between_bullets(&self) -> f32 {
        self.settings.time_between_bullets
    }

    fn shoot_ray(&self) -> Ray {
        Ray::from_pose(self.position, self.rotation)
    }

    fn range(&self) -> f32 {
        self.settings.range
    }

    fn damage_per_shot(&self) -> i32 {
        self.settings.damage_per_shot
    }

    fn timer(&self) -> f32 {
        self.timer
    }

    fn set_timer(&mut self, timer: f32) {
        self.timer = timer;
    }

    fn last_target_position(&self) -> Vec3 {
        self.last_target_position
    }

    fn set_last_target_position(&mut self, position: Vec3) {
        self.last_target_position = position;
    }
}

impl GunHitTargetComponent for PlayerGun {
    fn target_hit(&self) -> DispatcherOnSet<bool> {
        self.target_hit.clone()
    }
}
