//! Shooting and demo configuration.

use std::path::Path;

use anyhow::Context;
use engine_probe::{CollisionLayer, LayerMask};
use engine_runtime::TickConfig;
use game_components::{EnemySettings, GunSettings, TargetType};
use serde::{Deserialize, Serialize};

const SHOOTABLE_LAYER: CollisionLayer = match CollisionLayer::new(8) {
    Some(layer) => layer,
    None => panic!("shootable layer out of range"),
};

const ENEMY_LAYER: CollisionLayer = match CollisionLayer::new(9) {
    Some(layer) => layer,
    None => panic!("enemy layer out of range"),
};

/// Collision layers the shooting engine probes against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootingConfig {
    /// Scenery that stops bullets but never takes damage.
    pub shootable_layer: CollisionLayer,
    /// Colliders owned by damageable targets.
    pub enemy_layer: CollisionLayer,
}

impl Default for ShootingConfig {
    fn default() -> Self {
        Self {
            shootable_layer: SHOOTABLE_LAYER,
            enemy_layer: ENEMY_LAYER,
        }
    }
}

impl ShootingConfig {
    /// Layers a shot is probed against.
    #[must_use]
    pub fn probe_mask(&self) -> LayerMask {
        self.shootable_layer.mask() | self.enemy_layer
    }
}

/// An enemy placed in the demo scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    #[serde(flatten)]
    pub settings: EnemySettings,
    /// Distance straight ahead of the gun.
    pub distance: f32,
    #[serde(default = "EnemySpawn::default_radius")]
    pub radius: f32,
}

impl EnemySpawn {
    fn default_radius() -> f32 {
        0.5
    }

    /// Create a new spawn with the default collider radius.
    #[must_use]
    pub fn new(settings: EnemySettings, distance: f32) -> Self {
        Self {
            settings,
            distance,
            radius: Self::default_radius(),
        }
    }
}

/// Everything the headless demo needs, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub tick: TickConfig,
    pub shooting: ShootingConfig,
    pub gun: GunSettings,
    /// Enemies in a line in front of the player, nearest first.
    pub enemies: Vec<EnemySpawn>,
    /// Distance of a wall behind the enemies, if any.
    pub wall_distance: Option<f32>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tick: TickConfig {
                tick_rate: 60.0,
                max_ticks: 600,
            },
            shooting: ShootingConfig::default(),
            gun: GunSettings::default(),
            enemies: vec![
                EnemySpawn::new(EnemySettings::new(TargetType::ZomBunny), 5.0),
                EnemySpawn::new(EnemySettings::new(TargetType::ZomBear), 10.0),
                EnemySpawn::new(
                    EnemySettings::new(TargetType::Hellephant).with_health(300),
                    15.0,
                ),
            ],
            wall_distance: Some(30.0),
        }
    }
}

impl DemoConfig {
    /// Read a config from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading demo config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing demo config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layers() {
        let config = ShootingConfig::default();
        assert_eq!(config.shootable_layer.index(), 8);
        assert_eq!(config.enemy_layer.index(), 9);
        assert_eq!(config.probe_mask(), LayerMask(0b11 << 8));
    }

    #[test]
    fn test_layers_from_json() {
        let config: ShootingConfig = serde_json::from_str(r#"{"enemy_layer":12}"#).unwrap();
        assert_eq!(config.enemy_layer.index(), 12);
        assert_eq!(config.shootable_layer.index(), 8);
        assert!(serde_json::from_str::<ShootingConfig>(r#"{"enemy_layer":40}"#).is_err());
    }

    #[test]
    fn test_demo_config_partial_json() {
        let config: DemoConfig = serde_json::from_str(
            r#"{
                "tick": {"max_ticks": 5},
                "enemies": [{"target_type": "zom_bear", "distance": 3.0}]
            }"#,
        )
        .unwrap();
        assert_eq!(config.tick.max_ticks, 5);
        assert_eq!(config.tick.tick_rate, 60.0);
        assert_eq!(config.enemies.len(), 1);
        assert_eq!(config.enemies[0].settings.starting_health, 100);
        assert_eq!(config.enemies[0].radius, 0.5);
        assert_eq!(config.wall_distance, Some(30.0));
    }

    #[test]
    fn test_load_reports_path() {
        let err = DemoConfig::load(Path::new("/nonexistent/demo.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/demo.json"));
    }
}
