//! # game_shooting
//!
//! The player shooting engine and the damage engine it feeds, with the node
//! types they consume and a headless demo world to drive them.
//!
//! - [`PlayerShootingEngine`]: cooldown, firing, kill events.
//! - [`DamageEngine`]: health bookkeeping and death.
//! - [`ColliderEngine`]: withdraws removed targets from the scene.
//! - [`SphereScene`]: a probe over sphere colliders.
//! - [`ShootingWorld`]: wires the above into an `EnginesRoot`.

pub mod colliders;
pub mod config;
pub mod damage;
pub mod nodes;
pub mod scene;
pub mod shooting;
pub mod world;

pub use colliders::ColliderEngine;
pub use config::{DemoConfig, EnemySpawn, ShootingConfig};
pub use damage::DamageEngine;
pub use nodes::{DamageableNode, PlayerGunNode, PlayerNode, PlayerTargetNode};
pub use scene::{SphereCollider, SphereScene};
pub use shooting::{PlayerShootingEngine, ShootingState, ShotOutcome};
pub use world::{PlayerHandles, ShootingWorld};
