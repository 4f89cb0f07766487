//! Components for the shooting demo.
//!
//! Each capability is a trait over [`Component`](engine_component::Component);
//! nodes hold them as `ComponentRef<dyn Capability>`. One implementer can
//! satisfy several capabilities: [`Enemy`] is health, damage receiver, and
//! target classification at once.
//!
//! Value dispatchers and event buses are returned as cloned handles so a
//! caller can fire them without holding a borrow of the component.

pub mod damage;
pub mod enemy;
pub mod gun;
pub mod health;
pub mod target;

pub use damage::{DamageEventComponent, DamageInfo};
pub use enemy::{Enemy, EnemySettings};
pub use gun::{GunAttributesComponent, GunHitTargetComponent, GunSettings, PlayerGun};
pub use health::{HealthComponent, PlayerHealth, STARTING_HEALTH};
pub use target::{TargetType, TargetTypeComponent};
