//! A minimal collision scene for the headless demo and tests.
//!
//! Colliders are spheres; a probe returns the nearest sphere surface the ray
//! enters within range.

use std::cell::RefCell;

use engine_component::Entity;
use engine_math::{Ray, Vec3};
use engine_probe::{CollisionLayer, LayerMask, Probe, ProbeHit};
use tracing::trace;

/// A sphere collider, optionally owned by an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCollider {
    pub center: Vec3,
    pub radius: f32,
    pub layer: CollisionLayer,
    pub owner: Option<Entity>,
}

impl SphereCollider {
    /// Distance along `ray` to where it enters the sphere, or `None`. A ray
    /// starting inside hits at distance 0.
    #[must_use]
    pub fn enter_distance(&self, ray: &Ray) -> Option<f32> {
        let m = ray.origin - self.center;
        let c = m.dot(m) - self.radius * self.radius;
        if c <= 0.0 {
            return Some(0.0);
        }
        let b = m.dot(ray.direction);
        if b > 0.0 {
            return None;
        }
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        Some(-b - disc.sqrt())
    }
}

/// Colliders that can be added and removed while probes are outstanding.
#[derive(Debug, Default)]
pub struct SphereScene {
    colliders: RefCell<Vec<SphereCollider>>,
}

impl SphereScene {
    /// Create a new empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, collider: SphereCollider) {
        self.colliders.borrow_mut().push(collider);
    }

    /// Drop every collider owned by `entity`. Returns how many were removed.
    pub fn remove_owner(&self, entity: Entity) -> usize {
        let mut colliders = self.colliders.borrow_mut();
        let before = colliders.len();
        colliders.retain(|c| c.owner != Some(entity));
        before - colliders.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.borrow().is_empty()
    }
}

impl Probe for SphereScene {
    fn cast(&self, ray: Ray, max_distance: f32, mask: LayerMask) -> Option<ProbeHit> {
        let hit = self
            .colliders
            .borrow()
            .iter()
            .filter(|c| mask.contains(c.layer))
            .filter_map(|c| {
                c.enter_distance(&ray)
                    .filter(|&t| t <= max_distance)
                    .map(|t| (t, c))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, c)| ProbeHit {
                point: ray.point_at(t),
                entity: c.owner,
                layer: c.layer,
            });
        trace!(?hit, "probe");
        hit
    }
}
