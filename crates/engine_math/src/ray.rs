//! Half-line used for directional probes.
//!
//! A [`Ray`] is an origin plus a unit direction. Guns expose one as their
//! shooting ray; probe collaborators cast along it.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A half-line with a unit-length direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Ray {
    /// World-space start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Local forward axis used by [`Ray::from_pose`].
    pub const FORWARD: Vec3 = Vec3::Z;

    /// Create a ray, normalising `direction`.
    ///
    /// A zero (or non-finite) direction falls back to [`Ray::FORWARD`].
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(Self::FORWARD),
        }
    }

    /// Ray leaving `position` along the forward axis rotated by `rotation`.
    #[must_use]
    pub fn from_pose(position: Vec3, rotation: Quat) -> Self {
        Self::new(position, rotation * Self::FORWARD)
    }

    /// Point at `distance` along the ray.
    #[must_use]
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Self::FORWARD,
        }
    }
}
