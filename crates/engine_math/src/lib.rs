//! # engine_math
//!
//! Math types for the node/engine runtime. Re-exports [`glam`] for linear
//! algebra and defines [`Ray`], the input of directional probes.

pub mod ray;

// Re-export glam types for convenience.
pub use glam::{Quat, Vec2, Vec3};

pub use ray::Ray;
