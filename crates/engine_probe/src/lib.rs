//! # engine_probe
//!
//! The boundary between engines and whatever answers collision queries. The
//! runtime never implements collision geometry; it consumes a [`Probe`]
//! supplied from outside and validates what comes back.
//!
//! - [`CollisionLayer`] / [`LayerMask`]: collider categories and sets of them.
//! - [`Probe`] / [`ProbeHit`]: the directional query and its result.
//! - [`ProbeError`]: malformed results from the collaborator.

pub mod error;
pub mod layer;
pub mod probe;

pub use error::ProbeError;
pub use layer::{CollisionLayer, LayerMask};
pub use probe::{Probe, ProbeHit};
