//! The directional probe collaborator.

use engine_component::Entity;
use engine_math::{Ray, Vec3};

use crate::error::ProbeError;
use crate::layer::{CollisionLayer, LayerMask};

/// The closest hit of a directional probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// World-space contact point.
    pub point: Vec3,
    /// Entity owning the collider, if the collider belongs to one.
    pub entity: Option<Entity>,
    /// The collider's layer.
    pub layer: CollisionLayer,
}

impl ProbeHit {
    /// Check the hit against the mask it was queried with.
    ///
    /// # Errors
    ///
    /// [`ProbeError::NonFinitePoint`] for NaN/infinite coordinates and
    /// [`ProbeError::LayerOutsideMask`] when the layer was not requested.
    pub fn validate(&self, mask: LayerMask) -> Result<(), ProbeError> {
        if !self.point.is_finite() {
            return Err(ProbeError::NonFinitePoint(self.point.to_array()));
        }
        if !mask.contains(self.layer) {
            return Err(ProbeError::LayerOutsideMask {
                layer: self.layer,
                mask,
            });
        }
        Ok(())
    }
}

/// Casts a ray against the colliders of the selected layers.
///
/// Implemented outside the runtime (a physics scene, a test script). `None`
/// means nothing was hit within `max_distance`, which is the ordinary miss
/// case and not an error.
pub trait Probe {
    /// Returns the closest hit along `ray` within `max_distance` among
    /// colliders whose layer is in `mask`.
    fn cast(&self, ray: Ray, max_distance: f32, mask: LayerMask) -> Option<ProbeHit>;
}

impl<P: Probe + ?Sized> Probe for std::rc::Rc<P> {
    fn cast(&self, ray: Ray, max_distance: f32, mask: LayerMask) -> Option<ProbeHit> {
        (**self).cast(ray, max_distance, mask)
    }
}
