//! Probe error types.

use crate::layer::{CollisionLayer, LayerMask};

/// A probe result that violates the probe contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProbeError {
    /// The hit point has a NaN or infinite coordinate.
    #[error("probe hit point is not finite: {0:?}")]
    NonFinitePoint([f32; 3]),

    /// The hit belongs to a layer the query did not ask for.
    #[error("probe hit {layer} which is outside the queried mask {mask}")]
    LayerOutsideMask {
        /// The layer reported by the probe.
        layer: CollisionLayer,
        /// The mask the probe was queried with.
        mask: LayerMask,
    },
}
