//! Collision layers and masks.

use serde::{Deserialize, Serialize};

/// A collider category, `0..32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CollisionLayer(u8);

impl CollisionLayer {
    /// Number of distinct layers.
    pub const COUNT: u8 = 32;

    /// Create a layer. Returns `None` for indices `>= 32`.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Returns the layer index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns a mask containing only this layer.
    #[must_use]
    pub const fn mask(self) -> LayerMask {
        LayerMask(1 << self.0)
    }
}

impl TryFrom<u8> for CollisionLayer {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index).ok_or_else(|| format!("collision layer {index} is out of range 0..32"))
    }
}

impl From<CollisionLayer> for u8 {
    fn from(layer: CollisionLayer) -> Self {
        layer.0
    }
}

impl std::fmt::Display for CollisionLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer {}", self.0)
    }
}

/// A set of collision layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// The empty mask.
    pub const NONE: LayerMask = LayerMask(0);

    /// The mask containing every layer.
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Returns `true` if `layer` is in the mask.
    #[must_use]
    pub const fn contains(self, layer: CollisionLayer) -> bool {
        self.0 & (1 << layer.0) != 0
    }

    /// Returns `true` if the mask holds no layers.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        LayerMask(self.0 | rhs.0)
    }
}

impl std::ops::BitOr<CollisionLayer> for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: CollisionLayer) -> Self::Output {
        self | rhs.mask()
    }
}

impl From<CollisionLayer> for LayerMask {
    fn from(layer: CollisionLayer) -> Self {
        layer.mask()
    }
}

impl std::fmt::Display for LayerMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#034b}", self.0)
    }
}
