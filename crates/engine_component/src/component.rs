//! Core [`Component`] capability trait and associated metadata.
//!
//! Components are declared as **capabilities**: traits that expose typed
//! fields. Unrelated implementers may expose the same capability, and one
//! implementer may expose several capabilities at once. The runtime never
//! sees the concrete implementer, only `ComponentRef<dyn Capability>` handles.
//!
//! ## Capability identity
//!
//! [`ComponentTypeId`] is derived from the capability's **type name** using
//! the FNV-1a 64-bit hash algorithm, so the identity of `dyn HealthComponent`
//! is the same wherever it is computed.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A shared, mutable handle to a component capability.
///
/// `C` is normally a trait object (`dyn HealthComponent`); an
/// `Rc<RefCell<PlayerHealth>>` coerces into it, so one implementer can back
/// several handles of different capabilities.
pub type ComponentRef<C> = Rc<RefCell<C>>;

/// A unique identifier for a component capability, derived from its type
/// name using the FNV-1a 64-bit hash algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute a [`ComponentTypeId`] from a name using FNV-1a 64-bit.
    ///
    /// # Algorithm (FNV-1a 64-bit)
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325          (offset basis)
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3  (prime)
    /// return hash
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        Self(fnv1a_64(name))
    }

    /// Compute the [`ComponentTypeId`] for capability `C`.
    ///
    /// `C` is usually unsized (`dyn Capability`).
    #[must_use]
    pub fn of<C: ?Sized + Component>() -> Self {
        Self::from_name(std::any::type_name::<C>())
    }
}

impl std::fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// FNV-1a 64-bit hash of `name`'s UTF-8 bytes.
///
/// Shared by every name-derived identity in the workspace (components, nodes).
#[must_use]
pub const fn fnv1a_64(name: &str) -> u64 {
    let bytes = name.as_bytes();
    let mut hash = ComponentTypeId::FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(ComponentTypeId::FNV_PRIME);
        i += 1;
    }
    hash
}

/// Metadata about a component capability: its identity plus a
/// human-readable name for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentMeta {
    /// The unique capability identifier.
    pub type_id: ComponentTypeId,
    /// The capability's type name (e.g. `"dyn game_components::HealthComponent"`).
    pub name: &'static str,
}

impl ComponentMeta {
    /// Returns the metadata for capability `C`.
    #[must_use]
    pub fn of<C: ?Sized + Component>() -> Self {
        Self {
            type_id: ComponentTypeId::of::<C>(),
            name: std::any::type_name::<C>(),
        }
    }
}

/// The component capability marker.
///
/// Every capability trait declares `Component` as a supertrait, which makes
/// `dyn Capability` itself a `Component` and thereby storable in a
/// [`ComponentSet`](crate::ComponentSet).
///
/// # Examples
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use engine_component::{Component, ComponentRef, ComponentSet};
///
/// trait HealthComponent: Component {
///     fn current_health(&self) -> i32;
/// }
///
/// struct Zombie {
///     hp: i32,
/// }
///
/// impl Component for Zombie {}
///
/// impl HealthComponent for Zombie {
///     fn current_health(&self) -> i32 {
///         self.hp
///     }
/// }
///
/// let zombie = Rc::new(RefCell::new(Zombie { hp: 40 }));
/// let set = ComponentSet::new().with::<dyn HealthComponent>(zombie);
/// let health: ComponentRef<dyn HealthComponent> = set.get().unwrap();
/// assert_eq!(health.borrow().current_health(), 40);
/// ```
pub trait Component: 'static {}
