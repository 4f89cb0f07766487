//! Per-entity component sets.
//!
//! A [`ComponentSet`] is what an external factory hands to the registry when
//! an entity is built: one handle per capability the entity exposes. The
//! registry only checks capability presence, never field values.

use std::any::Any;
use std::collections::HashMap;

use crate::component::{Component, ComponentMeta, ComponentRef, ComponentTypeId};
use crate::error::ComponentError;

/// A type-erased capability handle.
struct Entry {
    meta: ComponentMeta,
    /// Always a `ComponentRef<C>` for the capability described by `meta`.
    handle: Box<dyn Any>,
}

/// The set of component capabilities supplied for one entity.
#[derive(Default)]
pub struct ComponentSet {
    entries: HashMap<ComponentTypeId, Entry>,
}

impl ComponentSet {
    /// Create a new empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add a capability handle, builder style.
    ///
    /// ```rust,ignore
    /// let set = ComponentSet::new()
    ///     .with::<dyn HealthComponent>(player.clone())
    ///     .with::<dyn DamageEventComponent>(player);
    /// ```
    #[must_use]
    pub fn with<C: ?Sized + Component>(mut self, component: ComponentRef<C>) -> Self {
        self.insert(component);
        self
    }

    /// Insert a capability handle.
    ///
    /// Returns `true` if a handle for the same capability was replaced.
    pub fn insert<C: ?Sized + Component>(&mut self, component: ComponentRef<C>) -> bool {
        let meta = ComponentMeta::of::<C>();
        self.entries
            .insert(
                meta.type_id,
                Entry {
                    meta,
                    handle: Box::new(component),
                },
            )
            .is_some()
    }

    /// Returns the handle for capability `C`, or `None` if it is absent.
    #[must_use]
    pub fn get<C: ?Sized + Component>(&self) -> Option<ComponentRef<C>> {
        self.require::<C>().ok()
    }

    /// Returns the handle for capability `C`.
    ///
    /// # Errors
    ///
    /// [`ComponentError::Missing`] if the capability is absent, or
    /// [`ComponentError::Mismatched`] if the stored handle has another type.
    pub fn require<C: ?Sized + Component>(&self) -> Result<ComponentRef<C>, ComponentError> {
        let meta = ComponentMeta::of::<C>();
        let entry = self
            .entries
            .get(&meta.type_id)
            .ok_or(ComponentError::Missing(meta.name))?;
        entry
            .handle
            .downcast_ref::<ComponentRef<C>>()
            .cloned()
            .ok_or(ComponentError::Mismatched(meta.name))
    }

    /// Returns `true` if the set exposes the capability with this ID.
    #[must_use]
    pub fn contains(&self, type_id: ComponentTypeId) -> bool {
        self.entries.contains_key(&type_id)
    }

    /// Returns the first capability in `required` that the set lacks.
    #[must_use]
    pub fn first_missing<'a>(&self, required: &'a [ComponentMeta]) -> Option<&'a ComponentMeta> {
        required.iter().find(|meta| !self.contains(meta.type_id))
    }

    /// Returns `true` if every capability in `required` is present.
    #[must_use]
    pub fn contains_all(&self, required: &[ComponentMeta]) -> bool {
        self.first_missing(required).is_none()
    }

    /// Returns an iterator over the metadata of all capabilities in the set.
    pub fn metas(&self) -> impl Iterator<Item = &ComponentMeta> {
        self.entries.values().map(|entry| &entry.meta)
    }

    /// Returns the number of capabilities in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set holds no capabilities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ComponentSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(self.entries.values().map(|entry| entry.meta.name))
            .finish()
    }
}
