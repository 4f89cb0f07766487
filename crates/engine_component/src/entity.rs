//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight `u64` identifier with no inherent data.
//! Components are supplied for it by external factories and the registry
//! derives nodes from them.

use serde::{Deserialize, Serialize};

/// A unique entity identifier.
///
/// Entities are pure identifiers and carry no data of their own. An ID is
/// stable for the entity's lifetime and may be handed out again only after
/// every node derived from the entity has been torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

impl Entity {
    /// The null / invalid entity sentinel.
    pub const INVALID: Entity = Entity(0);

    /// Create an entity from a raw `u64` identifier.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) entity.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates entity IDs.
///
/// Fresh IDs increase monotonically from 1. Released IDs go on a free list
/// and are handed out again, oldest release first, before any fresh ID.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
    free: std::collections::VecDeque<Entity>,
}

impl EntityAllocator {
    /// Creates a new allocator. IDs start at 1 (0 is reserved for [`Entity::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            free: std::collections::VecDeque::new(),
        }
    }

    /// Allocates an entity ID, reusing a released one when available.
    pub fn allocate(&mut self) -> Entity {
        if let Some(entity) = self.free.pop_front() {
            return entity;
        }
        let id = self.next_id;
        self.next_id += 1;
        Entity(id)
    }

    /// Returns an ID to the allocator once its entity is fully torn down.
    ///
    /// IDs this allocator never handed out, the invalid sentinel, and IDs
    /// already on the free list are ignored.
    pub fn release(&mut self, entity: Entity) {
        if !entity.is_valid() || entity.0 >= self.next_id || self.free.contains(&entity) {
            return;
        }
        self.free.push_back(entity);
    }

    /// Returns the number of IDs currently handed out.
    #[must_use]
    pub fn live_count(&self) -> u64 {
        self.next_id - 1 - self.free.len() as u64
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_creation() {
        let e = Entity::from_raw(42);
        assert_eq!(e.id(), 42);
        assert!(e.is_valid());
    }

    #[test]
    fn test_entity_invalid() {
        assert!(!Entity::INVALID.is_valid());
        assert_eq!(Entity::INVALID.id(), 0);
    }

    #[test]
    fn test_allocator_produces_unique_ids() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        let e3 = alloc.allocate();
        assert_eq!(e1.id(), 1);
        assert_eq!(e2.id(), 2);
        assert_eq!(e3.id(), 3);
        assert_eq!(alloc.live_count(), 3);
    }

    #[test]
    fn test_allocator_reuses_released_ids_in_order() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        alloc.release(e2);
        alloc.release(e1);
        assert_eq!(alloc.live_count(), 0);
        assert_eq!(alloc.allocate(), e2);
        assert_eq!(alloc.allocate(), e1);
        assert_eq!(alloc.allocate().id(), 3);
    }

    #[test]
    fn test_allocator_ignores_foreign_and_duplicate_releases() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate();
        alloc.release(Entity::INVALID);
        alloc.release(Entity::from_raw(99));
        alloc.release(e1);
        alloc.release(e1);
        assert_eq!(alloc.allocate(), e1);
        assert_eq!(alloc.allocate().id(), 2);
    }

    #[test]
    fn test_entity_display() {
        assert_eq!(Entity::from_raw(7).to_string(), "Entity(7)");
    }

    #[test]
    fn test_entity_serialization_roundtrip() {
        let entity = Entity::from_raw(999);
        let json = serde_json::to_string(&entity).unwrap();
        let restored: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(entity, restored);
    }
}
