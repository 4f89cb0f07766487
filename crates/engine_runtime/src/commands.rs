//! Deferred entity commands.
//!
//! Engines run while the root is busy ticking them, so they cannot tear
//! entities down directly. They queue the request on an [`EntityCommands`]
//! handle and the root applies it once the frame ends.

use std::cell::RefCell;
use std::rc::Rc;

use engine_component::Entity;
use tracing::trace;

/// A cloneable handle onto the root's pending-removal queue.
#[derive(Clone, Default)]
pub struct EntityCommands {
    pending: Rc<RefCell<Vec<Entity>>>,
}

impl EntityCommands {
    /// Create a new empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request removal of `entity` at the end of the current frame.
    ///
    /// Returns `false` if the removal was already queued.
    pub fn remove(&self, entity: Entity) -> bool {
        let mut pending = self.pending.borrow_mut();
        if pending.contains(&entity) {
            return false;
        }
        trace!(entity = entity.id(), "queued removal");
        pending.push(entity);
        true
    }

    /// Returns `true` if `entity` is waiting to be removed.
    #[must_use]
    pub fn is_pending(&self, entity: Entity) -> bool {
        self.pending.borrow().contains(&entity)
    }

    /// Number of queued removals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Withdraw a queued removal of `entity`, returning `true` if one was
    /// pending.
    pub(crate) fn cancel(&self, entity: Entity) -> bool {
        let mut pending = self.pending.borrow_mut();
        let before = pending.len();
        pending.retain(|queued| *queued != entity);
        before != pending.len()
    }

    /// Drain the queue in request order.
    pub(crate) fn take(&self) -> Vec<Entity> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

impl std::fmt::Debug for EntityCommands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCommands")
            .field("pending", &*self.pending.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removal_is_deduplicated() {
        let commands = EntityCommands::new();
        let e = Entity::from_raw(3);
        assert!(commands.remove(e));
        assert!(!commands.remove(e));
        assert!(commands.is_pending(e));
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_clones_share_the_queue() {
        let commands = EntityCommands::new();
        let handle = commands.clone();
        handle.remove(Entity::from_raw(1));
        handle.remove(Entity::from_raw(2));

        assert_eq!(
            commands.take(),
            vec![Entity::from_raw(1), Entity::from_raw(2)]
        );
        assert!(handle.is_empty());
        assert!(!handle.is_pending(Entity::from_raw(1)));
    }

    #[test]
    fn test_cancel_withdraws_only_that_entity() {
        let commands = EntityCommands::new();
        commands.remove(Entity::from_raw(1));
        commands.remove(Entity::from_raw(2));

        assert!(commands.cancel(Entity::from_raw(1)));
        assert!(!commands.cancel(Entity::from_raw(1)));
        assert_eq!(commands.take(), vec![Entity::from_raw(2)]);
    }
}
