//! The engine contract.
//!
//! An engine is the only place application behaviour lives. It is polymorphic
//! over three capabilities: declaring the node types it accepts, reacting to
//! those nodes being added and removed, and optionally ticking every frame.

use engine_node::{AnyNode, NodeDescriptor};

/// A unit of logic operating over node types.
///
/// The composition root calls [`add`](Engine::add) and
/// [`remove`](Engine::remove) only with node types listed by
/// [`accepted_nodes`](Engine::accepted_nodes). Across different node types,
/// for the same or different entities, no ordering is guaranteed.
///
/// An engine that subscribes to a node's dispatchers in `add` must
/// unsubscribe in the matching `remove`; a subscription outliving `remove`
/// fires against a destroyed entity.
pub trait Engine {
    /// A unique, human-readable engine name.
    fn name(&self) -> &'static str;

    /// The closed set of node types this engine accepts. Queried once, at
    /// registration.
    fn accepted_nodes(&self) -> Vec<NodeDescriptor> {
        Vec::new()
    }

    /// A node of an accepted type was composed.
    ///
    /// The default implementation accepts nothing and treats any call as a
    /// contract violation.
    fn add(&mut self, node: &AnyNode) {
        panic!(
            "engine `{}` accepts no nodes but was handed `{}` for {}",
            self.name(),
            node.type_name(),
            node.entity()
        );
    }

    /// A node of an accepted type is about to be torn down. It is still
    /// queryable during this call.
    fn remove(&mut self, node: &AnyNode) {
        panic!(
            "engine `{}` accepts no nodes but was asked to remove `{}` for {}",
            self.name(),
            node.type_name(),
            node.entity()
        );
    }

    /// Returns the engine's per-frame behaviour, if it has one.
    fn as_tickable(&mut self) -> Option<&mut dyn Tickable> {
        None
    }
}

/// Per-frame behaviour.
pub trait Tickable {
    /// Advance by `delta` seconds.
    ///
    /// `delta` may be zero or arbitrarily large (frame hitches); accumulate it
    /// against thresholds rather than assuming a fixed frame rate.
    ///
    /// # Errors
    ///
    /// Any error aborts the remainder of the frame and is returned to the
    /// host; the scheduler does not suppress it.
    fn tick(&mut self, delta: f32) -> anyhow::Result<()>;
}
