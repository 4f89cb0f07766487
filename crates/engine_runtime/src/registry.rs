//! Engine registry: tracks registered engines and which node types each
//! one accepts.
//!
//! Engines are kept in registration order; that order is the tick order and
//! the fan-out order for node notifications.

use std::collections::HashMap;

use engine_node::{AnyNode, NodeDescriptor, NodeTypeId};
use tracing::debug;

use crate::engine::Engine;
use crate::error::RuntimeError;

/// Information about a registered engine.
#[derive(Debug, Clone)]
pub struct EngineInfo {
    /// The engine's name.
    pub name: &'static str,
    /// The node types it accepts, as declared at registration.
    pub accepted: Vec<NodeDescriptor>,
    /// Whether the engine ticks.
    pub tickable: bool,
}

/// Registry of all engines known to the composition root.
#[derive(Default)]
pub struct EngineRegistry {
    /// Engines in registration order.
    engines: Vec<Box<dyn Engine>>,
    /// Metadata parallel to `engines`.
    infos: Vec<EngineInfo>,
    /// Node type → indices of accepting engines, ascending.
    routing: HashMap<NodeTypeId, Vec<usize>>,
}

impl EngineRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine, returning its index.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DuplicateEngine`] if an engine with the same name is
    /// already registered.
    pub fn register(&mut self, mut engine: Box<dyn Engine>) -> Result<usize, RuntimeError> {
        let name = engine.name();
        if self.infos.iter().any(|info| info.name == name) {
            return Err(RuntimeError::DuplicateEngine(name));
        }

        let mut accepted: Vec<NodeDescriptor> = Vec::new();
        for descriptor in engine.accepted_nodes() {
            if !accepted.iter().any(|d| d.type_id() == descriptor.type_id()) {
                accepted.push(descriptor);
            }
        }

        let index = self.engines.len();
        for descriptor in &accepted {
            self.routing
                .entry(descriptor.type_id())
                .or_default()
                .push(index);
        }

        let tickable = engine.as_tickable().is_some();
        debug!(
            engine = name,
            accepted = accepted.len(),
            tickable,
            "registered engine"
        );
        self.infos.push(EngineInfo {
            name,
            accepted,
            tickable,
        });
        self.engines.push(engine);
        Ok(index)
    }

    /// Hand `node` to every engine accepting its type, in registration order.
    ///
    /// Returns the number of engines notified.
    pub fn notify_add(&mut self, node: &AnyNode) -> usize {
        let Some(indices) = self.routing.get(&node.node_type()) else {
            return 0;
        };
        for &index in indices {
            debug!(
                engine = self.infos[index].name,
                node = node.type_name(),
                entity = node.entity().id(),
                "add"
            );
            self.engines[index].add(node);
        }
        indices.len()
    }

    /// Tell every engine accepting `node`'s type that it is going away, in
    /// registration order.
    ///
    /// Returns the number of engines notified.
    pub fn notify_remove(&mut self, node: &AnyNode) -> usize {
        let Some(indices) = self.routing.get(&node.node_type()) else {
            return 0;
        };
        for &index in indices {
            debug!(
                engine = self.infos[index].name,
                node = node.type_name(),
                entity = node.entity().id(),
                "remove"
            );
            self.engines[index].remove(node);
        }
        indices.len()
    }

    /// Hand `node` to one engine, used to catch a late-registered engine up
    /// with existing nodes.
    ///
    /// # Panics
    ///
    /// Panics if the engine does not accept the node's type.
    pub fn notify_add_to(&mut self, index: usize, node: &AnyNode) {
        let accepts = self.infos[index]
            .accepted
            .iter()
            .any(|d| d.type_id() == node.node_type());
        assert!(
            accepts,
            "engine `{}` does not accept `{}`",
            self.infos[index].name,
            node.type_name()
        );
        self.engines[index].add(node);
    }

    /// Registered engines, mutably, in registration order.
    pub fn engines_mut(&mut self) -> &mut [Box<dyn Engine>] {
        &mut self.engines
    }

    /// Information about an engine by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EngineInfo> {
        self.infos.iter().find(|info| info.name == name)
    }

    /// Information about an engine by index.
    #[must_use]
    pub fn info(&self, index: usize) -> Option<&EngineInfo> {
        self.infos.get(index)
    }

    /// Returns an iterator over all registered engines' information.
    pub fn iter(&self) -> impl Iterator<Item = &EngineInfo> {
        self.infos.iter()
    }

    /// Names of the engines accepting a node type, in registration order.
    #[must_use]
    pub fn interested_in(&self, type_id: NodeTypeId) -> Vec<&'static str> {
        self.routing
            .get(&type_id)
            .map(|indices| indices.iter().map(|&i| self.infos[i].name).collect())
            .unwrap_or_default()
    }

    /// Returns the number of registered engines.
    #[must_use]
    pub fn engine_count(&self) -> usize {
        self.engines.len()
    }

    /// Returns the number of registered engines that tick.
    #[must_use]
    pub fn tickable_count(&self) -> usize {
        self.infos.iter().filter(|info| info.tickable).count()
    }
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.infos)
            .finish()
    }
}
