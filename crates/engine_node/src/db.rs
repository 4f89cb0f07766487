//! The node registry.
//!
//! [`NodesDb`] holds, per entity, the node instances composed from that
//! entity's components and answers point and type-scoped queries. It is
//! shared by `Rc` between the composition root, which mutates it while
//! entities are built and torn down, and engines, which only query it.
//!
//! Queries hand out clones of nodes (a handful of `Rc`s each) and never hold
//! a borrow of the registry past their return, so they are safe to call from
//! inside dispatch callbacks.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;

use engine_component::{ComponentSet, Entity};
use tracing::{debug, trace};

use crate::descriptor::{EntityDescriptor, NodeDescriptor};
use crate::error::NodeError;
use crate::node::{AnyNode, Node, NodeTypeId};

/// Composition and query authority mapping entities to their nodes.
#[derive(Debug, Default)]
pub struct NodesDb {
    /// Registered node types, in registration order.
    descriptors: RefCell<Vec<NodeDescriptor>>,
    /// Nodes per entity, in composition order.
    by_entity: RefCell<HashMap<Entity, Vec<AnyNode>>>,
    /// Nodes per type, ordered by entity ID.
    by_type: RefCell<HashMap<NodeTypeId, BTreeMap<Entity, AnyNode>>>,
}

impl NodesDb {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node type so [`compose`](Self::compose) considers it.
    ///
    /// Returns `true` if the type was not registered before.
    pub fn register(&self, descriptor: NodeDescriptor) -> bool {
        let mut descriptors = self.descriptors.borrow_mut();
        if descriptors.iter().any(|d| d.type_id() == descriptor.type_id()) {
            return false;
        }
        debug!(
            node = descriptor.name(),
            required = descriptor.required().len(),
            "registered node type"
        );
        descriptors.push(descriptor);
        true
    }

    /// Register node type `N`.
    pub fn register_node<N: Node>(&self) -> bool {
        self.register(NodeDescriptor::of::<N>())
    }

    /// Returns `true` if the node type is registered.
    #[must_use]
    pub fn is_registered(&self, type_id: NodeTypeId) -> bool {
        self.descriptors
            .borrow()
            .iter()
            .any(|d| d.type_id() == type_id)
    }

    /// Returns the registered node types, in registration order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<NodeDescriptor> {
        self.descriptors.borrow().clone()
    }

    /// Build every registered node type the component set fully satisfies.
    ///
    /// Node types that are not satisfied are skipped; a partially satisfied
    /// type never yields a node. Nothing is stored.
    ///
    /// # Errors
    ///
    /// [`NodeError::BuildFailed`] if a satisfied node type still fails to
    /// build.
    pub fn compose(
        &self,
        entity: Entity,
        components: &ComponentSet,
    ) -> Result<Vec<AnyNode>, NodeError> {
        let descriptors = self.descriptors();
        let mut nodes = Vec::new();
        for descriptor in &descriptors {
            if !descriptor.is_satisfied_by(components) {
                trace!(entity = entity.id(), node = descriptor.name(), "node type not satisfied");
                continue;
            }
            nodes.push(Self::build_one(descriptor, entity, components)?);
        }
        debug!(entity = entity.id(), nodes = nodes.len(), "composed entity");
        Ok(nodes)
    }

    /// Build exactly the node types an entity descriptor lists.
    ///
    /// Listed types are registered as a side effect so later queries and
    /// [`compose`](Self::compose) calls know them. Nothing is stored.
    ///
    /// # Errors
    ///
    /// [`NodeError::MissingComponent`] naming the first listed node type and
    /// capability that the set fails to supply, or
    /// [`NodeError::BuildFailed`].
    pub fn compose_with(
        &self,
        entity: Entity,
        descriptor: &EntityDescriptor,
        components: &ComponentSet,
    ) -> Result<Vec<AnyNode>, NodeError> {
        let mut nodes = Vec::with_capacity(descriptor.nodes().len());
        for node in descriptor.nodes() {
            if let Some(missing) = components.first_missing(node.required()) {
                return Err(NodeError::MissingComponent {
                    entity,
                    node: node.name(),
                    component: missing.name,
                });
            }
            self.register(node.clone());
            nodes.push(Self::build_one(node, entity, components)?);
        }
        debug!(
            entity = entity.id(),
            descriptor = descriptor.name(),
            nodes = nodes.len(),
            "composed entity from descriptor"
        );
        Ok(nodes)
    }

    fn build_one(
        descriptor: &NodeDescriptor,
        entity: Entity,
        components: &ComponentSet,
    ) -> Result<AnyNode, NodeError> {
        descriptor
            .build(entity, components)
            .ok_or(NodeError::BuildFailed {
                entity,
                node: descriptor.name(),
            })
    }

    /// Store the composed nodes of a new entity.
    ///
    /// An entity with zero nodes is still recorded, so it can be removed
    /// later.
    ///
    /// # Errors
    ///
    /// [`NodeError::InvalidEntity`] for the sentinel and
    /// [`NodeError::EntityExists`] if the entity is already stored.
    pub fn insert(&self, entity: Entity, nodes: Vec<AnyNode>) -> Result<(), NodeError> {
        if !entity.is_valid() {
            return Err(NodeError::InvalidEntity);
        }
        let mut by_entity = self.by_entity.borrow_mut();
        if by_entity.contains_key(&entity) {
            return Err(NodeError::EntityExists(entity));
        }
        let mut by_type = self.by_type.borrow_mut();
        for node in &nodes {
            debug_assert_eq!(node.entity(), entity, "node stored under a foreign entity");
            by_type
                .entry(node.node_type())
                .or_default()
                .insert(entity, node.clone());
        }
        by_entity.insert(entity, nodes);
        Ok(())
    }

    /// Discard every node of an entity, returning them in composition order.
    ///
    /// # Errors
    ///
    /// [`NodeError::NotFound`] if the entity is not stored.
    pub fn remove(&self, entity: Entity) -> Result<Vec<AnyNode>, NodeError> {
        let nodes = self
            .by_entity
            .borrow_mut()
            .remove(&entity)
            .ok_or(NodeError::NotFound(entity))?;
        let mut by_type = self.by_type.borrow_mut();
        for node in &nodes {
            if let Some(of_type) = by_type.get_mut(&node.node_type()) {
                of_type.remove(&entity);
                if of_type.is_empty() {
                    by_type.remove(&node.node_type());
                }
            }
        }
        debug!(entity = entity.id(), nodes = nodes.len(), "discarded entity nodes");
        Ok(nodes)
    }

    /// Returns `true` if the entity is stored.
    #[must_use]
    pub fn contains_entity(&self, entity: Entity) -> bool {
        self.by_entity.borrow().contains_key(&entity)
    }

    /// Returns all nodes of an entity, in composition order (empty if the
    /// entity is unknown).
    #[must_use]
    pub fn nodes_of(&self, entity: Entity) -> Vec<AnyNode> {
        self.by_entity
            .borrow()
            .get(&entity)
            .cloned()
            .unwrap_or_default()
    }

    /// Probing lookup: the entity's node of type `N`, or `None`.
    ///
    /// Absence is ordinary (a probe hit an entity of another kind) and is
    /// never an error.
    #[must_use]
    pub fn try_query_node<N: Node>(&self, entity: Entity) -> Option<N> {
        self.by_type
            .borrow()
            .get(&N::node_type_id())
            .and_then(|of_type| of_type.get(&entity))
            .and_then(AnyNode::downcast_ref::<N>)
            .cloned()
    }

    /// Asserting lookup: the entity's node of type `N`.
    ///
    /// Use only where the node must exist, e.g. when reacting to that node's
    /// own signal.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no node of type `N`; that is a broken
    /// registry contract, not a recoverable state.
    #[must_use]
    pub fn query_node<N: Node>(&self, entity: Entity) -> N {
        match self.try_query_node::<N>(entity) {
            Some(node) => node,
            None => panic!("{entity} has no `{}` node", N::type_name()),
        }
    }

    /// Iteration over a snapshot of every node of type `N`, ordered by
    /// entity ID.
    ///
    /// The snapshot is taken now, so the registry stays free to change while
    /// the iterator is held; nodes added or removed later are not seen. Only
    /// the downcast to `N` is deferred. Clone it to restart.
    #[must_use]
    pub fn all_nodes<N: Node>(&self) -> NodeIter<N> {
        NodeIter {
            nodes: self.nodes_of_type(N::node_type_id()),
            pos: 0,
            _marker: PhantomData,
        }
    }

    /// Type-erased nodes of a type, ordered by entity ID.
    #[must_use]
    pub fn nodes_of_type(&self, type_id: NodeTypeId) -> Vec<AnyNode> {
        self.by_type
            .borrow()
            .get(&type_id)
            .map(|of_type| of_type.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of nodes of type `N`.
    #[must_use]
    pub fn node_count<N: Node>(&self) -> usize {
        self.by_type
            .borrow()
            .get(&N::node_type_id())
            .map_or(0, BTreeMap::len)
    }

    /// Number of stored entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.by_entity.borrow().len()
    }
}

/// Iterator over a snapshot of the nodes of one type; see
/// [`NodesDb::all_nodes`].
#[derive(Clone)]
pub struct NodeIter<N> {
    nodes: Vec<AnyNode>,
    pos: usize,
    _marker: PhantomData<fn() -> N>,
}

impl<N: Node> Iterator for NodeIter<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let node = self.nodes.get(self.pos)?;
        self.pos += 1;
        node.downcast_ref::<N>().cloned()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.nodes.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl<N: Node> ExactSizeIterator for NodeIter<N> {}
