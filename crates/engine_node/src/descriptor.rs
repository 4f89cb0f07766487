//! Registration-time declarations for node types and entity shapes.

use engine_component::{ComponentMeta, ComponentSet, Entity};

use crate::node::{AnyNode, Node, NodeTypeId};

type BuildFn = fn(Entity, &ComponentSet) -> Option<AnyNode>;

fn build_erased<N: Node>(entity: Entity, components: &ComponentSet) -> Option<AnyNode> {
    N::build(entity, components).map(AnyNode::new)
}

/// Everything the registry needs to know about a node type without knowing
/// the type itself.
#[derive(Clone)]
pub struct NodeDescriptor {
    type_id: NodeTypeId,
    name: &'static str,
    required: Vec<ComponentMeta>,
    build: BuildFn,
}

impl NodeDescriptor {
    /// Describe node type `N`.
    #[must_use]
    pub fn of<N: Node>() -> Self {
        Self {
            type_id: N::node_type_id(),
            name: N::type_name(),
            required: N::required_components(),
            build: build_erased::<N>,
        }
    }

    /// The described node type's identity.
    #[must_use]
    pub fn type_id(&self) -> NodeTypeId {
        self.type_id
    }

    /// The described node type's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The capabilities the node type requires.
    #[must_use]
    pub fn required(&self) -> &[ComponentMeta] {
        &self.required
    }

    /// Returns `true` if `components` satisfies every requirement.
    #[must_use]
    pub fn is_satisfied_by(&self, components: &ComponentSet) -> bool {
        components.contains_all(&self.required)
    }

    /// Build the node for `entity`.
    #[must_use]
    pub fn build(&self, entity: Entity, components: &ComponentSet) -> Option<AnyNode> {
        (self.build)(entity, components)
    }
}

impl std::fmt::Debug for NodeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeDescriptor")
            .field("name", &self.name)
            .field(
                "required",
                &self.required.iter().map(|meta| meta.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The exact set of node types an entity of some kind must produce.
///
/// Building an entity against a descriptor is strict: every listed node type
/// must be satisfied by the supplied components.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    name: String,
    nodes: Vec<NodeDescriptor>,
}

impl EntityDescriptor {
    /// Create an empty descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    /// Add node type `N`. Adding the same type twice has no effect.
    #[must_use]
    pub fn with_node<N: Node>(mut self) -> Self {
        if !self.nodes.iter().any(|d| d.type_id() == N::node_type_id()) {
            self.nodes.push(NodeDescriptor::of::<N>());
        }
        self
    }

    /// The descriptor's name (used in logs).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The listed node types, in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.nodes
    }
}
