//! Core [`Node`] trait and its type-erased form.

use std::any::Any;
use std::rc::Rc;

use engine_component::component::fnv1a_64;
use engine_component::{ComponentMeta, ComponentSet, Entity};

/// A unique identifier for a node type, derived from the node's
/// [`Node::type_name`] with FNV-1a 64-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeTypeId(pub u64);

impl NodeTypeId {
    /// Compute a [`NodeTypeId`] from a node type name.
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        Self(fnv1a_64(name))
    }

    /// Compute the [`NodeTypeId`] for node type `N`.
    #[must_use]
    pub fn of<N: Node>() -> Self {
        Self::from_name(N::type_name())
    }
}

/// The node type contract.
///
/// A node is an immutable-shape aggregate of component handles for one
/// entity. It declares the exact capabilities it requires; an entity is
/// represented by the node type if and only if it supplies all of them.
///
/// `build` must return `Some` exactly when every capability listed in
/// `required_components` is present. Writing it with `?` on
/// [`ComponentSet::get`] for each field keeps the two in step.
///
/// # Examples
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use engine_component::{Component, ComponentMeta, ComponentRef, ComponentSet, Entity};
/// use engine_node::Node;
///
/// trait HealthComponent: Component {
///     fn current_health(&self) -> i32;
/// }
///
/// #[derive(Clone)]
/// struct HealthNode {
///     entity: Entity,
///     health: ComponentRef<dyn HealthComponent>,
/// }
///
/// impl Node for HealthNode {
///     fn type_name() -> &'static str {
///         "HealthNode"
///     }
///
///     fn required_components() -> Vec<ComponentMeta> {
///         vec![ComponentMeta::of::<dyn HealthComponent>()]
///     }
///
///     fn build(entity: Entity, components: &ComponentSet) -> Option<Self> {
///         Some(Self {
///             entity,
///             health: components.get()?,
///         })
///     }
///
///     fn entity(&self) -> Entity {
///         self.entity
///     }
/// }
///
/// assert!(HealthNode::build(Entity::from_raw(1), &ComponentSet::new()).is_none());
/// ```
pub trait Node: Clone + 'static {
    /// A stable, human-readable name for this node type.
    fn type_name() -> &'static str;

    /// The capabilities an entity must supply to be represented by this node.
    fn required_components() -> Vec<ComponentMeta>;

    /// Build the node for `entity`, or `None` if a capability is missing.
    fn build(entity: Entity, components: &ComponentSet) -> Option<Self>;

    /// The entity this node belongs to.
    fn entity(&self) -> Entity;

    /// Returns the [`NodeTypeId`] for this node type.
    fn node_type_id() -> NodeTypeId {
        NodeTypeId::of::<Self>()
    }
}

/// A type-erased node, tagged with its entity and node type.
///
/// Cloning is cheap and shares the underlying node.
#[derive(Clone)]
pub struct AnyNode {
    entity: Entity,
    type_id: NodeTypeId,
    type_name: &'static str,
    node: Rc<dyn Any>,
}

impl AnyNode {
    /// Erase a typed node.
    #[must_use]
    pub fn new<N: Node>(node: N) -> Self {
        Self {
            entity: node.entity(),
            type_id: N::node_type_id(),
            type_name: N::type_name(),
            node: Rc::new(node),
        }
    }

    /// The entity the node belongs to.
    #[must_use]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// The node's type identity.
    #[must_use]
    pub fn node_type(&self) -> NodeTypeId {
        self.type_id
    }

    /// The node's type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the node is of type `N`.
    #[must_use]
    pub fn is<N: Node>(&self) -> bool {
        self.node.is::<N>()
    }

    /// Borrow the node as `N`, or `None` if it is another type.
    #[must_use]
    pub fn downcast_ref<N: Node>(&self) -> Option<&N> {
        self.node.downcast_ref::<N>()
    }
}

impl std::fmt::Debug for AnyNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyNode")
            .field("entity", &self.entity)
            .field("type", &self.type_name)
            .finish()
    }
}
