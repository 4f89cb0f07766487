//! Type-indexed node routing.
//!
//! [`NodeRoutes`] maps each accepted node type to a pair of typed handlers on
//! the engine, so an engine's `add`/`remove` is a table lookup rather than a
//! chain of downcast attempts. The same table doubles as the engine's
//! accepted-node declaration.

use std::collections::HashMap;

use engine_node::{AnyNode, Node, NodeDescriptor, NodeTypeId};

type Handler<E> = Box<dyn Fn(&mut E, &AnyNode)>;

struct Route<E> {
    descriptor: NodeDescriptor,
    add: Handler<E>,
    remove: Handler<E>,
}

/// Add/remove handlers of engine `E`, keyed by node type.
///
/// Keep it in an `Rc` inside the engine and clone the `Rc` before
/// dispatching, so the table and `&mut self` are not borrowed together:
///
/// ```rust,ignore
/// fn add(&mut self, node: &AnyNode) {
///     let routes = Rc::clone(&self.routes);
///     routes.add(self, node);
/// }
/// ```
pub struct NodeRoutes<E> {
    engine: &'static str,
    order: Vec<NodeTypeId>,
    routes: HashMap<NodeTypeId, Route<E>>,
}

impl<E: 'static> NodeRoutes<E> {
    /// Create an empty table for the engine called `engine`.
    #[must_use]
    pub fn new(engine: &'static str) -> Self {
        Self {
            engine,
            order: Vec::new(),
            routes: HashMap::new(),
        }
    }

    /// Route node type `N` to the given handlers. A second route for the
    /// same type replaces the first.
    #[must_use]
    pub fn route<N: Node>(mut self, add: fn(&mut E, &N), remove: fn(&mut E, &N)) -> Self {
        let type_id = N::node_type_id();
        let route = Route {
            descriptor: NodeDescriptor::of::<N>(),
            add: Self::typed(self.engine, add),
            remove: Self::typed(self.engine, remove),
        };
        if self.routes.insert(type_id, route).is_none() {
            self.order.push(type_id);
        }
        self
    }

    fn typed<N: Node>(engine: &'static str, handler: fn(&mut E, &N)) -> Handler<E> {
        Box::new(move |target: &mut E, node: &AnyNode| match node.downcast_ref::<N>() {
            Some(typed) => handler(target, typed),
            None => panic!(
                "engine `{engine}` routed `{}` to the `{}` handler",
                node.type_name(),
                N::type_name()
            ),
        })
    }

    /// The accepted node types, in routing order.
    #[must_use]
    pub fn accepted(&self) -> Vec<NodeDescriptor> {
        self.order
            .iter()
            .filter_map(|id| self.routes.get(id))
            .map(|route| route.descriptor.clone())
            .collect()
    }

    /// Returns `true` if node type `type_id` has a route.
    #[must_use]
    pub fn accepts(&self, type_id: NodeTypeId) -> bool {
        self.routes.contains_key(&type_id)
    }

    /// Dispatch an added node to its handler.
    ///
    /// # Panics
    ///
    /// Panics if the node's type has no route: the engine never declared it.
    pub fn add(&self, engine: &mut E, node: &AnyNode) {
        (self.lookup(node, "add").add)(engine, node);
    }

    /// Dispatch a removed node to its handler.
    ///
    /// # Panics
    ///
    /// Panics if the node's type has no route: the engine never declared it.
    pub fn remove(&self, engine: &mut E, node: &AnyNode) {
        (self.lookup(node, "remove").remove)(engine, node);
    }

    fn lookup(&self, node: &AnyNode, phase: &str) -> &Route<E> {
        match self.routes.get(&node.node_type()) {
            Some(route) => route,
            None => panic!(
                "engine `{}` received {phase} for undeclared node type `{}` ({})",
                self.engine,
                node.type_name(),
                node.entity()
            ),
        }
    }
}

impl<E> std::fmt::Debug for NodeRoutes<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRoutes")
            .field("engine", &self.engine)
            .field(
                "accepted",
                &self
                    .order
                    .iter()
                    .filter_map(|id| self.routes.get(id))
                    .map(|route| route.descriptor.name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
