//! Node-layer error types.

use engine_component::Entity;

/// Errors raised while composing, storing, or removing nodes.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// A node type listed in an entity descriptor needs a capability the
    /// supplied component set lacks.
    #[error("{entity}: node `{node}` requires component `{component}` which was not supplied")]
    MissingComponent {
        /// The entity being composed.
        entity: Entity,
        /// The node type that could not be built.
        node: &'static str,
        /// The missing capability.
        component: &'static str,
    },

    /// Every required capability was present but the node's `build` still
    /// returned nothing (a mis-keyed component handle or an inconsistent
    /// node declaration).
    #[error("{entity}: node `{node}` could not be built from a satisfying component set")]
    BuildFailed {
        /// The entity being composed.
        entity: Entity,
        /// The node type whose build failed.
        node: &'static str,
    },

    /// The entity already has nodes registered.
    #[error("{0} is already registered")]
    EntityExists(Entity),

    /// The entity has no nodes registered.
    #[error("{0} is not registered")]
    NotFound(Entity),

    /// The invalid sentinel was used as an entity.
    #[error("the invalid entity cannot hold nodes")]
    InvalidEntity,
}
