//! Runtime error types.

use engine_component::Entity;
use engine_node::NodeError;

/// Errors raised by the composition root.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Node composition or storage failed.
    #[error(transparent)]
    Node(#[from] NodeError),

    /// Two engines registered under the same name.
    #[error("an engine named `{0}` is already registered")]
    DuplicateEngine(&'static str),

    /// The entity was never reserved or has already been released.
    #[error("{0} was not reserved by this root")]
    UnknownEntity(Entity),

    /// The tick loop was configured with a rate that cannot produce a frame.
    #[error("tick rate must be positive and finite, got {0}")]
    InvalidTickRate(f64),
}
