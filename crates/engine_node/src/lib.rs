//! # engine_node
//!
//! Nodes are the read-oriented views engines work with: per entity, a node
//! type bundles exactly the component capabilities one kind of engine logic
//! needs. One entity may be represented by several node types at once.
//!
//! This crate provides:
//!
//! - [`Node`]: the node type contract (identity, required capabilities, build).
//! - [`AnyNode`]: a type-erased node used for routing.
//! - [`NodeDescriptor`] / [`EntityDescriptor`]: registration-time declarations.
//! - [`NodesDb`]: composition and query authority mapping entities to nodes.

pub mod db;
pub mod descriptor;
pub mod error;
pub mod node;

pub use db::{NodeIter, NodesDb};
pub use descriptor::{EntityDescriptor, NodeDescriptor};
pub use error::NodeError;
pub use node::{AnyNode, Node, NodeTypeId};
