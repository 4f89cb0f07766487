//! # engine_component
//!
//! The "C" of the runtime: what an entity is, what a component capability is,
//! and how an external factory hands a bag of capabilities to the registry.
//!
//! This crate provides:
//!
//! - [`Entity`]: lightweight `u64` entity identifiers.
//! - [`EntityAllocator`]: ID allocator with reuse after teardown.
//! - [`Component`]: marker supertrait for component capability traits.
//! - [`ComponentTypeId`] / [`ComponentMeta`]: stable capability identity.
//! - [`ComponentSet`]: the per-entity set of capability handles.

pub mod component;
pub mod entity;
pub mod error;
pub mod set;

pub use component::{Component, ComponentMeta, ComponentRef, ComponentTypeId};
pub use entity::{Entity, EntityAllocator};
pub use error::ComponentError;
pub use set::ComponentSet;
