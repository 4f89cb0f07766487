//! # engine_runtime
//!
//! Where engines live. The runtime owns the registered engines, routes node
//! add/remove notifications to them, builds and tears down entities, and
//! drives the per-frame tick.
//!
//! ## Frame lifecycle
//!
//! 1. The host samples input and elapsed time.
//! 2. [`EnginesRoot::tick`] publishes them through [`FrameSignals`] and ticks
//!    every tickable engine once, in registration order.
//! 3. Engines read and write node data and fire dispatchers; subscribed
//!    engines react synchronously.
//! 4. Entity removals requested through [`EntityCommands`] during the frame
//!    are flushed: `remove` notifications, then node teardown.
//!
//! Everything runs on one thread; nothing here is `Send`.

pub mod commands;
pub mod engine;
pub mod error;
pub mod registry;
pub mod root;
pub mod routes;
pub mod scheduler;
pub mod signals;
pub mod tick;

pub use commands::EntityCommands;
pub use engine::{Engine, Tickable};
pub use error::RuntimeError;
pub use registry::EngineRegistry;
pub use root::EnginesRoot;
pub use routes::NodeRoutes;
pub use scheduler::Scheduler;
pub use signals::{FrameInput, FrameSignals};
pub use tick::{TickConfig, TickLoop};
