//! # engine_observable
//!
//! Typed publish/subscribe channels that let engines talk to each other
//! without holding references to one another.
//!
//! - [`DispatcherOnSet`]: a value keyed by its owning entity; every write
//!   notifies subscribers with `(entity, &value)`, changed or not.
//! - [`EventBus`]: an unkeyed channel carrying a payload by `&mut`, so
//!   subscribers can amend it in place.
//!
//! Both are cheap handles: cloning one yields another handle to the same
//! channel. Both are single-threaded (`Rc`-based) and dispatch
//! synchronously.
//!
//! ## Reentrancy
//!
//! Dispatch calls arbitrary subscriber code before it returns. The subscriber
//! list is snapshotted first and no borrow is held while subscribers run, so
//! a subscriber may subscribe, unsubscribe, write other channels, or write
//! the same channel again. Subscribers added or removed during a dispatch
//! take effect from the next dispatch. Nesting deeper than
//! [`MAX_DISPATCH_DEPTH`] on one channel panics: it is a feedback loop, not
//! a recoverable state. Entity destruction must never run inside a dispatch;
//! queue it and flush at the end of the frame.

mod dispatcher;
mod event_bus;
mod subscription;

pub use dispatcher::DispatcherOnSet;
pub use event_bus::EventBus;
pub use subscription::{MAX_DISPATCH_DEPTH, SubscriptionId};
