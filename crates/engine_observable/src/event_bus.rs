//! Payload-carrying event bus.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::subscription::{DispatchDepth, SubscriberList, SubscriptionId};

type Callback<T> = dyn Fn(&mut T);

struct Inner<T: ?Sized> {
    subscribers: RefCell<SubscriberList<Callback<T>>>,
    depth: DispatchDepth,
}

/// An unkeyed multicast channel carrying a structured payload.
///
/// [`dispatch`](Self::dispatch) hands the payload to each subscriber by
/// `&mut`, in subscription order, so subscribers can amend it in place and no
/// copies are made. Zero subscribers is a valid state; dispatching then does
/// nothing.
///
/// Cloning yields another handle to the same bus.
pub struct EventBus<T> {
    inner: Rc<Inner<T>>,
}

impl<T: 'static> EventBus<T> {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                subscribers: RefCell::new(SubscriberList::new()),
                depth: DispatchDepth::default(),
            }),
        }
    }

    /// Deliver `payload` to every current subscriber.
    ///
    /// # Panics
    ///
    /// Panics if subscribers re-enter this bus more than
    /// [`MAX_DISPATCH_DEPTH`](crate::MAX_DISPATCH_DEPTH) times.
    pub fn dispatch(&self, payload: &mut T) {
        let subscribers = self.inner.subscribers.borrow().snapshot();
        let _guard = self.inner.depth.enter("EventBus");
        trace!(
            payload = std::any::type_name::<T>(),
            subscribers = subscribers.len(),
            depth = self.inner.depth.current(),
            "dispatching event"
        );
        for subscriber in subscribers {
            subscriber(payload);
        }
    }

    /// Register a subscriber. It is called on every later dispatch.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&mut T) + 'static,
    {
        self.inner.subscribers.borrow_mut().add(Rc::new(callback))
    }

    /// Remove a subscriber.
    ///
    /// Returns `true` if it was subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.borrow_mut().remove(id)
    }

    /// Returns the number of current subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Returns `true` if both handles refer to the same bus.
    #[must_use]
    pub fn same_channel(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("payload", &std::any::type_name::<T>())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}
