//! Value dispatcher: a field whose every write is broadcast.

use std::cell::RefCell;
use std::rc::Rc;

use engine_component::Entity;
use tracing::trace;

use crate::subscription::{DispatchDepth, SubscriberList, SubscriptionId};

type Callback<T> = dyn Fn(Entity, &T);

struct Inner<T> {
    sender: Entity,
    value: RefCell<T>,
    subscribers: RefCell<SubscriberList<Callback<T>>>,
    depth: DispatchDepth,
}

/// A value plus an id-keyed multicast subscriber list.
///
/// The dispatcher is keyed by the entity that owns it. Writing the value with
/// [`set_value`](Self::set_value) invokes every current subscriber with
/// `(sender, &new_value)`, **even if the value did not change**: a write is a
/// signal, not a change notification.
///
/// Cloning yields another handle to the same dispatcher.
pub struct DispatcherOnSet<T> {
    inner: Rc<Inner<T>>,
}

impl<T: Clone + 'static> DispatcherOnSet<T> {
    /// Create a dispatcher owned by `sender` with an initial value.
    ///
    /// Construction does not notify anyone.
    #[must_use]
    pub fn new(sender: Entity, initial: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                sender,
                value: RefCell::new(initial),
                subscribers: RefCell::new(SubscriberList::new()),
                depth: DispatchDepth::default(),
            }),
        }
    }

    /// Returns the entity that owns this dispatcher.
    #[must_use]
    pub fn sender(&self) -> Entity {
        self.inner.sender
    }

    /// Returns a copy of the current value.
    #[must_use]
    pub fn value(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Write the value and notify every subscriber, in subscription order.
    ///
    /// # Panics
    ///
    /// Panics if subscribers re-enter this dispatcher more than
    /// [`MAX_DISPATCH_DEPTH`](crate::MAX_DISPATCH_DEPTH) times.
    pub fn set_value(&self, value: T) {
        *self.inner.value.borrow_mut() = value.clone();

        let subscribers = self.inner.subscribers.borrow().snapshot();
        let _guard = self.inner.depth.enter("DispatcherOnSet");
        trace!(
            sender = self.inner.sender.id(),
            subscribers = subscribers.len(),
            depth = self.inner.depth.current(),
            "dispatching value write"
        );
        for subscriber in subscribers {
            subscriber(self.inner.sender, &value);
        }
    }

    /// Register a subscriber. It is called on every later write.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Entity, &T) + 'static,
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

    /// Returns `true` if both handles refer to the same dispatcher.
    #[must_use]
    pub fn same_channel(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for DispatcherOnSet<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for DispatcherOnSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("DispatcherOnSet");
        s.field("sender", &self.inner.sender);
        match self.inner.value.try_borrow() {
            Ok(value) => s.field("value", &*value),
            Err(_) => s.field("value", &"<borrowed>"),
        };
        s.field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}
