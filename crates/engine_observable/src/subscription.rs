//! Subscriber bookkeeping shared by both channel flavours.

use std::cell::Cell;
use std::rc::Rc;

/// Maximum nesting of dispatches on a single channel.
pub const MAX_DISPATCH_DEPTH: u32 = 32;

/// Handle returned by `subscribe`, used to unsubscribe later.
///
/// IDs are unique per channel and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Ordered multicast list of callbacks of type `F`.
pub(crate) struct SubscriberList<F: ?Sized> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Rc<F>)>,
}

impl<F: ?Sized> SubscriberList<F> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, callback: Rc<F>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    /// Returns `true` if the subscription was present.
    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        match self.entries.iter().position(|(existing, _)| *existing == id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Callbacks in subscription order, detached from the list.
    pub(crate) fn snapshot(&self) -> Vec<Rc<F>> {
        self.entries.iter().map(|(_, cb)| Rc::clone(cb)).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Tracks how deeply a channel is nested inside its own dispatch.
#[derive(Debug, Default)]
pub(crate) struct DispatchDepth(Cell<u32>);

impl DispatchDepth {
    /// Enter a dispatch.
    ///
    /// # Panics
    ///
    /// Panics when nesting exceeds [`MAX_DISPATCH_DEPTH`].
    pub(crate) fn enter(&self, channel: &'static str) -> DepthGuard<'_> {
        let depth = self.0.get() + 1;
        assert!(
            depth <= MAX_DISPATCH_DEPTH,
            "{channel} re-entered {depth} times while dispatching; subscriber feedback loop"
        );
        self.0.set(depth);
        DepthGuard(&self.0)
    }

    pub(crate) fn current(&self) -> u32 {
        self.0.get()
    }
}

pub(crate) struct DepthGuard<'a>(&'a Cell<u32>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}
