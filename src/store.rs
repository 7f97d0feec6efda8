//! Transactional snapshot cell
//!
//! Holds one immutable value behind an `Rc`. Readers get the current
//! snapshot in O(1); writers apply a closure to a cloned draft which is then
//! published in one step. Single-threaded, like the frame loop that owns it.
//! A `mutate` issued while another draft is open is rejected, so two
//! mutations never interleave their drafts.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("mutate called while another draft is open")]
    Reentrant,
}

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener<T> = Rc<dyn Fn(&Rc<T>)>;

pub struct Store<T> {
    current: RefCell<Rc<T>>,
    drafting: Cell<bool>,
    version: Cell<u64>,
    next_subscription: Cell<u64>,
    listeners: RefCell<Vec<(Subscription, Listener<T>)>>,
}

impl<T: Clone> Store<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: RefCell::new(Rc::new(initial)),
            drafting: Cell::new(false),
            version: Cell::new(0),
            next_subscription: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Current snapshot
    pub fn read(&self) -> Rc<T> {
        self.current.borrow().clone()
    }

    /// Number of snapshots published so far
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    /// Apply `f` to a draft of the current snapshot and publish the result.
    ///
    /// Listeners run after the new snapshot is visible and may mutate again.
    pub fn mutate<F: FnOnce(&mut T)>(&self, f: F) -> Result<(), StoreError> {
        if self.drafting.replace(true) {
            return Err(StoreError::Reentrant);
        }
        let mut draft = T::clone(&self.read());
        f(&mut draft);
        let published = Rc::new(draft);
        *self.current.borrow_mut() = published.clone();
        self.version.set(self.version.get() + 1);
        self.drafting.set(false);

        // Snapshot the list so listeners can subscribe or unsubscribe
        let listeners: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&published);
        }
        Ok(())
    }

    /// Call `listener` with every newly published snapshot
    pub fn subscribe<F: Fn(&Rc<T>) + 'static>(&self, listener: F) -> Subscription {
        let id = Subscription(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Returns false if the subscription was already removed
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != subscription);
        listeners.len() != before
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("current", &self.current)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
