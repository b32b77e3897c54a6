//! Change notification without a payload.
//!
//! A [`Signal`] is a handle to a shared subscriber list. Each callback is
//! handed a shared reference to the emitting source, so it can read the new
//! state (e.g. `RecipeRepository::get_all`) while being notified.
//!
//! `emit` snapshots the subscriber list before invoking anyone: removals made
//! during dispatch cannot disturb the running emission, and subscribers added
//! during dispatch are first notified by the next one.
//!
//! Callbacks that need to unsubscribe should capture a [`WeakSignal`] from
//! [`Signal::downgrade`] rather than a `Signal` clone; a strong clone inside a
//! callback keeps the subscriber list alive forever.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::repository::RecipeRepository;

/// Token returned by [`Signal::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Rc<dyn Fn(&T)>;

struct Subscribers<T: ?Sized> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(SubscriptionId, Callback<T>)>>,
}

impl<T: ?Sized> Subscribers<T> {
    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }
}

pub struct Signal<T: ?Sized> {
    subscribers: Rc<Subscribers<T>>,
}

/// Signal emitted by a [`RecipeRepository`] after it changed
pub type ChangedSignal = Signal<RecipeRepository>;

impl<T: ?Sized> Signal<T> {
    pub fn new() -> Self {
        Signal {
            subscribers: Rc::new(Subscribers {
                next_id: Cell::new(0),
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.subscribers.next_id.get());
        self.subscribers.next_id.set(id.0 + 1);
        self.subscribers
            .entries
            .borrow_mut()
            .push((id, Rc::new(callback)));
        id
    }

    /// Remove a subscriber; returns false if it was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.entries.borrow().len()
    }

    /// Handle that does not keep the subscriber list alive
    pub fn downgrade(&self) -> WeakSignal<T> {
        WeakSignal {
            subscribers: Rc::downgrade(&self.subscribers),
        }
    }

    /// Notify every current subscriber once, in subscription order
    pub fn emit(&self, source: &T) {
        let snapshot: Vec<Callback<T>> = self
            .subscribers
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in snapshot {
            callback(source);
        }
    }
}

impl<T: ?Sized> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Signal {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<T: ?Sized> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Non-owning handle to a [`Signal`]'s subscriber list
pub struct WeakSignal<T: ?Sized> {
    subscribers: Weak<Subscribers<T>>,
}

impl<T: ?Sized> WeakSignal<T> {
    pub fn upgrade(&self) -> Option<Signal<T>> {
        self.subscribers
            .upgrade()
            .map(|subscribers| Signal { subscribers })
    }

    /// Remove a subscriber; returns false if it was not subscribed or the
    /// signal is gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers
            .upgrade()
            .is_some_and(|subscribers| subscribers.unsubscribe(id))
    }
}

impl<T: ?Sized> Clone for WeakSignal<T> {
    fn clone(&self) -> Self {
        WeakSignal {
            subscribers: Weak::clone(&self.subscribers),
        }
    }
}

impl<T: ?Sized> fmt::Debug for WeakSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSignal")
            .field("alive", &(self.subscribers.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestSignal = Signal<u32>;

    #[test]
    fn test_emit_without_subscribers() {
        TestSignal::new().emit(&0);
    }

    #[test]
    fn test_emit_notifies_each_subscriber_once_with_source() {
        let signal = TestSignal::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for _ in 0..3 {
            let seen = Rc::clone(&seen);
            signal.subscribe(move |value| seen.borrow_mut().push(*value));
        }
        signal.emit(&7);

        assert_eq!(*seen.borrow(), vec![7, 7, 7]);
    }

    #[test]
    fn test_unsubscribe() {
        let signal = TestSignal::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let id = signal.subscribe(move |_| counter.set(counter.get() + 1));

        assert!(signal.unsubscribe(id));
        assert!(!signal.unsubscribe(id));
        signal.emit(&0);

        assert_eq!(calls.get(), 0);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_uses_snapshot() {
        let signal = TestSignal::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let second_id = Rc::new(Cell::new(None));

        {
            let handle = signal.downgrade();
            let order = Rc::clone(&order);
            let second_id = Rc::clone(&second_id);
            signal.subscribe(move |_| {
                order.borrow_mut().push("first");
                if let Some(id) = second_id.get() {
                    handle.unsubscribe(id);
                }
            });
        }
        {
            let order = Rc::clone(&order);
            second_id.set(Some(
                signal.subscribe(move |_| order.borrow_mut().push("second")),
            ));
        }

        signal.emit(&0);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
        assert_eq!(signal.subscriber_count(), 1);

        signal.emit(&0);
        assert_eq!(*order.borrow(), vec!["first", "second", "first"]);
    }

    #[test]
    fn test_self_unsubscribe_during_dispatch() {
        let signal = TestSignal::new();
        let calls = Rc::new(Cell::new(0));
        let own_id = Rc::new(Cell::new(None));

        let handle = signal.downgrade();
        let counter = Rc::clone(&calls);
        let id_slot = Rc::clone(&own_id);
        let id = signal.subscribe(move |_| {
            counter.set(counter.get() + 1);
            if let Some(id) = id_slot.get() {
                handle.unsubscribe(id);
            }
        });
        own_id.set(Some(id));

        signal.emit(&0);
        signal.emit(&0);

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_subscribe_during_dispatch_waits_for_next_emit() {
        let signal = TestSignal::new();
        let late_calls = Rc::new(Cell::new(0));

        let handle = signal.downgrade();
        let late = Rc::clone(&late_calls);
        let added = Cell::new(false);
        signal.subscribe(move |_| {
            if let (false, Some(signal)) = (added.get(), handle.upgrade()) {
                added.set(true);
                let late = Rc::clone(&late);
                signal.subscribe(move |_| late.set(late.get() + 1));
            }
        });

        signal.emit(&0);
        assert_eq!(late_calls.get(), 0);

        signal.emit(&0);
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn test_weak_handle_does_not_keep_subscribers_alive() {
        let marker = Rc::new(());
        let signal = TestSignal::new();

        let handle = signal.downgrade();
        let captured = Rc::clone(&marker);
        signal.subscribe(move |_| {
            let _ = (&captured, &handle);
        });
        assert_eq!(Rc::strong_count(&marker), 2);

        let weak = signal.downgrade();
        drop(signal);

        assert_eq!(Rc::strong_count(&marker), 1);
        assert!(!weak.unsubscribe(SubscriptionId(0)));
    }
}
