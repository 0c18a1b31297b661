// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Signal: minimal synchronous observer lists.
//!
//! A [`Signal`] is an ordered list of `(callback, owning-context)` pairs with
//! synchronous emission. Arbor uses signals for two things: opt-in redraw
//! invalidation (a node's `updated` signal) and pointer-event delivery
//! (`click`, `mouse_over`, and friends). The type is deliberately small: it
//! is an observer list, not a reactive system.
//!
//! ## Emission semantics
//!
//! - Listeners run synchronously, in registration order, each receiving a
//!   shared reference to the payload.
//! - Emission **snapshots** the listener list first. A listener may add,
//!   remove, or clear listeners on the very signal that is emitting without
//!   corrupting iteration; additions are not seen until the next emission,
//!   and removals do not shorten the in-flight snapshot.
//! - A panicking listener propagates immediately, skipping the remaining
//!   listeners of that emission. There is no isolation layer; partial
//!   completion with silent swallowing would hide bugs in redraw logic.
//!
//! All methods take `&self`: the listener list lives behind interior
//! mutability so that a listener holding a handle to its own signal can
//! re-enter it safely.
//!
//! ## Contexts
//!
//! Every registration names an owning context `C` (any small `Copy + Eq`
//! key; Arbor's scene uses its node ids). Contexts exist for bulk removal:
//! when an owner is disposed, one [`Signal::remove_context`] call drops
//! every listener it registered.
//!
//! ```
//! use arbor_signal::Signal;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let clicks: Signal<u32, &'static str> = Signal::new();
//! let seen = Rc::new(Cell::new(0_u32));
//!
//! let seen2 = seen.clone();
//! clicks.add("counter", move |n| seen2.set(seen2.get() + n));
//!
//! clicks.emit(&3);
//! clicks.emit(&4);
//! assert_eq!(seen.get(), 7);
//!
//! clicks.remove_context("counter");
//! clicks.emit(&100);
//! assert_eq!(seen.get(), 7);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use smallvec::SmallVec;

/// Identifier for a single listener registration.
///
/// Returned from [`Signal::add`]; ids are unique within one signal for its
/// whole lifetime and are never reused, so a stale id passed to
/// [`Signal::remove`] is simply reported as not found.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

struct Entry<P, C> {
    id: ListenerId,
    context: C,
    callback: Rc<dyn Fn(&P)>,
}

/// An ordered observer list with synchronous, snapshot-based emission.
///
/// `P` is the payload handed to listeners; `C` is the owning-context key
/// used for bulk removal (see the crate docs).
pub struct Signal<P, C: Copy + PartialEq = ()> {
    entries: RefCell<Vec<Entry<P, C>>>,
    next_id: Cell<u64>,
}

impl<P, C: Copy + PartialEq> Signal<P, C> {
    /// Create an empty signal.
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Register a listener owned by `context`.
    ///
    /// Listeners are invoked in registration order. The returned
    /// [`ListenerId`] removes exactly this registration; the context removes
    /// every registration that named it.
    pub fn add(&self, context: C, callback: impl Fn(&P) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.entries.borrow_mut().push(Entry {
            id,
            context,
            callback: Rc::new(callback),
        });
        id
    }

    /// Remove a single registration. Returns whether it was present.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    /// Remove every registration owned by `context`, returning how many
    /// were dropped.
    pub fn remove_context(&self, context: C) -> usize {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.context != context);
        before - entries.len()
    }

    /// Invoke all currently-registered listeners with `payload`.
    ///
    /// The listener list is snapshotted before the first call, so listeners
    /// may mutate this signal freely; see the crate docs for the exact
    /// semantics.
    pub fn emit(&self, payload: &P) {
        // Clone the Rc handles out so the borrow is released before any
        // listener runs; a listener re-entering `add`/`remove` must not
        // observe the list as borrowed.
        let snapshot: SmallVec<[Rc<dyn Fn(&P)>; 4]> = self
            .entries
            .borrow()
            .iter()
            .map(|e| e.callback.clone())
            .collect();
        for callback in snapshot {
            callback(payload);
        }
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Number of current registrations.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether there are no registrations.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<P, C: Copy + PartialEq> Default for Signal<P, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, C: Copy + PartialEq> core::fmt::Debug for Signal<P, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::RefCell;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let signal: Signal<(), ()> = Signal::new();
        let seen = log();

        let s = seen.clone();
        signal.add((), move |()| s.borrow_mut().push("first"));
        let s = seen.clone();
        signal.add((), move |()| s.borrow_mut().push("second"));
        let s = seen.clone();
        signal.add((), move |()| s.borrow_mut().push("third"));

        signal.emit(&());
        assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn remove_by_id_only_drops_that_registration() {
        let signal: Signal<(), ()> = Signal::new();
        let seen = log();

        let s = seen.clone();
        let a = signal.add((), move |()| s.borrow_mut().push("a"));
        let s = seen.clone();
        signal.add((), move |()| s.borrow_mut().push("b"));

        assert!(signal.remove(a));
        assert!(!signal.remove(a), "ids are never reused");

        signal.emit(&());
        assert_eq!(*seen.borrow(), vec!["b"]);
    }

    #[test]
    fn remove_context_is_bulk() {
        let signal: Signal<(), u32> = Signal::new();
        let seen = log();

        let s = seen.clone();
        signal.add(1, move |()| s.borrow_mut().push("one/a"));
        let s = seen.clone();
        signal.add(2, move |()| s.borrow_mut().push("two"));
        let s = seen.clone();
        signal.add(1, move |()| s.borrow_mut().push("one/b"));

        assert_eq!(signal.remove_context(1), 2);
        assert_eq!(signal.remove_context(1), 0);

        signal.emit(&());
        assert_eq!(*seen.borrow(), vec!["two"]);
    }

    #[test]
    fn payload_is_passed_through() {
        let signal: Signal<u32, ()> = Signal::new();
        let total = Rc::new(Cell::new(0_u32));

        let t = total.clone();
        signal.add((), move |n| t.set(t.get() + *n));

        signal.emit(&5);
        signal.emit(&7);
        assert_eq!(total.get(), 12);
    }

    #[test]
    fn listener_added_during_emit_waits_for_next_emission() {
        let signal: Rc<Signal<(), ()>> = Rc::new(Signal::new());
        let seen = log();

        let sig = signal.clone();
        let s = seen.clone();
        signal.add((), move |()| {
            s.borrow_mut().push("outer");
            let inner_seen = s.clone();
            sig.add((), move |()| inner_seen.borrow_mut().push("inner"));
        });

        signal.emit(&());
        assert_eq!(*seen.borrow(), vec!["outer"], "snapshot excludes additions");

        seen.borrow_mut().clear();
        signal.clear();
        signal.emit(&());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn listener_removing_later_listener_does_not_break_snapshot() {
        let signal: Rc<Signal<(), u32>> = Rc::new(Signal::new());
        let seen = log();

        let sig = signal.clone();
        let s = seen.clone();
        signal.add(1, move |()| {
            s.borrow_mut().push("first");
            // Removing the second listener mid-emission must not corrupt the
            // in-flight iteration; the snapshot still runs it this time.
            sig.remove_context(2);
        });
        let s = seen.clone();
        signal.add(2, move |()| s.borrow_mut().push("second"));

        signal.emit(&());
        assert_eq!(*seen.borrow(), vec!["first", "second"]);

        seen.borrow_mut().clear();
        signal.emit(&());
        assert_eq!(*seen.borrow(), vec!["first"], "removal visible next time");
    }

    #[test]
    fn clear_drops_everything() {
        let signal: Signal<(), ()> = Signal::new();
        let seen = log();

        let s = seen.clone();
        signal.add((), move |()| s.borrow_mut().push("x"));
        assert_eq!(signal.len(), 1);

        signal.clear();
        assert!(signal.is_empty());

        signal.emit(&());
        assert!(seen.borrow().is_empty());
    }
}
