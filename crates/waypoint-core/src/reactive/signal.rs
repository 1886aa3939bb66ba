//! Signal - Observable State Holder
//!
//! `Signal<T>` holds a value and notifies its subscribers synchronously each
//! time the value is replaced.
//!
//! ## Key Features
//!
//! - **Whole-value replacement**: `set()` swaps in a new value. Readers holding
//!   a snapshot from [`Signal::snapshot`] keep a consistent previous value.
//! - **Synchronous notification**: Subscribers run before `set()` returns and
//!   always observe the value that was just written.
//! - **Re-entrancy**: A subscriber may call `set()` on the same signal. The
//!   nested write notifies every subscriber with the newer value and the outer
//!   notification pass stops, so no subscriber sees an older value after a
//!   newer one.
//! - **Lightweight**: `Signal<T>` is a handful of `Rc`s, cheap to clone and share.
//!
//! ## Example
//!
//! ```
//! use waypoint_core::Signal;
//!
//! let count = Signal::new(0);
//! let seen = Signal::new(Vec::new());
//!
//! let sink = seen.clone();
//! let _sub = count.subscribe(move |value: &i32| {
//!     let mut values = sink.get();
//!     values.push(*value);
//!     sink.set(values);
//! });
//!
//! count.set(42);
//! assert_eq!(count.get(), 42);
//! assert_eq!(seen.get(), vec![42]);
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;

extern crate alloc;
use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;

type Callback<T> = Rc<dyn Fn(&T)>;

struct Subscribers<T> {
	next_id: u64,
	entries: Vec<(u64, Callback<T>)>,
}

impl<T> Default for Subscribers<T> {
	fn default() -> Self {
		Self {
			next_id: 0,
			entries: Vec::new(),
		}
	}
}

/// An observable value with synchronous subscribers.
///
/// All clones of the same Signal share the same value and subscriber list.
pub struct Signal<T: 'static> {
	/// The current value. Replaced wholesale, never mutated in place.
	value: Rc<RefCell<Rc<T>>>,
	/// Incremented on every write; used to stop stale notification passes.
	version: Rc<Cell<u64>>,
	subscribers: Rc<RefCell<Subscribers<T>>>,
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			value: Rc::clone(&self.value),
			version: Rc::clone(&self.version),
			subscribers: Rc::clone(&self.subscribers),
		}
	}
}

impl<T: 'static> Signal<T> {
	/// Create a new Signal with the given initial value
	pub fn new(value: T) -> Self {
		Self {
			value: Rc::new(RefCell::new(Rc::new(value))),
			version: Rc::new(Cell::new(0)),
			subscribers: Rc::new(RefCell::new(Subscribers::default())),
		}
	}

	/// Get a clone of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		T::clone(&self.value.borrow())
	}

	/// Get a shared snapshot of the current value.
	///
	/// The snapshot is unaffected by later writes.
	pub fn snapshot(&self) -> Rc<T> {
		Rc::clone(&self.value.borrow())
	}

	/// Run `f` with a reference to the current value.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		let current = self.snapshot();
		f(&current)
	}

	/// Replace the value and notify all subscribers.
	pub fn set(&self, value: T) {
		let current = Rc::new(value);
		*self.value.borrow_mut() = Rc::clone(&current);
		let version = self.version.get().wrapping_add(1);
		self.version.set(version);
		self.notify(&current, version);
	}

	/// Replace the value only when it differs from the current one.
	///
	/// Returns whether a write (and notification) happened.
	pub fn set_if_changed(&self, value: T) -> bool
	where
		T: PartialEq,
	{
		if **self.value.borrow() == value {
			return false;
		}
		self.set(value);
		true
	}

	/// Register a subscriber invoked after every write.
	///
	/// The subscriber is removed when the returned [`Subscription`] is dropped.
	pub fn subscribe<F>(&self, callback: F) -> Subscription
	where
		F: Fn(&T) + 'static,
	{
		let id = {
			let mut subscribers = self.subscribers.borrow_mut();
			let id = subscribers.next_id;
			subscribers.next_id += 1;
			subscribers.entries.push((id, Rc::new(callback)));
			id
		};

		let weak: Weak<RefCell<Subscribers<T>>> = Rc::downgrade(&self.subscribers);
		Subscription {
			unsubscribe: Some(Box::new(move || {
				if let Some(subscribers) = weak.upgrade() {
					subscribers
						.borrow_mut()
						.entries
						.retain(|(entry_id, _)| *entry_id != id);
				}
			})),
		}
	}

	/// Number of live subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.subscribers.borrow().entries.len()
	}

	/// Whether both handles share the same value and subscribers.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.value, &other.value)
	}

	fn notify(&self, current: &Rc<T>, version: u64) {
		// Callbacks are cloned out so they may subscribe, unsubscribe or write.
		let callbacks: Vec<Callback<T>> = self
			.subscribers
			.borrow()
			.entries
			.iter()
			.map(|(_, callback)| Rc::clone(callback))
			.collect();

		for callback in callbacks {
			if self.version.get() != version {
				// A subscriber wrote a newer value, which has already been delivered.
				return;
			}
			callback(current);
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("value", &self.snapshot())
			.field("subscribers", &self.subscriber_count())
			.finish()
	}
}

/// Handle returned by [`Signal::subscribe`].
///
/// Dropping the handle removes the subscriber.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
	unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	/// Keep the subscriber alive for the lifetime of the signal.
	pub fn forget(mut self) {
		self.unsubscribe = None;
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(unsubscribe) = self.unsubscribe.take() {
			unsubscribe();
		}
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.unsubscribe.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_signal_creation() {
		let signal = Signal::new(42);
		assert_eq!(signal.get(), 42);
	}

	#[rstest]
	fn test_signal_set() {
		let signal = Signal::new(0);
		signal.set(100);
		assert_eq!(signal.get(), 100);
	}

	#[rstest]
	fn test_signal_clone_shares_value() {
		let signal1 = Signal::new(42);
		let signal2 = signal1.clone();

		signal1.set(100);
		assert_eq!(signal2.get(), 100);
		assert!(signal1.ptr_eq(&signal2));
		assert!(!signal1.ptr_eq(&Signal::new(100)));
	}

	#[rstest]
	fn test_snapshot_survives_replacement() {
		let signal = Signal::new(String::from("first"));
		let before = signal.snapshot();

		signal.set(String::from("second"));

		assert_eq!(before.as_str(), "first");
		assert_eq!(signal.get(), "second");
	}

	#[rstest]
	fn test_subscriber_sees_written_value() {
		let signal = Signal::new(0);
		let seen = Rc::new(RefCell::new(Vec::new()));

		let sink = Rc::clone(&seen);
		let _sub = signal.subscribe(move |value| sink.borrow_mut().push(*value));

		signal.set(1);
		signal.set(2);

		assert_eq!(*seen.borrow(), vec![1, 2]);
	}

	#[rstest]
	fn test_drop_subscription_unsubscribes() {
		let signal = Signal::new(0);
		let calls = Rc::new(Cell::new(0));

		let counter = Rc::clone(&calls);
		let sub = signal.subscribe(move |_| counter.set(counter.get() + 1));
		assert_eq!(signal.subscriber_count(), 1);

		signal.set(1);
		drop(sub);
		signal.set(2);

		assert_eq!(calls.get(), 1);
		assert_eq!(signal.subscriber_count(), 0);
	}

	#[rstest]
	fn test_forget_keeps_subscriber() {
		let signal = Signal::new(0);
		let calls = Rc::new(Cell::new(0));

		let counter = Rc::clone(&calls);
		signal
			.subscribe(move |_| counter.set(counter.get() + 1))
			.forget();

		signal.set(1);
		assert_eq!(calls.get(), 1);
	}

	#[rstest]
	fn test_set_if_changed() {
		let signal = Signal::new(5);
		let calls = Rc::new(Cell::new(0));

		let counter = Rc::clone(&calls);
		let _sub = signal.subscribe(move |_| counter.set(counter.get() + 1));

		assert!(!signal.set_if_changed(5));
		assert!(signal.set_if_changed(6));
		assert_eq!(calls.get(), 1);
	}

	#[rstest]
	fn test_reentrant_write_never_delivers_stale_value() {
		let signal = Signal::new(0);
		let log = Rc::new(RefCell::new(Vec::new()));

		// First subscriber redirects 1 -> 2.
		let writer = signal.clone();
		let _redirect = signal.subscribe(move |value| {
			if *value == 1 {
				writer.set(2);
			}
		});

		let sink = Rc::clone(&log);
		let _observer = signal.subscribe(move |value| sink.borrow_mut().push(*value));

		signal.set(1);

		assert_eq!(*log.borrow(), vec![2]);
		assert_eq!(signal.get(), 2);
	}

	#[rstest]
	fn test_subscriber_may_read_signal() {
		let signal = Signal::new(10);
		let seen = Rc::new(Cell::new(0));

		let reader = signal.clone();
		let sink = Rc::clone(&seen);
		let _sub = signal.subscribe(move |_| sink.set(reader.get()));

		signal.set(11);
		assert_eq!(seen.get(), 11);
	}
}
