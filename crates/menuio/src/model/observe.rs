/*!
Change-observation plumbing for the menu model.

Every observable model object embeds a [`Subscribers`] registry. Observers
register a callback and get back a [`Subscription`] handle that
unsubscribes on drop, so an owner releasing its handles is enough to
guarantee no further callbacks.

Notification snapshots the callback list and invokes it outside the
registry lock, so callbacks may subscribe or unsubscribe reentrantly.
*/

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// Callback invoked when the observed target changes.
pub(crate) type ChangeFn = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Slots {
  next_token: u64,
  callbacks: HashMap<u64, ChangeFn>,
}

/// Observer registry embedded in each observable model object.
#[derive(Default)]
pub(crate) struct Subscribers {
  slots: Arc<Mutex<Slots>>,
}

impl Subscribers {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Register `callback`; it fires on every change until the returned
  /// handle is dropped.
  pub(crate) fn subscribe(&self, callback: ChangeFn) -> Subscription {
    let mut slots = self.slots.lock();
    let token = slots.next_token;
    slots.next_token += 1;
    slots.callbacks.insert(token, callback);
    Subscription {
      slots: Arc::downgrade(&self.slots),
      token,
    }
  }

  /// Invoke every registered callback.
  pub(crate) fn notify(&self) {
    // Snapshot under the lock, call outside it.
    let callbacks: Vec<ChangeFn> = self.slots.lock().callbacks.values().cloned().collect();
    for callback in callbacks {
      callback();
    }
  }

  #[cfg(test)]
  pub(crate) fn observer_count(&self) -> usize {
    self.slots.lock().callbacks.len()
  }
}

/// Handle to a registered observer. Unsubscribes on drop.
pub struct Subscription {
  slots: Weak<Mutex<Slots>>,
  token: u64,
}

impl Subscription {
  /// Stop observing. Equivalent to dropping the handle.
  pub fn cancel(self) {
    // Drop handles the removal.
  }
}

impl Drop for Subscription {
  fn drop(&mut self) {
    if let Some(slots) = self.slots.upgrade() {
      slots.lock().callbacks.remove(&self.token);
    }
  }
}

impl std::fmt::Debug for Subscription {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscription")
      .field("token", &self.token)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};

  fn counting_callback() -> (ChangeFn, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = Arc::clone(&count);
    let callback: ChangeFn = Arc::new(move || {
      count_clone.fetch_add(1, Ordering::SeqCst);
    });
    (callback, count)
  }

  #[test]
  fn notify_reaches_every_observer() {
    let subscribers = Subscribers::new();
    let (first, first_count) = counting_callback();
    let (second, second_count) = counting_callback();
    let _a = subscribers.subscribe(first);
    let _b = subscribers.subscribe(second);

    subscribers.notify();
    subscribers.notify();

    assert_eq!(first_count.load(Ordering::SeqCst), 2);
    assert_eq!(second_count.load(Ordering::SeqCst), 2);
  }

  #[test]
  fn drop_unsubscribes() {
    let subscribers = Subscribers::new();
    let (callback, count) = counting_callback();
    let handle = subscribers.subscribe(callback);
    assert_eq!(subscribers.observer_count(), 1);

    drop(handle);
    assert_eq!(subscribers.observer_count(), 0);

    subscribers.notify();
    assert_eq!(count.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn cancel_unsubscribes() {
    let subscribers = Subscribers::new();
    let (callback, _count) = counting_callback();
    let handle = subscribers.subscribe(callback);

    handle.cancel();
    assert_eq!(subscribers.observer_count(), 0);
  }

  #[test]
  fn subscription_outliving_target_is_harmless() {
    let subscribers = Subscribers::new();
    let (callback, _count) = counting_callback();
    let handle = subscribers.subscribe(callback);

    drop(subscribers);
    drop(handle); // Weak upgrade fails; nothing to remove.
  }

  #[test]
  fn callback_may_subscribe_reentrantly() {
    let subscribers = Arc::new(Subscribers::new());
    let inner = Arc::clone(&subscribers);
    let late: Arc<Mutex<Vec<Subscription>>> = Arc::new(Mutex::new(Vec::new()));
    let late_clone = Arc::clone(&late);

    let handle = subscribers.subscribe(Arc::new(move || {
      let (callback, _count) = counting_callback();
      late_clone.lock().push(inner.subscribe(callback));
    }));

    subscribers.notify();
    assert_eq!(subscribers.observer_count(), 2);
    drop(handle);
    drop(late);
  }
}
