/*!
Menu trees.

A [`MenuTree`] is an ordered sequence of shared [`MenuItem`]s. The tree
itself is mutable and independently observable: structural edits (insert,
remove, reorder, clear) fire the tree's change feed, while attribute edits
on a contained item fire that item's own feed.

Reads hand out snapshots, so callers never traverse under the tree's lock.
*/

use super::item::MenuItem;
use super::observe::{ChangeFn, Subscribers, Subscription};
use crate::types::TreeId;
use parking_lot::RwLock;
use std::sync::Arc;

/// Ordered, observable collection of menu items.
///
/// Trees compare by identity, not structure: two empty trees created
/// separately are distinct entities with distinct [`TreeId`]s.
pub struct MenuTree {
  id: TreeId,
  items: RwLock<Vec<Arc<MenuItem>>>,
  subscribers: Subscribers,
}

impl MenuTree {
  /// Create an empty tree.
  pub fn new() -> Arc<Self> {
    Self::with_items([])
  }

  /// Create a tree holding `items` in order.
  pub fn with_items(items: impl IntoIterator<Item = Arc<MenuItem>>) -> Arc<Self> {
    Arc::new(Self {
      id: TreeId::new(),
      items: RwLock::new(items.into_iter().collect()),
      subscribers: Subscribers::new(),
    })
  }

  /// Identity token of this tree.
  pub const fn tree_id(&self) -> TreeId {
    self.id
  }

  /// Snapshot of the current items, in order.
  pub fn items(&self) -> Vec<Arc<MenuItem>> {
    self.items.read().clone()
  }

  /// Number of items.
  pub fn len(&self) -> usize {
    self.items.read().len()
  }

  /// Whether the tree has no items.
  pub fn is_empty(&self) -> bool {
    self.items.read().is_empty()
  }

  /// Append an item at the end.
  pub fn push(&self, item: Arc<MenuItem>) {
    self.items.write().push(item);
    self.subscribers.notify();
  }

  /// Insert an item at `index`, clamped to the current length.
  pub fn insert(&self, index: usize, item: Arc<MenuItem>) {
    {
      let mut items = self.items.write();
      let index = index.min(items.len());
      items.insert(index, item);
    }
    self.subscribers.notify();
  }

  /// Remove and return the item at `index`. Out-of-range indexes are a
  /// no-op returning `None`.
  pub fn remove(&self, index: usize) -> Option<Arc<MenuItem>> {
    let removed = {
      let mut items = self.items.write();
      if index < items.len() {
        Some(items.remove(index))
      } else {
        None
      }
    };
    if removed.is_some() {
      self.subscribers.notify();
    }
    removed
  }

  /// Swap the items at `a` and `b`. No-op when either index is out of
  /// range or both are equal.
  pub fn swap(&self, a: usize, b: usize) {
    let swapped = {
      let mut items = self.items.write();
      if a != b && a < items.len() && b < items.len() {
        items.swap(a, b);
        true
      } else {
        false
      }
    };
    if swapped {
      self.subscribers.notify();
    }
  }

  /// Remove every item. No-op when already empty.
  pub fn clear(&self) {
    let cleared = {
      let mut items = self.items.write();
      let had_items = !items.is_empty();
      items.clear();
      had_items
    };
    if cleared {
      self.subscribers.notify();
    }
  }

  /// Observe structural changes.
  pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
    self.subscribe_arc(Arc::new(callback))
  }

  pub(crate) fn subscribe_arc(&self, callback: ChangeFn) -> Subscription {
    self.subscribers.subscribe(callback)
  }
}

impl std::fmt::Debug for MenuTree {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MenuTree")
      .field("id", &self.id)
      .field("len", &self.len())
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};

  fn change_counter(tree: &MenuTree) -> (Subscription, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = Arc::clone(&count);
    let sub = tree.subscribe(move || {
      count_clone.fetch_add(1, Ordering::SeqCst);
    });
    (sub, count)
  }

  fn labels(tree: &MenuTree) -> Vec<String> {
    tree
      .items()
      .iter()
      .filter_map(|item| item.label())
      .collect()
  }

  #[test]
  fn push_and_snapshot_preserve_order() {
    let tree = MenuTree::new();
    tree.push(MenuItem::action("Open"));
    tree.push(MenuItem::action("Save"));
    tree.push(MenuItem::action("Exit"));

    assert_eq!(tree.len(), 3);
    assert_eq!(labels(&tree), vec!["Open", "Save", "Exit"]);
  }

  #[test]
  fn structural_edits_notify() {
    let tree = MenuTree::new();
    let (_sub, count) = change_counter(&tree);

    tree.push(MenuItem::action("Open"));
    tree.insert(0, MenuItem::action("New"));
    tree.swap(0, 1);
    assert!(tree.remove(0).is_some());
    tree.clear();
    assert_eq!(count.load(Ordering::SeqCst), 5);
  }

  #[test]
  fn out_of_range_edits_are_silent_noops() {
    let tree = MenuTree::with_items([MenuItem::action("Open")]);
    let (_sub, count) = change_counter(&tree);

    assert!(tree.remove(5).is_none());
    tree.swap(0, 5);
    tree.swap(0, 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(tree.len(), 1);
  }

  #[test]
  fn clear_on_empty_tree_does_not_notify() {
    let tree = MenuTree::new();
    let (_sub, count) = change_counter(&tree);

    tree.clear();
    assert_eq!(count.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn insert_clamps_to_length() {
    let tree = MenuTree::with_items([MenuItem::action("Open")]);
    tree.insert(99, MenuItem::action("Exit"));
    assert_eq!(labels(&tree), vec!["Open", "Exit"]);
  }

  #[test]
  fn item_attribute_change_does_not_fire_tree_feed() {
    let item = MenuItem::action("Open");
    let tree = MenuTree::with_items([Arc::clone(&item)]);
    let (_sub, count) = change_counter(&tree);

    item.set_enabled(false);
    assert_eq!(count.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn trees_are_distinct_entities() {
    let a = MenuTree::new();
    let b = MenuTree::new();
    assert_ne!(a.tree_id(), b.tree_id());
  }
}
