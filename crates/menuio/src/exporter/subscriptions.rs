/*!
Change-subscription tracker.

Owns every observer the bridge has registered on the model: one attribute
subscription per tracked item, one structural subscription per tracked
tree. Deduplicates by identity token, so watching an already-watched
target is a no-op. Dropping the stored [`Subscription`] handles is what
actually detaches the observers, so [`clear`](SubscriptionTracker::clear)
is the whole unsubscribe story on reset.
*/

use crate::model::{ChangeFn, MenuItem, MenuTree, Subscription};
use crate::types::{NodeId, TreeId};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub(crate) struct SubscriptionTracker {
  items: HashMap<NodeId, Subscription>,
  trees: HashMap<TreeId, Subscription>,
}

impl SubscriptionTracker {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Observe `item`'s attribute feed with `on_change`, unless already
  /// observed.
  pub(crate) fn watch_item(&mut self, item: &Arc<MenuItem>, on_change: &ChangeFn) {
    self
      .items
      .entry(item.node_id())
      .or_insert_with(|| item.subscribe_arc(Arc::clone(on_change)));
  }

  /// Observe `tree`'s structural feed with `on_change`, unless already
  /// observed.
  pub(crate) fn watch_tree(&mut self, tree: &Arc<MenuTree>, on_change: &ChangeFn) {
    self
      .trees
      .entry(tree.tree_id())
      .or_insert_with(|| tree.subscribe_arc(Arc::clone(on_change)));
  }

  /// Whether `tree` is currently observed.
  pub(crate) fn is_watching_tree(&self, tree: &MenuTree) -> bool {
    self.trees.contains_key(&tree.tree_id())
  }

  /// Detach every observer.
  pub(crate) fn clear(&mut self) {
    self.items.clear();
    self.trees.clear();
  }

  pub(crate) fn item_count(&self) -> usize {
    self.items.len()
  }

  pub(crate) fn tree_count(&self) -> usize {
    self.trees.len()
  }

  #[cfg(test)]
  pub(crate) fn is_watching_item(&self, item: &MenuItem) -> bool {
    self.items.contains_key(&item.node_id())
  }
}

impl std::fmt::Debug for SubscriptionTracker {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SubscriptionTracker")
      .field("items", &self.items.len())
      .field("trees", &self.trees.len())
      .finish()
  }
}
