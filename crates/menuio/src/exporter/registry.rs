/*!
Bidirectional node/id registry.

Ids are small positive integers allocated lazily, one per node the
protocol has seen. The two directions are kept as separate maps and are
always mutual inverses: `ids_to_items` holds weak references (the bridge
never extends node lifetime) while `items_to_ids` is keyed by the node's
identity token. `MenuId::ROOT` is reserved for the root tree and never
allocated.

The allocation counter survives [`clear`](IdRegistry::clear), so an id
invalidated by a reset can never silently re-resolve to a different node.
*/

use crate::model::MenuItem;
use crate::types::{MenuId, NodeId};
use std::collections::HashMap;
use std::sync::{Arc, Weak};

pub(crate) struct IdRegistry {
  ids_to_items: HashMap<MenuId, Weak<MenuItem>>,
  items_to_ids: HashMap<NodeId, MenuId>,
  next_id: i32,
}

impl IdRegistry {
  pub(crate) fn new() -> Self {
    Self {
      ids_to_items: HashMap::new(),
      items_to_ids: HashMap::new(),
      next_id: 1,
    }
  }

  /// Existing id for `item`, or a freshly allocated one. The bool is true
  /// when the id was newly allocated (the caller then wires up
  /// subscriptions for the node).
  pub(crate) fn id_for(&mut self, item: &Arc<MenuItem>) -> (MenuId, bool) {
    if let Some(&id) = self.items_to_ids.get(&item.node_id()) {
      return (id, false);
    }
    let id = MenuId(self.next_id);
    self.next_id += 1;
    self.ids_to_items.insert(id, Arc::downgrade(item));
    self.items_to_ids.insert(item.node_id(), id);
    (id, true)
  }

  /// Node for `id`, if the id is known and the node is still alive.
  pub(crate) fn get(&self, id: MenuId) -> Option<Arc<MenuItem>> {
    self.ids_to_items.get(&id).and_then(Weak::upgrade)
  }

  /// Drop every entry, keeping the allocation counter.
  pub(crate) fn clear(&mut self) {
    self.ids_to_items.clear();
    self.items_to_ids.clear();
  }

  /// Number of tracked nodes.
  #[cfg(test)]
  pub(crate) fn len(&self) -> usize {
    self.ids_to_items.len()
  }

  /// Existing id for a node identity, without allocating.
  #[cfg(test)]
  pub(crate) fn existing_id(&self, node: NodeId) -> Option<MenuId> {
    self.items_to_ids.get(&node).copied()
  }
}

impl std::fmt::Debug for IdRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("IdRegistry")
      .field("len", &self.ids_to_items.len())
      .field("next_id", &self.next_id)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn allocates_from_one_and_is_stable() {
    let mut registry = IdRegistry::new();
    let open = MenuItem::action("Open");
    let exit = MenuItem::action("Exit");

    let (open_id, open_new) = registry.id_for(&open);
    let (exit_id, exit_new) = registry.id_for(&exit);
    assert_eq!(open_id, MenuId(1));
    assert_eq!(exit_id, MenuId(2));
    assert!(open_new);
    assert!(exit_new);

    // Repeated lookups return the same id without reallocating.
    assert_eq!(registry.id_for(&open), (MenuId(1), false));
    assert_eq!(registry.len(), 2);
  }

  #[test]
  fn maps_stay_mutual_inverses() {
    let mut registry = IdRegistry::new();
    let item = MenuItem::action("Open");
    let (id, _) = registry.id_for(&item);

    let resolved = registry.get(id).unwrap();
    assert_eq!(resolved.node_id(), item.node_id());
  }

  #[test]
  fn unknown_id_resolves_to_none() {
    let registry = IdRegistry::new();
    assert!(registry.get(MenuId(42)).is_none());
  }

  #[test]
  fn dead_node_resolves_to_none() {
    let mut registry = IdRegistry::new();
    let id = {
      let item = MenuItem::action("Transient");
      registry.id_for(&item).0
    };
    assert!(registry.get(id).is_none());
  }

  #[test]
  fn clear_invalidates_ids_but_never_reuses_them() {
    let mut registry = IdRegistry::new();
    let open = MenuItem::action("Open");
    let (old_id, _) = registry.id_for(&open);

    registry.clear();
    assert_eq!(registry.len(), 0);
    assert!(registry.get(old_id).is_none());

    let (new_id, newly) = registry.id_for(&open);
    assert!(newly);
    assert!(new_id.0 > old_id.0);
  }
}
