/*!
Debounced layout resets.

The protocol has no fine-grained diff primitive here: any observed change
anywhere in the subscribed subtree invalidates the whole exported layout.
The first change after a stable period posts one rebuild to the scheduler;
further changes before it runs are absorbed by the reset-pending flag.

A rebuild drops every subscription, clears the id registry, re-subscribes
the entire reachable tree, bumps the revision, and announces
`layout_updated(revision, 0)` on the bus.
*/

use super::{ExporterEvent, Shared, State};
use crate::model::{ChangeFn, MenuTree};
use crate::types::MenuId;
use std::sync::Arc;

impl Shared {
  /// Observed-mutation entry point: schedule one rebuild unless one is
  /// already pending or the bridge is disposed.
  pub(crate) fn queue_reset(self: &Arc<Self>) {
    if self.is_disposed() {
      return;
    }
    {
      let mut state = self.state.lock();
      if state.reset_queued {
        return;
      }
      state.reset_queued = true;
    }

    let weak = Arc::downgrade(self);
    self.scheduler.post(Box::new(move || {
      if let Some(shared) = weak.upgrade() {
        shared.do_reset();
      }
    }));
  }

  /// Perform the full rebuild and emit the layout-updated signal.
  pub(crate) fn do_reset(self: &Arc<Self>) {
    if self.is_disposed() {
      return;
    }

    let on_change = self.change_callback();
    let revision = {
      let mut state = self.state.lock();
      state.reset_queued = false;
      state.subs.clear();
      state.registry.clear();
      resubscribe(&mut state, &on_change);
      state.revision += 1;
      log::debug!(
        "layout reset: revision={}, watching {} trees / {} items",
        state.revision,
        state.subs.tree_count(),
        state.subs.item_count()
      );
      state.revision
    };

    self.bus.layout_updated(&self.path, revision, MenuId::ROOT);
    self.emit(ExporterEvent::LayoutReset { revision });
  }

  /// Replace the exported root tree.
  ///
  /// A rare, explicit operation, so the rebuild is synchronous rather
  /// than debounced: the old root's observers are released and the new
  /// tree is fully subscribed before this returns.
  pub(crate) fn set_root(self: &Arc<Self>, tree: Arc<MenuTree>) {
    if self.is_disposed() {
      return;
    }
    self.state.lock().root = tree;
    self.do_reset();
  }
}

/// Subscribe every tree and item reachable from the current root.
///
/// Iterative walk with identity-deduped trees, so a submenu reachable
/// twice (or a tree cycle) is observed once.
fn resubscribe(state: &mut State, on_change: &ChangeFn) {
  let mut pending = vec![Arc::clone(&state.root)];
  while let Some(tree) = pending.pop() {
    if state.subs.is_watching_tree(&tree) {
      continue;
    }
    state.subs.watch_tree(&tree, on_change);
    for item in tree.items() {
      state.subs.watch_item(&item, on_change);
      if let Some(submenu) = item.submenu_tree() {
        pending.push(submenu);
      }
    }
  }
}
