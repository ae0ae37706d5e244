/*!
Remote event routing.

Only `clicked` events are routed: the id is resolved through the registry
and, when it names an enabled non-separator item, that item's activation
handler fires. Everything else — unknown ids, dead nodes, separators,
disabled items, other event kinds — is dropped silently, since the remote
side may legitimately race with a concurrent reset.

The item's own enabled flag gates routing, not the serialized `enabled`
projection: a submenu header whose submenu happens to be empty still
routes (the consumer can't click it anyway while it is shown disabled).
*/

use super::Shared;
use crate::bus::{EventKind, MenuEvent};

impl Shared {
  /// Route one remote event. Never fails.
  pub(crate) fn route_event(&self, event: &MenuEvent) {
    if event.kind != EventKind::Clicked {
      return;
    }

    let item = {
      let state = self.state.lock();
      state.resolve(event.id).0
    };
    let Some(item) = item else {
      log::debug!("clicked event for unknown id {}, dropping", event.id);
      return;
    };
    if item.is_separator() || !item.is_enabled() {
      return;
    }

    // Handler runs outside the state lock; it may mutate the model.
    item.activate();
  }
}
