/*!
Boundary traits to the menu bus and its neighbors.

The bridge never talks to a concrete IPC connection. It answers protocol
queries through [`MenuHandler`], emits its one signal through [`MenuBus`],
and consumes two optional collaborators: [`MenuRegistrar`] (shell
integration) and [`IconEncoder`] (icon payload encoding). A transport
adapter implements `MenuBus` and marshals `MenuHandler` calls onto the
actual connection.
*/

use crate::model::Icon;
use crate::types::{ExportResult, MenuId, WindowId};
use crate::wire::{Layout, Properties, Value};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Remote event kinds the bus can deliver for a menu id.
///
/// Only `Clicked` is routed to the owning item; the rest are accepted and
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
  /// The consumer activated the item.
  Clicked,
  /// The pointer moved over the item.
  Hovered,
  /// The item's submenu was opened.
  Opened,
  /// The item's submenu was closed.
  Closed,
}

impl EventKind {
  /// Parse a raw wire event name. Unknown names yield `None`; the caller
  /// drops such events silently.
  pub fn parse(raw: &str) -> Option<Self> {
    match raw {
      "clicked" => Some(Self::Clicked),
      "hovered" => Some(Self::Hovered),
      "opened" => Some(Self::Opened),
      "closed" => Some(Self::Closed),
      _ => None,
    }
  }
}

/// One remote event as delivered by the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEvent {
  /// Protocol id the event addresses.
  pub id: MenuId,
  /// What happened.
  pub kind: EventKind,
  /// Event payload; unused by this bridge but carried for completeness.
  pub data: Option<Value>,
  /// Bus-supplied event timestamp.
  pub timestamp: u32,
}

impl MenuEvent {
  /// A click on `id` with no payload.
  pub const fn clicked(id: MenuId) -> Self {
    Self {
      id,
      kind: EventKind::Clicked,
      data: None,
      timestamp: 0,
    }
  }
}

/// Menu-protocol version this bridge implements.
pub const PROTOCOL_VERSION: u32 = 4;

/// Query/event surface the bridge exposes to the transport.
///
/// Every method answers deterministically from current tree state and
/// never blocks. Unknown ids are not errors: the remote side may race
/// with a reset, so they resolve to empty or default answers.
pub trait MenuHandler: Send + Sync {
  /// Serialize the subtree under `parent` (`MenuId::ROOT` for the whole
  /// tree). Negative `depth` means unlimited recursion; `names` filters
  /// the property bags, with the empty list meaning the full default set.
  /// Returns the current revision alongside the record.
  fn get_layout(&self, parent: MenuId, depth: i32, names: &[String]) -> (u32, Layout);

  /// Property bags for a batch of ids. Every requested id appears in the
  /// answer; unknown ids carry an empty bag.
  fn get_group_properties(&self, ids: &[MenuId], names: &[String]) -> Vec<(MenuId, Properties)>;

  /// A single property value, with `Int32(0)` standing in for any
  /// (node, name) pair that has no applicable projection.
  fn get_property(&self, id: MenuId, name: &str) -> Value;

  /// Deliver one remote event.
  fn event(&self, event: &MenuEvent);

  /// Deliver a batch of remote events, each routed independently.
  /// Returns (ids needing update, invalid ids) — both always empty, since
  /// individual lookups cannot fail loudly.
  fn event_group(&self, events: &[MenuEvent]) -> (Vec<MenuId>, Vec<MenuId>);

  /// Whether the submenu under `id` needs refreshing before display.
  /// Always `false`: this bridge has no lazy population.
  fn about_to_show(&self, id: MenuId) -> bool;

  /// Batched [`about_to_show`](Self::about_to_show). Returns
  /// (ids needing update, ids in error) — both always empty.
  fn about_to_show_group(&self, ids: &[MenuId]) -> (Vec<MenuId>, Vec<MenuId>);

  /// Menu-protocol version.
  fn version(&self) -> u32 {
    PROTOCOL_VERSION
  }
}

/// The transport connection, as far as the bridge is concerned.
pub trait MenuBus: Send + Sync {
  /// Start answering queries for `path` with `handler`.
  fn add_handler(&self, path: &str, handler: Arc<dyn MenuHandler>);

  /// Stop answering queries for `path`.
  fn remove_handler(&self, path: &str);

  /// Emit the "layout updated" signal for `path`. `parent` is the root of
  /// the invalidated subtree; this bridge always sends `MenuId::ROOT`.
  fn layout_updated(&self, path: &str, revision: u32, parent: MenuId);
}

/// External registrar associating a window with its exported menu path.
///
/// Registration is an integration hint, not a correctness requirement:
/// implementations may fail or time out freely and the bridge stays
/// functional for direct queries.
pub trait MenuRegistrar: Send + Sync {
  /// Associate `window` with the menu exported at `path`.
  fn register_window(&self, window: WindowId, path: &str) -> ExportResult<()>;

  /// Drop the association for `window`.
  fn unregister_window(&self, window: WindowId) -> ExportResult<()>;
}

/// Icon payload encoder. `None` omits `icon-data` from the bag.
pub trait IconEncoder: Send + Sync {
  /// Encode `icon` into the wire representation.
  fn encode(&self, icon: &Icon) -> Option<Vec<u8>>;
}

/// Generate a fresh, collision-resistant object path for one exported
/// tree.
pub fn generate_object_path() -> String {
  format!("/org/menuio/menu/{}", Uuid::new_v4().simple())
}
