/*!
Menu items.

A [`MenuItem`] is either a separator or an action; an action becomes a
submenu header by attaching a [`MenuTree`]. Items are owned by the
embedding application and shared as `Arc<MenuItem>`; the export bridge
only observes them.

Attribute setters notify the item's change feed only when the value
actually changed, and always after releasing the item's own lock.
*/

use super::observe::{ChangeFn, Subscribers, Subscription};
use super::tree::MenuTree;
use crate::types::NodeId;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Toggle behavior of an action item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleKind {
  /// Plain action, no toggle indicator.
  #[default]
  None,
  /// Checkbox-style toggle.
  Checkbox,
  /// Radio-group-style toggle.
  Radio,
}

/// Modifier keys of an accelerator.
///
/// The wire projection lists present modifiers in the fixed order
/// `Control, Alt, Shift, Super`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)] // four independent modifier flags
pub struct Modifiers {
  pub control: bool,
  pub alt: bool,
  pub shift: bool,
  /// The Super/Meta/Command key.
  pub meta: bool,
}

impl Modifiers {
  /// Whether no modifier is set.
  pub const fn is_empty(self) -> bool {
    !(self.control || self.alt || self.shift || self.meta)
  }

  /// Present modifier names in the fixed wire order.
  pub fn names(self) -> Vec<&'static str> {
    let mut names = Vec::new();
    if self.control {
      names.push("Control");
    }
    if self.alt {
      names.push("Alt");
    }
    if self.shift {
      names.push("Shift");
    }
    if self.meta {
      names.push("Super");
    }
    names
  }
}

/// Keyboard accelerator: a modifier set plus a key name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accelerator {
  pub modifiers: Modifiers,
  /// Key name as shown to the consumer (e.g. `"O"`, `"F5"`).
  pub key: String,
}

impl Accelerator {
  /// Create an accelerator.
  pub fn new(modifiers: Modifiers, key: impl Into<String>) -> Self {
    Self {
      modifiers,
      key: key.into(),
    }
  }
}

/// Opaque icon payload.
///
/// The bridge never interprets the bytes; an [`IconEncoder`] turns them
/// into the wire encoding at serialization time.
///
/// [`IconEncoder`]: crate::bus::IconEncoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
  data: Arc<[u8]>,
}

impl Icon {
  /// Wrap raw icon bytes.
  pub fn new(data: impl Into<Vec<u8>>) -> Self {
    Self {
      data: data.into().into(),
    }
  }

  /// The raw payload.
  pub fn data(&self) -> &[u8] {
    &self.data
  }
}

type ActivateFn = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct ItemState {
  label: Option<String>,
  enabled: bool,
  visible: bool,
  icon: Option<Icon>,
  accelerator: Option<Accelerator>,
  toggle: ToggleKind,
  checked: bool,
  submenu: Option<Arc<MenuTree>>,
}

/// A single menu entry.
///
/// Two entities created with identical attributes are still distinct:
/// identity is the construction-time [`NodeId`], not structure.
pub struct MenuItem {
  id: NodeId,
  separator: bool,
  state: RwLock<ItemState>,
  subscribers: Subscribers,
  on_activate: Mutex<Option<ActivateFn>>,
}

impl MenuItem {
  fn new(separator: bool, label: Option<String>) -> Arc<Self> {
    Arc::new(Self {
      id: NodeId::new(),
      separator,
      state: RwLock::new(ItemState {
        label,
        enabled: true,
        visible: true,
        ..ItemState::default()
      }),
      subscribers: Subscribers::new(),
      on_activate: Mutex::new(None),
    })
  }

  /// Create an action item with a label.
  pub fn action(label: impl Into<String>) -> Arc<Self> {
    Self::new(false, Some(label.into()))
  }

  /// Create an action item heading a submenu.
  pub fn submenu(label: impl Into<String>, tree: Arc<MenuTree>) -> Arc<Self> {
    let item = Self::new(false, Some(label.into()));
    item.state.write().submenu = Some(tree);
    item
  }

  /// Create a separator.
  pub fn separator() -> Arc<Self> {
    Self::new(true, None)
  }

  /// Identity token of this item.
  pub const fn node_id(&self) -> NodeId {
    self.id
  }

  /// Whether this item is a separator.
  pub const fn is_separator(&self) -> bool {
    self.separator
  }

  /// Current label, if any.
  pub fn label(&self) -> Option<String> {
    self.state.read().label.clone()
  }

  /// Whether the item's own enabled flag is set.
  ///
  /// The wire projection may still report the item disabled when its
  /// attached submenu is empty; that rule lives in the serializer.
  pub fn is_enabled(&self) -> bool {
    self.state.read().enabled
  }

  /// Whether the item is visible.
  pub fn is_visible(&self) -> bool {
    self.state.read().visible
  }

  /// Current icon payload, if any.
  pub fn icon(&self) -> Option<Icon> {
    self.state.read().icon.clone()
  }

  /// Current accelerator, if any.
  pub fn accelerator(&self) -> Option<Accelerator> {
    self.state.read().accelerator.clone()
  }

  /// Toggle kind.
  pub fn toggle(&self) -> ToggleKind {
    self.state.read().toggle
  }

  /// Toggle state. Meaningful only when [`toggle`](Self::toggle) is not none.
  pub fn is_checked(&self) -> bool {
    self.state.read().checked
  }

  /// Attached submenu, if any.
  pub fn submenu_tree(&self) -> Option<Arc<MenuTree>> {
    self.state.read().submenu.clone()
  }

  /// Set the label.
  pub fn set_label(&self, label: impl Into<String>) {
    self.update(|state| {
      let label = Some(label.into());
      let changed = state.label != label;
      state.label = label;
      changed
    });
  }

  /// Remove the label. The serializer substitutes a placeholder.
  pub fn clear_label(&self) {
    self.update(|state| {
      let changed = state.label.is_some();
      state.label = None;
      changed
    });
  }

  /// Set the enabled flag.
  pub fn set_enabled(&self, enabled: bool) {
    self.update(|state| {
      let changed = state.enabled != enabled;
      state.enabled = enabled;
      changed
    });
  }

  /// Set the visible flag.
  pub fn set_visible(&self, visible: bool) {
    self.update(|state| {
      let changed = state.visible != visible;
      state.visible = visible;
      changed
    });
  }

  /// Set or clear the icon payload.
  pub fn set_icon(&self, icon: Option<Icon>) {
    self.update(|state| {
      let changed = state.icon != icon;
      state.icon = icon;
      changed
    });
  }

  /// Set or clear the accelerator.
  pub fn set_accelerator(&self, accelerator: Option<Accelerator>) {
    self.update(|state| {
      let changed = state.accelerator != accelerator;
      state.accelerator = accelerator;
      changed
    });
  }

  /// Set the toggle kind.
  pub fn set_toggle(&self, toggle: ToggleKind) {
    self.update(|state| {
      let changed = state.toggle != toggle;
      state.toggle = toggle;
      changed
    });
  }

  /// Set the toggle state.
  pub fn set_checked(&self, checked: bool) {
    self.update(|state| {
      let changed = state.checked != checked;
      state.checked = checked;
      changed
    });
  }

  /// Attach or detach a submenu. Trees compare by identity.
  pub fn set_submenu(&self, submenu: Option<Arc<MenuTree>>) {
    self.update(|state| {
      let old = state.submenu.as_ref().map(|tree| tree.tree_id());
      let new = submenu.as_ref().map(|tree| tree.tree_id());
      state.submenu = submenu;
      old != new
    });
  }

  /// Register the owner's activation handler, replacing any previous one.
  ///
  /// The bridge invokes it when the remote consumer clicks this item and
  /// the item is enabled.
  pub fn on_activate(&self, handler: impl Fn() + Send + Sync + 'static) {
    *self.on_activate.lock() = Some(Arc::new(handler));
  }

  /// Observe attribute changes.
  pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
    self.subscribe_arc(Arc::new(callback))
  }

  pub(crate) fn subscribe_arc(&self, callback: ChangeFn) -> Subscription {
    self.subscribers.subscribe(callback)
  }

  /// Deliver an activation to the owner, if a handler is registered.
  pub(crate) fn activate(&self) {
    let handler = self.on_activate.lock().clone();
    if let Some(handler) = handler {
      handler();
    }
  }

  fn update(&self, apply: impl FnOnce(&mut ItemState) -> bool) {
    let changed = apply(&mut self.state.write());
    if changed {
      self.subscribers.notify();
    }
  }
}

impl std::fmt::Debug for MenuItem {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MenuItem")
      .field("id", &self.id)
      .field("separator", &self.separator)
      .field("label", &self.state.read().label)
      .finish_non_exhaustive()
  }
}
