/*!
The menu export bridge.

# Module Structure

- `mod.rs` - `MenuExporter`, construction, lifecycle, the bus-facing handler
- `registry.rs` - node/id registry
- `subscriptions.rs` - owned change-observer subscriptions
- `layout.rs` - subtree serialization and property projection
- `reset.rs` - debounced full-layout resets
- `events.rs` - remote event routing

# Example

```ignore
use menuio::{MenuExporter, MenuItem, MenuTree};

let root = MenuTree::new();
root.push(MenuItem::action("Open"));

let exporter = MenuExporter::builder()
    .bus(bus)
    .root(root)
    .window(window_id)
    .registrar(registrar)
    .build()?;

let mut events = exporter.subscribe();
while let Ok(event) = events.recv().await {
    // ExporterEvent::Exported / ExporterEvent::LayoutReset { .. }
}
```
*/

mod events;
mod layout;
mod registry;
mod reset;
mod subscriptions;

#[cfg(test)]
pub(crate) mod doubles;

use crate::bus::{
  generate_object_path, IconEncoder, MenuBus, MenuEvent, MenuHandler, MenuRegistrar,
};
use crate::model::{ChangeFn, MenuItem, MenuTree};
use crate::scheduler::{LoopScheduler, Scheduler};
use crate::types::{ExportError, ExportResult, MenuId, WindowId};
use crate::wire::{Layout, Properties, Value};
use async_broadcast::{InactiveReceiver, Receiver, Sender};
use parking_lot::Mutex;
use registry::IdRegistry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use subscriptions::SubscriptionTracker;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Notifications about the bridge itself, delivered to the embedding
/// application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExporterEvent {
  /// The remote consumer queried the layout for the first time. A good
  /// moment to hide a locally rendered menu bar.
  Exported,
  /// A full rebuild completed and the given revision was announced.
  LayoutReset {
    /// The revision the consumer will see from now on.
    revision: u32,
  },
}

/// Bridge state behind the single lock: the registry, the subscriptions,
/// and the reset bookkeeping. Strictly serialized; every mutation happens
/// with this lock held and no model lock is taken while holding it.
pub(crate) struct State {
  pub(crate) root: Arc<MenuTree>,
  pub(crate) registry: IdRegistry,
  pub(crate) subs: SubscriptionTracker,
  pub(crate) revision: u32,
  pub(crate) reset_queued: bool,
}

impl State {
  fn new(root: Arc<MenuTree>) -> Self {
    Self {
      root,
      registry: IdRegistry::new(),
      subs: SubscriptionTracker::new(),
      revision: 0,
      reset_queued: false,
    }
  }

  /// Resolve a protocol id to `(item, submenu)`. The root id resolves to
  /// `(None, root tree)`; unknown or dead ids to `(None, None)`.
  pub(crate) fn resolve(&self, id: MenuId) -> (Option<Arc<MenuItem>>, Option<Arc<MenuTree>>) {
    if id.is_root() {
      return (None, Some(Arc::clone(&self.root)));
    }
    match self.registry.get(id) {
      Some(item) => {
        let submenu = item.submenu_tree();
        (Some(item), submenu)
      }
      None => (None, None),
    }
  }

  /// Id for `item`, allocating and wiring up observation on first sight.
  pub(crate) fn id_for(&mut self, item: &Arc<MenuItem>, on_change: &ChangeFn) -> MenuId {
    let (id, newly_seen) = self.registry.id_for(item);
    if newly_seen {
      self.subs.watch_item(item, on_change);
      if let Some(submenu) = item.submenu_tree() {
        self.subs.watch_tree(&submenu, on_change);
      }
    }
    id
  }
}

/// Everything the bridge owns, shared between the public handle, the bus
/// handler, observer callbacks, and scheduled tasks.
pub(crate) struct Shared {
  pub(crate) path: String,
  window: Option<WindowId>,
  pub(crate) bus: Arc<dyn MenuBus>,
  registrar: Option<Arc<dyn MenuRegistrar>>,
  pub(crate) icons: Option<Arc<dyn IconEncoder>>,
  pub(crate) scheduler: Arc<dyn Scheduler>,
  disposed: AtomicBool,
  exported: AtomicBool,
  pub(crate) state: Mutex<State>,
  events_tx: Sender<ExporterEvent>,
  events_keepalive: InactiveReceiver<ExporterEvent>,
}

impl Shared {
  pub(crate) fn is_disposed(&self) -> bool {
    self.disposed.load(Ordering::SeqCst)
  }

  /// Emit an exporter event.
  pub(crate) fn emit(&self, event: ExporterEvent) {
    if let Err(e) = self.events_tx.try_broadcast(event) {
      if e.is_full() {
        log::warn!("exporter event channel overflow, dropping events");
      }
    }
  }

  /// The observer callback installed on every watched tree and item.
  /// Holds only a weak reference, so subscriptions never keep a disposed
  /// bridge alive.
  pub(crate) fn change_callback(self: &Arc<Self>) -> ChangeFn {
    let weak = Arc::downgrade(self);
    Arc::new(move || {
      if let Some(shared) = weak.upgrade() {
        shared.queue_reset();
      }
    })
  }

  /// Record that the consumer has adopted the exported menu. Fires
  /// [`ExporterEvent::Exported`] exactly once.
  fn mark_exported(&self) {
    if !self.exported.swap(true, Ordering::SeqCst) {
      self.emit(ExporterEvent::Exported);
    }
  }

  /// Tear down: exactly once, safe against an in-flight registration.
  ///
  /// The disposed flag is set before the unregister call is issued, and
  /// the registration task re-checks it right before calling out, so a
  /// registration racing with teardown cannot leave a dangling external
  /// registration.
  fn dispose(&self) {
    if self.disposed.swap(true, Ordering::SeqCst) {
      return;
    }
    log::debug!("disposing menu exporter at {}", self.path);

    if let (Some(window), Some(registrar)) = (self.window, self.registrar.clone()) {
      self.scheduler.spawn(
        "menuio-unregister",
        Box::new(move || {
          if let Err(e) = registrar.unregister_window(window) {
            log::warn!("menu registrar unregistration failed: {e}");
          }
        }),
      );
    }

    self.bus.remove_handler(&self.path);

    let mut state = self.state.lock();
    state.subs.clear();
    state.registry.clear();
    state.reset_queued = false;
  }
}

impl std::fmt::Debug for Shared {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Shared")
      .field("path", &self.path)
      .field("disposed", &self.is_disposed())
      .finish_non_exhaustive()
  }
}

/// The bus-facing query handler. Holds only a weak reference so the
/// transport cannot extend the bridge's lifetime; calls that arrive after
/// teardown answer with inert defaults.
struct BusHandler {
  shared: Weak<Shared>,
}

impl BusHandler {
  fn live(&self) -> Option<Arc<Shared>> {
    self.shared.upgrade().filter(|shared| !shared.is_disposed())
  }
}

impl MenuHandler for BusHandler {
  fn get_layout(&self, parent: MenuId, depth: i32, names: &[String]) -> (u32, Layout) {
    match self.live() {
      Some(shared) => {
        let answer = shared.layout(parent, depth, names);
        shared.mark_exported();
        answer
      }
      None => (0, Layout::empty()),
    }
  }

  fn get_group_properties(&self, ids: &[MenuId], names: &[String]) -> Vec<(MenuId, Properties)> {
    match self.live() {
      Some(shared) => shared.group_properties(ids, names),
      None => ids.iter().map(|&id| (id, Properties::new())).collect(),
    }
  }

  fn get_property(&self, id: MenuId, name: &str) -> Value {
    match self.live() {
      Some(shared) => shared.property(id, name),
      None => Value::Int32(0),
    }
  }

  fn event(&self, event: &MenuEvent) {
    if let Some(shared) = self.live() {
      shared.route_event(event);
    }
  }

  fn event_group(&self, events: &[MenuEvent]) -> (Vec<MenuId>, Vec<MenuId>) {
    if let Some(shared) = self.live() {
      for event in events {
        shared.route_event(event);
      }
    }
    (Vec::new(), Vec::new())
  }

  fn about_to_show(&self, _id: MenuId) -> bool {
    false
  }

  fn about_to_show_group(&self, _ids: &[MenuId]) -> (Vec<MenuId>, Vec<MenuId>) {
    (Vec::new(), Vec::new())
  }
}

/// Builder for configuring a [`MenuExporter`].
///
/// # Example
///
/// ```ignore
/// let exporter = MenuExporter::builder()
///     .bus(bus)
///     .root(menu)
///     .window(window_id)
///     .registrar(registrar)
///     .build()?;
/// ```
#[derive(Default)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct MenuExporterBuilder {
  bus: Option<Arc<dyn MenuBus>>,
  root: Option<Arc<MenuTree>>,
  window: Option<WindowId>,
  registrar: Option<Arc<dyn MenuRegistrar>>,
  icons: Option<Arc<dyn IconEncoder>>,
  scheduler: Option<Arc<dyn Scheduler>>,
  path: Option<String>,
}

impl std::fmt::Debug for MenuExporterBuilder {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MenuExporterBuilder")
      .field("window", &self.window)
      .field("path", &self.path)
      .finish_non_exhaustive()
  }
}

impl MenuExporterBuilder {
  /// The transport to export over. Required.
  pub fn bus(mut self, bus: Arc<dyn MenuBus>) -> Self {
    self.bus = Some(bus);
    self
  }

  /// Initial root tree. Default: a fresh empty tree.
  pub fn root(mut self, root: Arc<MenuTree>) -> Self {
    self.root = Some(root);
    self
  }

  /// Export as the application menu of `window`. Without a window the
  /// bridge runs in detached mode and never contacts the registrar.
  pub const fn window(mut self, window: WindowId) -> Self {
    self.window = Some(window);
    self
  }

  /// Registrar for shell integration. Optional; failures are swallowed.
  pub fn registrar(mut self, registrar: Arc<dyn MenuRegistrar>) -> Self {
    self.registrar = Some(registrar);
    self
  }

  /// Icon encoder for `icon-data`. Without one the property is omitted.
  pub fn icon_encoder(mut self, icons: Arc<dyn IconEncoder>) -> Self {
    self.icons = Some(icons);
    self
  }

  /// Host event loop. Default: a dedicated [`LoopScheduler`] thread.
  pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
    self.scheduler = Some(scheduler);
    self
  }

  /// Export at a fixed object path instead of a generated one. Useful
  /// for detached menus whose path is negotiated elsewhere.
  pub fn object_path(mut self, path: impl Into<String>) -> Self {
    self.path = Some(path.into());
    self
  }

  /// Build the exporter: bind the handler to the bus, perform the
  /// initial reset, and kick off registrar registration if configured.
  pub fn build(self) -> ExportResult<MenuExporter> {
    let bus = self.bus.ok_or(ExportError::MissingBus)?;
    let scheduler: Arc<dyn Scheduler> = match self.scheduler {
      Some(scheduler) => scheduler,
      None => Arc::new(LoopScheduler::new()?),
    };
    let path = self.path.unwrap_or_else(generate_object_path);
    let root = self.root.unwrap_or_else(MenuTree::new);

    let (mut events_tx, events_rx) = async_broadcast::broadcast(EVENT_CHANNEL_CAPACITY);
    events_tx.set_overflow(true); // Drop oldest events when full

    let shared = Arc::new(Shared {
      path,
      window: self.window,
      bus,
      registrar: self.registrar,
      icons: self.icons,
      scheduler,
      disposed: AtomicBool::new(false),
      exported: AtomicBool::new(false),
      state: Mutex::new(State::new(root)),
      events_tx,
      events_keepalive: events_rx.deactivate(),
    });

    // Handler first, registrar later: the bridge must answer direct
    // queries even if the registrar never does.
    let handler = Arc::new(BusHandler {
      shared: Arc::downgrade(&shared),
    });
    shared.bus.add_handler(&shared.path, handler);
    shared.do_reset();

    if let (Some(window), Some(registrar)) = (shared.window, shared.registrar.clone()) {
      let weak = Arc::downgrade(&shared);
      shared.scheduler.spawn(
        "menuio-register",
        Box::new(move || {
          let Some(shared) = weak.upgrade() else {
            return;
          };
          if shared.is_disposed() {
            return;
          }
          if let Err(e) = registrar.register_window(window, &shared.path) {
            log::warn!("menu registrar registration failed: {e}");
          }
        }),
      );
    }

    log::debug!("menu exporter bound at {}", shared.path);
    Ok(MenuExporter { shared })
  }
}

/// Exports one menu tree over the bus and keeps the remote consumer
/// consistent with it. Disposes itself on drop.
pub struct MenuExporter {
  pub(crate) shared: Arc<Shared>,
}

impl MenuExporter {
  /// Create a builder for configuring a new exporter.
  pub fn builder() -> MenuExporterBuilder {
    MenuExporterBuilder::default()
  }

  /// Subscribe to exporter notifications.
  pub fn subscribe(&self) -> Receiver<ExporterEvent> {
    self.shared.events_keepalive.activate_cloned()
  }

  /// The object path the bridge is exported at.
  pub fn object_path(&self) -> &str {
    &self.shared.path
  }

  /// The current root tree.
  pub fn root(&self) -> Arc<MenuTree> {
    Arc::clone(&self.shared.state.lock().root)
  }

  /// Replace the root tree. Resets synchronously.
  pub fn set_root(&self, root: Arc<MenuTree>) {
    self.shared.set_root(root);
  }

  /// Current layout revision.
  pub fn revision(&self) -> u32 {
    self.shared.state.lock().revision
  }

  /// Whether the remote consumer has queried the layout at least once.
  pub fn is_exported(&self) -> bool {
    self.shared.exported.load(Ordering::SeqCst)
  }

  /// Whether the bridge has been torn down.
  pub fn is_disposed(&self) -> bool {
    self.shared.is_disposed()
  }

  /// Tear the bridge down. Idempotent; also called on drop.
  pub fn dispose(&self) {
    self.shared.dispose();
  }
}

impl Drop for MenuExporter {
  fn drop(&mut self) {
    self.shared.dispose();
  }
}

impl std::fmt::Debug for MenuExporter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MenuExporter")
      .field("path", &self.shared.path)
      .finish_non_exhaustive()
  }
}
