/*!
Deterministic test doubles for the exporter.

Everything timing-dependent in production (the host event loop, the bus
connection, the registrar) is replaced with recording fakes driven
explicitly from the test body, so no test ever sleeps or races.
*/

use super::MenuExporter;
use crate::bus::{IconEncoder, MenuBus, MenuHandler, MenuRegistrar};
use crate::model::{Icon, MenuItem, MenuTree};
use crate::scheduler::{Scheduler, Task};
use crate::types::{ExportError, ExportResult, MenuId, WindowId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Scheduler whose queues only drain when the test says so.
#[derive(Default)]
pub(crate) struct ManualScheduler {
  posted: Mutex<Vec<Task>>,
  spawned: Mutex<Vec<Task>>,
}

impl ManualScheduler {
  /// Run every posted task in order. Returns how many ran.
  pub(crate) fn run_posted(&self) -> usize {
    let tasks: Vec<Task> = std::mem::take(&mut *self.posted.lock());
    let count = tasks.len();
    for task in tasks {
      task();
    }
    count
  }

  /// Run every spawned task. Returns how many ran.
  pub(crate) fn run_spawned(&self) -> usize {
    let tasks: Vec<Task> = std::mem::take(&mut *self.spawned.lock());
    let count = tasks.len();
    for task in tasks {
      task();
    }
    count
  }

  pub(crate) fn posted_len(&self) -> usize {
    self.posted.lock().len()
  }
}

impl Scheduler for ManualScheduler {
  fn post(&self, task: Task) {
    self.posted.lock().push(task);
  }

  fn spawn(&self, _name: &str, task: Task) {
    self.spawned.lock().push(task);
  }
}

/// Bus that records handlers and signals instead of talking IPC.
#[derive(Default)]
pub(crate) struct RecordingBus {
  handlers: Mutex<HashMap<String, Arc<dyn MenuHandler>>>,
  removed: Mutex<Vec<String>>,
  signals: Mutex<Vec<(u32, MenuId)>>,
}

impl RecordingBus {
  pub(crate) fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub(crate) fn handler(&self, path: &str) -> Option<Arc<dyn MenuHandler>> {
    self.handlers.lock().get(path).cloned()
  }

  pub(crate) fn has_handler(&self, path: &str) -> bool {
    self.handlers.lock().contains_key(path)
  }

  /// Every `layout_updated` signal seen so far, as (revision, parent).
  pub(crate) fn signals(&self) -> Vec<(u32, MenuId)> {
    self.signals.lock().clone()
  }

  pub(crate) fn removed(&self) -> Vec<String> {
    self.removed.lock().clone()
  }
}

impl MenuBus for RecordingBus {
  fn add_handler(&self, path: &str, handler: Arc<dyn MenuHandler>) {
    self.handlers.lock().insert(path.to_owned(), handler);
  }

  fn remove_handler(&self, path: &str) {
    self.handlers.lock().remove(path);
    self.removed.lock().push(path.to_owned());
  }

  fn layout_updated(&self, _path: &str, revision: u32, parent: MenuId) {
    self.signals.lock().push((revision, parent));
  }
}

/// Registrar that records calls and can be told to fail.
#[derive(Default)]
pub(crate) struct RecordingRegistrar {
  fail: AtomicBool,
  registered: Mutex<Vec<(WindowId, String)>>,
  unregistered: Mutex<Vec<WindowId>>,
}

impl RecordingRegistrar {
  pub(crate) fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  /// A registrar whose calls all fail, like an absent shell service.
  pub(crate) fn failing() -> Arc<Self> {
    let registrar = Self::default();
    registrar.fail.store(true, Ordering::SeqCst);
    Arc::new(registrar)
  }

  pub(crate) fn registered(&self) -> Vec<(WindowId, String)> {
    self.registered.lock().clone()
  }

  pub(crate) fn unregistered(&self) -> Vec<WindowId> {
    self.unregistered.lock().clone()
  }
}

impl MenuRegistrar for RecordingRegistrar {
  fn register_window(&self, window: WindowId, path: &str) -> ExportResult<()> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(ExportError::Registrar("registrar unavailable".into()));
    }
    self.registered.lock().push((window, path.to_owned()));
    Ok(())
  }

  fn unregister_window(&self, window: WindowId) -> ExportResult<()> {
    self.unregistered.lock().push(window);
    if self.fail.load(Ordering::SeqCst) {
      return Err(ExportError::Registrar("registrar unavailable".into()));
    }
    Ok(())
  }
}

/// Encoder that tags the raw icon bytes with a `0xFF` prefix, so tests
/// can tell encoded output from raw payloads.
pub(crate) struct PrefixIconEncoder;

impl IconEncoder for PrefixIconEncoder {
  fn encode(&self, icon: &Icon) -> Option<Vec<u8>> {
    let mut encoded = vec![0xFF];
    encoded.extend_from_slice(icon.data());
    Some(encoded)
  }
}

/// A fully wired exporter over recording doubles.
pub(crate) struct TestRig {
  pub(crate) exporter: MenuExporter,
  pub(crate) bus: Arc<RecordingBus>,
  pub(crate) scheduler: Arc<ManualScheduler>,
}

impl TestRig {
  pub(crate) fn new() -> Self {
    Self::with_root(MenuTree::new())
  }

  pub(crate) fn with_root(root: Arc<MenuTree>) -> Self {
    Self::build(root, None, None)
  }

  pub(crate) fn with_icons(root: Arc<MenuTree>, icons: Arc<dyn IconEncoder>) -> Self {
    Self::build(root, Some(icons), None)
  }

  pub(crate) fn with_registrar(window: WindowId, registrar: Arc<RecordingRegistrar>) -> Self {
    Self::build(MenuTree::new(), None, Some((window, registrar)))
  }

  fn build(
    root: Arc<MenuTree>,
    icons: Option<Arc<dyn IconEncoder>>,
    registration: Option<(WindowId, Arc<RecordingRegistrar>)>,
  ) -> Self {
    let bus = RecordingBus::new();
    let scheduler = Arc::new(ManualScheduler::default());
    let mut builder = MenuExporter::builder()
      .bus(Arc::clone(&bus) as Arc<dyn MenuBus>)
      .root(root)
      .scheduler(Arc::clone(&scheduler) as Arc<dyn Scheduler>);
    if let Some(icons) = icons {
      builder = builder.icon_encoder(icons);
    }
    if let Some((window, registrar)) = registration {
      builder = builder
        .window(window)
        .registrar(registrar as Arc<dyn MenuRegistrar>);
    }
    let exporter = builder.build().unwrap();
    Self {
      exporter,
      bus,
      scheduler,
    }
  }

  /// The handler as the transport sees it.
  pub(crate) fn handler(&self) -> Arc<dyn MenuHandler> {
    self
      .bus
      .handler(self.exporter.object_path())
      .expect("handler bound on build")
  }

  /// Protocol id of `item`, serializing first so the id exists.
  pub(crate) fn id_of(&self, item: &MenuItem) -> MenuId {
    drop(self.handler().get_layout(MenuId::ROOT, -1, &[]));
    self
      .exporter
      .shared
      .state
      .lock()
      .registry
      .existing_id(item.node_id())
      .expect("item reachable from the root")
  }
}
