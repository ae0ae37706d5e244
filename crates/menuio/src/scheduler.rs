/*!
Scheduling seam for the consumer-facing event loop.

The bridge needs two things from its host: a serialized queue to defer
debounced layout resets onto (`post`), and a place to park fire-and-forget
registrar calls that must never block that queue (`spawn`). Embedders with
a real UI loop implement [`Scheduler`] over it; [`LoopScheduler`] is the
default for everyone else, backed by a dedicated worker thread that drains
posted tasks in order and stops when dropped.
*/

use crate::types::{ExportError, ExportResult};
use parking_lot::Mutex;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce() + Send>;

/// Host event-loop abstraction consumed by the bridge.
pub trait Scheduler: Send + Sync {
  /// Queue `task` behind previously posted tasks. Posted tasks run
  /// strictly one at a time, in order.
  fn post(&self, task: Task);

  /// Run `task` detached from the loop. Used only for registrar calls,
  /// whose completion nothing awaits.
  fn spawn(&self, name: &str, task: Task);
}

/// Default [`Scheduler`]: one named worker thread fed by a channel.
///
/// Dropping the scheduler closes the channel and joins the worker, so
/// every task posted before the drop still runs.
pub struct LoopScheduler {
  tx: Mutex<Option<mpsc::Sender<Task>>>,
  worker: Mutex<Option<JoinHandle<()>>>,
}

impl LoopScheduler {
  /// Start the worker thread.
  pub fn new() -> ExportResult<Self> {
    let (tx, rx) = mpsc::channel::<Task>();
    let worker = thread::Builder::new()
      .name("menuio-loop".into())
      .spawn(move || {
        while let Ok(task) = rx.recv() {
          task();
        }
        log::debug!("menuio loop thread exiting");
      })
      .map_err(|e| ExportError::Scheduler(e.to_string()))?;

    Ok(Self {
      tx: Mutex::new(Some(tx)),
      worker: Mutex::new(Some(worker)),
    })
  }
}

impl Scheduler for LoopScheduler {
  fn post(&self, task: Task) {
    let sent = match self.tx.lock().as_ref() {
      Some(tx) => tx.send(task).is_ok(),
      None => false,
    };
    if !sent {
      log::warn!("task posted to a stopped loop scheduler, dropping it");
    }
  }

  fn spawn(&self, name: &str, task: Task) {
    let spawned = thread::Builder::new().name(name.into()).spawn(task);
    if let Err(e) = spawned {
      log::warn!("failed to spawn detached task {name}: {e}");
    }
  }
}

impl Drop for LoopScheduler {
  fn drop(&mut self) {
    // Closing the channel ends the worker's recv loop.
    drop(self.tx.lock().take());
    if let Some(worker) = self.worker.lock().take() {
      if worker.join().is_err() {
        log::error!("menuio loop thread panicked");
      }
    }
  }
}

impl std::fmt::Debug for LoopScheduler {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LoopScheduler").finish_non_exhaustive()
  }
}
