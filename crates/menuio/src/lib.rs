/*!
Menuio - menu export bridge for id-addressed menu buses

Projects an in-process, mutable menu model onto a remote consumer that
speaks a flat, id-addressed IPC menu protocol.

```ignore
use menuio::{MenuExporter, MenuItem, MenuTree};

// The application owns the model; the bridge only observes it.
let root = MenuTree::new();
let open = MenuItem::action("Open");
open.on_activate(|| println!("open!"));
root.push(open);

// Bind to a transport (anything implementing menuio::bus::MenuBus).
let exporter = MenuExporter::builder()
    .bus(bus)
    .root(root)
    .window(window_id)      // app-menu mode; omit for a detached menu
    .registrar(registrar)   // optional shell integration
    .build()?;

// Mutate the model freely; bursts coalesce into single layout resets.
exporter.root().push(MenuItem::separator());

// Watch the bridge itself
let mut events = exporter.subscribe();
while let Ok(event) = events.recv().await {
    // ExporterEvent::Exported / ExporterEvent::LayoutReset { revision }
}

// Teardown is exactly-once and also happens on drop.
exporter.dispose();
```
*/

mod exporter;
mod scheduler;

pub mod bus;
pub mod model;
pub mod wire;

mod types;
pub use types::*;

pub use crate::exporter::{ExporterEvent, MenuExporter, MenuExporterBuilder};
pub use crate::model::{MenuItem, MenuTree};
pub use crate::scheduler::{LoopScheduler, Scheduler, Task};
