/*!
The menu model owned by the embedding application.

The export bridge never mutates this model: it observes structural and
attribute change feeds and reads current values at serialization time.
Items and trees are shared as `Arc`s; the bridge holds only weak
references to them.
*/

mod item;
mod observe;
mod tree;

pub(crate) use observe::ChangeFn;

pub use item::{Accelerator, Icon, MenuItem, Modifiers, ToggleKind};
pub use observe::Subscription;
pub use tree::MenuTree;
