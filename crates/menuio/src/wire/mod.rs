/*!
Wire vocabulary of the menu bus: property values and layout records.

These shapes are what a transport adapter marshals onto the actual IPC
connection; the bridge itself only produces and consumes them.
*/

mod layout;
mod value;

pub use layout::{property, Layout, Properties};
pub use value::Value;
