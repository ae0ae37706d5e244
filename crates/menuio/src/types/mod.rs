/*! Core types for menuio. */

mod error;
mod ids;

pub use error::{ExportError, ExportResult};
pub use ids::{MenuId, NodeId, TreeId, WindowId};
