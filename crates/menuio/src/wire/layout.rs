/*!
Layout records.

A [`Layout`] is the serialized form of one subtree: the node's protocol
id, its property bag, and one nested record per child.
*/

use super::value::Value;
use crate::types::MenuId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Property bag of one layout record: wire property name to value.
///
/// Ordered map so serialized output is deterministic.
pub type Properties = BTreeMap<String, Value>;

/// Wire property names understood by the menu bus.
pub mod property {
  /// `"separator"` for separator nodes; absent for normal nodes.
  pub const TYPE: &str = "type";
  /// Display text; a placeholder is substituted when unset.
  pub const LABEL: &str = "label";
  /// Present (false) only when the node is effectively disabled.
  pub const ENABLED: &str = "enabled";
  /// Always present for non-separator nodes.
  pub const VISIBLE: &str = "visible";
  /// Key-stroke list; absent without modifiers.
  pub const SHORTCUT: &str = "shortcut";
  /// `"checkmark"` or `"radio"`; absent for plain actions.
  pub const TOGGLE_TYPE: &str = "toggle-type";
  /// `"submenu"` when a submenu is attached.
  pub const CHILDREN_DISPLAY: &str = "children-display";
  /// 1/0 for checked/unchecked; absent for plain actions.
  pub const TOGGLE_STATE: &str = "toggle-state";
  /// Encoded icon bytes; absent without an icon or encoder.
  pub const ICON_DATA: &str = "icon-data";

  /// The full default set, substituted when a query requests no names.
  pub const DEFAULT_SET: [&str; 9] = [
    TYPE,
    LABEL,
    ENABLED,
    VISIBLE,
    SHORTCUT,
    TOGGLE_TYPE,
    CHILDREN_DISPLAY,
    TOGGLE_STATE,
    ICON_DATA,
  ];
}

/// Serialized `(id, properties, children)` representation of a subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
  /// Protocol id of the node ([`MenuId::ROOT`] for the tree root).
  pub id: MenuId,
  /// Property bag per the requested name filter.
  pub properties: Properties,
  /// One record per child, empty at the depth limit.
  pub children: Vec<Layout>,
}

impl Layout {
  /// An empty record addressing the root. The answer a disposed bridge
  /// gives to layout queries.
  pub fn empty() -> Self {
    Self {
      id: MenuId::ROOT,
      properties: Properties::new(),
      children: Vec::new(),
    }
  }

  /// Total number of records in this subtree, itself included.
  pub fn record_count(&self) -> usize {
    1 + self
      .children
      .iter()
      .map(Layout::record_count)
      .sum::<usize>()
  }

  /// Depth of this subtree: 0 for a leaf record.
  pub fn depth(&self) -> usize {
    self
      .children
      .iter()
      .map(|child| child.depth() + 1)
      .max()
      .unwrap_or(0)
  }
}

impl Default for Layout {
  fn default() -> Self {
    Self::empty()
  }
}
