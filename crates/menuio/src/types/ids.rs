/*! Branded ID types for type-safe entity references. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Protocol-facing menu id.
///
/// Small positive integer addressing one exported node. `MenuId::ROOT`
/// (zero) addresses the root tree itself and is never allocated to a node.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
pub struct MenuId(pub i32);

impl MenuId {
  /// The reserved id of the root tree.
  pub const ROOT: Self = Self(0);

  /// Whether this id addresses the root tree.
  pub const fn is_root(self) -> bool {
    self.0 == 0
  }
}

/// Identity token for a menu item.
///
/// Assigned once at construction and never reused, so registries can key
/// items by value without tying themselves to pointer identity.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
pub struct NodeId(pub u64);

/// Global counter for `NodeId` generation. Starts at 1 (0 could be confused with "null").
static NODE_COUNTER: AtomicU64 = AtomicU64::new(1);

impl NodeId {
  /// Generate a new unique `NodeId`.
  pub fn new() -> Self {
    Self(NODE_COUNTER.fetch_add(1, Ordering::Relaxed))
  }
}

impl Default for NodeId {
  fn default() -> Self {
    Self::new()
  }
}

/// Identity token for a menu tree, with the same guarantees as [`NodeId`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
pub struct TreeId(pub u64);

static TREE_COUNTER: AtomicU64 = AtomicU64::new(1);

impl TreeId {
  /// Generate a new unique `TreeId`.
  pub fn new() -> Self {
    Self(TREE_COUNTER.fetch_add(1, Ordering::Relaxed))
  }
}

impl Default for TreeId {
  fn default() -> Self {
    Self::new()
  }
}

/// Window-system handle used when registering an application menu with an
/// external registrar.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
pub struct WindowId(pub u32);
