/*!
Wire values.

The menu bus addresses property bags whose values are a small closed set
of shapes: strings, booleans, 32-bit integers, raw byte payloads (icon
data), and the nested string-list shape used for keyboard shortcuts.
*/

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

/// Typed value carried in a layout property bag.
///
/// `StringLists` exists for exactly one property: `shortcut`, whose wire
/// shape is a list of key-stroke lists (each stroke being modifier names
/// followed by a key name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
  /// Text value (`label`, `type`, `toggle-type`, `children-display`).
  String(String),

  /// Boolean value (`enabled`, `visible`).
  Bool(bool),

  /// 32-bit integer value (`toggle-state`, the property fallback).
  Int32(i32),

  /// Raw byte payload (`icon-data`).
  Bytes(Vec<u8>),

  /// List of string lists (`shortcut`).
  StringLists(Vec<Vec<String>>),
}

impl Value {
  /// Get as string reference if this is a String value.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::String(s) => Some(s),
      Self::Bool(_) | Self::Int32(_) | Self::Bytes(_) | Self::StringLists(_) => None,
    }
  }

  /// Get as bool if this is a Bool value.
  pub const fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Bool(b) => Some(*b),
      Self::String(_) | Self::Int32(_) | Self::Bytes(_) | Self::StringLists(_) => None,
    }
  }

  /// Get as i32 if this is an Int32 value.
  pub const fn as_i32(&self) -> Option<i32> {
    match self {
      Self::Int32(n) => Some(*n),
      Self::String(_) | Self::Bool(_) | Self::Bytes(_) | Self::StringLists(_) => None,
    }
  }

  /// Get as byte slice if this is a Bytes value.
  pub fn as_bytes(&self) -> Option<&[u8]> {
    match self {
      Self::Bytes(b) => Some(b),
      Self::String(_) | Self::Bool(_) | Self::Int32(_) | Self::StringLists(_) => None,
    }
  }

  /// Get as string-list slice if this is a StringLists value.
  pub fn as_string_lists(&self) -> Option<&[Vec<String>]> {
    match self {
      Self::StringLists(lists) => Some(lists),
      Self::String(_) | Self::Bool(_) | Self::Int32(_) | Self::Bytes(_) => None,
    }
  }

  pub const fn is_string(&self) -> bool {
    matches!(self, Self::String(_))
  }

  pub const fn is_bool(&self) -> bool {
    matches!(self, Self::Bool(_))
  }

  pub const fn is_int32(&self) -> bool {
    matches!(self, Self::Int32(_))
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Self::String(s.to_owned())
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Self::String(s)
  }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self {
    Self::Bool(b)
  }
}

impl From<i32> for Value {
  fn from(n: i32) -> Self {
    Self::Int32(n)
  }
}

impl From<Vec<u8>> for Value {
  fn from(bytes: Vec<u8>) -> Self {
    Self::Bytes(bytes)
  }
}
