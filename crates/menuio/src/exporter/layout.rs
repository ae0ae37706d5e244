/*!
Subtree serialization into wire layout records.

Projection is per (variant, property) pair: a pair with no rule omits the
property rather than emitting a default. Separators project only `type`;
the root record projects an empty bag. Serialization is the lazy half of
id tracking: every node touched here that the registry has not seen gets
an id allocated and its change feeds wired up, and stays tracked until
the next reset.
*/

use super::{Shared, State};
use crate::bus::IconEncoder;
use crate::model::{ChangeFn, MenuItem, MenuTree, ToggleKind};
use crate::types::MenuId;
use crate::wire::{property, Layout, Properties, Value};
use std::sync::Arc;

/// Placeholder label for items without one, straight from the protocol's
/// reference exporter.
const NULL_LABEL: &str = "<null>";

impl Shared {
  /// Serialize the subtree under `parent`. Negative depth means
  /// unlimited; an empty name list means the full default set. Returns
  /// the revision the record was built against.
  pub(crate) fn layout(self: &Arc<Self>, parent: MenuId, depth: i32, names: &[String]) -> (u32, Layout) {
    let on_change = self.change_callback();
    let names = effective_names(names);
    let icons = self.icons.as_deref();

    let mut state = self.state.lock();
    let (item, menu) = state.resolve(parent);
    let layout = serialize(
      &mut state,
      item.as_ref(),
      menu.as_ref(),
      depth,
      &names,
      &on_change,
      icons,
    );
    (state.revision, layout)
  }

  /// Property bags for a batch of ids. Pure read: no ids are allocated.
  pub(crate) fn group_properties(&self, ids: &[MenuId], names: &[String]) -> Vec<(MenuId, Properties)> {
    let names = effective_names(names);
    let icons = self.icons.as_deref();

    let state = self.state.lock();
    ids
      .iter()
      .map(|&id| {
        let (item, menu) = state.resolve(id);
        (id, bag(item.as_deref(), menu.as_deref(), &names, icons))
      })
      .collect()
  }

  /// A single property value, `Int32(0)` when no projection applies.
  pub(crate) fn property(&self, id: MenuId, name: &str) -> Value {
    let icons = self.icons.as_deref();
    let state = self.state.lock();
    let (item, menu) = state.resolve(id);
    project(item.as_deref(), menu.as_deref(), name, icons).unwrap_or(Value::Int32(0))
  }
}

/// Substitute the full default set for an empty filter.
fn effective_names(names: &[String]) -> Vec<&str> {
  if names.is_empty() {
    property::DEFAULT_SET.to_vec()
  } else {
    names.iter().map(String::as_str).collect()
  }
}

fn serialize(
  state: &mut State,
  item: Option<&Arc<MenuItem>>,
  menu: Option<&Arc<MenuTree>>,
  depth: i32,
  names: &[&str],
  on_change: &ChangeFn,
  icons: Option<&dyn IconEncoder>,
) -> Layout {
  let id = match item {
    Some(item) => state.id_for(item, on_change),
    None => MenuId::ROOT,
  };
  let properties = bag(item.map(|i| &**i), menu.map(|m| &**m), names, icons);

  let mut children = Vec::new();
  if depth != 0 {
    if let Some(menu) = menu {
      for child in menu.items() {
        let submenu = child.submenu_tree();
        let child_depth = if depth < 0 { depth } else { depth - 1 };
        children.push(serialize(
          state,
          Some(&child),
          submenu.as_ref(),
          child_depth,
          names,
          on_change,
          icons,
        ));
      }
    }
  }

  Layout {
    id,
    properties,
    children,
  }
}

fn bag(
  item: Option<&MenuItem>,
  menu: Option<&MenuTree>,
  names: &[&str],
  icons: Option<&dyn IconEncoder>,
) -> Properties {
  let mut properties = Properties::new();
  for name in names {
    if let Some(value) = project(item, menu, name, icons) {
      properties.insert((*name).to_owned(), value);
    }
  }
  properties
}

fn project(
  item: Option<&MenuItem>,
  menu: Option<&MenuTree>,
  name: &str,
  icons: Option<&dyn IconEncoder>,
) -> Option<Value> {
  let item = item?;

  if item.is_separator() {
    return (name == property::TYPE).then(|| Value::from("separator"));
  }

  match name {
    property::LABEL => Some(Value::String(
      item.label().unwrap_or_else(|| NULL_LABEL.to_owned()),
    )),
    property::ENABLED => {
      if menu.is_some_and(MenuTree::is_empty) {
        return Some(Value::Bool(false));
      }
      if !item.is_enabled() {
        return Some(Value::Bool(false));
      }
      None
    }
    property::VISIBLE => Some(Value::Bool(item.is_visible())),
    property::SHORTCUT => {
      let accelerator = item.accelerator()?;
      if accelerator.modifiers.is_empty() {
        return None;
      }
      let mut stroke: Vec<String> = accelerator
        .modifiers
        .names()
        .into_iter()
        .map(str::to_owned)
        .collect();
      stroke.push(accelerator.key);
      Some(Value::StringLists(vec![stroke]))
    }
    property::TOGGLE_TYPE => match item.toggle() {
      ToggleKind::Checkbox => Some(Value::from("checkmark")),
      ToggleKind::Radio => Some(Value::from("radio")),
      ToggleKind::None => None,
    },
    property::TOGGLE_STATE => {
      (item.toggle() != ToggleKind::None).then(|| Value::Int32(i32::from(item.is_checked())))
    }
    property::ICON_DATA => {
      let icon = item.icon()?;
      icons?.encode(&icon).map(Value::Bytes)
    }
    property::CHILDREN_DISPLAY => menu.map(|_| Value::from("submenu")),
    // `type` for non-separators, and anything unrecognized: no rule.
    _ => None,
  }
}
