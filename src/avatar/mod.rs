#[cfg(test)]
pub mod fixtures;
pub mod graph;
pub mod menu;
pub mod subject;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use graph::*;
pub use menu::*;
pub use subject::{ResolveError, Subject};

/// Menu pages keyed by name. A submenu control refers to its page by key.
pub type MenuPages = IndexMap<String, MenuPage>;

/// Blend trees keyed by name. Motions refer to a tree by key, so several
/// states or parent trees may share (alias) the same tree.
pub type BlendTrees = IndexMap<String, BlendTree>;

/// One subject: its parameter directory, menus and behavior graphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_menu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterDirectory>,
    #[serde(default)]
    pub menus: MenuPages,
    #[serde(default)]
    pub graphs: Vec<StateGraph>,
    #[serde(default)]
    pub blend_trees: BlendTrees,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    Bool,
    Int,
    Float,
}

impl ParameterType {
    pub fn label(self) -> &'static str {
        match self {
            ParameterType::Bool => "bool",
            ParameterType::Int => "int",
            ParameterType::Float => "float",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ParameterType,
    #[serde(default)]
    pub default: f32,
    #[serde(default = "default_true")]
    pub saved: bool,
    #[serde(default = "default_true")]
    pub synced: bool,
}

fn default_true() -> bool {
    true
}

/// Flat, ordered list of declared parameters. Order is display order only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterDirectory {
    pub parameters: Vec<Parameter>,
}

impl ParameterDirectory {
    pub fn contains(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}
