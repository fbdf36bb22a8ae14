use serde::{Deserialize, Serialize};

use super::ParameterType;

/// Which playable slot a behavior graph fills on the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    Base,
    Additive,
    Gesture,
    Action,
    Fx,
}

impl GraphKind {
    pub fn label(self) -> &'static str {
        match self {
            GraphKind::Base => "Base",
            GraphKind::Additive => "Additive",
            GraphKind::Gesture => "Gesture",
            GraphKind::Action => "Action",
            GraphKind::Fx => "FX",
        }
    }
}

/// A parameter declared by the graph itself (mirrors a directory entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ParameterType,
    #[serde(default)]
    pub default_bool: bool,
    #[serde(default)]
    pub default_int: i32,
    #[serde(default)]
    pub default_float: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateGraph {
    pub kind: GraphKind,
    #[serde(default)]
    pub parameters: Vec<GraphParameter>,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: f32,
    #[serde(default)]
    pub state_machine: StateMachine,
}

fn default_weight() -> f32 {
    1.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateMachine {
    #[serde(default)]
    pub states: Vec<StateNode>,
    #[serde(default)]
    pub any_state_transitions: Vec<Transition>,
}

/// Binds a playback property of a state to a parameter. The name is only
/// meaningful while `active` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamBinding {
    #[serde(default)]
    pub parameter: String,
    #[serde(default)]
    pub active: bool,
}

impl ParamBinding {
    pub fn is_unset(&self) -> bool {
        !self.active && self.parameter.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "ParamBinding::is_unset")]
    pub speed: ParamBinding,
    #[serde(default, skip_serializing_if = "ParamBinding::is_unset")]
    pub time: ParamBinding,
    #[serde(default, skip_serializing_if = "ParamBinding::is_unset")]
    pub mirror: ParamBinding,
    #[serde(default, skip_serializing_if = "ParamBinding::is_unset")]
    pub cycle_offset: ParamBinding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<Motion>,
    #[serde(default)]
    pub behaviours: Vec<Behaviour>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

impl StateNode {
    /// The blend tree key this state plays, if its motion is a blend tree.
    pub fn blend_tree(&self) -> Option<&str> {
        self.motion.as_ref().and_then(Motion::blend_tree)
    }
}

/// What a state or blend tree child plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    Clip(String),
    BlendTree(String),
}

impl Motion {
    pub fn blend_tree(&self) -> Option<&str> {
        match self {
            Motion::BlendTree(key) => Some(key),
            Motion::Clip(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Behaviour {
    ParameterDriver {
        #[serde(default)]
        entries: Vec<DriverEntry>,
    },
    /// Any behaviour that never references parameters.
    Other { script: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverOp {
    Set,
    Add,
    Random,
    Copy,
}

/// Writes into parameter `name`, optionally reading from parameter `source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    pub op: DriverOp,
    #[serde(default)]
    pub value: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    If,
    IfNot,
    Greater,
    Less,
    Equals,
    NotEqual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub parameter: String,
    pub mode: Comparator,
    #[serde(default)]
    pub threshold: f32,
}

/// Blends child motions on one or two parameters. Children that are
/// themselves blend trees are referenced by key and may alias an ancestor
/// in malformed data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlendTree {
    #[serde(default)]
    pub blend_parameter: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub blend_parameter_y: String,
    #[serde(default)]
    pub children: Vec<ChildMotion>,
}

impl BlendTree {
    pub fn child_trees(&self) -> impl Iterator<Item = &str> {
        self.children
            .iter()
            .filter_map(|c| c.motion.as_ref().and_then(Motion::blend_tree))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildMotion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<Motion>,
    #[serde(default)]
    pub threshold: f32,
}
