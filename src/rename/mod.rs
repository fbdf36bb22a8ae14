//! Parameter reference discovery and rewrite.
//!
//! The walkers in [`menu`], [`blend`] and [`graph`] only read. [`engine`] is
//! the single writer; [`snapshot`] records and restores whatever the
//! affected-object set names.

pub mod blend;
pub mod engine;
pub mod graph;
pub mod menu;
pub mod snapshot;

use std::fmt;

use indexmap::IndexSet;
use thiserror::Error;

pub use engine::rename;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenameError {
    #[error("parameter \"{0}\" does not exist")]
    ParameterNotFound(String),
    #[error("new parameter name can't be empty")]
    EmptyName,
    #[error("parameter name \"{0}\" is already used")]
    NameConflict(String),
}

/// Identity of one structural object inside a subject.
///
/// Arena objects (menu pages, blend trees) are identified by key, owned
/// objects by their index path from the graph list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectId {
    Directory,
    MenuPage(String),
    Graph {
        graph: usize,
    },
    Layer {
        graph: usize,
        layer: usize,
    },
    StateMachine {
        graph: usize,
        layer: usize,
    },
    State {
        graph: usize,
        layer: usize,
        state: usize,
    },
    Behaviour {
        graph: usize,
        layer: usize,
        state: usize,
        behaviour: usize,
    },
    Transition {
        graph: usize,
        layer: usize,
        state: usize,
        transition: usize,
    },
    AnyStateTransition {
        graph: usize,
        layer: usize,
        transition: usize,
    },
    BlendTree(String),
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectId::Directory => write!(f, "parameters"),
            ObjectId::MenuPage(key) => write!(f, "menu {key}"),
            ObjectId::Graph { graph } => write!(f, "graph {graph}"),
            ObjectId::Layer { graph, layer } => write!(f, "graph {graph} layer {layer}"),
            ObjectId::StateMachine { graph, layer } => {
                write!(f, "graph {graph} layer {layer} state machine")
            }
            ObjectId::State {
                graph,
                layer,
                state,
            } => write!(f, "graph {graph} layer {layer} state {state}"),
            ObjectId::Behaviour {
                graph,
                layer,
                state,
                behaviour,
            } => write!(
                f,
                "graph {graph} layer {layer} state {state} behaviour {behaviour}"
            ),
            ObjectId::Transition {
                graph,
                layer,
                state,
                transition,
            } => write!(
                f,
                "graph {graph} layer {layer} state {state} transition {transition}"
            ),
            ObjectId::AnyStateTransition {
                graph,
                layer,
                transition,
            } => write!(f, "graph {graph} layer {layer} any-state transition {transition}"),
            ObjectId::BlendTree(key) => write!(f, "blend tree {key}"),
        }
    }
}

/// Insertion-ordered set of object identities, owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffectedObjects {
    objects: IndexSet<ObjectId>,
}

impl AffectedObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the object was already present.
    pub fn insert(&mut self, id: ObjectId) -> bool {
        self.objects.insert(id)
    }

    #[cfg(test)]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectId> {
        self.objects.iter()
    }

    pub fn is_superset(&self, other: &AffectedObjects) -> bool {
        other.objects.is_subset(&self.objects)
    }
}

impl Extend<ObjectId> for AffectedObjects {
    fn extend<I: IntoIterator<Item = ObjectId>>(&mut self, iter: I) {
        self.objects.extend(iter);
    }
}

impl FromIterator<ObjectId> for AffectedObjects {
    fn from_iter<I: IntoIterator<Item = ObjectId>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}

/// A reference field inside an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ParameterName { index: usize },
    GraphParameterName { index: usize },
    ControlParameter { control: usize },
    ControlSubParameter { control: usize, index: usize },
    SpeedParameter,
    TimeParameter,
    MirrorParameter,
    CycleOffsetParameter,
    DriverName { entry: usize },
    DriverSource { entry: usize },
    Condition { index: usize },
    BlendParameter,
    BlendParameterY,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::ParameterName { index } => write!(f, "parameter #{index}"),
            Field::GraphParameterName { index } => write!(f, "declared parameter #{index}"),
            Field::ControlParameter { control } => write!(f, "control #{control} parameter"),
            Field::ControlSubParameter { control, index } => {
                write!(f, "control #{control} sub-parameter #{index}")
            }
            Field::SpeedParameter => write!(f, "speed parameter"),
            Field::TimeParameter => write!(f, "time parameter"),
            Field::MirrorParameter => write!(f, "mirror parameter"),
            Field::CycleOffsetParameter => write!(f, "cycle offset parameter"),
            Field::DriverName { entry } => write!(f, "driver entry #{entry} name"),
            Field::DriverSource { entry } => write!(f, "driver entry #{entry} source"),
            Field::Condition { index } => write!(f, "condition #{index}"),
            Field::BlendParameter => write!(f, "blend parameter"),
            Field::BlendParameterY => write!(f, "blend parameter Y"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub object: ObjectId,
    pub field: Field,
}

impl fmt::Display for FieldEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.object, self.field)
    }
}

/// Result of a completed rename.
#[derive(Debug, Clone, Default)]
pub struct RenameOutcome {
    /// Every object inspected, plus the directory and the graphs.
    pub affected: AffectedObjects,
    /// Every field that was rewritten, in rewrite order.
    pub edits: Vec<FieldEdit>,
}

impl RenameOutcome {
    pub fn written(&self) -> AffectedObjects {
        self.edits.iter().map(|e| e.object.clone()).collect()
    }
}
