//! Pre-mutation record of an affected-object set, for undo.
//!
//! Each object is recorded shallowly: its own fields, not the objects it
//! owns (those have their own ids) and not arena children (those are edges,
//! copied as keys). Restoring therefore only reverts what the set names.

use crate::avatar::{
    Behaviour, BlendTree, GraphKind, GraphParameter, MenuControl, Motion, ParamBinding, Parameter,
    StateGraph, StateNode, Subject, Transition,
};

use super::{AffectedObjects, ObjectId};

#[derive(Debug, Clone)]
enum Record {
    Directory(Vec<Parameter>),
    MenuPage(Vec<MenuControl>),
    Graph {
        kind: GraphKind,
        parameters: Vec<GraphParameter>,
    },
    Layer {
        name: String,
        weight: f32,
    },
    StateMachine,
    State(StateFields),
    Behaviour(Behaviour),
    Transition(Transition),
    BlendTree(BlendTree),
}

#[derive(Debug, Clone)]
struct StateFields {
    name: String,
    speed: ParamBinding,
    time: ParamBinding,
    mirror: ParamBinding,
    cycle_offset: ParamBinding,
    motion: Option<Motion>,
}

impl StateFields {
    fn of(node: &StateNode) -> Self {
        Self {
            name: node.name.clone(),
            speed: node.speed.clone(),
            time: node.time.clone(),
            mirror: node.mirror.clone(),
            cycle_offset: node.cycle_offset.clone(),
            motion: node.motion.clone(),
        }
    }

    fn apply(self, node: &mut StateNode) {
        node.name = self.name;
        node.speed = self.speed;
        node.time = self.time;
        node.mirror = self.mirror;
        node.cycle_offset = self.cycle_offset;
        node.motion = self.motion;
    }
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub label: String,
    records: Vec<(ObjectId, Record)>,
}

impl Snapshot {
    /// Record every object of `affected` that exists in `subject`.
    pub fn capture(subject: &Subject<'_>, affected: &AffectedObjects, label: &str) -> Self {
        let records: Vec<_> = affected
            .iter()
            .filter_map(|id| record(subject, id).map(|r| (id.clone(), r)))
            .collect();
        log::debug!("snapshot \"{label}\": {} objects", records.len());
        Self {
            label: label.to_string(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Write the recorded state back. Objects that no longer exist are
    /// skipped.
    pub fn restore(self, subject: &mut Subject<'_>) {
        log::info!("undo \"{}\" ({} objects)", self.label, self.records.len());
        for (id, record) in self.records {
            apply(subject, &id, record);
        }
    }
}

fn state<'g>(graphs: &'g [StateGraph], g: usize, l: usize, s: usize) -> Option<&'g StateNode> {
    graphs.get(g)?.layers.get(l)?.state_machine.states.get(s)
}

fn state_mut<'g>(
    graphs: &'g mut [StateGraph],
    g: usize,
    l: usize,
    s: usize,
) -> Option<&'g mut StateNode> {
    graphs
        .get_mut(g)?
        .layers
        .get_mut(l)?
        .state_machine
        .states
        .get_mut(s)
}

fn record(subject: &Subject<'_>, id: &ObjectId) -> Option<Record> {
    let graphs = &*subject.graphs;
    let record = match *id {
        ObjectId::Directory => Record::Directory(subject.parameters.parameters.clone()),
        ObjectId::MenuPage(ref key) => Record::MenuPage(subject.menus.get(key)?.controls.clone()),
        ObjectId::Graph { graph } => {
            let graph = graphs.get(graph)?;
            Record::Graph {
                kind: graph.kind,
                parameters: graph.parameters.clone(),
            }
        }
        ObjectId::Layer { graph, layer } => {
            let layer = graphs.get(graph)?.layers.get(layer)?;
            Record::Layer {
                name: layer.name.clone(),
                weight: layer.weight,
            }
        }
        ObjectId::StateMachine { graph, layer } => {
            graphs.get(graph)?.layers.get(layer)?;
            Record::StateMachine
        }
        ObjectId::State {
            graph,
            layer,
            state: s,
        } => Record::State(StateFields::of(state(graphs, graph, layer, s)?)),
        ObjectId::Behaviour {
            graph,
            layer,
            state: s,
            behaviour,
        } => Record::Behaviour(
            state(graphs, graph, layer, s)?
                .behaviours
                .get(behaviour)?
                .clone(),
        ),
        ObjectId::Transition {
            graph,
            layer,
            state: s,
            transition,
        } => Record::Transition(
            state(graphs, graph, layer, s)?
                .transitions
                .get(transition)?
                .clone(),
        ),
        ObjectId::AnyStateTransition {
            graph,
            layer,
            transition,
        } => Record::Transition(
            graphs
                .get(graph)?
                .layers
                .get(layer)?
                .state_machine
                .any_state_transitions
                .get(transition)?
                .clone(),
        ),
        ObjectId::BlendTree(ref key) => Record::BlendTree(subject.blend_trees.get(key)?.clone()),
    };
    Some(record)
}

fn apply(subject: &mut Subject<'_>, id: &ObjectId, record: Record) -> Option<()> {
    let graphs = &mut *subject.graphs;
    match (id, record) {
        (ObjectId::Directory, Record::Directory(parameters)) => {
            subject.parameters.parameters = parameters;
        }
        (ObjectId::MenuPage(key), Record::MenuPage(controls)) => {
            subject.menus.get_mut(key)?.controls = controls;
        }
        (&ObjectId::Graph { graph }, Record::Graph { kind, parameters }) => {
            let graph = graphs.get_mut(graph)?;
            graph.kind = kind;
            graph.parameters = parameters;
        }
        (&ObjectId::Layer { graph, layer }, Record::Layer { name, weight }) => {
            let layer = graphs.get_mut(graph)?.layers.get_mut(layer)?;
            layer.name = name;
            layer.weight = weight;
        }
        (ObjectId::StateMachine { .. }, Record::StateMachine) => {}
        (
            &ObjectId::State {
                graph,
                layer,
                state,
            },
            Record::State(fields),
        ) => fields.apply(state_mut(graphs, graph, layer, state)?),
        (
            &ObjectId::Behaviour {
                graph,
                layer,
                state,
                behaviour,
            },
            Record::Behaviour(saved),
        ) => {
            *state_mut(graphs, graph, layer, state)?
                .behaviours
                .get_mut(behaviour)? = saved;
        }
        (
            &ObjectId::Transition {
                graph,
                layer,
                state,
                transition,
            },
            Record::Transition(saved),
        ) => {
            *state_mut(graphs, graph, layer, state)?
                .transitions
                .get_mut(transition)? = saved;
        }
        (
            &ObjectId::AnyStateTransition {
                graph,
                layer,
                transition,
            },
            Record::Transition(saved),
        ) => {
            *graphs
                .get_mut(graph)?
                .layers
                .get_mut(layer)?
                .state_machine
                .any_state_transitions
                .get_mut(transition)? = saved;
        }
        (ObjectId::BlendTree(key), Record::BlendTree(saved)) => {
            *subject.blend_trees.get_mut(key)? = saved;
        }
        (id, _) => log::error!("snapshot record does not match {id}"),
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::fixtures::sample_avatar;
    use crate::rename::{engine, graph, menu};

    fn rename_and_undo(from: &str, to: &str) {
        let original = sample_avatar();
        let mut avatar = original.clone();
        {
            let mut subject = Subject::resolve(&mut avatar).unwrap();
            let working = menu::find_references(subject.menus, &subject.pages, from);
            let affected = graph::collect_all(subject.graphs, subject.blend_trees, &working);
            let snapshot = Snapshot::capture(&subject, &affected, "rename");
            assert_eq!(snapshot.len(), affected.len());

            let outcome = engine::rename(&mut subject, &working, from, to).unwrap();
            assert!(!outcome.edits.is_empty());
            snapshot.restore(&mut subject);
        }
        assert_eq!(avatar, original);
    }

    #[test]
    fn undo_restores_every_rename() {
        for from in ["Visor", "Hat", "Speed", "LookX", "LookY"] {
            rename_and_undo(from, "Renamed");
        }
    }

    #[test]
    fn partial_snapshot_misses_writes() {
        let original = sample_avatar();
        let mut avatar = original.clone();
        {
            let mut subject = Subject::resolve(&mut avatar).unwrap();
            let working = menu::find_references(subject.menus, &subject.pages, "Speed");
            let only_directory: AffectedObjects = [ObjectId::Directory].into_iter().collect();
            let snapshot = Snapshot::capture(&subject, &only_directory, "partial");
            engine::rename(&mut subject, &working, "Speed", "Velocity").unwrap();
            snapshot.restore(&mut subject);
        }
        assert!(avatar.parameters.as_ref().unwrap().contains("Speed"));
        assert_ne!(avatar, original);
        assert_eq!(avatar.blend_trees["Loco"].blend_parameter, "Velocity");
    }

    #[test]
    fn missing_objects_are_not_recorded() {
        let mut avatar = sample_avatar();
        let subject = Subject::resolve(&mut avatar).unwrap();
        let ids: AffectedObjects = [
            ObjectId::MenuPage("Gone".into()),
            ObjectId::BlendTree("Gone".into()),
            ObjectId::State {
                graph: 9,
                layer: 0,
                state: 0,
            },
        ]
        .into_iter()
        .collect();
        assert_eq!(Snapshot::capture(&subject, &ids, "none").len(), 0);
    }
}
