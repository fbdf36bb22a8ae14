use indexmap::IndexSet;

use crate::avatar::{BlendTrees, StateGraph};

use super::{blend, AffectedObjects, ObjectId};

/// Enumerate the structural objects of `graphs` in document order.
///
/// Per graph: the graph, then per layer the layer and its state machine,
/// each state followed by its behaviours and transitions, then the layer's
/// any-state transitions. A state whose motion is a blend tree is followed
/// by `ObjectId::BlendTree(root)` for that root only; nested trees are left
/// to [`blend::collect`].
pub fn walk(graphs: &[StateGraph]) -> Vec<ObjectId> {
    let mut out = Vec::new();
    for (g, graph) in graphs.iter().enumerate() {
        out.push(ObjectId::Graph { graph: g });
        for (l, layer) in graph.layers.iter().enumerate() {
            out.push(ObjectId::Layer { graph: g, layer: l });
            out.push(ObjectId::StateMachine { graph: g, layer: l });

            let machine = &layer.state_machine;
            for (s, state) in machine.states.iter().enumerate() {
                out.push(ObjectId::State {
                    graph: g,
                    layer: l,
                    state: s,
                });
                out.extend((0..state.behaviours.len()).map(|b| ObjectId::Behaviour {
                    graph: g,
                    layer: l,
                    state: s,
                    behaviour: b,
                }));
                out.extend((0..state.transitions.len()).map(|t| ObjectId::Transition {
                    graph: g,
                    layer: l,
                    state: s,
                    transition: t,
                }));
                if let Some(root) = state.blend_tree() {
                    out.push(ObjectId::BlendTree(root.to_string()));
                }
            }
            out.extend(
                (0..machine.any_state_transitions.len()).map(|t| ObjectId::AnyStateTransition {
                    graph: g,
                    layer: l,
                    transition: t,
                }),
            );
        }
    }
    out
}

/// Everything a rename may write to, for snapshotting before it runs.
///
/// The directory, every page in `menu_pages`, and every object [`walk`]
/// yields with blend tree roots expanded to all trees reachable from them.
/// Independent of whether anything references a particular parameter.
pub fn collect_all(
    graphs: &[StateGraph],
    blend_trees: &BlendTrees,
    menu_pages: &IndexSet<String>,
) -> AffectedObjects {
    let mut affected = AffectedObjects::new();
    affected.insert(ObjectId::Directory);
    affected.extend(menu_pages.iter().cloned().map(ObjectId::MenuPage));

    let mut visited = IndexSet::new();
    for id in walk(graphs) {
        match id {
            ObjectId::BlendTree(root) => {
                let start = visited.len();
                blend::collect(blend_trees, &root, &mut visited);
                for key in visited.iter().skip(start) {
                    affected.insert(ObjectId::BlendTree(key.clone()));
                }
            }
            other => {
                affected.insert(other);
            }
        }
    }
    log::debug!("collected {} objects for snapshot", affected.len());
    affected
}
