use indexmap::IndexSet;

use crate::avatar::{Behaviour, StateGraph, Subject, Transition};

use super::{blend, graph, Field, FieldEdit, ObjectId, RenameError, RenameOutcome};

/// Rename parameter `from` to `to` in the directory, the pages of
/// `menu_working_set` and every behavior graph of `subject`.
///
/// All preconditions are checked before anything is written; on error the
/// subject is untouched. Once writing starts it runs to completion.
pub fn rename(
    subject: &mut Subject<'_>,
    menu_working_set: &IndexSet<String>,
    from: &str,
    to: &str,
) -> Result<RenameOutcome, RenameError> {
    if to.trim().is_empty() {
        return Err(RenameError::EmptyName);
    }
    if !subject.parameters.contains(from) {
        return Err(RenameError::ParameterNotFound(from.to_string()));
    }
    if subject.parameters.contains(to) {
        return Err(RenameError::NameConflict(to.to_string()));
    }

    let mut rw = Rewriter {
        from,
        to,
        outcome: RenameOutcome::default(),
    };

    rw.outcome.affected.insert(ObjectId::Directory);
    for (index, parameter) in subject.parameters.parameters.iter_mut().enumerate() {
        rw.replace(
            &mut parameter.name,
            ObjectId::Directory,
            Field::ParameterName { index },
        );
    }

    for key in menu_working_set {
        rw.outcome.affected.insert(ObjectId::MenuPage(key.clone()));
        let Some(page) = subject.menus.get_mut(key) else {
            continue;
        };
        for (control, entry) in page.controls.iter_mut().enumerate() {
            let id = || ObjectId::MenuPage(key.clone());
            rw.replace(&mut entry.parameter, id(), Field::ControlParameter { control });
            for (index, sub) in entry.sub_parameters.iter_mut().enumerate() {
                rw.replace(sub, id(), Field::ControlSubParameter { control, index });
            }
        }
    }

    let mut visited = IndexSet::new();
    for id in graph::walk(subject.graphs) {
        if let ObjectId::BlendTree(root) = &id {
            let start = visited.len();
            blend::rename(
                subject.blend_trees,
                root,
                &mut visited,
                from,
                to,
                &mut rw.outcome.edits,
            );
            for key in visited.iter().skip(start) {
                rw.outcome.affected.insert(ObjectId::BlendTree(key.clone()));
            }
            continue;
        }
        rw.rewrite(subject.graphs, &id);
        rw.outcome.affected.insert(id);
    }

    log::info!(
        "{}: renamed {from} -> {to} ({} fields in {} objects)",
        subject.name,
        rw.outcome.edits.len(),
        rw.outcome.affected.len()
    );
    Ok(rw.outcome)
}

struct Rewriter<'r> {
    from: &'r str,
    to: &'r str,
    outcome: RenameOutcome,
}

impl Rewriter<'_> {
    fn replace(&mut self, slot: &mut String, object: ObjectId, field: Field) {
        if slot.as_str() != self.from {
            return;
        }
        *slot = self.to.to_string();
        log::debug!("{object}: {field} -> {}", self.to);
        self.outcome.edits.push(FieldEdit { object, field });
    }

    /// Rewrite the reference fields owned directly by `id`.
    ///
    /// # Panics
    ///
    /// If `id` does not address an object in `graphs`, i.e. the graphs
    /// changed after they were walked.
    fn rewrite(&mut self, graphs: &mut [StateGraph], id: &ObjectId) {
        match *id {
            ObjectId::Graph { graph } => {
                let declared = &mut graphs[graph].parameters;
                if declared.iter().any(|p| p.name == self.to) {
                    log::warn!("{id} already declares {}", self.to);
                }
                for (index, parameter) in declared.iter_mut().enumerate() {
                    self.replace(
                        &mut parameter.name,
                        id.clone(),
                        Field::GraphParameterName { index },
                    );
                }
            }
            ObjectId::State {
                graph,
                layer,
                state,
            } => {
                let node = &mut graphs[graph].layers[layer].state_machine.states[state];
                let bindings = [
                    (&mut node.speed, Field::SpeedParameter),
                    (&mut node.time, Field::TimeParameter),
                    (&mut node.mirror, Field::MirrorParameter),
                    (&mut node.cycle_offset, Field::CycleOffsetParameter),
                ];
                for (binding, field) in bindings {
                    if binding.active {
                        self.replace(&mut binding.parameter, id.clone(), field);
                    }
                }
            }
            ObjectId::Behaviour {
                graph,
                layer,
                state,
                behaviour,
            } => {
                let node = &mut graphs[graph].layers[layer].state_machine.states[state];
                match &mut node.behaviours[behaviour] {
                    Behaviour::ParameterDriver { entries } => {
                        for (entry, driver) in entries.iter_mut().enumerate() {
                            self.replace(&mut driver.name, id.clone(), Field::DriverName { entry });
                            self.replace(
                                &mut driver.source,
                                id.clone(),
                                Field::DriverSource { entry },
                            );
                        }
                    }
                    Behaviour::Other { .. } => {}
                }
            }
            ObjectId::Transition {
                graph,
                layer,
                state,
                transition,
            } => {
                let node = &mut graphs[graph].layers[layer].state_machine.states[state];
                self.conditions(&mut node.transitions[transition], id);
            }
            ObjectId::AnyStateTransition {
                graph,
                layer,
                transition,
            } => {
                let machine = &mut graphs[graph].layers[layer].state_machine;
                self.conditions(&mut machine.any_state_transitions[transition], id);
            }
            ObjectId::Directory
            | ObjectId::MenuPage(_)
            | ObjectId::Layer { .. }
            | ObjectId::StateMachine { .. }
            | ObjectId::BlendTree(_) => {}
        }
    }

    fn conditions(&mut self, transition: &mut Transition, id: &ObjectId) {
        for (index, condition) in transition.conditions.iter_mut().enumerate() {
            self.replace(&mut condition.parameter, id.clone(), Field::Condition { index });
        }
    }
}
