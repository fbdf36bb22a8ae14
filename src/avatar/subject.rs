use thiserror::Error;

use crate::rename::menu::{self, MenuCycle};
use crate::rename::ObjectId;

use super::{Avatar, BlendTrees, GraphKind, MenuPages, ParameterDirectory, StateGraph};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("the scene contains no avatars")]
    NoAvatars,
    #[error("avatar \"{0}\" not found in the scene")]
    AvatarNotFound(String),
    #[error("the scene contains several avatars ({0}); pick one with --avatar")]
    AmbiguousAvatar(String),
    #[error("can't find a {0} on the avatar, please add one")]
    MissingRequiredGraph(&'static str),
    #[error(transparent)]
    MenuCycle(#[from] MenuCycle),
}

/// Everything a rename needs from one avatar, borrowed mutably field by
/// field so the engine can read menus while rewriting graphs.
pub struct Subject<'a> {
    pub name: &'a str,
    pub root_menu: &'a str,
    /// The root page followed by every page reachable from it.
    pub pages: Vec<String>,
    pub parameters: &'a mut ParameterDirectory,
    pub menus: &'a mut MenuPages,
    pub graphs: &'a mut [StateGraph],
    pub blend_trees: &'a mut BlendTrees,
}

impl<'a> Subject<'a> {
    /// Check that `avatar` has a directory, an FX graph declaring parameters
    /// and an acyclic menu tree rooted at a known page.
    pub fn resolve(avatar: &'a mut Avatar) -> Result<Self, ResolveError> {
        let Avatar {
            name,
            root_menu,
            parameters,
            menus,
            graphs,
            blend_trees,
        } = avatar;

        let parameters = parameters
            .as_mut()
            .ok_or(ResolveError::MissingRequiredGraph("parameter directory"))?;

        let has_fx = graphs
            .iter()
            .any(|g| g.kind == GraphKind::Fx && !g.parameters.is_empty());
        if !has_fx {
            return Err(ResolveError::MissingRequiredGraph("FX graph"));
        }

        let root_menu = root_menu
            .as_deref()
            .filter(|key| menus.contains_key(*key))
            .ok_or(ResolveError::MissingRequiredGraph("root menu"))?;

        warn_dangling(name, menus, graphs, blend_trees);
        let pages = menu::all_pages(menus, root_menu)?;

        Ok(Self {
            name: name.as_str(),
            root_menu,
            pages,
            parameters,
            menus,
            graphs,
            blend_trees,
        })
    }

    /// Human-readable location of `id`, using object names where known.
    pub fn describe(&self, id: &ObjectId) -> String {
        let layer_path = |g: usize, l: usize| -> Option<String> {
            let graph = self.graphs.get(g)?;
            let layer = graph.layers.get(l)?;
            Some(format!("{} / {}", graph.kind.label(), layer.name))
        };
        let state_path = |g: usize, l: usize, s: usize| -> Option<String> {
            let state = self.graphs.get(g)?.layers.get(l)?.state_machine.states.get(s)?;
            Some(format!("{} / {}", layer_path(g, l)?, state.name))
        };
        let described = match *id {
            ObjectId::Directory => Some("parameter list".to_string()),
            ObjectId::MenuPage(ref key) => Some(format!("menu \"{key}\"")),
            ObjectId::Graph { graph } => self
                .graphs
                .get(graph)
                .map(|g| format!("{} graph", g.kind.label())),
            ObjectId::Layer { graph, layer } => layer_path(graph, layer),
            ObjectId::StateMachine { graph, layer } => {
                layer_path(graph, layer).map(|p| format!("{p} state machine"))
            }
            ObjectId::State {
                graph,
                layer,
                state,
            } => state_path(graph, layer, state),
            ObjectId::Behaviour {
                graph,
                layer,
                state,
                behaviour,
            } => state_path(graph, layer, state).map(|p| format!("{p} behaviour {behaviour}")),
            ObjectId::Transition {
                graph,
                layer,
                state,
                transition,
            } => state_path(graph, layer, state).map(|p| format!("{p} transition {transition}")),
            ObjectId::AnyStateTransition {
                graph,
                layer,
                transition,
            } => layer_path(graph, layer).map(|p| format!("{p} any-state transition {transition}")),
            ObjectId::BlendTree(ref key) => Some(format!("blend tree \"{key}\"")),
        };
        described.unwrap_or_else(|| id.to_string())
    }
}

fn warn_dangling(avatar: &str, menus: &MenuPages, graphs: &[StateGraph], trees: &BlendTrees) {
    for (key, page) in menus {
        for control in &page.controls {
            if let Some(child) = control.child_page() {
                if !menus.contains_key(child) {
                    log::warn!("{avatar}: menu {key} opens unknown page {child}");
                }
            }
        }
    }
    let motions = graphs
        .iter()
        .flat_map(|g| &g.layers)
        .flat_map(|l| &l.state_machine.states)
        .filter_map(|s| s.blend_tree());
    let children = trees.values().flat_map(|t| t.child_trees());
    for key in motions.chain(children) {
        if !trees.contains_key(key) {
            log::warn!("{avatar}: unknown blend tree {key}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::fixtures::sample_avatar;
    use crate::avatar::MenuControl;

    #[test]
    fn resolves_sample_with_all_pages() {
        let mut avatar = sample_avatar();
        let subject = Subject::resolve(&mut avatar).unwrap();
        assert_eq!(subject.name, "Kitsune");
        assert_eq!(subject.root_menu, "Main");
        assert_eq!(subject.pages, ["Main", "Clothes", "Hats"]);
    }

    #[test]
    fn describes_objects_by_name() {
        let mut avatar = sample_avatar();
        let subject = Subject::resolve(&mut avatar).unwrap();
        let transition = ObjectId::Transition {
            graph: 0,
            layer: 0,
            state: 1,
            transition: 0,
        };
        assert_eq!(subject.describe(&transition), "FX / Visor / VisorOn transition 0");
        assert_eq!(
            subject.describe(&ObjectId::BlendTree("Loco".into())),
            "blend tree \"Loco\""
        );
        let missing = ObjectId::Layer { graph: 7, layer: 0 };
        assert_eq!(subject.describe(&missing), "graph 7 layer 0");
    }

    #[test]
    fn missing_directory() {
        let mut avatar = sample_avatar();
        avatar.parameters = None;
        assert_eq!(
            Subject::resolve(&mut avatar).err(),
            Some(ResolveError::MissingRequiredGraph("parameter directory"))
        );
    }

    #[test]
    fn fx_graph_without_parameters_is_unusable() {
        let mut avatar = sample_avatar();
        for graph in &mut avatar.graphs {
            if graph.kind == GraphKind::Fx {
                graph.parameters.clear();
            }
        }
        assert_eq!(
            Subject::resolve(&mut avatar).err(),
            Some(ResolveError::MissingRequiredGraph("FX graph"))
        );
    }

    #[test]
    fn unknown_root_menu() {
        let mut avatar = sample_avatar();
        avatar.root_menu = Some("Nope".into());
        assert_eq!(
            Subject::resolve(&mut avatar).err(),
            Some(ResolveError::MissingRequiredGraph("root menu"))
        );
    }

    #[test]
    fn menu_cycle_is_rejected() {
        let mut avatar = sample_avatar();
        avatar.menus["Hats"]
            .controls
            .push(MenuControl::submenu("Back", "Clothes"));
        assert_eq!(
            Subject::resolve(&mut avatar).err(),
            Some(ResolveError::MenuCycle(MenuCycle {
                page: "Clothes".into()
            }))
        );
    }
}
