use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::avatar::{Avatar, ResolveError};

/// A scene file: every avatar the tool can work on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default, rename = "avatar")]
    pub avatars: Vec<Avatar>,
}

impl Scene {
    /// Pick the avatar to work on.
    ///
    /// With a name, that avatar; without, the only avatar in the scene.
    pub fn select(&mut self, name: Option<&str>) -> Result<&mut Avatar, ResolveError> {
        match (name, self.avatars.len()) {
            (_, 0) => Err(ResolveError::NoAvatars),
            (Some(name), _) => self
                .avatars
                .iter_mut()
                .find(|a| a.name == name)
                .ok_or_else(|| ResolveError::AvatarNotFound(name.to_string())),
            (None, 1) => Ok(&mut self.avatars[0]),
            (None, _) => Err(ResolveError::AmbiguousAvatar(
                self.avatars
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            )),
        }
    }
}

pub fn load(path: &Path) -> anyhow::Result<Scene> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scene {}", path.display()))?;
    let scene: Scene = toml::from_str(&content)
        .with_context(|| format!("failed to parse scene {}", path.display()))?;
    log::info!(
        "Loaded {} avatar(s) from {}",
        scene.avatars.len(),
        path.display()
    );
    Ok(scene)
}

/// Write `scene` to `path`, first copying the existing file to
/// `<path>.bak` when `backup` is set.
pub fn save(scene: &Scene, path: &Path, backup: bool) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    if backup && path.exists() {
        let bak = backup_path(path);
        std::fs::copy(path, &bak)
            .with_context(|| format!("failed to write backup {}", bak.display()))?;
        log::info!("Backup written to {}", bak.display());
    }
    let content = toml::to_string_pretty(scene)?;
    std::fs::write(path, content)
        .with_context(|| format!("failed to write scene {}", path.display()))?;
    log::info!("Saved scene to {}", path.display());
    Ok(())
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::fixtures::sample_avatar;
    use crate::avatar::{Behaviour, Motion};

    const SCENE: &str = r#"
[[avatar]]
name = "Fox"
root_menu = "Main"

[[avatar.parameters]]
name = "Ears"
type = "bool"

[avatar.menus.Main]
controls = [
    { name = "Ears", kind = "toggle", parameter = "Ears" },
    { name = "More", kind = "sub_menu", submenu = "More" },
]

[avatar.menus.More]
controls = [{ name = "Look", kind = "two_axis_puppet", sub_parameters = ["Ears", "Tail"] }]

[[avatar.graphs]]
kind = "fx"
parameters = [{ name = "Ears", type = "bool" }]

[[avatar.graphs.layers]]
name = "Ears"

[[avatar.graphs.layers.state_machine.states]]
name = "Down"
speed = { parameter = "Ears", active = true }
motion = { blend_tree = "Wiggle" }
behaviours = [
    { type = "parameter_driver", entries = [{ name = "Ears", source = "Tail", op = "copy" }] },
    { type = "other", script = "Sound" },
]
transitions = [{ destination = "Up", conditions = [{ parameter = "Ears", mode = "if" }] }]

[avatar.blend_trees.Wiggle]
blend_parameter = "Ears"
children = [{ motion = { clip = "wiggle" }, threshold = 0.5 }]

[[avatar]]
name = "Empty"
"#;

    #[test]
    fn parses_scene_document() {
        let mut scene: Scene = toml::from_str(SCENE).unwrap();
        assert_eq!(scene.avatars.len(), 2);

        let fox = scene.select(Some("Fox")).unwrap();
        assert_eq!(fox.menus["More"].controls[0].sub_parameters, ["Ears", "Tail"]);
        assert_eq!(fox.menus["Main"].controls[1].child_page(), Some("More"));

        let state = &fox.graphs[0].layers[0].state_machine.states[0];
        assert!(state.speed.active);
        assert!(!state.time.active);
        assert_eq!(state.motion, Some(Motion::BlendTree("Wiggle".into())));
        assert!(matches!(
            &state.behaviours[0],
            Behaviour::ParameterDriver { entries } if entries[0].source == "Tail"
        ));
        assert_eq!(fox.graphs[0].layers[0].weight, 1.0);
        assert_eq!(
            fox.blend_trees["Wiggle"].children[0].motion,
            Some(Motion::Clip("wiggle".into()))
        );
    }

    #[test]
    fn select_requires_a_name_with_several_avatars() {
        let mut scene: Scene = toml::from_str(SCENE).unwrap();
        assert_eq!(
            scene.select(None).err(),
            Some(ResolveError::AmbiguousAvatar("Fox, Empty".into()))
        );
        assert_eq!(
            scene.select(Some("Wolf")).err(),
            Some(ResolveError::AvatarNotFound("Wolf".into()))
        );
        assert_eq!(Scene::default().select(None).err(), Some(ResolveError::NoAvatars));

        scene.avatars.truncate(1);
        assert_eq!(scene.select(None).unwrap().name, "Fox");
    }

    #[test]
    fn save_writes_backup_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");
        std::fs::write(&path, "# original\n").unwrap();

        let scene = Scene {
            avatars: vec![sample_avatar()],
        };
        save(&scene, &path, true).unwrap();

        let bak = backup_path(&path);
        assert_eq!(std::fs::read_to_string(bak).unwrap(), "# original\n");
        assert_eq!(load(&path).unwrap(), scene);
    }

    #[test]
    fn save_without_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scene.toml");
        save(&Scene::default(), &path, true).unwrap();
        assert!(path.exists());
        assert!(!backup_path(&path).exists());
    }
}
