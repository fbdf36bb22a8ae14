use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Button,
    Toggle,
    SubMenu,
    TwoAxisPuppet,
    FourAxisPuppet,
    RadialPuppet,
}

/// One entry on a menu page.
///
/// `parameter` and `sub_parameters` are parameter references. `name` is a
/// display label and is never treated as a reference. `submenu` is a graph
/// edge to another page (by key); it is only followed for
/// [`ControlKind::SubMenu`] controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuControl {
    pub name: String,
    pub kind: ControlKind,
    #[serde(default)]
    pub parameter: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submenu: Option<String>,
    #[serde(default)]
    pub value: f32,
}

impl MenuControl {
    /// The child page key, if this control opens a submenu.
    pub fn child_page(&self) -> Option<&str> {
        match self.kind {
            ControlKind::SubMenu => self.submenu.as_deref(),
            ControlKind::Button
            | ControlKind::Toggle
            | ControlKind::TwoAxisPuppet
            | ControlKind::FourAxisPuppet
            | ControlKind::RadialPuppet => None,
        }
    }

    /// True if the primary or any sub-parameter reference equals `name`.
    pub fn references(&self, name: &str) -> bool {
        self.parameter == name || self.sub_parameters.iter().any(|p| p == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuPage {
    #[serde(default)]
    pub controls: Vec<MenuControl>,
}
