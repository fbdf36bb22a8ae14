//! Shared test avatar and the builders tests use to assemble scenes.

use super::*;

impl Parameter {
    pub fn new(name: &str, value_type: ParameterType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            default: 0.0,
            saved: true,
            synced: true,
        }
    }
}

impl ParameterDirectory {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }
}

impl MenuControl {
    pub fn new(name: &str, kind: ControlKind, parameter: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            parameter: parameter.to_string(),
            sub_parameters: Vec::new(),
            submenu: None,
            value: 1.0,
        }
    }

    pub fn submenu(name: &str, page: &str) -> Self {
        Self {
            submenu: Some(page.to_string()),
            ..Self::new(name, ControlKind::SubMenu, "")
        }
    }
}

impl MenuPage {
    pub fn new(controls: Vec<MenuControl>) -> Self {
        Self { controls }
    }
}

impl GraphParameter {
    pub fn new(name: &str, value_type: ParameterType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            default_bool: false,
            default_int: 0,
            default_float: 0.0,
        }
    }
}

impl StateGraph {
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            parameters: Vec::new(),
            layers: Vec::new(),
        }
    }
}

impl Layer {
    pub fn new(name: &str, state_machine: StateMachine) -> Self {
        Self {
            name: name.to_string(),
            weight: 1.0,
            state_machine,
        }
    }
}

impl ParamBinding {
    pub fn active(parameter: &str) -> Self {
        Self {
            parameter: parameter.to_string(),
            active: true,
        }
    }
}

impl StateNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

impl DriverEntry {
    pub fn set(name: &str, value: f32) -> Self {
        Self {
            name: name.to_string(),
            source: String::new(),
            op: DriverOp::Set,
            value,
        }
    }

    pub fn copy(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            source: source.to_string(),
            op: DriverOp::Copy,
            value: 0.0,
        }
    }
}

impl Transition {
    pub fn to(destination: &str, conditions: Vec<Condition>) -> Self {
        Self {
            destination: Some(destination.to_string()),
            conditions,
        }
    }
}

impl Condition {
    pub fn new(parameter: &str, mode: Comparator, threshold: f32) -> Self {
        Self {
            parameter: parameter.to_string(),
            mode,
            threshold,
        }
    }
}

impl BlendTree {
    pub fn new(blend_parameter: &str) -> Self {
        Self {
            blend_parameter: blend_parameter.to_string(),
            ..Self::default()
        }
    }
}

impl ChildMotion {
    pub fn clip(name: &str, threshold: f32) -> Self {
        Self {
            motion: Some(Motion::Clip(name.to_string())),
            threshold,
        }
    }

    pub fn tree(key: &str, threshold: f32) -> Self {
        Self {
            motion: Some(Motion::BlendTree(key.to_string())),
            threshold,
        }
    }
}

/// One avatar exercising every reference field:
///
/// - menus `Main -> Clothes -> Hats`, plus an orphan page `Spare`
/// - FX graph: `Idle -> VisorOn` on `Visor`, a driver copying `Hat` into
///   `Visor`, a `Move` state playing blend tree `Loco` (nested `Strafe`)
///   with an active speed binding and an inactive time binding on `Visor`
/// - Gesture graph with an any-state transition on `Hat`
pub fn sample_avatar() -> Avatar {
    let parameters = ParameterDirectory::new(vec![
        Parameter::new("Visor", ParameterType::Bool),
        Parameter::new("Hat", ParameterType::Int),
        Parameter::new("Speed", ParameterType::Float),
        Parameter::new("LookX", ParameterType::Float),
        Parameter::new("LookY", ParameterType::Float),
    ]);

    let mut look = MenuControl::new("Look", ControlKind::TwoAxisPuppet, "");
    look.sub_parameters = vec!["LookX".into(), "LookY".into()];
    let menus: MenuPages = [
        (
            "Main",
            MenuPage::new(vec![MenuControl::submenu("Clothes", "Clothes"), look]),
        ),
        (
            "Clothes",
            MenuPage::new(vec![
                MenuControl::new("Visor", ControlKind::Toggle, "Visor"),
                MenuControl::submenu("Hats", "Hats"),
            ]),
        ),
        (
            "Hats",
            MenuPage::new(vec![
                MenuControl::new("Cap", ControlKind::Toggle, "Hat"),
                MenuControl::new("Visor", ControlKind::Button, "Hat"),
            ]),
        ),
        (
            "Spare",
            MenuPage::new(vec![MenuControl::new("Visor", ControlKind::Toggle, "Visor")]),
        ),
    ]
    .into_iter()
    .map(|(k, p)| (k.to_string(), p))
    .collect();

    let mut idle = StateNode::new("Idle");
    idle.transitions.push(Transition::to(
        "VisorOn",
        vec![Condition::new("Visor", Comparator::If, 0.0)],
    ));
    let mut visor_on = StateNode::new("VisorOn");
    visor_on.behaviours.push(Behaviour::ParameterDriver {
        entries: vec![DriverEntry::copy("Visor", "Hat"), DriverEntry::set("Hat", 1.0)],
    });
    visor_on.behaviours.push(Behaviour::Other {
        script: "Visor".into(),
    });
    visor_on.transitions.push(Transition::to(
        "Idle",
        vec![
            Condition::new("Visor", Comparator::IfNot, 0.0),
            Condition::new("Hat", Comparator::Equals, 2.0),
        ],
    ));
    let mut moving = StateNode::new("Move");
    moving.speed = ParamBinding::active("Speed");
    moving.time = ParamBinding {
        parameter: "Visor".into(),
        active: false,
    };
    moving.motion = Some(Motion::BlendTree("Loco".into()));

    let mut fx = StateGraph::new(GraphKind::Fx);
    fx.parameters = vec![
        GraphParameter::new("Visor", ParameterType::Bool),
        GraphParameter::new("Hat", ParameterType::Int),
        GraphParameter::new("Speed", ParameterType::Float),
    ];
    fx.layers.push(Layer::new(
        "Visor",
        StateMachine {
            states: vec![idle, visor_on, moving],
            any_state_transitions: vec![],
        },
    ));

    let mut gesture = StateGraph::new(GraphKind::Gesture);
    gesture.parameters = vec![GraphParameter::new("Hat", ParameterType::Int)];
    let mut wave = StateNode::new("Wave");
    wave.motion = Some(Motion::Clip("Speed".into()));
    gesture.layers.push(Layer::new(
        "Hands",
        StateMachine {
            states: vec![wave],
            any_state_transitions: vec![Transition::to(
                "Wave",
                vec![Condition::new("Hat", Comparator::Greater, 0.5)],
            )],
        },
    ));

    let mut loco = BlendTree::new("Speed");
    loco.children = vec![ChildMotion::clip("walk", 0.0), ChildMotion::tree("Strafe", 1.0)];
    let mut strafe = BlendTree::new("LookX");
    strafe.blend_parameter_y = "Speed".into();
    let blend_trees: BlendTrees = [
        ("Loco".to_string(), loco),
        ("Strafe".to_string(), strafe),
        ("Orphan".to_string(), BlendTree::new("Speed")),
    ]
    .into_iter()
    .collect();

    Avatar {
        name: "Kitsune".into(),
        root_menu: Some("Main".into()),
        parameters: Some(parameters),
        menus,
        graphs: vec![fx, gesture],
        blend_trees,
    }
}
