//! Case file schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    #[serde(default = "default_version")]
    pub version: u32,
    pub name: String,
    pub fluid: FluidDef,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    #[serde(default)]
    pub connections: Vec<ConnectionDef>,
    #[serde(default)]
    pub solver: SolverDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transient: Option<TransientDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventDef>,
}

fn default_version() -> u32 {
    crate::LATEST_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum FluidDef {
    /// Fixed properties; enthalpy is `cp * T`.
    Constant { rho: f64, cp: f64, mu: f64, k: f64 },
    IdealGas {
        name: String,
        cp: f64,
        k: f64,
        /// kg/kmol
        molar_mass: f64,
        mu: f64,
    },
    /// Real pure fluid; needs the `coolprop` feature.
    CoolProp { species: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub name: String,
    pub kind: ComponentKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ComponentKind {
    FlowChannel {
        mesh: MeshDef,
        area_m2: f64,
        wetted_perimeter_m: f64,
        #[serde(default)]
        roughness_m: f64,
        #[serde(default)]
        mode: HeatModeDef,
        inlet: FlowStateDef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        t_wall_k: Option<ValueDef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        q_dot_w: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        q_dot_shape: Option<Vec<f64>>,
        #[serde(default)]
        friction: FrictionModelDef,
        #[serde(default)]
        nusselt: NusseltModelDef,
        #[serde(default)]
        settings: ChannelSettingsDef,
    },
    WallHeat {
        mesh: MeshDef,
        wetted_perimeter_m: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        t_flow_k: Option<ValueDef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        t_wall_k: Option<ValueDef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        htc: Option<ValueDef>,
    },
}

impl ComponentKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ComponentKind::FlowChannel { .. } => "FlowChannel",
            ComponentKind::WallHeat { .. } => "WallHeat",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MeshDef {
    Uniform { start_m: f64, end_m: f64, nodes: usize },
    Nodes { positions_m: Vec<f64> },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeatModeDef {
    #[default]
    Adiabatic,
    FixedWallTemperature,
    FixedHeatRate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FrictionModelDef {
    #[default]
    Churchill,
    Laminar,
    SwameeJain,
    LaminarTurbulent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NusseltModelDef {
    #[default]
    DittusBoelter,
    Gnielinski,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChannelSettingsDef {
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for ChannelSettingsDef {
    fn default() -> Self {
        Self {
            tol: 1e-6,
            max_iter: 100,
        }
    }
}

/// Stagnation temperature [K], stagnation pressure [Pa], mass flow [kg/s].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FlowStateDef {
    pub t0: f64,
    pub p0: f64,
    pub mdot: f64,
}

/// A variable value as written in a case or results file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ValueDef {
    Scalar(f64),
    Field(Vec<f64>),
    FlowState(FlowStateDef),
}

/// `from` and `to` are `component.variable` paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionDef {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverDef {
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            tol: 1e-6,
            max_iter: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TransientDef {
    pub dt_s: f64,
    pub duration_s: f64,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

fn default_max_steps() -> usize {
    100_000
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDef {
    pub time_s: f64,
    /// `component.variable` path of an input.
    pub target: String,
    pub value: ValueDef,
}

/// Split a `component.variable` path at its last dot.
pub fn split_path(path: &str) -> Option<(&str, &str)> {
    let (component, variable) = path.rsplit_once('.')?;
    if component.is_empty() || variable.is_empty() {
        return None;
    }
    Some((component, variable))
}
