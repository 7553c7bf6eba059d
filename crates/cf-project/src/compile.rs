//! Compile a validated case into a runnable system.

use std::sync::Arc;

use cf_components::correlations::{self, Closures};
use cf_components::{
    ChannelGeometry, ChannelSettings, FlowChannel1D, FlowState, HeatTransferMode, VarValue,
    WallHeatSource,
};
use cf_core::Mesh1D;
use cf_core::units::{m, m2};
use cf_fluids::{ConstantFluid, EquationOfState, IdealGas};
use cf_sim::{Schedule, ScheduledEvent, TransientOptions};
use cf_solver::{SteadyOptions, System, VarRef};
use tracing::debug;

use crate::schema::{
    Case, ComponentKind, FluidDef, FrictionModelDef, HeatModeDef, MeshDef, NusseltModelDef,
    ValueDef, split_path,
};
use crate::{ProjectError, ProjectResult};

/// Everything needed to run a case.
pub struct CompiledCase {
    pub system: System,
    pub steady: SteadyOptions,
    /// Present when the case has a `transient` block.
    pub transient: Option<TransientOptions>,
    pub schedule: Schedule,
}

/// Build the fluid, components, connections and schedule of `case`.
///
/// Run [`validate_case`](crate::validate_case) first; this only reports
/// what validation cannot see, such as unknown variable names.
pub fn compile_case(case: &Case) -> ProjectResult<CompiledCase> {
    let fluid = build_fluid(&case.fluid)?;
    let mut system = System::new();

    for component in &case.components {
        match &component.kind {
            ComponentKind::FlowChannel { .. } => {
                let channel = build_channel(&component.name, &component.kind, fluid.clone())?;
                system.add(channel)?;
            }
            ComponentKind::WallHeat { .. } => {
                let wall = build_wall_heat(&component.name, &component.kind)?;
                system.add(wall)?;
            }
        }
        debug!(
            component = %component.name,
            kind = component.kind.type_name(),
            "component compiled"
        );
    }

    for connection in &case.connections {
        let source = resolve(&system, &connection.from)?;
        let target = resolve(&system, &connection.to)?;
        system.connect(source, target)?;
    }

    let steady = SteadyOptions {
        tol: case.solver.tol,
        max_iter: case.solver.max_iter,
    };
    let transient = case.transient.map(|t| TransientOptions {
        dt: t.dt_s,
        duration: t.duration_s,
        max_steps: t.max_steps,
        tol: case.solver.tol,
        max_iter: case.solver.max_iter,
    });

    let mut events = Vec::with_capacity(case.events.len());
    for event in &case.events {
        let target = resolve(&system, &event.target)?;
        let owner = system.component(target.component)?;
        if !owner.is_input(&target.variable) {
            return Err(ProjectError::Build {
                what: format!("event target {} is not an input", event.target),
            });
        }
        if !owner.accepts_input(&target.variable) {
            return Err(ProjectError::Build {
                what: format!("event target {} is not read in this mode", event.target),
            });
        }
        events.push(ScheduledEvent {
            time_s: event.time_s,
            target,
            value: var_value(&event.value),
        });
    }
    let schedule = Schedule::new(events)?;

    Ok(CompiledCase {
        system,
        steady,
        transient,
        schedule,
    })
}

impl From<HeatModeDef> for HeatTransferMode {
    fn from(mode: HeatModeDef) -> Self {
        match mode {
            HeatModeDef::Adiabatic => HeatTransferMode::Adiabatic,
            HeatModeDef::FixedWallTemperature => HeatTransferMode::FixedWallTemperature,
            HeatModeDef::FixedHeatRate => HeatTransferMode::FixedHeatRate,
        }
    }
}

fn resolve(system: &System, path: &str) -> ProjectResult<VarRef> {
    let (component, variable) = split_path(path).ok_or_else(|| ProjectError::Build {
        what: format!("{path} is not a component.variable path"),
    })?;
    Ok(system.var_ref(component, variable)?)
}

pub fn build_fluid(def: &FluidDef) -> ProjectResult<Arc<dyn EquationOfState>> {
    let fluid: Arc<dyn EquationOfState> = match def {
        FluidDef::Constant { rho, cp, mu, k } => Arc::new(ConstantFluid::new(*rho, *cp, *mu, *k)?),
        FluidDef::IdealGas {
            name,
            cp,
            k,
            molar_mass,
            mu,
        } => Arc::new(IdealGas::new(name.clone(), *cp, *k, *molar_mass, *mu)?),
        #[cfg(feature = "coolprop")]
        FluidDef::CoolProp { species } => Arc::new(cf_fluids::CoolPropFluid::from_name(species)?),
        #[cfg(not(feature = "coolprop"))]
        FluidDef::CoolProp { species } => {
            return Err(ProjectError::Build {
                what: format!("CoolProp fluid {species} needs the coolprop feature"),
            });
        }
    };
    Ok(fluid)
}

pub fn build_mesh(def: &MeshDef) -> ProjectResult<Mesh1D> {
    let mesh = match def {
        MeshDef::Uniform {
            start_m,
            end_m,
            nodes,
        } => Mesh1D::uniform(*start_m, *end_m, *nodes),
        MeshDef::Nodes { positions_m } => Mesh1D::from_nodes(positions_m.clone()),
    };
    mesh.map_err(|e| ProjectError::Build {
        what: format!("mesh: {e}"),
    })
}

fn closures(friction: FrictionModelDef, nusselt: NusseltModelDef) -> Closures {
    let closures = match friction {
        FrictionModelDef::Churchill => Closures::default(),
        FrictionModelDef::Laminar => Closures::default().with_friction_factor(correlations::laminar),
        FrictionModelDef::SwameeJain => {
            Closures::default().with_friction_factor(correlations::swamee_jain)
        }
        FrictionModelDef::LaminarTurbulent => {
            Closures::default().with_friction_factor(correlations::laminar_turbulent)
        }
    };
    match nusselt {
        NusseltModelDef::DittusBoelter => closures,
        NusseltModelDef::Gnielinski => closures.with_nusselt(correlations::gnielinski),
    }
}

fn build_channel(
    name: &str,
    kind: &ComponentKind,
    fluid: Arc<dyn EquationOfState>,
) -> ProjectResult<FlowChannel1D> {
    let ComponentKind::FlowChannel {
        mesh,
        area_m2,
        wetted_perimeter_m,
        roughness_m,
        mode,
        inlet,
        t_wall_k,
        q_dot_w,
        q_dot_shape,
        friction,
        nusselt,
        settings,
    } = kind
    else {
        return Err(ProjectError::Build {
            what: format!("{name} is not a flow channel"),
        });
    };

    let geometry = ChannelGeometry::new(m2(*area_m2), m(*wetted_perimeter_m), m(*roughness_m))?;
    let mode = HeatTransferMode::from(*mode);
    let mut channel = FlowChannel1D::new(name, build_mesh(mesh)?, geometry, fluid, mode)
        .with_closures(closures(*friction, *nusselt))
        .with_settings(ChannelSettings {
            tol: settings.tol,
            max_iter: settings.max_iter,
        });

    channel
        .inputs
        .inlet
        .set_initial(FlowState::from_si(inlet.t0, inlet.p0, inlet.mdot))?;
    if let Some(t_wall) = t_wall_k {
        channel.inputs.t_wall.set_initial(var_value(t_wall))?;
    }
    if let Some(q_dot) = q_dot_w {
        channel.inputs.q_dot.set_initial(*q_dot)?;
    }
    if let Some(shape) = q_dot_shape {
        channel.inputs.q_dot_shape.set_initial(shape.clone())?;
    }
    Ok(channel)
}

fn build_wall_heat(name: &str, kind: &ComponentKind) -> ProjectResult<WallHeatSource> {
    let ComponentKind::WallHeat {
        mesh,
        wetted_perimeter_m,
        t_flow_k,
        t_wall_k,
        htc,
    } = kind
    else {
        return Err(ProjectError::Build {
            what: format!("{name} is not a wall heat source"),
        });
    };

    let mut wall = WallHeatSource::new(name, build_mesh(mesh)?, m(*wetted_perimeter_m))?;
    for (variable, value) in [
        (&mut wall.inputs.t_flow, t_flow_k),
        (&mut wall.inputs.t_wall, t_wall_k),
        (&mut wall.inputs.htc, htc),
    ] {
        if let Some(value) = value {
            variable.set_initial(var_value(value))?;
        }
    }
    Ok(wall)
}

pub fn var_value(def: &ValueDef) -> VarValue {
    match def {
        ValueDef::Scalar(v) => VarValue::Scalar(*v),
        ValueDef::Field(v) => VarValue::from(v.clone()),
        ValueDef::FlowState(s) => VarValue::FlowState(FlowState::from_si(s.t0, s.p0, s.mdot)),
    }
}
