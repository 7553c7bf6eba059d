//! Case validation logic.
//!
//! Checks what can be decided from the file alone: names, references,
//! positive physical quantities and heat-mode consistency. Whether a named
//! variable exists is checked when the case is compiled.

use std::collections::HashSet;

use cf_components::HeatTransferMode;

use crate::schema::{
    Case, ComponentKind, FluidDef, HeatModeDef, MeshDef, SolverDef, TransientDef, split_path,
};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn non_negative(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be non-negative"))
    }
}

pub fn validate_case(case: &Case) -> Result<(), ValidationError> {
    if case.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: case.version,
        });
    }
    if case.name.trim().is_empty() || case.name.contains(['/', '\\']) {
        return Err(invalid("name", &case.name, "must be a non-empty file name"));
    }

    validate_fluid(&case.fluid)?;

    let mut names = HashSet::new();
    for component in &case.components {
        if component.name.is_empty() || component.name.contains('.') {
            return Err(invalid(
                "component name",
                &component.name,
                "must be non-empty and contain no '.'",
            ));
        }
        if !names.insert(component.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: component.name.clone(),
                context: "components".to_string(),
            });
        }
        validate_component(&component.name, &component.kind)?;
    }

    let mut targets = HashSet::new();
    for connection in &case.connections {
        check_path(&connection.from, "connection from", &names)?;
        check_path(&connection.to, "connection to", &names)?;
        check_heat_target(case, &connection.to, "connection to")?;
        if !targets.insert(connection.to.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: connection.to.clone(),
                context: "connection targets".to_string(),
            });
        }
    }

    validate_solver(&case.solver)?;
    if let Some(transient) = &case.transient {
        validate_transient(transient)?;
    }

    for event in &case.events {
        non_negative(format!("event {} time_s", event.target), event.time_s)?;
        check_path(&event.target, "event target", &names)?;
        check_heat_target(case, &event.target, "event target")?;
    }

    Ok(())
}

/// A channel heat input may only be driven when the channel's mode reads it.
fn check_heat_target(case: &Case, path: &str, context: &str) -> Result<(), ValidationError> {
    let Some((component, variable)) = split_path(path) else {
        return Ok(());
    };
    let mode = case
        .components
        .iter()
        .find(|c| c.name == component)
        .and_then(|c| match &c.kind {
            ComponentKind::FlowChannel { mode, .. } => Some(HeatTransferMode::from(*mode)),
            ComponentKind::WallHeat { .. } => None,
        });
    match mode {
        Some(mode)
            if HeatTransferMode::HEAT_INPUTS.contains(&variable)
                && !mode.heat_inputs().contains(&variable) =>
        {
            Err(invalid(
                context,
                path,
                &format!("{mode:?} channel does not read {variable}"),
            ))
        }
        _ => Ok(()),
    }
}

fn check_path(path: &str, context: &str, names: &HashSet<&str>) -> Result<(), ValidationError> {
    let (component, _) = split_path(path)
        .ok_or_else(|| invalid(context, path, "expected component.variable"))?;
    if !names.contains(component) {
        return Err(ValidationError::MissingReference {
            id: component.to_string(),
            context: context.to_string(),
        });
    }
    Ok(())
}

fn validate_fluid(fluid: &FluidDef) -> Result<(), ValidationError> {
    match fluid {
        FluidDef::Constant { rho, cp, mu, k } => {
            positive("fluid.rho", *rho)?;
            positive("fluid.cp", *cp)?;
            positive("fluid.mu", *mu)?;
            positive("fluid.k", *k)?;
        }
        FluidDef::IdealGas {
            cp,
            k,
            molar_mass,
            mu,
            ..
        } => {
            positive("fluid.cp", *cp)?;
            positive("fluid.k", *k)?;
            positive("fluid.molar_mass", *molar_mass)?;
            positive("fluid.mu", *mu)?;
        }
        FluidDef::CoolProp { species } => {
            if !cfg!(feature = "coolprop") {
                return Err(ValidationError::Unsupported {
                    feature: format!("CoolProp fluid {species}"),
                    reason: "built without the coolprop feature".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_mesh(owner: &str, mesh: &MeshDef) -> Result<(), ValidationError> {
    match mesh {
        MeshDef::Uniform {
            start_m,
            end_m,
            nodes,
        } => {
            if *nodes < 2 {
                return Err(invalid(format!("{owner}.mesh.nodes"), nodes, "need at least 2"));
            }
            if !(start_m.is_finite() && end_m.is_finite() && end_m > start_m) {
                return Err(invalid(
                    format!("{owner}.mesh.end_m"),
                    end_m,
                    "must exceed start_m",
                ));
            }
        }
        MeshDef::Nodes { positions_m } => {
            if positions_m.len() < 2 {
                return Err(invalid(
                    format!("{owner}.mesh.positions_m"),
                    positions_m.len(),
                    "need at least 2",
                ));
            }
            if positions_m.iter().any(|x| !x.is_finite())
                || positions_m.windows(2).any(|w| w[1] <= w[0])
            {
                return Err(invalid(
                    format!("{owner}.mesh.positions_m"),
                    format!("{positions_m:?}"),
                    "must be finite and strictly increasing",
                ));
            }
        }
    }
    Ok(())
}

fn validate_component(name: &str, kind: &ComponentKind) -> Result<(), ValidationError> {
    match kind {
        ComponentKind::FlowChannel {
            mesh,
            area_m2,
            wetted_perimeter_m,
            roughness_m,
            mode,
            inlet,
            t_wall_k,
            q_dot_w,
            q_dot_shape,
            settings,
            ..
        } => {
            validate_mesh(name, mesh)?;
            positive(format!("{name}.area_m2"), *area_m2)?;
            positive(format!("{name}.wetted_perimeter_m"), *wetted_perimeter_m)?;
            non_negative(format!("{name}.roughness_m"), *roughness_m)?;
            positive(format!("{name}.inlet.t0"), inlet.t0)?;
            positive(format!("{name}.inlet.p0"), inlet.p0)?;
            if !(inlet.mdot.is_finite() && inlet.mdot > 0.0) {
                return Err(ValidationError::Unsupported {
                    feature: format!("{name} mass flow {}", inlet.mdot),
                    reason: "only positive (forward) flow is supported".to_string(),
                });
            }
            positive(format!("{name}.settings.tol"), settings.tol)?;
            if settings.max_iter == 0 {
                return Err(invalid(
                    format!("{name}.settings.max_iter"),
                    settings.max_iter,
                    "must be positive",
                ));
            }

            let mode_field = format!("{name}.mode");
            match mode {
                HeatModeDef::Adiabatic => {
                    if t_wall_k.is_some() || q_dot_w.is_some() || q_dot_shape.is_some() {
                        return Err(invalid(
                            mode_field,
                            "adiabatic",
                            "takes no t_wall_k, q_dot_w or q_dot_shape",
                        ));
                    }
                }
                HeatModeDef::FixedWallTemperature => {
                    if t_wall_k.is_none() || q_dot_w.is_some() || q_dot_shape.is_some() {
                        return Err(invalid(
                            mode_field,
                            "fixed_wall_temperature",
                            "needs t_wall_k and no q_dot_w or q_dot_shape",
                        ));
                    }
                }
                HeatModeDef::FixedHeatRate => {
                    if q_dot_w.is_none() || t_wall_k.is_some() {
                        return Err(invalid(
                            mode_field,
                            "fixed_heat_rate",
                            "needs q_dot_w and no t_wall_k",
                        ));
                    }
                    if let Some(shape) = q_dot_shape {
                        let sum: f64 = shape.iter().sum();
                        if !(sum.is_finite() && sum > 0.0) {
                            return Err(invalid(
                                format!("{name}.q_dot_shape"),
                                format!("{shape:?}"),
                                "must have a positive finite sum",
                            ));
                        }
                    }
                }
            }
        }
        ComponentKind::WallHeat {
            mesh,
            wetted_perimeter_m,
            t_flow_k,
            t_wall_k,
            htc,
        } => {
            validate_mesh(name, mesh)?;
            positive(format!("{name}.wetted_perimeter_m"), *wetted_perimeter_m)?;
            for (field, value) in [("t_flow_k", t_flow_k), ("t_wall_k", t_wall_k), ("htc", htc)] {
                if value.is_none() {
                    return Err(invalid(
                        format!("{name}.{field}"),
                        "none",
                        "an initial value is required",
                    ));
                }
            }
        }
    }
    Ok(())
}

fn validate_solver(solver: &SolverDef) -> Result<(), ValidationError> {
    non_negative("solver.tol", solver.tol)
}

fn validate_transient(transient: &TransientDef) -> Result<(), ValidationError> {
    positive("transient.dt_s", transient.dt_s)?;
    non_negative("transient.duration_s", transient.duration_s)?;
    if transient.max_steps == 0 {
        return Err(invalid("transient.max_steps", 0, "must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn channel(name: &str) -> ComponentDef {
        ComponentDef {
            name: name.to_string(),
            kind: ComponentKind::FlowChannel {
                mesh: MeshDef::Uniform {
                    start_m: 0.0,
                    end_m: 1.0,
                    nodes: 11,
                },
                area_m2: 1e-4,
                wetted_perimeter_m: 0.04,
                roughness_m: 0.0,
                mode: HeatModeDef::Adiabatic,
                inlet: FlowStateDef {
                    t0: 300.0,
                    p0: 1.0e5,
                    mdot: 0.01,
                },
                t_wall_k: None,
                q_dot_w: None,
                q_dot_shape: None,
                friction: FrictionModelDef::default(),
                nusselt: NusseltModelDef::default(),
                settings: ChannelSettingsDef::default(),
            },
        }
    }

    fn case() -> Case {
        Case {
            version: crate::LATEST_VERSION,
            name: "pipe".to_string(),
            fluid: FluidDef::Constant {
                rho: 1000.0,
                cp: 4180.0,
                mu: 1e-3,
                k: 0.6,
            },
            components: vec![channel("a"), channel("b")],
            connections: vec![ConnectionDef {
                from: "a.outlet".to_string(),
                to: "b.inlet".to_string(),
            }],
            solver: SolverDef::default(),
            transient: None,
            events: vec![],
        }
    }

    #[test]
    fn valid_case_passes() {
        validate_case(&case()).unwrap();
    }

    #[test]
    fn duplicate_component_rejected() {
        let mut c = case();
        c.components.push(channel("a"));
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn dangling_connection_rejected() {
        let mut c = case();
        c.connections[0].from = "missing.outlet".to_string();
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn second_source_for_input_rejected() {
        let mut c = case();
        c.connections.push(c.connections[0].clone());
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn future_version_rejected() {
        let mut c = case();
        c.version = crate::LATEST_VERSION + 1;
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn reverse_flow_unsupported() {
        let mut c = case();
        if let ComponentKind::FlowChannel { inlet, .. } = &mut c.components[0].kind {
            inlet.mdot = -0.01;
        }
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::Unsupported { .. })
        ));
    }

    #[test]
    fn adiabatic_with_heat_input_rejected() {
        let mut c = case();
        if let ComponentKind::FlowChannel { q_dot_w, .. } = &mut c.components[0].kind {
            *q_dot_w = Some(100.0);
        }
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn connected_heat_input_must_match_mode() {
        let mut c = case();
        c.connections.push(ConnectionDef {
            from: "a.T_wall_cell".to_string(),
            to: "b.T_wall".to_string(),
        });
        match validate_case(&c) {
            Err(ValidationError::InvalidValue { field, value, .. }) => {
                assert_eq!(field, "connection to");
                assert_eq!(value, "b.T_wall");
            }
            other => panic!("unexpected {other:?}"),
        }

        if let ComponentKind::FlowChannel { mode, t_wall_k, .. } = &mut c.components[1].kind {
            *mode = HeatModeDef::FixedWallTemperature;
            *t_wall_k = Some(ValueDef::Scalar(450.0));
        }
        validate_case(&c).unwrap();
    }

    #[test]
    fn event_on_unread_heat_input_rejected() {
        let mut c = case();
        c.events.push(EventDef {
            time_s: 0.5,
            target: "a.Q_dot".to_string(),
            value: ValueDef::Scalar(1.0e3),
        });
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn heat_rate_mode_needs_q_dot() {
        let mut c = case();
        if let ComponentKind::FlowChannel { mode, .. } = &mut c.components[0].kind {
            *mode = HeatModeDef::FixedHeatRate;
        }
        assert!(validate_case(&c).is_err());
    }

    #[test]
    fn bad_mesh_rejected() {
        let mut c = case();
        if let ComponentKind::FlowChannel { mesh, .. } = &mut c.components[0].kind {
            *mesh = MeshDef::Nodes {
                positions_m: vec![0.0, 0.5, 0.5],
            };
        }
        assert!(validate_case(&c).is_err());
    }

    #[test]
    fn event_needs_known_component() {
        let mut c = case();
        c.events.push(EventDef {
            time_s: 1.0,
            target: "nope.Q_dot".to_string(),
            value: ValueDef::Scalar(1.0),
        });
        assert!(matches!(
            validate_case(&c),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn non_positive_dt_rejected() {
        let mut c = case();
        c.transient = Some(TransientDef {
            dt_s: 0.0,
            duration_s: 1.0,
            max_steps: 10,
        });
        assert!(validate_case(&c).is_err());
    }
}
