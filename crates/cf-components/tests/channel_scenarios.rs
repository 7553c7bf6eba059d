//! Integration tests for the flow channel on reference cases.

use std::f64::consts::PI;
use std::sync::Arc;

use cf_components::correlations::churchill;
use cf_components::{
    ChannelGeometry, Component, FlowChannel1D, FlowState, HeatTransferMode, stagnation_to_static,
};
use cf_core::Mesh1D;
use cf_core::units::{k, kgps, m, m2, pa};
use cf_fluids::{ConstantFluid, EquationOfState, IdealGas};

const AREA: f64 = 7.2548e-3;
const PERIMETER: f64 = 0.4108273402;

fn hydrogen_constant() -> Arc<ConstantFluid> {
    Arc::new(ConstantFluid::new(0.166, 5192.6, 3.226e-5, 0.2256).unwrap())
}

fn reference_channel(mode: HeatTransferMode, cells: usize) -> FlowChannel1D {
    let geometry = ChannelGeometry::new(m2(AREA), m(PERIMETER), m(0.0)).unwrap();
    let mut fc = FlowChannel1D::new(
        "fc1",
        Mesh1D::uniform(0.0, 1.0, cells + 1).unwrap(),
        geometry,
        hydrogen_constant(),
        mode,
    );
    fc.inputs
        .inlet
        .set_initial(FlowState::new(k(300.0), pa(1.0e6), kgps(1.0e-2)))
        .unwrap();
    fc
}

fn field(fc: &FlowChannel1D, name: &str) -> Vec<f64> {
    fc.variable(name)
        .unwrap()
        .field_value()
        .unwrap()
        .iter()
        .copied()
        .collect()
}

#[test]
fn adiabatic_pressure_falls_monotonically() {
    let mut fc = reference_channel(HeatTransferMode::Adiabatic, 10);
    fc.setup().unwrap();
    fc.solve(None).unwrap();

    let p = field(&fc, "P");
    assert!(p.windows(2).all(|w| w[1] < w[0]), "{p:?}");

    let outlet = fc.outputs.outlet.flow_state_value().unwrap();
    let tol = fc.settings().tol;
    assert!((outlet.t0 - 300.0).abs() < tol, "outlet T0 {}", outlet.t0);
    assert_eq!(outlet.mdot, 1.0e-2);
}

#[test]
fn adiabatic_pressure_drop_matches_darcy_weisbach() {
    let mut fc = reference_channel(HeatTransferMode::Adiabatic, 10);
    fc.setup().unwrap();
    fc.solve(None).unwrap();

    let rho = 0.166;
    let u = 1.0e-2 / (rho * AREA);
    let d_h = 4.0 * AREA / PERIMETER;
    let re = rho * u * d_h / 3.226e-5;
    let f = churchill(0.0, d_h, re);
    let expected = f * 1.0 * rho * u * u / (2.0 * d_h);

    let p = field(&fc, "P");
    let drop = p[0] - p[10];
    assert!(
        (drop - expected).abs() / expected < 1e-9,
        "drop {drop} vs {expected}"
    );
}

#[test]
fn single_cell_matches_direct_solution() {
    let mut fc = reference_channel(HeatTransferMode::Adiabatic, 1);
    fc.setup().unwrap();
    fc.solve(None).unwrap();

    let fluid = hydrogen_constant();
    let settings = fc.settings();
    let inlet = FlowState::from_si(300.0, 1.0e6, 1.0e-2);
    let (t_in, p_in) =
        stagnation_to_static(fluid.as_ref(), inlet, AREA, settings.tol, settings.max_iter)
            .unwrap();

    let rho = 0.166;
    let u = 1.0e-2 / (rho * AREA);
    let d_h = 4.0 * AREA / PERIMETER;
    let f = churchill(0.0, d_h, rho * u * d_h / 3.226e-5);
    let p_out = p_in - f * rho * u * u / (2.0 * d_h);
    // Velocity is uniform, so static enthalpy is conserved across the cell.
    let e_out = fluid.internal_energy(t_in, p_in).unwrap() + (p_in - p_out) / rho;
    let t_out = (e_out + p_out / rho) / 5192.6;

    let p = field(&fc, "P");
    let t = field(&fc, "T");
    assert!((p[0] - p_in).abs() < 1e-9);
    assert!((p[1] - p_out).abs() < 1e-6, "{} vs {p_out}", p[1]);
    assert!((t[1] - t_out).abs() < 1e-9, "{} vs {t_out}", t[1]);
}

#[test]
fn hot_wall_heats_every_cell() {
    let mut fc = reference_channel(HeatTransferMode::FixedWallTemperature, 10);
    fc.inputs.t_wall.set_initial(500.0).unwrap();
    fc.setup().unwrap();
    fc.solve(None).unwrap();

    let q = field(&fc, "Q_dot_cell");
    assert!(q.iter().all(|&q| q > 0.0), "{q:?}");
    let t = field(&fc, "T");
    assert!(t.windows(2).all(|w| w[1] > w[0]));

    let outlet = fc.outputs.outlet.flow_state_value().unwrap();
    assert!(outlet.t0 > 300.0);
    assert!(outlet.t0 < 500.0);

    // Constant cp: stagnation enthalpy rise equals deposited heat.
    let total: f64 = q.iter().sum();
    let expected = 300.0 + total / (1.0e-2 * 5192.6);
    assert!((outlet.t0 - expected).abs() < 1e-4, "{} vs {expected}", outlet.t0);
}

#[test]
fn wall_at_mean_flow_temperature_deposits_nothing() {
    let mut adiabatic = reference_channel(HeatTransferMode::Adiabatic, 10);
    adiabatic.setup().unwrap();
    adiabatic.solve(None).unwrap();
    let t_mean = field(&adiabatic, "T_wall_cell");

    let mut fc = reference_channel(HeatTransferMode::FixedWallTemperature, 10);
    fc.inputs.t_wall.set_initial(t_mean).unwrap();
    fc.setup().unwrap();
    fc.solve(None).unwrap();

    let q = field(&fc, "Q_dot_cell");
    assert!(q.iter().all(|&q| q.abs() < 1e-6), "{q:?}");
}

#[test]
fn uniform_heat_rate_splits_evenly() {
    let mut fc = reference_channel(HeatTransferMode::FixedHeatRate, 10);
    fc.inputs.q_dot.set_initial(1000.0).unwrap();
    fc.setup().unwrap();
    fc.solve(None).unwrap();

    let q = field(&fc, "Q_dot_cell");
    assert!(q.iter().all(|&q| (q - 100.0).abs() < 1e-9));
    let t_wall = field(&fc, "T_wall_cell");
    let t = field(&fc, "T");
    for i in 0..10 {
        assert!(t_wall[i] > 0.5 * (t[i] + t[i + 1]));
    }
}

#[test]
fn shaped_heat_rate_heats_hydrogen_gas() {
    let h2 = Arc::new(IdealGas::new("H2", 14_300.0, 0.18, 2.016, 8.9e-6).unwrap());
    let cp = h2.specific_heat(300.0, 1.0e6).unwrap();
    let length = 0.89;
    let cells = 20;
    let mesh = Mesh1D::uniform(0.0, length, cells + 1).unwrap();
    let shape: Vec<f64> = mesh.cells().iter().map(|z| (PI * z / length).sin()).collect();

    let radius = 0.0015;
    let geometry = ChannelGeometry::new(
        m2(PI * radius * radius),
        m(2.0 * PI * radius),
        m(1.0e-6),
    )
    .unwrap();
    let mut fc = FlowChannel1D::new("coolant", mesh, geometry, h2, HeatTransferMode::FixedHeatRate);
    let mdot = 0.0147 / 19.0;
    let q_total = 0.18e6 / 19.0;
    fc.inputs
        .inlet
        .set_initial(FlowState::new(k(372.0), pa(6.0e6), kgps(mdot)))
        .unwrap();
    fc.inputs.q_dot.set_initial(q_total).unwrap();
    fc.inputs.q_dot_shape.set_initial(shape).unwrap();
    fc.setup().unwrap();
    fc.solve(None).unwrap();

    let q = field(&fc, "Q_dot_cell");
    let sum: f64 = q.iter().sum();
    assert!((sum - q_total).abs() / q_total < 1e-12);
    assert!(q[cells / 2] > q[0]);

    let outlet = fc.outputs.outlet.flow_state_value().unwrap();
    let rise = outlet.t0 - 372.0;
    let expected = q_total / (mdot * cp);
    assert!((rise - expected).abs() / expected < 1e-4, "{rise} vs {expected}");

    let u = field(&fc, "u");
    assert!(u[cells] > u[0], "heated gas accelerates");
}

#[test]
fn adiabatic_ideal_gas_keeps_stagnation_temperature() {
    let h2 = Arc::new(IdealGas::new("H2", 14_300.0, 0.18, 2.016, 8.9e-6).unwrap());
    let geometry = ChannelGeometry::new(m2(AREA), m(PERIMETER), m(0.0)).unwrap();
    let mut fc = FlowChannel1D::new(
        "gas",
        Mesh1D::uniform(0.0, 2.0, 41).unwrap(),
        geometry,
        h2,
        HeatTransferMode::Adiabatic,
    );
    fc.inputs
        .inlet
        .set_initial(FlowState::new(k(300.0), pa(1.0e6), kgps(1.0e-2)))
        .unwrap();
    fc.setup().unwrap();
    fc.solve(None).unwrap();

    let outlet = fc.outputs.outlet.flow_state_value().unwrap();
    assert!((outlet.t0 - 300.0).abs() < 1e-6, "{}", outlet.t0);
    assert!(outlet.p0 < 1.0e6);
    let rho = field(&fc, "rho");
    assert!(rho[40] < rho[0], "expanding gas loses density");
}
