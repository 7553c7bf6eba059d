//! Integration tests for transient runs over flow channels.

use std::sync::Arc;

use cf_components::{ChannelGeometry, FlowChannel1D, FlowState, HeatTransferMode, VarValue};
use cf_core::Mesh1D;
use cf_core::units::{k, kgps, m, m2, pa};
use cf_fluids::ConstantFluid;
use cf_sim::{Schedule, ScheduledEvent, TransientOptions, run_transient, run_transient_with_progress};
use cf_solver::{System, VarRef};

const CP: f64 = 5192.6;

fn heated_system(q_dot: f64) -> (System, VarRef, VarRef) {
    let fluid = Arc::new(ConstantFluid::new(0.166, CP, 3.226e-5, 0.2256).unwrap());
    let geometry = ChannelGeometry::new(m2(7.2548e-3), m(0.4108273402), m(0.0)).unwrap();
    let mut fc = FlowChannel1D::new(
        "core",
        Mesh1D::uniform(0.0, 1.0, 11).unwrap(),
        geometry,
        fluid,
        HeatTransferMode::FixedHeatRate,
    );
    fc.inputs
        .inlet
        .set_initial(FlowState::new(k(300.0), pa(1.0e6), kgps(1.0e-2)))
        .unwrap();
    fc.inputs.q_dot.set_initial(q_dot).unwrap();

    let mut system = System::new();
    system.add(fc).unwrap();
    let q = system.var_ref("core", "Q_dot").unwrap();
    let outlet = system.var_ref("core", "outlet").unwrap();
    (system, q, outlet)
}

fn outlet_t0(system: &System, outlet: &VarRef) -> f64 {
    system
        .variable(outlet)
        .unwrap()
        .flow_state_value()
        .unwrap()
        .t0
}

#[test]
fn heat_rate_step_change() {
    let (mut system, q, outlet) = heated_system(1.0e3);
    let schedule = Schedule::new(vec![ScheduledEvent {
        time_s: 2.0,
        target: q,
        value: VarValue::Scalar(2.0e3),
    }])
    .unwrap();
    let opts = TransientOptions {
        dt: 1.0,
        duration: 3.0,
        ..Default::default()
    };

    let report = run_transient(&mut system, &opts, schedule).unwrap();
    assert_eq!(report.steps.len(), 3);
    assert!(report.all_converged());
    let fired: Vec<usize> = report.steps.iter().map(|s| s.events_fired).collect();
    assert_eq!(fired, vec![0, 1, 0]);

    // Stagnation enthalpy rise follows the new heat rate.
    let rise = outlet_t0(&system, &outlet) - 300.0;
    let expected = 2.0e3 / (1.0e-2 * CP);
    assert!((rise - expected).abs() < 1e-4, "{rise} vs {expected}");
}

#[test]
fn inlet_flow_event_changes_outlet_flow() {
    let (mut system, _, outlet) = heated_system(1.0e3);
    let inlet = system.var_ref("core", "inlet").unwrap();
    let schedule = Schedule::new(vec![ScheduledEvent {
        time_s: 0.5,
        target: inlet,
        value: VarValue::FlowState(FlowState::from_si(300.0, 1.0e6, 2.0e-2)),
    }])
    .unwrap();
    let opts = TransientOptions {
        dt: 0.5,
        duration: 1.0,
        ..Default::default()
    };

    let mut times = Vec::new();
    let report = run_transient_with_progress(&mut system, &opts, schedule, |record| {
        times.push(record.time_s);
    })
    .unwrap();
    assert_eq!(times, vec![0.5, 1.0]);
    assert_eq!(report.steps[0].events_fired, 1);

    let out = system.variable(&outlet).unwrap().flow_state_value().unwrap();
    assert_eq!(out.mdot, 2.0e-2);
    let expected = 1.0e3 / (2.0e-2 * CP);
    assert!((out.t0 - 300.0 - expected).abs() < 1e-4);
}

#[test]
fn steady_profile_holds_without_events() {
    let (mut system, _, outlet) = heated_system(1.0e3);
    let opts = TransientOptions {
        dt: 1.0,
        duration: 4.0,
        ..Default::default()
    };
    let report = run_transient(&mut system, &opts, Schedule::default()).unwrap();
    assert_eq!(report.steps.len(), 4);
    // After the first step nothing changes, so later steps converge at once.
    assert!(report.steps[1..].iter().all(|s| s.solve.iterations == 1));
    let t0 = outlet_t0(&system, &outlet);
    assert!(t0 > 300.0);
}

#[test]
fn event_on_output_is_rejected() {
    let (mut system, _, outlet) = heated_system(1.0e3);
    let schedule = Schedule::new(vec![ScheduledEvent {
        time_s: 0.0,
        target: outlet,
        value: VarValue::FlowState(FlowState::from_si(300.0, 1.0e6, 1.0e-2)),
    }])
    .unwrap();
    let err = run_transient(&mut system, &TransientOptions::default(), schedule).unwrap_err();
    assert!(err.to_string().contains("not an input"));
}
