//! Property tests for flow-state conversions and heat shapes.

use cf_components::common::normalize;
use cf_components::{FlowState, static_to_stagnation, stagnation_to_static};
use cf_fluids::IdealGas;
use proptest::prelude::*;

proptest! {
    #[test]
    fn stagnation_round_trip(
        t0 in 250.0_f64..1500.0,
        p0 in 1.0e5_f64..1.0e7,
        mdot in 1.0e-4_f64..5.0e-2,
    ) {
        let h2 = IdealGas::new("H2", 14_300.0, 0.18, 2.016, 8.9e-6).unwrap();
        let area = 7.2548e-3;
        let inlet = FlowState::from_si(t0, p0, mdot);
        let (t, p) = stagnation_to_static(&h2, inlet, area, 1e-12, 200).unwrap();
        prop_assert!(t < t0 && p < p0);

        let back = static_to_stagnation(&h2, t, p, mdot, area).unwrap();
        prop_assert!((back.t0 - t0).abs() / t0 < 1e-8);
        prop_assert!((back.p0 - p0).abs() / p0 < 1e-8);
        prop_assert_eq!(back.mdot, mdot);
    }

    #[test]
    fn normalized_shape_sums_to_one(shape in prop::collection::vec(1e-3_f64..10.0, 1..64)) {
        let fractions = normalize(&shape).unwrap();
        let sum: f64 = fractions.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-12);
        prop_assert!(fractions.iter().all(|f| *f > 0.0));
    }
}
