//! Property tests for mesh construction.

use cf_core::Mesh1D;
use proptest::prelude::*;

proptest! {
    #[test]
    fn uniform_mesh_cells_sum_to_length(
        start in -10.0_f64..10.0,
        span in 1e-3_f64..50.0,
        count in 2_usize..200,
    ) {
        let mesh = Mesh1D::uniform(start, start + span, count).unwrap();
        prop_assert_eq!(mesh.cell_count(), mesh.node_count() - 1);
        let total: f64 = mesh.dx().iter().sum();
        prop_assert!((total - span).abs() < 1e-9 * span.max(1.0));
        prop_assert!(mesh.dx().iter().all(|dx| *dx > 0.0));
    }

    #[test]
    fn cell_centers_lie_between_nodes(mut steps in prop::collection::vec(1e-3_f64..2.0, 1..50)) {
        let mut nodes = vec![0.0];
        for step in steps.drain(..) {
            let last = nodes[nodes.len() - 1];
            nodes.push(last + step);
        }
        let mesh = Mesh1D::from_nodes(nodes).unwrap();
        for (i, c) in mesh.cells().iter().enumerate() {
            prop_assert!(*c > mesh.nodes()[i] && *c < mesh.nodes()[i + 1]);
        }
    }
}
