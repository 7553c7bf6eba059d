//! One-dimensional mesh partition.

use crate::error::{CfError, CfResult};
use crate::numeric::avg;

/// An immutable 1D partition: strictly increasing node positions plus the
/// derived cell centers and cell widths.
///
/// `cells().len() == nodes().len() - 1` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh1D {
    nodes: Vec<f64>,
    cells: Vec<f64>,
    dx: Vec<f64>,
}

impl Mesh1D {
    /// Build a mesh from explicit node positions [m].
    pub fn from_nodes(nodes: Vec<f64>) -> CfResult<Self> {
        if nodes.len() < 2 {
            return Err(CfError::Mesh {
                what: "at least two nodes are required",
            });
        }
        if nodes.iter().any(|x| !x.is_finite()) {
            return Err(CfError::Mesh {
                what: "node positions must be finite",
            });
        }
        if nodes.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CfError::Mesh {
                what: "node positions must be strictly increasing",
            });
        }

        let cells = nodes.windows(2).map(|w| avg(w[0], w[1])).collect();
        let dx = nodes.windows(2).map(|w| w[1] - w[0]).collect();
        Ok(Self { nodes, cells, dx })
    }

    /// Build a uniform mesh of `count` nodes spanning `[start, end]`.
    pub fn uniform(start: f64, end: f64, count: usize) -> CfResult<Self> {
        if count < 2 {
            return Err(CfError::Mesh {
                what: "at least two nodes are required",
            });
        }
        let step = (end - start) / (count - 1) as f64;
        let mut nodes: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
        // Pin the last node so the span is exact.
        nodes[count - 1] = end;
        Self::from_nodes(nodes)
    }

    /// Node positions [m].
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Cell centers [m].
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Cell widths [m].
    pub fn dx(&self) -> &[f64] {
        &self.dx
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Distance from the first to the last node [m].
    pub fn length(&self) -> f64 {
        self.nodes[self.nodes.len() - 1] - self.nodes[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_mesh_layout() {
        let mesh = Mesh1D::uniform(0.0, 1.0, 11).unwrap();
        assert_eq!(mesh.node_count(), 11);
        assert_eq!(mesh.cell_count(), 10);
        assert!((mesh.cells()[0] - 0.05).abs() < 1e-12);
        assert!(mesh.dx().iter().all(|dx| (dx - 0.1).abs() < 1e-12));
        assert_eq!(mesh.length(), 1.0);
    }

    #[test]
    fn explicit_nodes_give_midpoints() {
        let mesh = Mesh1D::from_nodes(vec![0.0, 1.0, 3.0]).unwrap();
        assert_eq!(mesh.cells(), &[0.5, 2.0]);
        assert_eq!(mesh.dx(), &[1.0, 2.0]);
    }

    #[test]
    fn rejects_single_node() {
        assert!(Mesh1D::from_nodes(vec![0.0]).is_err());
        assert!(Mesh1D::uniform(0.0, 1.0, 1).is_err());
    }

    #[test]
    fn rejects_non_monotonic_nodes() {
        assert!(Mesh1D::from_nodes(vec![0.0, 1.0, 1.0]).is_err());
        assert!(Mesh1D::from_nodes(vec![0.0, 2.0, 1.0]).is_err());
        assert!(Mesh1D::uniform(1.0, 0.0, 5).is_err());
    }
}
