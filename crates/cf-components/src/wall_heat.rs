//! Convective heat deposited by a wall into an adjacent flow.

use cf_core::Mesh1D;
use cf_core::numeric::avg;
use cf_core::units::Length;
use tracing::debug;

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};
use crate::traits::Component;
use crate::variable::{Location, VarValue, Variable};

#[derive(Clone, Debug)]
pub struct WallHeatInputs {
    /// Flow temperature at nodes [K].
    pub t_flow: Variable,
    /// Wall temperature per cell [K].
    pub t_wall: Variable,
    /// Heat transfer coefficient at nodes [W/(m²·K)].
    pub htc: Variable,
}

#[derive(Clone, Debug)]
pub struct WallHeatOutputs {
    /// Heat rate into the flow per cell [W].
    pub q_dot: Variable,
}

/// Cell heat rate `htc_avg (T_wall - T_flow,avg) P_w dx` from node-valued
/// flow temperature and heat transfer coefficient.
pub struct WallHeatSource {
    name: String,
    mesh: Mesh1D,
    wetted_perimeter: f64,
    ready: bool,
    pub inputs: WallHeatInputs,
    pub outputs: WallHeatOutputs,
}

impl WallHeatSource {
    pub fn new(
        name: impl Into<String>,
        mesh: Mesh1D,
        wetted_perimeter: Length,
    ) -> ComponentResult<Self> {
        let wetted_perimeter = check_finite(wetted_perimeter.value, "wetted perimeter")?;
        if wetted_perimeter <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "wetted perimeter must be positive",
            });
        }
        let name = name.into();
        Ok(Self {
            inputs: WallHeatInputs {
                t_flow: Variable::new_field(&name, "T_flow", Some("K"), Location::Node),
                t_wall: Variable::new_field(&name, "T_wall", Some("K"), Location::Cell),
                htc: Variable::new_field(&name, "htc", Some("W/(m2*K)"), Location::Node),
            },
            outputs: WallHeatOutputs {
                q_dot: Variable::new_field(&name, "Q_dot", Some("W"), Location::Cell)
                    .with_default(VarValue::Scalar(0.0)),
            },
            name,
            mesh,
            wetted_perimeter,
            ready: false,
        })
    }

    pub fn mesh(&self) -> &Mesh1D {
        &self.mesh
    }
}

impl Component for WallHeatSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "WallHeatSource"
    }

    fn inputs(&self) -> Vec<&Variable> {
        vec![&self.inputs.t_flow, &self.inputs.t_wall, &self.inputs.htc]
    }

    fn outputs(&self) -> Vec<&Variable> {
        vec![&self.outputs.q_dot]
    }

    fn variables_mut(&mut self) -> Vec<&mut Variable> {
        vec![
            &mut self.inputs.t_flow,
            &mut self.inputs.t_wall,
            &mut self.inputs.htc,
            &mut self.outputs.q_dot,
        ]
    }

    fn setup(&mut self) -> ComponentResult<()> {
        let mesh = &self.mesh;
        for var in [
            &mut self.inputs.t_flow,
            &mut self.inputs.t_wall,
            &mut self.inputs.htc,
            &mut self.outputs.q_dot,
        ] {
            var.bind(mesh);
            var.setup()?;
        }
        self.ready = true;
        debug!(component = %self.name, cells = self.mesh.cell_count(), "wall heat source set up");
        Ok(())
    }

    fn solve(&mut self, _dt: Option<f64>) -> ComponentResult<()> {
        if !self.ready {
            return Err(ComponentError::NotSetUp {
                component: self.name.clone(),
            });
        }
        let t_flow = self.inputs.t_flow.field_value()?;
        let t_wall = self.inputs.t_wall.field_value()?;
        let htc = self.inputs.htc.field_value()?;

        let q: Vec<f64> = self
            .mesh
            .dx()
            .iter()
            .enumerate()
            .map(|(i, &dx)| {
                let htc_avg = avg(htc[i], htc[i + 1]);
                let t_avg = avg(t_flow[i], t_flow[i + 1]);
                htc_avg * (t_wall[i] - t_avg) * self.wetted_perimeter * dx
            })
            .collect();
        self.outputs.q_dot.commit(q)
    }
}
