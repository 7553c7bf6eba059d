//! One-dimensional area-averaged flow channel.
//!
//! The channel marches a steady mass/momentum/energy balance from inlet to
//! outlet, one cell at a time. Each downstream node is found by fixed-point
//! iteration seeded with the upstream node; friction and heat transfer use
//! node-averaged closures over the cell.

use std::sync::Arc;

use cf_core::Mesh1D;
use cf_core::numeric::avg;
use cf_core::units::{Area, Length};
use cf_fluids::EquationOfState;
use nalgebra::{DVector, Vector4};
use tracing::{debug, trace};

use crate::common::{check_finite, hydraulic_diameter, normalize};
use crate::correlations::Closures;
use crate::error::{ComponentError, ComponentResult};
use crate::stagnation::{static_to_stagnation, stagnation_to_static};
use crate::traits::Component;
use crate::variable::{FlowState, Location, VarValue, Variable};

/// Cross-section of a constant-area channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelGeometry {
    area: f64,
    wetted_perimeter: f64,
    roughness: f64,
}

impl ChannelGeometry {
    pub fn new(area: Area, wetted_perimeter: Length, roughness: Length) -> ComponentResult<Self> {
        let area = check_finite(area.value, "flow area")?;
        let wetted_perimeter = check_finite(wetted_perimeter.value, "wetted perimeter")?;
        let roughness = check_finite(roughness.value, "roughness")?;
        if area <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "flow area must be positive",
            });
        }
        if wetted_perimeter <= 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "wetted perimeter must be positive",
            });
        }
        if roughness < 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "roughness must be non-negative",
            });
        }
        Ok(Self {
            area,
            wetted_perimeter,
            roughness,
        })
    }

    /// Flow area [m²].
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Wetted perimeter [m].
    pub fn wetted_perimeter(&self) -> f64 {
        self.wetted_perimeter
    }

    /// Absolute wall roughness [m].
    pub fn roughness(&self) -> f64 {
        self.roughness
    }

    /// `4 A / P_w` [m].
    pub fn hydraulic_diameter(&self) -> f64 {
        hydraulic_diameter(self.area, self.wetted_perimeter)
    }
}

/// How heat enters the channel through its wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeatTransferMode {
    /// No wall heat. `T_wall_cell` reports the local mean fluid temperature.
    Adiabatic,
    /// Per-cell wall temperature from `T_wall`; the heat rate follows.
    FixedWallTemperature,
    /// Total heat rate `Q_dot` split by `Q_dot_shape`; the wall temperature follows.
    FixedHeatRate,
}

impl HeatTransferMode {
    /// Inputs through which wall heat can enter a channel.
    pub const HEAT_INPUTS: [&'static str; 3] = ["T_wall", "Q_dot", "Q_dot_shape"];

    /// The heat inputs this mode reads. The rest must stay unset and unconnected.
    pub fn heat_inputs(self) -> &'static [&'static str] {
        match self {
            HeatTransferMode::Adiabatic => &[],
            HeatTransferMode::FixedWallTemperature => &["T_wall"],
            HeatTransferMode::FixedHeatRate => &["Q_dot", "Q_dot_shape"],
        }
    }
}

/// Inner iteration controls shared by the inlet conversion and each node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelSettings {
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            tol: 1e-6,
            max_iter: 100,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChannelInputs {
    /// Inlet stagnation state.
    pub inlet: Variable,
    /// Cell wall temperature [K].
    pub t_wall: Variable,
    /// Total heat rate [W].
    pub q_dot: Variable,
    /// Relative per-cell heat distribution.
    pub q_dot_shape: Variable,
}

impl ChannelInputs {
    fn new(owner: &str) -> Self {
        Self {
            inlet: Variable::new_flow_state(owner, "inlet"),
            t_wall: Variable::new_field(owner, "T_wall", Some("K"), Location::Cell),
            q_dot: Variable::new_scalar(owner, "Q_dot", Some("W")),
            q_dot_shape: Variable::new_field(owner, "Q_dot_shape", None, Location::Cell),
        }
    }

    pub fn all(&self) -> Vec<&Variable> {
        vec![&self.inlet, &self.t_wall, &self.q_dot, &self.q_dot_shape]
    }

    pub fn all_mut(&mut self) -> Vec<&mut Variable> {
        vec![
            &mut self.inlet,
            &mut self.t_wall,
            &mut self.q_dot,
            &mut self.q_dot_shape,
        ]
    }
}

#[derive(Clone, Debug)]
pub struct ChannelOutputs {
    /// Outlet stagnation state.
    pub outlet: Variable,
    pub t: Variable,
    pub p: Variable,
    pub u: Variable,
    pub rho: Variable,
    pub mu: Variable,
    pub cp: Variable,
    pub k: Variable,
    pub e: Variable,
    pub re: Variable,
    pub pr: Variable,
    pub ff: Variable,
    pub nu: Variable,
    pub htc: Variable,
    pub t_wall_cell: Variable,
    pub q_dot_cell: Variable,
}

impl ChannelOutputs {
    fn new(owner: &str) -> Self {
        let zero = VarValue::Scalar(0.0);
        let node = |name, units| {
            Variable::new_field(owner, name, units, Location::Node).with_default(zero.clone())
        };
        let cell = |name, units| {
            Variable::new_field(owner, name, units, Location::Cell).with_default(zero.clone())
        };
        Self {
            outlet: Variable::new_flow_state(owner, "outlet"),
            t: node("T", Some("K")),
            p: node("P", Some("Pa")),
            u: node("u", Some("m/s")),
            rho: node("rho", Some("kg/m3")),
            mu: node("mu", Some("Pa*s")),
            cp: node("cp", Some("J/(kg*K)")),
            k: node("k", Some("W/(m*K)")),
            e: node("e", Some("J/kg")),
            re: node("Re", None),
            pr: node("Pr", None),
            ff: node("ff", None),
            nu: node("Nu", None),
            htc: node("htc", Some("W/(m2*K)")),
            t_wall_cell: cell("T_wall_cell", Some("K")),
            q_dot_cell: cell("Q_dot_cell", Some("W")),
        }
    }

    pub fn all(&self) -> Vec<&Variable> {
        vec![
            &self.outlet,
            &self.t,
            &self.p,
            &self.u,
            &self.rho,
            &self.mu,
            &self.cp,
            &self.k,
            &self.e,
            &self.re,
            &self.pr,
            &self.ff,
            &self.nu,
            &self.htc,
            &self.t_wall_cell,
            &self.q_dot_cell,
        ]
    }

    pub fn all_mut(&mut self) -> Vec<&mut Variable> {
        vec![
            &mut self.outlet,
            &mut self.t,
            &mut self.p,
            &mut self.u,
            &mut self.rho,
            &mut self.mu,
            &mut self.cp,
            &mut self.k,
            &mut self.e,
            &mut self.re,
            &mut self.pr,
            &mut self.ff,
            &mut self.nu,
            &mut self.htc,
            &mut self.t_wall_cell,
            &mut self.q_dot_cell,
        ]
    }
}

/// Thermodynamic and transport state at one node.
#[derive(Clone, Copy, Debug)]
struct NodeState {
    t: f64,
    p: f64,
    u: f64,
    rho: f64,
    cp: f64,
    mu: f64,
    k: f64,
    e: f64,
}

impl NodeState {
    fn at(
        fluid: &dyn EquationOfState,
        t: f64,
        p: f64,
        mdot: f64,
        area: f64,
    ) -> ComponentResult<Self> {
        let props = fluid.props(t, p)?;
        Ok(Self {
            t,
            p,
            u: mdot / (props.rho * area),
            rho: props.rho,
            cp: props.cp,
            mu: props.mu,
            k: props.k,
            e: props.e,
        })
    }

    /// Internal plus kinetic energy per unit mass.
    fn total_energy(&self) -> f64 {
        self.e + 0.5 * self.u * self.u
    }
}

/// Heat input resolved from the mode and input variables.
enum WallHeat {
    None,
    WallTemperature(Vec<f64>),
    HeatRate(Vec<f64>),
}

struct CellSolution {
    node: NodeState,
    t_wall: f64,
    q: f64,
}

struct ChannelProfile {
    nodes: Vec<NodeState>,
    t_wall_cell: Vec<f64>,
    q_dot_cell: Vec<f64>,
    outlet: FlowState,
}

/// Steady 1D channel with one inlet and one outlet.
pub struct FlowChannel1D {
    name: String,
    mesh: Mesh1D,
    geometry: ChannelGeometry,
    mode: HeatTransferMode,
    fluid: Arc<dyn EquationOfState>,
    closures: Closures,
    settings: ChannelSettings,
    ready: bool,
    pub inputs: ChannelInputs,
    pub outputs: ChannelOutputs,
}

impl FlowChannel1D {
    pub fn new(
        name: impl Into<String>,
        mesh: Mesh1D,
        geometry: ChannelGeometry,
        fluid: Arc<dyn EquationOfState>,
        mode: HeatTransferMode,
    ) -> Self {
        let name = name.into();
        Self {
            inputs: ChannelInputs::new(&name),
            outputs: ChannelOutputs::new(&name),
            name,
            mesh,
            geometry,
            mode,
            fluid,
            closures: Closures::default(),
            settings: ChannelSettings::default(),
            ready: false,
        }
    }

    pub fn with_closures(mut self, closures: Closures) -> Self {
        self.closures = closures;
        self
    }

    pub fn with_settings(mut self, settings: ChannelSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn mesh(&self) -> &Mesh1D {
        &self.mesh
    }

    pub fn geometry(&self) -> &ChannelGeometry {
        &self.geometry
    }

    pub fn mode(&self) -> HeatTransferMode {
        self.mode
    }

    pub fn settings(&self) -> ChannelSettings {
        self.settings
    }

    fn config_error(&self, message: &str) -> ComponentError {
        ComponentError::Config {
            component: self.name.clone(),
            message: message.to_string(),
        }
    }

    /// Exactly the heat inputs the mode needs, and nothing else.
    fn check_heat_inputs(&self) -> ComponentResult<()> {
        let has_t_wall = self.inputs.t_wall.has_initial();
        let has_q_dot = self.inputs.q_dot.has_initial();
        let has_shape = self.inputs.q_dot_shape.has_initial();
        match self.mode {
            HeatTransferMode::Adiabatic if has_t_wall || has_q_dot || has_shape => {
                Err(self.config_error("adiabatic channel cannot take T_wall, Q_dot or Q_dot_shape"))
            }
            _ if has_t_wall && has_q_dot => {
                Err(self.config_error("T_wall and Q_dot are mutually exclusive"))
            }
            HeatTransferMode::FixedWallTemperature if !has_t_wall => {
                Err(self.config_error("fixed wall temperature mode requires T_wall"))
            }
            HeatTransferMode::FixedWallTemperature if has_shape => {
                Err(self.config_error("Q_dot_shape only applies to fixed heat rate mode"))
            }
            HeatTransferMode::FixedHeatRate if !has_q_dot => {
                Err(self.config_error("fixed heat rate mode requires Q_dot"))
            }
            _ => Ok(()),
        }
    }

    fn wall_heat(&self) -> ComponentResult<WallHeat> {
        match self.mode {
            HeatTransferMode::Adiabatic => Ok(WallHeat::None),
            HeatTransferMode::FixedWallTemperature => {
                let t_wall = self.inputs.t_wall.field_value()?;
                Ok(WallHeat::WallTemperature(t_wall.iter().copied().collect()))
            }
            HeatTransferMode::FixedHeatRate => {
                let total = self.inputs.q_dot.scalar_value()?;
                let fractions = match self.inputs.q_dot_shape.value() {
                    Some(_) => {
                        let shape = self.inputs.q_dot_shape.field_value()?;
                        normalize(shape.as_slice()).map_err(|_| {
                            self.config_error("Q_dot_shape must have a positive finite sum")
                        })?
                    }
                    None => vec![1.0 / self.mesh.cell_count() as f64; self.mesh.cell_count()],
                };
                Ok(WallHeat::HeatRate(
                    fractions.into_iter().map(|f| total * f).collect(),
                ))
            }
        }
    }

    fn htc(&self, rho: f64, u: f64, mu: f64, cp: f64, k: f64) -> f64 {
        self.closures
            .htc(rho, u, mu, cp, k, self.geometry.hydraulic_diameter())
    }

    /// Iterate the state at the downstream node of cell `i`.
    fn solve_cell(
        &self,
        i: usize,
        dx: f64,
        up: &NodeState,
        mdot: f64,
        heat: &WallHeat,
    ) -> ComponentResult<CellSolution> {
        let fluid = self.fluid.as_ref();
        let d_h = self.geometry.hydraulic_diameter();
        let eps = self.geometry.roughness();
        let heated_area = self.geometry.wetted_perimeter() * dx;
        let reynolds = self.closures.reynolds;
        let friction_factor = self.closures.friction_factor;

        let re_up = reynolds(up.rho, up.u, d_h, up.mu);
        let htc_up = self.htc(up.rho, up.u, up.mu, up.cp, up.k);
        let e_tot_up = up.total_energy();

        let mut dn = *up;
        let mut residual = f64::INFINITY;
        for iter in 1..=self.settings.max_iter {
            // Mass
            let u = up.rho * up.u / dn.rho;

            // Momentum
            let re_dn = reynolds(dn.rho, u, d_h, dn.mu);
            let f_avg = friction_factor(eps, d_h, avg(re_up, re_dn));
            let rho_avg = avg(up.rho, dn.rho);
            let u_avg = avg(up.u, u);
            let p = up.p + up.rho * up.u * up.u
                - dn.rho * u * u
                - f_avg * dx * rho_avg * u_avg * u_avg / (2.0 * d_h);
            let p = check_finite(p, "channel pressure")?;

            // Energy
            let htc_avg = avg(htc_up, self.htc(dn.rho, u, dn.mu, dn.cp, dn.k));
            let t_avg = avg(up.t, dn.t);
            let (q, t_wall) = match heat {
                WallHeat::None => (0.0, t_avg),
                WallHeat::WallTemperature(t_wall) => {
                    (htc_avg * heated_area * (t_wall[i] - t_avg), t_wall[i])
                }
                WallHeat::HeatRate(q) => (q[i], q[i] / (htc_avg * heated_area) + t_avg),
            };
            let e_tot = e_tot_up + up.p / up.rho - p / dn.rho + q / mdot;
            let e = e_tot - 0.5 * u * u;
            let t = fluid.temperature(e, p)?;

            // Density closure
            let props = fluid.props(t, p)?;

            residual = Vector4::new(
                u - dn.u,
                p - dn.p,
                e_tot - dn.total_energy(),
                props.rho - dn.rho,
            )
            .norm();
            dn = NodeState {
                t,
                p,
                u,
                rho: props.rho,
                cp: props.cp,
                mu: props.mu,
                k: props.k,
                e,
            };

            if residual < self.settings.tol {
                trace!(channel = %self.name, node = i + 1, iter, residual, "node converged");
                return Ok(CellSolution {
                    node: dn,
                    t_wall: check_finite(t_wall, "wall temperature")?,
                    q,
                });
            }
        }

        Err(ComponentError::NodeNotConverged {
            component: self.name.clone(),
            node: i + 1,
            iterations: self.settings.max_iter,
            residual,
        })
    }

    fn march_nodes(&self) -> ComponentResult<ChannelProfile> {
        let fluid = self.fluid.as_ref();
        let area = self.geometry.area();
        let inlet = self.inputs.inlet.flow_state_value()?;
        let mdot = check_finite(inlet.mdot, "mass flow rate")?;
        if mdot <= 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "mass flow rate must be positive",
            });
        }
        let heat = self.wall_heat()?;

        let (t_in, p_in) =
            stagnation_to_static(fluid, inlet, area, self.settings.tol, self.settings.max_iter)?;

        let cells = self.mesh.cell_count();
        let mut nodes = Vec::with_capacity(cells + 1);
        let mut t_wall_cell = Vec::with_capacity(cells);
        let mut q_dot_cell = Vec::with_capacity(cells);
        nodes.push(NodeState::at(fluid, t_in, p_in, mdot, area)?);

        for (i, &dx) in self.mesh.dx().iter().enumerate() {
            let cell = self.solve_cell(i, dx, &nodes[i], mdot, &heat)?;
            nodes.push(cell.node);
            t_wall_cell.push(cell.t_wall);
            q_dot_cell.push(cell.q);
        }

        let last = nodes[cells];
        let outlet = static_to_stagnation(fluid, last.t, last.p, mdot, area)?;

        Ok(ChannelProfile {
            nodes,
            t_wall_cell,
            q_dot_cell,
            outlet,
        })
    }

    fn publish(&mut self, profile: ChannelProfile) -> ComponentResult<()> {
        let d_h = self.geometry.hydraulic_diameter();
        let eps = self.geometry.roughness();
        let c = self.closures;
        let nodes = &profile.nodes;

        let re = node_field(nodes, |n| (c.reynolds)(n.rho, n.u, d_h, n.mu));
        let pr = node_field(nodes, |n| (c.prandtl)(n.cp, n.mu, n.k));
        let ff = re.map(|re| (c.friction_factor)(eps, d_h, re));
        let nu = re.zip_map(&pr, |re, pr| (c.nusselt)(re, pr));
        let htc = nu.zip_map(&node_field(nodes, |n| n.k), |nu, k| nu * k / d_h);

        let out = &mut self.outputs;
        out.t.commit(node_field(nodes, |n| n.t))?;
        out.p.commit(node_field(nodes, |n| n.p))?;
        out.u.commit(node_field(nodes, |n| n.u))?;
        out.rho.commit(node_field(nodes, |n| n.rho))?;
        out.mu.commit(node_field(nodes, |n| n.mu))?;
        out.cp.commit(node_field(nodes, |n| n.cp))?;
        out.k.commit(node_field(nodes, |n| n.k))?;
        out.e.commit(node_field(nodes, |n| n.e))?;
        out.re.commit(re)?;
        out.pr.commit(pr)?;
        out.ff.commit(ff)?;
        out.nu.commit(nu)?;
        out.htc.commit(htc)?;
        out.t_wall_cell.commit(profile.t_wall_cell)?;
        out.q_dot_cell.commit(profile.q_dot_cell)?;
        out.outlet.commit(profile.outlet)?;
        Ok(())
    }
}

fn node_field(nodes: &[NodeState], f: impl Fn(&NodeState) -> f64) -> DVector<f64> {
    DVector::from_iterator(nodes.len(), nodes.iter().map(f))
}

impl Component for FlowChannel1D {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "FlowChannel1D"
    }

    fn inputs(&self) -> Vec<&Variable> {
        self.inputs.all()
    }

    fn outputs(&self) -> Vec<&Variable> {
        self.outputs.all()
    }

    fn variables_mut(&mut self) -> Vec<&mut Variable> {
        let mut vars = self.inputs.all_mut();
        vars.extend(self.outputs.all_mut());
        vars
    }

    fn accepts_input(&self, name: &str) -> bool {
        if HeatTransferMode::HEAT_INPUTS.contains(&name) {
            self.mode.heat_inputs().contains(&name)
        } else {
            self.is_input(name)
        }
    }

    fn setup(&mut self) -> ComponentResult<()> {
        self.check_heat_inputs()?;

        let mesh = &self.mesh;
        for var in self.inputs.all_mut() {
            var.bind(mesh);
        }
        for var in self.outputs.all_mut() {
            var.bind(mesh);
        }

        self.inputs.inlet.setup()?;
        match self.mode {
            HeatTransferMode::Adiabatic => {}
            HeatTransferMode::FixedWallTemperature => self.inputs.t_wall.setup()?,
            HeatTransferMode::FixedHeatRate => {
                self.inputs.q_dot.setup()?;
                if self.inputs.q_dot_shape.has_initial() {
                    self.inputs.q_dot_shape.setup()?;
                }
            }
        }

        if !self.outputs.outlet.has_initial() {
            if let Some(seed) = self.inputs.inlet.initial().cloned() {
                self.outputs.outlet.set_initial(seed)?;
            }
        }
        for var in self.outputs.all_mut() {
            var.setup()?;
        }

        self.ready = true;
        debug!(
            channel = %self.name,
            nodes = self.mesh.node_count(),
            mode = ?self.mode,
            fluid = self.fluid.name(),
            "flow channel set up"
        );
        Ok(())
    }

    fn solve(&mut self, _dt: Option<f64>) -> ComponentResult<()> {
        if !self.ready {
            return Err(ComponentError::NotSetUp {
                component: self.name.clone(),
            });
        }
        let profile = self
            .march_nodes()
            .map_err(|e| e.in_component(&self.name))?;
        debug!(
            channel = %self.name,
            t0_out = profile.outlet.t0,
            p0_out = profile.outlet.p0,
            "flow channel solved"
        );
        self.publish(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::units::{k, kgps, m, m2, pa};
    use cf_fluids::ConstantFluid;

    fn channel(mode: HeatTransferMode, cells: usize) -> FlowChannel1D {
        let fluid = Arc::new(ConstantFluid::new(0.166, 5192.6, 3.226e-5, 0.2256).unwrap());
        let geometry = ChannelGeometry::new(m2(7.2548e-3), m(0.4108273402), m(0.0)).unwrap();
        let mut fc = FlowChannel1D::new(
            "fc1",
            Mesh1D::uniform(0.0, 1.0, cells + 1).unwrap(),
            geometry,
            fluid,
            mode,
        );
        fc.inputs
            .inlet
            .set_initial(FlowState::new(k(300.0), pa(1.0e6), kgps(1.0e-2)))
            .unwrap();
        fc
    }

    #[test]
    fn geometry_validation() {
        assert!(ChannelGeometry::new(m2(0.0), m(1.0), m(0.0)).is_err());
        assert!(ChannelGeometry::new(m2(1.0), m(-1.0), m(0.0)).is_err());
        assert!(ChannelGeometry::new(m2(1.0), m(1.0), m(-1e-6)).is_err());
        let g = ChannelGeometry::new(m2(0.01), m(0.4), m(0.0)).unwrap();
        assert!((g.hydraulic_diameter() - 0.1).abs() < 1e-15);
    }

    #[test]
    fn solve_before_setup_fails() {
        let mut fc = channel(HeatTransferMode::Adiabatic, 4);
        assert!(matches!(
            fc.solve(None),
            Err(ComponentError::NotSetUp { .. })
        ));
    }

    #[test]
    fn adiabatic_rejects_heat_inputs() {
        let mut fc = channel(HeatTransferMode::Adiabatic, 4);
        fc.inputs.t_wall.set_initial(500.0).unwrap();
        assert!(matches!(fc.setup(), Err(ComponentError::Config { .. })));
    }

    #[test]
    fn mode_decides_which_heat_inputs_are_read() {
        let adiabatic = channel(HeatTransferMode::Adiabatic, 4);
        assert!(adiabatic.accepts_input("inlet"));
        assert!(!adiabatic.accepts_input("T_wall"));
        assert!(!adiabatic.accepts_input("Q_dot_shape"));

        let hot_wall = channel(HeatTransferMode::FixedWallTemperature, 4);
        assert!(hot_wall.accepts_input("T_wall"));
        assert!(!hot_wall.accepts_input("Q_dot"));

        let heated = channel(HeatTransferMode::FixedHeatRate, 4);
        assert!(heated.accepts_input("Q_dot"));
        assert!(heated.accepts_input("Q_dot_shape"));
        assert!(!heated.accepts_input("T_wall"));
        assert!(!heated.accepts_input("T"));
    }

    #[test]
    fn both_heat_inputs_rejected() {
        let mut fc = channel(HeatTransferMode::FixedWallTemperature, 4);
        fc.inputs.t_wall.set_initial(500.0).unwrap();
        fc.inputs.q_dot.set_initial(1.0e3).unwrap();
        assert!(matches!(fc.setup(), Err(ComponentError::Config { .. })));
    }

    #[test]
    fn missing_heat_input_rejected() {
        let mut fc = channel(HeatTransferMode::FixedHeatRate, 4);
        assert!(matches!(fc.setup(), Err(ComponentError::Config { .. })));
        let mut fc = channel(HeatTransferMode::FixedWallTemperature, 4);
        assert!(matches!(fc.setup(), Err(ComponentError::Config { .. })));
    }

    #[test]
    fn missing_inlet_is_unbound() {
        let mut fc = channel(HeatTransferMode::Adiabatic, 4);
        fc.inputs.inlet.clear_initial();
        match fc.setup() {
            Err(ComponentError::UnboundInput { component, variable }) => {
                assert_eq!(component, "fc1");
                assert_eq!(variable, "inlet");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wrong_length_wall_temperature_is_setup_error() {
        let mut fc = channel(HeatTransferMode::FixedWallTemperature, 4);
        fc.inputs.t_wall.set_initial(vec![500.0; 3]).unwrap();
        assert!(matches!(
            fc.setup(),
            Err(ComponentError::InvalidValue { .. })
        ));
    }

    #[test]
    fn outputs_have_mesh_lengths() {
        let mut fc = channel(HeatTransferMode::Adiabatic, 6);
        fc.setup().unwrap();
        fc.solve(None).unwrap();
        for var in [&fc.outputs.t, &fc.outputs.p, &fc.outputs.htc] {
            assert_eq!(var.field_value().unwrap().len(), 7);
        }
        assert_eq!(fc.outputs.q_dot_cell.field_value().unwrap().len(), 6);
        assert_eq!(fc.outputs.t_wall_cell.field_value().unwrap().len(), 6);
    }

    #[test]
    fn adiabatic_wall_temperature_tracks_fluid() {
        let mut fc = channel(HeatTransferMode::Adiabatic, 4);
        fc.setup().unwrap();
        fc.solve(None).unwrap();
        let t = fc.outputs.t.field_value().unwrap();
        let t_wall = fc.outputs.t_wall_cell.field_value().unwrap();
        for i in 0..4 {
            assert!((t_wall[i] - 0.5 * (t[i] + t[i + 1])).abs() < 1e-6);
        }
        let q = fc.outputs.q_dot_cell.field_value().unwrap();
        assert!(q.iter().all(|&q| q == 0.0));
    }

    #[test]
    fn zero_flow_rejected() {
        let mut fc = channel(HeatTransferMode::Adiabatic, 4);
        fc.inputs
            .inlet
            .set_initial(FlowState::from_si(300.0, 1.0e6, 0.0))
            .unwrap();
        fc.setup().unwrap();
        let err = fc.solve(None).unwrap_err();
        assert!(err.to_string().contains("fc1"));
    }

    #[test]
    fn node_iteration_cap_names_node() {
        let mut fc = channel(HeatTransferMode::FixedWallTemperature, 4).with_settings(
            ChannelSettings {
                tol: 1e-6,
                max_iter: 2,
            },
        );
        fc.inputs.t_wall.set_initial(500.0).unwrap();
        fc.setup().unwrap();
        // Wall heat moves the mean temperature on every pass, so two passes
        // are not enough for the first heated node.
        match fc.solve(None) {
            Err(ComponentError::NodeNotConverged { component, node, .. }) => {
                assert_eq!(component, "fc1");
                assert_eq!(node, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn repeated_solve_is_idempotent() {
        let mut fc = channel(HeatTransferMode::Adiabatic, 4);
        fc.setup().unwrap();
        fc.solve(None).unwrap();
        fc.solve(None).unwrap();
        assert_eq!(fc.residual_sq(), 0.0);
    }
}
