//! Core trait for network components.

use crate::error::ComponentResult;
use crate::variable::Variable;

/// A named unit of the network that reads input variables and writes output
/// variables.
///
/// Implementors declare their variables as fixed struct fields and expose
/// them through `inputs`, `outputs` and `variables_mut`. The solver relies on
/// input and output names being disjoint.
pub trait Component: Send {
    /// Unique name within a system.
    fn name(&self) -> &str;

    /// Component type, for logging.
    fn type_name(&self) -> &'static str;

    fn inputs(&self) -> Vec<&Variable>;

    fn outputs(&self) -> Vec<&Variable>;

    /// Every input and output, mutably.
    fn variables_mut(&mut self) -> Vec<&mut Variable>;

    /// Bind fields to the mesh, validate configuration and load initial values.
    fn setup(&mut self) -> ComponentResult<()>;

    /// Compute outputs from the current inputs. `dt` is `None` for steady solves.
    fn solve(&mut self, dt: Option<f64>) -> ComponentResult<()>;

    fn variable(&self, name: &str) -> Option<&Variable> {
        self.inputs()
            .into_iter()
            .chain(self.outputs())
            .find(|v| v.name() == name)
    }

    fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables_mut().into_iter().find(|v| v.name() == name)
    }

    fn is_input(&self, name: &str) -> bool {
        self.inputs().iter().any(|v| v.name() == name)
    }

    /// Whether input `name` is read in the current configuration. Connections
    /// and events may only drive inputs that are.
    fn accepts_input(&self, name: &str) -> bool {
        self.is_input(name)
    }

    fn is_output(&self, name: &str) -> bool {
        self.outputs().iter().any(|v| v.name() == name)
    }

    /// Sum of `r2` over the output variables.
    fn residual_sq(&self) -> f64 {
        self.outputs().iter().map(|v| v.r2()).sum()
    }

    /// Make current values the initial condition of the next time step.
    fn march(&mut self) {
        for var in self.variables_mut() {
            var.march();
        }
    }
}
