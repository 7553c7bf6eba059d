//! Typed component variables.
//!
//! A [`Variable`] carries an initial value, a current value and the value it
//! held before the last commit. Components declare every input and output as
//! a `Variable` so the network solver can copy values between them and
//! measure how much they changed in an iteration.

use cf_core::Mesh1D;
use cf_core::numeric::sum_sq_diff;
use cf_core::units::{MassRate, Pressure, Temperature};
use nalgebra::DVector;

use crate::error::{ComponentError, ComponentResult};

/// Where a mesh field lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Node,
    Cell,
}

/// Shape of the values a variable accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarKind {
    Scalar,
    Field(Location),
    FlowState,
}

impl VarKind {
    pub fn label(self) -> &'static str {
        match self {
            VarKind::Scalar => "scalar",
            VarKind::Field(Location::Node) => "node field",
            VarKind::Field(Location::Cell) => "cell field",
            VarKind::FlowState => "flow state",
        }
    }
}

/// Stagnation temperature, stagnation pressure and mass flow rate (SI).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowState {
    /// Stagnation temperature [K]
    pub t0: f64,
    /// Stagnation pressure [Pa]
    pub p0: f64,
    /// Mass flow rate [kg/s]
    pub mdot: f64,
}

impl FlowState {
    pub fn new(t0: Temperature, p0: Pressure, mdot: MassRate) -> Self {
        Self::from_si(t0.value, p0.value, mdot.value)
    }

    pub fn from_si(t0: f64, p0: f64, mdot: f64) -> Self {
        Self { t0, p0, mdot }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.t0, self.p0, self.mdot]
    }
}

/// A value held by a variable.
///
/// A `Scalar` given as the initial value of a field is broadcast to every
/// node or cell when the field is set up.
#[derive(Clone, Debug, PartialEq)]
pub enum VarValue {
    Scalar(f64),
    Field(DVector<f64>),
    FlowState(FlowState),
}

impl VarValue {
    fn label(&self) -> &'static str {
        match self {
            VarValue::Scalar(_) => "scalar",
            VarValue::Field(_) => "field",
            VarValue::FlowState(_) => "flow state",
        }
    }

    /// Sum of squared element-wise differences against `other`.
    ///
    /// Mismatched shapes count as zero change; commits reject them anyway.
    pub fn sq_diff(&self, other: &VarValue) -> f64 {
        match (self, other) {
            (VarValue::Scalar(a), VarValue::Scalar(b)) => (a - b) * (a - b),
            (VarValue::Field(a), VarValue::Field(b)) => sum_sq_diff(a.as_slice(), b.as_slice()),
            (VarValue::FlowState(a), VarValue::FlowState(b)) => {
                sum_sq_diff(&a.as_array(), &b.as_array())
            }
            _ => 0.0,
        }
    }
}

impl From<f64> for VarValue {
    fn from(v: f64) -> Self {
        VarValue::Scalar(v)
    }
}

impl From<Vec<f64>> for VarValue {
    fn from(v: Vec<f64>) -> Self {
        VarValue::Field(DVector::from_vec(v))
    }
}

impl From<DVector<f64>> for VarValue {
    fn from(v: DVector<f64>) -> Self {
        VarValue::Field(v)
    }
}

impl From<FlowState> for VarValue {
    fn from(v: FlowState) -> Self {
        VarValue::FlowState(v)
    }
}

/// Named, typed quantity owned by a component.
#[derive(Clone, Debug)]
pub struct Variable {
    component: String,
    name: &'static str,
    units: Option<&'static str>,
    kind: VarKind,
    len: Option<usize>,
    initial: Option<VarValue>,
    value: Option<VarValue>,
    prev: Option<VarValue>,
}

impl Variable {
    pub fn new(
        component: impl Into<String>,
        name: &'static str,
        units: Option<&'static str>,
        kind: VarKind,
    ) -> Self {
        Self {
            component: component.into(),
            name,
            units,
            kind,
            len: None,
            initial: None,
            value: None,
            prev: None,
        }
    }

    pub fn new_scalar(component: &str, name: &'static str, units: Option<&'static str>) -> Self {
        Self::new(component, name, units, VarKind::Scalar)
    }

    pub fn new_field(
        component: &str,
        name: &'static str,
        units: Option<&'static str>,
        location: Location,
    ) -> Self {
        Self::new(component, name, units, VarKind::Field(location))
    }

    pub fn new_flow_state(component: &str, name: &'static str) -> Self {
        Self::new(component, name, None, VarKind::FlowState)
    }

    /// Builder form of [`Variable::set_initial`] for defaults that cannot fail.
    pub(crate) fn with_default(mut self, initial: VarValue) -> Self {
        self.initial = Some(initial);
        self
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn units(&self) -> Option<&'static str> {
        self.units
    }

    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// Field length once bound to a mesh.
    pub fn field_len(&self) -> Option<usize> {
        self.len
    }

    pub fn initial(&self) -> Option<&VarValue> {
        self.initial.as_ref()
    }

    pub fn has_initial(&self) -> bool {
        self.initial.is_some()
    }

    pub fn value(&self) -> Option<&VarValue> {
        self.value.as_ref()
    }

    pub fn prev_value(&self) -> Option<&VarValue> {
        self.prev.as_ref()
    }

    pub fn set_initial(&mut self, initial: impl Into<VarValue>) -> ComponentResult<()> {
        let initial = initial.into();
        let accepted = matches!(
            (self.kind, &initial),
            (VarKind::Scalar, VarValue::Scalar(_))
                | (VarKind::Field(_), VarValue::Scalar(_) | VarValue::Field(_))
                | (VarKind::FlowState, VarValue::FlowState(_))
        );
        if !accepted {
            return Err(self.invalid(format!(
                "a {} cannot take a {} initial value",
                self.kind.label(),
                initial.label()
            )));
        }
        if let (Some(len), VarValue::Field(v)) = (self.len, &initial) {
            self.check_len(len, v.len())?;
        }
        self.initial = Some(initial);
        Ok(())
    }

    pub fn clear_initial(&mut self) {
        self.initial = None;
    }

    /// Fix the length of a field variable to the node or cell count of `mesh`.
    pub fn bind(&mut self, mesh: &Mesh1D) {
        self.len = match self.kind {
            VarKind::Field(Location::Node) => Some(mesh.node_count()),
            VarKind::Field(Location::Cell) => Some(mesh.cell_count()),
            _ => None,
        };
    }

    /// Load the initial value into both value slots.
    pub fn setup(&mut self) -> ComponentResult<()> {
        let initial = self
            .initial
            .clone()
            .ok_or_else(|| ComponentError::UnboundInput {
                component: self.component.clone(),
                variable: self.name.to_string(),
            })?;
        let value = self.expand(initial)?;
        self.prev = Some(value.clone());
        self.value = Some(value);
        Ok(())
    }

    /// Overwrite both the initial and the current value.
    ///
    /// Used for externally imposed changes such as scheduled events. Before
    /// setup only the initial value is replaced.
    pub fn assign(&mut self, new: impl Into<VarValue>) -> ComponentResult<()> {
        let new = new.into();
        self.set_initial(new.clone())?;
        if self.value.is_some() {
            let value = self.expand(new)?;
            self.commit(value)?;
        }
        Ok(())
    }

    /// Broadcast a scalar over a bound field and check field lengths.
    fn expand(&self, value: VarValue) -> ComponentResult<VarValue> {
        match (self.kind, value) {
            (VarKind::Field(_), VarValue::Scalar(s)) => {
                let len = self.bound_len()?;
                Ok(VarValue::Field(DVector::from_element(len, s)))
            }
            (VarKind::Field(_), VarValue::Field(v)) => {
                let len = self.bound_len()?;
                self.check_len(len, v.len())?;
                Ok(VarValue::Field(v))
            }
            (_, v) => Ok(v),
        }
    }

    /// Replace the current value, keeping the old one for the change measure.
    pub fn commit(&mut self, new: impl Into<VarValue>) -> ComponentResult<()> {
        let new = new.into();
        let ok = matches!(
            (self.kind, &new),
            (VarKind::Scalar, VarValue::Scalar(_))
                | (VarKind::Field(_), VarValue::Field(_))
                | (VarKind::FlowState, VarValue::FlowState(_))
        );
        if !ok {
            return Err(self.invalid(format!(
                "cannot store a {} in a {}",
                new.label(),
                self.kind.label()
            )));
        }
        if let (Some(len), VarValue::Field(v)) = (self.len, &new) {
            self.check_len(len, v.len())?;
        }
        self.prev = self.value.replace(new);
        Ok(())
    }

    /// Squared change between the current and previous value.
    pub fn r2(&self) -> f64 {
        match (&self.value, &self.prev) {
            (Some(v), Some(p)) => v.sq_diff(p),
            _ => 0.0,
        }
    }

    /// Adopt the converged value as the next step's initial condition.
    pub fn march(&mut self) {
        if let Some(v) = &self.value {
            self.initial = Some(v.clone());
            self.prev = Some(v.clone());
        }
    }

    pub fn scalar_value(&self) -> ComponentResult<f64> {
        match self.current()? {
            VarValue::Scalar(v) => Ok(*v),
            other => Err(self.wrong_shape(other)),
        }
    }

    pub fn field_value(&self) -> ComponentResult<&DVector<f64>> {
        match self.current()? {
            VarValue::Field(v) => Ok(v),
            other => Err(self.wrong_shape(other)),
        }
    }

    pub fn flow_state_value(&self) -> ComponentResult<FlowState> {
        match self.current()? {
            VarValue::FlowState(v) => Ok(*v),
            other => Err(self.wrong_shape(other)),
        }
    }

    fn current(&self) -> ComponentResult<&VarValue> {
        self.value.as_ref().ok_or_else(|| ComponentError::UnboundInput {
            component: self.component.clone(),
            variable: self.name.to_string(),
        })
    }

    fn bound_len(&self) -> ComponentResult<usize> {
        self.len
            .ok_or_else(|| self.invalid("field is not bound to a mesh".to_string()))
    }

    fn check_len(&self, expected: usize, got: usize) -> ComponentResult<()> {
        if expected == got {
            Ok(())
        } else {
            Err(self.invalid(format!("expected {expected} values, got {got}")))
        }
    }

    fn wrong_shape(&self, value: &VarValue) -> ComponentError {
        self.invalid(format!("holds a {}", value.label()))
    }

    fn invalid(&self, message: String) -> ComponentError {
        ComponentError::InvalidValue {
            component: self.component.clone(),
            variable: self.name.to_string(),
            message,
        }
    }
}
