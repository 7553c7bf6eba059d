//! Component registry and connection graph.

use std::collections::HashMap;

use cf_components::{Component, VarValue, Variable};
use cf_core::CompId;
use tracing::{debug, info};

use crate::connection::{Connection, VarRef};
use crate::error::{SolverError, SolverResult};

/// Where a component is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Declared,
    SetUp,
    Solved,
    Marched,
}

struct Entry {
    component: Box<dyn Component>,
    stage: Lifecycle,
}

/// Components, the connections between their variables, and per-component
/// lifecycle state.
///
/// Components and connections may only be added before the first `setup`.
#[derive(Default)]
pub struct System {
    entries: Vec<Entry>,
    by_name: HashMap<String, CompId>,
    connections: Vec<Connection>,
    frozen: bool,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component. Names must be unique.
    pub fn add_component(&mut self, component: Box<dyn Component>) -> SolverResult<CompId> {
        self.ensure_mutable()?;
        let name = component.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(SolverError::Config {
                what: format!("a component named \"{name}\" already exists"),
            });
        }
        let id = CompId::from_index(self.entries.len());
        self.entries.push(Entry {
            component,
            stage: Lifecycle::Declared,
        });
        self.by_name.insert(name, id);
        Ok(id)
    }

    pub fn add<C: Component + 'static>(&mut self, component: C) -> SolverResult<CompId> {
        self.add_component(Box::new(component))
    }

    /// Look up a component by name.
    pub fn find(&self, name: &str) -> SolverResult<CompId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SolverError::UnknownComponent {
                name: name.to_string(),
            })
    }

    /// Resolve `component` / `variable` names into a checked reference.
    pub fn var_ref(&self, component: &str, variable: &str) -> SolverResult<VarRef> {
        let id = self.find(component)?;
        let var_ref = VarRef::new(id, variable);
        self.lookup(&var_ref)?;
        Ok(var_ref)
    }

    /// Link an output variable to an input variable.
    ///
    /// Both ends must have the same variant, and a target accepts at most one
    /// source.
    pub fn connect(&mut self, source: VarRef, target: VarRef) -> SolverResult<()> {
        self.ensure_mutable()?;
        let src = self.lookup(&source)?;
        let dst = self.lookup(&target)?;
        let src_owner = self.entry(source.component)?.component.as_ref();
        let dst_owner = self.entry(target.component)?.component.as_ref();
        let describe = |v: &Variable| format!("{} :: {}", v.component(), v.name());

        if !src_owner.is_output(&source.variable) {
            return Err(SolverError::Config {
                what: format!("{} is not an output and cannot be a source", describe(src)),
            });
        }
        if !dst_owner.is_input(&target.variable) {
            return Err(SolverError::Config {
                what: format!("{} is not an input and cannot be a target", describe(dst)),
            });
        }
        if !dst_owner.accepts_input(&target.variable) {
            return Err(SolverError::Config {
                what: format!(
                    "{} is not read by this {} configuration",
                    describe(dst),
                    dst_owner.type_name()
                ),
            });
        }
        if src.kind() != dst.kind() {
            return Err(SolverError::Config {
                what: format!(
                    "cannot connect {} ({}) to {} ({})",
                    describe(src),
                    src.kind().label(),
                    describe(dst),
                    dst.kind().label()
                ),
            });
        }
        if self.connections.iter().any(|c| c.target == target) {
            return Err(SolverError::Config {
                what: format!("{} is already connected to a source", describe(dst)),
            });
        }

        debug!(source = %describe(src), target = %describe(dst), "connected");
        self.connections.push(Connection { source, target });
        Ok(())
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Component ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = CompId> + '_ {
        (0..self.entries.len()).map(CompId::from_index)
    }

    pub fn component(&self, id: CompId) -> SolverResult<&dyn Component> {
        Ok(self.entry(id)?.component.as_ref())
    }

    pub fn stage(&self, id: CompId) -> SolverResult<Lifecycle> {
        Ok(self.entry(id)?.stage)
    }

    pub fn variable(&self, var_ref: &VarRef) -> SolverResult<&Variable> {
        self.lookup(var_ref)
    }

    /// Impose a new value on an input, e.g. from a scheduled event.
    pub fn set_input(&mut self, var_ref: &VarRef, value: VarValue) -> SolverResult<()> {
        let entry = self.entry_mut(var_ref.component)?;
        let component = entry.component.as_mut();
        if !component.is_input(&var_ref.variable) {
            return Err(SolverError::Config {
                what: format!(
                    "{} :: {} is not an input",
                    component.name(),
                    var_ref.variable
                ),
            });
        }
        if !component.accepts_input(&var_ref.variable) {
            return Err(SolverError::Config {
                what: format!(
                    "{} :: {} is not read by this {} configuration",
                    component.name(),
                    var_ref.variable,
                    component.type_name()
                ),
            });
        }
        let name = component.name().to_string();
        let var = component
            .variable_mut(&var_ref.variable)
            .ok_or_else(|| SolverError::UnknownVariable {
                component: name,
                variable: var_ref.variable.clone(),
            })?;
        var.assign(value)?;
        Ok(())
    }

    /// Set up every component in registration order and freeze the layout.
    pub fn setup(&mut self) -> SolverResult<()> {
        for entry in &mut self.entries {
            entry.component.setup()?;
            entry.stage = Lifecycle::SetUp;
            info!(
                "{} :: {} setup complete.",
                entry.component.type_name(),
                entry.component.name()
            );
        }
        self.frozen = true;
        Ok(())
    }

    /// Copy every connected source into its target on component `index`.
    ///
    /// A source without a value means its owner was never set up.
    pub(crate) fn propagate_into(&mut self, index: usize) -> SolverResult<()> {
        let target_id = CompId::from_index(index);
        let mut updates: Vec<(String, VarValue)> = Vec::new();
        for connection in self.connections.iter().filter(|c| c.target.component == target_id) {
            let source = self.lookup(&connection.source)?;
            let value = source.value().ok_or_else(|| SolverError::NotSetUp {
                component: source.component().to_string(),
            })?;
            updates.push((connection.target.variable.clone(), value.clone()));
        }

        let entry = self.entry_mut(target_id)?;
        let component = entry.component.as_mut();
        let owner = component.name().to_string();
        for (variable, value) in updates {
            let var = component
                .variable_mut(&variable)
                .ok_or_else(|| SolverError::UnknownVariable {
                    component: owner.clone(),
                    variable: variable.clone(),
                })?;
            var.commit(value)?;
        }
        Ok(())
    }

    /// Solve component `index` and advance its lifecycle stage.
    pub(crate) fn solve_at(&mut self, index: usize, dt: Option<f64>) -> SolverResult<()> {
        let entry = &mut self.entries[index];
        if entry.stage == Lifecycle::Declared {
            return Err(SolverError::NotSetUp {
                component: entry.component.name().to_string(),
            });
        }
        entry.component.solve(dt)?;
        entry.stage = Lifecycle::Solved;
        Ok(())
    }

    /// `sqrt` of the summed output changes over all components.
    pub fn residual(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.component.residual_sq())
            .sum::<f64>()
            .sqrt()
    }

    /// Promote converged values to initial conditions for the next step.
    pub fn march(&mut self) {
        for entry in &mut self.entries {
            entry.component.march();
            entry.stage = Lifecycle::Marched;
        }
    }

    fn ensure_mutable(&self) -> SolverResult<()> {
        if self.frozen {
            Err(SolverError::Config {
                what: "components and connections cannot change after setup".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn entry(&self, id: CompId) -> SolverResult<&Entry> {
        self.entries
            .get(id.index())
            .ok_or_else(|| SolverError::UnknownComponent {
                name: id.to_string(),
            })
    }

    fn entry_mut(&mut self, id: CompId) -> SolverResult<&mut Entry> {
        self.entries
            .get_mut(id.index())
            .ok_or_else(|| SolverError::UnknownComponent {
                name: id.to_string(),
            })
    }

    fn lookup(&self, var_ref: &VarRef) -> SolverResult<&Variable> {
        let component = self.entry(var_ref.component)?.component.as_ref();
        component
            .variable(&var_ref.variable)
            .ok_or_else(|| SolverError::UnknownVariable {
                component: component.name().to_string(),
                variable: var_ref.variable.clone(),
            })
    }
}
