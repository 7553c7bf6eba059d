//! Directed links between component variables.

use cf_core::CompId;

/// Address of one variable inside a system.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VarRef {
    pub component: CompId,
    pub variable: String,
}

impl VarRef {
    pub fn new(component: CompId, variable: impl Into<String>) -> Self {
        Self {
            component,
            variable: variable.into(),
        }
    }
}

/// Copy `source` (an output) into `target` (an input) before the target's
/// component is solved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub source: VarRef,
    pub target: VarRef,
}
