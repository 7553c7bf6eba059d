//! cf-project: case files, validation, compilation and run records.
//!
//! Provides:
//! - `Case` schema (YAML or JSON) describing fluid, components, connections,
//!   solver options and scheduled events
//! - `validate_case` structural checks
//! - `compile_case` into a runnable `System` plus options and schedule
//! - `results` run records written as JSON into unique case directories

pub mod compile;
pub mod results;
pub mod schema;
pub mod validate;

pub use compile::{CompiledCase, compile_case};
pub use results::{RunRecord, RunType, StepSummary};
pub use schema::*;
pub use validate::{ValidationError, validate_case};

/// Newest case file version this crate reads.
pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Build error: {what}")]
    Build { what: String },

    #[error("Fluid error: {0}")]
    Fluid(#[from] cf_fluids::FluidError),

    #[error("Component error: {0}")]
    Component(#[from] cf_components::ComponentError),

    #[error("Solver error: {0}")]
    Solver(#[from] cf_solver::SolverError),

    #[error("Simulation error: {0}")]
    Sim(#[from] cf_sim::SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Case> {
    let content = std::fs::read_to_string(path)?;
    let case: Case = serde_yaml::from_str(&content)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn save_yaml(path: &std::path::Path, case: &Case) -> ProjectResult<()> {
    validate_case(case)?;
    let content = serde_yaml::to_string(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<Case> {
    let content = std::fs::read_to_string(path)?;
    let case: Case = serde_json::from_str(&content)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn save_json(path: &std::path::Path, case: &Case) -> ProjectResult<()> {
    validate_case(case)?;
    let content = serde_json::to_string_pretty(case)?;
    std::fs::write(path, content)?;
    Ok(())
}
