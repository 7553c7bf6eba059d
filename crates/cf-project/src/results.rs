//! Run records and their on-disk layout.
//!
//! A run directory holds `run.json` (case name, timestamp, convergence and
//! the final value of every variable) and, for transient runs,
//! `steps.jsonl` with one step summary per line.

use std::fs;
use std::path::{Path, PathBuf};

use cf_components::{VarValue, Variable};
use cf_sim::{StepRecord, TransientOptions, TransientReport};
use cf_solver::{SteadyReport, System};
use serde::{Deserialize, Serialize};

use crate::{ProjectError, ProjectResult};
use crate::schema::{FlowStateDef, ValueDef};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub case: String,
    /// RFC 3339
    pub timestamp: String,
    pub run_type: RunType,
    pub converged: bool,
    pub iterations: usize,
    pub residual: f64,
    pub wall_s: f64,
    pub components: Vec<ComponentSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RunType {
    Steady,
    Transient {
        dt_s: f64,
        t_end_s: f64,
        steps: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentSnapshot {
    pub name: String,
    pub type_name: String,
    pub inputs: Vec<VariableSnapshot>,
    pub outputs: Vec<VariableSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariableSnapshot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepSummary {
    pub step: usize,
    pub time_s: f64,
    pub converged: bool,
    pub iterations: usize,
    pub residual: f64,
    pub wall_s: f64,
    pub events_fired: usize,
}

impl From<&StepRecord> for StepSummary {
    fn from(record: &StepRecord) -> Self {
        Self {
            step: record.step,
            time_s: record.time_s,
            converged: record.solve.converged,
            iterations: record.solve.iterations,
            residual: record.solve.residual,
            wall_s: record.wall_s,
            events_fired: record.events_fired,
        }
    }
}

fn value_def(value: &VarValue) -> ValueDef {
    match value {
        VarValue::Scalar(v) => ValueDef::Scalar(*v),
        VarValue::Field(v) => ValueDef::Field(v.iter().copied().collect()),
        VarValue::FlowState(s) => ValueDef::FlowState(FlowStateDef {
            t0: s.t0,
            p0: s.p0,
            mdot: s.mdot,
        }),
    }
}

fn variable_snapshot(variable: &Variable) -> VariableSnapshot {
    VariableSnapshot {
        name: variable.name().to_string(),
        units: variable.units().map(str::to_string),
        value: variable.value().map(value_def),
    }
}

/// Current value of every variable in `system`, in registration order.
pub fn snapshot(system: &System) -> ProjectResult<Vec<ComponentSnapshot>> {
    system
        .ids()
        .map(|id| -> ProjectResult<ComponentSnapshot> {
            let component = system.component(id)?;
            Ok(ComponentSnapshot {
                name: component.name().to_string(),
                type_name: component.type_name().to_string(),
                inputs: component.inputs().into_iter().map(variable_snapshot).collect(),
                outputs: component.outputs().into_iter().map(variable_snapshot).collect(),
            })
        })
        .collect()
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub fn steady_record(
    case: &str,
    system: &System,
    report: &SteadyReport,
    wall_s: f64,
) -> ProjectResult<RunRecord> {
    Ok(RunRecord {
        case: case.to_string(),
        timestamp: now(),
        run_type: RunType::Steady,
        converged: report.converged,
        iterations: report.iterations,
        residual: report.residual,
        wall_s,
        components: snapshot(system)?,
    })
}

/// Summarise a transient run. Convergence holds only if every step converged;
/// iterations are summed over steps and the residual is the last step's.
pub fn transient_record(
    case: &str,
    system: &System,
    opts: &TransientOptions,
    report: &TransientReport,
) -> ProjectResult<RunRecord> {
    Ok(RunRecord {
        case: case.to_string(),
        timestamp: now(),
        run_type: RunType::Transient {
            dt_s: opts.dt,
            t_end_s: report.final_time(),
            steps: report.steps.len(),
        },
        converged: report.all_converged(),
        iterations: report.steps.iter().map(|s| s.solve.iterations).sum(),
        residual: report.steps.last().map_or(0.0, |s| s.solve.residual),
        wall_s: report.wall_s,
        components: snapshot(system)?,
    })
}

/// Create `root/<case>`, or `root/<case>-1`, `root/<case>-2`, ... if taken.
pub fn create_case_dir(root: &Path, case: &str) -> ProjectResult<PathBuf> {
    fs::create_dir_all(root)?;
    let mut dir = root.join(case);
    let mut suffix = 0;
    while dir.exists() {
        suffix += 1;
        dir = root.join(format!("{case}-{suffix}"));
    }
    fs::create_dir(&dir)?;
    Ok(dir)
}

pub fn save_run(dir: &Path, record: &RunRecord, steps: &[StepSummary]) -> ProjectResult<()> {
    let content = serde_json::to_string_pretty(record)?;
    fs::write(dir.join("run.json"), content)?;

    if !steps.is_empty() {
        let mut lines = String::new();
        for step in steps {
            lines.push_str(&serde_json::to_string(step)?);
            lines.push('\n');
        }
        fs::write(dir.join("steps.jsonl"), lines)?;
    }
    Ok(())
}

pub fn load_run(dir: &Path) -> ProjectResult<RunRecord> {
    let content = fs::read_to_string(dir.join("run.json"))?;
    Ok(serde_json::from_str(&content)?)
}

pub fn load_steps(dir: &Path) -> ProjectResult<Vec<StepSummary>> {
    let path = dir.join("steps.jsonl");
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(ProjectError::from))
        .collect()
}
