use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cf_core::timing::Stopwatch;
use cf_project::results::{self, StepSummary};
use cf_project::{CompiledCase, ProjectError, ProjectResult, compile_case, load_yaml};
use cf_sim::{StepRecord, TransientOptions, run_transient_with_progress};
use cf_solver::solve_steady;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[derive(Parser)]
#[command(name = "channelflow")]
#[command(about = "channelflow - 1D flow channel network simulator", long_about = None)]
struct Cli {
    /// Also write the log to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate case file syntax and structure
    Validate {
        /// Path to the case YAML file
        case_path: PathBuf,
    },
    /// Run a steady-state solve
    Steady {
        /// Path to the case YAML file
        case_path: PathBuf,
        /// Directory that receives the run folder
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },
    /// Run a transient simulation
    Transient {
        /// Path to the case YAML file
        case_path: PathBuf,
        /// Time step in seconds (overrides the case file)
        #[arg(long)]
        dt: Option<f64>,
        /// Simulated duration in seconds (overrides the case file)
        #[arg(long)]
        duration: Option<f64>,
        /// Directory that receives the run folder
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },
}

fn main() -> ProjectResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Steady { case_path, output } => cmd_steady(&case_path, &output),
        Commands::Transient {
            case_path,
            dt,
            duration,
            output,
        } => cmd_transient(&case_path, dt, duration, &output),
    }
}

fn init_tracing(log_file: Option<&Path>) -> ProjectResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(io::stdout.and(Mutex::new(file)))
                .init();
        }
        None => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    Ok(())
}

fn cmd_validate(case_path: &Path) -> ProjectResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = load_yaml(case_path)?;
    compile_case(&case)?;
    println!("✓ Case is valid");
    println!("  Components: {}", case.components.len());
    println!("  Connections: {}", case.connections.len());
    if !case.events.is_empty() {
        println!("  Scheduled events: {}", case.events.len());
    }
    Ok(())
}

fn cmd_steady(case_path: &Path, output: &Path) -> ProjectResult<()> {
    let case = load_yaml(case_path)?;
    println!("Running steady-state solve for case: {}", case.name);
    if !case.events.is_empty() {
        tracing::warn!(
            "{} scheduled event(s) are ignored by the steady solve.",
            case.events.len()
        );
    }

    let CompiledCase {
        mut system, steady, ..
    } = compile_case(&case)?;
    let clock = Stopwatch::start();
    let report = solve_steady(&mut system, &steady)?;
    let wall_s = clock.elapsed_s();

    if report.converged {
        println!("✓ Converged in {} iterations", report.iterations);
    } else {
        println!(
            "✗ Not converged after {} iterations (residual {:.3e})",
            report.iterations, report.residual
        );
    }

    let record = results::steady_record(&case.name, &system, &report, wall_s)?;
    let dir = results::create_case_dir(output, &case.name)?;
    results::save_run(&dir, &record, &[])?;
    println!("  Results: {}", dir.display());
    Ok(())
}

fn cmd_transient(
    case_path: &Path,
    dt: Option<f64>,
    duration: Option<f64>,
    output: &Path,
) -> ProjectResult<()> {
    let case = load_yaml(case_path)?;
    let CompiledCase {
        mut system,
        steady,
        transient,
        schedule,
    } = compile_case(&case)?;

    let base = match (transient, dt, duration) {
        (Some(opts), _, _) => opts,
        (None, Some(_), Some(_)) => TransientOptions {
            tol: steady.tol,
            max_iter: steady.max_iter,
            ..Default::default()
        },
        (None, _, _) => {
            return Err(ProjectError::Build {
                what: "case has no transient block; pass --dt and --duration".to_string(),
            });
        }
    };
    let opts = TransientOptions {
        dt: dt.unwrap_or(base.dt),
        duration: duration.unwrap_or(base.duration),
        ..base
    };

    println!("Running transient simulation for case: {}", case.name);
    println!("  dt = {:.3} s, duration = {:.3} s", opts.dt, opts.duration);

    let total_steps = opts.step_count();
    let mut steps = Vec::with_capacity(total_steps);
    let report = run_transient_with_progress(&mut system, &opts, schedule, |record| {
        render_progress(record, total_steps, opts.duration);
        steps.push(StepSummary::from(record));
    })?;
    clear_progress_line();

    if report.all_converged() {
        println!("✓ Simulation completed: {} steps", report.steps.len());
    } else {
        let failed = steps.iter().filter(|s| !s.converged).count();
        println!("✗ Simulation completed with {failed} unconverged step(s)");
    }
    println!("  Wall time: {:.3} s", report.wall_s);

    let record = results::transient_record(&case.name, &system, &opts, &report)?;
    let dir = results::create_case_dir(output, &case.name)?;
    results::save_run(&dir, &record, &steps)?;
    println!("  Results: {}", dir.display());
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_progress(record: &StepRecord, total_steps: usize, duration: f64) {
    let fraction = if total_steps == 0 {
        1.0
    } else {
        record.step as f64 / total_steps as f64
    };
    let width = 28usize;
    let filled = ((fraction * width as f64).round() as usize).min(width);
    print!(
        "\r[{}{}] {:>6.2}%  t={:.3}/{:.3}s  step={}  iter={}  residual={:.3e}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled)),
        fraction * 100.0,
        record.time_s,
        duration,
        record.step,
        record.solve.iterations,
        record.solve.residual
    );
    let _ = io::stdout().flush();
}
