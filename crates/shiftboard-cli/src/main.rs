//! shiftboard CLI - Workforce Schedule Board
//!
//! Fetches optimizer results, lays them out on a rolling 24h window and
//! renders them as a terminal timeline, a table, SVG or JSON.

mod board;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use shiftboard_core::{Assignment, AssignmentId, OptimizationResult};
use shiftboard_sync::{HttpSolverClient, SyncController};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::board::{BoardFormat, RenderArgs};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "shiftboard")]
#[command(author, version, about = "Workforce schedule board", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: ./shiftboard.toml if present)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Optimizer API base URL
    #[arg(long, env = "SHIFTBOARD_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "SHIFTBOARD_TIMEOUT", value_name = "SECS", global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the current assignments and render the board
    Show {
        #[command(flatten)]
        render: RenderOpts,
    },

    /// Re-run the optimizer and render the new board
    Optimize {
        #[command(flatten)]
        render: RenderOpts,
    },

    /// Remove an assignment and resync with the optimizer
    Remove {
        /// Worker owning the assignment
        #[arg(short, long)]
        worker: String,

        /// Assignment id
        #[arg(short, long)]
        assignment: AssignmentId,
    },

    /// Render an optimization result JSON file without contacting the server
    Render {
        /// Input file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        render: RenderOpts,
    },

    /// Print reference data from the optimizer
    List {
        #[arg(value_enum)]
        what: Listing,
    },
}

#[derive(Args)]
struct RenderOpts {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = BoardFormat::Text)]
    format: BoardFormat,

    /// Operational day (YYYY-MM-DD); defaults to the day of the earliest assignment
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Hide the current-time line
    #[arg(long)]
    no_now: bool,
}

impl RenderOpts {
    fn args(&self, config: &Config) -> RenderArgs {
        RenderArgs {
            format: self.format,
            date: self.date,
            output: self.output.clone(),
            show_now: !self.no_now,
            window_start_hour: config.window_start_hour,
            label_every_hours: config.label_every_hours,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Listing {
    Workers,
    Skills,
    Shifts,
    Tasks,
    Assignments,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.base_url, cli.timeout)?;

    match cli.command {
        Commands::Show { render } => {
            let controller = connect(&config)?;
            controller
                .fetch_current()
                .await
                .with_context(|| format!("Failed to fetch assignments from {}", config.base_url))?;
            board::emit(&controller.snapshot(), &render.args(&config))
        }
        Commands::Optimize { render } => {
            let controller = connect(&config)?;
            controller
                .re_optimize()
                .await
                .with_context(|| format!("Re-optimization failed at {}", config.base_url))?;
            board::emit(&controller.snapshot(), &render.args(&config))
        }
        Commands::Remove { worker, assignment } => remove(&config, &worker, assignment).await,
        Commands::Render { input, render } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read file: {}", input.display()))?;
            let result: OptimizationResult = serde_json::from_str(&content)
                .with_context(|| format!("Invalid optimization result: {}", input.display()))?;
            board::emit(&result, &render.args(&config))
        }
        Commands::List { what } => list(&config, what).await,
    }
}

fn client(config: &Config) -> Result<HttpSolverClient> {
    HttpSolverClient::with_timeout(config.base_url.as_str(), config.timeout())
        .context("Failed to build HTTP client")
}

fn connect(config: &Config) -> Result<SyncController<HttpSolverClient>> {
    Ok(SyncController::new(client(config)?))
}

async fn remove(config: &Config, worker: &str, id: AssignmentId) -> Result<()> {
    let controller = connect(config)?;
    controller
        .fetch_current()
        .await
        .with_context(|| format!("Failed to fetch assignments from {}", config.base_url))?;

    let snapshot = controller.snapshot();
    // Fall back to other workers so a wrong --worker is reported as such
    let target: Assignment = snapshot
        .schedule(worker)
        .into_iter()
        .chain(snapshot.schedules.iter())
        .flat_map(|s| s.assignments.iter())
        .find(|a| a.id == Some(id))
        .cloned()
        .with_context(|| format!("Assignment {id} not found"))?;

    controller
        .remove_assignment(worker, &target)
        .await
        .with_context(|| format!("Failed to remove assignment {id} from worker {worker}"))?;

    println!("Removed assignment {id} ({}) from {worker}", target.display_name());

    let result = controller.snapshot();
    if result.unassigned_tasks.is_empty() {
        println!("No unassigned tasks");
    } else {
        println!("\nUnassigned Tasks");
        for (idx, task) in result.unassigned_tasks.iter().enumerate() {
            println!(
                "  {}. {} {} ({} units)",
                idx + 1,
                task.id,
                task.task_name.as_deref().unwrap_or("-"),
                task.remaining_units
            );
        }
    }
    Ok(())
}

async fn list(config: &Config, what: Listing) -> Result<()> {
    let client = client(config)?;

    match what {
        Listing::Workers => {
            for worker in client.workers().await? {
                let skills: Vec<String> = worker
                    .skills
                    .iter()
                    .map(|s| format!("{} L{}", s.skill_name, s.skill_level))
                    .collect();
                println!("{:<24} {}", worker.display_label(), skills.join(", "));
            }
        }
        Listing::Skills => {
            for skill in client.skills().await? {
                println!("{:>5}  {}", skill.skill_id, skill.skill_name);
            }
        }
        Listing::Shifts => {
            for shift in client.shifts().await? {
                let wraps = if shift.wraps_midnight() { "+1" } else { "" };
                println!(
                    "{:<12} {}–{}{}",
                    shift.shift_name,
                    shift.start_time.format("%H:%M"),
                    shift.end_time.format("%H:%M"),
                    wraps
                );
            }
        }
        Listing::Tasks => print_json(&client.tasks().await?)?,
        Listing::Assignments => print_json(&client.assignments().await?)?,
    }
    Ok(())
}

fn print_json(values: &[serde_json::Value]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(values)?);
    Ok(())
}
