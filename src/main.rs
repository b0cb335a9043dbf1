use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use heatcrew::config::{DataPaths, ScheduleRules};
use heatcrew::engine::{self, pools::RolePools, FillReport};
use heatcrew::error::{CrewError, Result};
use heatcrew::model::Role;
use heatcrew::store;

#[derive(Parser, Debug)]
#[command(name = "heatcrew")]
#[command(version)]
#[command(about = "Assigns volunteer judges and builders to event heat lanes")]
#[command(propagate_version = true)]
struct Args {
    /// Directory containing heats.json, volunteers.json, availability.json
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Recompute role assignments
    Assign {
        #[command(subcommand)]
        command: AssignCommands,
    },

    /// Show pool classification for the current roster
    Pools,
}

#[derive(clap::Subcommand, Debug)]
enum AssignCommands {
    /// Purge and reassign both roles across the whole schedule
    All,
    /// Purge and reassign a single (day, start) instant
    Slot {
        /// Event day, e.g. "saturday"
        #[arg(long)]
        day: String,

        /// Start time, e.g. "09:15"
        #[arg(long)]
        start: String,
    },
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// =============================================================================
// JSON Output Types
// =============================================================================

#[derive(Serialize)]
struct ReportOutput {
    total_cells: usize,
    filled_cells: usize,
    gaps: usize,
}

#[derive(Serialize)]
struct PoolsOutput {
    actives: usize,
    judges: Vec<String>,
    builders: Vec<String>,
    global: Vec<String>,
}

// =============================================================================
// Command Handlers
// =============================================================================

fn run_assign(args: &Args, command: &AssignCommands) -> Result<()> {
    let paths = DataPaths::in_dir(&args.data_dir);
    let mut heats = store::load_heats(&paths.heats)?;
    let roster = store::load_volunteers(&paths.volunteers)?;
    let availability = store::load_availability(&paths.availability)?;
    let rules = ScheduleRules::default();

    let report = match command {
        AssignCommands::All => {
            engine::assign_all(&mut heats, &roster, &availability, &rules)
        }
        AssignCommands::Slot { day, start } => {
            if day.trim().is_empty() || start.trim().is_empty() {
                return Err(CrewError::InvalidSlot(format!("{day} {start}")));
            }
            engine::assign_one(&mut heats, day, start, &roster, &availability, &rules)
        }
    };

    store::save_heats(&paths.heats, &heats)?;
    print_report(&report, &args.output)?;
    Ok(())
}

fn run_pools(args: &Args) -> Result<()> {
    let paths = DataPaths::in_dir(&args.data_dir);
    let roster = store::load_volunteers(&paths.volunteers)?;
    let pools = RolePools::build(&roster);

    match args.output {
        OutputFormat::Json => {
            let output = PoolsOutput {
                actives: pools.active_count(),
                judges: pools.for_role(Role::Judge).to_vec(),
                builders: pools.for_role(Role::Builder).to_vec(),
                global: pools.global(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&output).expect("pool output serializes")
            );
        }
        OutputFormat::Table => {
            println!("Active volunteers: {}", pools.active_count());
            println!();
            for role in [Role::Judge, Role::Builder] {
                let members = pools.for_role(role);
                println!("{} pool ({}):", role, members.len());
                for member in members {
                    println!("  {member}");
                }
                println!();
            }
            let global = pools.global();
            println!("Global backfill pool ({}):", global.len());
            for member in &global {
                println!("  {member}");
            }
        }
    }
    Ok(())
}

fn print_report(report: &FillReport, output: &OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let output = ReportOutput {
                total_cells: report.total_cells,
                filled_cells: report.filled_cells,
                gaps: report.gaps(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&output).expect("report serializes")
            );
        }
        OutputFormat::Table => {
            println!("Cells in scope: {}", report.total_cells);
            println!("Filled:         {}", report.filled_cells);
            if report.gaps() > 0 {
                println!("Gaps:           {} (no eligible volunteer)", report.gaps());
            }
        }
    }
    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let result = match &args.command {
        Commands::Assign { command } => run_assign(&args, command),
        Commands::Pools => run_pools(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
