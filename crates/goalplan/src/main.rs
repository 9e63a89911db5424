use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use goalplan::{GoalFile, OutputFormat, build_report, init_logging, render};
use goalplan_core::date_math;
use goalplan_core::model::GoalId;

#[derive(Parser, Debug)]
#[command(name = "goalplan")]
#[command(about = "Savings goal projections with Monte Carlo analytics")]
struct Args {
    /// YAML file describing the goals to analyze
    goals_file: PathBuf,

    /// Monte Carlo paths per goal (overrides the file's config)
    #[arg(short = 'n', long)]
    simulations: Option<usize>,

    /// Seed for reproducible simulations
    #[arg(short, long)]
    seed: Option<u64>,

    /// Evaluation date as YYYY-MM-DD (default: today)
    #[arg(long)]
    as_of: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Only analyze the goal with this id
    #[arg(short, long)]
    goal: Option<u32>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write logs to a file instead of stderr (default: ~/.goalplan/goalplan.log)
    #[arg(long)]
    log_file: Option<Option<PathBuf>>,
}

fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".goalplan")
        .join("goalplan.log")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let log_path = args
        .log_file
        .map(|path| path.unwrap_or_else(default_log_path));
    init_logging(log_path.as_deref(), &args.log_level)?;

    let mut file = GoalFile::load(&args.goals_file)
        .wrap_err_with(|| format!("failed to load {}", args.goals_file.display()))?;
    if let Some(simulations) = args.simulations {
        file.config.monte_carlo.simulations = simulations;
    }
    if let Some(seed) = args.seed {
        file.config.monte_carlo.seed = Some(seed);
    }
    file.validate()?;

    let now = match args.as_of.as_deref() {
        Some(input) => date_math::parse_date(input)?,
        None => date_math::today(),
    };

    tracing::info!(
        goals = file.goals.len(),
        simulations = file.config.monte_carlo.simulations,
        %now,
        "starting analysis"
    );

    let report = build_report(&file, args.goal.map(GoalId), now)?;
    print!("{}", render(&report, args.format)?);

    tracing::info!("analysis finished");
    Ok(())
}
