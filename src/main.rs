use clap::Parser;
use lift_sim::report::write_artifacts;
use lift_sim::{
    compare_policies, run_simulation, DispatchPolicy, SimError, SimulationConfig,
    SimulationReport,
};
use log::{error, info};
use std::path::PathBuf;

/// Discrete-event elevator simulation comparing dispatch policies by passenger wait time
#[derive(Parser, Debug)]
#[clap(name = "lift-sim", version, allow_negative_numbers = true)]
struct Cli {
    /// Number of floors [default: 10]
    floors: Option<i64>,

    /// Number of elevators [default: 1]
    elevators: Option<i64>,

    /// Dispatch policy: 0 = standard, 1 = priority [default: 0]
    policy: Option<i64>,

    /// Random seed, any integer [default: 123456]
    seed: Option<i64>,

    /// TOML file with timings, horizons and other settings
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory receiving db.txt and trace.txt
    #[clap(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Also run the other policy on the same arrivals and print both
    #[clap(long)]
    compare: bool,
}

fn print_comparison(standard: &SimulationReport, priority: &SimulationReport) {
    println!("{:<6}{:>15}{:>15}", "floor", "standard", "priority");
    for (s, p) in standard.floors.iter().zip(&priority.floors) {
        println!("{:<6}{:>15.3}{:>15.3}", s.floor, s.mean_wait, p.mean_wait);
    }
    println!(
        "{:<6}{:>15.3}{:>15.3}",
        "all",
        standard.overall_mean_wait(),
        priority.overall_mean_wait()
    );
}

fn run(cli: Cli) -> Result<(), SimError> {
    let base = match &cli.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let config = base.apply_args(cli.floors, cli.elevators, cli.policy, cli.seed)?;

    let report = if cli.compare {
        let comparison = compare_policies(&config)?;
        print_comparison(&comparison.standard, &comparison.priority);
        println!("Lower mean wait: {}", comparison.better_policy());
        match config.policy {
            DispatchPolicy::Standard => comparison.standard,
            DispatchPolicy::Priority => comparison.priority,
        }
    } else {
        run_simulation(&config)?
    };

    let paths = write_artifacts(&cli.output_dir, &report)?;
    info!(
        "{} journeys completed, mean journey {:.3}, results in {}",
        report.completed_journeys,
        report.mean_journey,
        paths.wait_summary.display()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Cli::parse()) {
        error!("{}", err);
        std::process::exit(1);
    }
}
