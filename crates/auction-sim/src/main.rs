use anyhow::Context;
use clap::Parser;

use auction_core::math::fixed_to_f64;
use auction_sim::{create_example_config, Outcome, Report, Scenario, SimConfig, Simulator};

#[derive(Parser, Debug)]
#[command(name = "auction-sim")]
#[command(about = "Replay scripted scenarios against the fee-price discovery auction")]
struct Args {
    /// Path to simulator configuration file
    #[arg(short, long, default_value = "auction-sim.toml")]
    config: String,

    /// Path to scenario file
    #[arg(short, long, default_value = "scenario.toml")]
    scenario: String,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Abort on the first failing step
    #[arg(long)]
    fail_fast: bool,

    /// Write example config and scenario files to the given paths, then exit
    #[arg(long)]
    init: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    if args.init {
        create_example_config(&args.config)
            .with_context(|| format!("writing example config to {}", args.config))?;
        Scenario::example()
            .save(&args.scenario)
            .with_context(|| format!("writing example scenario to {}", args.scenario))?;
        log::info!("Wrote {} and {}", args.config, args.scenario);
        return Ok(());
    }

    let config = SimConfig::load(&args.config)?;
    log::info!("Loaded configuration with {} funded accounts", config.balances.len());

    let scenario = Scenario::load(&args.scenario)?;

    let mut simulator = Simulator::new(&config)?;
    let report = simulator.run(&scenario, args.fail_fast)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if report.failures > 0 {
        log::warn!("{} of {} steps failed", report.failures, report.steps.len());
    }

    Ok(())
}

fn print_summary(report: &Report) {
    println!("scenario: {}", report.scenario);
    for step in &report.steps {
        match &step.outcome {
            Outcome::Ok { output } => println!("  [{:>3}] t={} {:<12} ok   {:?}", step.index, step.now, step.action, output),
            Outcome::Failed { kind, message } => {
                println!("  [{:>3}] t={} {:<12} FAIL {} ({})", step.index, step.now, step.action, kind, message)
            }
        }
    }

    let view = &report.final_view;
    println!("final:");
    println!("  phase code      {}", view.phase_code);
    println!("  cycle           {:?}", view.cycle_id);
    println!("  oracle price    {} ({:.6})", view.oracle_price, fixed_to_f64(view.oracle_price));
    println!("  committed price {} ({:.6})", view.committed_price, fixed_to_f64(view.committed_price));
    println!("  bounds          [{}, {}]", view.lower_bound, view.upper_bound);
    println!("  inventory B     {}", view.remaining_inventory_b);
    println!("  reserve A       {}", view.reserve_a);
}
