use std::path::PathBuf;

use clap::Parser;
use descent::init::json::{self, Scenario, DEFAULT_MAX_TICKS};
use descent::{Error, ExecutionStatus, GameSession, ScriptedInput, Settings};

#[derive(Parser)]
#[command(version, about = "Headless lander descent runner", long_about = None)]
struct Cli {
    /// Settings json file path
    #[arg(long, value_name = "FILE", conflicts_with = "scenario")]
    settings: Option<PathBuf>,

    /// Scenario json file path (settings plus scripted inputs)
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Seed for the rough terrain, overrides the file
    #[arg(long)]
    seed: Option<u64>,

    /// Maximal number of ticks
    #[arg(long, short)]
    max_ticks: Option<usize>,

    /// Print the whole flight history
    #[arg(long)]
    history: bool,
}

fn load(cli: &Cli) -> Result<Scenario, Error> {
    if let Some(path) = &cli.scenario {
        return json::parse_scenario(path);
    }
    let settings = match &cli.settings {
        Some(path) => json::parse_settings(path)?,
        None => Settings::default(),
    };
    Ok(Scenario {
        settings,
        inputs: ScriptedInput::default(),
        max_ticks: DEFAULT_MAX_TICKS,
    })
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let Scenario {
        mut settings,
        mut inputs,
        max_ticks,
    } = load(&cli)?;
    settings.seed = cli.seed.or(settings.seed);
    let max_ticks = cli.max_ticks.unwrap_or(max_ticks);

    let mut session = GameSession::try_new(settings)?;
    log::info!(
        "Running {} scripted ticks, at most {max_ticks} ticks in total",
        inputs.len()
    );

    let now = std::time::Instant::now();
    let status = session.run(&mut inputs, max_ticks);
    let elapsed = now.elapsed();

    if cli.history {
        println!("{}", session.history().pretty_to_string());
    }
    println!(
        "Run ended with status: {status:?} after {} ticks, time: {elapsed:?}",
        session.tick_count()
    );
    println!("{}", session.telemetry());
    match (status, session.snapshot().landed_zone()) {
        (ExecutionStatus::Finished, Some(zone)) => {
            println!("Finished: {} in {} ({})", session.outcome(), zone.label, zone.kind)
        }
        (ExecutionStatus::Finished, None) => println!("Finished: {}", session.outcome()),
        (ExecutionStatus::InProgress, _) => println!("Still flying"),
    }
    Ok(())
}
