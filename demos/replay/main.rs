use std::process::ExitCode;

use descent::init::json::{self, Scenario};
use descent::GameSession;

// Replays a scenario file and dumps the recorded flight.
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: replay <scenario.json>");
        return ExitCode::FAILURE;
    };
    let session = json::parse_scenario(&path).and_then(
        |Scenario {
             settings,
             mut inputs,
             max_ticks,
         }| {
            let mut session = GameSession::try_new(settings)?;
            session.run(&mut inputs, max_ticks);
            Ok(session)
        },
    );

    match session {
        Ok(session) => {
            println!("{}", session.history().pretty_to_string());
            println!("{}", session.telemetry());
            println!("{} after {} ticks", session.outcome(), session.tick_count());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Replay of {path} failed: {e}");
            ExitCode::FAILURE
        }
    }
}
