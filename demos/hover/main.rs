use descent::{CraftState, ExecutionStatus, GameSession, InputIntent, Settings};

// Holds the descent rate under a limit and steers towards the ISRU pad center.
fn autopilot(_: usize, lander: &CraftState) -> InputIntent {
    const TARGET_X: f64 = 400.;
    let error = TARGET_X - lander.center_x();
    InputIntent::new(
        lander.vy > 1.2,
        error < -2. && lander.vx > -0.3,
        error > 2. && lander.vx < 0.3,
    )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    let settings = Settings::default()
        .with_seed(seed)
        .with_lander(CraftState::default().with_x(330.));
    let mut session = GameSession::try_new(settings).unwrap_or_else(|e| panic!("{e}"));

    while let ExecutionStatus::InProgress = session.run(&mut autopilot, 10) {
        println!("{:>5}  {}", session.tick_count(), session.telemetry());
    }
    println!("Finished after {} ticks: {}", session.tick_count(), session.outcome());
    for event in session.take_events() {
        println!("{event:?}");
    }
}
