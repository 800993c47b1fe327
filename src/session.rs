use std::fmt::Display;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::simulation::*;
use crate::{Error, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Touchdown(FlightOutcome),
    /// One-shot notification after a perfect landing on an ISRU pad.
    EquipmentDeployed { zone: usize },
}

/// Source of per-tick control intents. Sees the craft as the previous tick left it.
pub trait InputSource {
    fn next_intent(&mut self, tick: usize, lander: &CraftState) -> InputIntent;
}

impl<F: FnMut(usize, &CraftState) -> InputIntent> InputSource for F {
    fn next_intent(&mut self, tick: usize, lander: &CraftState) -> InputIntent {
        self(tick, lander)
    }
}

/// Replays a fixed list of intents, then idles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedInput {
    intents: Vec<InputIntent>,
}

impl ScriptedInput {
    pub fn new(intents: Vec<InputIntent>) -> Self {
        Self { intents }
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn next_intent(&mut self, tick: usize, _lander: &CraftState) -> InputIntent {
        self.intents.get(tick).copied().unwrap_or_default()
    }
}

/// Read-only view handed to presentation code.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub lander: &'a CraftState,
    pub terrain: &'a Terrain,
    pub zones: &'a [LandingZone],
    pub tick: usize,
}

impl<'a> Snapshot<'a> {
    pub fn outcome(&self) -> FlightOutcome {
        self.lander.outcome()
    }

    pub fn landed_zone(&self) -> Option<&'a LandingZone> {
        match self.outcome() {
            FlightOutcome::Landed { zone, .. } => self.zones.get(zone),
            _ => None,
        }
    }

    /// Pad elevation under each zone's center, for drawing the markers.
    pub fn zone_heights(&self) -> impl Iterator<Item = (&'a LandingZone, Option<f64>)> + 'a {
        let terrain = self.terrain;
        self.zones
            .iter()
            .map(move |zone| (zone, terrain.height_at(zone.center_x)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub fuel: i64,
    pub altitude: i64,
    pub vertical_speed: f64,
}

impl Telemetry {
    pub fn from_lander(lander: &CraftState, floor_y: f64) -> Self {
        Self {
            fuel: round_half_up(lander.fuel).max(0.) as i64,
            altitude: round_half_up((floor_y - lander.y).max(0.)) as i64,
            vertical_speed: round_half_up(lander.vy * 10.) / 10.,
        }
    }
}

impl Display for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FUEL {:>3}  ALT {:>4}  VSPD {:>5.1}",
            self.fuel, self.altitude, self.vertical_speed
        )
    }
}

// halves go towards positive infinity, so -1.5 reads as -1
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub struct GameSession {
    terrain: Terrain,
    zones: Vec<LandingZone>,
    lander: CraftState,
    physics: Physics,
    collision_checker: CollisionChecker,
    floor_y: f64,
    history: LanderHistory,
    events: Vec<SessionEvent>,
    tick_id: usize,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::build(Settings::default(), &mut rand::thread_rng())
    }
}

impl GameSession {
    pub fn try_new(settings: Settings) -> Result<Self, Error> {
        match settings.seed {
            Some(seed) => Self::try_with_rng(settings, &mut StdRng::seed_from_u64(seed)),
            None => Self::try_with_rng(settings, &mut rand::thread_rng()),
        }
    }

    /// Builds a session drawing rough terrain from `rng`; `settings.seed` is ignored.
    pub fn try_with_rng<R: Rng + ?Sized>(settings: Settings, rng: &mut R) -> Result<Self, Error> {
        settings.validate(&generate_zones())?;
        Ok(Self::build(settings, rng))
    }

    fn build<R: Rng + ?Sized>(settings: Settings, rng: &mut R) -> Self {
        let Settings {
            terrain: terrain_generator,
            lander,
            physics,
            limits,
            floor_y,
            history_limit,
            ..
        } = settings;
        let zones = generate_zones();
        let terrain = terrain_generator.generate(&zone_centers(&zones), rng);
        let physics = physics.with_world_width(terrain_generator.world_width());
        log::debug!(
            "New session: {} terrain points, {} landing zones, lander at ({:.1}, {:.1})",
            terrain.points().len(),
            zones.len(),
            lander.x,
            lander.y
        );

        let mut history = LanderHistory::with_initial_state(&lander);
        if let Some(limit) = history_limit {
            history = history.with_limit(limit);
        }

        Self {
            history,
            terrain,
            zones,
            lander,
            physics,
            collision_checker: limits,
            floor_y,
            events: Vec::new(),
            tick_id: 0,
        }
    }

    /// Advances the flight by one tick: kinematics first, then touchdown
    /// detection on the moved craft. Inert once the flight has ended.
    pub fn tick(&mut self, intent: InputIntent) -> ExecutionStatus {
        if self.lander.is_terminal() {
            return ExecutionStatus::Finished;
        }

        self.physics.step(&mut self.lander, intent);
        self.tick_id += 1;

        if let Some(outcome) =
            self.collision_checker
                .resolve(&mut self.lander, &self.terrain, &self.zones)
        {
            self.record_outcome(outcome);
        }
        self.history.append_lander_state(&self.lander);

        if self.lander.is_terminal() {
            ExecutionStatus::Finished
        } else {
            ExecutionStatus::InProgress
        }
    }

    /// Ticks until touchdown or until `max_ticks` more ticks have elapsed.
    pub fn run(&mut self, input: &mut impl InputSource, max_ticks: usize) -> ExecutionStatus {
        let mut status = self.status();
        for _ in 0..max_ticks {
            if let ExecutionStatus::Finished = status {
                break;
            }
            let intent = input.next_intent(self.tick_id, &self.lander);
            status = self.tick(intent);
        }
        status
    }

    fn record_outcome(&mut self, outcome: FlightOutcome) {
        let zone_label = |zone: usize| self.zones.get(zone).map_or("?", |z| z.label.as_str());
        match outcome {
            FlightOutcome::Landed {
                zone,
                quality: LandingQuality::Perfect,
            } => {
                log::info!(
                    "Perfect ISRU landing in {} after {} ticks, equipment deployed",
                    zone_label(zone),
                    self.tick_id
                );
                log::info!("ISRU equipment operational, beginning resource extraction");
                self.events.push(SessionEvent::Touchdown(outcome));
                self.events.push(SessionEvent::EquipmentDeployed { zone });
                return;
            }
            FlightOutcome::Landed { zone, .. } => {
                log::info!("Good landing in {}, mission success", zone_label(zone))
            }
            FlightOutcome::LandedRough => log::warn!("Rough landing, but crew survives"),
            FlightOutcome::Crashed => log::error!(
                "Crash at vy={:.2} after {} ticks, mission failed",
                self.lander.vy,
                self.tick_id
            ),
            FlightOutcome::Flying => return,
        }
        self.events.push(SessionEvent::Touchdown(outcome));
    }

    pub fn status(&self) -> ExecutionStatus {
        if self.is_finished() {
            ExecutionStatus::Finished
        } else {
            ExecutionStatus::InProgress
        }
    }

    pub fn is_finished(&self) -> bool {
        self.lander.is_terminal()
    }

    pub fn outcome(&self) -> FlightOutcome {
        self.lander.outcome()
    }

    pub fn tick_count(&self) -> usize {
        self.tick_id
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            lander: &self.lander,
            terrain: &self.terrain,
            zones: &self.zones,
            tick: self.tick_id,
        }
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry::from_lander(&self.lander, self.floor_y)
    }

    pub fn history(&self) -> &LanderHistory {
        &self.history
    }

    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn zones(&self) -> &[LandingZone] {
        &self.zones
    }
}
