use std::{collections::VecDeque, fmt::Display};

pub(crate) mod defaults {
    pub const X: f64 = 400.;
    pub const Y: f64 = 30.;
    pub const WIDTH: f64 = 16.;
    pub const HEIGHT: f64 = 24.;
    pub const FUEL: f64 = super::FUEL_CAPACITY;
}

pub const FUEL_CAPACITY: f64 = 100.;

/// Controls held during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputIntent {
    pub up: bool,
    pub left: bool,
    pub right: bool,
}

impl InputIntent {
    pub fn new(up: bool, left: bool, right: bool) -> Self {
        Self { up, left, right }
    }

    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with_up(self, up: bool) -> Self {
        Self { up, ..self }
    }

    pub fn with_left(self, left: bool) -> Self {
        Self { left, ..self }
    }

    pub fn with_right(self, right: bool) -> Self {
        Self { right, ..self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LandingQuality {
    Perfect,
    Good,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlightOutcome {
    #[default]
    Flying,
    /// `zone` indexes the session's landing zone list.
    Landed {
        zone: usize,
        quality: LandingQuality,
    },
    LandedRough,
    Crashed,
}

impl FlightOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Flying)
    }
}

impl Display for FlightOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flying => write!(f, "flying"),
            Self::Landed {
                quality: LandingQuality::Perfect,
                ..
            } => write!(f, "perfect landing"),
            Self::Landed {
                quality: LandingQuality::Good,
                ..
            } => write!(f, "good landing"),
            Self::LandedRough => write!(f, "rough landing"),
            Self::Crashed => write!(f, "crashed"),
        }
    }
}

/// Kinematic and resource state of the lander. `(x, y)` is the top-left corner
/// of its bounding box, with `y` growing downwards.
#[derive(Clone, Debug, PartialEq)]
pub struct CraftState {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub vx: f64,
    pub vy: f64,
    pub fuel: f64,
    outcome: FlightOutcome,
}

impl Default for CraftState {
    fn default() -> Self {
        Self {
            x: defaults::X,
            y: defaults::Y,
            width: defaults::WIDTH,
            height: defaults::HEIGHT,
            vx: 0.,
            vy: 0.,
            fuel: defaults::FUEL,
            outcome: FlightOutcome::Flying,
        }
    }
}

impl CraftState {
    pub fn with_x(self, x: f64) -> Self {
        Self { x, ..self }
    }

    pub fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }

    pub fn with_vx(self, vx: f64) -> Self {
        Self { vx, ..self }
    }

    pub fn with_vy(self, vy: f64) -> Self {
        Self { vy, ..self }
    }

    pub fn with_fuel(self, fuel: f64) -> Self {
        Self { fuel, ..self }
    }

    pub fn with_width(self, width: f64) -> Self {
        Self { width, ..self }
    }

    pub fn with_height(self, height: f64) -> Self {
        Self { height, ..self }
    }

    pub fn outcome(&self) -> FlightOutcome {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Moves a flying craft into `outcome`. Returns false, leaving the state
    /// untouched, when the craft already finished its flight.
    pub(crate) fn finish(&mut self, outcome: FlightOutcome) -> bool {
        if self.is_terminal() || !outcome.is_terminal() {
            return false;
        }
        self.outcome = outcome;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightSample {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub fuel: f64,
}

/// Per-tick craft samples, oldest first. With a limit set only the most recent
/// `limit` samples are kept and `first_tick` moves forward.
#[derive(Clone, Debug, Default)]
pub struct LanderHistory {
    limit: Option<usize>,
    first_tick: usize,
    x: VecDeque<f64>,
    y: VecDeque<f64>,
    vx: VecDeque<f64>,
    vy: VecDeque<f64>,
    fuel: VecDeque<f64>,
}

impl LanderHistory {
    pub fn with_initial_state(state: &CraftState) -> Self {
        let mut history = Self::default();
        history.append_lander_state(state);
        history
    }

    pub fn with_limit(self, limit: usize) -> Self {
        let mut history = Self {
            limit: Some(limit.max(1)),
            ..self
        };
        history.drop_overflow();
        history
    }

    pub fn append_lander_state(&mut self, state: &CraftState) {
        self.x.push_back(state.x);
        self.y.push_back(state.y);
        self.vx.push_back(state.vx);
        self.vy.push_back(state.vy);
        self.fuel.push_back(state.fuel);
        self.drop_overflow();
    }

    fn drop_overflow(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        while self.x.len() > limit {
            self.x.pop_front();
            self.y.pop_front();
            self.vx.pop_front();
            self.vy.pop_front();
            self.fuel.pop_front();
            self.first_tick += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Tick of the oldest kept sample.
    pub fn first_tick(&self) -> usize {
        self.first_tick
    }

    pub fn iter_history(&self) -> impl Iterator<Item = FlightSample> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.vx)
            .zip(&self.vy)
            .zip(&self.fuel)
            .map(|((((x, y), vx), vy), fuel)| FlightSample {
                x: *x,
                y: *y,
                vx: *vx,
                vy: *vy,
                fuel: *fuel,
            })
    }

    pub fn pretty_to_string(&self) -> String {
        self.iter_history().enumerate().fold(
            format!(
                "{:>6}{:>9}{:>9}{:>9}{:>9}{:>9}",
                "TICK", "X", "Y", "VX", "VY", "FUEL"
            ),
            |out, (id, FlightSample { x, y, vx, vy, fuel })| {
                let tick = self.first_tick + id;
                out + &format!("\n{tick:>6}{x:>9.2}{y:>9.2}{vx:>9.2}{vy:>9.2}{fuel:>9.1}")
            },
        )
    }
}
