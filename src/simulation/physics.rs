use super::{CraftState, InputIntent};

pub(crate) mod defaults {
    pub const G: f64 = 0.08;
    pub const THRUST_POWER: f64 = 0.25;
    pub const LATERAL_FACTOR: f64 = 0.4;
    pub const VERTICAL_FUEL_COST: f64 = 0.6;
    pub const LATERAL_FUEL_COST: f64 = 0.3;
    pub const DAMPING: f64 = 0.98;
    pub const WORLD_WIDTH: f64 = crate::simulation::terrain::defaults::WORLD_WIDTH;
}

/// Per-tick kinematics. One call to [`Physics::step`] advances the craft by one
/// fixed time unit; there is no delta-time scaling.
#[derive(Clone, Debug, PartialEq)]
pub struct Physics {
    g: f64,
    thrust_power: f64,
    lateral_factor: f64,
    vertical_fuel_cost: f64,
    lateral_fuel_cost: f64,
    damping: f64,
    world_width: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            g: defaults::G,
            thrust_power: defaults::THRUST_POWER,
            lateral_factor: defaults::LATERAL_FACTOR,
            vertical_fuel_cost: defaults::VERTICAL_FUEL_COST,
            lateral_fuel_cost: defaults::LATERAL_FUEL_COST,
            damping: defaults::DAMPING,
            world_width: defaults::WORLD_WIDTH,
        }
    }
}

impl Physics {
    pub fn with_g(self, g: f64) -> Self {
        Self { g, ..self }
    }
    pub fn with_thrust_power(self, thrust_power: f64) -> Self {
        Self {
            thrust_power,
            ..self
        }
    }
    pub fn with_lateral_factor(self, lateral_factor: f64) -> Self {
        Self {
            lateral_factor,
            ..self
        }
    }
    pub fn with_vertical_fuel_cost(self, vertical_fuel_cost: f64) -> Self {
        Self {
            vertical_fuel_cost,
            ..self
        }
    }
    pub fn with_lateral_fuel_cost(self, lateral_fuel_cost: f64) -> Self {
        Self {
            lateral_fuel_cost,
            ..self
        }
    }
    pub fn with_damping(self, damping: f64) -> Self {
        Self { damping, ..self }
    }
    pub fn with_world_width(self, world_width: f64) -> Self {
        Self {
            world_width,
            ..self
        }
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn world_width(&self) -> f64 {
        self.world_width
    }

    pub fn step(&self, lander: &mut CraftState, intent: InputIntent) {
        if lander.is_terminal() {
            return;
        }

        lander.vy += self.g;

        // each thruster checks the tank on its own, an earlier one may have drained it
        if intent.up && lander.fuel > 0. {
            lander.vy -= self.thrust_power;
            burn(lander, self.vertical_fuel_cost);
        }
        if intent.left && lander.fuel > 0. {
            lander.vx -= self.thrust_power * self.lateral_factor;
            burn(lander, self.lateral_fuel_cost);
        }
        if intent.right && lander.fuel > 0. {
            lander.vx += self.thrust_power * self.lateral_factor;
            burn(lander, self.lateral_fuel_cost);
        }

        lander.vx *= self.damping;

        lander.x += lander.vx;
        lander.y += lander.vy;

        // positional stop only, velocity carries over
        let max_x = (self.world_width - lander.width).max(0.);
        lander.x = lander.x.clamp(0., max_x);
    }
}

fn burn(lander: &mut CraftState, cost: f64) {
    lander.fuel = (lander.fuel - cost).max(0.);
}
