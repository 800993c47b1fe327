use crate::simulation::*;
use crate::Error;

pub(crate) mod defaults {
    pub const FLOOR_Y: f64 = 480.;
}

/// Upper bound on `world width / terrain step`.
pub const MAX_TERRAIN_SEGMENTS: f64 = 100_000.;

/// Everything needed to build a [`crate::GameSession`].
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub terrain: TerrainGenerator,
    pub lander: CraftState,
    pub physics: Physics,
    pub limits: CollisionChecker,
    /// Reference level for the altitude readout.
    pub floor_y: f64,
    /// Fixed seed for the rough terrain; `None` draws from the thread RNG.
    pub seed: Option<u64>,
    /// Number of most recent flight samples kept; `None` keeps all of them.
    pub history_limit: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            terrain: TerrainGenerator::default(),
            lander: CraftState::default(),
            physics: Physics::default(),
            limits: CollisionChecker::default(),
            floor_y: defaults::FLOOR_Y,
            seed: None,
            history_limit: None,
        }
    }
}

impl Settings {
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn with_lander(self, lander: CraftState) -> Self {
        Self { lander, ..self }
    }

    pub fn with_history_limit(self, history_limit: usize) -> Self {
        Self {
            history_limit: Some(history_limit),
            ..self
        }
    }

    pub fn validate(&self, zones: &[LandingZone]) -> Result<(), Error> {
        let world_width = self.terrain.world_width();
        check(
            world_width.is_finite() && world_width > 0.,
            "world width",
            || format!("{world_width} has to be positive"),
        )?;
        let step = self.terrain.step();
        check(step > 0., "terrain step", || format!("{step} has to be positive"))?;
        check(
            world_width / step <= MAX_TERRAIN_SEGMENTS,
            "terrain step",
            || format!("{step} splits the world into more than {MAX_TERRAIN_SEGMENTS} segments"),
        )?;

        let CraftState {
            x,
            width,
            height,
            fuel,
            ..
        } = self.lander;
        check(width > 0. && height > 0., "lander size", || {
            format!("{width}x{height} has to be positive")
        })?;
        check(width < world_width, "lander size", || {
            format!("width {width} does not fit into world width {world_width}")
        })?;
        check((0. ..=world_width - width).contains(&x), "lander position", || {
            format!("x {x} outside [0, {}]", world_width - width)
        })?;
        check(
            (0. ..=FUEL_CAPACITY).contains(&fuel),
            "lander fuel",
            || format!("{fuel} outside [0, {}]", FUEL_CAPACITY),
        )?;

        let damping = self.physics.damping();
        check(damping > 0. && damping <= 1., "damping", || {
            format!("{damping} outside (0, 1]")
        })?;

        check(self.history_limit != Some(0), "history limit", || {
            "has to keep at least one sample".to_owned()
        })?;

        for zone in zones {
            check(
                (0. ..=world_width).contains(&zone.center_x),
                "landing zone",
                || format!("{} center {} outside the terrain", zone.label, zone.center_x),
            )?;
        }
        Ok(())
    }
}

fn check(condition: bool, name: &'static str, reason: impl FnOnce() -> String) -> Result<(), Error> {
    if condition {
        Ok(())
    } else {
        Err(Error::InvalidSetting {
            name,
            reason: reason(),
        })
    }
}

#[cfg(test)]
mod settings_tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate(&generate_zones()).is_ok());
    }

    #[test]
    fn rejects_overfull_tank() {
        let settings = Settings::default().with_lander(CraftState::default().with_fuel(150.));
        assert!(matches!(
            settings.validate(&generate_zones()),
            Err(Error::InvalidSetting {
                name: "lander fuel",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zone_outside_narrow_world() {
        let settings = Settings {
            terrain: TerrainGenerator::default().with_world_width(500.),
            lander: CraftState::default().with_x(100.),
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(&generate_zones()),
            Err(Error::InvalidSetting {
                name: "landing zone",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_damping_and_step() {
        let settings = Settings {
            physics: Physics::default().with_damping(1.5),
            ..Settings::default()
        };
        assert!(settings.validate(&generate_zones()).is_err());

        let settings = Settings {
            terrain: TerrainGenerator::default().with_step(0.),
            ..Settings::default()
        };
        assert!(settings.validate(&generate_zones()).is_err());
    }

    #[test]
    fn rejects_too_fine_step() {
        let settings = Settings {
            terrain: TerrainGenerator::default().with_step(1e-12),
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(&generate_zones()),
            Err(Error::InvalidSetting {
                name: "terrain step",
                ..
            })
        ));

        let settings = Settings {
            terrain: TerrainGenerator::default().with_step(0.01),
            ..Settings::default()
        };
        assert!(settings.validate(&generate_zones()).is_ok());
    }

    #[test]
    fn rejects_empty_history() {
        let settings = Settings::default().with_history_limit(0);
        assert!(settings.validate(&generate_zones()).is_err());
        let settings = Settings::default().with_history_limit(1);
        assert!(settings.validate(&generate_zones()).is_ok());
    }

    #[test]
    fn rejects_lander_outside_world() {
        let settings = Settings::default().with_lander(CraftState::default().with_x(790.));
        assert!(settings.validate(&generate_zones()).is_err());
    }
}
