use super::{interpolate, CraftState, FlightOutcome, LandingQuality, LandingZone, Terrain, ZoneKind};

pub(crate) mod defaults {
    pub const SOFT_SPEED: f64 = 1.5;
    pub const STABLE_SPEED: f64 = 0.8;
    pub const FUEL_RESERVE: f64 = 10.;
    pub const SURVIVABLE_SPEED: f64 = 2.;
}

/// Touchdown detection and classification.
///
/// Vertical speeds are signed (positive means descending), so a craft that is
/// still rising when it touches the ground always counts as soft.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionChecker {
    soft_speed: f64,
    stable_speed: f64,
    fuel_reserve: f64,
    survivable_speed: f64,
}

impl Default for CollisionChecker {
    fn default() -> Self {
        Self {
            soft_speed: defaults::SOFT_SPEED,
            stable_speed: defaults::STABLE_SPEED,
            fuel_reserve: defaults::FUEL_RESERVE,
            survivable_speed: defaults::SURVIVABLE_SPEED,
        }
    }
}

impl CollisionChecker {
    pub fn with_soft_speed(self, soft_speed: f64) -> Self {
        Self { soft_speed, ..self }
    }

    pub fn with_stable_speed(self, stable_speed: f64) -> Self {
        Self {
            stable_speed,
            ..self
        }
    }

    pub fn with_fuel_reserve(self, fuel_reserve: f64) -> Self {
        Self {
            fuel_reserve,
            ..self
        }
    }

    pub fn with_survivable_speed(self, survivable_speed: f64) -> Self {
        Self {
            survivable_speed,
            ..self
        }
    }

    /// Surface elevation under the craft when its bottom edge has reached it.
    ///
    /// Walks the segments overlapping the craft's bounding box in ascending x,
    /// evaluating each segment's line at the craft's horizontal center, and
    /// stops at the first one the bottom edge has reached. No overlapping
    /// segment means no contact.
    pub fn surface_contact(&self, lander: &CraftState, terrain: &Terrain) -> Option<f64> {
        terrain
            .segments_under(lander.x, lander.x + lander.width)
            .map(|segment| interpolate(segment, lander.center_x()))
            .find(|surface_y| lander.bottom() >= *surface_y)
    }

    pub fn classify(&self, lander: &CraftState, zones: &[LandingZone]) -> FlightOutcome {
        let center_x = lander.center_x();
        let is_soft = lander.vy < self.soft_speed;
        let is_stable = lander.vx.abs() < self.stable_speed;
        let has_reserve = lander.fuel > self.fuel_reserve;

        let isru_zone = zones
            .iter()
            .position(|zone| zone.kind == ZoneKind::Isru && zone.contains(center_x));
        let any_zone = zones.iter().position(|zone| zone.contains(center_x));

        match (isru_zone, any_zone) {
            (Some(zone), _) if is_soft && is_stable && has_reserve => FlightOutcome::Landed {
                zone,
                quality: LandingQuality::Perfect,
            },
            (_, Some(zone)) if is_soft => FlightOutcome::Landed {
                zone,
                quality: LandingQuality::Good,
            },
            _ if lander.vy < self.survivable_speed => FlightOutcome::LandedRough,
            _ => FlightOutcome::Crashed,
        }
    }

    /// Outcome the craft would get this tick, without touching it.
    pub fn check(
        &self,
        lander: &CraftState,
        terrain: &Terrain,
        zones: &[LandingZone],
    ) -> Option<FlightOutcome> {
        if lander.is_terminal() {
            return None;
        }
        let surface_y = self.surface_contact(lander, terrain)?;
        log::debug!(
            "Touchdown at x={:.2} surface={surface_y:.2} vx={:.2} vy={:.2} fuel={:.1}",
            lander.center_x(),
            lander.vx,
            lander.vy,
            lander.fuel
        );
        Some(self.classify(lander, zones))
    }

    /// Checks for touchdown and stores the outcome on the craft. Returns the
    /// outcome only on the tick the flight ends.
    pub fn resolve(
        &self,
        lander: &mut CraftState,
        terrain: &Terrain,
        zones: &[LandingZone],
    ) -> Option<FlightOutcome> {
        let outcome = self.check(lander, terrain, zones)?;
        lander.finish(outcome).then_some(outcome)
    }
}
