use std::fmt::Display;

use rand::Rng;

pub(crate) mod defaults {
    pub const WORLD_WIDTH: f64 = 800.;
    pub const STEP: f64 = 25.;
    pub const ZONE_HALF_WIDTH: f64 = 60.;
    pub const ZONE_BASELINE: f64 = 480.;
    pub const SLOPE_FACTOR: f64 = 0.1;
    pub const ROUGH_BASELINE: f64 = 420.;
    pub const AMPLITUDE: f64 = 60.;
    pub const FREQUENCY: f64 = 0.02;
    pub const ROUGHNESS_RANGE: f64 = 80.;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainPoint {
    pub x: f64,
    pub y: f64,
}

impl TerrainPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    Primary,
    Isru,
    Backup,
}

impl Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Isru => write!(f, "isru"),
            Self::Backup => write!(f, "backup"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LandingZone {
    pub center_x: f64,
    pub width: f64,
    pub label: String,
    pub kind: ZoneKind,
}

impl LandingZone {
    pub fn new(center_x: f64, width: f64, label: &str, kind: ZoneKind) -> Self {
        Self {
            center_x,
            width,
            label: label.to_owned(),
            kind,
        }
    }

    pub fn half_width(&self) -> f64 {
        self.width / 2.
    }

    /// Strict containment, a point exactly on the zone edge is outside.
    pub fn contains(&self, x: f64) -> bool {
        (x - self.center_x).abs() < self.half_width()
    }
}

/// The three mission pads. Positions and labels never change between sessions.
pub fn generate_zones() -> Vec<LandingZone> {
    vec![
        LandingZone::new(200., 100., "LZ-Alpha", ZoneKind::Primary),
        LandingZone::new(400., 120., "ISRU-1", ZoneKind::Isru),
        LandingZone::new(600., 80., "LZ-Beta", ZoneKind::Backup),
    ]
}

pub fn zone_centers(zones: &[LandingZone]) -> Vec<f64> {
    zones.iter().map(|zone| zone.center_x).collect()
}

pub type Segment = (TerrainPoint, TerrainPoint);

#[derive(Debug, Clone)]
pub struct Terrain {
    points: Vec<TerrainPoint>,
}

impl Terrain {
    pub fn from_points(points: Vec<TerrainPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[TerrainPoint] {
        &self.points
    }

    pub fn width(&self) -> f64 {
        self.points.last().map_or(0., |p| p.x)
    }

    pub fn iter_segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Segments, in ascending x, whose x-range overlaps the open span `(left, right)`.
    pub fn segments_under(&self, left: f64, right: f64) -> impl Iterator<Item = Segment> + '_ {
        self.iter_segments()
            .filter(move |(start, end)| right > start.x && left < end.x)
    }

    pub fn height_at(&self, x: f64) -> Option<f64> {
        self.iter_segments()
            .find(|(start, end)| start.x <= x && x <= end.x)
            .map(|segment| interpolate(segment, x))
    }
}

/// Linear elevation along the segment's supporting line. Extrapolates when `x` lies outside it.
pub fn interpolate((start, end): Segment, x: f64) -> f64 {
    let t = (x - start.x) / (end.x - start.x);
    start.y + t * (end.y - start.y)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerrainGenerator {
    world_width: f64,
    step: f64,
    zone_half_width: f64,
    zone_baseline: f64,
    slope_factor: f64,
    rough_baseline: f64,
    amplitude: f64,
    frequency: f64,
    roughness_range: f64,
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self {
            world_width: defaults::WORLD_WIDTH,
            step: defaults::STEP,
            zone_half_width: defaults::ZONE_HALF_WIDTH,
            zone_baseline: defaults::ZONE_BASELINE,
            slope_factor: defaults::SLOPE_FACTOR,
            rough_baseline: defaults::ROUGH_BASELINE,
            amplitude: defaults::AMPLITUDE,
            frequency: defaults::FREQUENCY,
            roughness_range: defaults::ROUGHNESS_RANGE,
        }
    }
}

impl TerrainGenerator {
    pub fn with_world_width(self, world_width: f64) -> Self {
        Self {
            world_width,
            ..self
        }
    }
    pub fn with_step(self, step: f64) -> Self {
        Self { step, ..self }
    }
    pub fn with_zone_half_width(self, zone_half_width: f64) -> Self {
        Self {
            zone_half_width,
            ..self
        }
    }
    pub fn with_zone_baseline(self, zone_baseline: f64) -> Self {
        Self {
            zone_baseline,
            ..self
        }
    }
    pub fn with_slope_factor(self, slope_factor: f64) -> Self {
        Self {
            slope_factor,
            ..self
        }
    }
    pub fn with_rough_baseline(self, rough_baseline: f64) -> Self {
        Self {
            rough_baseline,
            ..self
        }
    }
    pub fn with_amplitude(self, amplitude: f64) -> Self {
        Self { amplitude, ..self }
    }
    pub fn with_frequency(self, frequency: f64) -> Self {
        Self { frequency, ..self }
    }
    pub fn with_roughness_range(self, roughness_range: f64) -> Self {
        Self {
            roughness_range,
            ..self
        }
    }

    pub fn world_width(&self) -> f64 {
        self.world_width
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Builds the surface polyline from `x = 0` to `x = world_width`.
    ///
    /// Points within `zone_half_width` of a zone center get the deterministic pad
    /// elevation of the first such center; everything else is sine-shaped rough
    /// ground with a random offset drawn from `rng`. The random source is only
    /// consumed for rough points, so pad heights do not depend on it.
    pub fn generate<R: Rng + ?Sized>(&self, zone_centers: &[f64], rng: &mut R) -> Terrain {
        let steps = (self.world_width / self.step).floor() as usize;
        let mut points: Vec<_> = (0..=steps)
            .map(|i| i as f64 * self.step)
            .map(|x| TerrainPoint::new(x, self.elevation(x, zone_centers, rng)))
            .collect();

        if points.last().map_or(true, |p| p.x < self.world_width) {
            let x = self.world_width;
            points.push(TerrainPoint::new(x, self.elevation(x, zone_centers, rng)));
        }
        Terrain::from_points(points)
    }

    fn elevation<R: Rng + ?Sized>(&self, x: f64, zone_centers: &[f64], rng: &mut R) -> f64 {
        match zone_centers
            .iter()
            .find(|&&center| (x - center).abs() < self.zone_half_width)
        {
            Some(&center) => self.pad_elevation(center),
            None => {
                self.rough_baseline
                    + self.amplitude * (x * self.frequency).sin()
                    + rng.gen::<f64>() * self.roughness_range
            }
        }
    }

    pub fn pad_elevation(&self, zone_center: f64) -> f64 {
        self.zone_baseline + (zone_center - self.world_width / 2.) * self.slope_factor
    }
}

#[cfg(test)]
mod terrain_tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn assert_feq(left: f64, right: f64) {
        if (left - right).abs() > 1e-9 {
            panic!("Float equal assertion failed, {left} != {right}");
        }
    }

    fn generate(seed: u64) -> Terrain {
        TerrainGenerator::default().generate(
            &zone_centers(&generate_zones()),
            &mut StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn x_strictly_increasing_and_spanning_world() {
        for seed in 0..20 {
            let terrain = generate(seed);
            let points = terrain.points();
            assert_eq!(points.len(), 33);
            assert_feq(points[0].x, 0.);
            assert_feq(points[points.len() - 1].x, 800.);
            assert!(points.windows(2).all(|w| w[0].x < w[1].x));
        }
    }

    #[test]
    fn uneven_width_still_ends_at_world_edge() {
        let terrain = TerrainGenerator::default()
            .with_world_width(810.)
            .generate(&[400.], &mut StdRng::seed_from_u64(3));
        let points = terrain.points();
        assert_feq(points[points.len() - 2].x, 800.);
        assert_feq(points[points.len() - 1].x, 810.);
        assert_feq(terrain.width(), 810.);
    }

    #[test]
    fn pads_are_flat_and_independent_of_randomness() {
        let a = generate(1);
        let b = generate(2);
        for (center, height) in [(200., 460.), (400., 480.), (600., 500.)] {
            for (pa, pb) in a.points().iter().zip(b.points()) {
                if (pa.x - center).abs() < 60. {
                    assert_feq(pa.y, height);
                    assert_feq(pb.y, height);
                }
            }
        }
    }

    #[test]
    fn rough_ground_depends_on_seed() {
        let a = generate(1);
        let b = generate(2);
        assert!(a
            .points()
            .iter()
            .zip(b.points())
            .any(|(pa, pb)| pa.y != pb.y));

        let c = generate(1);
        assert!(a
            .points()
            .iter()
            .zip(c.points())
            .all(|(pa, pc)| pa.y == pc.y));
    }

    #[test]
    fn rough_ground_stays_in_range() {
        let terrain = generate(7);
        for p in terrain.points() {
            assert!(p.y >= 420. - 60. && p.y < 420. + 60. + 80.);
        }
    }

    #[test]
    fn first_zone_wins_on_overlap() {
        let generator = TerrainGenerator::default();
        let terrain = generator.generate(&[100., 150.], &mut StdRng::seed_from_u64(0));
        let point = terrain.points()[5]; // x = 125, within reach of both centers
        assert_feq(point.x, 125.);
        assert_feq(point.y, generator.pad_elevation(100.));
    }

    #[test]
    fn zones_are_fixed() {
        let zones = generate_zones();
        assert_eq!(zones.len(), 3);
        assert_eq!(zones[0].kind, ZoneKind::Primary);
        assert_eq!(zones[1].kind, ZoneKind::Isru);
        assert_eq!(zones[1].label, "ISRU-1");
        assert_eq!(zones[2].kind, ZoneKind::Backup);
        assert_eq!(zones, generate_zones());
    }

    #[test]
    fn zone_containment_is_strict() {
        let zone = LandingZone::new(400., 120., "ISRU-1", ZoneKind::Isru);
        assert!(zone.contains(459.9));
        assert!(!zone.contains(460.));
        assert!(!zone.contains(340.));
    }

    #[test]
    fn segment_lookup_and_interpolation() {
        let terrain = Terrain::from_points(vec![
            TerrainPoint::new(0., 100.),
            TerrainPoint::new(50., 200.),
            TerrainPoint::new(100., 200.),
        ]);
        let segments: Vec<_> = terrain.segments_under(40., 56.).collect();
        assert_eq!(segments.len(), 2);
        let (start, end) = segments[0];
        assert_feq(start.x, 0.);
        assert_feq(end.x, 50.);
        assert_feq(segments[1].0.x, 50.);
        assert_feq(interpolate((start, end), 25.), 150.);
        assert_feq(terrain.height_at(75.).unwrap(), 200.);
        assert_eq!(terrain.segments_under(60., 76.).count(), 1);
        assert!(terrain.segments_under(100., 116.).next().is_none());
        assert!(terrain.height_at(120.).is_none());
    }
}
