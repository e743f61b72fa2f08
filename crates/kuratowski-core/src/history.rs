use crate::angle::{PI, TAU, linspace};
use crate::state::Deltas;

/// Samples taken by one reference sweep.
pub const DEFAULT_SWEEP_STEPS: usize = 1000;

/// Upper bound on the samples of a single sweep.
pub const MAX_SWEEP_STEPS: usize = 100_000;

/// A past delta triple, a point inside the cube `[0, PI]^3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TrajectoryPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn components(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn in_bounds(&self) -> bool {
        self.components().iter().all(|c| (0.0..=PI).contains(c))
    }
}

impl From<Deltas> for TrajectoryPoint {
    fn from(deltas: Deltas) -> Self {
        let [x, y, z] = *deltas;
        Self { x, y, z }
    }
}

/// Deltas seen by a reference marker rotating from `0` to `TAU` while the
/// comparison markers stay at `fixed`.
pub fn sweep(fixed: [f64; 3], steps: usize) -> impl Iterator<Item = TrajectoryPoint> {
    linspace(0.0, TAU, steps).map(move |reference| Deltas::measure(reference, fixed).into())
}

/// Append-only record of delta triples in the order they were observed.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryHistory {
    points: Vec<TrajectoryPoint>,
}

impl TrajectoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, point: TrajectoryPoint) {
        debug_assert!(point.in_bounds(), "trajectory point out of range: {point:?}");
        self.points.push(point);
    }

    /// Appends the full sweep locus for the given comparison angles and
    /// returns how many points were added. `steps` is capped at `MAX_SWEEP_STEPS`.
    pub fn append_sweep(&mut self, fixed: [f64; 3], steps: usize) -> usize {
        let steps = steps.min(MAX_SWEEP_STEPS);
        let before = self.points.len();
        self.points.reserve(steps);
        self.points.extend(sweep(fixed, steps));
        self.points.len() - before
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn snapshot(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_append_keeps_order_and_duplicates() {
        let mut history = TrajectoryHistory::new();
        let a = TrajectoryPoint::new(0.1, 0.2, 0.3);
        let b = TrajectoryPoint::new(1.0, 2.0, 3.0);
        history.append(a);
        history.append(b);
        history.append(a);
        assert_eq!(history.snapshot(), &[a, b, a]);
        assert_eq!(history.last(), Some(&a));
    }

    #[test]
    fn test_sweep_appends_exact_step_count() {
        for fixed in [[0.0, 0.0, 0.0], [FRAC_PI_2, PI, 3.0 * FRAC_PI_2], [-9.0, 42.0, 0.5]] {
            let mut history = TrajectoryHistory::new();
            assert_eq!(history.append_sweep(fixed, DEFAULT_SWEEP_STEPS), 1000);
            assert_eq!(history.len(), 1000);
            assert!(history.snapshot().iter().all(TrajectoryPoint::in_bounds));
        }
    }

    #[test]
    fn test_sweep_endpoints_coincide() {
        let fixed = [0.4, 2.2, 5.0];
        let points: Vec<_> = sweep(fixed, DEFAULT_SWEEP_STEPS).collect();
        let first = points[0];
        let last = points[points.len() - 1];

        assert_eq!(first, TrajectoryPoint::from(Deltas::measure(0.0, fixed)));
        for (a, b) in first.components().iter().zip(last.components()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sweep_is_deterministic() {
        let fixed = [1.0, 2.0, 3.0];
        let a: Vec<_> = sweep(fixed, DEFAULT_SWEEP_STEPS).collect();
        let b: Vec<_> = sweep(fixed, DEFAULT_SWEEP_STEPS).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sweep_passes_through_each_marker() {
        // with four samples the reference lands on 0, 2PI/3, 4PI/3 and 2PI
        let fixed = [0.0, TAU / 3.0, 2.0 * TAU / 3.0];
        let points: Vec<_> = sweep(fixed, 4).collect();
        assert_eq!(points[0].x, 0.0);
        assert!(points[1].y.abs() < 1e-9);
        assert!(points[2].z.abs() < 1e-9);
    }

    #[test]
    fn test_sweep_extends_existing_history() {
        let mut history = TrajectoryHistory::new();
        let p = TrajectoryPoint::new(0.5, 0.5, 0.5);
        history.append(p);
        history.append_sweep([0.0, 1.0, 2.0], 10);
        assert_eq!(history.len(), 11);
        assert_eq!(history.snapshot()[0], p);
    }

    #[test]
    fn test_sweep_steps_are_capped() {
        let mut history = TrajectoryHistory::new();
        assert_eq!(history.append_sweep([0.0, 1.0, 2.0], usize::MAX), MAX_SWEEP_STEPS);
        assert_eq!(history.len(), MAX_SWEEP_STEPS);
        let end = TrajectoryPoint::from(Deltas::measure(TAU, [0.0, 1.0, 2.0]));
        assert_eq!(history.last(), Some(&end));
    }

    #[test]
    fn test_clear_empties_snapshot() {
        let mut history = TrajectoryHistory::new();
        history.append_sweep([0.0, 1.0, 2.0], DEFAULT_SWEEP_STEPS);
        history.clear();
        assert!(history.snapshot().is_empty());
        assert!(history.is_empty());
        assert_eq!(history.last(), None);
    }

    #[test]
    fn test_point_from_deltas() {
        let point = TrajectoryPoint::from(Deltas::new(0.1, 0.2, 0.3));
        assert_eq!(point.components(), [0.1, 0.2, 0.3]);
        assert!(!TrajectoryPoint::new(-0.1, 0.0, 0.0).in_bounds());
    }
}
