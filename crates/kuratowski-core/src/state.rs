use crate::angle::{circular_distance, short_extent};
use crate::error::{Result, check_angle};
use crate::geometry::{CircleLayout, MarkerPoint};
use crate::marker::{MARKER_COUNT, Marker};
use derive_more::{AsRef, Deref, From, Into};

/// Circular distances from the reference marker to green, blue and purple.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deref, From, Into, AsRef)]
pub struct Deltas([f64; 3]);

impl Deltas {
    pub fn new(green: f64, blue: f64, purple: f64) -> Self {
        Self([green, blue, purple])
    }

    /// Deltas of `comparisons` measured from `reference`.
    pub fn measure(reference: f64, comparisons: [f64; 3]) -> Self {
        Self(comparisons.map(|angle| circular_distance(reference, angle)))
    }

    pub fn get(&self, marker: Marker) -> Option<f64> {
        marker.delta_slot().map(|slot| self.0[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Marker, f64)> + '_ {
        Marker::COMPARISONS.into_iter().zip(self.0)
    }
}

/// One arc of the circle diagram, from the reference marker to `owner` the short way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcDescriptor {
    pub owner: Marker,
    pub start: f64,
    pub extent: f64,
}

impl ArcDescriptor {
    pub fn abs_extent(&self) -> f64 {
        self.extent.abs()
    }

    pub fn end(&self) -> f64 {
        self.start + self.extent
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleState {
    angles: [f64; MARKER_COUNT],
}

impl AngleState {
    pub fn new(angles: [f64; MARKER_COUNT]) -> Result<Self> {
        for angle in angles {
            check_angle(angle)?;
        }
        Ok(Self { angles })
    }

    /// Stores the angle as given. Wrapping happens only when deltas or arcs are computed.
    pub fn set_angle(&mut self, marker: Marker, angle: f64) -> Result<()> {
        self.angles[marker.index()] = check_angle(angle)?;
        Ok(())
    }

    pub fn set_angle_at(&mut self, index: usize, angle: f64) -> Result<Marker> {
        let marker = Marker::from_index(index)?;
        self.set_angle(marker, angle)?;
        Ok(marker)
    }

    pub fn angle(&self, marker: Marker) -> f64 {
        self.angles[marker.index()]
    }

    pub fn angles(&self) -> [f64; MARKER_COUNT] {
        self.angles
    }

    pub fn reference_angle(&self) -> f64 {
        self.angle(Marker::REFERENCE)
    }

    pub fn comparison_angles(&self) -> [f64; 3] {
        Marker::COMPARISONS.map(|m| self.angle(m))
    }

    pub fn compute_deltas(&self) -> Deltas {
        Deltas::measure(self.reference_angle(), self.comparison_angles())
    }

    /// Arcs sorted by magnitude, largest first, so smaller arcs end up drawn on top.
    /// Equal magnitudes keep marker order.
    pub fn compute_arcs(&self) -> Vec<ArcDescriptor> {
        let start = self.reference_angle();
        let mut arcs: Vec<ArcDescriptor> = Marker::COMPARISONS
            .iter()
            .map(|&owner| ArcDescriptor {
                owner,
                start,
                extent: short_extent(start, self.angle(owner)),
            })
            .collect();

        arcs.sort_by(|a, b| b.abs_extent().total_cmp(&a.abs_extent()));
        arcs
    }

    pub fn compute_points(&self, layout: &CircleLayout) -> [MarkerPoint; MARKER_COUNT] {
        Marker::ALL.map(|marker| MarkerPoint {
            marker,
            position: layout.point_at(self.angle(marker)),
        })
    }
}

impl Default for AngleState {
    fn default() -> Self {
        Self {
            angles: Marker::ALL.map(Marker::default_angle),
        }
    }
}
