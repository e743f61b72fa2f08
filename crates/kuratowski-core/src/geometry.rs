use crate::marker::Marker;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Direction in which the vertical coordinate grows on the drawing surface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    /// Screen convention: y increases downwards, so `sin` is subtracted.
    #[default]
    Down,
    Up,
}

/// Where the marker circle sits on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleLayout {
    pub center: Point,
    pub radius: f64,
    pub y_axis: YAxis,
}

impl CircleLayout {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            y_axis: YAxis::Down,
        }
    }

    pub fn with_y_axis(self, y_axis: YAxis) -> Self {
        Self { y_axis, ..self }
    }

    pub fn point_at(&self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        let dy = self.radius * sin;
        Point::new(
            self.center.x + self.radius * cos,
            match self.y_axis {
                YAxis::Down => self.center.y - dy,
                YAxis::Up => self.center.y + dy,
            },
        )
    }
}

impl Default for CircleLayout {
    /// Matches the original 300x300 canvas with a radius-100 circle.
    fn default() -> Self {
        Self::new(Point::new(150.0, 150.0), 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPoint {
    pub marker: Marker,
    pub position: Point,
}
