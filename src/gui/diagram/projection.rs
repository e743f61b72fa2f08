//! Orthographic projection of delta-space onto the trajectory view.
//!
//! The cube `[0, PI]^3` is centered on the origin and scaled to unit size before
//! rotating, so the camera always orbits the middle of the cube.

use kuratowski_core::Point;
use std::f64::consts::{FRAC_PI_2, PI};

const PITCH_LIMIT: f64 = FRAC_PI_2 - 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub yaw: f64,
    pub pitch: f64,
}

impl Camera {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
        }
    }

    /// Camera after dragging by `(dx, dy)` pixels.
    pub fn dragged(&self, dx: f64, dy: f64, radians_per_pixel: f64) -> Self {
        Self::new(
            self.yaw + dx * radians_per_pixel,
            self.pitch + dy * radians_per_pixel,
        )
    }

    /// Rotated coordinates of a delta triple: `(right, up, depth)`.
    pub fn rotate(&self, p: [f64; 3]) -> [f64; 3] {
        let [x, y, z] = p.map(|c| (c - PI / 2.0) / PI);
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();

        let right = x * cy - y * sy;
        let forward = x * sy + y * cy;

        [right, z * cp - forward * sp, forward * cp + z * sp]
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(-60f64.to_radians(), 30f64.to_radians())
    }
}

/// Screen area the unit cube is fitted into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Point,
    pub scale: f64,
}

impl Viewport {
    /// Leaves room for the cube diagonal plus axis labels.
    pub fn fit(width: f64, height: f64) -> Self {
        Self {
            center: Point::new(width / 2.0, height / 2.0),
            scale: width.min(height) * 0.55,
        }
    }

    pub fn project(&self, camera: &Camera, p: [f64; 3]) -> Point {
        let [right, up, _] = camera.rotate(p);
        Point::new(
            self.center.x + right * self.scale,
            self.center.y - up * self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(v: [f64; 3]) -> f64 {
        v.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    #[test]
    fn test_cube_center_maps_to_viewport_center() {
        let viewport = Viewport::fit(400.0, 300.0);
        let center = [PI / 2.0; 3];
        for camera in [Camera::default(), Camera::new(1.0, -0.3), Camera::new(0.0, 0.0)] {
            let p = viewport.project(&camera, center);
            assert!((p.x - 200.0).abs() < 1e-9);
            assert!((p.y - 150.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rotation_preserves_length() {
        let camera = Camera::new(0.7, 0.4);
        for p in [[0.0, 0.0, 0.0], [PI, 0.0, 0.0], [0.3, 2.0, 1.1]] {
            let centered = p.map(|c| (c - PI / 2.0) / PI);
            assert!((norm(camera.rotate(p)) - norm(centered)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_front_view_axes() {
        let camera = Camera::new(0.0, 0.0);
        let viewport = Viewport {
            center: Point::new(0.0, 0.0),
            scale: 1.0,
        };
        // first delta grows to the right, third delta grows upwards (screen y down)
        let origin = viewport.project(&camera, [0.0, 0.0, 0.0]);
        let x = viewport.project(&camera, [PI, 0.0, 0.0]);
        let z = viewport.project(&camera, [0.0, 0.0, PI]);
        assert!((x.x - origin.x - 1.0).abs() < 1e-12);
        assert!((z.y - origin.y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let camera = Camera::default().dragged(0.0, 10_000.0, 0.01);
        assert!(camera.pitch < FRAC_PI_2);
        let camera = Camera::default().dragged(0.0, -10_000.0, 0.01);
        assert!(camera.pitch > -FRAC_PI_2);
    }
}
