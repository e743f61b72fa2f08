//! Circular angle math shared by the marker state and the trajectory sweep.
//!
//! Every function here is total over finite input. Angles are radians and may
//! take any real value; they are only reduced modulo `TAU` at the point of use.

pub use std::f64::consts::{PI, TAU};

/// Reduces `angle` to `[0, TAU)`.
pub fn wrap(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid may round up to TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Shorter of the two arc lengths between `a` and `b`, always in `[0, PI]`.
///
/// Both directions are wrapped and the smaller one is taken, so the result is
/// exactly symmetric in its arguments.
pub fn circular_distance(a: f64, b: f64) -> f64 {
    wrap(b - a).min(wrap(a - b))
}

/// Signed sweep from `from` to `to` going the short way around.
///
/// Positive extents run counter-clockwise (increasing angle). A difference of
/// exactly `PI` resolves to `+PI`. The magnitude always equals
/// [`circular_distance`] of the same pair.
pub fn short_extent(from: f64, to: f64) -> f64 {
    let diff = wrap(to - from);
    if diff > PI { -(TAU - diff) } else { diff }
}

/// `steps` evenly spaced samples from `start` to `end`, both endpoints included.
///
/// A single step yields only `start`; zero steps yield nothing.
pub fn linspace(start: f64, end: f64, steps: usize) -> impl Iterator<Item = f64> {
    let step = if steps > 1 {
        (end - start) / (steps - 1) as f64
    } else {
        0.0
    };

    (0..steps).map(move |i| {
        if steps > 1 && i == steps - 1 {
            end
        } else {
            start + i as f64 * step
        }
    })
}
