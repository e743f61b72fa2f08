use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("Invalid marker index {0}, expected 0..=3")]
    InvalidIndex(usize),
    #[error("Invalid angle {0}, expected a finite value")]
    InvalidAngle(f64),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn check_angle(angle: f64) -> Result<f64> {
    if angle.is_finite() {
        Ok(angle)
    } else {
        Err(Error::InvalidAngle(angle))
    }
}
