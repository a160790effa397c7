//! Tri-axial motion frame.

use std::ops::{Add, Div};

use serde::{Deserialize, Serialize};

/// One tri-axial motion sample, typically an accelerometer reading.
///
/// Immutable value type. Orientation angles are derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// X axis value.
    #[serde(alias = "X", alias = "accelX")]
    pub x: f64,
    /// Y axis value.
    #[serde(alias = "Y", alias = "accelY")]
    pub y: f64,
    /// Z axis value.
    #[serde(alias = "Z", alias = "accelZ")]
    pub z: f64,
}

impl Frame {
    /// The origin frame `(0, 0, 0)`.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a frame from its three axis values.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Return the axis values as `[x, y, z]`.
    #[must_use]
    pub fn axes(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Return the index of the first non-finite axis, if any.
    #[must_use]
    pub fn first_non_finite_axis(&self) -> Option<usize> {
        self.axes().iter().position(|v| !v.is_finite())
    }

    /// Roll angle in radians, `atan2(x, z)`.
    #[must_use]
    pub fn roll(&self) -> f64 {
        self.x.atan2(self.z)
    }

    /// Pitch angle in radians, `atan2(y, sqrt(x² + z²))`.
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.y.atan2((self.x * self.x + self.z * self.z).sqrt())
    }

    /// Coordinate-wise mean (barycenter) of `frames`. `None` for an empty slice.
    #[must_use]
    pub fn mean(frames: &[Frame]) -> Option<Frame> {
        if frames.is_empty() {
            return None;
        }
        let sum = frames.iter().fold(Frame::ZERO, |acc, &f| acc + f);
        Some(sum / frames.len() as f64)
    }
}

impl Add for Frame {
    type Output = Frame;

    fn add(self, rhs: Frame) -> Frame {
        Frame::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Div<f64> for Frame {
    type Output = Frame;

    fn div(self, rhs: f64) -> Frame {
        Frame::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl From<[f64; 3]> for Frame {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<(f64, f64, f64)> for Frame {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;
    use std::f64::consts::FRAC_PI_4;

    use super::*;

    #[test]
    fn mean_of_frames() {
        let frames = [
            Frame::new(0.0, 0.0, 0.0),
            Frame::new(2.0, 4.0, 6.0),
            Frame::new(4.0, 2.0, 0.0),
        ];
        assert_eq!(Frame::mean(&frames), Some(Frame::new(2.0, 2.0, 2.0)));
    }

    #[test]
    fn mean_of_nothing() {
        assert_eq!(Frame::mean(&[]), None);
    }

    #[test]
    fn roll_and_pitch() {
        let flat = Frame::new(0.0, 0.0, 1.0);
        assert!(flat.roll().abs() < 1e-12);
        assert!(flat.pitch().abs() < 1e-12);

        let tilted = Frame::new(1.0, 0.0, 1.0);
        assert!((tilted.roll() - FRAC_PI_4).abs() < 1e-12);

        let upright = Frame::new(0.0, 1.0, 0.0);
        assert!((upright.pitch() - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn non_finite_axis_reported() {
        assert_eq!(Frame::new(1.0, 2.0, 3.0).first_non_finite_axis(), None);
        assert_eq!(Frame::new(1.0, f64::NAN, 3.0).first_non_finite_axis(), Some(1));
        assert_eq!(
            Frame::new(1.0, 2.0, f64::NEG_INFINITY).first_non_finite_axis(),
            Some(2)
        );
    }

    #[test]
    fn deserializes_uppercase_aliases() {
        let frame: Frame = serde_json::from_str(r#"{"X": 1.0, "Y": -2.0, "Z": 3.5}"#).unwrap();
        assert_eq!(frame, Frame::new(1.0, -2.0, 3.5));
    }
}
