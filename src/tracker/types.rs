//! Value types shared across the tracking pipeline

use serde::{Deserialize, Serialize};

/// A single head-orientation reading from a pose source.
///
/// Carries the signed horizontal rotation (yaw) in radians. Sources that
/// receive angles in degrees convert before constructing a sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientationSample {
    pub yaw_radians: f64,
}

impl OrientationSample {
    #[must_use]
    pub const fn new(yaw_radians: f64) -> Self {
        Self { yaw_radians }
    }
}

/// Logical surface the pointer travels across, in device-independent pixels.
///
/// This is the coordinate space of the controller, not the terminal: the HUD
/// scales positions into cells when drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64) -> Self {
        Self { width }
    }

    #[must_use]
    pub fn center(&self) -> f64 {
        self.width / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_center_is_half_width() {
        assert_eq!(Viewport::new(1000.0).center(), 500.0);
    }

    #[test]
    fn sample_serializes_to_single_field_json() {
        let sample = OrientationSample::new(0.25);
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"yaw_radians":0.25}"#);

        let back: OrientationSample = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample);
    }
}
