//! Angle normalization and pointer mapping
//!
//! Pure functions turning a raw yaw reading into pointer geometry. The
//! engine calls these once per sample; they hold no state of their own.

use super::types::Viewport;

/// Accumulator magnitude at which the pressure band spans the full viewport.
pub const EFFECT_FULL_SCALE: f64 = 2000.0;

/// Calibrated horizontal deviation in degrees for a raw yaw reading.
#[must_use]
pub fn deviation_degrees(yaw_radians: f64, bias_degrees: f64) -> f64 {
    yaw_radians.to_degrees() + bias_degrees
}

/// Unclamped pointer position: degrees of deviation scaled by the gain,
/// offset so zero deviation lands at the viewport center.
#[must_use]
pub fn raw_pointer_x(deviation_degrees: f64, gain: f64, viewport: Viewport) -> f64 {
    deviation_degrees * gain + viewport.center()
}

/// Pointer position clamped to the viewport bounds.
#[must_use]
pub fn clamp_to_viewport(raw_x: f64, viewport: Viewport) -> f64 {
    raw_x.clamp(0.0, viewport.width)
}

/// How far past the viewport edge the unclamped position reaches, in pixels,
/// halved. Zero whenever the position is inside the viewport.
#[must_use]
pub fn overflow_width(raw_x: f64, viewport: Viewport) -> f64 {
    (raw_x.max(viewport.width) - viewport.width).max(-raw_x.min(0.0)) / 2.0
}

/// Pressure-band width proportional to the accumulator magnitude.
#[must_use]
pub fn effect_width(accumulator: i64, viewport: Viewport) -> f64 {
    accumulator.abs() as f64 * viewport.width / EFFECT_FULL_SCALE
}
