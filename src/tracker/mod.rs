//! Head-pose page-turn controller

mod engine;
mod events;
pub mod pointer;
mod service;
mod types;

pub use engine::{Command, ControllerState, PagingAbility};
pub use events::{HapticPulse, OverlayPlacement, OverlayUpdate, PageCommand, TrackerEvent};
pub use service::TrackerService;
pub use types::{OrientationSample, Viewport};

/// Degrees added to every normalized sample to offset sensor mounting.
pub const DEFAULT_BIAS_DEGREES: f64 = -5.0;

/// Pixels of pointer travel per degree of head yaw.
pub const DEFAULT_GAIN: f64 = 30.0;

/// Accumulator magnitude required to commit a page turn.
pub const DEFAULT_COMMIT_THRESHOLD: i64 = 2000;

/// Logical viewport width the default tuning was chosen against.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1000.0;
