//! Accumulation and hysteresis engine
//!
//! Integrates "press" pressure while the pointer is saturated against a
//! viewport edge and fires page turns when the accumulator crosses the
//! commit threshold. Re-entering the dead zone drops all accumulated
//! pressure, so one turn always requires a full saturate-then-recenter
//! motion cycle.

use super::events::{HapticPulse, OverlayPlacement, OverlayUpdate, PageCommand, TrackerEvent};
use super::pointer;
use super::types::{OrientationSample, Viewport};

/// Whether the document can currently move in each direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PagingAbility {
    pub can_advance: bool,
    pub can_retreat: bool,
}

/// Commands that drive the controller state.
#[derive(Clone, Copy, Debug)]
pub enum Command {
    /// Process one orientation sample.
    Sample {
        sample: OrientationSample,
        ability: PagingAbility,
    },
    /// Change the viewport width. Clears any in-progress saturation episode.
    SetViewport(Viewport),
    /// Change the calibration bias. Clears any in-progress saturation
    /// episode.
    SetBias(f64),
    /// Drop all accumulated pressure and hide the feedback bands.
    Reset,
}

/// Persistent controller state.
///
/// Owned by a single processing worker; everything advances through
/// [`apply`](ControllerState::apply), one command at a time.
#[derive(Clone, Debug)]
pub struct ControllerState {
    /// Logical surface the pointer maps onto.
    pub viewport: Viewport,

    /// Degrees added to every normalized sample.
    pub bias_degrees: f64,

    /// Pixels of pointer travel per degree of deviation.
    pub gain: f64,

    /// Accumulator magnitude required to commit a page turn.
    pub commit_threshold: i64,

    /// Signed page-turn pressure. Positive while right-saturated.
    pub accumulator: i64,

    /// Per-sample accumulator increment, derived from overshoot depth.
    pub speed_factor: i64,

    /// Consecutive commits without an intervening dead-zone sample.
    pub repeat_count: u32,

    /// True once the boundary-blocked pulse has fired for the current
    /// saturation episode.
    pub rejection_notified: bool,

    /// Last clamped pointer position.
    pub cursor_x: f64,
}

impl ControllerState {
    #[must_use]
    pub fn new(viewport: Viewport, bias_degrees: f64, gain: f64, commit_threshold: i64) -> Self {
        Self {
            viewport,
            bias_degrees,
            gain,
            commit_threshold,
            accumulator: 0,
            speed_factor: 0,
            repeat_count: 0,
            rejection_notified: false,
            cursor_x: viewport.center(),
        }
    }

    /// Apply a command and return resulting events.
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<TrackerEvent> {
        match cmd {
            Command::Sample { sample, ability } => self.process_sample(sample, ability),

            Command::SetViewport(viewport) => {
                if (self.viewport.width - viewport.width).abs() > f64::EPSILON {
                    self.viewport = viewport;
                    self.clear_episode();
                    vec![TrackerEvent::Overlay(self.hidden_overlay())]
                } else {
                    vec![]
                }
            }

            Command::SetBias(bias_degrees) => {
                self.bias_degrees = bias_degrees;
                self.clear_episode();
                vec![TrackerEvent::Overlay(self.hidden_overlay())]
            }

            Command::Reset => {
                self.clear_episode();
                vec![TrackerEvent::Overlay(self.hidden_overlay())]
            }
        }
    }

    fn process_sample(
        &mut self,
        sample: OrientationSample,
        ability: PagingAbility,
    ) -> Vec<TrackerEvent> {
        let deviation = pointer::deviation_degrees(sample.yaw_radians, self.bias_degrees);
        let raw_x = pointer::raw_pointer_x(deviation, self.gain, self.viewport);

        // Band widths come from the pre-clamp position and the accumulator
        // value before this sample updates it.
        let overflow_width = pointer::overflow_width(raw_x, self.viewport);
        let effect_width = pointer::effect_width(self.accumulator, self.viewport);

        self.cursor_x = pointer::clamp_to_viewport(raw_x, self.viewport);
        self.speed_factor = overflow_width.floor() as i64;

        let mut overlay = if self.cursor_x == 0.0 {
            self.accumulator -= self.speed_factor;
            OverlayUpdate {
                placement: OverlayPlacement::Left,
                effect_width,
                overflow_width,
                cursor_x: self.cursor_x,
            }
        } else if self.cursor_x == self.viewport.width {
            self.accumulator += self.speed_factor;
            OverlayUpdate {
                placement: OverlayPlacement::Right,
                effect_width,
                overflow_width,
                cursor_x: self.cursor_x,
            }
        } else {
            // Dead zone: a fresh episode starts the next time an edge is hit.
            self.accumulator = 0;
            self.repeat_count = 0;
            self.rejection_notified = false;
            self.hidden_overlay()
        };

        // Commit check runs every sample, after the saturation branch. On a
        // blocked commit the accumulator is left to grow so the pulse stays
        // latched for the rest of the episode.
        let mut events = Vec::with_capacity(3);
        if self.accumulator >= self.commit_threshold {
            if ability.can_advance {
                self.commit();
                overlay.effect_width = 0.0;
                events.push(TrackerEvent::Haptic(HapticPulse::Commit));
                events.push(TrackerEvent::Page(PageCommand::Advance));
            } else if !self.rejection_notified {
                self.rejection_notified = true;
                events.push(TrackerEvent::Haptic(HapticPulse::Reject));
            }
        } else if self.accumulator <= -self.commit_threshold {
            if ability.can_retreat {
                self.commit();
                overlay.effect_width = 0.0;
                events.push(TrackerEvent::Haptic(HapticPulse::Commit));
                events.push(TrackerEvent::Page(PageCommand::Retreat));
            } else if !self.rejection_notified {
                self.rejection_notified = true;
                events.push(TrackerEvent::Haptic(HapticPulse::Reject));
            }
        }

        events.insert(0, TrackerEvent::Overlay(overlay));
        events
    }

    fn commit(&mut self) {
        self.accumulator = 0;
        self.repeat_count += 1;
        self.rejection_notified = false;
    }

    fn clear_episode(&mut self) {
        self.accumulator = 0;
        self.speed_factor = 0;
        self.repeat_count = 0;
        self.rejection_notified = false;
    }

    fn hidden_overlay(&self) -> OverlayUpdate {
        OverlayUpdate {
            placement: OverlayPlacement::Hidden,
            effect_width: 0.0,
            overflow_width: 0.0,
            cursor_x: self.cursor_x,
        }
    }
}
