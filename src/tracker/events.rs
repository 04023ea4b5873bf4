//! Events emitted by the controller

/// Which viewport edge the feedback bands are anchored to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayPlacement {
    /// Pointer is in the dead zone; no bands are drawn.
    Hidden,
    Left,
    Right,
}

/// Feedback-band geometry for one processed sample.
///
/// Widths are in viewport pixels. A zero width means the band is not drawn;
/// in particular a commit zeroes `effect_width` while `overflow_width` stays
/// until the pointer leaves the edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayUpdate {
    pub placement: OverlayPlacement,
    /// Pressure band, proportional to accumulator magnitude.
    pub effect_width: f64,
    /// Cursor-shadow band, proportional to overshoot depth.
    pub overflow_width: f64,
    /// Clamped pointer position.
    pub cursor_x: f64,
}

/// Discrete feedback pulses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HapticPulse {
    /// A page turn was committed.
    Commit,
    /// The document boundary blocked a turn; fires once per saturation
    /// episode.
    Reject,
}

/// Paging commands issued by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageCommand {
    Advance,
    Retreat,
}

/// Everything the controller can emit for a single command.
///
/// Per sample the engine returns at most one of each variant, with the
/// overlay always first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrackerEvent {
    Overlay(OverlayUpdate),
    Haptic(HapticPulse),
    Page(PageCommand),
}
