//! Haptic feedback sinks
//!
//! The original hardware pulses an impact generator; in a terminal the
//! closest analog is the bell. The sink trait keeps the app testable and
//! lets the bell be switched off without touching the event flow.

use std::io::Write;

use log::debug;

use crate::tracker::HapticPulse;

/// Consumes haptic pulses emitted by the controller.
pub trait HapticSink {
    fn pulse(&mut self, pulse: HapticPulse);
}

/// Rings the terminal bell. Commits always ring; rejection pulses ring
/// only when the `haptic_bell` setting is on, since a pinned boundary can
/// otherwise get noisy across episodes.
pub struct TerminalHaptics<W: Write = std::io::Stdout> {
    out: W,
    reject_bell: bool,
}

impl TerminalHaptics<std::io::Stdout> {
    #[must_use]
    pub fn stdout(reject_bell: bool) -> Self {
        Self::with_writer(std::io::stdout(), reject_bell)
    }
}

impl<W: Write> TerminalHaptics<W> {
    pub fn with_writer(out: W, reject_bell: bool) -> Self {
        Self { out, reject_bell }
    }

    fn ring(&mut self) {
        let _ = self.out.write_all(b"\x07");
        let _ = self.out.flush();
    }
}

impl<W: Write> HapticSink for TerminalHaptics<W> {
    fn pulse(&mut self, pulse: HapticPulse) {
        match pulse {
            HapticPulse::Commit => {
                debug!("Haptic: commit");
                self.ring();
            }
            HapticPulse::Reject => {
                debug!("Haptic: reject");
                if self.reject_bell {
                    self.ring();
                }
            }
        }
    }
}

/// Discards every pulse. Used when the terminal bell is unwelcome.
pub struct NullHaptics;

impl HapticSink for NullHaptics {
    fn pulse(&mut self, _pulse: HapticPulse) {}
}
