pub mod test_helpers {
    use std::sync::{Arc, Mutex};

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::haptics::HapticSink;
    use crate::navigator::PageNavigator;
    use crate::pose_source::ScriptedPoseSource;
    use crate::tracker::{HapticPulse, OrientationSample};

    /// Builder for head-motion scenarios fed to the controller in tests.
    ///
    /// Angles are given in degrees for readability; samples carry radians.
    pub struct PoseScenarioBuilder {
        samples: Vec<OrientationSample>,
    }

    impl PoseScenarioBuilder {
        pub fn new() -> Self {
            Self {
                samples: Vec::new(),
            }
        }

        /// Hold the head at `yaw_degrees` for `count` sensor frames.
        pub fn hold_degrees(mut self, yaw_degrees: f64, count: usize) -> Self {
            for _ in 0..count {
                self.samples
                    .push(OrientationSample::new(yaw_degrees.to_radians()));
            }
            self
        }

        /// Look straight ahead for `count` frames.
        pub fn center(self, count: usize) -> Self {
            self.hold_degrees(0.0, count)
        }

        pub fn into_samples(self) -> Vec<OrientationSample> {
            self.samples
        }

        pub fn build(self) -> ScriptedPoseSource {
            ScriptedPoseSource::new(self.samples)
        }
    }

    impl Default for PoseScenarioBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Haptic sink that records every pulse for assertions.
    #[derive(Clone, Default)]
    pub struct RecordingHaptics {
        pulses: Arc<Mutex<Vec<HapticPulse>>>,
    }

    impl RecordingHaptics {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn pulses(&self) -> Vec<HapticPulse> {
            self.pulses
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone()
        }
    }

    impl HapticSink for RecordingHaptics {
        fn pulse(&mut self, pulse: HapticPulse) {
            self.pulses
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(pulse);
        }
    }

    /// Navigator double with scripted abilities and call counters.
    pub struct CountingNavigator {
        pub can_advance: bool,
        pub can_retreat: bool,
        pub advances: usize,
        pub retreats: usize,
    }

    impl CountingNavigator {
        pub fn new(can_advance: bool, can_retreat: bool) -> Self {
            Self {
                can_advance,
                can_retreat,
                advances: 0,
                retreats: 0,
            }
        }
    }

    impl PageNavigator for CountingNavigator {
        fn can_advance(&self) -> bool {
            self.can_advance
        }

        fn can_retreat(&self) -> bool {
            self.can_retreat
        }

        fn advance(&mut self) {
            self.advances += 1;
        }

        fn retreat(&mut self) {
            self.retreats += 1;
        }

        fn current_page(&self) -> Option<usize> {
            None
        }

        fn page_count(&self) -> Option<usize> {
            None
        }
    }

    /// Create a test terminal for HUD testing
    pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    /// Capture the current terminal buffer as a string
    pub fn capture_terminal_state(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();

        for y in 0..buffer.area.height {
            let mut line = String::new();
            for x in 0..buffer.area.width {
                let cell = buffer.get(x, y);
                line.push_str(cell.symbol());
            }
            // Trim trailing whitespace from each line
            lines.push(line.trim_end().to_string());
        }

        // Remove trailing empty lines
        while lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;

    #[test]
    fn scenario_builder_converts_degrees_to_radians() {
        let samples = PoseScenarioBuilder::new()
            .hold_degrees(30.0, 2)
            .center(1)
            .into_samples();

        assert_eq!(samples.len(), 3);
        assert!((samples[0].yaw_radians - 30.0_f64.to_radians()).abs() < 1e-12);
        assert_eq!(samples[2].yaw_radians, 0.0);
    }

    #[test]
    fn recording_haptics_shares_its_log() {
        use crate::haptics::HapticSink;
        use crate::tracker::HapticPulse;

        let recorder = RecordingHaptics::new();
        let mut sink = recorder.clone();
        sink.pulse(HapticPulse::Commit);
        sink.pulse(HapticPulse::Reject);

        assert_eq!(recorder.pulses(), vec![HapticPulse::Commit, HapticPulse::Reject]);
    }
}
