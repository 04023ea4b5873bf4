//! Application state and event loop
//!
//! Wires the pose source, the tracker service, the navigator, the haptic
//! sink and the HUD together. The tracker owns its own worker thread; this
//! loop pumps samples in, drains events out, and handles the keyboard.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use log::{info, warn};
use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::event_source::EventSource;
use crate::haptics::HapticSink;
use crate::hud::{self, HudView};
use crate::navigator::{DocumentSession, PageNavigator};
use crate::notification::NotificationManager;
use crate::pose_source::PoseSource;
use crate::settings;
use crate::theme;
use crate::tracker::{
    ControllerState, HapticPulse, OverlayPlacement, OverlayUpdate, PageCommand, TrackerEvent,
    TrackerService, Viewport,
};

/// Controller tuning resolved from settings, with CLI overrides applied on
/// top for the session only.
#[derive(Clone, Debug)]
pub struct Tuning {
    pub bias_degrees: f64,
    pub gain: f64,
    pub commit_threshold: i64,
    pub viewport_width: f64,
}

impl Tuning {
    #[must_use]
    pub fn from_settings() -> Self {
        Self {
            bias_degrees: settings::get_calibration_bias_degrees(),
            gain: settings::get_sensitivity_gain(),
            commit_threshold: settings::get_commit_threshold(),
            viewport_width: settings::get_viewport_width(),
        }
    }
}

pub struct App {
    service: TrackerService,
    navigator: Arc<Mutex<DocumentSession>>,
    source: Box<dyn PoseSource>,
    haptics: Box<dyn HapticSink>,
    pub notifications: NotificationManager,
    viewport: Viewport,
    overlay: OverlayUpdate,
    repeat_count: u32,
    session_bias_degrees: f64,
    last_yaw_degrees: f64,
    paused: bool,
    source_label: String,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(
        source: Box<dyn PoseSource>,
        session: DocumentSession,
        haptics: Box<dyn HapticSink>,
        tuning: &Tuning,
    ) -> Self {
        let viewport = Viewport::new(tuning.viewport_width);
        let navigator: Arc<Mutex<DocumentSession>> = Arc::new(Mutex::new(session));
        let state = ControllerState::new(
            viewport,
            tuning.bias_degrees,
            tuning.gain,
            tuning.commit_threshold,
        );
        let service = TrackerService::new(state, navigator.clone());
        let source_label = source.describe();

        Self {
            service,
            navigator,
            source,
            haptics,
            notifications: NotificationManager::new(),
            viewport,
            overlay: OverlayUpdate {
                placement: OverlayPlacement::Hidden,
                effect_width: 0.0,
                overflow_width: 0.0,
                cursor_x: viewport.center(),
            },
            repeat_count: 0,
            session_bias_degrees: tuning.bias_degrees,
            last_yaw_degrees: 0.0,
            paused: false,
            source_label,
            should_quit: false,
        }
    }

    /// Wait up to `budget` for a sample and feed it to the tracker. While
    /// paused, samples are still read (so a live source does not back up)
    /// but dropped.
    pub fn pump_source(&mut self, budget: Duration) {
        match self.source.next_sample(budget) {
            Ok(Some(sample)) => {
                self.last_yaw_degrees = sample.yaw_radians.to_degrees();
                if !self.paused {
                    self.service.submit_sample(sample);
                }
            }
            Ok(None) => {}
            Err(fault) => {
                warn!("Pose source fault: {fault}");
                self.notifications.error(fault.to_string());
            }
        }
    }

    /// Apply everything the tracker worker produced since the last call.
    pub fn drain_events(&mut self) {
        for event in self.service.poll_events() {
            match event {
                TrackerEvent::Overlay(overlay) => {
                    if overlay.placement == OverlayPlacement::Hidden {
                        self.repeat_count = 0;
                    }
                    self.overlay = overlay;
                }
                TrackerEvent::Haptic(pulse) => {
                    self.haptics.pulse(pulse);
                    if pulse == HapticPulse::Reject {
                        self.notifications.warn("At document edge");
                    }
                }
                TrackerEvent::Page(command) => {
                    // The service already applied the command to the
                    // navigator; this is bookkeeping and feedback only.
                    self.repeat_count += 1;
                    let label = self.page_label();
                    match command {
                        PageCommand::Advance => self.notifications.info(format!("Page {label}")),
                        PageCommand::Retreat => self.notifications.info(format!("Back to {label}")),
                    }
                }
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('l') | KeyCode::Right => self.turn_page(PageCommand::Advance),
            KeyCode::Char('h') | KeyCode::Left => self.turn_page(PageCommand::Retreat),
            KeyCode::Char('r') => {
                self.service.reset();
                self.notifications.info("Tracking reset");
            }
            KeyCode::Char('c') => self.recenter(),
            KeyCode::Char('p') | KeyCode::Char(' ') => self.toggle_pause(),
            KeyCode::Char('t') => {
                let next = theme::current_theme_id().next();
                theme::set_theme(next);
                settings::set_theme_name(next.name());
                self.notifications.info(format!("Theme: {}", next.name()));
            }
            _ => {}
        }
    }

    /// Manual page turn from the keyboard, bypassing the engine.
    fn turn_page(&mut self, command: PageCommand) {
        let mut session = self
            .navigator
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let moved = match command {
            PageCommand::Advance if session.can_advance() => {
                session.advance();
                true
            }
            PageCommand::Retreat if session.can_retreat() => {
                session.retreat();
                true
            }
            _ => false,
        };
        let label = session.progress_label();
        drop(session);

        if moved {
            self.notifications.info(format!("Page {label}"));
        } else {
            self.notifications.warn("At document edge");
        }
    }

    /// Replace the session bias so the current head pose maps to the lane
    /// center. The configured default stays untouched on disk.
    fn recenter(&mut self) {
        self.session_bias_degrees = -self.last_yaw_degrees;
        self.service.set_bias(self.session_bias_degrees);
        info!(
            "Recentered, session bias {:+.1} degrees",
            self.session_bias_degrees
        );
        self.notifications.info(format!(
            "Recentered ({:+.1}°)",
            self.session_bias_degrees
        ));
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            // Pending pressure must not survive a pause.
            self.service.reset();
            self.notifications.info("Tracking paused");
        } else {
            self.notifications.info("Tracking resumed");
        }
    }

    pub fn page_label(&self) -> String {
        self.navigator
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .progress_label()
    }

    #[must_use]
    pub fn view(&self) -> HudView<'_> {
        let session = self
            .navigator
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let title = session.title().map(str::to_string);
        let page_label = session.progress_label();
        drop(session);

        HudView {
            source: self.source_label.clone(),
            paused: self.paused,
            title,
            page_label,
            viewport: self.viewport,
            overlay: self.overlay,
            repeat_count: self.repeat_count,
            notifications: self.notifications.all(),
        }
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn session_bias_degrees(&self) -> f64 {
        self.session_bias_degrees
    }

    #[must_use]
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    #[must_use]
    pub fn overlay(&self) -> OverlayUpdate {
        self.overlay
    }
}

/// Drive the app until quit. One iteration: draw, pump one sample (the
/// source wait doubles as the frame pacing), drain tracker events, handle
/// keys, expire notifications.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    while !app.should_quit() {
        terminal.draw(|f| hud::draw(f, &app.view()))?;

        app.pump_source(Duration::from_millis(15));
        app.drain_events();

        while events.poll(Duration::ZERO)? {
            if let Event::Key(key) = events.read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        app.notifications.update();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::{PoseScenarioBuilder, RecordingHaptics};
    use crate::tracker::HapticPulse;
    use std::time::Instant;

    // Bias 20 with gain 50 pins the pointer right at overshoot 250 for a
    // straight-ahead pose; eight frames reach the threshold.
    fn saturating_tuning() -> Tuning {
        Tuning {
            bias_degrees: 20.0,
            gain: 50.0,
            commit_threshold: 2000,
            viewport_width: 1000.0,
        }
    }

    fn centered_tuning() -> Tuning {
        Tuning {
            bias_degrees: 0.0,
            gain: 30.0,
            commit_threshold: 2000,
            viewport_width: 1000.0,
        }
    }

    fn app_with(source: PoseScenarioBuilder, session: DocumentSession, tuning: &Tuning) -> (App, RecordingHaptics) {
        let recorder = RecordingHaptics::new();
        let app = App::new(
            Box::new(source.build()),
            session,
            Box::new(recorder.clone()),
            tuning,
        );
        (app, recorder)
    }

    fn pump_dry(app: &mut App) {
        // Scripted sources answer immediately; keep pumping until dry.
        for _ in 0..64 {
            app.pump_source(Duration::ZERO);
        }
    }

    fn wait_for(app: &mut App, mut done: impl FnMut(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while !done(app) {
            assert!(Instant::now() < deadline, "condition not reached in time");
            app.drain_events();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn held_gaze_turns_a_page_through_the_whole_stack() {
        let scenario = PoseScenarioBuilder::new().center(8);
        let (mut app, haptics) =
            app_with(scenario, DocumentSession::open("manual", 10), &saturating_tuning());

        pump_dry(&mut app);
        wait_for(&mut app, |app| app.repeat_count() == 1);

        assert_eq!(app.page_label(), "2/10");
        assert_eq!(haptics.pulses(), vec![HapticPulse::Commit]);
    }

    #[test]
    fn manual_keys_page_without_the_engine() {
        let (mut app, _) = app_with(
            PoseScenarioBuilder::new(),
            DocumentSession::open("manual", 3),
            &centered_tuning(),
        );

        app.handle_key(KeyCode::Char('l'));
        assert_eq!(app.page_label(), "2/3");

        app.handle_key(KeyCode::Left);
        assert_eq!(app.page_label(), "1/3");

        app.handle_key(KeyCode::Char('h'));
        assert_eq!(app.page_label(), "1/3");
        assert_eq!(
            app.notifications.current().unwrap().message,
            "At document edge"
        );
    }

    #[test]
    fn paused_app_drops_samples() {
        let scenario = PoseScenarioBuilder::new().center(8);
        let (mut app, haptics) =
            app_with(scenario, DocumentSession::open("manual", 10), &saturating_tuning());

        app.handle_key(KeyCode::Char('p'));
        assert!(app.is_paused());

        pump_dry(&mut app);
        std::thread::sleep(Duration::from_millis(50));
        app.drain_events();

        assert_eq!(app.page_label(), "1/10");
        assert!(haptics.pulses().is_empty());
        assert_eq!(app.overlay().placement, OverlayPlacement::Hidden);
    }

    #[test]
    fn recenter_uses_the_last_observed_pose() {
        let scenario = PoseScenarioBuilder::new().hold_degrees(12.0, 1);
        let (mut app, _) = app_with(
            scenario,
            DocumentSession::open("manual", 10),
            &centered_tuning(),
        );

        pump_dry(&mut app);
        app.handle_key(KeyCode::Char('c'));

        assert!((app.session_bias_degrees() + 12.0).abs() < 1e-9);
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let (mut app, _) = app_with(
            PoseScenarioBuilder::new(),
            DocumentSession::empty(),
            &centered_tuning(),
        );
        assert!(!app.should_quit());
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit());
    }
}
