//! Tracker service - owns the worker thread that serializes sample processing

use std::sync::{Arc, Mutex};

use flume::{Receiver, Sender};
use log::debug;

use crate::navigator::PageNavigator;

use super::engine::{Command, ControllerState, PagingAbility};
use super::events::{PageCommand, TrackerEvent};
use super::types::{OrientationSample, Viewport};

enum TrackerRequest {
    Sample(OrientationSample),
    SetViewport(Viewport),
    SetBias(f64),
    Reset,
    Shutdown,
}

/// Runs the controller on a dedicated thread and fans events out to the
/// subscriber.
///
/// The request queue has exactly one consumer: per-sample processing reads
/// and mutates the same state, so two samples must never run concurrently.
/// Page commands are applied to the navigator by the worker before the
/// event is forwarded, which means a `Page` event observed by the
/// subscriber has already happened.
pub struct TrackerService {
    request_tx: Sender<TrackerRequest>,
    event_rx: Receiver<TrackerEvent>,
}

impl TrackerService {
    #[must_use]
    pub fn new(initial: ControllerState, navigator: Arc<Mutex<dyn PageNavigator + Send>>) -> Self {
        let (request_tx, request_rx) = flume::unbounded();
        let (event_tx, event_rx) = flume::unbounded();

        std::thread::spawn(move || {
            tracker_worker(initial, &navigator, &request_rx, &event_tx);
        });

        Self {
            request_tx,
            event_rx,
        }
    }

    pub fn submit_sample(&self, sample: OrientationSample) {
        let _ = self.request_tx.send(TrackerRequest::Sample(sample));
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        let _ = self.request_tx.send(TrackerRequest::SetViewport(viewport));
    }

    pub fn set_bias(&self, bias_degrees: f64) {
        let _ = self.request_tx.send(TrackerRequest::SetBias(bias_degrees));
    }

    pub fn reset(&self) {
        let _ = self.request_tx.send(TrackerRequest::Reset);
    }

    /// Poll for events produced by the worker.
    pub fn poll_events(&self) -> Vec<TrackerEvent> {
        let mut events = vec![];
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Event receiver for blocking consumers.
    #[must_use]
    pub fn event_receiver(&self) -> &Receiver<TrackerEvent> {
        &self.event_rx
    }

    pub fn shutdown(&self) {
        let _ = self.request_tx.send(TrackerRequest::Shutdown);
    }
}

impl Drop for TrackerService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn tracker_worker(
    mut state: ControllerState,
    navigator: &Arc<Mutex<dyn PageNavigator + Send>>,
    requests: &Receiver<TrackerRequest>,
    events: &Sender<TrackerEvent>,
) {
    for request in requests {
        let cmd = match request {
            TrackerRequest::Sample(sample) => {
                let ability = {
                    let nav = navigator
                        .lock()
                        .unwrap_or_else(std::sync::PoisonError::into_inner);
                    PagingAbility {
                        can_advance: nav.can_advance(),
                        can_retreat: nav.can_retreat(),
                    }
                };
                Command::Sample { sample, ability }
            }
            TrackerRequest::SetViewport(viewport) => Command::SetViewport(viewport),
            TrackerRequest::SetBias(bias_degrees) => Command::SetBias(bias_degrees),
            TrackerRequest::Reset => Command::Reset,
            TrackerRequest::Shutdown => break,
        };

        for event in state.apply(cmd) {
            if let TrackerEvent::Page(page) = event {
                let mut nav = navigator
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                match page {
                    PageCommand::Advance => nav.advance(),
                    PageCommand::Retreat => nav.retreat(),
                }
            }
            if events.send(event).is_err() {
                debug!("Event subscriber gone, stopping tracker worker");
                return;
            }
        }
    }
}
