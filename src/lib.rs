// Export modules for use in tests
pub mod app;
pub mod event_source;
pub mod haptics;
pub mod hud;
pub mod navigator;
pub mod notification;
pub mod panic_handler;
pub mod pose_source;
pub mod settings;
pub mod theme;
pub mod tracker;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export the application entry points
pub use app::{App, Tuning, run_app};
