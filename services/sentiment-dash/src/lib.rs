// services/sentiment-dash/src/lib.rs
//
// Employee sentiment dashboard: controller, presentation and terminal UI

pub mod api;
pub mod controller;
pub mod input;
pub mod mock;
pub mod presenter;
pub mod report;
pub mod state;
pub mod ui;

#[cfg(test)]
mod testing;

pub use api::{FeedbackBackend, HttpBackend};
pub use controller::{ControllerEvent, DashboardController};
pub use mock::MockBackend;
pub use state::DashboardState;
