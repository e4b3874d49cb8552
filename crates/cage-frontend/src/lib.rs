//! Transform Cage Frontend
//!
//! egui-based host application for the transform cage overlay.

pub mod app;
pub mod paint;
pub mod stage;
pub mod state;

// Re-exports for convenience
pub use app::CageApp;
pub use state::{AppAction, AppState, SharedAppState};
