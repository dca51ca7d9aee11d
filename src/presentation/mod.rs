//! Text rendering of dashboard state.

pub mod views;

pub use views::{DashboardTemplate, StatsTemplate, ToastTemplate};
