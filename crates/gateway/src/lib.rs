//! HTTP surface for the logging-control service.

pub mod log_routes;
pub mod server;

pub use server::{AppState, build_app};
