//! HTTP/WebSocket gateway and the fetch-analyze-alert poller.

pub mod api;
pub mod poller;
pub mod ws;

pub use api::{build_app, AppState};
pub use poller::Poller;
