//! Alert fan-out: webhook push delivery and the live WebSocket hub.

pub mod hub;
pub mod push;

pub use hub::BroadcastHub;
pub use push::{format_message, LogNotifier, Notifier, NotifyError, OutboundAlert, WebhookNotifier};
