//! HTTP gateway for the SmartLink shortener.
//!
//! Maps HTTP requests onto the [`Shortener`](smartlink_core::Shortener) and
//! [`Redirector`](smartlink_redirector::Redirector) services and exposes the
//! link event counters in Prometheus text format. Short links can also be
//! fetched as SVG QR codes.

pub mod app;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod qr;
pub mod state;

pub use app::{App, RESERVED_PATHS};
pub use state::AppState;
