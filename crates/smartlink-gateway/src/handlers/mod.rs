mod health;
mod link;
mod metrics;

pub use health::health_handler;
pub use link::{create_link_handler, get_link_handler, qr_handler, redirect_handler};
pub use metrics::metrics_handler;
