//! Background eviction of expired short links.
//!
//! The [`ExpirySweeper`] periodically deletes every record whose expiry has
//! passed. It complements the lazy expiry check done by the redirector: both
//! paths go through the repository's idempotent deletes, so either may win
//! the race for a given record.

mod sweeper;

pub use sweeper::{ExpirySweeper, SweeperSettings, DEFAULT_SWEEP_INTERVAL};
