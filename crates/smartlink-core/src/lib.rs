//! Core types and traits for the SmartLink URL shortener.
//!
//! This crate provides the link record, short code and expiry types shared by
//! the shortener, redirector and sweeper, together with the storage, clock and
//! event-sink seams they are built on.

pub mod clock;
pub mod error;
pub mod events;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, RedirectError, ShortenerError, StorageError};
pub use events::{LinkEvents, NoopEvents};
pub use repository::{LinkRecord, Repository};
pub use shortcode::ShortCode;
pub use shortener::{ExpirationPolicy, ShortenParams, Shortener};
