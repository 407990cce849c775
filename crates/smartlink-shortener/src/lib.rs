//! Link creation service.
//!
//! This crate composes a code [`Generator`](smartlink_generator::Generator),
//! the [`ExpirationPolicy`](smartlink_core::ExpirationPolicy) and a
//! [`Repository`](smartlink_core::Repository) into the [`LinkService`], which
//! implements [`Shortener`](smartlink_core::Shortener). Core types are
//! re-exported from `smartlink_core`.

pub mod service;

pub use service::{LinkService, ShortenerSettings, DEFAULT_MAX_ATTEMPTS};
pub use smartlink_core::{ShortenParams, Shortener, ShortenerError};
