use crate::Result;
use async_trait::async_trait;
use jiff::Timestamp;
use smartlink_core::{LinkRecord, ShortCode};

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to its destination URL at time `now`, counting
    /// one click. Fails with `NotFound` or `Expired` when there is no live
    /// target.
    ///
    /// A successful call is not idempotent; callers must not retry it.
    async fn resolve(&self, code: &ShortCode, now: Timestamp) -> Result<String>;

    /// Returns the live record for a short code without counting a click.
    /// Expiry is enforced exactly as in [`Redirector::resolve`].
    async fn inspect(&self, code: &ShortCode, now: Timestamp) -> Result<LinkRecord>;
}
