use std::sync::Arc;

use crate::redirector::Redirector;
use async_trait::async_trait;
use jiff::Timestamp;
use smartlink_core::{LinkEvents, LinkRecord, RedirectError, Repository, ShortCode, StorageError};
use tracing::{debug, trace};

/// Service for handling URL redirects.
///
/// Fetches records from the repository, enforces expiry and counts clicks.
/// Emits one `redirected` event per successful resolve and one `expired`
/// event per record this service actually deletes.
pub struct RedirectorService<R> {
    repository: Arc<R>,
    events: Arc<dyn LinkEvents>,
}

impl<R: Repository> RedirectorService<R> {
    /// Creates a new RedirectorService with the given repository and event sink.
    pub fn new(repository: Arc<R>, events: Arc<dyn LinkEvents>) -> Self {
        Self { repository, events }
    }

    /// Resolves a short code to its original URL.
    ///
    /// # Arguments
    ///
    /// * `code` - The short code to resolve
    /// * `now` - The time the request is evaluated at
    ///
    /// # Returns
    ///
    /// * `Ok(url)` - The original URL; the click counter was incremented
    /// * `Err(NotFound)` - The code doesn't exist (or vanished mid-request)
    /// * `Err(Expired)` - The code existed but had expired; it is now deleted
    /// * `Err(Storage(e))` - If there was an error accessing the repository
    pub async fn resolve(&self, code: &ShortCode, now: Timestamp) -> crate::Result<String> {
        Redirector::resolve(self, code, now).await
    }

    /// Returns the live record for `code`, deleting it if it has expired.
    async fn live_record(&self, code: &ShortCode, now: Timestamp) -> crate::Result<LinkRecord> {
        trace!(code = %code, "resolving short code");

        let Some(record) = self.repository.get(code).await? else {
            trace!(code = %code, "Short code not found");
            return Err(RedirectError::NotFound);
        };

        if record.is_expired_at(now) {
            // The sweeper may have removed it already; only count our own deletion.
            if self.repository.delete(code).await? {
                self.events.links_expired(1);
            }
            debug!(code = %code, "Record has expired");
            return Err(RedirectError::Expired);
        }

        Ok(record)
    }
}

#[async_trait]
impl<R: Repository> Redirector for RedirectorService<R> {
    async fn resolve(&self, code: &ShortCode, now: Timestamp) -> crate::Result<String> {
        let record = self.live_record(code, now).await?;

        match self.repository.increment_clicks(code).await {
            Ok(clicks) => {
                self.events.link_redirected();
                debug!(code = %code, url = %record.original, clicks, "Resolved short code");
                Ok(record.original)
            }
            Err(StorageError::NotFound(_)) => {
                debug!(code = %code, "Record removed while resolving");
                Err(RedirectError::NotFound)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn inspect(&self, code: &ShortCode, now: Timestamp) -> crate::Result<LinkRecord> {
        self.live_record(code, now).await
    }
}
