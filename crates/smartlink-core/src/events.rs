/// Sink for link lifecycle events.
///
/// The core calls these hooks synchronously and does not wait for any
/// acknowledgement. Implementations are expected to be cheap (e.g. bumping a
/// counter) and must be safe to call from many tasks at once.
pub trait LinkEvents: Send + Sync + 'static {
    /// A new link was stored.
    fn link_created(&self);

    /// A link was resolved and its click counter incremented.
    fn link_redirected(&self);

    /// `count` expired links were deleted.
    fn links_expired(&self, count: u64);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEvents;

impl LinkEvents for NoopEvents {
    fn link_created(&self) {}

    fn link_redirected(&self) {}

    fn links_expired(&self, _count: u64) {}
}
