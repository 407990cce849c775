use async_trait::async_trait;
use jiff::Timestamp;
use smartlink_core::{
    LinkEvents, LinkRecord, Repository, ShortCode, ShortenParams, Shortener, ShortenerError,
    StorageError,
};
use smartlink_generator::Generator;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// How many generated codes to try before giving up with `Exhausted`.
    /// Values below 1 are treated as 1.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
    /// Codes that must never be handed out, e.g. names of fixed routes that
    /// share the short code namespace. A generated reserved code costs an
    /// attempt like a collision.
    #[builder(default, setter(transform = |codes: &[&str]| codes.iter().map(|c| c.to_string()).collect()))]
    pub reserved: HashSet<String>,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - URL validation
/// - Expiration policy conversion
/// - Short code generation, retrying with a fresh code on collision
///
/// The repository is the only authority on uniqueness: a code is taken when
/// `insert` succeeds, never by a separate existence check.
pub struct LinkService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    events: Arc<dyn LinkEvents>,
    settings: ShortenerSettings,
}

impl<R: Repository, G: Generator> LinkService<R, G> {
    /// Creates a new `LinkService` with default settings.
    pub fn new(repository: Arc<R>, generator: G, events: Arc<dyn LinkEvents>) -> Self {
        Self::with_settings(repository, generator, events, ShortenerSettings::default())
    }

    pub fn with_settings(
        repository: Arc<R>,
        generator: G,
        events: Arc<dyn LinkEvents>,
        settings: ShortenerSettings,
    ) -> Self {
        Self {
            repository,
            generator: Arc::new(generator),
            events,
            settings,
        }
    }

    /// Rejects empty or whitespace-only URLs. Anything else is stored as given.
    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.trim().is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Creates and stores a new link at time `now`.
    pub async fn create(
        &self,
        params: ShortenParams,
        now: Timestamp,
    ) -> Result<LinkRecord, ShortenerError> {
        Self::validate_url(&params.original_url)?;

        let expires_at = params.expiration.resolve(now);
        let attempts = self.settings.max_attempts.max(1);

        for attempt in 1..=attempts {
            let code: ShortCode = self.generator.generate().into();
            if self.settings.reserved.contains(code.as_str()) {
                debug!(code = %code, attempt, "generated a reserved short code, retrying");
                continue;
            }

            let record = LinkRecord::new(
                code,
                params.original_url.clone(),
                expires_at,
                now,
            );

            match self.repository.insert(record.clone()).await {
                Ok(()) => {
                    debug!(
                        code = %record.id,
                        expiration = params.expiration.label(),
                        "created short link"
                    );
                    self.events.link_created();
                    return Ok(record);
                }
                Err(StorageError::Conflict(code)) => {
                    debug!(code = %code, attempt, "short code collision, retrying");
                }
                Err(err) => {
                    warn!(error = %err, "failed to store short link");
                    return Err(err.into());
                }
            }
        }

        warn!(attempts, "exhausted short code attempts");
        Err(ShortenerError::Exhausted { attempts })
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for LinkService<R, G> {
    async fn shorten(
        &self,
        params: ShortenParams,
        now: Timestamp,
    ) -> Result<LinkRecord, ShortenerError> {
        self.create(params, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;
    use parking_lot::Mutex;
    use smartlink_core::ExpirationPolicy;
    use smartlink_generator::RandomGenerator;
    use smartlink_metrics::PrometheusEvents;
    use smartlink_storage::InMemoryRepository;
    use std::collections::VecDeque;

    /// Hands out a fixed sequence of codes, repeating the last one forever.
    struct ScriptedGenerator {
        codes: Mutex<VecDeque<&'static str>>,
    }

    impl ScriptedGenerator {
        fn new(codes: &[&'static str]) -> Self {
            Self {
                codes: Mutex::new(codes.iter().copied().collect()),
            }
        }
    }

    impl Generator for ScriptedGenerator {
        type Output = ShortCode;

        fn generate(&self) -> ShortCode {
            let mut codes = self.codes.lock();
            let code = if codes.len() > 1 {
                codes.pop_front().unwrap()
            } else {
                codes[0]
            };
            ShortCode::new_unchecked(code)
        }
    }

    /// A repository whose every operation fails as unavailable.
    struct DownRepository;

    #[async_trait]
    impl Repository for DownRepository {
        async fn insert(&self, _record: LinkRecord) -> smartlink_core::repository::Result<()> {
            Err(StorageError::Unavailable("down".into()))
        }

        async fn get(
            &self,
            _code: &ShortCode,
        ) -> smartlink_core::repository::Result<Option<LinkRecord>> {
            Err(StorageError::Unavailable("down".into()))
        }

        async fn increment_clicks(
            &self,
            _code: &ShortCode,
        ) -> smartlink_core::repository::Result<u64> {
            Err(StorageError::Unavailable("down".into()))
        }

        async fn delete(&self, _code: &ShortCode) -> smartlink_core::repository::Result<bool> {
            Err(StorageError::Unavailable("down".into()))
        }

        async fn delete_expired(&self, _now: Timestamp) -> smartlink_core::repository::Result<u64> {
            Err(StorageError::Unavailable("down".into()))
        }
    }

    fn params(url: &str, expiration: ExpirationPolicy) -> ShortenParams {
        ShortenParams {
            original_url: url.to_string(),
            expiration,
        }
    }

    fn now() -> Timestamp {
        Timestamp::from_second(1_700_000_000).unwrap()
    }

    #[tokio::test]
    async fn create_stores_fresh_record() {
        let repo = Arc::new(InMemoryRepository::new());
        let events = Arc::new(PrometheusEvents::new().unwrap());
        let service = LinkService::new(repo.clone(), RandomGenerator::new(), events.clone());

        let record = service
            .create(params("https://example.com", ExpirationPolicy::Never), now())
            .await
            .unwrap();

        assert_eq!(record.id.as_str().len(), 6);
        assert_eq!(record.original, "https://example.com");
        assert_eq!(record.clicks, 0);
        assert_eq!(record.expires_at, None);
        assert_eq!(record.created_at, now());

        let stored = repo.get(&record.id).await.unwrap().unwrap();
        assert_eq!(stored, record);
        assert_eq!(events.snapshot().created, 1);
    }

    #[tokio::test]
    async fn create_applies_expiration_policy() {
        let service = LinkService::new(
            Arc::new(InMemoryRepository::new()),
            RandomGenerator::new(),
            Arc::new(PrometheusEvents::new().unwrap()),
        );

        let day = service
            .create(params("https://example.com", ExpirationPolicy::OneDay), now())
            .await
            .unwrap();
        assert_eq!(day.expires_at, Some(now() + SignedDuration::from_hours(24)));

        let week = service
            .create(params("https://example.com", ExpirationPolicy::OneWeek), now())
            .await
            .unwrap();
        assert_eq!(week.expires_at, Some(now() + SignedDuration::from_hours(168)));
    }

    #[tokio::test]
    async fn create_with_empty_url_fails() {
        let events = Arc::new(PrometheusEvents::new().unwrap());
        let service = LinkService::new(
            Arc::new(InMemoryRepository::new()),
            RandomGenerator::new(),
            events.clone(),
        );

        for url in ["", "   "] {
            let err = service
                .create(params(url, ExpirationPolicy::Never), now())
                .await
                .unwrap_err();
            assert!(matches!(err, ShortenerError::InvalidUrl(_)));
        }
        assert_eq!(events.snapshot().created, 0);
    }

    #[tokio::test]
    async fn create_retries_on_collision() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.insert(LinkRecord::new(
            ShortCode::new_unchecked("taken1"),
            "https://first.com",
            None,
            now(),
        ))
        .await
        .unwrap();

        let service = LinkService::new(
            repo.clone(),
            ScriptedGenerator::new(&["taken1", "taken1", "free01"]),
            Arc::new(PrometheusEvents::new().unwrap()),
        );

        let record = service
            .create(params("https://second.com", ExpirationPolicy::Never), now())
            .await
            .unwrap();

        assert_eq!(record.id.as_str(), "free01");
        let first = repo.get(&ShortCode::new_unchecked("taken1")).await.unwrap().unwrap();
        assert_eq!(first.original, "https://first.com");
    }

    #[tokio::test]
    async fn create_gives_up_after_max_attempts() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.insert(LinkRecord::new(
            ShortCode::new_unchecked("taken1"),
            "https://first.com",
            None,
            now(),
        ))
        .await
        .unwrap();

        let events = Arc::new(PrometheusEvents::new().unwrap());
        let service = LinkService::new(
            repo.clone(),
            ScriptedGenerator::new(&["taken1"]),
            events.clone(),
        );

        let err = service
            .create(params("https://second.com", ExpirationPolicy::Never), now())
            .await
            .unwrap_err();

        assert_eq!(err, ShortenerError::Exhausted { attempts: 5 });
        assert_eq!(repo.len(), 1);
        assert_eq!(events.snapshot().created, 0);
    }

    #[tokio::test]
    async fn create_honours_configured_attempts() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.insert(LinkRecord::new(
            ShortCode::new_unchecked("taken1"),
            "https://first.com",
            None,
            now(),
        ))
        .await
        .unwrap();

        let service = LinkService::with_settings(
            repo,
            ScriptedGenerator::new(&["taken1", "free01"]),
            Arc::new(PrometheusEvents::new().unwrap()),
            ShortenerSettings::builder().max_attempts(1).build(),
        );

        let err = service
            .create(params("https://second.com", ExpirationPolicy::Never), now())
            .await
            .unwrap_err();
        assert_eq!(err, ShortenerError::Exhausted { attempts: 1 });
    }

    #[tokio::test]
    async fn create_skips_reserved_codes() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = LinkService::with_settings(
            repo.clone(),
            ScriptedGenerator::new(&["health", "free01"]),
            Arc::new(PrometheusEvents::new().unwrap()),
            ShortenerSettings::builder()
                .reserved(&["health", "metrics", "shorten"])
                .build(),
        );

        let record = service
            .create(params("https://example.com", ExpirationPolicy::Never), now())
            .await
            .unwrap();

        assert_eq!(record.id.as_str(), "free01");
        assert!(repo
            .get(&ShortCode::new_unchecked("health"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn only_reserved_codes_exhaust_attempts() {
        let service = LinkService::with_settings(
            Arc::new(InMemoryRepository::new()),
            ScriptedGenerator::new(&["health"]),
            Arc::new(PrometheusEvents::new().unwrap()),
            ShortenerSettings::builder().reserved(&["health"]).build(),
        );

        let err = service
            .create(params("https://example.com", ExpirationPolicy::Never), now())
            .await
            .unwrap_err();
        assert_eq!(err, ShortenerError::Exhausted { attempts: 5 });
    }

    #[tokio::test]
    async fn storage_errors_propagate_without_retry() {
        let service = LinkService::new(
            Arc::new(DownRepository),
            RandomGenerator::new(),
            Arc::new(PrometheusEvents::new().unwrap()),
        );

        let err = service
            .create(params("https://example.com", ExpirationPolicy::Never), now())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ShortenerError::Storage(StorageError::Unavailable("down".into()))
        );
    }

    #[tokio::test]
    async fn shorten_delegates_to_create() {
        let service: Arc<dyn Shortener> = Arc::new(LinkService::new(
            Arc::new(InMemoryRepository::new()),
            RandomGenerator::new(),
            Arc::new(PrometheusEvents::new().unwrap()),
        ));

        let record = service
            .shorten(params("https://example.com", ExpirationPolicy::Never), now())
            .await
            .unwrap();
        assert_eq!(record.original, "https://example.com");
    }
}
