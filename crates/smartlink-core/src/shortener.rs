use crate::repository::LinkRecord;
use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// Expiration policy for a shortened URL.
///
/// Parsed from the labels `none`, `24h` and `7d`. Any other label falls back
/// to [`ExpirationPolicy::Never`], so unknown input produces a permanent link
/// rather than an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum ExpirationPolicy {
    /// The shortened URL never expires.
    #[default]
    Never,
    /// The shortened URL expires 24 hours after creation.
    OneDay,
    /// The shortened URL expires 7 days after creation.
    OneWeek,
}

impl ExpirationPolicy {
    /// Parses an expiry label, falling back to `Never` for unrecognized input.
    pub fn from_label(label: &str) -> Self {
        match label {
            "24h" => Self::OneDay,
            "7d" => Self::OneWeek,
            _ => Self::Never,
        }
    }

    /// Returns the canonical label for this policy.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Never => "none",
            Self::OneDay => "24h",
            Self::OneWeek => "7d",
        }
    }

    /// Converts the policy into an absolute expiry timestamp relative to `now`.
    pub fn resolve(&self, now: Timestamp) -> Option<Timestamp> {
        match self {
            Self::Never => None,
            Self::OneDay => Some(now + SignedDuration::from_hours(24)),
            Self::OneWeek => Some(now + SignedDuration::from_hours(7 * 24)),
        }
    }
}

impl From<String> for ExpirationPolicy {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<ExpirationPolicy> for &'static str {
    fn from(value: ExpirationPolicy) -> Self {
        value.label()
    }
}

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenParams {
    /// The original URL to be shortened.
    pub original_url: String,
    /// The expiration policy for the shortened URL.
    #[serde(default)]
    pub expiration: ExpirationPolicy,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a shortened URL at time `now` and returns the stored record.
    async fn shorten(&self, params: ShortenParams, now: Timestamp) -> Result<LinkRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels() {
        assert_eq!(ExpirationPolicy::from_label("none"), ExpirationPolicy::Never);
        assert_eq!(ExpirationPolicy::from_label("24h"), ExpirationPolicy::OneDay);
        assert_eq!(ExpirationPolicy::from_label("7d"), ExpirationPolicy::OneWeek);
    }

    #[test]
    fn unknown_label_is_permanent() {
        assert_eq!(ExpirationPolicy::from_label("30d"), ExpirationPolicy::Never);
        assert_eq!(ExpirationPolicy::from_label(""), ExpirationPolicy::Never);
        assert_eq!(ExpirationPolicy::from_label("24H"), ExpirationPolicy::Never);
    }

    #[test]
    fn resolve_is_relative_to_now() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();

        assert_eq!(ExpirationPolicy::Never.resolve(now), None);
        assert_eq!(
            ExpirationPolicy::OneDay.resolve(now),
            Some(Timestamp::from_second(1_700_000_000 + 86_400).unwrap())
        );
        assert_eq!(
            ExpirationPolicy::OneWeek.resolve(now),
            Some(Timestamp::from_second(1_700_000_000 + 7 * 86_400).unwrap())
        );
    }

    #[test]
    fn deserializes_leniently() {
        let params: ShortenParams =
            serde_json::from_str(r#"{"original_url":"https://a.b","expiration":"forever"}"#)
                .unwrap();
        assert_eq!(params.expiration, ExpirationPolicy::Never);

        let params: ShortenParams =
            serde_json::from_str(r#"{"original_url":"https://a.b"}"#).unwrap();
        assert_eq!(params.expiration, ExpirationPolicy::Never);

        let params: ShortenParams =
            serde_json::from_str(r#"{"original_url":"https://a.b","expiration":"7d"}"#).unwrap();
        assert_eq!(params.expiration, ExpirationPolicy::OneWeek);
    }
}
