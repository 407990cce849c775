use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use smartlink_core::{ExpirationPolicy, LinkRecord, ShortenParams};

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    #[serde(default)]
    pub url: String,
    /// One of `none`, `24h` or `7d`. Anything else never expires.
    #[serde(default)]
    pub expiry: ExpirationPolicy,
}

impl From<CreateLinkRequest> for ShortenParams {
    fn from(request: CreateLinkRequest) -> Self {
        ShortenParams {
            original_url: request.url,
            expiration: request.expiry,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: String,
    pub short_url: String,
    pub original: String,
    pub clicks: u64,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl LinkResponse {
    pub fn from_record(record: LinkRecord, base_url: &str) -> Self {
        LinkResponse {
            short_url: record.id.to_url(base_url),
            id: record.id.to_string(),
            original: record.original,
            clicks: record.clicks,
            expires_at: record.expires_at,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartlink_core::ShortCode;

    #[test]
    fn request_defaults_to_never_expiring() {
        let request: CreateLinkRequest =
            serde_json::from_str(r#"{"url":"https://example.com"}"#).unwrap();
        assert_eq!(request.expiry, ExpirationPolicy::Never);

        let request: CreateLinkRequest =
            serde_json::from_str(r#"{"url":"https://example.com","expiry":"7d"}"#).unwrap();
        assert_eq!(request.expiry, ExpirationPolicy::OneWeek);

        let params = ShortenParams::from(request);
        assert_eq!(params.original_url, "https://example.com");
    }

    #[test]
    fn response_builds_short_url_from_base() {
        let created_at = Timestamp::from_second(1_700_000_000).unwrap();
        let record = LinkRecord::new(
            ShortCode::new_unchecked("abc123"),
            "https://example.com",
            None,
            created_at,
        );

        let response = LinkResponse::from_record(record, "https://smart.link/");
        assert_eq!(response.id, "abc123");
        assert_eq!(response.short_url, "https://smart.link/abc123");
        assert_eq!(response.clicks, 0);
        assert_eq!(response.expires_at, None);
    }
}
