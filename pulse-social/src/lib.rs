//! Social network search clients and the page collector used by Pulse.
//!
//! [`SearchSource`] is the seam between the pipeline and a remote search API.
//! [`TwitterApi`](twitter::TwitterApi) implements it against the X/Twitter v2
//! recent-search endpoint, and [`Paginator`] drives any source page by page under a
//! total result cap. Pages are turned into [`pulse_common::Record`]s by
//! [`twitter::extract::flatten_page`].
use async_trait::async_trait;
use pulse_common::PulseError;
use pulse_http::{HttpError, StatusCode};

pub mod paginator;
pub mod twitter;

pub use paginator::{Page, Paginator};
pub use twitter::types::SearchResponse;

#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    /// The remote refused the request for quota reasons.
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),
    /// Bad query, rejected auth, or any other remote failure.
    #[error("{0}")]
    Api(String),
    /// The response decoded but is missing data the pipeline requires.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<HttpError> for SocialError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::RateLimited { .. } => SocialError::RateLimited(e.to_string()),
            HttpError::Api { status, .. } if status == StatusCode::TOO_MANY_REQUESTS => {
                SocialError::RateLimited(e.to_string())
            }
            other => SocialError::Api(other.to_string()),
        }
    }
}

impl From<SocialError> for PulseError {
    fn from(e: SocialError) -> Self {
        match e {
            SocialError::RateLimited(msg) => PulseError::RateLimitExceeded(msg),
            SocialError::Api(msg) => PulseError::RemoteApi(msg),
            SocialError::Malformed(_) => PulseError::RemoteApi(e.to_string()),
        }
    }
}

/// One page request against a search source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub query: &'a str,
    pub max_results: u32,
    /// Continuation token from the previous page, `None` for the first page.
    pub next_token: Option<&'a str>,
}

/// A remote capability that answers one page of a search at a time.
#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn search_page(&self, request: PageRequest<'_>) -> Result<SearchResponse, SocialError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_rate_limits_map_to_rate_limited() {
        let e = SocialError::from(HttpError::RateLimited {
            message: "Too Many Requests".into(),
            reset_in_secs: Some(60),
        });
        assert!(matches!(e, SocialError::RateLimited(_)));
        assert!(matches!(PulseError::from(e), PulseError::RateLimitExceeded(_)));
    }

    #[test]
    fn other_http_failures_map_to_remote_api() {
        let e = SocialError::from(HttpError::Api {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized".into(),
            request_id: "-".into(),
        });
        assert!(matches!(e, SocialError::Api(_)));
        let pulse = PulseError::from(e);
        assert!(matches!(pulse, PulseError::RemoteApi(ref m) if m.contains("Unauthorized")));
    }

    #[test]
    fn malformed_responses_are_remote_api_errors() {
        let pulse = PulseError::from(SocialError::Malformed("post 1 has no author_id".into()));
        assert!(matches!(pulse, PulseError::RemoteApi(ref m) if m.contains("author_id")));
    }
}
