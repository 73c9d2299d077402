//! Thin wrapper around the Twitter/X v2 recent-search endpoint.
//!
//! Shapes request parameters (field selection, author expansion, page size,
//! continuation token) and delegates transport concerns to [`HttpClient`].
use crate::twitter::types::SearchResponse;
use crate::{PageRequest, SearchSource, SocialError};
use async_trait::async_trait;
use pulse_http::{Auth, HttpClient, RequestOpts};
use std::borrow::Cow;

const RECENT_SEARCH_PATH: &str = "2/tweets/search/recent";
const TWEET_FIELDS: &str = "created_at,lang,public_metrics";
const EXPANSIONS: &str = "author_id";

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    bearer: String,
}

impl TwitterApi {
    /// Wrap a preconfigured transport (base URL, timeouts, retry budget).
    pub fn with_http(http: HttpClient, bearer_token: String) -> Self {
        Self {
            http,
            bearer: bearer_token,
        }
    }

    pub async fn recent_search(
        &self,
        query: &str,
        max_results: u32,
        next_token: Option<&str>,
    ) -> Result<SearchResponse, SocialError> {
        let mut params: Vec<(&str, Cow<'_, str>)> = vec![
            ("query", query.into()),
            ("max_results", max_results.to_string().into()),
            ("tweet.fields", TWEET_FIELDS.into()),
            ("expansions", EXPANSIONS.into()),
        ];
        if let Some(token) = next_token {
            params.push(("next_token", token.into()));
        }

        let resp: SearchResponse = self
            .http
            .get_json(
                RECENT_SEARCH_PATH,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.bearer)),
                    query: Some(params),
                    ..Default::default()
                },
            )
            .await?;

        tracing::debug!(
            result_count = ?resp.meta.as_ref().and_then(|m| m.result_count),
            has_next = resp.next_token().is_some(),
            "twitter.recent_search.response"
        );
        Ok(resp)
    }
}

#[async_trait]
impl SearchSource for TwitterApi {
    async fn search_page(&self, request: PageRequest<'_>) -> Result<SearchResponse, SocialError> {
        self.recent_search(request.query, request.max_results, request.next_token)
            .await
    }
}
