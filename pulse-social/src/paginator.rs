//! Page-by-page collection under a total result cap.
use crate::twitter::types::SearchResponse;
use crate::{PageRequest, SearchSource, SocialError};
use futures::Stream;
use std::time::Duration;

/// Smallest page the recent-search endpoint accepts.
pub const MIN_PAGE_SIZE: u32 = 10;
/// Largest page the recent-search endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A page as returned by the source, truncated so the running total never
/// exceeds the paginator's limit.
#[derive(Debug, Clone)]
pub struct Page {
    pub index: usize,
    pub response: SearchResponse,
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    limit: usize,
    page_size: u32,
    pause: Duration,
}

impl Paginator {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            page_size: MAX_PAGE_SIZE,
            pause: Duration::ZERO,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        self
    }

    /// Delay between consecutive requests. Never applied before the first
    /// request or after the last.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Requests pages until `limit` posts are collected or the source reports
    /// no continuation token. The first error ends the stream.
    pub fn pages<'a, S>(
        &'a self,
        source: &'a S,
        query: &'a str,
    ) -> impl Stream<Item = Result<Page, SocialError>> + 'a
    where
        S: SearchSource + ?Sized,
    {
        let Paginator {
            limit,
            page_size,
            pause,
        } = *self;

        async_stream::try_stream! {
            let mut collected = 0usize;
            let mut index = 0usize;
            let mut next_token: Option<String> = None;

            while collected < limit {
                if index > 0 && !pause.is_zero() {
                    tracing::debug!(pause_ms = pause.as_millis() as u64, "search.page.pause");
                    tokio::time::sleep(pause).await;
                }

                let remaining = limit - collected;
                let max_results = request_size(page_size, remaining);
                let request = PageRequest {
                    query,
                    max_results,
                    next_token: next_token.as_deref(),
                };
                let mut response = source.search_page(request).await?;
                check_problems(&response)?;

                if let Some(data) = response.data.as_mut() {
                    data.truncate(remaining);
                }
                let got = response.tweets().len();
                collected += got;
                next_token = response.next_token().map(str::to_owned);

                tracing::info!(
                    page = index,
                    requested = max_results,
                    got,
                    collected,
                    limit,
                    has_next = next_token.is_some(),
                    "search.page"
                );

                yield Page { index, response };
                index += 1;

                if next_token.is_none() {
                    break;
                }
            }
        }
    }
}

/// `min(page_size, remaining)`, raised to the endpoint minimum.
fn request_size(page_size: u32, remaining: usize) -> u32 {
    let remaining = u32::try_from(remaining).unwrap_or(u32::MAX);
    page_size.min(remaining).max(MIN_PAGE_SIZE)
}

/// A page that carries `errors` but no posts is a failure, unless the source
/// also reports zero results, which is just an empty search.
fn check_problems(response: &SearchResponse) -> Result<(), SocialError> {
    let Some(problems) = response.errors.as_deref().filter(|p| !p.is_empty()) else {
        return Ok(());
    };
    if !response.tweets().is_empty() {
        tracing::warn!(
            count = problems.len(),
            first = %problems[0].summary(),
            "search.page.partial_errors"
        );
        return Ok(());
    }
    let result_count = response.meta.as_ref().and_then(|m| m.result_count);
    if result_count == Some(0) {
        return Ok(());
    }
    let joined = problems
        .iter()
        .map(|p| p.summary())
        .collect::<Vec<_>>()
        .join("; ");
    Err(SocialError::Api(joined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitter::types::{ApiProblem, Meta, Tweet};
    use async_trait::async_trait;
    use futures::TryStreamExt;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct FakeSource {
        pages: Mutex<VecDeque<Result<SearchResponse, SocialError>>>,
        seen: Mutex<Vec<(u32, Option<String>)>>,
    }

    impl FakeSource {
        fn new(pages: Vec<Result<SearchResponse, SocialError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(u32, Option<String>)> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchSource for FakeSource {
        async fn search_page(
            &self,
            request: PageRequest<'_>,
        ) -> Result<SearchResponse, SocialError> {
            self.seen
                .lock()
                .unwrap()
                .push((request.max_results, request.next_token.map(str::to_owned)));
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(SearchResponse::default()))
        }
    }

    fn page(ids: std::ops::Range<usize>, next: Option<&str>) -> SearchResponse {
        let tweets = ids
            .map(|i| Tweet {
                id: i.to_string(),
                text: format!("post {i}"),
                author_id: Some("1".into()),
                lang: Some("en".into()),
                created_at: Some("2025-09-01T12:00:00Z".into()),
                public_metrics: None,
            })
            .collect::<Vec<_>>();
        SearchResponse {
            meta: Some(Meta {
                result_count: Some(tweets.len() as u64),
                next_token: next.map(str::to_owned),
                ..Default::default()
            }),
            data: Some(tweets),
            ..Default::default()
        }
    }

    async fn run(p: &Paginator, src: &FakeSource) -> Result<Vec<Page>, SocialError> {
        p.pages(src, "puma").try_collect().await
    }

    #[tokio::test]
    async fn follows_tokens_until_exhausted() {
        let src = FakeSource::new(vec![
            Ok(page(0..100, Some("t1"))),
            Ok(page(100..150, None)),
        ]);
        let pages = run(&Paginator::new(5000), &src).await.unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].index, 1);
        assert_eq!(
            src.requests(),
            vec![(100, None), (100, Some("t1".to_string()))]
        );
    }

    #[tokio::test]
    async fn stops_at_limit_and_truncates_last_page() {
        let src = FakeSource::new(vec![
            Ok(page(0..100, Some("t1"))),
            Ok(page(100..200, Some("t2"))),
            Ok(page(200..300, Some("t3"))),
        ]);
        let pages = run(&Paginator::new(150), &src).await.unwrap();
        let total: usize = pages.iter().map(|p| p.response.tweets().len()).sum();
        assert_eq!(total, 150);
        // Second request asks only for what is still missing.
        assert_eq!(src.requests(), vec![(100, None), (50, Some("t1".into()))]);
    }

    #[tokio::test]
    async fn small_remainders_respect_endpoint_minimum() {
        let src = FakeSource::new(vec![Ok(page(0..10, Some("t1")))]);
        let pages = run(&Paginator::new(3).with_page_size(50), &src)
            .await
            .unwrap();
        assert_eq!(pages[0].response.tweets().len(), 3);
        assert_eq!(src.requests(), vec![(10, None)]);
    }

    #[tokio::test]
    async fn zero_result_search_yields_one_empty_page() {
        let src = FakeSource::new(vec![Ok(page(0..0, None))]);
        let pages = run(&Paginator::new(100), &src).await.unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].response.tweets().is_empty());
    }

    #[tokio::test]
    async fn first_error_ends_the_stream() {
        let src = FakeSource::new(vec![
            Ok(page(0..100, Some("t1"))),
            Err(SocialError::RateLimited("429".into())),
            Ok(page(100..200, None)),
        ]);
        let err = run(&Paginator::new(5000), &src).await.unwrap_err();
        assert!(matches!(err, SocialError::RateLimited(_)));
        assert_eq!(src.requests().len(), 2);
    }

    #[tokio::test]
    async fn error_only_pages_fail_unless_empty() {
        let problems = vec![ApiProblem {
            detail: Some("Invalid query".into()),
            ..Default::default()
        }];
        let failing = SearchResponse {
            errors: Some(problems.clone()),
            ..Default::default()
        };
        let src = FakeSource::new(vec![Ok(failing)]);
        let err = run(&Paginator::new(10), &src).await.unwrap_err();
        assert!(matches!(err, SocialError::Api(ref m) if m == "Invalid query"));

        let empty = SearchResponse {
            errors: Some(problems),
            meta: Some(Meta {
                result_count: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let src = FakeSource::new(vec![Ok(empty)]);
        assert_eq!(run(&Paginator::new(10), &src).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn pauses_only_between_requests() {
        let pause = Duration::from_millis(30);
        let src = FakeSource::new(vec![Ok(page(0..10, Some("t1"))), Ok(page(10..20, None))]);
        let started = std::time::Instant::now();
        run(&Paginator::new(100).with_pause(pause), &src)
            .await
            .unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= pause);
        assert!(elapsed < pause * 2 + Duration::from_millis(500));

        let single = FakeSource::new(vec![Ok(page(0..10, None))]);
        let started = std::time::Instant::now();
        run(&Paginator::new(100).with_pause(Duration::from_secs(5)), &single)
            .await
            .unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn request_size_is_bounded() {
        assert_eq!(request_size(100, 5000), 100);
        assert_eq!(request_size(100, 42), 42);
        assert_eq!(request_size(100, 1), 10);
        assert_eq!(request_size(25, 5000), 25);
    }
}
