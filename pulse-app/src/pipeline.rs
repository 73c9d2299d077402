//! The batch job: fetch, flatten, clean, classify, save.
use futures::TryStreamExt;
use pulse_common::{EmptyOutputPolicy, PulseError, Record, Result, SentimentLabel};
use pulse_config::{Credentials, HttpConfig, PulseConfig};
use pulse_http::HttpClient;
use pulse_sentiment::{PolarityScorer, SentimentClassifier};
use pulse_social::twitter::TwitterApi;
use pulse_social::twitter::extract::flatten_page;
use pulse_social::{Paginator, SearchSource};
use pulse_store::{WriteOutcome, write_records};
use std::path::PathBuf;
use std::pin::pin;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub query: String,
    pub paginator: Paginator,
    pub output: PathBuf,
    pub on_empty: EmptyOutputPolicy,
}

impl RunSettings {
    pub fn from_config(cfg: &PulseConfig) -> Self {
        Self {
            query: cfg.search.query.clone(),
            paginator: Paginator::new(cfg.search.limit)
                .with_page_size(cfg.search.page_size)
                .with_pause(Duration::from_millis(cfg.search.page_pause_ms)),
            output: cfg.output.path.clone(),
            on_empty: cfg.output.on_empty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelTally {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl LabelTally {
    fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub collected: usize,
    pub labels: LabelTally,
    pub outcome: WriteOutcome,
}

/// Resolve credentials, build the Twitter client once and run the job.
///
/// Credentials are checked before anything touches the network.
pub async fn execute(cfg: &PulseConfig) -> Result<RunReport> {
    let credentials = Credentials::load(&cfg.credentials)?;
    tracing::debug!(
        api_key = credentials.api_key().is_some(),
        "credentials.loaded"
    );

    let source = twitter_source(&cfg.http, &credentials)?;
    let classifier = SentimentClassifier::lexicon();
    run(&source, &classifier, &RunSettings::from_config(cfg)).await
}

fn twitter_source(http: &HttpConfig, credentials: &Credentials) -> Result<TwitterApi> {
    let client = HttpClient::new(&http.base_url)
        .map_err(|e| PulseError::Configuration(format!("http.base_url: {e}")))?
        .with_timeout(Duration::from_secs(http.timeout_secs))
        .with_retries(http.max_retries)
        .with_max_rate_limit_wait(Duration::from_secs(http.max_rate_limit_wait_secs));
    Ok(TwitterApi::with_http(
        client,
        credentials.bearer_token().to_owned(),
    ))
}

/// Run the job against any search source.
///
/// Nothing is written unless collection succeeds end to end.
pub async fn run<S, P>(
    source: &S,
    classifier: &SentimentClassifier<P>,
    settings: &RunSettings,
) -> Result<RunReport>
where
    S: SearchSource + ?Sized,
    P: PolarityScorer,
{
    tracing::info!(
        query = %settings.query,
        limit = settings.paginator.limit(),
        "pipeline.start"
    );

    let mut records = collect(source, &settings.query, &settings.paginator).await?;

    let mut labels = LabelTally::default();
    for record in &mut records {
        labels.add(classifier.annotate(record)?);
    }

    if records.is_empty() {
        tracing::warn!(
            query = %settings.query,
            policy = ?settings.on_empty,
            "pipeline.empty"
        );
    }

    let outcome = write_records(&settings.output, &records, settings.on_empty)?;
    tracing::info!(
        collected = records.len(),
        positive = labels.positive,
        negative = labels.negative,
        neutral = labels.neutral,
        "pipeline.done"
    );
    Ok(RunReport {
        collected: records.len(),
        labels,
        outcome,
    })
}

/// Page through `source` and flatten every post, in collection order.
pub async fn collect<S>(source: &S, query: &str, paginator: &Paginator) -> Result<Vec<Record>>
where
    S: SearchSource + ?Sized,
{
    let mut records = Vec::new();
    let mut pages = pin!(paginator.pages(source, query));
    while let Some(page) = pages.try_next().await? {
        records.extend(flatten_page(&page.response)?);
        tracing::debug!(page = page.index, collected = records.len(), "pipeline.page");
    }
    Ok(records)
}
