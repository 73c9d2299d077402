//! Flatten Twitter search pages into fixed-shape [`Record`]s.
use crate::SocialError;
use crate::twitter::types::{SearchResponse, Tweet};
use pulse_common::{EngagementCounts, Record};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Convert every post on a page, preserving source order.
pub fn flatten_page(page: &SearchResponse) -> Result<Vec<Record>, SocialError> {
    page.tweets().iter().map(flatten_tweet).collect()
}

/// `author_id` and `created_at` are required; language and counters default.
pub fn flatten_tweet(tweet: &Tweet) -> Result<Record, SocialError> {
    let author_id = tweet
        .author_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SocialError::Malformed(format!("post {} has no author_id", tweet.id)))?;

    let raw_created = tweet
        .created_at
        .as_deref()
        .ok_or_else(|| SocialError::Malformed(format!("post {} has no created_at", tweet.id)))?;
    let created_at = OffsetDateTime::parse(raw_created, &Rfc3339).map_err(|e| {
        SocialError::Malformed(format!(
            "post {} has unparsable created_at {raw_created:?}: {e}",
            tweet.id
        ))
    })?;

    let engagement = tweet
        .public_metrics
        .as_ref()
        .map(|m| EngagementCounts {
            retweet_count: m.retweet_count.unwrap_or(0),
            like_count: m.like_count.unwrap_or(0),
            reply_count: m.reply_count.unwrap_or(0),
        })
        .unwrap_or_default();

    Ok(
        Record::new(tweet.id.clone(), tweet.text.clone(), created_at, author_id)
            .with_language(tweet.lang.clone().filter(|l| !l.is_empty()))
            .with_engagement(engagement),
    )
}
