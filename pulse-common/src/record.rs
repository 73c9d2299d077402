//! The collected-post record and its derived sentiment label.

use crate::{PulseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Three-way sentiment label derived from a polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public engagement counters; any counter the source omits is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounts {
    pub retweet_count: u64,
    pub like_count: u64,
    pub reply_count: u64,
}

/// One collected post.
///
/// The identity fields are fixed at construction. `clean_text` and
/// `sentiment_label` start empty and can each be set exactly once, in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub raw_text: String,
    pub created_at: OffsetDateTime,
    pub author_id: String,
    pub language: Option<String>,
    pub engagement: EngagementCounts,
    pub clean_text: Option<String>,
    pub sentiment_label: Option<SentimentLabel>,
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        raw_text: impl Into<String>,
        created_at: OffsetDateTime,
        author_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            raw_text: raw_text.into(),
            created_at,
            author_id: author_id.into(),
            language: None,
            engagement: EngagementCounts::default(),
            clean_text: None,
            sentiment_label: None,
        }
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_engagement(mut self, engagement: EngagementCounts) -> Self {
        self.engagement = engagement;
        self
    }

    pub fn set_clean_text(&mut self, clean: String) -> Result<()> {
        if self.clean_text.is_some() {
            return Err(PulseError::Unexpected(anyhow::anyhow!(
                "record {}: clean_text already set",
                self.id
            )));
        }
        self.clean_text = Some(clean);
        Ok(())
    }

    pub fn set_sentiment(&mut self, label: SentimentLabel) -> Result<()> {
        if self.clean_text.is_none() {
            return Err(PulseError::Unexpected(anyhow::anyhow!(
                "record {}: sentiment requested before normalization",
                self.id
            )));
        }
        if self.sentiment_label.is_some() {
            return Err(PulseError::Unexpected(anyhow::anyhow!(
                "record {}: sentiment_label already set",
                self.id
            )));
        }
        self.sentiment_label = Some(label);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> Record {
        Record::new("7", "hello", datetime!(2025-01-02 03:04:05 UTC), "99")
    }

    #[test]
    fn derived_fields_start_absent() {
        let r = sample();
        assert!(r.clean_text.is_none());
        assert!(r.sentiment_label.is_none());
        assert_eq!(r.engagement, EngagementCounts::default());
    }

    #[test]
    fn sentiment_requires_clean_text_first() {
        let mut r = sample();
        assert!(r.set_sentiment(SentimentLabel::Neutral).is_err());
        r.set_clean_text("hello".into()).unwrap();
        r.set_sentiment(SentimentLabel::Neutral).unwrap();
        assert_eq!(r.sentiment_label, Some(SentimentLabel::Neutral));
    }

    #[test]
    fn derived_fields_are_set_once() {
        let mut r = sample();
        r.set_clean_text("hello".into()).unwrap();
        assert!(r.set_clean_text("again".into()).is_err());
        r.set_sentiment(SentimentLabel::Positive).unwrap();
        assert!(r.set_sentiment(SentimentLabel::Negative).is_err());
        assert_eq!(r.clean_text.as_deref(), Some("hello"));
        assert_eq!(r.sentiment_label, Some(SentimentLabel::Positive));
    }

    #[test]
    fn labels_serialize_by_name() {
        let json = serde_json::to_string(&SentimentLabel::Negative).unwrap();
        assert_eq!(json, "\"Negative\"");
        assert_eq!(SentimentLabel::Positive.to_string(), "Positive");
    }
}
