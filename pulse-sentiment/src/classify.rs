use crate::lexicon::LexiconScorer;
use crate::normalize::clean;
use crate::scorer::PolarityScorer;
use pulse_common::{Record, SentimentLabel};

/// Strict threshold at zero: `> 0` positive, `< 0` negative, anything else neutral.
pub fn label_for(score: f64) -> SentimentLabel {
    if score > 0.0 {
        SentimentLabel::Positive
    } else if score < 0.0 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Maps normalized text to a three-way label through a [`PolarityScorer`].
#[derive(Debug, Clone)]
pub struct SentimentClassifier<P = LexiconScorer> {
    scorer: P,
}

impl SentimentClassifier<LexiconScorer> {
    /// Classifier backed by the bundled lexicon.
    pub fn lexicon() -> Self {
        Self::new(LexiconScorer::default())
    }
}

impl Default for SentimentClassifier<LexiconScorer> {
    fn default() -> Self {
        Self::lexicon()
    }
}

impl<P: PolarityScorer> SentimentClassifier<P> {
    pub fn new(scorer: P) -> Self {
        Self { scorer }
    }

    /// Scorer output clamped to `[-1, 1]`, NaN read as `0`.
    pub fn score(&self, clean_text: &str) -> f64 {
        let raw = self.scorer.score(clean_text);
        if raw.is_nan() {
            tracing::debug!(text_len = clean_text.len(), "sentiment.score.nan");
            return 0.0;
        }
        raw.clamp(-1.0, 1.0)
    }

    pub fn classify(&self, clean_text: &str) -> SentimentLabel {
        label_for(self.score(clean_text))
    }

    /// Fill a freshly flattened record's derived fields: `clean_text`, then
    /// `sentiment_label`.
    pub fn annotate(&self, record: &mut Record) -> pulse_common::Result<SentimentLabel> {
        let text = clean(&record.raw_text);
        let label = self.classify(&text);
        record.set_clean_text(text)?;
        record.set_sentiment(label)?;
        tracing::trace!(id = %record.id, label = %label, "sentiment.annotate");
        Ok(label)
    }
}
