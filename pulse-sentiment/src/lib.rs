//! Text normalization and three-way sentiment labelling.
//!
//! [`clean`] strips URLs, mentions, hashtags and anything outside `[a-z ]` from a
//! post. A [`SentimentClassifier`] turns the cleaned text into a
//! [`SentimentLabel`](pulse_common::SentimentLabel) by thresholding the polarity
//! score of a [`PolarityScorer`] at zero.
//!
//! ```
//! use pulse_common::SentimentLabel;
//! use pulse_sentiment::{SentimentClassifier, clean};
//!
//! let text = clean("Love my new PUMA! #ad http://x.co");
//! assert_eq!(text, "love my new puma");
//! assert_eq!(SentimentClassifier::lexicon().classify(&text), SentimentLabel::Positive);
//! ```
pub mod classify;
pub mod lexicon;
pub mod normalize;
pub mod scorer;

pub use classify::{SentimentClassifier, label_for};
pub use lexicon::LexiconScorer;
pub use normalize::clean;
pub use scorer::PolarityScorer;
