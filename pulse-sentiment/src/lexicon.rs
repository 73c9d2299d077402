//! Bundled word-polarity lexicon scorer.
use crate::scorer::PolarityScorer;
use std::collections::HashMap;

/// Weight applied to a sentiment word directly preceded (within
/// [`MODIFIER_REACH`] tokens) by a negator. Inverts and dampens.
const NEGATION_FACTOR: f64 = -0.5;
/// How many tokens a negator or intensifier reaches forward.
const MODIFIER_REACH: usize = 3;

const NEGATORS: &[&str] = &[
    "not", "no", "never", "nor", "none", "nothing", "neither", "nobody", "without", "dont",
    "doesnt", "didnt", "isnt", "arent", "wasnt", "werent", "cant", "cannot", "couldnt",
    "wont", "wouldnt", "shouldnt", "aint", "hardly",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("really", 1.5),
    ("so", 1.3),
    ("super", 1.5),
    ("extremely", 1.8),
    ("totally", 1.4),
    ("absolutely", 1.6),
    ("incredibly", 1.7),
    ("too", 1.2),
    ("quite", 1.2),
    ("pretty", 1.1),
    ("slightly", 0.6),
    ("somewhat", 0.7),
    ("barely", 0.5),
];

const WORDS: &[(&str, f64)] = &[
    // positive
    ("love", 0.8),
    ("loved", 0.8),
    ("loving", 0.7),
    ("loves", 0.8),
    ("like", 0.4),
    ("liked", 0.4),
    ("likes", 0.4),
    ("good", 0.6),
    ("great", 0.8),
    ("awesome", 0.9),
    ("amazing", 0.9),
    ("excellent", 0.9),
    ("fantastic", 0.9),
    ("wonderful", 0.9),
    ("perfect", 1.0),
    ("best", 0.9),
    ("better", 0.5),
    ("nice", 0.5),
    ("cool", 0.5),
    ("happy", 0.7),
    ("glad", 0.5),
    ("enjoy", 0.6),
    ("enjoyed", 0.6),
    ("fun", 0.5),
    ("beautiful", 0.8),
    ("comfortable", 0.6),
    ("comfy", 0.6),
    ("recommend", 0.6),
    ("recommended", 0.6),
    ("worth", 0.4),
    ("stylish", 0.6),
    ("fresh", 0.4),
    ("win", 0.5),
    ("winner", 0.6),
    ("favorite", 0.7),
    ("favourite", 0.7),
    ("thanks", 0.4),
    ("thank", 0.4),
    ("wow", 0.5),
    ("quality", 0.3),
    ("fast", 0.3),
    ("durable", 0.5),
    ("impressed", 0.7),
    ("solid", 0.4),
    ("new", 0.1),
    // negative
    ("bad", -0.7),
    ("worse", -0.7),
    ("worst", -1.0),
    ("terrible", -0.9),
    ("awful", -0.9),
    ("horrible", -0.9),
    ("poor", -0.6),
    ("hate", -0.8),
    ("hated", -0.8),
    ("hates", -0.8),
    ("dislike", -0.5),
    ("disappointed", -0.7),
    ("disappointing", -0.7),
    ("broken", -0.6),
    ("broke", -0.5),
    ("cheap", -0.3),
    ("ugly", -0.7),
    ("uncomfortable", -0.6),
    ("overpriced", -0.6),
    ("expensive", -0.3),
    ("fake", -0.6),
    ("scam", -0.9),
    ("waste", -0.7),
    ("useless", -0.8),
    ("annoying", -0.6),
    ("angry", -0.7),
    ("sad", -0.6),
    ("slow", -0.3),
    ("refund", -0.4),
    ("problem", -0.4),
    ("issue", -0.3),
    ("fail", -0.6),
    ("failed", -0.6),
    ("sucks", -0.8),
    ("meh", -0.2),
    ("boring", -0.5),
    ("hurt", -0.5),
    ("hurts", -0.5),
    ("pain", -0.5),
    ("wrong", -0.5),
];

/// Averages the polarity of matched lexicon words over a whitespace-tokenized,
/// already-normalized text.
///
/// A negator flips and halves the next sentiment word within reach; an
/// intensifier scales it. Unmatched tokens do not dilute the average.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negators: Vec<String>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self {
            words: WORDS
                .iter()
                .map(|(k, w)| (k.to_string(), *w))
                .collect(),
            intensifiers: INTENSIFIERS
                .iter()
                .map(|(k, w)| (k.to_string(), *w))
                .collect(),
            negators: NEGATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or override word polarities. Weights are clamped to `[-1, 1]`.
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        for (word, weight) in words {
            let weight = if weight.is_nan() { 0.0 } else { weight.clamp(-1.0, 1.0) };
            self.words.insert(word.into(), weight);
        }
        self
    }

    fn is_negator(&self, token: &str) -> bool {
        self.negators.iter().any(|n| n == token)
    }
}

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut matched = 0usize;

        // Pending modifiers and how many more tokens they reach.
        let mut negation: Option<usize> = None;
        let mut boost: Option<(f64, usize)> = None;

        for token in text.split_whitespace() {
            if self.is_negator(token) {
                negation = Some(MODIFIER_REACH);
                continue;
            }
            if let Some(&factor) = self.intensifiers.get(token) {
                boost = Some((factor, MODIFIER_REACH));
                continue;
            }

            if let Some(&weight) = self.words.get(token) {
                let mut value = weight;
                if let Some((factor, _)) = boost.take() {
                    value *= factor;
                }
                if negation.take().is_some() {
                    value *= NEGATION_FACTOR;
                }
                total += value.clamp(-1.0, 1.0);
                matched += 1;
                continue;
            }

            negation = negation.and_then(|left| left.checked_sub(1).filter(|l| *l > 0));
            boost = boost.and_then(|(f, left)| left.checked_sub(1).filter(|l| *l > 0).map(|l| (f, l)));
        }

        if matched == 0 {
            return 0.0;
        }
        (total / matched as f64).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> f64 {
        LexiconScorer::default().score(text)
    }

    #[test]
    fn empty_and_unknown_text_is_neutral() {
        assert_eq!(score(""), 0.0);
        assert_eq!(score("puma shoes"), 0.0);
    }

    #[test]
    fn polar_words_set_the_sign() {
        assert!(score("love my new puma") > 0.0);
        assert!(score("puma shoes are bad") < 0.0);
    }

    #[test]
    fn negation_inverts_and_dampens() {
        let good = score("good");
        let not_good = score("not good");
        assert!(not_good < 0.0);
        assert!(not_good.abs() < good.abs());
        assert!(score("dont hate it") > 0.0);
    }

    #[test]
    fn negation_expires_after_reach() {
        assert!(score("not one two three good") > 0.0);
    }

    #[test]
    fn intensifiers_amplify() {
        assert!(score("very good") > score("good"));
        assert!(score("slightly good") < score("good"));
        assert!(score("really bad") < score("bad"));
    }

    #[test]
    fn result_is_clamped() {
        let s = score("extremely perfect absolutely perfect");
        assert!(s <= 1.0 && s > 0.9);
    }

    #[test]
    fn custom_words_override_the_bundled_lexicon() {
        let scorer = LexiconScorer::default().with_words([("puma", 0.5), ("bad", 2.0)]);
        assert!(scorer.score("puma") > 0.0);
        assert_eq!(scorer.score("bad"), 1.0);
    }
}
