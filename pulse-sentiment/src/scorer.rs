/// Black-box polarity scoring: `-1.0` is most negative, `1.0` most positive and
/// `0.0` neutral.
///
/// Implementations should stay within `[-1, 1]`; the classifier clamps anything
/// else and treats NaN as neutral.
pub trait PolarityScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

impl<F> PolarityScorer for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn score(&self, text: &str) -> f64 {
        self(text)
    }
}

