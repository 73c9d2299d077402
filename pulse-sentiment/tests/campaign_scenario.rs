use pulse_common::SentimentLabel;
use pulse_sentiment::{LexiconScorer, PolarityScorer, SentimentClassifier, clean};

#[test]
fn puma_posts_are_cleaned_and_labelled() {
    let classifier = SentimentClassifier::lexicon();
    let posts = ["Love my new PUMA! #ad http://x.co", "PUMA shoes are bad @brand"];

    let cleaned: Vec<String> = posts.iter().map(|p| clean(p)).collect();
    assert_eq!(cleaned, vec!["love my new puma", "puma shoes are bad"]);

    let labels: Vec<SentimentLabel> = cleaned.iter().map(|t| classifier.classify(t)).collect();
    assert_eq!(labels, vec![SentimentLabel::Positive, SentimentLabel::Negative]);
}

#[test]
fn every_input_gets_exactly_one_label() {
    let classifier = SentimentClassifier::lexicon();
    for raw in [
        "",
        "meh",
        "not bad at all",
        "Worst. Purchase. Ever. https://t.co/x",
        "ok",
        "@only #tags http://and.links",
    ] {
        let label = classifier.classify(&clean(raw));
        assert!(matches!(
            label,
            SentimentLabel::Positive | SentimentLabel::Negative | SentimentLabel::Neutral
        ));
    }
}

#[test]
fn custom_scorers_plug_in() {
    struct LengthScorer;
    impl PolarityScorer for LengthScorer {
        fn score(&self, text: &str) -> f64 {
            if text.len() > 10 { 0.5 } else { -0.5 }
        }
    }

    let c = SentimentClassifier::new(LengthScorer);
    assert_eq!(c.classify("short"), SentimentLabel::Negative);
    assert_eq!(c.classify("a much longer text"), SentimentLabel::Positive);

    let tuned = SentimentClassifier::new(LexiconScorer::new().with_words([("puma", 0.9)]));
    assert_eq!(tuned.classify("puma"), SentimentLabel::Positive);
}
