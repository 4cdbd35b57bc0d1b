//! Sentiment labels attached to posts by the backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend sentiment classification. Labels arrive in mixed case
/// ("Positive", "positive"), anything unrecognized is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Other(String),
}

impl Sentiment {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "neutral" => Sentiment::Neutral,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Other(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
            Sentiment::Other(s) => s,
        }
    }
}

impl Default for Sentiment {
    fn default() -> Self {
        Sentiment::Neutral
    }
}

impl From<String> for Sentiment {
    fn from(s: String) -> Self {
        Sentiment::parse(&s)
    }
}

impl From<Sentiment> for String {
    fn from(s: Sentiment) -> Self {
        s.label().to_string()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Count of posts per sentiment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    #[serde(default)]
    pub positive: u32,
    #[serde(default)]
    pub neutral: u32,
    #[serde(default)]
    pub negative: u32,
}

impl SentimentDistribution {
    /// Tally a set of labels. Unrecognized labels are not counted.
    pub fn tally<'a>(sentiments: impl IntoIterator<Item = &'a Sentiment>) -> Self {
        let mut dist = Self::default();
        for s in sentiments {
            match s {
                Sentiment::Positive => dist.positive += 1,
                Sentiment::Neutral => dist.neutral += 1,
                Sentiment::Negative => dist.negative += 1,
                Sentiment::Other(_) => {}
            }
        }
        dist
    }

    pub fn total(&self) -> u32 {
        self.positive + self.neutral + self.negative
    }

    /// Whole-number percentage of `count` in the total (0 when empty).
    pub fn percent(&self, count: u32) -> u32 {
        let total = self.total();
        if total == 0 {
            0
        } else {
            (count * 100 + total / 2) / total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Sentiment::parse("Positive"), Sentiment::Positive);
        assert_eq!(Sentiment::parse("NEGATIVE"), Sentiment::Negative);
        assert_eq!(Sentiment::parse(" neutral "), Sentiment::Neutral);
        assert_eq!(Sentiment::parse("Mixed"), Sentiment::Other("Mixed".to_string()));
    }

    #[test]
    fn test_serde_uses_labels() {
        let s: Sentiment = serde_json::from_str("\"positive\"").expect("label should parse");
        assert_eq!(s, Sentiment::Positive);
        assert_eq!(serde_json::to_string(&s).expect("serialize"), "\"Positive\"");
    }

    #[test]
    fn test_tally_and_percent() {
        let labels = [
            Sentiment::Positive,
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Other("?".to_string()),
        ];
        let dist = SentimentDistribution::tally(labels.iter());
        assert_eq!(dist.positive, 2);
        assert_eq!(dist.negative, 1);
        assert_eq!(dist.total(), 3);
        assert_eq!(dist.percent(dist.positive), 67);
        assert_eq!(SentimentDistribution::default().percent(0), 0);
    }
}
