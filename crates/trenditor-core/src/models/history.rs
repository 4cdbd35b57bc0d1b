//! Keyword search results and the search history built from them.

use serde::{Deserialize, Serialize};

use super::{Sentiment, SentimentDistribution};

/// A post returned by keyword search, with its sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedPost {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

/// Result of `POST /api/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub instance: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default, alias = "posts")]
    pub data: Vec<AnalyzedPost>,
}

/// One entry of the user's search history. Same shape as a search result.
pub type HistoryItem = SearchResult;

impl SearchResult {
    pub fn distribution(&self) -> SentimentDistribution {
        SentimentDistribution::tally(self.data.iter().map(|p| &p.sentiment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_history_item() {
        let json = r#"{
            "keyword": "climate",
            "instance": "mastodon.social",
            "count": 2,
            "sentiment": "Negative",
            "data": [
                {"id":"a","content":"<b>hot</b>","author":"x","sentiment":"Negative","created_at":"2025-03-01T12:00:00Z"},
                {"id":"b","content":"ok","author":"y","sentiment":"Neutral"}
            ]
        }"#;
        let item: HistoryItem = serde_json::from_str(json).expect("history item should parse");
        assert_eq!(item.count, 2);
        assert_eq!(item.sentiment, Sentiment::Negative);
        let dist = item.distribution();
        assert_eq!((dist.negative, dist.neutral), (1, 1));
    }
}
