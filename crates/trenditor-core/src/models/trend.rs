//! Trend analysis results.

use serde::{Deserialize, Serialize};

use super::{Sentiment, SentimentDistribution};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPost {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub name: String,
    #[serde(default)]
    pub overall_sentiment: Sentiment,
    #[serde(default)]
    pub posts: Vec<TrendPost>,
    #[serde(default)]
    pub sentiment_distribution: SentimentDistribution,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsMeta {
    #[serde(default)]
    pub total_trends: u32,
    #[serde(default)]
    pub total_posts: u32,
    #[serde(default)]
    pub requested_trends: u32,
    #[serde(default)]
    pub requested_posts_per_trend: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendsData {
    #[serde(default)]
    pub trends: Vec<TrendAnalysis>,
    #[serde(default)]
    pub meta: TrendsMeta,
}

/// Body of `POST /api/trends`'s response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendsResponse {
    #[serde(default)]
    pub data: TrendsData,
}

impl TrendsResponse {
    pub fn trends(&self) -> &[TrendAnalysis] {
        &self.data.trends
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trends_response() {
        let json = r#"{
            "data": {
                "trends": [{
                    "name": "rustlang",
                    "overallSentiment": "Positive",
                    "posts": [{"id":"1","content":"<p>love it</p>","author":"ferris","sentiment":"positive","created_at":"2025-01-01T00:00:00Z"}],
                    "sentimentDistribution": {"positive": 1, "neutral": 0, "negative": 0}
                }],
                "meta": {"totalTrends": 1, "totalPosts": 1, "requestedTrends": 1, "requestedPostsPerTrend": 1}
            }
        }"#;
        let resp: TrendsResponse = serde_json::from_str(json).expect("trends should parse");
        assert_eq!(resp.trends().len(), 1);
        let trend = &resp.trends()[0];
        assert_eq!(trend.overall_sentiment, Sentiment::Positive);
        assert_eq!(trend.sentiment_distribution.positive, 1);
        assert_eq!(resp.data.meta.requested_posts_per_trend, 1);
    }

    #[test]
    fn test_missing_data_defaults_empty() {
        let resp: TrendsResponse = serde_json::from_str("{}").expect("empty object should parse");
        assert!(resp.trends().is_empty());
    }
}
