//! The user's own posts ("toots").

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Sentiment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toot {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
}

/// Who can see a new toot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Unlisted,
    Private,
    Direct,
}

impl Visibility {
    pub fn label(&self) -> &'static str {
        match self {
            Visibility::Public => "Public",
            Visibility::Unlisted => "Unlisted",
            Visibility::Private => "Followers only",
            Visibility::Direct => "Direct",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Visibility::Public => Visibility::Unlisted,
            Visibility::Unlisted => Visibility::Private,
            Visibility::Private => Visibility::Direct,
            Visibility::Direct => Visibility::Public,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Body of `POST /api/toot`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TootDraft {
    pub content: String,
    pub visibility: Visibility,
}

/// Response of the edit endpoint: the new content and its re-computed sentiment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditedToot {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
}

impl Toot {
    pub fn apply_edit(&mut self, edit: EditedToot) {
        self.content = edit.content;
        self.sentiment = edit.sentiment;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toot_parse() {
        let toot: Toot = serde_json::from_str(
            r#"{"id":"109","content":"<p>hi</p>","createdAt":"2025-02-01T10:00:00Z","sentiment":"positive"}"#,
        )
        .expect("toot should parse");
        assert_eq!(toot.sentiment, Some(Sentiment::Positive));
        assert_eq!(toot.created_at.as_deref(), Some("2025-02-01T10:00:00Z"));
    }

    #[test]
    fn test_draft_serializes_lowercase_visibility() {
        let draft = TootDraft {
            content: "hello".to_string(),
            visibility: Visibility::Unlisted,
        };
        let json = serde_json::to_value(&draft).expect("serialize");
        assert_eq!(json["visibility"], "unlisted");
    }

    #[test]
    fn test_apply_edit() {
        let mut toot = Toot {
            id: "1".to_string(),
            content: "old".to_string(),
            created_at: None,
            sentiment: Some(Sentiment::Negative),
        };
        toot.apply_edit(EditedToot {
            content: "new".to_string(),
            sentiment: Some(Sentiment::Positive),
        });
        assert_eq!(toot.content, "new");
        assert_eq!(toot.sentiment, Some(Sentiment::Positive));
    }

    #[test]
    fn test_visibility_cycle() {
        assert_eq!(Visibility::Public.next(), Visibility::Unlisted);
        assert_eq!(Visibility::Private.next(), Visibility::Direct);
        assert_eq!(Visibility::Direct.next(), Visibility::Public);
    }
}
