//! The identity returned by credential verification.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Backend user identifier.
///
/// The backend has sent both numeric and string ids over time, so both are
/// accepted and normalized to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => UserId::from(n),
            RawId::Text(s) => UserId(s),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl User {
    /// First letter of the name, used as an avatar placeholder.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_numeric_id() {
        let user: User = serde_json::from_str(r#"{"id":1,"name":"Ann","email":"a@x.com"}"#)
            .expect("numeric id should parse");
        assert_eq!(user.id, UserId::from(1));
        assert_eq!(user.id.as_str(), "1");
    }

    #[test]
    fn test_user_string_id_alias() {
        let user: User =
            serde_json::from_str(r#"{"_id":"65f1c0ffee","name":"bo","email":"b@x.com"}"#)
                .expect("string _id should parse");
        assert_eq!(user.id.as_str(), "65f1c0ffee");
        assert_eq!(user.initial(), 'B');
    }
}
