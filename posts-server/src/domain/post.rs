use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::lenient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Overwrites every field present in `patch`, leaving the rest untouched.
    /// A field sent as `null` is cleared.
    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(created_at) = patch.created_at {
            self.created_at = truncate_to_millis(created_at);
        }
        if let Some(updated_at) = patch.updated_at {
            self.updated_at = updated_at.map(truncate_to_millis);
        }
    }
}

/// Partial post as sent by clients on create and update.
///
/// The outer `Option` tells whether a key was sent at all; the inner one is
/// `None` when it was sent as `null`. `createdAt` cannot be cleared, so a
/// `null` there reads as a missing key. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(default, deserialize_with = "lenient::nullable_text")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient::nullable_text")]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::nullable_timestamp")]
    pub updated_at: Option<Option<DateTime<Utc>>>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.created_at.is_none()
            && self.updated_at.is_none()
    }

    /// Turns the payload into a record ready for insertion, defaulting
    /// `createdAt` to `now`.
    pub fn into_new_post(self, now: DateTime<Utc>) -> NewPost {
        NewPost {
            title: self.title.flatten(),
            content: self.content.flatten(),
            created_at: truncate_to_millis(self.created_at.unwrap_or(now)),
            updated_at: self.updated_at.flatten().map(truncate_to_millis),
        }
    }
}

/// A post that has not been assigned an id by the store yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NewPost {
    pub fn with_id(self, id: ObjectId) -> Post {
        Post {
            id: id.to_hex(),
            title: self.title,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

pub fn parse_post_id(raw: &str) -> Result<ObjectId, DomainError> {
    ObjectId::parse_str(raw).map_err(|_| DomainError::InvalidId(raw.to_owned()))
}

// The document store keeps dates with millisecond precision.
pub fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample() -> Post {
        Post {
            id: ObjectId::new().to_hex(),
            title: Some("A".into()),
            content: Some("B".into()),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut post = sample();
        let before = post.clone();

        post.apply(PostPatch {
            title: Some(Some("new".into())),
            ..Default::default()
        });

        assert_eq!(post.title.as_deref(), Some("new"));
        assert_eq!(post.content, before.content);
        assert_eq!(post.created_at, before.created_at);
        assert_eq!(post.updated_at, None);
    }

    #[test]
    fn apply_clears_fields_sent_as_null() {
        let mut post = sample();
        post.updated_at = Some(post.created_at);

        post.apply(PostPatch {
            content: Some(None),
            updated_at: Some(None),
            ..Default::default()
        });

        assert_eq!(post.title.as_deref(), Some("A"));
        assert!(post.content.is_none());
        assert!(post.updated_at.is_none());
    }

    #[test]
    fn patch_tells_null_from_missing() {
        let patch: PostPatch = serde_json::from_value(json!({
            "title": "t",
            "content": null,
            "author": "someone",
            "_id": "abc"
        }))
        .unwrap();

        assert_eq!(patch.title, Some(Some("t".into())));
        assert_eq!(patch.content, Some(None));
        assert!(patch.updated_at.is_none());
        assert!(patch.created_at.is_none());
    }

    #[test]
    fn null_created_at_reads_as_missing() {
        let patch: PostPatch = serde_json::from_value(json!({ "createdAt": null })).unwrap();
        assert!(patch.created_at.is_none());
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_casts_scalars() {
        let patch: PostPatch = serde_json::from_value(json!({
            "title": 5,
            "content": true,
            "createdAt": 1_704_067_200_000_i64,
            "updatedAt": "2024-01-02"
        }))
        .unwrap();

        assert_eq!(patch.title, Some(Some("5".into())));
        assert_eq!(patch.content, Some(Some("true".into())));
        assert_eq!(
            patch.created_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            patch.updated_at,
            Some(Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()))
        );
    }

    #[test]
    fn patch_rejects_uncastable_values() {
        let result = serde_json::from_value::<PostPatch>(json!({ "title": { "a": 1 } }));
        assert!(result.is_err());

        let result = serde_json::from_value::<PostPatch>(json!({ "content": ["x"] }));
        assert!(result.is_err());

        let result = serde_json::from_value::<PostPatch>(json!({ "createdAt": "yesterday" }));
        assert!(result.is_err());

        let result = serde_json::from_value::<PostPatch>(json!({ "updatedAt": false }));
        assert!(result.is_err());
    }

    #[test]
    fn new_post_defaults_created_at() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let draft = PostPatch::default().into_new_post(now);
        assert_eq!(draft.created_at, now);

        let supplied = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let draft = PostPatch {
            created_at: Some(supplied),
            ..Default::default()
        }
        .into_new_post(now);
        assert_eq!(draft.created_at, supplied);
    }

    #[test]
    fn post_serializes_camel_case_and_skips_unset() {
        let post = sample();
        let value = serde_json::to_value(&post).unwrap();

        assert_eq!(value["id"], json!(post.id));
        assert_eq!(value["createdAt"], json!("2024-01-01T00:00:00Z"));
        assert!(value.get("updatedAt").is_none());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn parse_post_id_rejects_garbage() {
        assert!(parse_post_id("not-an-id").is_err());
        assert!(parse_post_id("65a1f0c2e4b0a1b2c3d4e5f6").is_ok());
    }

    #[test]
    fn timestamps_are_truncated_to_millis() {
        let ts = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        let truncated = truncate_to_millis(ts);
        assert_eq!(truncated.timestamp_subsec_nanos(), 123_000_000);
    }
}
