//! Request and response types spoken by the blog post REST backend.
//!
//! Every response is wrapped in an [`ApiResponse`] envelope. Records are
//! [`Post`]s, list calls return a [`PostPage`] window, and create/update calls
//! send a [`PostDraft`].

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Publish,
    Draft,
    Trash,
}

impl PostStatus {
    pub const ALL: [PostStatus; 3] = [PostStatus::Publish, PostStatus::Draft, PostStatus::Trash];

    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Draft => "draft",
            PostStatus::Trash => "trash",
        }
    }

    /// Parses the wire spelling; anything else is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "publish" => Some(PostStatus::Publish),
            "draft" => Some(PostStatus::Draft),
            "trash" => Some(PostStatus::Trash),
            _ => None,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-assigned post identifier. The backend emits integers, but the
/// client never interprets the value beyond echoing it into request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Numeric(value) => write!(f, "{value}"),
            PostId::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(number) => PostId::Numeric(number),
            Err(_) => PostId::Text(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub status: PostStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Editable fields of a post, sent verbatim on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub status: PostStatus,
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            category: post.category.clone(),
            status: post.status,
        }
    }
}

/// One limit/offset window of the unfiltered collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPage {
    #[serde(rename = "data", default)]
    pub items: Vec<Post>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Payload of a successful delete. The backend either omits `data` or echoes
/// the removed identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeleteAck(pub Option<serde_json::Value>);

/// Envelope wrapped around every backend response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl<T: Default> ApiResponse<T> {
    /// Fill a missing payload on success; used for calls whose success body
    /// may legitimately omit `data`.
    pub fn with_default_data(mut self) -> Self {
        if self.success && self.data.is_none() {
            self.data = Some(T::default());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_JSON: &str = r#"{
        "id": 7,
        "title": "A title that is long enough",
        "content": "Some content that is long enough",
        "category": "tech",
        "status": "draft",
        "created_at": "2024-05-01T10:20:30.123456Z",
        "updated_at": "2024-05-02T08:00:00Z"
    }"#;

    #[test]
    fn post_parses_backend_shape() {
        let post: Post = serde_json::from_str(POST_JSON).expect("post parses");
        assert_eq!(post.id, PostId::Numeric(7));
        assert_eq!(post.status, PostStatus::Draft);
        assert!(post.updated_at.is_some());
    }

    #[test]
    fn post_id_accepts_strings() {
        let id: PostId = serde_json::from_str(r#""abc-1""#).expect("string id");
        assert_eq!(id.to_string(), "abc-1");
        assert_eq!(PostId::from("42"), PostId::Numeric(42));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let raw = POST_JSON.replace("\"draft\"", "\"archived\"");
        assert!(serde_json::from_str::<Post>(&raw).is_err());
        assert_eq!(PostStatus::parse("archived"), None);
    }

    #[test]
    fn list_envelope_parses_nested_page() {
        let raw = format!(
            r#"{{"success":true,"message":"Posts fetched successfully","data":{{"data":[{POST_JSON}],"limit":10,"offset":0,"total_count":31}}}}"#
        );
        let envelope: ApiResponse<PostPage> = serde_json::from_str(&raw).expect("envelope");
        let page = envelope.data.expect("page");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_count, 31);
    }

    #[test]
    fn delete_without_data_defaults_on_success() {
        let envelope: ApiResponse<DeleteAck> =
            serde_json::from_str(r#"{"success":true,"message":"Post deleted successfully"}"#)
                .expect("envelope");
        assert!(envelope.data.is_none());
        let filled = envelope.with_default_data();
        assert_eq!(filled.data, Some(DeleteAck(None)));
    }

    #[test]
    fn failure_keeps_data_empty() {
        let envelope: ApiResponse<DeleteAck> =
            serde_json::from_str(r#"{"success":false,"error":"locked"}"#).expect("envelope");
        let filled = envelope.with_default_data();
        assert!(filled.data.is_none());
        assert_eq!(filled.error.as_deref(), Some("locked"));
    }

    #[test]
    fn draft_serializes_exact_fields() {
        let draft = PostDraft {
            title: "  padded title  ".into(),
            content: "content".into(),
            category: "tech".into(),
            status: PostStatus::Publish,
        };
        let value = serde_json::to_value(&draft).expect("json");
        assert_eq!(value["title"], "  padded title  ");
        assert_eq!(value["status"], "publish");
    }
}
