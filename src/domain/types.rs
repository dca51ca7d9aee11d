//! Shared domain enumerations. Wire records come from `postdesk-api-types`.

use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

pub use postdesk_api_types::{DeleteAck, Post, PostDraft, PostId, PostPage, PostStatus};

/// Active status tab. `All` shows every row of the fetched page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Only(PostStatus),
}

impl StatusFilter {
    /// Tab order as shown in the strip.
    pub const TABS: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Only(PostStatus::Publish),
        StatusFilter::Only(PostStatus::Draft),
        StatusFilter::Only(PostStatus::Trash),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All Posts",
            StatusFilter::Only(PostStatus::Publish) => "Published",
            StatusFilter::Only(PostStatus::Draft) => "Drafts",
            StatusFilter::Only(PostStatus::Trash) => "Trashed",
        }
    }

    pub fn matches(self, status: PostStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => expected == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized == "all" {
            return Ok(StatusFilter::All);
        }
        PostStatus::parse(&normalized)
            .map(StatusFilter::Only)
            .ok_or_else(|| DomainError::validation(format!("unknown status filter `{value}`")))
    }
}
