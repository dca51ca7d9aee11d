//! Pure derivations from fetched data: visible rows, status counts, tabs.

use crate::domain::types::{Post, PostPage, PostStatus, StatusFilter};

use super::pagination::{PAGE_SIZE, PagerWindow, pager_window, total_pages};

/// Upper bound of the snapshot used to tally status counts. Collections
/// larger than this are undercounted.
pub const STATS_FETCH_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub all: u64,
    pub publish: u64,
    pub draft: u64,
    pub trash: u64,
}

impl StatusCounts {
    /// Tally a snapshot. `all` is the number of records fetched, not the
    /// server-reported total.
    pub fn tally(posts: &[Post]) -> Self {
        posts.iter().fold(
            Self {
                all: posts.len() as u64,
                ..Self::default()
            },
            |mut counts, post| {
                match post.status {
                    PostStatus::Publish => counts.publish += 1,
                    PostStatus::Draft => counts.draft += 1,
                    PostStatus::Trash => counts.trash += 1,
                }
                counts
            },
        )
    }

    pub fn for_filter(&self, filter: StatusFilter) -> u64 {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Only(PostStatus::Publish) => self.publish,
            StatusFilter::Only(PostStatus::Draft) => self.draft,
            StatusFilter::Only(PostStatus::Trash) => self.trash,
        }
    }
}

/// Rows of the fetched page that match the active tab, in server order.
pub fn visible_posts(page: Option<&PostPage>, filter: StatusFilter) -> Vec<&Post> {
    page.map(|page| {
        page.items
            .iter()
            .filter(|post| filter.matches(post.status))
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub filter: StatusFilter,
    pub label: &'static str,
    pub count: u64,
    pub active: bool,
}

pub fn tab_strip(counts: &StatusCounts, active: StatusFilter) -> Vec<Tab> {
    StatusFilter::TABS
        .into_iter()
        .map(|filter| Tab {
            filter,
            label: filter.label(),
            count: counts.for_filter(filter),
            active: filter == active,
        })
        .collect()
}

/// Pager for the fetched page; `None` when everything fits on one page.
pub fn pager(page: Option<&PostPage>, current: u32) -> Option<PagerWindow> {
    let total_count = page.map_or(0, |page| page.total_count);
    pager_window(current, total_pages(total_count, PAGE_SIZE))
}
