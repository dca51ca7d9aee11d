//! Offset pagination helpers and the pager window shown under the table.

pub const PAGE_SIZE: u32 = 10;
/// Width of the run of consecutive page numbers in the pager.
pub const PAGER_WINDOW: u32 = 5;

/// Limit/offset request for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

impl PageRequest {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Window for a 1-based page number.
    pub fn for_page(page: u32, page_size: u32) -> Self {
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        Self::new(page_size, offset)
    }
}

pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerItem {
    Page { number: u32, current: bool },
    Ellipsis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerWindow {
    pub items: Vec<PagerItem>,
    pub start: u32,
    pub end: u32,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl PagerWindow {
    /// Page numbers in the centred run, without the edge links.
    pub fn run(&self) -> Vec<u32> {
        (self.start..=self.end).collect()
    }
}

/// Build the pager for `current` of `total` pages. `None` when there is
/// nothing to page through.
///
/// At most [`PAGER_WINDOW`] consecutive numbers centred on `current`,
/// clamped to `[1, total]`. Page 1 and the last page are linked when the run
/// does not reach them, with an ellipsis when a gap remains.
pub fn pager_window(current: u32, total: u32) -> Option<PagerWindow> {
    if total <= 1 {
        return None;
    }
    let current = current.clamp(1, total);
    let half = PAGER_WINDOW / 2;

    let mut start = current.saturating_sub(half).max(1);
    let end = (start + PAGER_WINDOW - 1).min(total);
    if end - start < PAGER_WINDOW - 1 {
        start = end.saturating_sub(PAGER_WINDOW - 1).max(1);
    }

    let mut items = Vec::new();
    if start > 1 {
        items.push(PagerItem::Page {
            number: 1,
            current: false,
        });
        if start > 2 {
            items.push(PagerItem::Ellipsis);
        }
    }
    for number in start..=end {
        items.push(PagerItem::Page {
            number,
            current: number == current,
        });
    }
    if end < total {
        if end < total - 1 {
            items.push(PagerItem::Ellipsis);
        }
        items.push(PagerItem::Page {
            number: total,
            current: false,
        });
    }

    Some(PagerWindow {
        items,
        start,
        end,
        prev: (current > 1).then(|| current - 1),
        next: (current < total).then(|| current + 1),
    })
}
