//! Text views rendered from dashboard state.

use askama::Template;
use time::{OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};

use crate::application::dashboard::{BusyState, DashboardState, FormState, Toast, ToastKind};
use crate::application::pagination::{PagerItem, PagerWindow, total_pages, PAGE_SIZE};
use crate::application::presenter::Tab;
use crate::domain::posts::{CATEGORY_MIN_CHARS, CONTENT_MIN_CHARS, DraftField, TITLE_MIN_CHARS};
use crate::domain::types::Post;

const TITLE_WIDTH: usize = 40;
const CATEGORY_WIDTH: usize = 14;
const STATUS_WIDTH: usize = 8;
const ID_WIDTH: usize = 6;

#[derive(Debug, Clone)]
pub struct TabView {
    pub label: &'static str,
    pub count: u64,
    pub active: bool,
}

impl From<&Tab> for TabView {
    fn from(tab: &Tab) -> Self {
        Self {
            label: tab.label,
            count: tab.count,
            active: tab.active,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RowView {
    pub line: String,
}

#[derive(Debug, Clone)]
pub struct PagerView {
    pub line: String,
}

#[derive(Debug, Clone)]
pub struct FieldView {
    pub label: String,
    pub value: String,
    pub error: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct FormView {
    pub heading: &'static str,
    pub fields: Vec<FieldView>,
    pub submitting: bool,
}

#[derive(Debug, Clone)]
pub struct ConfirmView {
    pub title: String,
    pub deleting: bool,
}

#[derive(Debug, Clone)]
pub struct ToastView {
    pub marker: &'static str,
    pub text: String,
}

impl From<&Toast> for ToastView {
    fn from(toast: &Toast) -> Self {
        let marker = match toast.kind {
            ToastKind::Success => "[ok]",
            ToastKind::Error => "[error]",
        };
        Self {
            marker,
            text: toast.text.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.txt")]
pub struct DashboardTemplate {
    pub tabs: Vec<TabView>,
    pub loading: bool,
    pub header: String,
    pub rows: Vec<RowView>,
    pub pager: Option<PagerView>,
    pub freshness: Option<String>,
    pub form: Option<FormView>,
    pub confirmation: Option<ConfirmView>,
    pub toast: Option<ToastView>,
}

impl DashboardTemplate {
    /// `busy` only differs from the settled state when sampled mid-dispatch,
    /// as [`Dashboard::dispatch_observed`] does. Renders taken after
    /// `dispatch` returns show the settled dashboard.
    ///
    /// [`Dashboard::dispatch_observed`]: crate::application::dashboard::Dashboard::dispatch_observed
    pub fn build(state: &DashboardState, busy: BusyState) -> Self {
        let page = &state.data().page;
        Self {
            tabs: state.tabs().iter().map(TabView::from).collect(),
            loading: busy.listing || (page.is_pending() && page.value().is_none()),
            header: header_line(),
            rows: state
                .visible_posts()
                .into_iter()
                .map(|post| RowView {
                    line: row_line(post),
                })
                .collect(),
            pager: state.pager().map(|window| PagerView {
                line: pager_line(&window, total_pages_of(state)),
            }),
            freshness: freshness_line(state),
            form: state.form().map(|form| form_view(form, state.is_submitting())),
            confirmation: state.confirmation().map(|post| ConfirmView {
                title: post.title.clone(),
                deleting: state.is_deleting() || busy.deleting,
            }),
            toast: state.toast().map(ToastView::from),
        }
    }
}

/// Tab strip on its own, for the counts overview.
#[derive(Template)]
#[template(path = "tab_strip.txt")]
pub struct StatsTemplate {
    pub tabs: Vec<TabView>,
}

impl StatsTemplate {
    pub fn build(state: &DashboardState) -> Self {
        Self {
            tabs: state.tabs().iter().map(TabView::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "toast.txt")]
pub struct ToastTemplate {
    pub toast: Option<ToastView>,
}

impl ToastTemplate {
    pub fn build(state: &DashboardState) -> Self {
        Self {
            toast: state.toast().map(ToastView::from),
        }
    }
}

fn header_line() -> String {
    format!(
        "{:<ID_WIDTH$} {:<TITLE_WIDTH$} {:<CATEGORY_WIDTH$} {:<STATUS_WIDTH$} {}",
        "ID", "Title", "Category", "Status", "Created"
    )
}

fn row_line(post: &Post) -> String {
    format!(
        "{:<ID_WIDTH$} {:<TITLE_WIDTH$} {:<CATEGORY_WIDTH$} {:<STATUS_WIDTH$} {}",
        post.id.to_string(),
        truncate(&post.title, TITLE_WIDTH),
        truncate(&post.category, CATEGORY_WIDTH),
        post.status.as_str(),
        display_date(post.created_at),
    )
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn display_date(at: OffsetDateTime) -> String {
    at.format(format_description!(
        "[month repr:short] [day padding:none], [year]"
    ))
    .unwrap_or_default()
}

fn total_pages_of(state: &DashboardState) -> u32 {
    let total_count = state.data().page.value().map_or(0, |page| page.total_count);
    total_pages(total_count, PAGE_SIZE)
}

fn pager_line(window: &PagerWindow, total: u32) -> String {
    let mut cells = Vec::with_capacity(window.items.len() + 2);
    cells.push(match window.prev {
        Some(_) => "‹ Prev".to_string(),
        None => "‹".to_string(),
    });
    for item in &window.items {
        cells.push(match item {
            PagerItem::Page {
                number,
                current: true,
            } => format!("[{number}]"),
            PagerItem::Page { number, .. } => number.to_string(),
            PagerItem::Ellipsis => "…".to_string(),
        });
    }
    cells.push(match window.next {
        Some(_) => "Next ›".to_string(),
        None => "›".to_string(),
    });
    let current = window
        .items
        .iter()
        .find_map(|item| match item {
            PagerItem::Page {
                number,
                current: true,
            } => Some(*number),
            _ => None,
        })
        .unwrap_or(1);
    format!("{}   (page {current} of {total})", cells.join(" "))
}

fn freshness_line(state: &DashboardState) -> Option<String> {
    let data = state.data();
    let stamp = |at: Option<OffsetDateTime>| {
        at.and_then(|at| at.format(&Rfc3339).ok())
            .unwrap_or_else(|| "never".to_string())
    };
    if data.page.fetched_at().is_none() && data.counts.fetched_at().is_none() {
        return None;
    }
    Some(format!(
        "rows fetched {} · counts fetched {}",
        stamp(data.page.fetched_at()),
        stamp(data.counts.fetched_at())
    ))
}

fn form_view(state: &FormState, submitting: bool) -> FormView {
    let fields = DraftField::ALL
        .into_iter()
        .map(|field| {
            let value = state.form.value(field);
            let label = match field {
                DraftField::Title => format!(
                    "Title ({} characters, minimum {TITLE_MIN_CHARS})",
                    value.chars().count()
                ),
                DraftField::Content => format!(
                    "Content ({} characters, minimum {CONTENT_MIN_CHARS})",
                    value.chars().count()
                ),
                DraftField::Category => format!(
                    "Category ({} characters, minimum {CATEGORY_MIN_CHARS})",
                    value.chars().count()
                ),
                DraftField::Status => "Status".to_string(),
            };
            FieldView {
                label,
                value: value.to_string(),
                error: state.errors.get(field),
            }
        })
        .collect();
    FormView {
        heading: if state.is_edit() {
            "Edit Post"
        } else {
            "Create New Post"
        },
        fields,
        submitting,
    }
}
