//! Dashboard state transitions. Intents and backend completions go in,
//! commands for the driver come out. Nothing here awaits or touches the
//! network.

use std::time::Instant;

use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::pagination::{PAGE_SIZE, PageRequest, PagerWindow};
use crate::application::presenter::{
    self, STATS_FETCH_LIMIT, StatusCounts, Tab, tab_strip, visible_posts,
};
use crate::domain::posts::{DraftField, DraftForm, FieldErrors, validate};
use crate::domain::types::{Post, PostDraft, PostId, PostPage, StatusFilter};

use super::toast::Toast;

pub const CREATED_MESSAGE: &str = "Post created successfully!";
pub const UPDATED_MESSAGE: &str = "Post updated successfully!";
pub const DELETED_MESSAGE: &str = "Post deleted successfully!";
pub const DELETE_FALLBACK_ERROR: &str = "Failed to delete post";

/// User interactions the dashboard reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Mount,
    Refresh,
    ChangeTab(StatusFilter),
    ChangePage(u32),
    AddPost,
    EditPost(Post),
    EditField { field: DraftField, value: String },
    CloseForm,
    SubmitForm,
    DeletePost(Post),
    CancelDelete,
    ConfirmDelete,
    DismissToast(Uuid),
    Tick(Instant),
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Mount => "mount",
            Intent::Refresh => "refresh",
            Intent::ChangeTab(_) => "change_tab",
            Intent::ChangePage(_) => "change_page",
            Intent::AddPost => "add_post",
            Intent::EditPost(_) => "edit_post",
            Intent::EditField { .. } => "edit_field",
            Intent::CloseForm => "close_form",
            Intent::SubmitForm => "submit_form",
            Intent::DeletePost(_) => "delete_post",
            Intent::CancelDelete => "cancel_delete",
            Intent::ConfirmDelete => "confirm_delete",
            Intent::DismissToast(_) => "dismiss_toast",
            Intent::Tick(_) => "tick",
        }
    }
}

/// Backend work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchPage {
        generation: u64,
        request: PageRequest,
    },
    FetchCounts {
        generation: u64,
        request: PageRequest,
    },
    Create {
        draft: PostDraft,
    },
    Update {
        id: PostId,
        draft: PostDraft,
    },
    Delete {
        id: PostId,
    },
}

/// Result of a command, with failures already reduced to display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    PageLoaded {
        generation: u64,
        result: Result<PostPage, String>,
    },
    CountsLoaded {
        generation: u64,
        result: Result<PostPage, String>,
    },
    Submitted(Result<Post, String>),
    Deleted(Result<(), String>),
}

/// Last applied value of one fetch kind plus the generation bookkeeping
/// used to drop out-of-order responses.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    value: Option<T>,
    fetched_at: Option<OffsetDateTime>,
    issued: u64,
    applied: u64,
    pending: bool,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            value: None,
            fetched_at: None,
            issued: 0,
            applied: 0,
            pending: false,
        }
    }
}

impl<T> Snapshot<T> {
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn fetched_at(&self) -> Option<OffsetDateTime> {
        self.fetched_at
    }

    /// Generation of the value currently held; 0 before the first load.
    pub fn generation(&self) -> u64 {
        self.applied
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.pending = true;
        self.issued
    }

    fn is_latest(&self, generation: u64) -> bool {
        generation == self.issued
    }

    fn apply(&mut self, generation: u64, value: T) {
        self.value = Some(value);
        self.fetched_at = Some(OffsetDateTime::now_utc());
        self.applied = generation;
        self.pending = false;
    }

    fn settle(&mut self) {
        self.pending = false;
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub page: Snapshot<PostPage>,
    pub counts: Snapshot<StatusCounts>,
}

/// Create/edit form. `editing` holds the post being edited; `None` creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub editing: Option<Post>,
    pub form: DraftForm,
    pub errors: FieldErrors,
}

impl FormState {
    pub fn create() -> Self {
        Self {
            editing: None,
            form: DraftForm::default(),
            errors: FieldErrors::default(),
        }
    }

    pub fn edit(post: Post) -> Self {
        Self {
            form: DraftForm::from_post(&post),
            editing: Some(post),
            errors: FieldErrors::default(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitKind {
    Create,
    Update,
}

impl SubmitKind {
    fn success_message(self) -> &'static str {
        match self {
            SubmitKind::Create => CREATED_MESSAGE,
            SubmitKind::Update => UPDATED_MESSAGE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    tab: StatusFilter,
    page: u32,
    data: DashboardData,
    form: Option<FormState>,
    confirmation: Option<Post>,
    toast: Option<Toast>,
    submitting: Option<SubmitKind>,
    deleting: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            tab: StatusFilter::All,
            page: 1,
            data: DashboardData::default(),
            form: None,
            confirmation: None,
            toast: None,
            submitting: None,
            deleting: false,
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start on a given tab and page; the first `Mount` fetches that window.
    pub fn at(tab: StatusFilter, page: u32) -> Self {
        Self {
            tab,
            page: page.max(1),
            ..Self::default()
        }
    }

    pub fn tab(&self) -> StatusFilter {
        self.tab
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    pub fn confirmation(&self) -> Option<&Post> {
        self.confirmation.as_ref()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_some()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn visible_posts(&self) -> Vec<&Post> {
        visible_posts(self.data.page.value(), self.tab)
    }

    pub fn tabs(&self) -> Vec<Tab> {
        let counts = self.data.counts.value().copied().unwrap_or_default();
        tab_strip(&counts, self.tab)
    }

    pub fn pager(&self) -> Option<PagerWindow> {
        presenter::pager(self.data.page.value(), self.page)
    }

    pub fn apply(&mut self, intent: Intent) -> Vec<Command> {
        let name = intent.name();
        match intent {
            Intent::Mount => vec![self.fetch_page(), self.fetch_counts()],
            Intent::Refresh => vec![self.fetch_page()],
            Intent::ChangeTab(tab) => {
                if tab == self.tab {
                    return ignored(name, "tab already active");
                }
                self.tab = tab;
                vec![self.fetch_page()]
            }
            Intent::ChangePage(page) => {
                if page == 0 || page == self.page {
                    return ignored(name, "page unchanged or out of range");
                }
                self.page = page;
                vec![self.fetch_page()]
            }
            Intent::AddPost | Intent::EditPost(_) | Intent::CloseForm
                if self.submitting.is_some() =>
            {
                ignored(name, "submission in flight")
            }
            Intent::AddPost => {
                self.form = Some(FormState::create());
                Vec::new()
            }
            Intent::EditPost(post) => {
                self.form = Some(FormState::edit(post));
                Vec::new()
            }
            Intent::EditField { field, value } => {
                if let Some(state) = self.form.as_mut() {
                    state.form.set(field, value);
                    state.errors.clear(field);
                }
                Vec::new()
            }
            Intent::CloseForm => {
                self.form = None;
                Vec::new()
            }
            Intent::SubmitForm => self.submit(),
            Intent::DeletePost(_) | Intent::CancelDelete | Intent::ConfirmDelete
                if self.deleting =>
            {
                ignored(name, "delete in flight")
            }
            Intent::DeletePost(post) => {
                self.confirmation = Some(post);
                Vec::new()
            }
            Intent::CancelDelete => {
                self.confirmation = None;
                Vec::new()
            }
            Intent::ConfirmDelete => {
                let Some(post) = self.confirmation.as_ref() else {
                    return ignored(name, "no post awaiting confirmation");
                };
                self.deleting = true;
                vec![Command::Delete {
                    id: post.id.clone(),
                }]
            }
            Intent::DismissToast(id) => {
                if self.toast.as_ref().is_some_and(|toast| toast.id == id) {
                    self.toast = None;
                }
                Vec::new()
            }
            Intent::Tick(now) => {
                if self.toast.as_ref().is_some_and(|toast| toast.is_expired(now)) {
                    self.toast = None;
                }
                Vec::new()
            }
        }
    }

    pub fn complete(&mut self, completion: Completion) -> Vec<Command> {
        match completion {
            Completion::PageLoaded { generation, result } => {
                if !self.data.page.is_latest(generation) {
                    debug!(generation, "discarding stale page response");
                    return Vec::new();
                }
                match result {
                    Ok(page) => self.data.page.apply(generation, page),
                    Err(message) => {
                        self.data.page.settle();
                        self.toast = Some(Toast::error(message));
                    }
                }
                Vec::new()
            }
            Completion::CountsLoaded { generation, result } => {
                if !self.data.counts.is_latest(generation) {
                    debug!(generation, "discarding stale counts response");
                    return Vec::new();
                }
                match result {
                    Ok(page) => self
                        .data
                        .counts
                        .apply(generation, StatusCounts::tally(&page.items)),
                    Err(message) => {
                        self.data.counts.settle();
                        warn!(error = %message, "failed to refresh status counts");
                    }
                }
                Vec::new()
            }
            Completion::Submitted(result) => {
                let kind = self.submitting.take().unwrap_or(SubmitKind::Create);
                match result {
                    Ok(post) => {
                        info!(post_id = %post.id, "post saved");
                        self.form = None;
                        self.after_mutation(kind.success_message())
                    }
                    Err(message) => {
                        self.toast = Some(Toast::error(message));
                        Vec::new()
                    }
                }
            }
            Completion::Deleted(result) => {
                self.deleting = false;
                match result {
                    Ok(()) => {
                        if let Some(post) = self.confirmation.take() {
                            info!(post_id = %post.id, "post deleted");
                        }
                        self.after_mutation(DELETED_MESSAGE)
                    }
                    Err(message) => {
                        self.toast = Some(Toast::error(message));
                        Vec::new()
                    }
                }
            }
        }
    }

    fn submit(&mut self) -> Vec<Command> {
        let name = Intent::SubmitForm.name();
        if self.submitting.is_some() {
            return ignored(name, "submission in flight");
        }
        let Some(state) = self.form.as_mut() else {
            return ignored(name, "no form open");
        };
        let outcome = validate(&state.form);
        state.errors = outcome.errors;
        let Some(draft) = outcome.draft else {
            debug!(errors = %state.errors, "form blocked by validation");
            return Vec::new();
        };
        match &state.editing {
            Some(post) => {
                self.submitting = Some(SubmitKind::Update);
                vec![Command::Update {
                    id: post.id.clone(),
                    draft,
                }]
            }
            None => {
                self.submitting = Some(SubmitKind::Create);
                vec![Command::Create { draft }]
            }
        }
    }

    fn after_mutation(&mut self, message: &str) -> Vec<Command> {
        self.toast = Some(Toast::success(message));
        self.page = 1;
        vec![self.fetch_page(), self.fetch_counts()]
    }

    fn fetch_page(&mut self) -> Command {
        Command::FetchPage {
            generation: self.data.page.issue(),
            request: PageRequest::for_page(self.page, PAGE_SIZE),
        }
    }

    fn fetch_counts(&mut self) -> Command {
        Command::FetchCounts {
            generation: self.data.counts.issue(),
            request: PageRequest::new(STATS_FETCH_LIMIT, 0),
        }
    }
}

fn ignored(intent: &'static str, reason: &'static str) -> Vec<Command> {
    debug!(intent, reason, "intent ignored");
    Vec::new()
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::application::dashboard::toast::{TOAST_TTL, ToastKind};
    use crate::domain::types::PostStatus;

    use super::*;

    fn post(id: i64, status: PostStatus) -> Post {
        Post {
            id: PostId::Numeric(id),
            title: format!("Post number {id} with a long title"),
            content: "Body text that is comfortably long".into(),
            category: "tech".into(),
            status,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        }
    }

    fn page_of(items: Vec<Post>, total_count: u64) -> PostPage {
        PostPage {
            items,
            total_count,
            limit: Some(10),
            offset: Some(0),
        }
    }

    fn fill_valid(state: &mut DashboardState) {
        for (field, value) in [
            (DraftField::Title, "A title long enough to pass"),
            (DraftField::Content, "Content that is long enough too"),
            (DraftField::Category, "tech"),
            (DraftField::Status, "publish"),
        ] {
            state.apply(Intent::EditField {
                field,
                value: value.into(),
            });
        }
    }

    fn generations(commands: &[Command]) -> (Option<u64>, Option<u64>) {
        let mut page = None;
        let mut counts = None;
        for command in commands {
            match command {
                Command::FetchPage { generation, .. } => page = Some(*generation),
                Command::FetchCounts { generation, .. } => counts = Some(*generation),
                _ => {}
            }
        }
        (page, counts)
    }

    #[test]
    fn mount_fetches_first_page_and_counts() {
        let mut state = DashboardState::new();
        let commands = state.apply(Intent::Mount);
        assert_eq!(
            commands,
            vec![
                Command::FetchPage {
                    generation: 1,
                    request: PageRequest::new(10, 0),
                },
                Command::FetchCounts {
                    generation: 1,
                    request: PageRequest::new(1000, 0),
                },
            ]
        );
        assert!(state.data().page.is_pending());
    }

    #[test]
    fn starting_window_is_used_by_mount() {
        let mut state = DashboardState::at(StatusFilter::Only(PostStatus::Trash), 4);
        let commands = state.apply(Intent::Mount);
        assert!(matches!(
            commands.first(),
            Some(Command::FetchPage { request, .. }) if *request == PageRequest::new(10, 30)
        ));
        assert_eq!(state.tab(), StatusFilter::Only(PostStatus::Trash));
        assert_eq!(DashboardState::at(StatusFilter::All, 0).current_page(), 1);
    }

    #[test]
    fn same_tab_or_page_does_not_refetch() {
        let mut state = DashboardState::new();
        assert!(state.apply(Intent::ChangeTab(StatusFilter::All)).is_empty());
        assert!(state.apply(Intent::ChangePage(1)).is_empty());
        assert!(state.apply(Intent::ChangePage(0)).is_empty());
    }

    #[test]
    fn page_change_requests_matching_offset() {
        let mut state = DashboardState::new();
        let commands = state.apply(Intent::ChangePage(3));
        assert!(matches!(
            commands.as_slice(),
            [Command::FetchPage { request, .. }] if *request == PageRequest::new(10, 20)
        ));
        assert_eq!(state.current_page(), 3);
    }

    #[test]
    fn tab_change_keeps_page_and_skips_counts() {
        let mut state = DashboardState::new();
        state.apply(Intent::ChangePage(2));
        let commands = state.apply(Intent::ChangeTab(StatusFilter::Only(PostStatus::Draft)));
        assert!(matches!(
            commands.as_slice(),
            [Command::FetchPage { request, .. }] if request.offset == 10
        ));
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn stale_page_response_is_discarded() {
        let mut state = DashboardState::new();
        let (first, _) = generations(&state.apply(Intent::Mount));
        let (second, _) = generations(&state.apply(Intent::ChangePage(2)));
        let first = first.expect("first generation");
        let second = second.expect("second generation");

        state.complete(Completion::PageLoaded {
            generation: second,
            result: Ok(page_of(vec![post(2, PostStatus::Draft)], 20)),
        });
        state.complete(Completion::PageLoaded {
            generation: first,
            result: Ok(page_of(vec![post(1, PostStatus::Draft)], 20)),
        });

        let shown: Vec<String> = state
            .visible_posts()
            .iter()
            .map(|post| post.id.to_string())
            .collect();
        assert_eq!(shown, vec!["2"]);
        assert_eq!(state.data().page.generation(), second);
        assert!(state.data().page.fetched_at().is_some());
    }

    #[test]
    fn list_failure_raises_error_toast_and_keeps_rows() {
        let mut state = DashboardState::new();
        let (generation, _) = generations(&state.apply(Intent::Mount));
        state.complete(Completion::PageLoaded {
            generation: generation.expect("generation"),
            result: Ok(page_of(vec![post(1, PostStatus::Draft)], 1)),
        });
        let (generation, _) = generations(&state.apply(Intent::Refresh));
        state.complete(Completion::PageLoaded {
            generation: generation.expect("generation"),
            result: Err("database is down".into()),
        });

        let toast = state.toast().expect("toast");
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.text, "database is down");
        assert_eq!(state.visible_posts().len(), 1);
        assert!(!state.data().page.is_pending());
    }

    #[test]
    fn counts_failure_is_silent() {
        let mut state = DashboardState::new();
        let (_, counts) = generations(&state.apply(Intent::Mount));
        state.complete(Completion::CountsLoaded {
            generation: counts.expect("generation"),
            result: Err("boom".into()),
        });
        assert!(state.toast().is_none());
        assert!(state.data().counts.value().is_none());
    }

    #[test]
    fn counts_drive_tab_labels() {
        let mut state = DashboardState::new();
        let (_, counts) = generations(&state.apply(Intent::Mount));
        state.complete(Completion::CountsLoaded {
            generation: counts.expect("generation"),
            result: Ok(page_of(
                vec![
                    post(1, PostStatus::Draft),
                    post(2, PostStatus::Publish),
                    post(3, PostStatus::Draft),
                ],
                3,
            )),
        });
        let counts: Vec<u64> = state.tabs().iter().map(|tab| tab.count).collect();
        assert_eq!(counts, vec![3, 1, 2, 0]);
    }

    #[test]
    fn invalid_submit_records_errors_and_issues_nothing() {
        let mut state = DashboardState::new();
        state.apply(Intent::AddPost);
        let commands = state.apply(Intent::SubmitForm);
        assert!(commands.is_empty());
        let form = state.form().expect("form open");
        assert_eq!(form.errors.len(), 3);
        assert!(!state.is_submitting());
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut state = DashboardState::new();
        state.apply(Intent::AddPost);
        state.apply(Intent::SubmitForm);
        state.apply(Intent::EditField {
            field: DraftField::Title,
            value: "x".into(),
        });
        let errors = &state.form().expect("form").errors;
        assert_eq!(errors.get(DraftField::Title), None);
        assert!(errors.get(DraftField::Content).is_some());
    }

    #[test]
    fn valid_create_then_success_resets_everything() {
        let mut state = DashboardState::new();
        state.apply(Intent::ChangePage(4));
        state.apply(Intent::AddPost);
        fill_valid(&mut state);

        let commands = state.apply(Intent::SubmitForm);
        let [Command::Create { draft }] = commands.as_slice() else {
            panic!("expected a single create, got {commands:?}");
        };
        assert_eq!(draft.status, PostStatus::Publish);
        assert!(state.is_submitting());

        // closing is ignored while the request is in flight
        state.apply(Intent::CloseForm);
        assert!(state.form().is_some());

        let follow_up = state.complete(Completion::Submitted(Ok(post(9, PostStatus::Publish))));
        assert_eq!(follow_up.len(), 2);
        assert!(matches!(
            follow_up[0],
            Command::FetchPage { request, .. } if request == PageRequest::new(10, 0)
        ));
        assert!(matches!(follow_up[1], Command::FetchCounts { .. }));
        assert!(state.form().is_none());
        assert_eq!(state.current_page(), 1);
        let toast = state.toast().expect("toast");
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.text, CREATED_MESSAGE);
    }

    #[test]
    fn edit_submits_update_for_the_original_id() {
        let mut state = DashboardState::new();
        let original = post(5, PostStatus::Draft);
        state.apply(Intent::EditPost(original));
        let commands = state.apply(Intent::SubmitForm);
        assert!(matches!(
            commands.as_slice(),
            [Command::Update { id, .. }] if *id == PostId::Numeric(5)
        ));
        state.complete(Completion::Submitted(Ok(post(5, PostStatus::Draft))));
        assert_eq!(state.toast().expect("toast").text, UPDATED_MESSAGE);
    }

    #[test]
    fn submit_failure_keeps_form_open() {
        let mut state = DashboardState::new();
        state.apply(Intent::AddPost);
        fill_valid(&mut state);
        state.apply(Intent::SubmitForm);
        let follow_up = state.complete(Completion::Submitted(Err("title taken".into())));
        assert!(follow_up.is_empty());
        assert!(state.form().is_some());
        assert!(!state.is_submitting());
        assert_eq!(state.toast().expect("toast").text, "title taken");
    }

    #[test]
    fn delete_failure_keeps_confirmation_open() {
        let mut state = DashboardState::new();
        state.apply(Intent::DeletePost(post(3, PostStatus::Trash)));
        let commands = state.apply(Intent::ConfirmDelete);
        assert_eq!(
            commands,
            vec![Command::Delete {
                id: PostId::Numeric(3)
            }]
        );
        assert!(state.apply(Intent::ConfirmDelete).is_empty());
        state.apply(Intent::CancelDelete);
        assert!(state.confirmation().is_some());

        state.complete(Completion::Deleted(Err("locked".into())));
        assert!(state.confirmation().is_some());
        assert!(!state.is_deleting());
        let toast = state.toast().expect("toast");
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.text, "locked");
    }

    #[test]
    fn delete_success_closes_dialog_and_refreshes() {
        let mut state = DashboardState::new();
        state.apply(Intent::ChangePage(2));
        state.apply(Intent::DeletePost(post(3, PostStatus::Trash)));
        state.apply(Intent::ConfirmDelete);
        let follow_up = state.complete(Completion::Deleted(Ok(())));
        assert_eq!(follow_up.len(), 2);
        assert!(state.confirmation().is_none());
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.toast().expect("toast").text, DELETED_MESSAGE);
    }

    #[test]
    fn confirm_without_target_is_ignored() {
        let mut state = DashboardState::new();
        assert!(state.apply(Intent::ConfirmDelete).is_empty());
        assert!(!state.is_deleting());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn ignored_intents_are_logged_at_debug() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut state = DashboardState::new();
        tracing::subscriber::with_default(subscriber, || {
            state.apply(Intent::AddPost);
            fill_valid(&mut state);
            state.apply(Intent::SubmitForm);
            state.apply(Intent::CloseForm);
            state.apply(Intent::DeletePost(post(3, PostStatus::Draft)));
            state.apply(Intent::ConfirmDelete);
            state.apply(Intent::CancelDelete);
            state.apply(Intent::ChangeTab(StatusFilter::All));
            state.apply(Intent::ChangePage(0));
        });

        assert!(state.form().is_some());
        assert!(state.confirmation().is_some());

        let text = logs.text();
        assert_eq!(text.matches("intent ignored").count(), 4);
        for expected in [
            "close_form",
            "submission in flight",
            "cancel_delete",
            "delete in flight",
            "tab already active",
            "page unchanged or out of range",
        ] {
            assert!(text.contains(expected), "missing `{expected}` in {text}");
        }
        assert!(text.contains("DEBUG"));
    }

    #[test]
    fn newer_toast_replaces_older_and_expires() {
        let mut state = DashboardState::new();
        state.apply(Intent::DeletePost(post(3, PostStatus::Trash)));
        state.apply(Intent::ConfirmDelete);
        state.complete(Completion::Deleted(Err("first".into())));
        let first = state.toast().expect("toast").id;
        state.apply(Intent::ConfirmDelete);
        state.complete(Completion::Deleted(Err("second".into())));
        let toast = state.toast().expect("toast").clone();
        assert_ne!(toast.id, first);
        assert_eq!(toast.text, "second");

        state.apply(Intent::DismissToast(first));
        assert!(state.toast().is_some());

        state.apply(Intent::Tick(toast.shown_at + Duration::from_millis(10)));
        assert!(state.toast().is_some());
        state.apply(Intent::Tick(toast.shown_at + TOAST_TTL));
        assert!(state.toast().is_none());
    }

    #[test]
    fn dismiss_removes_matching_toast() {
        let mut state = DashboardState::new();
        state.apply(Intent::DeletePost(post(3, PostStatus::Trash)));
        state.apply(Intent::ConfirmDelete);
        state.complete(Completion::Deleted(Ok(())));
        let id = state.toast().expect("toast").id;
        state.apply(Intent::DismissToast(id));
        assert!(state.toast().is_none());
    }
}
