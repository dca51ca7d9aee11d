//! Action orchestrator. Intents are applied to [`DashboardState`]; the
//! backend commands they produce run on dedicated executors, concurrently
//! when independent, and their completions are folded back in.

mod state;
mod toast;

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::domain::types::{DeleteAck, Post, PostDraft, PostId, PostPage};

use super::error::AppError;
use super::executor::{BusyFlag, RequestExecutor};
use super::gateway::{GatewayError, GatewayResult, PostsGateway};
use super::pagination::PageRequest;

pub use state::{
    CREATED_MESSAGE, Command, Completion, DELETE_FALLBACK_ERROR, DELETED_MESSAGE, DashboardData,
    DashboardState, FormState, Intent, Snapshot, UPDATED_MESSAGE,
};
pub use toast::{TOAST_TTL, Toast, ToastKind};

/// Which executors have a request in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyState {
    pub listing: bool,
    pub counting: bool,
    pub submitting: bool,
    pub deleting: bool,
}

/// Cloneable handles onto the executors' busy flags, readable while a
/// dispatch holds the dashboard.
#[derive(Debug, Clone)]
pub struct BusyFlags {
    listing: BusyFlag,
    counting: BusyFlag,
    submitting: BusyFlag,
    deleting: BusyFlag,
}

impl BusyFlags {
    pub fn snapshot(&self) -> BusyState {
        BusyState {
            listing: self.listing.is_set(),
            counting: self.counting.is_set(),
            submitting: self.submitting.is_set(),
            deleting: self.deleting.is_set(),
        }
    }
}

struct Executors {
    fetch: RequestExecutor<PostPage>,
    stats: RequestExecutor<PostPage>,
    submit: RequestExecutor<Post>,
    delete: RequestExecutor<DeleteAck>,
    lookup: RequestExecutor<Post>,
}

impl Executors {
    fn new() -> Self {
        Self {
            fetch: RequestExecutor::new("posts.list"),
            stats: RequestExecutor::new("posts.stats"),
            submit: RequestExecutor::new("posts.submit"),
            delete: RequestExecutor::new("posts.delete").with_fallback(DELETE_FALLBACK_ERROR),
            lookup: RequestExecutor::new("posts.lookup"),
        }
    }
}

enum SubmitRequest {
    Create(PostDraft),
    Update(PostId, PostDraft),
}

#[derive(Default)]
struct Batch {
    page: Option<(u64, PageRequest)>,
    counts: Option<(u64, PageRequest)>,
    submit: Option<SubmitRequest>,
    delete: Option<PostId>,
}

impl Batch {
    fn from_commands(commands: Vec<Command>) -> Self {
        let mut batch = Self::default();
        for command in commands {
            match command {
                Command::FetchPage {
                    generation,
                    request,
                } => batch.page = Some((generation, request)),
                Command::FetchCounts {
                    generation,
                    request,
                } => batch.counts = Some((generation, request)),
                Command::Create { draft } => batch.submit = Some(SubmitRequest::Create(draft)),
                Command::Update { id, draft } => {
                    batch.submit = Some(SubmitRequest::Update(id, draft));
                }
                Command::Delete { id } => batch.delete = Some(id),
            }
        }
        batch
    }
}

pub struct Dashboard<G> {
    gateway: G,
    state: DashboardState,
    executors: Executors,
}

impl<G: PostsGateway> Dashboard<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_state(gateway, DashboardState::new())
    }

    pub fn with_state(gateway: G, state: DashboardState) -> Self {
        Self {
            gateway,
            state,
            executors: Executors::new(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn busy(&self) -> BusyState {
        self.busy_flags().snapshot()
    }

    pub fn busy_flags(&self) -> BusyFlags {
        BusyFlags {
            listing: self.executors.fetch.busy_flag(),
            counting: self.executors.stats.busy_flag(),
            submitting: self.executors.submit.busy_flag(),
            deleting: self.executors.delete.busy_flag(),
        }
    }

    /// Apply `intent` and run every command it leads to, including the
    /// refetches that follow a successful mutation.
    pub async fn dispatch(&mut self, intent: Intent) {
        debug!(intent = intent.name(), "dispatching intent");
        let mut commands = self.state.apply(intent);
        while !commands.is_empty() {
            let completions = self.run(commands).await;
            commands = completions
                .into_iter()
                .flat_map(|completion| self.state.complete(completion))
                .collect();
        }
    }

    /// [`dispatch`](Self::dispatch), reporting the busy state to `observe`
    /// every `interval` while any request is in flight.
    pub async fn dispatch_observed<F>(
        &mut self,
        intent: Intent,
        interval: Duration,
        mut observe: F,
    ) where
        F: FnMut(BusyState),
    {
        let flags = self.busy_flags();
        let work = self.dispatch(intent);
        tokio::pin!(work);

        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                () = &mut work => break,
                _ = ticker.tick() => {
                    let busy = flags.snapshot();
                    if busy != BusyState::default() {
                        observe(busy);
                    }
                }
            }
        }
    }

    /// Fetch one post outside the dashboard flow. A 404 from the backend is
    /// reported as [`AppError::NotFound`].
    pub async fn load_post(&mut self, id: &PostId) -> Result<Post, AppError> {
        let lookup = &mut self.executors.lookup;
        let gateway = &self.gateway;
        let mut missing = false;
        let request = async {
            let response = gateway.get_one(id).await;
            missing = matches!(response, Err(GatewayError::Status { status: 404, .. }));
            response
        };
        let loaded = lookup.execute(request).await;
        match loaded {
            Some(post) => Ok(post),
            None if missing => Err(AppError::not_found(id.to_string())),
            None => Err(AppError::action_failed(
                lookup.error().unwrap_or(lookup.fallback()),
            )),
        }
    }

    async fn run(&mut self, commands: Vec<Command>) -> Vec<Completion> {
        let Batch {
            page: page_job,
            counts: counts_job,
            submit: submit_job,
            delete: delete_job,
        } = Batch::from_commands(commands);
        let Executors {
            fetch,
            stats,
            submit,
            delete,
            ..
        } = &mut self.executors;
        let gateway = &self.gateway;

        let page = async move {
            let Some((generation, request)) = page_job else {
                return None;
            };
            let result = call(fetch, gateway.list(request.limit, request.offset)).await;
            Some(Completion::PageLoaded { generation, result })
        };

        let counts = async move {
            let Some((generation, request)) = counts_job else {
                return None;
            };
            let result = call(stats, gateway.list(request.limit, request.offset)).await;
            Some(Completion::CountsLoaded { generation, result })
        };

        let submitted = async move {
            let Some(job) = submit_job else {
                return None;
            };
            let result = match job {
                SubmitRequest::Create(draft) => call(submit, gateway.create(&draft)).await,
                SubmitRequest::Update(id, draft) => {
                    call(submit, gateway.update(&id, &draft)).await
                }
            };
            Some(Completion::Submitted(result))
        };

        let deleted = async move {
            let Some(id) = delete_job else {
                return None;
            };
            let result = call(delete, gateway.delete(&id)).await.map(|_| ());
            Some(Completion::Deleted(result))
        };

        let (page, counts, submitted, deleted) = tokio::join!(page, counts, submitted, deleted);
        [page, counts, submitted, deleted]
            .into_iter()
            .flatten()
            .collect()
    }
}

async fn call<T, Fut>(executor: &mut RequestExecutor<T>, request: Fut) -> Result<T, String>
where
    T: Clone,
    Fut: Future<Output = GatewayResult<T>>,
{
    match executor.execute(request).await {
        Some(data) => Ok(data),
        None => Err(executor.error().unwrap_or(executor.fallback()).to_string()),
    }
}
