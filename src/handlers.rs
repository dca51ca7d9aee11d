use std::io::{self, BufRead, Write};
use std::time::Duration;

use askama::Template;
use tracing::info;

use postdesk::{
    application::{
        dashboard::{Dashboard, DashboardState, Intent, ToastKind},
        error::AppError,
        gateway::PostsGateway,
    },
    config::{Command, CreateArgs, DeleteArgs, EditArgs, ShowArgs},
    domain::{posts::DraftField, types::PostId},
    presentation::{DashboardTemplate, StatsTemplate},
};

/// Dashboard state the command starts from.
pub fn initial_state(command: &Command) -> DashboardState {
    match command {
        Command::List(args) => DashboardState::at(args.tab, args.page),
        _ => DashboardState::new(),
    }
}

pub async fn handle<G: PostsGateway>(
    dashboard: &mut Dashboard<G>,
    command: Command,
) -> Result<(), AppError> {
    match command {
        Command::List(_) => list(dashboard).await,
        Command::Stats => stats(dashboard).await,
        Command::Show(args) => show(dashboard, args).await,
        Command::Create(args) => create(dashboard, args).await,
        Command::Edit(args) => edit(dashboard, args).await,
        Command::Delete(args) => delete(dashboard, args).await,
    }
}

async fn list<G: PostsGateway>(dashboard: &mut Dashboard<G>) -> Result<(), AppError> {
    run_intent(dashboard, Intent::Mount).await;
    print_dashboard(dashboard)?;
    fail_on_error_toast(dashboard.state())
}

async fn stats<G: PostsGateway>(dashboard: &mut Dashboard<G>) -> Result<(), AppError> {
    run_intent(dashboard, Intent::Mount).await;
    if dashboard.state().data().counts.value().is_none() {
        return Err(AppError::action_failed("status counts are unavailable"));
    }
    write_stdout(&StatsTemplate::build(dashboard.state()).render()?)
}

async fn show<G: PostsGateway>(dashboard: &mut Dashboard<G>, args: ShowArgs) -> Result<(), AppError> {
    let post = dashboard.load_post(&PostId::from(args.id.as_str())).await?;
    let json = serde_json::to_string_pretty(&post).map_err(|err| AppError::output(err.to_string()))?;
    write_stdout(&json)
}

async fn create<G: PostsGateway>(
    dashboard: &mut Dashboard<G>,
    args: CreateArgs,
) -> Result<(), AppError> {
    run_intent(dashboard, Intent::Mount).await;
    dashboard.dispatch(Intent::AddPost).await;
    let fields = [
        (DraftField::Title, args.title),
        (DraftField::Content, args.content),
        (DraftField::Category, args.category),
        (DraftField::Status, args.status),
    ];
    for (field, value) in fields {
        dashboard.dispatch(Intent::EditField { field, value }).await;
    }
    run_intent(dashboard, Intent::SubmitForm).await;
    finish_submission(dashboard)
}

async fn edit<G: PostsGateway>(dashboard: &mut Dashboard<G>, args: EditArgs) -> Result<(), AppError> {
    run_intent(dashboard, Intent::Mount).await;
    let post = dashboard.load_post(&PostId::from(args.id.as_str())).await?;
    dashboard.dispatch(Intent::EditPost(post)).await;
    let fields = [
        (DraftField::Title, args.title),
        (DraftField::Content, args.content),
        (DraftField::Category, args.category),
        (DraftField::Status, args.status),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            dashboard.dispatch(Intent::EditField { field, value }).await;
        }
    }
    run_intent(dashboard, Intent::SubmitForm).await;
    finish_submission(dashboard)
}

async fn delete<G: PostsGateway>(
    dashboard: &mut Dashboard<G>,
    args: DeleteArgs,
) -> Result<(), AppError> {
    run_intent(dashboard, Intent::Mount).await;
    let post = dashboard.load_post(&PostId::from(args.id.as_str())).await?;
    let title = post.title.clone();
    dashboard.dispatch(Intent::DeletePost(post)).await;

    if args.yes || confirm(&title)? {
        run_intent(dashboard, Intent::ConfirmDelete).await;
    } else {
        info!(post_id = %args.id, "delete cancelled");
        dashboard.dispatch(Intent::CancelDelete).await;
    }

    print_dashboard(dashboard)?;
    fail_on_error_toast(dashboard.state())
}

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Dispatch an intent that reaches the backend, logging progress while the
/// requests are in flight.
async fn run_intent<G: PostsGateway>(dashboard: &mut Dashboard<G>, intent: Intent) {
    dashboard
        .dispatch_observed(intent, PROGRESS_INTERVAL, |busy| {
            info!(
                listing = busy.listing,
                counting = busy.counting,
                submitting = busy.submitting,
                deleting = busy.deleting,
                "waiting for backend"
            );
        })
        .await;
}

fn finish_submission<G: PostsGateway>(dashboard: &Dashboard<G>) -> Result<(), AppError> {
    print_dashboard(dashboard)?;
    if let Some(form) = dashboard.state().form()
        && !form.errors.is_empty()
    {
        return Err(AppError::ValidationFailed(form.errors.clone()));
    }
    fail_on_error_toast(dashboard.state())
}

fn fail_on_error_toast(state: &DashboardState) -> Result<(), AppError> {
    match state.toast() {
        Some(toast) if toast.kind == ToastKind::Error => {
            Err(AppError::action_failed(toast.text.clone()))
        }
        _ => Ok(()),
    }
}

fn print_dashboard<G: PostsGateway>(dashboard: &Dashboard<G>) -> Result<(), AppError> {
    let rendered = DashboardTemplate::build(dashboard.state(), dashboard.busy()).render()?;
    write_stdout(&rendered)
}

fn write_stdout(text: &str) -> Result<(), AppError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text.trim_end()).map_err(|err| AppError::output(err.to_string()))
}

fn confirm(title: &str) -> Result<bool, AppError> {
    let mut stderr = io::stderr().lock();
    write!(
        stderr,
        "Are you sure you want to delete the post \"{title}\"? This action cannot be undone. [y/N] "
    )
    .and_then(|()| stderr.flush())
    .map_err(|err| AppError::output(err.to_string()))?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|err| AppError::output(err.to_string()))?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
