//! postdesk: command-line admin dashboard for a blog post backend.
#![deny(clippy::all, clippy::pedantic)]

mod handlers;

use std::process;

use postdesk::{
    application::{dashboard::Dashboard, error::AppError},
    config,
    infra::{http::HttpPostsGateway, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, summary = error.presentation_message(), "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, summary = error.presentation_message(), "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    let gateway = HttpPostsGateway::new(&settings.api.base_url)?;
    let state = handlers::initial_state(&cli_args.command);
    let mut dashboard = Dashboard::with_state(gateway, state);

    handlers::handle(&mut dashboard, cli_args.command).await
}
