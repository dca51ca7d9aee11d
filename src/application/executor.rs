//! Request executor: wraps one backend call at a time and keeps the
//! busy/error/data triple the dashboard renders from.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use postdesk_api_types::ApiResponse;

use super::gateway::GatewayError;

pub const GENERIC_ERROR: &str = "An error occurred";

/// Shareable view of an executor's busy state.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn engage(&self) -> BusyGuard {
        self.0.store(true, Ordering::Release);
        BusyGuard(self.0.clone())
    }
}

/// Clears the flag on drop, so a dropped future cannot leave it stuck.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct RequestExecutor<T> {
    label: &'static str,
    fallback: &'static str,
    busy: BusyFlag,
    error: Option<String>,
    data: Option<T>,
}

impl<T: Clone> RequestExecutor<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            fallback: GENERIC_ERROR,
            busy: BusyFlag::default(),
            error: None,
            data: None,
        }
    }

    /// Message stored when a failure carries no text of its own.
    pub fn with_fallback(mut self, fallback: &'static str) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn fallback(&self) -> &'static str {
        self.fallback
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Await `request` and fold its outcome into this executor.
    ///
    /// Success stores and returns the payload. A logical failure or a
    /// transport fault stores a message (this executor's fallback when the
    /// failure has none), returns `None`, and leaves the previously stored
    /// payload untouched.
    pub async fn execute<Fut>(&mut self, request: Fut) -> Option<T>
    where
        Fut: Future<Output = Result<ApiResponse<T>, GatewayError>>,
    {
        let _busy = self.busy.engage();
        self.error = None;

        match request.await {
            Ok(ApiResponse {
                success: true,
                data: Some(data),
                ..
            }) => {
                debug!(executor = self.label, "request succeeded");
                self.data = Some(data.clone());
                Some(data)
            }
            Ok(ApiResponse {
                success: true,
                data: None,
                ..
            }) => self.fail("response did not include data".to_string()),
            Ok(ApiResponse { error, .. }) => {
                let message = error
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| self.fallback.to_string());
                self.fail(message)
            }
            Err(err) => {
                let message = err
                    .most_specific_message()
                    .unwrap_or_else(|| self.fallback.to_string());
                self.fail(message)
            }
        }
    }

    fn fail(&mut self, message: String) -> Option<T> {
        warn!(executor = self.label, error = %message, "request failed");
        self.error = Some(message);
        None
    }
}
