//! Request lifecycle shared by every slice.
//!
//! A slice that talks to the backend embeds one [`Lifecycle`] and wires each
//! of its asynchronous operations through a [`Request`] descriptor:
//!
//! - **begin**: status becomes `Loading`, any previous error is cleared
//! - **succeed**: status becomes `Succeeded`, the payload is merged into the slice
//! - **fail**: status becomes `Failed`, the message is recorded verbatim
//!
//! The status and the error message live behind private fields, so the two
//! invariants below hold for every reachable state:
//!
//! - `status == Loading` implies no error message
//! - an error message implies `status == Failed`
//!
//! There is no retry and no de-duplication at this layer. Two overlapping
//! requests each settle on their own and the last settlement wins.
//!
//! # Example
//!
//! ```
//! use stellar_burger_core::lifecycle::{Lifecycle, LifecycleSlice, Request, RequestStatus};
//!
//! #[derive(Default)]
//! struct Prices {
//!     values: Vec<u32>,
//!     lifecycle: Lifecycle,
//! }
//!
//! impl LifecycleSlice for Prices {
//!     fn lifecycle(&self) -> &Lifecycle {
//!         &self.lifecycle
//!     }
//!     fn lifecycle_mut(&mut self) -> &mut Lifecycle {
//!         &mut self.lifecycle
//!     }
//! }
//!
//! const FETCH_PRICES: Request<Prices, Vec<u32>> =
//!     Request::new("fetch_prices").on_success(|state, values| state.values = values);
//!
//! let mut prices = Prices::default();
//! FETCH_PRICES.begin(&mut prices);
//! assert!(prices.lifecycle.is_loading());
//!
//! FETCH_PRICES.settle(&mut prices, Ok(vec![2, 3]));
//! assert_eq!(prices.values, vec![2, 3]);
//! assert_eq!(prices.lifecycle.status(), RequestStatus::Succeeded);
//! ```

use crate::effect::Effect;
use serde::Serialize;
use std::future::Future;

/// Message recorded when a rejection carries no usable text.
pub const FALLBACK_ERROR_MESSAGE: &str = "Unknown error";

/// Progress of an asynchronous request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Nothing requested yet (or reset)
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request settled successfully
    Succeeded,
    /// The last request was rejected
    Failed,
}

/// Status plus error message of a slice's last request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Lifecycle {
    status: RequestStatus,
    error_message: Option<String>,
}

impl Lifecycle {
    /// A lifecycle that has not started.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            status: RequestStatus::Idle,
            error_message: None,
        }
    }

    /// A lifecycle that starts out loading.
    ///
    /// Slices whose data is fetched on first render start here, so the UI
    /// shows a spinner rather than an empty panel before the first fetch.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            status: RequestStatus::Loading,
            error_message: None,
        }
    }

    /// Mark a request as started.
    pub fn begin(&mut self) {
        self.status = RequestStatus::Loading;
        self.error_message = None;
    }

    /// Mark the request as settled successfully.
    pub fn succeed(&mut self) {
        self.status = RequestStatus::Succeeded;
        self.error_message = None;
    }

    /// Mark the request as rejected with `message`.
    ///
    /// A blank message is replaced with [`FALLBACK_ERROR_MESSAGE`].
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = RequestStatus::Failed;
        self.error_message = Some(if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        });
    }

    /// Return to `Idle` with no error.
    pub fn reset(&mut self) {
        *self = Self::idle();
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::Loading
    }

    /// Message of the last rejection, if the last settlement was a rejection.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether both lifecycle invariants hold.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let loading_without_error = !self.is_loading() || self.error_message.is_none();
        let error_only_when_failed =
            self.error_message.is_none() || self.status == RequestStatus::Failed;
        loading_without_error && error_only_when_failed
    }
}

/// Slice state that owns a [`Lifecycle`].
pub trait LifecycleSlice {
    /// Read access to the slice's lifecycle.
    fn lifecycle(&self) -> &Lifecycle;

    /// Write access to the slice's lifecycle.
    fn lifecycle_mut(&mut self) -> &mut Lifecycle;
}

/// Descriptor of one asynchronous operation of a slice.
///
/// Pairs the shared lifecycle transitions with the slice-specific merge
/// rules. Slices declare one `const` descriptor per operation and call
/// [`Request::begin`] on the intent and [`Request::settle`] on the outcome.
///
/// # Type Parameters
///
/// - `S`: The slice state
/// - `T`: The payload of a successful settlement
pub struct Request<S, T> {
    name: &'static str,
    on_begin: fn(&mut S),
    on_success: fn(&mut S, T),
    on_failure: fn(&mut S, &str),
}

impl<S, T> Request<S, T> {
    /// Create a descriptor whose merge rules do nothing.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            on_begin: keep_on_begin::<S>,
            on_success: keep_on_success::<S, T>,
            on_failure: keep_on_failure::<S>,
        }
    }

    /// Extra slice update applied when the request begins.
    #[must_use]
    pub const fn on_begin(mut self, f: fn(&mut S)) -> Self {
        self.on_begin = f;
        self
    }

    /// Merge rule for a successful payload.
    #[must_use]
    pub const fn on_success(mut self, f: fn(&mut S, T)) -> Self {
        self.on_success = f;
        self
    }

    /// Extra slice update applied when the request is rejected.
    #[must_use]
    pub const fn on_failure(mut self, f: fn(&mut S, &str)) -> Self {
        self.on_failure = f;
        self
    }

    /// Operation name, used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

fn keep_on_begin<S>(_: &mut S) {}

fn keep_on_success<S, T>(_: &mut S, _: T) {}

fn keep_on_failure<S>(_: &mut S, _: &str) {}

impl<S: LifecycleSlice, T> Request<S, T> {
    /// Apply the `begin` transition.
    pub fn begin(&self, state: &mut S) {
        tracing::debug!(request = self.name, "request started");
        state.lifecycle_mut().begin();
        (self.on_begin)(state);
    }

    /// Apply the `succeed` or `fail` transition for a settled request.
    pub fn settle(&self, state: &mut S, outcome: Result<T, String>) {
        match outcome {
            Ok(payload) => {
                tracing::debug!(request = self.name, "request fulfilled");
                state.lifecycle_mut().succeed();
                (self.on_success)(state, payload);
            },
            Err(message) => {
                tracing::debug!(request = self.name, error = %message, "request rejected");
                state.lifecycle_mut().fail(message);
                if let Some(recorded) = state.lifecycle().error_message().map(str::to_owned) {
                    (self.on_failure)(state, &recorded);
                }
            },
        }
    }
}

impl<S, T> Request<S, T>
where
    T: Send + 'static,
{
    /// Build the effect that awaits `operation` and feeds its settlement back.
    ///
    /// `embed` wraps the settlement into the slice's outcome action.
    pub fn effect<A, F>(&self, operation: F, embed: fn(Result<T, String>) -> A) -> Effect<A>
    where
        A: Send + 'static,
        F: Future<Output = Result<T, String>> + Send + 'static,
    {
        let name = self.name;
        Effect::Future(Box::pin(async move {
            let outcome = operation.await;
            tracing::trace!(request = name, ok = outcome.is_ok(), "request settled");
            Some(embed(outcome))
        }))
    }
}

impl<S, T> Clone for Request<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, T> Copy for Request<S, T> {}

impl<S, T> std::fmt::Debug for Request<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request").field("name", &self.name).finish_non_exhaustive()
    }
}
