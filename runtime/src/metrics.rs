//! Metric names recorded by the store runtime.
//!
//! The runtime records through the `metrics` facade only. Installing a
//! recorder (Prometheus, statsd, an in-memory debugging recorder) is left to
//! the embedding application; without one every call is a no-op.

use metrics::{describe_counter, describe_histogram};

/// Actions processed by a store (intents and fed-back outcomes).
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Actions rejected because the store was shutting down.
pub const ACTIONS_REJECTED: &str = "store.actions.rejected";

/// Time spent inside the reducer for one action.
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Number of effects returned by one reducer call.
pub const EFFECTS_PER_ACTION: &str = "store.effects.count";

/// Effects started, labelled by `type`.
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Shutdowns that drained every in-flight effect.
pub const SHUTDOWN_COMPLETED: &str = "store.shutdown.completed";

/// Shutdowns that gave up with effects still running.
pub const SHUTDOWN_TIMEOUT: &str = "store.shutdown.timeout";

/// Register descriptions for every store metric.
///
/// Call once after installing a recorder.
pub fn describe_store_metrics() {
    describe_counter!(ACTIONS_TOTAL, "Total number of actions processed by the store");
    describe_counter!(
        ACTIONS_REJECTED,
        "Actions rejected because the store was shutting down"
    );
    describe_histogram!(
        REDUCER_DURATION,
        metrics::Unit::Seconds,
        "Time spent applying one action in the reducer"
    );
    describe_histogram!(
        EFFECTS_PER_ACTION,
        metrics::Unit::Count,
        "Number of effects returned by one reducer call"
    );
    describe_counter!(EFFECTS_EXECUTED, "Effects started by the runtime, by type");
    describe_counter!(SHUTDOWN_COMPLETED, "Graceful shutdowns that drained all effects");
    describe_counter!(SHUTDOWN_TIMEOUT, "Graceful shutdowns that timed out");
}
