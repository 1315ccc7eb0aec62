//! Public order feed slice.
//!
//! The feed is replaced wholesale on every successful fetch and kept as-is
//! when a refresh fails. While live updates are on, every settled fetch
//! schedules the next poll.

use crate::api::BurgerApi;
use crate::environment::StorefrontEnvironment;
use crate::error::ApiError;
use crate::types::{FeedSnapshot, Order};
use serde::Serialize;
use std::marker::PhantomData;
use std::time::Duration;
use stellar_burger_core::effect::Effect;
use stellar_burger_core::lifecycle::{Lifecycle, LifecycleSlice, Request, RequestStatus};
use stellar_burger_core::reducer::Reducer;
use stellar_burger_core::{delay, smallvec, SmallVec};
use stellar_burger_macros::Action;

/// Feed state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedState {
    snapshot: FeedSnapshot,
    #[serde(skip)]
    live: Option<Duration>,
    lifecycle: Lifecycle,
}

impl FeedState {
    /// Orders, most recent first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.snapshot.orders
    }

    /// Orders ever placed.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.snapshot.total
    }

    /// Orders placed today.
    #[must_use]
    pub const fn total_today(&self) -> u64 {
        self.snapshot.total_today
    }

    /// The whole snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &FeedSnapshot {
        &self.snapshot
    }

    /// Poll interval while live updates are on.
    #[must_use]
    pub const fn live_interval(&self) -> Option<Duration> {
        self.live
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lifecycle.is_loading()
    }

    /// Message of the last failed fetch.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.lifecycle.error_message()
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.lifecycle.status()
    }
}

impl LifecycleSlice for FeedState {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

/// Feed actions.
#[derive(Action, Debug, Clone, PartialEq, Eq)]
pub enum FeedAction {
    /// Refresh the feed once.
    #[intent]
    FetchFeed,

    /// The feed request settled.
    #[outcome]
    FeedFetched(Result<FeedSnapshot, String>),

    /// Fetch now and keep polling every `interval`.
    #[intent]
    StartLiveUpdates {
        /// Delay between a settled fetch and the next one
        interval: Duration,
    },

    /// Stop polling. A poll already scheduled is ignored when it fires.
    #[intent]
    StopLiveUpdates,

    /// Scheduled poll.
    PollTick,
}

const FETCH_FEED: Request<FeedState, FeedSnapshot> =
    Request::new("fetch_feed").on_success(replace_snapshot);

fn replace_snapshot(state: &mut FeedState, snapshot: FeedSnapshot) {
    state.snapshot = snapshot;
}

/// Feed reducer.
#[derive(Debug, Clone)]
pub struct FeedReducer<A> {
    _phantom: PhantomData<A>,
}

impl<A> FeedReducer<A> {
    /// Create a new feed reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<A> Default for FeedReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> FeedReducer<A>
where
    A: BurgerApi,
{
    fn fetch(state: &mut FeedState, env: &StorefrontEnvironment<A>) -> Effect<FeedAction> {
        FETCH_FEED.begin(state);
        let api = env.api.clone();
        FETCH_FEED.effect(
            async move { api.fetch_feed().await.map_err(ApiError::into_message) },
            FeedAction::FeedFetched,
        )
    }
}

impl<A> Reducer for FeedReducer<A>
where
    A: BurgerApi,
{
    type State = FeedState;
    type Action = FeedAction;
    type Environment = StorefrontEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            FeedAction::FetchFeed => smallvec![Self::fetch(state, env)],
            FeedAction::FeedFetched(outcome) => {
                FETCH_FEED.settle(state, outcome);
                match state.live {
                    Some(interval) => smallvec![delay! {
                        duration: interval,
                        action: FeedAction::PollTick
                    }],
                    None => smallvec![Effect::None],
                }
            },
            FeedAction::StartLiveUpdates { interval } => {
                let already_live = state.live.replace(interval).is_some();
                if already_live {
                    tracing::debug!(?interval, "live feed interval changed");
                    smallvec![Effect::None]
                } else {
                    tracing::debug!(?interval, "live feed started");
                    smallvec![Self::fetch(state, env)]
                }
            },
            FeedAction::StopLiveUpdates => {
                if state.live.take().is_some() {
                    tracing::debug!("live feed stopped");
                }
                smallvec![Effect::None]
            },
            FeedAction::PollTick => {
                if state.live.is_some() {
                    smallvec![Self::fetch(state, env)]
                } else {
                    tracing::debug!("poll after live feed stopped, ignoring");
                    smallvec![Effect::None]
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{fixtures, MockBurgerApi, Operation};
    use crate::types::OrderStatus;
    use stellar_burger_testing::{assertions, helpers::collect_actions, ReducerTest};

    type TestReducer = FeedReducer<MockBurgerApi>;

    fn env(api: MockBurgerApi) -> StorefrontEnvironment<MockBurgerApi> {
        StorefrontEnvironment::with_random_ids(api)
    }

    fn loaded() -> FeedState {
        FeedState {
            snapshot: fixtures::feed(),
            ..FeedState::default()
        }
    }

    fn live(interval: Duration) -> FeedState {
        FeedState {
            live: Some(interval),
            ..loaded()
        }
    }

    #[test]
    fn fulfilled_feed_is_exposed_exactly() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(MockBurgerApi::new()))
            .given_state(FeedState::default())
            .when_action(FeedAction::FeedFetched(Ok(fixtures::feed())))
            .then_state(|state| {
                assert_eq!(state.orders(), fixtures::feed().orders.as_slice());
                assert_eq!(state.total(), 800);
                assert_eq!(state.total_today(), 37);
                assert!(!state.is_loading());
                assert_eq!(state.error_message(), None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn rejected_feed_keeps_previous_snapshot() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(MockBurgerApi::new()))
            .given_state(loaded())
            .when_action(FeedAction::FeedFetched(Err("network error".to_string())))
            .then_state(|state| {
                assert_eq!(state.error_message(), Some("network error"));
                assert_eq!(state.orders().len(), 2);
                assert_eq!(state.total(), 800);
            })
            .run();
    }

    #[test]
    fn fetch_keeps_snapshot_while_loading() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(MockBurgerApi::new()))
            .given_state(loaded())
            .when_action(FeedAction::FetchFeed)
            .then_state(|state| {
                assert!(state.is_loading());
                assert_eq!(state.total(), 800);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn start_live_fetches_immediately() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(MockBurgerApi::new()))
            .given_state(FeedState::default())
            .when_action(FeedAction::StartLiveUpdates {
                interval: Duration::from_secs(5),
            })
            .then_state(|state| {
                assert_eq!(state.live_interval(), Some(Duration::from_secs(5)));
                assert!(state.is_loading());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn restarting_live_only_changes_interval() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(MockBurgerApi::new()))
            .given_state(live(Duration::from_secs(5)))
            .when_action(FeedAction::StartLiveUpdates {
                interval: Duration::from_secs(1),
            })
            .then_state(|state| {
                assert_eq!(state.live_interval(), Some(Duration::from_secs(1)));
                assert!(!state.is_loading());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn settled_fetch_schedules_next_poll_while_live() {
        for outcome in [Ok(fixtures::feed()), Err("network error".to_string())] {
            ReducerTest::new(TestReducer::new())
                .with_env(env(MockBurgerApi::new()))
                .given_state(live(Duration::from_millis(250)))
                .when_action(FeedAction::FeedFetched(outcome))
                .then_effects(|effects| match effects {
                    [Effect::Delay { duration, action }] => {
                        assert_eq!(*duration, Duration::from_millis(250));
                        assert_eq!(**action, FeedAction::PollTick);
                    },
                    other => unreachable!("expected one delay, got {other:?}"),
                })
                .run();
        }
    }

    #[test]
    fn poll_after_stop_is_ignored() {
        let env = env(MockBurgerApi::new());
        let mut state = live(Duration::from_secs(5));

        let effects = TestReducer::new().reduce(&mut state, FeedAction::StopLiveUpdates, &env);
        assertions::assert_no_effects(&effects);
        assert_eq!(state.live_interval(), None);

        let before = state.clone();
        let effects = TestReducer::new().reduce(&mut state, FeedAction::PollTick, &env);
        assertions::assert_no_effects(&effects);
        assert_eq!(state, before);
    }

    #[test]
    fn poll_while_live_fetches() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(MockBurgerApi::new()))
            .given_state(live(Duration::from_secs(5)))
            .when_action(FeedAction::PollTick)
            .then_state(|state| assert!(state.is_loading()))
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[tokio::test]
    async fn poll_picks_up_new_orders() {
        let api = MockBurgerApi::new().with_feed(fixtures::feed());
        let env = env(api.clone());
        let mut state = live(Duration::from_secs(5));

        let mut newer = fixtures::feed();
        newer.orders.insert(0, fixtures::order(1003, OrderStatus::Created));
        newer.total = 801;
        newer.total_today = 38;
        api.set_feed(newer.clone());

        let effects = TestReducer::new().reduce(&mut state, FeedAction::PollTick, &env);
        for action in collect_actions(effects).await {
            let _ = TestReducer::new().reduce(&mut state, action, &env);
        }

        assert_eq!(state.snapshot(), &newer);
    }

    #[tokio::test]
    async fn scripted_network_failure_reaches_slice() {
        let api = MockBurgerApi::new();
        api.fail_next(Operation::FetchFeed, ApiError::network("network error"));
        let env = env(api);
        let mut state = loaded();

        let effects = TestReducer::new().reduce(&mut state, FeedAction::FetchFeed, &env);
        for action in collect_actions(effects).await {
            let _ = TestReducer::new().reduce(&mut state, action, &env);
        }

        assert_eq!(state.error_message(), Some("network error"));
        assert_eq!(state.total(), 800);
    }
}
