//! # Stellar Burger Testing
//!
//! Testing utilities and helpers for the Stellar Burger state core.
//!
//! This crate provides:
//! - Deterministic implementations of environment traits
//! - A Given-When-Then harness for reducers
//! - Helpers that drive effects without a running store
//! - Assertion helpers for effects and request lifecycles
//!
//! ## Example
//!
//! ```ignore
//! use stellar_burger_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(FeedReducer::new())
//!     .with_env(test_environment())
//!     .given_state(FeedState::default())
//!     .when_action(FeedAction::FetchFeed)
//!     .then_state(|state| assert!(state.is_loading()))
//!     .then_effects(assertions::assert_has_future_effect)
//!     .run();
//! ```

use stellar_burger_core::environment::IdGenerator;

mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Deterministic implementations of environment traits
pub mod mocks {
    use super::IdGenerator;
    use std::sync::atomic::{AtomicU64, Ordering};
    use uuid::Uuid;

    /// Id generator that counts upwards from 1
    ///
    /// Produces `00000000-0000-0000-0000-000000000001`, then `...0002`, and
    /// so on, which keeps constructor keys predictable in assertions.
    ///
    /// # Example
    ///
    /// ```
    /// use stellar_burger_testing::mocks::SequentialIdGenerator;
    /// use stellar_burger_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.next_id().as_u128(), 1);
    /// assert_eq!(ids.next_id().as_u128(), 2);
    /// ```
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        issued: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose first id is 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                issued: AtomicU64::new(0),
            }
        }

        /// The id the `n`-th call (1-based) returns
        #[must_use]
        #[allow(clippy::cast_lossless)]
        pub const fn nth(n: u64) -> Uuid {
            Uuid::from_u128(n as u128)
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> Uuid {
            Uuid::from_u128(u128::from(self.issued.fetch_add(1, Ordering::SeqCst) + 1))
        }
    }
}

/// Helpers for driving effects by hand
pub mod helpers {
    use futures::future::join_all;
    use stellar_burger_core::effect::Effect;

    /// Run effects to completion and collect the actions they produce.
    ///
    /// `Future` effects are awaited concurrently. `Delay` effects yield their
    /// action immediately, without sleeping. Actions come back in the order
    /// the effects were declared.
    ///
    /// Produced actions are not fed back into anything; the caller decides
    /// whether to reduce them.
    pub async fn collect_actions<A, I>(effects: I) -> Vec<A>
    where
        A: Send + 'static,
        I: IntoIterator<Item = Effect<A>>,
    {
        join_all(effects.into_iter().map(|effect| async move {
            match effect {
                Effect::None => None,
                Effect::Future(fut) => fut.await,
                Effect::Delay { action, .. } => Some(*action),
            }
        }))
        .await
        .into_iter()
        .flatten()
        .collect()
    }
}

pub use mocks::SequentialIdGenerator;
