//! Reducer composition utilities
//!
//! The application state is a tree of slices. A root reducer matches on the
//! application action and hands each slice action to that slice's reducer,
//! focused on the slice's own subtree:
//!
//! - **`scope_reducer`**: Focus a slice reducer on a subset of state and lift
//!   its effects into the parent action type
//!
//! # Example
//!
//! ```
//! use stellar_burger_core::{smallvec, Effect, Reducer, SmallVec};
//! use stellar_burger_core::composition::scope_reducer;
//!
//! #[derive(Clone, Default)]
//! struct CounterState {
//!     count: i32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     counter: CounterState,
//!     title: String,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum AppAction {
//!     Counter(CounterAction),
//! }
//!
//! let scoped = scope_reducer(
//!     CounterReducer,
//!     |app: &mut AppState| &mut app.counter,
//!     AppAction::Counter,
//! );
//!
//! let mut state = AppState::default();
//! let _ = scoped.reduce_scoped(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.counter.count, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Scopes a slice reducer to one subtree of a larger state.
///
/// # Type Parameters
///
/// - `S`: The parent state type
/// - `A`: The parent action type
/// - `R`: The slice reducer
///
/// # Arguments
///
/// - `reducer`: The slice reducer
/// - `state`: Lens from the parent state to the slice's subtree
/// - `embed`: Wraps a slice action into the parent action
pub fn scope_reducer<S, A, R>(
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    embed: fn(R::Action) -> A,
) -> ScopedReducer<S, A, R>
where
    R: Reducer,
{
    ScopedReducer {
        reducer,
        state,
        embed,
    }
}

/// A slice reducer focused on a subtree of the parent state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, A, R>
where
    R: Reducer,
{
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    embed: fn(R::Action) -> A,
}

impl<S, A, R> ScopedReducer<S, A, R>
where
    R: Reducer,
    R::Action: 'static,
    A: 'static,
{
    /// Run the slice reducer on its subtree and lift the resulting effects.
    ///
    /// Only the slice's subtree is handed to the slice reducer, so a slice
    /// can never touch another slice's state.
    pub fn reduce_scoped(
        &self,
        parent: &mut S,
        action: R::Action,
        env: &R::Environment,
    ) -> SmallVec<[Effect<A>; 4]> {
        let slice = (self.state)(parent);
        self.reducer
            .reduce(slice, action, env)
            .into_iter()
            .filter(|effect| !effect.is_none())
            .map(|effect| effect.map(self.embed))
            .collect()
    }
}

impl<S, A, R> Clone for ScopedReducer<S, A, R>
where
    R: Reducer + Clone,
{
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            state: self.state,
            embed: self.embed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smallvec;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct SubState {
        value: i32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum SubAction {
        Add(i32),
        Multiply(i32),
        AddLater(i32),
    }

    struct SubReducer;

    impl Reducer for SubReducer {
        type State = SubState;
        type Action = SubAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                SubAction::Add(n) => {
                    state.value += n;
                    smallvec![Effect::None]
                },
                SubAction::Multiply(n) => {
                    state.value *= n;
                    smallvec![Effect::None]
                },
                SubAction::AddLater(n) => smallvec![Effect::Delay {
                    duration: Duration::from_millis(1),
                    action: Box::new(SubAction::Add(n)),
                }],
            }
        }
    }

    #[derive(Clone, Default)]
    struct ParentState {
        sub: SubState,
        other: String,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum ParentAction {
        Sub(SubAction),
    }

    #[test]
    fn test_scope_reducer() {
        let scoped = scope_reducer(
            SubReducer,
            |parent: &mut ParentState| &mut parent.sub,
            ParentAction::Sub,
        );

        let mut state = ParentState {
            sub: SubState { value: 5 },
            other: "test".to_string(),
        };

        let _ = scoped.reduce_scoped(&mut state, SubAction::Add(3), &());
        assert_eq!(state.sub.value, 8);
        assert_eq!(state.other, "test");

        let _ = scoped.reduce_scoped(&mut state, SubAction::Multiply(2), &());
        assert_eq!(state.sub.value, 16);
        assert_eq!(state.other, "test");
    }

    #[test]
    fn test_scoped_effects_are_lifted() {
        let scoped = scope_reducer(
            SubReducer,
            |parent: &mut ParentState| &mut parent.sub,
            ParentAction::Sub,
        );
        let mut state = ParentState::default();

        let effects = scoped.reduce_scoped(&mut state, SubAction::AddLater(4), &());

        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::Delay { action, .. } => {
                assert_eq!(**action, ParentAction::Sub(SubAction::Add(4)));
            },
            other => unreachable!("unexpected effect {other:?}"),
        }
        assert_eq!(state.sub.value, 0);
    }

    #[test]
    fn test_scoped_none_effects_are_dropped() {
        let scoped = scope_reducer(
            SubReducer,
            |parent: &mut ParentState| &mut parent.sub,
            ParentAction::Sub,
        );
        let mut state = ParentState::default();

        let effects = scoped.reduce_scoped(&mut state, SubAction::Add(1), &());
        assert!(effects.is_empty());
    }
}
