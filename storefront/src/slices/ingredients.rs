//! Ingredient catalog slice.
//!
//! The catalog is fetched once on startup and read-only afterwards. It
//! starts out `Loading` so that the first render shows a spinner instead
//! of an empty menu.

use crate::api::BurgerApi;
use crate::environment::StorefrontEnvironment;
use crate::error::ApiError;
use crate::types::Ingredient;
use serde::Serialize;
use std::marker::PhantomData;
use stellar_burger_core::effect::Effect;
use stellar_burger_core::lifecycle::{Lifecycle, LifecycleSlice, Request, RequestStatus};
use stellar_burger_core::reducer::Reducer;
use stellar_burger_core::{smallvec, SmallVec};
use stellar_burger_macros::Action;

/// Catalog state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientsState {
    ingredients: Vec<Ingredient>,
    lifecycle: Lifecycle,
}

impl IngredientsState {
    /// Every ingredient, in backend order.
    #[must_use]
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Whether the catalog is being fetched.
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

impl Default for IngredientsState {
    fn default() -> Self {
        Self {
            ingredients: Vec::new(),
            lifecycle: Lifecycle::loading(),
        }
    }
}

impl LifecycleSlice for IngredientsState {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

/// Catalog actions.
#[derive(Action, Debug, Clone, PartialEq, Eq)]
pub enum IngredientsAction {
    /// Load the catalog.
    #[intent]
    FetchIngredients,

    /// The catalog request settled.
    #[outcome]
    IngredientsFetched(Result<Vec<Ingredient>, String>),
}

const FETCH_INGREDIENTS: Request<IngredientsState, Vec<Ingredient>> =
    Request::new("fetch_ingredients")
        .on_begin(clear_catalog)
        .on_success(replace_catalog)
        .on_failure(drop_catalog);

fn clear_catalog(state: &mut IngredientsState) {
    state.ingredients.clear();
}

fn drop_catalog(state: &mut IngredientsState, _message: &str) {
    state.ingredients.clear();
}

fn replace_catalog(state: &mut IngredientsState, ingredients: Vec<Ingredient>) {
    tracing::debug!(count = ingredients.len(), "catalog loaded");
    state.ingredients = ingredients;
}

/// Catalog reducer.
#[derive(Debug, Clone)]
pub struct IngredientsReducer<A> {
    _phantom: PhantomData<A>,
}

impl<A> IngredientsReducer<A> {
    /// Create a new catalog reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<A> Default for IngredientsReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Reducer for IngredientsReducer<A>
where
    A: BurgerApi,
{
    type State = IngredientsState;
    type Action = IngredientsAction;
    type Environment = StorefrontEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            IngredientsAction::FetchIngredients => {
                FETCH_INGREDIENTS.begin(state);
                let api = env.api.clone();
                smallvec![FETCH_INGREDIENTS.effect(
                    async move { api.fetch_ingredients().await.map_err(ApiError::into_message) },
                    IngredientsAction::IngredientsFetched,
                )]
            },
            IngredientsAction::IngredientsFetched(outcome) => {
                FETCH_INGREDIENTS.settle(state, outcome);
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mocks::{fixtures, MockBurgerApi};
    use stellar_burger_testing::{assertions, helpers::collect_actions, ReducerTest};

    type TestReducer = IngredientsReducer<MockBurgerApi>;

    fn env(api: MockBurgerApi) -> StorefrontEnvironment<MockBurgerApi> {
        StorefrontEnvironment::with_random_ids(api)
    }

    fn loaded() -> IngredientsState {
        IngredientsState {
            ingredients: fixtures::catalog(),
            lifecycle: {
                let mut lifecycle = Lifecycle::idle();
                lifecycle.succeed();
                lifecycle
            },
        }
    }

    #[test]
    fn starts_loading_with_empty_catalog() {
        let state = IngredientsState::default();
        assert!(state.is_loading());
        assert!(state.ingredients().is_empty());
        assert_eq!(state.error_message(), None);
    }

    #[test]
    fn fetch_clears_catalog_and_starts_request() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(MockBurgerApi::new()))
            .given_state(loaded())
            .when_action(IngredientsAction::FetchIngredients)
            .then_state(|state| {
                assert!(state.ingredients().is_empty());
                assert!(state.is_loading());
                assert_eq!(state.error_message(), None);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn success_replaces_catalog_exactly() {
        let catalog = fixtures::catalog();
        ReducerTest::new(TestReducer::new())
            .with_env(env(MockBurgerApi::new()))
            .given_state(IngredientsState::default())
            .when_action(IngredientsAction::IngredientsFetched(Ok(catalog.clone())))
            .then_state(move |state| {
                assert_eq!(state.ingredients(), catalog.as_slice());
                assert_eq!(state.status(), RequestStatus::Succeeded);
                assert!(!state.is_loading());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn failure_records_error_and_leaves_catalog_empty() {
        ReducerTest::new(TestReducer::new())
            .with_env(env(MockBurgerApi::new()))
            .given_state(IngredientsState::default())
            .when_action(IngredientsAction::IngredientsFetched(Err(
                "Failed to fetch ingredients".to_string(),
            )))
            .then_state(|state| {
                assert!(state.ingredients().is_empty());
                assert_eq!(state.error_message(), Some("Failed to fetch ingredients"));
                assert!(!state.is_loading());
                assertions::assert_lifecycle_consistent(state);
            })
            .run();
    }

    #[test]
    fn late_failure_blanks_catalog_loaded_by_overlapping_fetch() {
        let reducer = TestReducer::new();
        let env = env(MockBurgerApi::new());
        let mut state = IngredientsState::default();

        for action in [
            IngredientsAction::FetchIngredients,
            IngredientsAction::FetchIngredients,
            IngredientsAction::IngredientsFetched(Ok(fixtures::catalog())),
        ] {
            let _ = reducer.reduce(&mut state, action, &env);
        }
        assert_eq!(state.ingredients().len(), fixtures::catalog().len());

        let _ = reducer.reduce(
            &mut state,
            IngredientsAction::IngredientsFetched(Err("network error".to_string())),
            &env,
        );

        assert!(state.ingredients().is_empty());
        assert_eq!(state.error_message(), Some("network error"));
        assertions::assert_lifecycle_consistent(&state);
    }

    #[tokio::test]
    async fn effect_settles_with_backend_catalog() {
        let api = MockBurgerApi::new().with_catalog(fixtures::catalog());
        let mut state = IngredientsState::default();
        let effects = TestReducer::new().reduce(
            &mut state,
            IngredientsAction::FetchIngredients,
            &env(api),
        );

        let actions = collect_actions(effects).await;
        assert_eq!(
            actions,
            vec![IngredientsAction::IngredientsFetched(Ok(fixtures::catalog()))]
        );
    }
}
