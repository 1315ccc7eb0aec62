//! Root composition.
//!
//! [`AppReducer`] routes each [`AppAction`] to the slice that owns it and
//! focuses that slice's reducer on its own subtree, so a slice action can
//! only ever change its own slice.

use crate::api::BurgerApi;
use crate::environment::StorefrontEnvironment;
use crate::slices::{
    ConstructorAction, ConstructorReducer, ConstructorState, FeedAction, FeedReducer, FeedState,
    IngredientsAction, IngredientsReducer, IngredientsState, OrderAction, OrderReducer,
    OrderState, SessionAction, SessionReducer, SessionState,
};
use serde::Serialize;
use stellar_burger_core::composition::{scope_reducer, ScopedReducer};
use stellar_burger_core::effect::Effect;
use stellar_burger_core::reducer::Reducer;
use stellar_burger_core::SmallVec;

/// The whole state tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppState {
    /// Ingredient catalog
    pub ingredients: IngredientsState,
    /// Burger under construction
    pub constructor: ConstructorState,
    /// Order on screen and order history
    pub order: OrderState,
    /// Public order feed
    pub feed: FeedState,
    /// User session
    pub session: SessionState,
}

/// Any slice action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Catalog action
    Ingredients(IngredientsAction),
    /// Constructor action
    Constructor(ConstructorAction),
    /// Order action
    Order(OrderAction),
    /// Feed action
    Feed(FeedAction),
    /// Session action
    Session(SessionAction),
}

impl AppAction {
    /// Name of the owning slice.
    #[must_use]
    pub const fn slice(&self) -> &'static str {
        match self {
            Self::Ingredients(_) => "ingredients",
            Self::Constructor(_) => "constructor",
            Self::Order(_) => "order",
            Self::Feed(_) => "feed",
            Self::Session(_) => "session",
        }
    }

    /// Name of the slice action variant.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ingredients(action) => action.name(),
            Self::Constructor(action) => action.name(),
            Self::Order(action) => action.name(),
            Self::Feed(action) => action.name(),
            Self::Session(action) => action.name(),
        }
    }

    /// Whether the action settles a request.
    #[must_use]
    pub const fn is_outcome(&self) -> bool {
        match self {
            Self::Ingredients(action) => action.is_outcome(),
            Self::Constructor(action) => action.is_outcome(),
            Self::Order(action) => action.is_outcome(),
            Self::Feed(action) => action.is_outcome(),
            Self::Session(action) => action.is_outcome(),
        }
    }
}

impl From<IngredientsAction> for AppAction {
    fn from(action: IngredientsAction) -> Self {
        Self::Ingredients(action)
    }
}

impl From<ConstructorAction> for AppAction {
    fn from(action: ConstructorAction) -> Self {
        Self::Constructor(action)
    }
}

impl From<OrderAction> for AppAction {
    fn from(action: OrderAction) -> Self {
        Self::Order(action)
    }
}

impl From<FeedAction> for AppAction {
    fn from(action: FeedAction) -> Self {
        Self::Feed(action)
    }
}

impl From<SessionAction> for AppAction {
    fn from(action: SessionAction) -> Self {
        Self::Session(action)
    }
}

/// Root reducer.
#[derive(Clone)]
pub struct AppReducer<A>
where
    A: BurgerApi,
{
    ingredients: ScopedReducer<AppState, AppAction, IngredientsReducer<A>>,
    constructor: ScopedReducer<AppState, AppAction, ConstructorReducer<A>>,
    order: ScopedReducer<AppState, AppAction, OrderReducer<A>>,
    feed: ScopedReducer<AppState, AppAction, FeedReducer<A>>,
    session: ScopedReducer<AppState, AppAction, SessionReducer<A>>,
}

impl<A> AppReducer<A>
where
    A: BurgerApi,
{
    /// Compose the five slice reducers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ingredients: scope_reducer(
                IngredientsReducer::new(),
                |state: &mut AppState| &mut state.ingredients,
                AppAction::Ingredients,
            ),
            constructor: scope_reducer(
                ConstructorReducer::new(),
                |state: &mut AppState| &mut state.constructor,
                AppAction::Constructor,
            ),
            order: scope_reducer(
                OrderReducer::new(),
                |state: &mut AppState| &mut state.order,
                AppAction::Order,
            ),
            feed: scope_reducer(
                FeedReducer::new(),
                |state: &mut AppState| &mut state.feed,
                AppAction::Feed,
            ),
            session: scope_reducer(
                SessionReducer::new(),
                |state: &mut AppState| &mut state.session,
                AppAction::Session,
            ),
        }
    }
}

impl<A> Default for AppReducer<A>
where
    A: BurgerApi,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Reducer for AppReducer<A>
where
    A: BurgerApi,
{
    type State = AppState;
    type Action = AppAction;
    type Environment = StorefrontEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::trace!(slice = action.slice(), action = action.name(), "reducing");
        match action {
            AppAction::Ingredients(action) => self.ingredients.reduce_scoped(state, action, env),
            AppAction::Constructor(action) => self.constructor.reduce_scoped(state, action, env),
            AppAction::Order(action) => self.order.reduce_scoped(state, action, env),
            AppAction::Feed(action) => self.feed.reduce_scoped(state, action, env),
            AppAction::Session(action) => self.session.reduce_scoped(state, action, env),
        }
    }
}
