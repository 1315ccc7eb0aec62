//! Order slice.
//!
//! Holds the order on screen (just placed, or looked up by number) and the
//! signed-in user's order history. All three requests share one lifecycle,
//! and none of them clears data the others loaded.

use crate::api::BurgerApi;
use crate::environment::StorefrontEnvironment;
use crate::error::ApiError;
use crate::types::{IngredientId, Order};
use serde::Serialize;
use std::marker::PhantomData;
use stellar_burger_core::effect::Effect;
use stellar_burger_core::lifecycle::{Lifecycle, LifecycleSlice, Request, RequestStatus};
use stellar_burger_core::reducer::Reducer;
use stellar_burger_core::{smallvec, SmallVec};
use stellar_burger_macros::Action;

/// Message recorded when an empty order is submitted.
pub const EMPTY_ORDER_MESSAGE: &str = "Order must contain at least one ingredient";

/// Order state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderState {
    orders: Vec<Order>,
    order: Option<Order>,
    lifecycle: Lifecycle,
}

impl OrderState {
    /// The signed-in user's orders.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The order on screen.
    #[must_use]
    pub const fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    /// Whether a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lifecycle.is_loading()
    }

    /// Message of the last failed request.
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

impl LifecycleSlice for OrderState {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

/// Order actions.
#[derive(Action, Debug, Clone, PartialEq, Eq)]
pub enum OrderAction {
    /// Place an order for the ingredient sequence.
    #[intent]
    SubmitOrder {
        /// Bun, fillings, bun
        ingredients: Vec<IngredientId>,
    },

    /// The order submission settled.
    #[outcome]
    OrderSubmitted(Result<Order, String>),

    /// Look up an order by number.
    #[intent]
    FetchOrderByNumber {
        /// Server-assigned number
        number: u64,
    },

    /// The lookup settled.
    #[outcome]
    OrderFetched(Result<Order, String>),

    /// Load the signed-in user's history.
    #[intent]
    FetchOrders,

    /// The history request settled.
    #[outcome]
    OrdersFetched(Result<Vec<Order>, String>),

    /// Show an order already in hand.
    #[intent]
    SetActiveOrder(Order),

    /// Close the order on screen.
    #[intent]
    ClearActiveOrder,
}

const SUBMIT_ORDER: Request<OrderState, Order> =
    Request::new("submit_order").on_success(show_order);

const FETCH_ORDER_BY_NUMBER: Request<OrderState, Order> =
    Request::new("fetch_order_by_number").on_success(show_order);

const FETCH_ORDERS: Request<OrderState, Vec<Order>> =
    Request::new("fetch_orders").on_success(replace_history);

fn show_order(state: &mut OrderState, order: Order) {
    state.order = Some(order);
}

fn replace_history(state: &mut OrderState, orders: Vec<Order>) {
    state.orders = orders;
}

/// Order reducer.
#[derive(Debug, Clone)]
pub struct OrderReducer<A> {
    _phantom: PhantomData<A>,
}

impl<A> OrderReducer<A> {
    /// Create a new order reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<A> Default for OrderReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Reducer for OrderReducer<A>
where
    A: BurgerApi,
{
    type State = OrderState;
    type Action = OrderAction;
    type Environment = StorefrontEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // Rejected locally, no request is made
            OrderAction::SubmitOrder { ingredients } if ingredients.is_empty() => {
                tracing::warn!("empty order submitted");
                SUBMIT_ORDER.settle(state, Err(EMPTY_ORDER_MESSAGE.to_string()));
                smallvec![Effect::None]
            },
            OrderAction::SubmitOrder { ingredients } => {
                SUBMIT_ORDER.begin(state);
                let api = env.api.clone();
                smallvec![SUBMIT_ORDER.effect(
                    async move {
                        api.submit_order(ingredients)
                            .await
                            .map_err(ApiError::into_message)
                    },
                    OrderAction::OrderSubmitted,
                )]
            },
            OrderAction::OrderSubmitted(outcome) => {
                SUBMIT_ORDER.settle(state, outcome);
                smallvec![Effect::None]
            },
            OrderAction::FetchOrderByNumber { number } => {
                FETCH_ORDER_BY_NUMBER.begin(state);
                let api = env.api.clone();
                smallvec![FETCH_ORDER_BY_NUMBER.effect(
                    async move {
                        api.fetch_order_by_number(number)
                            .await
                            .map_err(ApiError::into_message)
                    },
                    OrderAction::OrderFetched,
                )]
            },
            OrderAction::OrderFetched(outcome) => {
                FETCH_ORDER_BY_NUMBER.settle(state, outcome);
                smallvec![Effect::None]
            },
            OrderAction::FetchOrders => {
                FETCH_ORDERS.begin(state);
                let api = env.api.clone();
                smallvec![FETCH_ORDERS.effect(
                    async move { api.fetch_user_orders().await.map_err(ApiError::into_message) },
                    OrderAction::OrdersFetched,
                )]
            },
            OrderAction::OrdersFetched(outcome) => {
                FETCH_ORDERS.settle(state, outcome);
                smallvec![Effect::None]
            },
            OrderAction::SetActiveOrder(order) => {
                state.order = Some(order);
                smallvec![Effect::None]
            },
            OrderAction::ClearActiveOrder => {
                state.order = None;
                smallvec![Effect::None]
            },
        }
    }
}
