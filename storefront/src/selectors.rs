//! Read-only projections of [`AppState`].
//!
//! Selectors are plain functions grouped by slice. They never mutate and
//! never panic on missing data.

use crate::root::AppState;
use crate::types::{Ingredient, IngredientId, Order};
use serde::Serialize;

/// Catalog selectors.
pub mod ingredients {
    use super::{AppState, Ingredient, IngredientId};
    use crate::types::IngredientKind;

    /// Every ingredient.
    #[must_use]
    pub fn all(state: &AppState) -> &[Ingredient] {
        state.ingredients.ingredients()
    }

    /// Ingredients of one kind, in catalog order.
    #[must_use]
    pub fn by_kind(state: &AppState, kind: IngredientKind) -> Vec<&Ingredient> {
        all(state).iter().filter(|i| i.kind == kind).collect()
    }

    /// Lookup by id.
    #[must_use]
    pub fn by_id<'a>(state: &'a AppState, id: &IngredientId) -> Option<&'a Ingredient> {
        all(state).iter().find(|i| &i.id == id)
    }

    /// Whether the catalog is loading.
    #[must_use]
    pub fn is_loading(state: &AppState) -> bool {
        state.ingredients.is_loading()
    }

    /// Catalog error.
    #[must_use]
    pub fn error_message(state: &AppState) -> Option<&str> {
        state.ingredients.error_message()
    }
}

/// Constructor selectors.
pub mod constructor {
    use super::{AppState, Ingredient, IngredientId};
    use crate::types::ConstructorItem;

    /// The chosen bun.
    #[must_use]
    pub const fn bun(state: &AppState) -> Option<&Ingredient> {
        state.constructor.bun()
    }

    /// Fillings, top to bottom.
    #[must_use]
    pub fn fillings(state: &AppState) -> &[ConstructorItem] {
        state.constructor.fillings()
    }

    /// Price of the burger so far.
    #[must_use]
    pub fn total_price(state: &AppState) -> u64 {
        state.constructor.total_price()
    }

    /// Ids to submit, if the burger is complete.
    #[must_use]
    pub fn order_ingredients(state: &AppState) -> Option<Vec<IngredientId>> {
        state.constructor.order_ingredients()
    }

    /// Counter badge for a catalog card.
    #[must_use]
    pub fn count_of(state: &AppState, id: &IngredientId) -> usize {
        state.constructor.count_of(id)
    }
}

/// Order selectors.
pub mod order {
    use super::{AppState, Order};

    /// The order on screen.
    #[must_use]
    pub const fn active(state: &AppState) -> Option<&Order> {
        state.order.order()
    }

    /// The signed-in user's orders.
    #[must_use]
    pub fn history(state: &AppState) -> &[Order] {
        state.order.orders()
    }

    /// Whether an order request is in flight.
    #[must_use]
    pub fn is_loading(state: &AppState) -> bool {
        state.order.is_loading()
    }

    /// Last order error.
    #[must_use]
    pub fn error_message(state: &AppState) -> Option<&str> {
        state.order.error_message()
    }
}

/// Feed selectors.
pub mod feed {
    use super::{AppState, Order};
    use crate::types::OrderStatus;

    /// Feed orders, most recent first.
    #[must_use]
    pub fn orders(state: &AppState) -> &[Order] {
        state.feed.orders()
    }

    /// Orders ever placed.
    #[must_use]
    pub const fn total(state: &AppState) -> u64 {
        state.feed.total()
    }

    /// Orders placed today.
    #[must_use]
    pub const fn total_today(state: &AppState) -> u64 {
        state.feed.total_today()
    }

    /// Whether a feed fetch is in flight.
    #[must_use]
    pub fn is_loading(state: &AppState) -> bool {
        state.feed.is_loading()
    }

    /// Last feed error.
    #[must_use]
    pub fn error_message(state: &AppState) -> Option<&str> {
        state.feed.error_message()
    }

    /// Numbers of ready orders, at most `limit`.
    #[must_use]
    pub fn ready_numbers(state: &AppState, limit: usize) -> Vec<u64> {
        numbers_where(state, limit, |status| status == OrderStatus::Done)
    }

    /// Numbers of orders still cooking, at most `limit`.
    #[must_use]
    pub fn in_progress_numbers(state: &AppState, limit: usize) -> Vec<u64> {
        numbers_where(state, limit, |status| status != OrderStatus::Done)
    }

    /// Feed order by number.
    #[must_use]
    pub fn by_number(state: &AppState, number: u64) -> Option<&Order> {
        orders(state).iter().find(|order| order.number == number)
    }

    fn numbers_where(
        state: &AppState,
        limit: usize,
        keep: impl Fn(OrderStatus) -> bool,
    ) -> Vec<u64> {
        orders(state)
            .iter()
            .filter(|order| keep(order.status))
            .map(|order| order.number)
            .take(limit)
            .collect()
    }
}

/// Session selectors.
pub mod session {
    use super::AppState;
    use crate::types::User;

    /// The signed-in user.
    #[must_use]
    pub const fn user(state: &AppState) -> Option<&User> {
        state.session.user()
    }

    /// Whether session determination has settled.
    #[must_use]
    pub const fn is_auth_checked(state: &AppState) -> bool {
        state.session.is_auth_checked()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(state: &AppState) -> bool {
        state.session.is_authenticated()
    }

    /// Whether an auth request is in flight.
    #[must_use]
    pub fn is_loading(state: &AppState) -> bool {
        state.session.is_loading()
    }

    /// Last auth error.
    #[must_use]
    pub fn error_message(state: &AppState) -> Option<&str> {
        state.session.error_message()
    }
}

/// One ingredient of an order, with how often it appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    /// The ingredient
    pub ingredient: Ingredient,
    /// Occurrences in the order
    pub count: usize,
}

/// An order resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetails {
    /// Lines in order of first appearance
    pub lines: Vec<OrderLine>,
    /// Ids the catalog does not know, in order of first appearance
    pub missing: Vec<IngredientId>,
    /// Sum over known lines of price times count
    pub total_price: u64,
}

/// Resolve an order's ingredient ids against the catalog.
///
/// Unknown ids are listed in [`OrderDetails::missing`] and left out of the
/// price.
#[must_use]
pub fn order_details(order: &Order, catalog: &[Ingredient]) -> OrderDetails {
    let mut lines: Vec<OrderLine> = Vec::new();
    let mut missing: Vec<IngredientId> = Vec::new();

    for id in &order.ingredient_ids {
        if let Some(line) = lines.iter_mut().find(|line| &line.ingredient.id == id) {
            line.count += 1;
        } else if let Some(ingredient) = catalog.iter().find(|i| &i.id == id) {
            lines.push(OrderLine {
                ingredient: ingredient.clone(),
                count: 1,
            });
        } else if !missing.contains(id) {
            missing.push(id.clone());
        }
    }

    let total_price = lines.iter().fold(0_u64, |total, line| {
        let count = u64::try_from(line.count).unwrap_or(u64::MAX);
        total.saturating_add(line.ingredient.price.saturating_mul(count))
    });

    OrderDetails {
        lines,
        missing,
        total_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::StorefrontEnvironment;
    use crate::mocks::{fixtures, MockBurgerApi};
    use crate::root::{AppAction, AppReducer};
    use crate::slices::{FeedAction, IngredientsAction};
    use crate::types::{IngredientKind, OrderStatus};
    use stellar_burger_core::reducer::Reducer;

    fn state_with(actions: Vec<AppAction>) -> AppState {
        let reducer = AppReducer::<MockBurgerApi>::new();
        let env = StorefrontEnvironment::with_random_ids(MockBurgerApi::new());
        let mut state = AppState::default();
        for action in actions {
            let _ = reducer.reduce(&mut state, action, &env);
        }
        state
    }

    #[test]
    fn catalog_filters_and_lookups() {
        let state = state_with(vec![
            IngredientsAction::IngredientsFetched(Ok(fixtures::catalog())).into(),
        ]);

        assert_eq!(ingredients::all(&state).len(), 5);
        assert_eq!(ingredients::by_kind(&state, IngredientKind::Bun).len(), 2);
        assert_eq!(ingredients::by_kind(&state, IngredientKind::Sauce).len(), 1);
        assert_eq!(
            ingredients::by_id(&state, &fixtures::meat().id).map(|i| i.name.as_str()),
            Some(fixtures::meat().name.as_str())
        );
        assert_eq!(ingredients::by_id(&state, &IngredientId::new("missing")), None);
    }

    #[test]
    fn feed_selectors_are_independent() {
        let state = state_with(vec![FeedAction::FeedFetched(Ok(fixtures::feed())).into()]);

        assert_eq!(feed::orders(&state), fixtures::feed().orders.as_slice());
        assert_eq!(feed::total(&state), 800);
        assert_eq!(feed::total_today(&state), 37);
        assert!(!feed::is_loading(&state));
        assert_eq!(feed::error_message(&state), None);
    }

    #[test]
    fn status_board_splits_and_caps() {
        let mut snapshot = fixtures::feed();
        snapshot.orders = (1..=30)
            .map(|n| {
                let status = if n % 3 == 0 {
                    OrderStatus::Pending
                } else {
                    OrderStatus::Done
                };
                fixtures::order(1000 + n, status)
            })
            .collect();
        let state = state_with(vec![FeedAction::FeedFetched(Ok(snapshot)).into()]);

        let ready = feed::ready_numbers(&state, 20);
        let cooking = feed::in_progress_numbers(&state, 20);
        assert_eq!(ready.len(), 20);
        assert_eq!(ready.first(), Some(&1001));
        assert_eq!(cooking.len(), 10);
        assert!(cooking.iter().all(|n| n % 3 == 0));
        assert!(feed::ready_numbers(&state, 0).is_empty());
    }

    #[test]
    fn order_details_counts_and_prices() {
        let bun = fixtures::bun();
        let meat = fixtures::meat();
        let mut order = fixtures::order(1001, OrderStatus::Done);
        order.ingredient_ids = vec![
            bun.id.clone(),
            meat.id.clone(),
            IngredientId::new("retired"),
            meat.id.clone(),
            bun.id.clone(),
            IngredientId::new("retired"),
        ];

        let details = order_details(&order, &fixtures::catalog());

        assert_eq!(
            details.lines,
            vec![
                OrderLine {
                    ingredient: bun.clone(),
                    count: 2
                },
                OrderLine {
                    ingredient: meat.clone(),
                    count: 2
                },
            ]
        );
        assert_eq!(details.missing, vec![IngredientId::new("retired")]);
        assert_eq!(details.total_price, bun.price * 2 + meat.price * 2);
    }

    #[test]
    fn order_details_price_saturates() {
        let bun = Ingredient {
            price: u64::MAX,
            ..fixtures::bun()
        };
        let order = fixtures::order(1001, OrderStatus::Done);
        let details = order_details(&order, &[bun, fixtures::meat()]);
        assert_eq!(details.lines[0].count, 2);
        assert_eq!(details.total_price, u64::MAX);
    }

    #[test]
    fn order_details_against_empty_catalog() {
        let order = fixtures::order(1001, OrderStatus::Done);
        let details = order_details(&order, &[]);
        assert!(details.lines.is_empty());
        assert_eq!(details.missing.len(), 2);
        assert_eq!(details.total_price, 0);
    }
}
