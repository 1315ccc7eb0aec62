//! End-to-end scenarios through the real store and the in-memory backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;
use stellar_burger_storefront::mocks::{fixtures, MockBurgerApi, Operation};
use stellar_burger_storefront::slices::{
    ConstructorAction, FeedAction, IngredientsAction, OrderAction, SessionAction, SessionState,
};
use stellar_burger_storefront::{
    selectors, ApiError, AppAction, LoginRequest, RegisterRequest, Storefront, StorefrontConfig,
    StorefrontError,
};
use stellar_burger_testing::SequentialIdGenerator;

fn config() -> StorefrontConfig {
    StorefrontConfig {
        request_timeout: Duration::from_secs(2),
        shutdown_timeout: Duration::from_secs(2),
        feed_poll_interval: Duration::from_millis(25),
        ..StorefrontConfig::default()
    }
}

fn storefront(api: MockBurgerApi) -> Storefront<MockBurgerApi> {
    Storefront::new(api, Arc::new(SequentialIdGenerator::new()), config())
}

async fn settle(storefront: &Storefront<MockBurgerApi>, action: impl Into<AppAction>) {
    let mut handle = storefront.dispatch(action).await.unwrap();
    handle
        .wait_with_timeout(Duration::from_secs(2))
        .await
        .unwrap();
}

#[tokio::test]
async fn feed_selectors_match_the_backend() {
    let storefront = storefront(MockBurgerApi::new().with_feed(fixtures::feed()));

    settle(&storefront, FeedAction::FetchFeed).await;

    let state = storefront.snapshot().await;
    assert_eq!(selectors::feed::orders(&state), fixtures::feed().orders.as_slice());
    assert_eq!(selectors::feed::total(&state), 800);
    assert_eq!(selectors::feed::total_today(&state), 37);
    assert!(!selectors::feed::is_loading(&state));
    assert_eq!(selectors::feed::error_message(&state), None);
}

#[tokio::test]
async fn rejected_feed_refresh_keeps_previous_orders() {
    let api = MockBurgerApi::new().with_feed(fixtures::feed());
    let storefront = storefront(api.clone());
    settle(&storefront, FeedAction::FetchFeed).await;

    api.fail_next(Operation::FetchFeed, ApiError::network("network error"));
    settle(&storefront, FeedAction::FetchFeed).await;

    let state = storefront.snapshot().await;
    assert_eq!(selectors::feed::error_message(&state), Some("network error"));
    assert!(!selectors::feed::is_loading(&state));
    assert_eq!(selectors::feed::orders(&state).len(), 2);
    assert_eq!(selectors::feed::total(&state), 800);
}

#[tokio::test]
async fn submitted_order_becomes_active_without_touching_history() {
    let api = MockBurgerApi::new()
        .with_catalog(fixtures::catalog())
        .signed_in_as(fixtures::user(), fixtures::PASSWORD)
        .with_user_orders(fixtures::feed().orders)
        .with_next_order_number(4242);
    let storefront = storefront(api);
    settle(&storefront, OrderAction::FetchOrders).await;

    let burger = vec![fixtures::bun().id, fixtures::meat().id, fixtures::bun().id];
    settle(&storefront, OrderAction::SubmitOrder { ingredients: burger.clone() }).await;

    let state = storefront.snapshot().await;
    let order = selectors::order::active(&state).unwrap();
    assert_eq!(order.number, 4242);
    assert_eq!(order.ingredient_ids, burger);
    assert_eq!(selectors::order::history(&state), fixtures::feed().orders.as_slice());
    assert!(!selectors::order::is_loading(&state));
}

#[tokio::test]
async fn rejected_login_marks_session_checked() {
    let api = MockBurgerApi::new().with_account(fixtures::user(), fixtures::PASSWORD);
    let storefront = storefront(api.clone());
    api.fail_next(Operation::Login, ApiError::rejected("Login error"));

    settle(
        &storefront,
        SessionAction::Login(LoginRequest {
            email: fixtures::user().email,
            password: fixtures::PASSWORD.to_string(),
        }),
    )
    .await;

    let state = storefront.snapshot().await;
    assert!(!selectors::session::is_loading(&state));
    assert_eq!(selectors::session::error_message(&state), Some("Login error"));
    assert!(selectors::session::is_auth_checked(&state));
    assert_eq!(selectors::session::user(&state), None);
}

#[tokio::test]
async fn rejected_register_leaves_session_unchecked() {
    let api = MockBurgerApi::new().with_account(fixtures::user(), fixtures::PASSWORD);
    let storefront = storefront(api);

    settle(
        &storefront,
        SessionAction::Register(RegisterRequest {
            name: "Bombatcat".to_string(),
            email: fixtures::user().email,
            password: "another".to_string(),
        }),
    )
    .await;

    let state = storefront.snapshot().await;
    assert_eq!(selectors::session::error_message(&state), Some("User already exists"));
    assert!(!selectors::session::is_auth_checked(&state));
}

#[tokio::test]
async fn logout_from_full_session_yields_empty_session() {
    let api = MockBurgerApi::new().signed_in_as(fixtures::user(), fixtures::PASSWORD);
    let storefront = storefront(api.clone());
    storefront.bootstrap().await.unwrap();
    assert!(storefront.select(selectors::session::is_authenticated).await);

    settle(&storefront, SessionAction::FetchLogout).await;

    let session = storefront.select(|state| state.session.clone()).await;
    assert_eq!(session, SessionState::signed_out());
    assert!(!api.has_session());
}

#[tokio::test]
async fn place_order_resets_constructor_only_on_success() {
    let api = MockBurgerApi::new()
        .with_catalog(fixtures::catalog())
        .signed_in_as(fixtures::user(), fixtures::PASSWORD);
    let storefront = storefront(api.clone());
    storefront.bootstrap().await.unwrap();

    storefront
        .dispatch(ConstructorAction::AddIngredient(fixtures::bun()))
        .await
        .unwrap();
    storefront
        .dispatch(ConstructorAction::AddIngredient(fixtures::cheese()))
        .await
        .unwrap();

    api.fail_next(Operation::SubmitOrder, ApiError::network(""));
    let rejected = storefront.place_order().await;
    assert!(matches!(rejected, Err(StorefrontError::OrderRejected(ref m)) if m == "Unknown error"));
    assert!(!storefront.select(|s| s.constructor.is_empty()).await);

    let order = storefront.place_order().await.unwrap();
    assert!(storefront.select(|s| s.constructor.is_empty()).await);
    assert_eq!(
        storefront.select(|s| selectors::order::active(s).cloned()).await,
        Some(order)
    );
    assert_eq!(api.submissions().len(), 1);
}

#[tokio::test]
async fn slices_settle_independently() {
    let api = MockBurgerApi::new()
        .with_catalog(fixtures::catalog())
        .with_feed(fixtures::feed())
        .with_latency(Duration::from_millis(10));
    let storefront = storefront(api.clone());
    api.fail_next(Operation::FetchIngredients, ApiError::network("catalog down"));

    let mut catalog = storefront
        .dispatch(IngredientsAction::FetchIngredients)
        .await
        .unwrap();
    let mut feed = storefront.dispatch(FeedAction::FetchFeed).await.unwrap();
    catalog.wait().await;
    feed.wait().await;

    let state = storefront.snapshot().await;
    assert_eq!(selectors::ingredients::error_message(&state), Some("catalog down"));
    assert_eq!(selectors::feed::error_message(&state), None);
    assert_eq!(selectors::feed::total(&state), 800);
    assert!(state.constructor.is_empty());
    assert!(state.order.order().is_none());
}
