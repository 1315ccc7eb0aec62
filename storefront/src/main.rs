//! Storefront walkthrough against the in-memory backend.
//!
//! Boots the storefront, assembles a burger, places the order and watches
//! the live feed for a few polls.
//!
//! ```bash
//! RUST_LOG=stellar_burger_storefront=info cargo run --bin storefront-demo
//! ```
//!
//! Settings are read from `STOREFRONT_*` environment variables; see
//! [`StorefrontConfig::from_env`].

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use stellar_burger_core::environment::UuidGenerator;
use stellar_burger_storefront::mocks::{fixtures, MockBurgerApi};
use stellar_burger_storefront::slices::{ConstructorAction, OrderAction};
use stellar_burger_storefront::types::OrderStatus;
use stellar_burger_storefront::{selectors, Storefront, StorefrontConfig};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("stellar_burger_storefront=debug,stellar_burger_runtime=debug")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env().context("invalid storefront configuration")?;
    info!(?config, "=== Stellar Burger storefront ===");

    let mut feed = fixtures::feed();
    feed.orders.push(fixtures::order(34_535, OrderStatus::Pending));
    let api = MockBurgerApi::new()
        .with_catalog(fixtures::catalog())
        .with_feed(feed)
        .signed_in_as(fixtures::user(), fixtures::PASSWORD)
        .with_next_order_number(34_536)
        .with_latency(Duration::from_millis(50));

    let storefront = Storefront::new(api, Arc::new(UuidGenerator), config);
    storefront.bootstrap().await?;

    let user = storefront
        .select(|state| selectors::session::user(state).map(|u| u.name.clone()))
        .await;
    info!(?user, "session determined");

    for ingredient in [
        fixtures::bun(),
        fixtures::meat(),
        fixtures::sauce(),
        fixtures::cheese(),
    ] {
        storefront
            .dispatch(ConstructorAction::AddIngredient(ingredient))
            .await?;
    }
    storefront
        .dispatch(ConstructorAction::MoveFilling { from: 2, to: 0 })
        .await?;

    let price = storefront
        .select(selectors::constructor::total_price)
        .await;
    info!(price, "burger assembled");

    let order = storefront.place_order().await?;
    info!(number = order.number, name = %order.name, "order placed");

    let details = storefront
        .select(|state| selectors::order_details(&order, selectors::ingredients::all(state)))
        .await;
    for line in &details.lines {
        info!(ingredient = %line.ingredient.name, count = line.count, "order line");
    }
    info!(total = details.total_price, "order total");

    storefront.dispatch(OrderAction::ClearActiveOrder).await?;
    let mut history = storefront.dispatch(OrderAction::FetchOrders).await?;
    history.wait().await;
    let orders = storefront
        .select(|state| selectors::order::history(state).len())
        .await;
    info!(orders, "order history loaded");

    storefront.start_live_feed().await?;
    let poll = storefront.config().feed_poll_interval;
    let limit = storefront.config().status_board_limit;
    for round in 1..=3 {
        tokio::time::sleep(poll).await;
        let (total, ready, in_progress) = storefront
            .select(|state| {
                (
                    selectors::feed::total(state),
                    selectors::feed::ready_numbers(state, limit),
                    selectors::feed::in_progress_numbers(state, limit),
                )
            })
            .await;
        info!(round, total, ?ready, ?in_progress, "feed");
    }

    storefront.shutdown().await?;
    info!("storefront shut down");
    Ok(())
}
