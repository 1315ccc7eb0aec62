//! Storefront facade.
//!
//! [`Storefront`] owns the [`Store`] for the whole state tree. It is built
//! once at startup and passed by reference to whatever renders the UI.
//! Flows that span slices, such as placing an order, live here: slices
//! never read each other's state, so the facade reads the tree and
//! dispatches intents on their behalf.

use crate::api::BurgerApi;
use crate::config::StorefrontConfig;
use crate::environment::StorefrontEnvironment;
use crate::error::StorefrontError;
use crate::root::{AppAction, AppReducer, AppState};
use crate::slices::{ConstructorAction, FeedAction, IngredientsAction, OrderAction, SessionAction};
use crate::types::Order;
use std::sync::Arc;
use stellar_burger_core::environment::IdGenerator;
use stellar_burger_core::lifecycle::FALLBACK_ERROR_MESSAGE;
use stellar_burger_runtime::{EffectHandle, Store};
use tokio::sync::broadcast;

/// Store type backing a [`Storefront`].
pub type AppStore<A> = Store<AppState, AppAction, StorefrontEnvironment<A>, AppReducer<A>>;

/// The storefront state core.
///
/// Clones share the same store.
#[derive(Clone)]
pub struct Storefront<A>
where
    A: BurgerApi,
{
    store: AppStore<A>,
    config: StorefrontConfig,
}

impl<A> Storefront<A>
where
    A: BurgerApi,
{
    /// Build the state tree with every slice in its initial state.
    #[must_use]
    pub fn new(api: A, ids: Arc<dyn IdGenerator>, config: StorefrontConfig) -> Self {
        let store = Store::with_config(
            AppState::default(),
            AppReducer::new(),
            StorefrontEnvironment::new(api, ids),
            config.store_config(),
        );
        Self { store, config }
    }

    /// The configuration this storefront was built with.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Dispatch an intent.
    ///
    /// Returns once the owning slice has applied the action; the returned
    /// handle completes when the requests it started have settled.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] if the storefront is shutting down.
    pub async fn dispatch(
        &self,
        action: impl Into<AppAction>,
    ) -> Result<EffectHandle, StorefrontError> {
        let action = action.into();
        tracing::debug!(slice = action.slice(), action = action.name(), "dispatch");
        Ok(self.store.send(action).await?)
    }

    /// Read the state tree through `selector`.
    pub async fn select<F, T>(&self, selector: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        self.store.state(selector).await
    }

    /// Copy of the whole state tree.
    pub async fn snapshot(&self) -> AppState {
        self.select(AppState::clone).await
    }

    /// Fed-back actions, as they are applied.
    ///
    /// Request settlements and scheduled actions such as feed polls.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppAction> {
        self.store.subscribe_actions()
    }

    /// Load the catalog and determine the session, waiting for both.
    ///
    /// Failed requests are recorded in their slices and do not fail the
    /// bootstrap.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] if the storefront is shutting down
    /// or the requests do not settle within the request timeout.
    pub async fn bootstrap(&self) -> Result<(), StorefrontError> {
        let mut catalog = self.dispatch(IngredientsAction::FetchIngredients).await?;
        let mut session = self.dispatch(SessionAction::FetchCurrentUser).await?;

        let timeout = self.config.request_timeout;
        catalog.wait_with_timeout(timeout).await?;
        session.wait_with_timeout(timeout).await?;

        let (catalog_size, signed_in) = self
            .select(|state| {
                (
                    state.ingredients.ingredients().len(),
                    state.session.is_authenticated(),
                )
            })
            .await;
        tracing::info!(catalog_size, signed_in, "storefront bootstrapped");
        Ok(())
    }

    /// Submit the burger in the constructor and wait for the backend.
    ///
    /// On success the constructor is emptied and the created order is
    /// returned; it is also the active order of the order slice. On
    /// rejection the constructor is left as it was.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::NotAuthenticated`]: no user is signed in
    /// - [`StorefrontError::IncompleteBurger`]: no bun or no filling
    /// - [`StorefrontError::OrderRejected`]: the backend refused the order
    /// - [`StorefrontError::Store`]: timeout or shutdown
    pub async fn place_order(&self) -> Result<Order, StorefrontError> {
        let (signed_in, ingredients) = self
            .select(|state| {
                (
                    state.session.is_authenticated(),
                    state.constructor.order_ingredients(),
                )
            })
            .await;

        if !signed_in {
            return Err(StorefrontError::NotAuthenticated);
        }
        let ingredients = ingredients.ok_or(StorefrontError::IncompleteBurger)?;

        tracing::info!(items = ingredients.len(), "placing order");
        let outcome = self
            .store
            .send_and_wait_for(
                OrderAction::SubmitOrder { ingredients }.into(),
                |action| matches!(action, AppAction::Order(OrderAction::OrderSubmitted(_))),
                self.config.request_timeout,
            )
            .await?;

        match outcome {
            AppAction::Order(OrderAction::OrderSubmitted(Ok(order))) => {
                tracing::info!(number = order.number, "order placed");
                self.dispatch(ConstructorAction::Reset).await?;
                Ok(order)
            },
            AppAction::Order(OrderAction::OrderSubmitted(Err(message))) => {
                tracing::warn!(%message, "order rejected");
                Err(StorefrontError::OrderRejected(message))
            },
            other => {
                tracing::error!(action = other.name(), "unexpected order settlement");
                Err(StorefrontError::OrderRejected(FALLBACK_ERROR_MESSAGE.to_string()))
            },
        }
    }

    /// Start polling the feed at the configured interval.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] if the storefront is shutting down.
    pub async fn start_live_feed(&self) -> Result<(), StorefrontError> {
        self.dispatch(FeedAction::StartLiveUpdates {
            interval: self.config.feed_poll_interval,
        })
        .await?;
        Ok(())
    }

    /// Stop polling the feed.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] if the storefront is shutting down.
    pub async fn stop_live_feed(&self) -> Result<(), StorefrontError> {
        self.dispatch(FeedAction::StopLiveUpdates).await?;
        Ok(())
    }

    /// Stop live updates and wait for in-flight requests.
    ///
    /// A poll already scheduled still fires, and is ignored, before the
    /// drain completes.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] if requests are still running
    /// after the shutdown timeout.
    pub async fn shutdown(&self) -> Result<(), StorefrontError> {
        // Best effort: the store may already be shutting down.
        if let Err(error) = self.stop_live_feed().await {
            tracing::debug!(%error, "live feed not stopped before shutdown");
        }
        self.store.shutdown(self.config.shutdown_timeout).await?;
        Ok(())
    }
}

impl<A> std::fmt::Debug for Storefront<A>
where
    A: BurgerApi,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("config", &self.config)
            .field("pending_effects", &self.store.pending_effects())
            .finish_non_exhaustive()
    }
}
