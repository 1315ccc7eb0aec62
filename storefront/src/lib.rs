//! # Stellar Burger Storefront
//!
//! Client state core for the Stellar Burger storefront.
//!
//! The state tree is split into five slices, each owning its subtree and a
//! closed action enum:
//!
//! - **ingredients**: the catalog, loaded once at startup
//! - **constructor**: the burger being assembled (one bun, ordered fillings)
//! - **order**: the order on screen and the user's order history
//! - **feed**: the public order feed, optionally polled
//! - **session**: the signed-in user
//!
//! Backend calls go through the [`BurgerApi`] trait and settle into their
//! slice's request lifecycle. UI code reads through [`selectors`] and
//! drives everything through the [`Storefront`] facade.
//!
//! ## Example
//!
//! ```no_run
//! use stellar_burger_storefront::mocks::{fixtures, MockBurgerApi};
//! use stellar_burger_storefront::slices::ConstructorAction;
//! use stellar_burger_storefront::{selectors, Storefront, StorefrontConfig};
//! use stellar_burger_core::environment::UuidGenerator;
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), stellar_burger_storefront::StorefrontError> {
//! let api = MockBurgerApi::new()
//!     .with_catalog(fixtures::catalog())
//!     .signed_in_as(fixtures::user(), fixtures::PASSWORD);
//! let storefront = Storefront::new(api, Arc::new(UuidGenerator), StorefrontConfig::default());
//!
//! storefront.bootstrap().await?;
//! storefront
//!     .dispatch(ConstructorAction::AddIngredient(fixtures::bun()))
//!     .await?;
//! let price = storefront.select(selectors::constructor::total_price).await;
//! assert_eq!(price, 2 * fixtures::bun().price);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod environment;
pub mod error;
pub mod root;
pub mod selectors;
pub mod slices;
pub mod storefront;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use api::BurgerApi;
pub use config::StorefrontConfig;
pub use environment::StorefrontEnvironment;
pub use error::{ApiError, ApiResult, ConfigError, StorefrontError};
pub use root::{AppAction, AppReducer, AppState};
pub use storefront::{AppStore, Storefront};
pub use types::{
    AuthPayload, ConstructorItem, FeedSnapshot, Ingredient, IngredientId, IngredientKind,
    LoginRequest, Order, OrderStatus, ProfileUpdate, RegisterRequest, User,
};
