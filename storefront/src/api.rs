//! Backend contract.
//!
//! The state core never talks HTTP itself. Every remote operation goes
//! through [`BurgerApi`], and the transport behind it owns token storage
//! and refresh.

use crate::error::ApiResult;
use crate::types::{
    AuthPayload, FeedSnapshot, Ingredient, IngredientId, LoginRequest, Order, ProfileUpdate,
    RegisterRequest,
};
use std::future::Future;

/// Storefront backend.
///
/// Implementations are cheap to clone; reducers clone the client into each
/// request effect.
pub trait BurgerApi: Send + Sync + Clone + 'static {
    /// Fetch the ingredient catalog.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    fn fetch_ingredients(&self) -> impl Future<Output = ApiResult<Vec<Ingredient>>> + Send;

    /// Resolve the stored credentials to a user.
    ///
    /// # Errors
    ///
    /// Returns error if there is no valid session.
    fn fetch_current_user(&self) -> impl Future<Output = ApiResult<AuthPayload>> + Send;

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns error if the email is taken or the form is invalid.
    fn register(
        &self,
        request: RegisterRequest,
    ) -> impl Future<Output = ApiResult<AuthPayload>> + Send;

    /// Sign in.
    ///
    /// # Errors
    ///
    /// Returns error if the credentials are wrong.
    fn login(&self, request: LoginRequest) -> impl Future<Output = ApiResult<AuthPayload>> + Send;

    /// Sign out and revoke the stored credentials.
    ///
    /// # Errors
    ///
    /// Returns error if the backend refuses the logout.
    fn logout(&self) -> impl Future<Output = ApiResult<()>> + Send;

    /// Edit the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns error if there is no valid session or the form is invalid.
    fn update_user(
        &self,
        update: ProfileUpdate,
    ) -> impl Future<Output = ApiResult<AuthPayload>> + Send;

    /// Place an order for the given ingredient sequence.
    ///
    /// # Errors
    ///
    /// Returns error if there is no valid session or the backend refuses
    /// the burger.
    fn submit_order(
        &self,
        ingredients: Vec<IngredientId>,
    ) -> impl Future<Output = ApiResult<Order>> + Send;

    /// Look up any order by its number.
    ///
    /// # Errors
    ///
    /// Returns error if no order has that number.
    fn fetch_order_by_number(&self, number: u64) -> impl Future<Output = ApiResult<Order>> + Send;

    /// Fetch the public order feed.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    fn fetch_feed(&self) -> impl Future<Output = ApiResult<FeedSnapshot>> + Send;

    /// Fetch the signed-in user's order history.
    ///
    /// # Errors
    ///
    /// Returns error if there is no valid session.
    fn fetch_user_orders(&self) -> impl Future<Output = ApiResult<Vec<Order>>> + Send;
}
