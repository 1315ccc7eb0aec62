//! In-memory backend for tests and the demo binary.

use crate::api::BurgerApi;
use crate::error::{ApiError, ApiResult};
use crate::types::{
    AuthPayload, FeedSnapshot, Ingredient, IngredientId, LoginRequest, Order, OrderStatus,
    ProfileUpdate, RegisterRequest, User,
};
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const NOT_AUTHORISED: &str = "You should be authorised";
const POISONED: &str = "mock backend lock poisoned";

/// Backend operation, used to script failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// [`BurgerApi::fetch_ingredients`]
    FetchIngredients,
    /// [`BurgerApi::fetch_current_user`]
    FetchCurrentUser,
    /// [`BurgerApi::register`]
    Register,
    /// [`BurgerApi::login`]
    Login,
    /// [`BurgerApi::logout`]
    Logout,
    /// [`BurgerApi::update_user`]
    UpdateUser,
    /// [`BurgerApi::submit_order`]
    SubmitOrder,
    /// [`BurgerApi::fetch_order_by_number`]
    FetchOrderByNumber,
    /// [`BurgerApi::fetch_feed`]
    FetchFeed,
    /// [`BurgerApi::fetch_user_orders`]
    FetchUserOrders,
}

#[derive(Debug)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug)]
struct Backend {
    catalog: Vec<Ingredient>,
    feed: FeedSnapshot,
    user_orders: Vec<Order>,
    accounts: HashMap<String, Account>,
    session: Option<String>,
    next_number: u64,
    failures: HashMap<Operation, VecDeque<ApiError>>,
    submissions: Vec<Vec<IngredientId>>,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            catalog: Vec::new(),
            feed: FeedSnapshot::default(),
            user_orders: Vec::new(),
            accounts: HashMap::new(),
            session: None,
            next_number: 1,
            failures: HashMap::new(),
            submissions: Vec::new(),
        }
    }
}

impl Backend {
    fn signed_in(&self) -> ApiResult<&User> {
        self.session
            .as_ref()
            .and_then(|email| self.accounts.get(email))
            .map(|account| &account.user)
            .ok_or_else(|| ApiError::rejected(NOT_AUTHORISED))
    }

    fn place(&mut self, ingredients: Vec<IngredientId>) -> ApiResult<Order> {
        self.signed_in()?;
        if ingredients.is_empty() {
            return Err(ApiError::rejected("Ingredient ids must be provided"));
        }
        let names = ingredients
            .iter()
            .map(|id| {
                self.catalog
                    .iter()
                    .find(|ingredient| &ingredient.id == id)
                    .map(|ingredient| ingredient.name.clone())
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ApiError::rejected("One or more ids provided are incorrect"))?;

        let number = self.next_number;
        self.next_number += 1;
        let now = Utc::now();
        let mut distinct: Vec<String> = Vec::new();
        for name in names {
            if !distinct.contains(&name) {
                distinct.push(name);
            }
        }
        let order = Order {
            id: format!("mock-order-{number}"),
            number,
            name: format!("{} бургер", distinct.join(" ")),
            status: OrderStatus::Created,
            ingredient_ids: ingredients.clone(),
            created_at: now,
            updated_at: now,
        };

        self.submissions.push(ingredients);
        self.user_orders.push(order.clone());
        self.feed.orders.insert(0, order.clone());
        self.feed.total += 1;
        self.feed.total_today += 1;
        Ok(order)
    }
}

/// Scripted in-memory [`BurgerApi`].
///
/// Clones share one backend, so a test can keep a handle and inspect what
/// the store sent. Failures scripted with [`MockBurgerApi::fail_next`] are
/// consumed one call at a time, in order.
///
/// # Example
///
/// ```
/// use stellar_burger_storefront::mocks::{fixtures, MockBurgerApi};
/// use stellar_burger_storefront::BurgerApi;
///
/// let api = MockBurgerApi::new().with_catalog(fixtures::catalog());
/// let catalog = tokio_test::block_on(api.fetch_ingredients());
/// assert_eq!(catalog.map(|c| c.len()), Ok(fixtures::catalog().len()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockBurgerApi {
    backend: Arc<Mutex<Backend>>,
    latency: Option<Duration>,
}

impl MockBurgerApi {
    /// Empty backend: no catalog, no accounts, empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the ingredient catalog.
    #[must_use]
    pub fn with_catalog(self, catalog: Vec<Ingredient>) -> Self {
        self.edit(|backend| backend.catalog = catalog);
        self
    }

    /// Seed the public feed.
    #[must_use]
    pub fn with_feed(self, feed: FeedSnapshot) -> Self {
        self.edit(|backend| backend.feed = feed);
        self
    }

    /// Seed the order history returned for the signed-in user.
    #[must_use]
    pub fn with_user_orders(self, orders: Vec<Order>) -> Self {
        self.edit(|backend| backend.user_orders = orders);
        self
    }

    /// Register an account.
    #[must_use]
    pub fn with_account(self, user: User, password: impl Into<String>) -> Self {
        let password = password.into();
        self.edit(|backend| {
            backend
                .accounts
                .insert(user.email.clone(), Account { user, password });
        });
        self
    }

    /// Register an account and treat its credentials as stored.
    #[must_use]
    pub fn signed_in_as(self, user: User, password: impl Into<String>) -> Self {
        let email = user.email.clone();
        let api = self.with_account(user, password);
        api.edit(|backend| backend.session = Some(email));
        api
    }

    /// Number the next submitted order `number`.
    #[must_use]
    pub fn with_next_order_number(self, number: u64) -> Self {
        self.edit(|backend| backend.next_number = number);
        self
    }

    /// Delay every response by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next call of `operation` fail with `error`.
    pub fn fail_next(&self, operation: Operation, error: ApiError) {
        self.edit(|backend| {
            backend
                .failures
                .entry(operation)
                .or_default()
                .push_back(error);
        });
    }

    /// Replace the public feed, as if other customers had ordered.
    pub fn set_feed(&self, feed: FeedSnapshot) {
        self.edit(|backend| backend.feed = feed);
    }

    /// Ingredient sequences submitted so far, oldest first.
    #[must_use]
    pub fn submissions(&self) -> Vec<Vec<IngredientId>> {
        self.backend
            .lock()
            .map(|backend| backend.submissions.clone())
            .unwrap_or_default()
    }

    /// Whether the backend currently holds a session.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.backend
            .lock()
            .map(|backend| backend.session.is_some())
            .unwrap_or(false)
    }

    fn edit(&self, f: impl FnOnce(&mut Backend)) {
        match self.backend.lock() {
            Ok(mut backend) => f(&mut backend),
            Err(_) => tracing::error!("{POISONED}"),
        }
    }

    async fn respond<T, F>(&self, operation: Operation, f: F) -> ApiResult<T>
    where
        F: FnOnce(&mut Backend) -> ApiResult<T>,
    {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let mut backend = self
            .backend
            .lock()
            .map_err(|_| ApiError::network(POISONED))?;
        if let Some(error) = backend
            .failures
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            tracing::debug!(?operation, %error, "scripted failure");
            return Err(error);
        }
        f(&mut backend)
    }
}

impl BurgerApi for MockBurgerApi {
    fn fetch_ingredients(&self) -> impl Future<Output = ApiResult<Vec<Ingredient>>> + Send {
        let api = self.clone();
        async move {
            api.respond(Operation::FetchIngredients, |backend| {
                Ok(backend.catalog.clone())
            })
            .await
        }
    }

    fn fetch_current_user(&self) -> impl Future<Output = ApiResult<AuthPayload>> + Send {
        let api = self.clone();
        async move {
            api.respond(Operation::FetchCurrentUser, |backend| {
                let user = backend.signed_in()?.clone();
                Ok(AuthPayload { user })
            })
            .await
        }
    }

    fn register(
        &self,
        request: RegisterRequest,
    ) -> impl Future<Output = ApiResult<AuthPayload>> + Send {
        let api = self.clone();
        async move {
            api.respond(Operation::Register, move |backend| {
                if backend.accounts.contains_key(&request.email) {
                    return Err(ApiError::rejected("User already exists"));
                }
                let user = User {
                    name: request.name,
                    email: request.email.clone(),
                };
                backend.accounts.insert(
                    request.email.clone(),
                    Account {
                        user: user.clone(),
                        password: request.password,
                    },
                );
                backend.session = Some(request.email);
                Ok(AuthPayload { user })
            })
            .await
        }
    }

    fn login(&self, request: LoginRequest) -> impl Future<Output = ApiResult<AuthPayload>> + Send {
        let api = self.clone();
        async move {
            api.respond(Operation::Login, move |backend| {
                let user = backend
                    .accounts
                    .get(&request.email)
                    .filter(|account| account.password == request.password)
                    .map(|account| account.user.clone())
                    .ok_or_else(|| ApiError::rejected("email or password are incorrect"))?;
                backend.session = Some(request.email);
                Ok(AuthPayload { user })
            })
            .await
        }
    }

    fn logout(&self) -> impl Future<Output = ApiResult<()>> + Send {
        let api = self.clone();
        async move {
            api.respond(Operation::Logout, |backend| {
                backend.session = None;
                Ok(())
            })
            .await
        }
    }

    fn update_user(
        &self,
        update: ProfileUpdate,
    ) -> impl Future<Output = ApiResult<AuthPayload>> + Send {
        let api = self.clone();
        async move {
            api.respond(Operation::UpdateUser, move |backend| {
                let current = backend.signed_in()?.email.clone();
                if update.email != current && backend.accounts.contains_key(&update.email) {
                    return Err(ApiError::rejected("User with such email already exists"));
                }
                let mut account = backend
                    .accounts
                    .remove(&current)
                    .ok_or_else(|| ApiError::rejected(NOT_AUTHORISED))?;
                account.user = User {
                    name: update.name,
                    email: update.email.clone(),
                };
                if let Some(password) = update.password {
                    account.password = password;
                }
                let user = account.user.clone();
                backend.accounts.insert(update.email.clone(), account);
                backend.session = Some(update.email);
                Ok(AuthPayload { user })
            })
            .await
        }
    }

    fn submit_order(
        &self,
        ingredients: Vec<IngredientId>,
    ) -> impl Future<Output = ApiResult<Order>> + Send {
        let api = self.clone();
        async move {
            api.respond(Operation::SubmitOrder, move |backend| backend.place(ingredients))
                .await
        }
    }

    fn fetch_order_by_number(&self, number: u64) -> impl Future<Output = ApiResult<Order>> + Send {
        let api = self.clone();
        async move {
            api.respond(Operation::FetchOrderByNumber, move |backend| {
                backend
                    .feed
                    .orders
                    .iter()
                    .chain(backend.user_orders.iter())
                    .find(|order| order.number == number)
                    .cloned()
                    .ok_or_else(|| ApiError::rejected("Order not found"))
            })
            .await
        }
    }

    fn fetch_feed(&self) -> impl Future<Output = ApiResult<FeedSnapshot>> + Send {
        let api = self.clone();
        async move {
            api.respond(Operation::FetchFeed, |backend| Ok(backend.feed.clone()))
                .await
        }
    }

    fn fetch_user_orders(&self) -> impl Future<Output = ApiResult<Vec<Order>>> + Send {
        let api = self.clone();
        async move {
            api.respond(Operation::FetchUserOrders, |backend| {
                backend.signed_in()?;
                Ok(backend.user_orders.clone())
            })
            .await
        }
    }
}

/// Ready-made domain values.
pub mod fixtures {
    use crate::types::{
        FeedSnapshot, Ingredient, IngredientId, IngredientKind, Order, OrderStatus, User,
    };
    use chrono::{DateTime, Utc};

    fn ingredient(id: &str, name: &str, kind: IngredientKind, price: u64, calories: u32) -> Ingredient {
        Ingredient {
            id: IngredientId::new(id),
            name: name.to_string(),
            kind,
            proteins: calories / 10,
            fat: calories / 20,
            carbohydrates: calories / 8,
            calories,
            price,
            image: format!("https://code.s3.yandex.net/react/code/{id}.png"),
            image_mobile: format!("https://code.s3.yandex.net/react/code/{id}-mobile.png"),
            image_large: format!("https://code.s3.yandex.net/react/code/{id}-large.png"),
        }
    }

    /// Краторная булка.
    #[must_use]
    pub fn bun() -> Ingredient {
        ingredient("643d69a5c3f7b9001cfa093c", "Краторная булка N-200i", IngredientKind::Bun, 1255, 420)
    }

    /// Флюоресцентная булка.
    #[must_use]
    pub fn other_bun() -> Ingredient {
        ingredient("643d69a5c3f7b9001cfa093d", "Флюоресцентная булка R2-D3", IngredientKind::Bun, 988, 643)
    }

    /// Соус Spicy-X.
    #[must_use]
    pub fn sauce() -> Ingredient {
        ingredient("643d69a5c3f7b9001cfa0942", "Соус Spicy-X", IngredientKind::Sauce, 90, 30)
    }

    /// Биокотлета.
    #[must_use]
    pub fn meat() -> Ingredient {
        ingredient("643d69a5c3f7b9001cfa0941", "Биокотлета из марсианской Магнолии", IngredientKind::Main, 424, 4242)
    }

    /// Сыр.
    #[must_use]
    pub fn cheese() -> Ingredient {
        ingredient("643d69a5c3f7b9001cfa094a", "Сыр с астероидной плесенью", IngredientKind::Main, 4142, 3377)
    }

    /// The whole catalog: two buns, a sauce and two mains.
    #[must_use]
    pub fn catalog() -> Vec<Ingredient> {
        vec![bun(), other_bun(), sauce(), meat(), cheese()]
    }

    /// A signed-in customer.
    #[must_use]
    pub fn user() -> User {
        User {
            name: "Bombatcat".to_string(),
            email: "bombatcat@mail.com".to_string(),
        }
    }

    /// Password of [`user`].
    pub const PASSWORD: &str = "bombatcat-password";

    /// Order `number` for a bun + meat burger, placed `number - 1000` days after 2025-06-01.
    #[must_use]
    pub fn order(number: u64, status: OrderStatus) -> Order {
        let day = i64::try_from(number.saturating_sub(1000)).unwrap_or(0);
        let created_at =
            DateTime::<Utc>::from_timestamp(1_748_736_000 + day * 86_400, 0).unwrap_or_default();
        Order {
            id: format!("order_{number}"),
            number,
            name: format!("Order #{number}"),
            status,
            ingredient_ids: vec![bun().id, meat().id, bun().id],
            created_at,
            updated_at: created_at,
        }
    }

    /// Feed with two orders, 800 in total and 37 today.
    #[must_use]
    pub fn feed() -> FeedSnapshot {
        FeedSnapshot {
            orders: vec![order(1002, OrderStatus::Done), order(1001, OrderStatus::Pending)],
            total: 800,
            total_today: 37,
        }
    }
}
