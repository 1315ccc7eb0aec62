//! Storefront environment.
//!
//! This module defines the environment type for dependency injection
//! in the slice reducers.

use crate::api::BurgerApi;
use std::sync::Arc;
use stellar_burger_core::environment::{IdGenerator, UuidGenerator};

/// Storefront environment.
///
/// Contains all external dependencies needed by the slice reducers.
///
/// # Type Parameters
///
/// - `A`: Backend client
#[derive(Clone)]
pub struct StorefrontEnvironment<A>
where
    A: BurgerApi,
{
    /// Backend client.
    pub api: A,

    /// Key source for constructor fillings.
    pub ids: Arc<dyn IdGenerator>,
}

impl<A> StorefrontEnvironment<A>
where
    A: BurgerApi,
{
    /// Create a new storefront environment.
    #[must_use]
    pub fn new(api: A, ids: Arc<dyn IdGenerator>) -> Self {
        Self { api, ids }
    }

    /// Environment with random v4 keys.
    #[must_use]
    pub fn with_random_ids(api: A) -> Self {
        Self::new(api, Arc::new(UuidGenerator))
    }
}

impl<A> std::fmt::Debug for StorefrontEnvironment<A>
where
    A: BurgerApi + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontEnvironment")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}
