//! Domain types shared by the slices.
//!
//! Field names follow the storefront backend's JSON, so every type
//! round-trips the wire format through `serde` without adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Backend identifier of an ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(String);

impl IngredientId {
    /// Wrap a backend id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IngredientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Kind of ingredient, which decides where it goes in a burger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientKind {
    /// Top and bottom of the burger
    Bun,
    /// Filling
    Sauce,
    /// Filling
    Main,
}

impl IngredientKind {
    /// Whether the ingredient goes between the buns.
    #[must_use]
    pub const fn is_filling(self) -> bool {
        !matches!(self, Self::Bun)
    }
}

/// An entry of the ingredient catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Backend id
    #[serde(rename = "_id")]
    pub id: IngredientId,
    /// Display name
    pub name: String,
    /// Bun, sauce or main
    #[serde(rename = "type")]
    pub kind: IngredientKind,
    /// Proteins per 100 g
    pub proteins: u32,
    /// Fat per 100 g
    pub fat: u32,
    /// Carbohydrates per 100 g
    pub carbohydrates: u32,
    /// Calories per 100 g
    pub calories: u32,
    /// Price of one portion
    pub price: u64,
    /// Image URL
    pub image: String,
    /// Small image URL
    pub image_mobile: String,
    /// Large image URL
    pub image_large: String,
}

/// Progress of an order in the kitchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Accepted, not yet cooking
    Created,
    /// Cooking
    Pending,
    /// Ready
    Done,
}

/// An order as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Backend id
    #[serde(rename = "_id")]
    pub id: String,
    /// Server-assigned order number
    pub number: u64,
    /// Generated burger name
    pub name: String,
    /// Kitchen status
    pub status: OrderStatus,
    /// Ingredient ids in burger order, duplicates allowed
    #[serde(rename = "ingredients")]
    pub ingredient_ids: Vec<IngredientId>,
    /// Creation time
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Last status change
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// The public order feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedSnapshot {
    /// Orders, most recent first
    pub orders: Vec<Order>,
    /// Orders ever placed
    pub total: u64,
    /// Orders placed today
    #[serde(rename = "totalToday")]
    pub total_today: u64,
}

/// Profile of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
}

/// User payload of the auth endpoints.
///
/// Tokens stay with the transport; only the user reaches the state tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
    /// The authenticated user
    pub user: User,
}

/// Sign-up form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
}

/// Sign-in form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
}

/// Profile edit form. The password is only sent when changed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New display name
    pub name: String,
    /// New login email
    pub email: String,
    /// New password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

const REDACTED: &str = "<redacted>";

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

impl fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileUpdate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// A filling placed in the constructor.
///
/// The key tells two insertions of the same ingredient apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructorItem {
    /// Unique per insertion
    pub key: Uuid,
    /// The filling
    pub ingredient: Ingredient,
}
