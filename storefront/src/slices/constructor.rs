//! Burger constructor slice.
//!
//! Purely local: the burger being assembled before it is ordered. A burger
//! has at most one bun, used as top and bottom, and any number of fillings
//! in the order the customer stacked them.

use crate::api::BurgerApi;
use crate::environment::StorefrontEnvironment;
use crate::types::{ConstructorItem, Ingredient, IngredientId};
use serde::Serialize;
use std::marker::PhantomData;
use stellar_burger_core::effect::Effect;
use stellar_burger_core::reducer::Reducer;
use stellar_burger_core::{smallvec, SmallVec};
use stellar_burger_macros::Action;
use uuid::Uuid;

/// Constructor state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConstructorState {
    bun: Option<Ingredient>,
    fillings: Vec<ConstructorItem>,
}

impl ConstructorState {
    /// The chosen bun.
    #[must_use]
    pub const fn bun(&self) -> Option<&Ingredient> {
        self.bun.as_ref()
    }

    /// Fillings, top to bottom.
    #[must_use]
    pub fn fillings(&self) -> &[ConstructorItem] {
        &self.fillings
    }

    /// Whether nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bun.is_none() && self.fillings.is_empty()
    }

    /// Bun price twice plus every filling.
    #[must_use]
    pub fn total_price(&self) -> u64 {
        let bun = self
            .bun
            .as_ref()
            .map_or(0, |bun| bun.price.saturating_mul(2));
        self.fillings
            .iter()
            .fold(bun, |total, item| total.saturating_add(item.ingredient.price))
    }

    /// Ingredient ids to submit: bun, fillings, bun.
    ///
    /// `None` unless there is a bun and at least one filling.
    #[must_use]
    pub fn order_ingredients(&self) -> Option<Vec<IngredientId>> {
        let bun = self.bun.as_ref()?;
        if self.fillings.is_empty() {
            return None;
        }
        let mut ids = Vec::with_capacity(self.fillings.len() + 2);
        ids.push(bun.id.clone());
        ids.extend(self.fillings.iter().map(|item| item.ingredient.id.clone()));
        ids.push(bun.id.clone());
        Some(ids)
    }

    /// How many times `id` appears in the burger, counting the bun twice.
    #[must_use]
    pub fn count_of(&self, id: &IngredientId) -> usize {
        if self.bun.as_ref().is_some_and(|bun| &bun.id == id) {
            return 2;
        }
        self.fillings
            .iter()
            .filter(|item| &item.ingredient.id == id)
            .count()
    }
}

/// Constructor actions.
#[derive(Action, Debug, Clone, PartialEq, Eq)]
pub enum ConstructorAction {
    /// Put an ingredient on the burger. A bun replaces the current bun.
    #[intent]
    AddIngredient(Ingredient),

    /// Take a filling off the burger.
    #[intent]
    RemoveFilling {
        /// Key assigned on insertion
        key: Uuid,
    },

    /// Move the filling at `from` to position `to`.
    #[intent]
    MoveFilling {
        /// Current index
        from: usize,
        /// Target index
        to: usize,
    },

    /// Start over.
    #[intent]
    Reset,
}

/// Constructor reducer.
#[derive(Debug, Clone)]
pub struct ConstructorReducer<A> {
    _phantom: PhantomData<A>,
}

impl<A> ConstructorReducer<A> {
    /// Create a new constructor reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<A> Default for ConstructorReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Reducer for ConstructorReducer<A>
where
    A: BurgerApi,
{
    type State = ConstructorState;
    type Action = ConstructorAction;
    type Environment = StorefrontEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ConstructorAction::AddIngredient(ingredient) => {
                if ingredient.kind.is_filling() {
                    state.fillings.push(ConstructorItem {
                        key: env.ids.next_id(),
                        ingredient,
                    });
                } else {
                    state.bun = Some(ingredient);
                }
            },
            ConstructorAction::RemoveFilling { key } => {
                let before = state.fillings.len();
                state.fillings.retain(|item| item.key != key);
                if state.fillings.len() == before {
                    tracing::warn!(%key, "no filling with this key");
                }
            },
            ConstructorAction::MoveFilling { from, to } => {
                let len = state.fillings.len();
                if from >= len || to >= len {
                    tracing::warn!(from, to, len, "filling index out of range");
                } else if from != to {
                    let item = state.fillings.remove(from);
                    state.fillings.insert(to, item);
                }
            },
            ConstructorAction::Reset => {
                *state = ConstructorState::default();
            },
        }
        smallvec![Effect::None]
    }
}
