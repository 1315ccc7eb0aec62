//! State slices.
//!
//! Each slice owns one subtree of [`AppState`](crate::AppState), its closed
//! action enum and its reducer. Slices never read each other's state.

pub mod constructor;
pub mod feed;
pub mod ingredients;
pub mod order;
pub mod session;

pub use constructor::{ConstructorAction, ConstructorReducer, ConstructorState};
pub use feed::{FeedAction, FeedReducer, FeedState};
pub use ingredients::{IngredientsAction, IngredientsReducer, IngredientsState};
pub use order::{OrderAction, OrderReducer, OrderState};
pub use session::{SessionAction, SessionReducer, SessionState};
