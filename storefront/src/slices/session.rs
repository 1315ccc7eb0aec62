//! User session slice.
//!
//! Tracks the signed-in user and whether session determination has
//! settled (`auth_checked`). The session starts `Loading` because nothing
//! is known about stored credentials until the first check completes.
//!
//! # `auth_checked` rules
//!
//! | Settlement | `auth_checked` |
//! |---|---|
//! | login / current user / register fulfilled | `true` |
//! | login / current user rejected | `true` |
//! | register rejected | unchanged |
//! | profile update, either way | unchanged |
//! | logout | `false` |

use crate::api::BurgerApi;
use crate::environment::StorefrontEnvironment;
use crate::error::ApiError;
use crate::types::{AuthPayload, LoginRequest, ProfileUpdate, RegisterRequest, User};
use serde::Serialize;
use std::marker::PhantomData;
use stellar_burger_core::effect::Effect;
use stellar_burger_core::lifecycle::{Lifecycle, LifecycleSlice, Request, RequestStatus};
use stellar_burger_core::reducer::Reducer;
use stellar_burger_core::{smallvec, SmallVec};
use stellar_burger_macros::Action;

/// Session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    user: Option<User>,
    auth_checked: bool,
    lifecycle: Lifecycle,
}

impl SessionState {
    /// The state right after logout: no user, nothing known, nothing loading.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            user: None,
            auth_checked: false,
            lifecycle: Lifecycle::idle(),
        }
    }

    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether session determination has settled.
    #[must_use]
    pub const fn is_auth_checked(&self) -> bool {
        self.auth_checked
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Whether an auth request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lifecycle.is_loading()
    }

    /// Message of the last failed auth request.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.lifecycle.error_message()
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.lifecycle.status()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            auth_checked: false,
            lifecycle: Lifecycle::loading(),
        }
    }
}

impl LifecycleSlice for SessionState {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }
}

/// Session actions.
#[derive(Action, Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Resolve stored credentials to a user.
    #[intent]
    FetchCurrentUser,

    /// Session determination settled.
    #[outcome]
    CurrentUserFetched(Result<AuthPayload, String>),

    /// Create an account.
    #[intent]
    Register(RegisterRequest),

    /// Sign-up settled.
    #[outcome]
    Registered(Result<AuthPayload, String>),

    /// Sign in.
    #[intent]
    Login(LoginRequest),

    /// Sign-in settled.
    #[outcome]
    LoggedIn(Result<AuthPayload, String>),

    /// Forget the session locally, without telling the backend.
    #[intent]
    Logout,

    /// Sign out on the backend, then forget the session.
    #[intent]
    FetchLogout,

    /// Backend sign-out settled.
    #[outcome]
    LogoutAcknowledged(Result<(), String>),

    /// Edit the profile.
    #[intent]
    UpdateProfile(ProfileUpdate),

    /// Profile edit settled.
    #[outcome]
    ProfileUpdated(Result<AuthPayload, String>),
}

const FETCH_CURRENT_USER: Request<SessionState, AuthPayload> =
    Request::new("fetch_current_user")
        .on_success(sign_in)
        .on_failure(mark_checked);

const LOGIN: Request<SessionState, AuthPayload> =
    Request::new("login").on_success(sign_in).on_failure(mark_checked);

const REGISTER: Request<SessionState, AuthPayload> = Request::new("register").on_success(sign_in);

const LOGOUT: Request<SessionState, ()> = Request::new("logout").on_success(sign_out);

const UPDATE_PROFILE: Request<SessionState, AuthPayload> =
    Request::new("update_profile").on_success(replace_user);

fn sign_in(state: &mut SessionState, payload: AuthPayload) {
    state.user = Some(payload.user);
    state.auth_checked = true;
}

fn mark_checked(state: &mut SessionState, _message: &str) {
    state.auth_checked = true;
}

fn sign_out(state: &mut SessionState, (): ()) {
    *state = SessionState::signed_out();
}

fn replace_user(state: &mut SessionState, payload: AuthPayload) {
    state.user = Some(payload.user);
}

/// Session reducer.
#[derive(Debug, Clone)]
pub struct SessionReducer<A> {
    _phantom: PhantomData<A>,
}

impl<A> SessionReducer<A> {
    /// Create a new session reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<A> Default for SessionReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Reducer for SessionReducer<A>
where
    A: BurgerApi,
{
    type State = SessionState;
    type Action = SessionAction;
    type Environment = StorefrontEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let api = env.api.clone();
        match action {
            SessionAction::FetchCurrentUser => {
                FETCH_CURRENT_USER.begin(state);
                smallvec![FETCH_CURRENT_USER.effect(
                    async move { api.fetch_current_user().await.map_err(ApiError::into_message) },
                    SessionAction::CurrentUserFetched,
                )]
            },
            SessionAction::CurrentUserFetched(outcome) => {
                FETCH_CURRENT_USER.settle(state, outcome);
                smallvec![Effect::None]
            },
            SessionAction::Register(request) => {
                REGISTER.begin(state);
                smallvec![REGISTER.effect(
                    async move { api.register(request).await.map_err(ApiError::into_message) },
                    SessionAction::Registered,
                )]
            },
            SessionAction::Registered(outcome) => {
                REGISTER.settle(state, outcome);
                smallvec![Effect::None]
            },
            SessionAction::Login(request) => {
                LOGIN.begin(state);
                smallvec![LOGIN.effect(
                    async move { api.login(request).await.map_err(ApiError::into_message) },
                    SessionAction::LoggedIn,
                )]
            },
            SessionAction::LoggedIn(outcome) => {
                LOGIN.settle(state, outcome);
                smallvec![Effect::None]
            },
            SessionAction::Logout => {
                tracing::debug!("session cleared locally");
                *state = SessionState::signed_out();
                smallvec![Effect::None]
            },
            SessionAction::FetchLogout => {
                LOGOUT.begin(state);
                smallvec![LOGOUT.effect(
                    async move { api.logout().await.map_err(ApiError::into_message) },
                    SessionAction::LogoutAcknowledged,
                )]
            },
            SessionAction::LogoutAcknowledged(outcome) => {
                LOGOUT.settle(state, outcome);
                smallvec![Effect::None]
            },
            SessionAction::UpdateProfile(update) => {
                UPDATE_PROFILE.begin(state);
                smallvec![UPDATE_PROFILE.effect(
                    async move { api.update_user(update).await.map_err(ApiError::into_message) },
                    SessionAction::ProfileUpdated,
                )]
            },
            SessionAction::ProfileUpdated(outcome) => {
                UPDATE_PROFILE.settle(state, outcome);
                smallvec![Effect::None]
            },
        }
    }
}
