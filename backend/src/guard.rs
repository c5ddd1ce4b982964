//! Route guard
//!
//! Decides whether a client may reach a protected view. The decision is a pure
//! function of the current authentication state and the view's required role;
//! performing the redirect is left to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// View anonymous clients are sent to
pub const LOGIN_PATH: &str = "/login";

/// View clients lacking the required role are sent to
pub const HOME_PATH: &str = "/";

/// Marketplace roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Posts service requests
    Requester,
    /// Fulfils service requests
    Worker,
    /// Matches requesters with workers
    Broker,
    /// Elevated role; satisfies every role check
    Admin,
}

impl Role {
    /// Whether this role satisfies a view requiring `required`
    ///
    /// Admin passes unconditionally.
    pub fn satisfies(self, required: Role) -> bool {
        self == Role::Admin || self == required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Requester => "requester",
            Role::Worker => "worker",
            Role::Broker => "broker",
            Role::Admin => "admin",
        };
        f.write_str(name)
    }
}

/// Signed-in user as seen by the guard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Role of the user
    pub role: Role,
}

/// Authentication state owned by the session layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Session not resolved yet
    Loading,
    /// No active user
    Anonymous,
    /// Active user
    Authenticated(User),
}

impl AuthState {
    /// Build the state from a loading flag and an optional user
    pub fn from_parts(loading: bool, user: Option<User>) -> Self {
        match (loading, user) {
            (true, _) => AuthState::Loading,
            (false, None) => AuthState::Anonymous,
            (false, Some(user)) => AuthState::Authenticated(user),
        }
    }
}

/// Outcome of a guard evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum GuardOutcome {
    /// Show a neutral loading indicator, no decision yet
    Loading,
    /// Navigate away
    Redirect {
        /// Target view
        to: String,
        /// Replace the current history entry instead of pushing
        replace: bool,
    },
    /// Render the guarded content
    Render,
}

impl GuardOutcome {
    fn redirect(to: &str) -> Self {
        GuardOutcome::Redirect {
            to: to.to_string(),
            replace: true,
        }
    }
}

/// Decide what a navigation attempt to a guarded view resolves to
pub fn evaluate(auth: &AuthState, required_role: Option<Role>) -> GuardOutcome {
    match auth {
        AuthState::Loading => GuardOutcome::Loading,
        AuthState::Anonymous => GuardOutcome::redirect(LOGIN_PATH),
        AuthState::Authenticated(user) => match required_role {
            Some(required) if !user.role.satisfies(required) => {
                GuardOutcome::redirect(HOME_PATH)
            }
            _ => GuardOutcome::Render,
        },
    }
}
