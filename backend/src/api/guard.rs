//! Route guard API handler
//!
//! Lets the frontend router ask for a guard decision and perform the
//! navigation itself.

use crate::guard::{evaluate, AuthState, GuardOutcome, Role, User};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

/// Request to evaluate the guard for one navigation attempt
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardRequest {
    /// Whether the session is still being resolved
    #[serde(default)]
    pub loading: bool,
    /// Signed-in user, if any
    #[serde(default)]
    pub user: Option<User>,
    /// Role the target view requires, if any
    #[serde(default)]
    pub required_role: Option<Role>,
}

/// POST /api/route-guard - Evaluate the route guard
pub async fn check_route(Json(request): Json<GuardRequest>) -> Json<GuardOutcome> {
    let auth = AuthState::from_parts(request.loading, request.user);
    let outcome = evaluate(&auth, request.required_role);
    debug!(?auth, required_role = ?request.required_role, ?outcome, "Route guard evaluated");
    Json(outcome)
}
