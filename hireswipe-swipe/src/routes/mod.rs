pub mod candidates;
pub mod health;
pub mod matches;
pub mod swipes;


use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use validator::ValidationErrors;

use hireswipe_shared::errors::{AppError, AppResult, ErrorCode};
use hireswipe_shared::types::auth::AuthUser;

use crate::engine::{Deadline, PartyRole, SwipeEngine, SwipeError, SwipeResult};
use crate::store::SwipeStore;
use crate::AppState;

/// Runs a blocking engine call on the blocking pool and waits for it.
///
/// The call gets a [`Deadline`] of `request_timeout_ms`. Writes check it inside
/// their transaction and roll back once it has passed, so the response always
/// reflects what was committed. Pool checkout and each statement have their
/// own timeouts, which bound how long the task can block.
pub(crate) async fn run_engine<S, T, F>(state: &Arc<AppState<S>>, f: F) -> AppResult<T>
where
    S: SwipeStore,
    T: Send + 'static,
    F: FnOnce(&SwipeEngine<S>, Deadline) -> SwipeResult<T> + Send + 'static,
{
    let deadline = Deadline::after(Duration::from_millis(state.config.request_timeout_ms));
    let state = state.clone();

    match tokio::task::spawn_blocking(move || f(&state.engine, deadline)).await {
        Ok(Err(SwipeError::DeadlineExceeded)) => {
            tracing::warn!("engine call passed its deadline and was rolled back");
            Err(SwipeError::DeadlineExceeded.into())
        }
        Ok(result) => result.map_err(AppError::from),
        Err(e) => Err(AppError::internal(format!("engine task failed: {e}"))),
    }
}

/// Resolves the caller to the party id their role implies.
pub(crate) fn resolve_party<S: SwipeStore>(
    engine: &SwipeEngine<S>,
    user_id: uuid::Uuid,
    role: PartyRole,
) -> SwipeResult<uuid::Uuid> {
    match role {
        PartyRole::Employer => engine.resolve_employer(user_id),
        PartyRole::Applicant => engine.resolve_applicant(user_id),
    }
}

pub(crate) fn party_role(user: &AuthUser) -> AppResult<PartyRole> {
    PartyRole::from_user_role(user.role)
        .ok_or_else(|| AppError::new(ErrorCode::Forbidden, "only employers and applicants have matches"))
}

/// Validator failures carry the offending field names in `details.fields`.
pub(crate) fn invalid_input(code: ErrorCode, errors: ValidationErrors) -> AppError {
    let mut fields: Vec<&str> = errors.field_errors().into_keys().collect();
    fields.sort_unstable();
    AppError::with_details(code, errors.to_string(), json!({ "fields": fields }))
}
