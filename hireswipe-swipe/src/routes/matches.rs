use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use hireswipe_shared::errors::AppResult;
use hireswipe_shared::middleware::AppPath;
use hireswipe_shared::types::auth::AuthUser;

use super::{party_role, resolve_party, run_engine};
use crate::events::publisher;
use crate::models::Match;
use crate::store::SwipeStore;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<Match>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    #[serde(rename = "match")]
    pub matched: Match,
}

/// GET /matches, scoped by the caller's role.
pub async fn list_matches<S: SwipeStore>(
    user: AuthUser,
    State(state): State<Arc<AppState<S>>>,
) -> AppResult<Json<MatchesResponse>> {
    let role = party_role(&user)?;

    let matches = run_engine(&state, move |engine, _| {
        let party_id = resolve_party(engine, user.id, role)?;
        engine.list_matches(party_id, role)
    })
    .await?;

    Ok(Json(MatchesResponse { matches }))
}

/// DELETE /matches/:id
pub async fn deactivate_match<S: SwipeStore>(
    user: AuthUser,
    State(state): State<Arc<AppState<S>>>,
    AppPath(match_id): AppPath<Uuid>,
) -> AppResult<Json<MatchResponse>> {
    let role = party_role(&user)?;

    let user_id = user.id;
    let (party_id, matched) = run_engine(&state, move |engine, deadline| {
        let party_id = resolve_party(engine, user_id, role)?;
        deadline.check()?;
        let matched = engine.deactivate_match(party_id, role, match_id)?;
        Ok((party_id, matched))
    })
    .await?;

    publisher::publish_match_deactivated(state.events.as_ref(), user_id, party_id, &matched).await;

    Ok(Json(MatchResponse { matched }))
}
