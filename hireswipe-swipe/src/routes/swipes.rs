use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use hireswipe_shared::errors::{AppResult, ErrorCode};
use hireswipe_shared::middleware::{AppJson, ApplicantUser, EmployerUser};

use super::{invalid_input, run_engine};
use crate::engine::{parse_swipe_type, LikedCandidate, ReceivedLike, SwipeCommand, SwipeOutcome};
use crate::events::publisher;
use crate::store::SwipeStore;
use crate::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    pub applicant_id: Uuid,
    pub job_posting_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(min = 1, message = "swipeType is required"))]
    pub swipe_type: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSwipeRequest {
    pub employer_id: Uuid,
    pub job_posting_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(min = 1, message = "swipeType is required"))]
    pub swipe_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    pub message: &'static str,
    pub is_match: bool,
}

impl From<&SwipeOutcome> for SwipeResponse {
    fn from(outcome: &SwipeOutcome) -> Self {
        let message = if outcome.is_match() { "It's a match!" } else { "Swipe recorded" };
        Self { message, is_match: outcome.is_match() }
    }
}

fn command(
    target_id: Uuid,
    job_posting_id: Option<Uuid>,
    raw_swipe_type: &str,
) -> AppResult<SwipeCommand> {
    Ok(SwipeCommand::new(target_id, job_posting_id, parse_swipe_type(raw_swipe_type)?))
}

// ---------------------------------------------------------------------------
// POST /swipe
// ---------------------------------------------------------------------------

pub async fn record_swipe<S: SwipeStore>(
    EmployerUser(user): EmployerUser,
    State(state): State<Arc<AppState<S>>>,
    AppJson(req): AppJson<SwipeRequest>,
) -> AppResult<Json<SwipeResponse>> {
    req.validate()
        .map_err(|e| invalid_input(ErrorCode::ValidationError, e))?;
    let cmd = command(req.applicant_id, req.job_posting_id, &req.swipe_type)?;

    let user_id = user.id;
    let outcome = run_engine(&state, move |engine, deadline| {
        let employer_id = engine.resolve_employer(user_id)?;
        engine.record_swipe(employer_id, cmd.with_deadline(deadline))
    })
    .await?;

    publisher::publish_swipe_outcome(state.events.as_ref(), user_id, &outcome).await;

    Ok(Json(SwipeResponse::from(&outcome)))
}

// ---------------------------------------------------------------------------
// POST /applicant/swipe
// ---------------------------------------------------------------------------

pub async fn record_applicant_swipe<S: SwipeStore>(
    ApplicantUser(user): ApplicantUser,
    State(state): State<Arc<AppState<S>>>,
    AppJson(req): AppJson<ApplicantSwipeRequest>,
) -> AppResult<Json<SwipeResponse>> {
    req.validate()
        .map_err(|e| invalid_input(ErrorCode::ValidationError, e))?;
    let cmd = command(req.employer_id, req.job_posting_id, &req.swipe_type)?;

    let user_id = user.id;
    let outcome = run_engine(&state, move |engine, deadline| {
        let applicant_id = engine.resolve_applicant(user_id)?;
        engine.record_applicant_swipe(applicant_id, cmd.with_deadline(deadline))
    })
    .await?;

    publisher::publish_swipe_outcome(state.events.as_ref(), user_id, &outcome).await;

    Ok(Json(SwipeResponse::from(&outcome)))
}

// ---------------------------------------------------------------------------
// GET /liked
// ---------------------------------------------------------------------------

pub async fn list_liked<S: SwipeStore>(
    EmployerUser(user): EmployerUser,
    State(state): State<Arc<AppState<S>>>,
) -> AppResult<Json<Vec<LikedCandidate>>> {
    let liked = run_engine(&state, move |engine, _| {
        let employer_id = engine.resolve_employer(user.id)?;
        engine.list_liked(employer_id)
    })
    .await?;

    Ok(Json(liked))
}

// ---------------------------------------------------------------------------
// GET /applicant/likes
// ---------------------------------------------------------------------------

pub async fn list_likes_received<S: SwipeStore>(
    ApplicantUser(user): ApplicantUser,
    State(state): State<Arc<AppState<S>>>,
) -> AppResult<Json<Vec<ReceivedLike>>> {
    let likes = run_engine(&state, move |engine, _| {
        let applicant_id = engine.resolve_applicant(user.id)?;
        engine.list_likes_received(applicant_id)
    })
    .await?;

    Ok(Json(likes))
}
