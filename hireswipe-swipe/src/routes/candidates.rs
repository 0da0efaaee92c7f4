use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use hireswipe_shared::errors::{AppResult, ErrorCode};
use hireswipe_shared::middleware::{AppQuery, EmployerUser};

use super::{invalid_input, run_engine};
use crate::engine::CandidateFilter;
use crate::models::Applicant;
use crate::store::SwipeStore;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CandidateQuery {
    pub industry: Option<String>,
    pub location: Option<String>,
    pub work_type: Option<String>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "pageSize must be between 1 and 100"))]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

impl CandidateQuery {
    fn filter(&self) -> CandidateFilter {
        CandidateFilter::new()
            .industry(self.industry.as_deref())
            .location(self.location.as_deref())
            .work_type(self.work_type.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub struct CandidatesResponse {
    pub candidates: Vec<Applicant>,
}

/// GET /candidates?industry=&location=&workType=&page=1&pageSize=10
pub async fn list_candidates<S: SwipeStore>(
    EmployerUser(user): EmployerUser,
    State(state): State<Arc<AppState<S>>>,
    AppQuery(query): AppQuery<CandidateQuery>,
) -> AppResult<Json<CandidatesResponse>> {
    query
        .validate()
        .map_err(|e| invalid_input(ErrorCode::InvalidPagination, e))?;

    let filter = query.filter();
    let (page, page_size) = (query.page, query.page_size);

    let candidates = run_engine(&state, move |engine, _| {
        let employer_id = engine.resolve_employer(user.id)?;
        engine.list_candidates(employer_id, &filter, page, page_size)
    })
    .await?;

    Ok(Json(CandidatesResponse { candidates }))
}
