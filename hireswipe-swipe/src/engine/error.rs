use hireswipe_shared::errors::{AppError, ErrorCode};
use hireswipe_shared::types::PageError;

use super::PartyRole;
use crate::store::StoreError;

/// Records a swipe or match operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Applicant,
    Employer,
    JobPosting,
    Match,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::Applicant => "applicant",
            Resource::Employer => "employer",
            Resource::JobPosting => "job posting",
            Resource::Match => "match",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SwipeError {
    #[error("caller is not a registered {0}")]
    Unauthorized(PartyRole),

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    InvalidPage(#[from] PageError),

    #[error("already swiped on this candidate")]
    AlreadySwiped,

    #[error("{0} not found")]
    NotFound(Resource),

    #[error("request deadline exceeded")]
    DeadlineExceeded,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type SwipeResult<T> = Result<T, SwipeError>;

impl From<SwipeError> for AppError {
    fn from(err: SwipeError) -> Self {
        match err {
            SwipeError::Unauthorized(PartyRole::Employer) => {
                AppError::new(ErrorCode::NotAnEmployer, err.to_string())
            }
            SwipeError::Unauthorized(PartyRole::Applicant) => {
                AppError::new(ErrorCode::NotAnApplicant, err.to_string())
            }
            SwipeError::InvalidArgument(msg) => AppError::new(ErrorCode::InvalidSwipeType, msg),
            SwipeError::InvalidPage(e) => AppError::new(ErrorCode::InvalidPagination, e.to_string()),
            SwipeError::AlreadySwiped => AppError::new(ErrorCode::AlreadySwiped, err.to_string()),
            SwipeError::NotFound(resource) => {
                let code = match resource {
                    Resource::Applicant => ErrorCode::ApplicantNotFound,
                    Resource::Employer => ErrorCode::EmployerNotFound,
                    Resource::JobPosting => ErrorCode::JobPostingNotFound,
                    Resource::Match => ErrorCode::MatchNotFound,
                };
                AppError::new(code, err.to_string())
            }
            SwipeError::DeadlineExceeded => {
                AppError::new(ErrorCode::ServiceUnavailable, "request timed out")
            }
            SwipeError::Store(StoreError::Timeout) => {
                AppError::new(ErrorCode::ServiceUnavailable, "store timed out")
            }
            SwipeError::Store(store) => {
                tracing::error!(error = %store, "swipe store failure");
                AppError::internal("internal server error")
            }
        }
    }
}
