//! Persistence seam for the swipe engine.
//!
//! Read paths are plain methods on [`SwipeStore`]. The write path runs inside
//! [`SwipeStore::transaction`], which hands the engine a [`SwipeTx`] so the
//! duplicate check, swipe insert, reciprocal lookup and match insert commit or
//! roll back as one unit.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use hireswipe_shared::types::PageRequest;

use crate::engine::{CandidateFilter, PartyRole, SwipeError, SwipeKey};
use crate::models::{Applicant, Employer, JobPosting, Match, NewMatch, NewSwipe, Swipe};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("uniqueness constraint violated")]
    UniqueViolation,
    #[error("transaction could not be serialized")]
    SerializationFailure,
    #[error("statement timed out")]
    Timeout,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Operations available inside one swipe transaction.
pub trait SwipeTx {
    fn find_swipe(&mut self, key: &SwipeKey) -> StoreResult<Option<Swipe>>;

    /// Fails with [`StoreError::UniqueViolation`] when the key is taken.
    fn insert_swipe(&mut self, swipe: &NewSwipe) -> StoreResult<Swipe>;

    fn find_match(&mut self, key: &SwipeKey) -> StoreResult<Option<Match>>;

    /// Returns `Ok(None)` (or [`StoreError::UniqueViolation`]) when a match
    /// already exists for the key.
    fn insert_match(&mut self, new_match: &NewMatch) -> StoreResult<Option<Match>>;
}

pub trait SwipeStore: Send + Sync + 'static {
    fn ping(&self) -> StoreResult<()>;

    fn employer_for_user(&self, user_id: Uuid) -> StoreResult<Option<Uuid>>;
    fn applicant_for_user(&self, user_id: Uuid) -> StoreResult<Option<Uuid>>;

    fn employer(&self, employer_id: Uuid) -> StoreResult<Option<Employer>>;
    fn applicant(&self, applicant_id: Uuid) -> StoreResult<Option<Applicant>>;
    fn job_posting(&self, job_posting_id: Uuid) -> StoreResult<Option<JobPosting>>;

    /// Applicants visible to `employer_id` at `now`, newest account first.
    fn candidates(
        &self,
        employer_id: Uuid,
        filter: &CandidateFilter,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> StoreResult<Vec<Applicant>>;

    /// Active matches for a party, newest first.
    fn matches_for(&self, party_id: Uuid, role: PartyRole) -> StoreResult<Vec<Match>>;

    /// Like swipes made by an employer, newest first.
    fn liked_by(&self, employer_id: Uuid) -> StoreResult<Vec<(Swipe, Applicant)>>;

    /// Like swipes employers made on an applicant, newest first.
    fn likes_received(&self, applicant_id: Uuid) -> StoreResult<Vec<(Swipe, Employer)>>;

    /// Clears `is_active` on an active match the party belongs to.
    fn deactivate_match(
        &self,
        match_id: Uuid,
        party_id: Uuid,
        role: PartyRole,
    ) -> StoreResult<Option<Match>>;

    /// Runs `f` in one transaction, committing on `Ok` and rolling back on
    /// `Err`. Implementations may call `f` more than once when the backend
    /// reports a retryable conflict.
    fn transaction<T, F>(&self, f: F) -> Result<T, SwipeError>
    where
        F: FnMut(&mut dyn SwipeTx) -> Result<T, SwipeError>;
}
