//! Swipe/match decision logic.
//!
//! Every operation takes already-resolved party ids. The HTTP layer resolves
//! the caller once (via [`SwipeEngine::resolve_employer`] or
//! [`SwipeEngine::resolve_applicant`]) and passes the id in.

mod clock;
mod deadline;
mod error;
mod filter;


use std::sync::Arc;

use chrono::Duration;
use metrics::counter;
use serde::Serialize;
use uuid::Uuid;

use hireswipe_shared::types::{PageRequest, UserRole};

use crate::models::{Applicant, Employer, Match, NewMatch, NewSwipe, Swipe, SwipeType};
use crate::store::{StoreError, SwipeStore, SwipeTx};

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::ManualClock;
pub use deadline::Deadline;
pub use error::{Resource, SwipeError, SwipeResult};
pub use filter::{CandidateField, CandidateFilter};

/// How long a passed applicant stays out of the employer's candidate list.
pub const PASS_COOLDOWN_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    Employer,
    Applicant,
}

impl PartyRole {
    pub fn from_user_role(role: UserRole) -> Option<Self> {
        match role {
            UserRole::Employer => Some(PartyRole::Employer),
            UserRole::Applicant => Some(PartyRole::Applicant),
            UserRole::Admin => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PartyRole::Employer => "employer",
            PartyRole::Applicant => "applicant",
        }
    }
}

impl std::fmt::Display for PartyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row key shared by swipes and matches. For swipes the first slot is the
/// swiping party; for matches it is always the employer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwipeKey {
    pub employer_id: Uuid,
    pub applicant_id: Uuid,
    pub job_posting_id: Option<Uuid>,
}

impl SwipeKey {
    /// The same key with the party slots swapped.
    pub fn reciprocal(&self) -> SwipeKey {
        SwipeKey {
            employer_id: self.applicant_id,
            applicant_id: self.employer_id,
            job_posting_id: self.job_posting_id,
        }
    }

    pub fn matches_swipe(&self, swipe: &Swipe) -> bool {
        swipe.employer_id == self.employer_id
            && swipe.applicant_id == self.applicant_id
            && swipe.job_posting_id == self.job_posting_id
    }

    pub fn matches_match(&self, m: &Match) -> bool {
        m.employer_id == self.employer_id
            && m.applicant_id == self.applicant_id
            && m.job_posting_id == self.job_posting_id
    }
}

/// A swipe request after identity resolution. `target_id` is an applicant for
/// employer swipes and an employer for applicant swipes.
#[derive(Debug, Clone, Copy)]
pub struct SwipeCommand {
    pub target_id: Uuid,
    pub job_posting_id: Option<Uuid>,
    pub swipe_type: SwipeType,
    pub deadline: Deadline,
}

impl SwipeCommand {
    pub fn new(target_id: Uuid, job_posting_id: Option<Uuid>, swipe_type: SwipeType) -> Self {
        Self { target_id, job_posting_id, swipe_type, deadline: Deadline::none() }
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }
}

#[derive(Debug, Clone)]
pub struct SwipeOutcome {
    pub swipe: Swipe,
    pub swiped_by: PartyRole,
    pub employer_id: Uuid,
    pub applicant_id: Uuid,
    /// The pair's match when this swipe completed (or raced into) a mutual like.
    pub matched: Option<Match>,
    /// False when a concurrent call created the match first.
    pub match_created: bool,
}

impl SwipeOutcome {
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LikedCandidate {
    pub swipe: Swipe,
    pub applicant: Applicant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceivedLike {
    pub swipe: Swipe,
    pub employer: Employer,
}

pub fn parse_swipe_type(raw: &str) -> SwipeResult<SwipeType> {
    raw.parse::<SwipeType>().map_err(SwipeError::InvalidArgument)
}

pub struct SwipeEngine<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: SwipeStore> SwipeEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn resolve_employer(&self, user_id: Uuid) -> SwipeResult<Uuid> {
        self.store
            .employer_for_user(user_id)?
            .ok_or(SwipeError::Unauthorized(PartyRole::Employer))
    }

    pub fn resolve_applicant(&self, user_id: Uuid) -> SwipeResult<Uuid> {
        self.store
            .applicant_for_user(user_id)?
            .ok_or(SwipeError::Unauthorized(PartyRole::Applicant))
    }

    pub fn list_candidates(
        &self,
        employer_id: Uuid,
        filter: &CandidateFilter,
        page: u32,
        page_size: u32,
    ) -> SwipeResult<Vec<Applicant>> {
        let page = PageRequest::new(page, page_size)?;
        let candidates = self
            .store
            .candidates(employer_id, filter, self.clock.now(), page)?;

        tracing::debug!(
            employer_id = %employer_id,
            page = page.page(),
            page_size = page.page_size(),
            filters = filter.constraints().len(),
            returned = candidates.len(),
            "candidates listed"
        );
        Ok(candidates)
    }

    /// Employer swipes on an applicant.
    pub fn record_swipe(&self, employer_id: Uuid, cmd: SwipeCommand) -> SwipeResult<SwipeOutcome> {
        if self.store.applicant(cmd.target_id)?.is_none() {
            return Err(SwipeError::NotFound(Resource::Applicant));
        }
        self.record(PartyRole::Employer, employer_id, cmd)
    }

    /// Applicant swipes back on an employer. Stored with the party slots
    /// swapped so it is the reciprocal of the employer's swipe.
    pub fn record_applicant_swipe(
        &self,
        applicant_id: Uuid,
        cmd: SwipeCommand,
    ) -> SwipeResult<SwipeOutcome> {
        if self.store.employer(cmd.target_id)?.is_none() {
            return Err(SwipeError::NotFound(Resource::Employer));
        }
        self.record(PartyRole::Applicant, applicant_id, cmd)
    }

    fn record(&self, side: PartyRole, swiper_id: Uuid, cmd: SwipeCommand) -> SwipeResult<SwipeOutcome> {
        let (employer_id, applicant_id) = match side {
            PartyRole::Employer => (swiper_id, cmd.target_id),
            PartyRole::Applicant => (cmd.target_id, swiper_id),
        };

        if let Some(job_posting_id) = cmd.job_posting_id {
            let owned = self
                .store
                .job_posting(job_posting_id)?
                .is_some_and(|posting| posting.employer_id == employer_id);
            if !owned {
                return Err(SwipeError::NotFound(Resource::JobPosting));
            }
        }

        let key = SwipeKey {
            employer_id: swiper_id,
            applicant_id: cmd.target_id,
            job_posting_id: cmd.job_posting_id,
        };
        let pair = SwipeKey {
            employer_id,
            applicant_id,
            job_posting_id: cmd.job_posting_id,
        };

        let now = self.clock.now();
        let new_swipe = NewSwipe {
            employer_id: key.employer_id,
            applicant_id: key.applicant_id,
            job_posting_id: key.job_posting_id,
            swipe_type: cmd.swipe_type.as_str().to_string(),
            swiped_at: now,
            hide_until: match cmd.swipe_type {
                SwipeType::Pass => Some(now + Duration::hours(PASS_COOLDOWN_HOURS)),
                SwipeType::Like => None,
            },
        };

        let (swipe, matched, match_created) = self.store.transaction(|tx| {
            cmd.deadline.check()?;
            if tx.find_swipe(&key)?.is_some() {
                return Err(SwipeError::AlreadySwiped);
            }

            let swipe = match tx.insert_swipe(&new_swipe) {
                Ok(swipe) => swipe,
                Err(StoreError::UniqueViolation) => return Err(SwipeError::AlreadySwiped),
                Err(e) => return Err(e.into()),
            };

            let reciprocal_like = cmd.swipe_type == SwipeType::Like
                && tx
                    .find_swipe(&key.reciprocal())?
                    .is_some_and(|other| other.is_like());

            let (matched, created) = if reciprocal_like {
                let (m, created) = create_match(tx, &pair, now)?;
                (Some(m), created)
            } else {
                (None, false)
            };

            // Last check before commit: a late swipe rolls back.
            cmd.deadline.check()?;
            Ok((swipe, matched, created))
        })?;

        counter!("swipes_recorded_total", "swipe_type" => cmd.swipe_type.as_str(), "side" => side.as_str())
            .increment(1);
        if match_created {
            counter!("matches_created_total").increment(1);
        }

        tracing::info!(
            swipe_id = %swipe.id,
            side = %side,
            employer_id = %employer_id,
            applicant_id = %applicant_id,
            job_posting_id = ?cmd.job_posting_id,
            swipe_type = %cmd.swipe_type,
            is_match = matched.is_some(),
            match_created,
            "swipe recorded"
        );

        Ok(SwipeOutcome {
            swipe,
            swiped_by: side,
            employer_id,
            applicant_id,
            matched,
            match_created,
        })
    }

    pub fn list_matches(&self, party_id: Uuid, role: PartyRole) -> SwipeResult<Vec<Match>> {
        Ok(self.store.matches_for(party_id, role)?)
    }

    pub fn list_liked(&self, employer_id: Uuid) -> SwipeResult<Vec<LikedCandidate>> {
        let liked = self
            .store
            .liked_by(employer_id)?
            .into_iter()
            .map(|(swipe, applicant)| LikedCandidate { swipe, applicant })
            .collect();
        Ok(liked)
    }

    pub fn list_likes_received(&self, applicant_id: Uuid) -> SwipeResult<Vec<ReceivedLike>> {
        let likes = self
            .store
            .likes_received(applicant_id)?
            .into_iter()
            .map(|(swipe, employer)| ReceivedLike { swipe, employer })
            .collect();
        Ok(likes)
    }

    pub fn deactivate_match(
        &self,
        party_id: Uuid,
        role: PartyRole,
        match_id: Uuid,
    ) -> SwipeResult<Match> {
        let m = self
            .store
            .deactivate_match(match_id, party_id, role)?
            .ok_or(SwipeError::NotFound(Resource::Match))?;

        tracing::info!(match_id = %m.id, party_id = %party_id, role = %role, "match deactivated");
        Ok(m)
    }
}

/// Inserts the pair's match. A uniqueness conflict means a concurrent call
/// already created it, which still counts as a match.
fn create_match(
    tx: &mut dyn SwipeTx,
    pair: &SwipeKey,
    now: chrono::DateTime<chrono::Utc>,
) -> SwipeResult<(Match, bool)> {
    let new_match = NewMatch {
        employer_id: pair.employer_id,
        applicant_id: pair.applicant_id,
        job_posting_id: pair.job_posting_id,
        matched_at: now,
    };

    match tx.insert_match(&new_match) {
        Ok(Some(created)) => Ok((created, true)),
        Ok(None) | Err(StoreError::UniqueViolation) => {
            tracing::debug!(
                employer_id = %pair.employer_id,
                applicant_id = %pair.applicant_id,
                "match already existed, reusing it"
            );
            let existing = tx.find_match(pair)?.ok_or_else(|| {
                StoreError::Backend("match conflict reported but no match row found".into())
            })?;
            Ok((existing, false))
        }
        Err(e) => Err(e.into()),
    }
}
