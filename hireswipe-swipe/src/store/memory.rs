//! In-process store for tests. Transactions run under one lock against a
//! copy of the state, so a failed closure leaves nothing behind.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use hireswipe_shared::types::PageRequest;

use super::{StoreError, StoreResult, SwipeStore, SwipeTx};
use crate::engine::{CandidateFilter, PartyRole, SwipeError, SwipeKey};
use crate::models::{Applicant, Employer, JobPosting, Match, NewMatch, NewSwipe, Swipe};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    employers: Vec<Employer>,
    applicants: Vec<Applicant>,
    job_postings: Vec<JobPosting>,
    swipes: Vec<Swipe>,
    matches: Vec<Match>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    unavailable: AtomicBool,
    fail_match_inserts: AtomicBool,
    skip_conflicting_matches: AtomicBool,
    transaction_delay_ms: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent call fails as if the database were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Match inserts fail with a backend error, after the swipe insert.
    pub fn fail_match_inserts(&self, fail: bool) {
        self.fail_match_inserts.store(fail, Ordering::SeqCst);
    }

    /// A conflicting match insert returns `Ok(None)` instead of a unique
    /// violation, the way Postgres `ON CONFLICT DO NOTHING` does.
    pub fn skip_conflicting_matches(&self, skip: bool) {
        self.skip_conflicting_matches.store(skip, Ordering::SeqCst);
    }

    /// Every transaction stalls this long before running its body.
    pub fn set_transaction_delay(&self, delay: Duration) {
        self.transaction_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn add_employer(&self, company_name: &str) -> Employer {
        let employer = Employer {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            company_name: company_name.to_string(),
            industry: None,
            location: None,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().employers.push(employer.clone());
        employer
    }

    pub fn add_applicant(&self, applicant: Applicant) -> Applicant {
        self.state.lock().unwrap().applicants.push(applicant.clone());
        applicant
    }

    pub fn add_job_posting(&self, employer_id: Uuid, title: &str) -> JobPosting {
        let posting = JobPosting {
            id: Uuid::now_v7(),
            employer_id,
            title: title.to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().job_postings.push(posting.clone());
        posting
    }

    /// Inserts a match row directly, bypassing the engine.
    pub fn seed_match(&self, key: SwipeKey) -> Match {
        let m = Match {
            id: Uuid::now_v7(),
            employer_id: key.employer_id,
            applicant_id: key.applicant_id,
            job_posting_id: key.job_posting_id,
            matched_at: Utc::now(),
            is_active: true,
        };
        self.state.lock().unwrap().matches.push(m.clone());
        m
    }

    pub fn swipes(&self) -> Vec<Swipe> {
        self.state.lock().unwrap().swipes.clone()
    }

    pub fn matches(&self) -> Vec<Match> {
        self.state.lock().unwrap().matches.clone()
    }

    fn check(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".into()));
        }
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&MemoryState) -> T) -> StoreResult<T> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(f(&state))
    }
}

struct MemoryTx<'a> {
    state: &'a mut MemoryState,
    fail_match_inserts: bool,
    skip_conflicting_matches: bool,
}

impl SwipeTx for MemoryTx<'_> {
    fn find_swipe(&mut self, key: &SwipeKey) -> StoreResult<Option<Swipe>> {
        Ok(self.state.swipes.iter().find(|s| key.matches_swipe(s)).cloned())
    }

    fn insert_swipe(&mut self, swipe: &NewSwipe) -> StoreResult<Swipe> {
        let key = SwipeKey {
            employer_id: swipe.employer_id,
            applicant_id: swipe.applicant_id,
            job_posting_id: swipe.job_posting_id,
        };
        if self.state.swipes.iter().any(|s| key.matches_swipe(s)) {
            return Err(StoreError::UniqueViolation);
        }
        let row = Swipe {
            id: Uuid::now_v7(),
            employer_id: swipe.employer_id,
            applicant_id: swipe.applicant_id,
            job_posting_id: swipe.job_posting_id,
            swipe_type: swipe.swipe_type.clone(),
            swiped_at: swipe.swiped_at,
            hide_until: swipe.hide_until,
        };
        self.state.swipes.push(row.clone());
        Ok(row)
    }

    fn find_match(&mut self, key: &SwipeKey) -> StoreResult<Option<Match>> {
        Ok(self.state.matches.iter().find(|m| key.matches_match(m)).cloned())
    }

    fn insert_match(&mut self, new_match: &NewMatch) -> StoreResult<Option<Match>> {
        if self.fail_match_inserts {
            return Err(StoreError::Backend("injected match insert failure".into()));
        }
        let key = SwipeKey {
            employer_id: new_match.employer_id,
            applicant_id: new_match.applicant_id,
            job_posting_id: new_match.job_posting_id,
        };
        if self.state.matches.iter().any(|m| key.matches_match(m)) {
            if self.skip_conflicting_matches {
                return Ok(None);
            }
            return Err(StoreError::UniqueViolation);
        }
        let row = Match {
            id: Uuid::now_v7(),
            employer_id: new_match.employer_id,
            applicant_id: new_match.applicant_id,
            job_posting_id: new_match.job_posting_id,
            matched_at: new_match.matched_at,
            is_active: true,
        };
        self.state.matches.push(row.clone());
        Ok(Some(row))
    }
}

fn newest_first<T, K: Ord>(rows: &mut [T], key: impl Fn(&T) -> K) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

impl SwipeStore for MemoryStore {
    fn ping(&self) -> StoreResult<()> {
        self.check()
    }

    fn employer_for_user(&self, user_id: Uuid) -> StoreResult<Option<Uuid>> {
        self.read(|s| s.employers.iter().find(|e| e.user_id == user_id).map(|e| e.id))
    }

    fn applicant_for_user(&self, user_id: Uuid) -> StoreResult<Option<Uuid>> {
        self.read(|s| s.applicants.iter().find(|a| a.user_id == user_id).map(|a| a.id))
    }

    fn employer(&self, employer_id: Uuid) -> StoreResult<Option<Employer>> {
        self.read(|s| s.employers.iter().find(|e| e.id == employer_id).cloned())
    }

    fn applicant(&self, applicant_id: Uuid) -> StoreResult<Option<Applicant>> {
        self.read(|s| s.applicants.iter().find(|a| a.id == applicant_id).cloned())
    }

    fn job_posting(&self, job_posting_id: Uuid) -> StoreResult<Option<JobPosting>> {
        self.read(|s| s.job_postings.iter().find(|j| j.id == job_posting_id).cloned())
    }

    fn candidates(
        &self,
        employer_id: Uuid,
        filter: &CandidateFilter,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> StoreResult<Vec<Applicant>> {
        self.read(|s| {
            let mut visible: Vec<Applicant> = s
                .applicants
                .iter()
                .filter(|a| filter.matches(a))
                .filter(|a| {
                    !s.swipes.iter().any(|sw| {
                        sw.employer_id == employer_id
                            && sw.applicant_id == a.id
                            && sw.hides_candidate_at(now)
                    })
                })
                .cloned()
                .collect();
            newest_first(&mut visible, |a| (a.created_at, a.id));
            visible
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .collect()
        })
    }

    fn matches_for(&self, party_id: Uuid, role: PartyRole) -> StoreResult<Vec<Match>> {
        self.read(|s| {
            let mut rows: Vec<Match> = s
                .matches
                .iter()
                .filter(|m| m.is_active)
                .filter(|m| match role {
                    PartyRole::Employer => m.employer_id == party_id,
                    PartyRole::Applicant => m.applicant_id == party_id,
                })
                .cloned()
                .collect();
            newest_first(&mut rows, |m| (m.matched_at, m.id));
            rows
        })
    }

    fn liked_by(&self, employer_id: Uuid) -> StoreResult<Vec<(Swipe, Applicant)>> {
        self.read(|s| {
            let mut rows: Vec<(Swipe, Applicant)> = s
                .swipes
                .iter()
                .filter(|sw| sw.employer_id == employer_id && sw.is_like())
                .filter_map(|sw| {
                    s.applicants
                        .iter()
                        .find(|a| a.id == sw.applicant_id)
                        .map(|a| (sw.clone(), a.clone()))
                })
                .collect();
            newest_first(&mut rows, |(sw, _)| (sw.swiped_at, sw.id));
            rows
        })
    }

    fn likes_received(&self, applicant_id: Uuid) -> StoreResult<Vec<(Swipe, Employer)>> {
        self.read(|s| {
            let mut rows: Vec<(Swipe, Employer)> = s
                .swipes
                .iter()
                .filter(|sw| sw.applicant_id == applicant_id && sw.is_like())
                .filter_map(|sw| {
                    s.employers
                        .iter()
                        .find(|e| e.id == sw.employer_id)
                        .map(|e| (sw.clone(), e.clone()))
                })
                .collect();
            newest_first(&mut rows, |(sw, _)| (sw.swiped_at, sw.id));
            rows
        })
    }

    fn deactivate_match(
        &self,
        match_id: Uuid,
        party_id: Uuid,
        role: PartyRole,
    ) -> StoreResult<Option<Match>> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let found = state.matches.iter_mut().find(|m| {
            m.id == match_id
                && m.is_active
                && match role {
                    PartyRole::Employer => m.employer_id == party_id,
                    PartyRole::Applicant => m.applicant_id == party_id,
                }
        });
        Ok(found.map(|m| {
            m.is_active = false;
            m.clone()
        }))
    }

    fn transaction<T, F>(&self, mut f: F) -> Result<T, SwipeError>
    where
        F: FnMut(&mut dyn SwipeTx) -> Result<T, SwipeError>,
    {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let delay = self.transaction_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            std::thread::sleep(Duration::from_millis(delay));
        }
        let mut working = state.clone();
        let mut tx = MemoryTx {
            state: &mut working,
            fail_match_inserts: self.fail_match_inserts.load(Ordering::SeqCst),
            skip_conflicting_matches: self.skip_conflicting_matches.load(Ordering::SeqCst),
        };
        let result = f(&mut tx)?;
        *state = working;
        Ok(result)
    }
}
