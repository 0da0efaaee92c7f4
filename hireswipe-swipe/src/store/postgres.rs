use chrono::{DateTime, Utc};
use diesel::dsl::not;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Text;
use uuid::Uuid;

use hireswipe_shared::clients::db::DbPool;
use hireswipe_shared::types::PageRequest;

use super::{StoreError, StoreResult, SwipeStore, SwipeTx};
use crate::engine::{CandidateField, CandidateFilter, PartyRole, SwipeError, SwipeKey};
use crate::models::{Applicant, Employer, JobPosting, Match, NewMatch, NewSwipe, Swipe, SwipeType};
use crate::schema::{applicants, employers, job_postings, matches, swipes};

type PgPooled = PooledConnection<ConnectionManager<PgConnection>>;

/// Postgres SQLSTATE 57014 surfaces with this message when
/// `statement_timeout` cancels a query.
const STATEMENT_TIMEOUT_MESSAGE: &str = "canceling statement due to statement timeout";

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::UniqueViolation
            }
            DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
                StoreError::SerializationFailure
            }
            DieselError::DatabaseError(_, info)
                if info.message().contains(STATEMENT_TIMEOUT_MESSAGE) =>
            {
                StoreError::Timeout
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                StoreError::Unavailable(info.message().to_string())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

// Lets `build_transaction().run` carry engine errors through diesel.
impl From<DieselError> for SwipeError {
    fn from(err: DieselError) -> Self {
        SwipeError::Store(err.into())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PgStoreSettings {
    pub statement_timeout_ms: u64,
    pub max_tx_retries: u32,
}

pub struct PgSwipeStore {
    pool: DbPool,
    settings: PgStoreSettings,
}

impl PgSwipeStore {
    pub fn new(pool: DbPool, settings: PgStoreSettings) -> Self {
        Self { pool, settings }
    }

    fn conn(&self) -> StoreResult<PgPooled> {
        self.pool
            .get()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// Runs a read in a short transaction so the statement timeout stays local.
    fn read<T>(&self, f: impl FnOnce(&mut PgConnection) -> QueryResult<T>) -> StoreResult<T> {
        let mut conn = self.conn()?;
        let timeout_ms = self.settings.statement_timeout_ms;
        conn.transaction::<T, StoreError, _>(|conn| {
            set_local_statement_timeout(conn, timeout_ms)?;
            Ok(f(conn)?)
        })
    }
}

fn set_local_statement_timeout(conn: &mut PgConnection, timeout_ms: u64) -> QueryResult<()> {
    diesel::sql_query("SELECT set_config('statement_timeout', $1, true)")
        .bind::<Text, _>(format!("{timeout_ms}ms"))
        .execute(conn)?;
    Ok(())
}

struct PgSwipeTx<'a> {
    conn: &'a mut PgConnection,
}

impl SwipeTx for PgSwipeTx<'_> {
    fn find_swipe(&mut self, key: &SwipeKey) -> StoreResult<Option<Swipe>> {
        let mut query = swipes::table
            .filter(swipes::employer_id.eq(key.employer_id))
            .filter(swipes::applicant_id.eq(key.applicant_id))
            .select(Swipe::as_select())
            .into_boxed();
        query = match key.job_posting_id {
            Some(job) => query.filter(swipes::job_posting_id.eq(job)),
            None => query.filter(swipes::job_posting_id.is_null()),
        };
        Ok(query.first::<Swipe>(self.conn).optional()?)
    }

    fn insert_swipe(&mut self, swipe: &NewSwipe) -> StoreResult<Swipe> {
        Ok(diesel::insert_into(swipes::table)
            .values(swipe)
            .returning(Swipe::as_returning())
            .get_result(self.conn)?)
    }

    fn find_match(&mut self, key: &SwipeKey) -> StoreResult<Option<Match>> {
        let mut query = matches::table
            .filter(matches::employer_id.eq(key.employer_id))
            .filter(matches::applicant_id.eq(key.applicant_id))
            .select(Match::as_select())
            .into_boxed();
        query = match key.job_posting_id {
            Some(job) => query.filter(matches::job_posting_id.eq(job)),
            None => query.filter(matches::job_posting_id.is_null()),
        };
        Ok(query.first::<Match>(self.conn).optional()?)
    }

    // ON CONFLICT keeps the transaction usable when a concurrent call won.
    fn insert_match(&mut self, new_match: &NewMatch) -> StoreResult<Option<Match>> {
        Ok(diesel::insert_into(matches::table)
            .values(new_match)
            .on_conflict_do_nothing()
            .returning(Match::as_returning())
            .get_result(self.conn)
            .optional()?)
    }
}

impl SwipeStore for PgSwipeStore {
    fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn()?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }

    fn employer_for_user(&self, user_id: Uuid) -> StoreResult<Option<Uuid>> {
        self.read(|conn| {
            employers::table
                .filter(employers::user_id.eq(user_id))
                .select(employers::id)
                .first::<Uuid>(conn)
                .optional()
        })
    }

    fn applicant_for_user(&self, user_id: Uuid) -> StoreResult<Option<Uuid>> {
        self.read(|conn| {
            applicants::table
                .filter(applicants::user_id.eq(user_id))
                .select(applicants::id)
                .first::<Uuid>(conn)
                .optional()
        })
    }

    fn employer(&self, employer_id: Uuid) -> StoreResult<Option<Employer>> {
        self.read(|conn| {
            employers::table
                .find(employer_id)
                .select(Employer::as_select())
                .first(conn)
                .optional()
        })
    }

    fn applicant(&self, applicant_id: Uuid) -> StoreResult<Option<Applicant>> {
        self.read(|conn| {
            applicants::table
                .find(applicant_id)
                .select(Applicant::as_select())
                .first(conn)
                .optional()
        })
    }

    fn job_posting(&self, job_posting_id: Uuid) -> StoreResult<Option<JobPosting>> {
        self.read(|conn| {
            job_postings::table
                .find(job_posting_id)
                .select(JobPosting::as_select())
                .first(conn)
                .optional()
        })
    }

    fn candidates(
        &self,
        employer_id: Uuid,
        filter: &CandidateFilter,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> StoreResult<Vec<Applicant>> {
        // Liked, or passed with a cooldown that has not run out.
        let hidden = swipes::table
            .select(swipes::applicant_id)
            .filter(swipes::employer_id.eq(employer_id))
            .filter(
                swipes::swipe_type
                    .eq(SwipeType::Like.as_str())
                    .or(swipes::hide_until.is_null())
                    .or(swipes::hide_until.assume_not_null().gt(now)),
            );

        let mut query = applicants::table
            .filter(not(applicants::id.eq_any(hidden)))
            .select(Applicant::as_select())
            .into_boxed();

        for (field, value) in filter.constraints() {
            query = match field {
                CandidateField::Industry => query.filter(applicants::industry.eq(value.clone())),
                CandidateField::Location => query.filter(applicants::location.eq(value.clone())),
                CandidateField::WorkType => query.filter(applicants::work_type.eq(value.clone())),
            };
        }

        let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        self.read(|conn| {
            query
                .order((applicants::created_at.desc(), applicants::id.desc()))
                .limit(limit)
                .offset(offset)
                .load(conn)
        })
    }

    fn matches_for(&self, party_id: Uuid, role: PartyRole) -> StoreResult<Vec<Match>> {
        let mut query = matches::table
            .filter(matches::is_active.eq(true))
            .select(Match::as_select())
            .into_boxed();
        query = match role {
            PartyRole::Employer => query.filter(matches::employer_id.eq(party_id)),
            PartyRole::Applicant => query.filter(matches::applicant_id.eq(party_id)),
        };

        self.read(|conn| {
            query
                .order((matches::matched_at.desc(), matches::id.desc()))
                .load(conn)
        })
    }

    fn liked_by(&self, employer_id: Uuid) -> StoreResult<Vec<(Swipe, Applicant)>> {
        self.read(|conn| {
            swipes::table
                .inner_join(applicants::table.on(applicants::id.eq(swipes::applicant_id)))
                .filter(swipes::employer_id.eq(employer_id))
                .filter(swipes::swipe_type.eq(SwipeType::Like.as_str()))
                .order((swipes::swiped_at.desc(), swipes::id.desc()))
                .select((Swipe::as_select(), Applicant::as_select()))
                .load(conn)
        })
    }

    fn likes_received(&self, applicant_id: Uuid) -> StoreResult<Vec<(Swipe, Employer)>> {
        self.read(|conn| {
            swipes::table
                .inner_join(employers::table.on(employers::id.eq(swipes::employer_id)))
                .filter(swipes::applicant_id.eq(applicant_id))
                .filter(swipes::swipe_type.eq(SwipeType::Like.as_str()))
                .order((swipes::swiped_at.desc(), swipes::id.desc()))
                .select((Swipe::as_select(), Employer::as_select()))
                .load(conn)
        })
    }

    fn deactivate_match(
        &self,
        match_id: Uuid,
        party_id: Uuid,
        role: PartyRole,
    ) -> StoreResult<Option<Match>> {
        self.read(|conn| {
            let active = matches::table
                .filter(matches::id.eq(match_id))
                .filter(matches::is_active.eq(true));
            match role {
                PartyRole::Employer => diesel::update(active.filter(matches::employer_id.eq(party_id)))
                    .set(matches::is_active.eq(false))
                    .returning(Match::as_returning())
                    .get_result(conn)
                    .optional(),
                PartyRole::Applicant => diesel::update(active.filter(matches::applicant_id.eq(party_id)))
                    .set(matches::is_active.eq(false))
                    .returning(Match::as_returning())
                    .get_result(conn)
                    .optional(),
            }
        })
    }

    /// SERIALIZABLE so two reciprocal likes cannot both miss each other;
    /// serialization failures are retried up to `max_tx_retries` times.
    fn transaction<T, F>(&self, mut f: F) -> Result<T, SwipeError>
    where
        F: FnMut(&mut dyn SwipeTx) -> Result<T, SwipeError>,
    {
        let mut conn = self.conn()?;
        let timeout_ms = self.settings.statement_timeout_ms;

        retry_serialization_failures(self.settings.max_tx_retries, |_| {
            conn.build_transaction().serializable().run(|conn| {
                set_local_statement_timeout(conn, timeout_ms)?;
                let mut tx = PgSwipeTx { conn };
                f(&mut tx)
            })
        })
    }
}

/// Calls `attempt` until it returns something other than a serialization
/// failure, at most `1 + max_retries` times. `attempt` receives the 1-based
/// attempt number.
fn retry_serialization_failures<T>(
    max_retries: u32,
    mut attempt: impl FnMut(u32) -> Result<T, SwipeError>,
) -> Result<T, SwipeError> {
    let mut n: u32 = 0;
    loop {
        n += 1;
        match attempt(n) {
            Err(SwipeError::Store(StoreError::SerializationFailure)) if n <= max_retries => {
                tracing::warn!(attempt = n, "swipe transaction serialization failure, retrying");
            }
            other => return other,
        }
    }
}
