use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{applicants, employers, job_postings, matches, swipes};

// --- SwipeType ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeType {
    Like,
    Pass,
}

impl SwipeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeType::Like => "Like",
            SwipeType::Pass => "Pass",
        }
    }
}

impl std::fmt::Display for SwipeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SwipeType {
    type Err = String;

    // Exact match: the column CHECK constraint only admits these two spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Like" => Ok(SwipeType::Like),
            "Pass" => Ok(SwipeType::Pass),
            _ => Err(format!("swipeType must be 'Like' or 'Pass', got '{s}'")),
        }
    }
}

// --- Employer ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone, PartialEq)]
#[diesel(table_name = employers)]
#[serde(rename_all = "camelCase")]
pub struct Employer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Applicant ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone, PartialEq)]
#[diesel(table_name = applicants)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub work_type: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- JobPosting ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone, PartialEq)]
#[diesel(table_name = job_postings)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// --- Swipe ---

/// One directional decision. `employer_id` is the swiping party and
/// `applicant_id` the target; applicant swipes occupy the slots swapped.
#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone, PartialEq)]
#[diesel(table_name = swipes)]
#[serde(rename_all = "camelCase")]
pub struct Swipe {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub applicant_id: Uuid,
    pub job_posting_id: Option<Uuid>,
    pub swipe_type: String,
    pub swiped_at: DateTime<Utc>,
    pub hide_until: Option<DateTime<Utc>>,
}

impl Swipe {
    pub fn is_like(&self) -> bool {
        self.swipe_type == SwipeType::Like.as_str()
    }

    /// Whether this swipe keeps its target out of the swiper's candidate list at `now`.
    pub fn hides_candidate_at(&self, now: DateTime<Utc>) -> bool {
        if self.is_like() {
            return true;
        }
        match self.hide_until {
            Some(until) => now < until,
            None => true,
        }
    }
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = swipes)]
pub struct NewSwipe {
    pub employer_id: Uuid,
    pub applicant_id: Uuid,
    pub job_posting_id: Option<Uuid>,
    pub swipe_type: String,
    pub swiped_at: DateTime<Utc>,
    pub hide_until: Option<DateTime<Utc>>,
}

// --- Match ---

#[derive(Debug, Queryable, Selectable, Identifiable, Serialize, Clone, PartialEq)]
#[diesel(table_name = matches)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub applicant_id: Uuid,
    pub job_posting_id: Option<Uuid>,
    pub matched_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = matches)]
pub struct NewMatch {
    pub employer_id: Uuid,
    pub applicant_id: Uuid,
    pub job_posting_id: Option<Uuid>,
    pub matched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn swipe(kind: SwipeType, hide_until: Option<DateTime<Utc>>) -> Swipe {
        Swipe {
            id: Uuid::now_v7(),
            employer_id: Uuid::now_v7(),
            applicant_id: Uuid::now_v7(),
            job_posting_id: None,
            swipe_type: kind.as_str().to_string(),
            swiped_at: Utc::now(),
            hide_until,
        }
    }

    #[test]
    fn swipe_type_parses_exact_spelling() {
        assert_eq!("Like".parse::<SwipeType>(), Ok(SwipeType::Like));
        assert_eq!("Pass".parse::<SwipeType>(), Ok(SwipeType::Pass));
        assert!("like".parse::<SwipeType>().is_err());
        assert!("SuperLike".parse::<SwipeType>().is_err());
    }

    #[test]
    fn like_hides_forever() {
        let now = Utc::now();
        assert!(swipe(SwipeType::Like, None).hides_candidate_at(now + Duration::days(365)));
    }

    #[test]
    fn pass_hides_until_cooldown_elapses() {
        let now = Utc::now();
        let until = now + Duration::hours(24);
        let pass = swipe(SwipeType::Pass, Some(until));

        assert!(pass.hides_candidate_at(now));
        assert!(pass.hides_candidate_at(until - Duration::seconds(1)));
        assert!(!pass.hides_candidate_at(until));
    }

    #[test]
    fn pass_without_deadline_stays_hidden() {
        assert!(swipe(SwipeType::Pass, None).hides_candidate_at(Utc::now()));
    }
}
