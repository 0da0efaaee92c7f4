use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ event envelope wrapping all domain events.
///
/// Routing key format: `hireswipe.{domain}.{entity}.{action}`
/// Example: `hireswipe.swipe.match.created`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    pub const SWIPE_RECORDED: &str = "hireswipe.swipe.swipe.recorded";
    pub const MATCH_CREATED: &str = "hireswipe.swipe.match.created";
    pub const MATCH_DEACTIVATED: &str = "hireswipe.swipe.match.deactivated";
}

/// Event data payloads
pub mod payloads {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SwipeRecorded {
        pub swipe_id: Uuid,
        /// Party that swiped ("employer" or "applicant").
        pub swiped_by: String,
        pub employer_id: Uuid,
        pub applicant_id: Uuid,
        pub job_posting_id: Option<Uuid>,
        pub swipe_type: String,
        pub hide_until: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchCreated {
        pub match_id: Uuid,
        pub employer_id: Uuid,
        pub applicant_id: Uuid,
        pub job_posting_id: Option<Uuid>,
        pub matched_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchDeactivated {
        pub match_id: Uuid,
        pub employer_id: Uuid,
        pub applicant_id: Uuid,
        pub deactivated_by: Uuid,
    }
}
