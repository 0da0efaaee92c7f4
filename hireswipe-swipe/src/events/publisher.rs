use serde::Serialize;
use uuid::Uuid;

use hireswipe_shared::types::event::{payloads, routing_keys, Event};

use super::EventSink;
use crate::engine::SwipeOutcome;
use crate::models::Match;

const SOURCE: &str = "hireswipe-swipe";

async fn publish<T: Serialize>(sink: &dyn EventSink, routing_key: &str, user_id: Uuid, data: T) {
    let data = match serde_json::to_value(data) {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(error = %e, routing_key, "failed to serialize event payload");
            return;
        }
    };
    let event = Event::new(SOURCE, routing_key, data).with_user(user_id);

    if let Err(e) = sink.publish(routing_key, &event).await {
        tracing::error!(error = %e, routing_key, "failed to publish event");
    }
}

/// Publishes `swipe.recorded`, plus `match.created` when this swipe created the match.
pub async fn publish_swipe_outcome(sink: &dyn EventSink, user_id: Uuid, outcome: &SwipeOutcome) {
    publish(
        sink,
        routing_keys::SWIPE_RECORDED,
        user_id,
        payloads::SwipeRecorded {
            swipe_id: outcome.swipe.id,
            swiped_by: outcome.swiped_by.to_string(),
            employer_id: outcome.employer_id,
            applicant_id: outcome.applicant_id,
            job_posting_id: outcome.swipe.job_posting_id,
            swipe_type: outcome.swipe.swipe_type.clone(),
            hide_until: outcome.swipe.hide_until,
        },
    )
    .await;

    if let (Some(m), true) = (&outcome.matched, outcome.match_created) {
        publish(
            sink,
            routing_keys::MATCH_CREATED,
            user_id,
            payloads::MatchCreated {
                match_id: m.id,
                employer_id: m.employer_id,
                applicant_id: m.applicant_id,
                job_posting_id: m.job_posting_id,
                matched_at: m.matched_at,
            },
        )
        .await;
    }
}

pub async fn publish_match_deactivated(sink: &dyn EventSink, user_id: Uuid, party_id: Uuid, m: &Match) {
    publish(
        sink,
        routing_keys::MATCH_DEACTIVATED,
        user_id,
        payloads::MatchDeactivated {
            match_id: m.id,
            employer_id: m.employer_id,
            applicant_id: m.applicant_id,
            deactivated_by: party_id,
        },
    )
    .await;
}
