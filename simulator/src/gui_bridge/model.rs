use alertcore::alarm::AlarmSession;
use alertcore::proximity::FeedSnapshot;
use alertcore::telemetry::MetricsSnapshot;
use serde::Serialize;

/// Everything a status consumer renders: alarm session, nearby feed, counters.
#[derive(Debug, Clone, Serialize)]
pub struct StatusModel {
    pub session: AlarmSession,
    pub feed: FeedSnapshot,
    pub metrics: MetricsSnapshot,
}
