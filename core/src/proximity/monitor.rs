use crate::alarm::profile::AlarmProfile;
use crate::geo::location::LocationFix;
use crate::geo::point::GeoPoint;
use crate::prelude::ProximityConfig;
use crate::proximity::escalation::escalation_profile;
use crate::proximity::evaluator::evaluate;
use crate::proximity::feed::Feed;
use crate::proximity::incident::{Incident, NearbyIncident};
use crate::telemetry::{LogManager, MetricsRecorder};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// Observable view of the monitor for status consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub monitoring: bool,
    pub observer: LocationFix,
    pub alert_radius_m: f64,
    pub entries: Vec<NearbyIncident>,
}

/// Keeps the nearby feed for a moving observer.
///
/// The monitoring flag gates ingestion only; `evaluate` and `Feed::upsert`
/// stay pure and are never called while monitoring is off.
pub struct ProximityMonitor {
    config: ProximityConfig,
    feed: Feed,
    monitoring: bool,
    observer: LocationFix,
    snapshots: watch::Sender<FeedSnapshot>,
    logger: LogManager,
    metrics: Arc<MetricsRecorder>,
}

impl ProximityMonitor {
    pub fn new(config: ProximityConfig) -> Self {
        let feed = Feed::with_capacity(config.feed_capacity);
        let observer = LocationFix::Pending;
        let (snapshots, _) = watch::channel(FeedSnapshot {
            monitoring: true,
            observer: observer.clone(),
            alert_radius_m: config.alert_radius_m,
            entries: Vec::new(),
        });
        Self {
            config,
            feed,
            monitoring: true,
            observer,
            snapshots,
            logger: LogManager::new("proximity"),
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Applies a location reading. Malformed positions are ignored and the
    /// previous reading is kept.
    pub fn update_location(&mut self, fix: LocationFix) {
        match &fix {
            LocationFix::Position(point) => {
                if let Err(err) = point.validate() {
                    self.logger.degraded(&format!("ignoring position: {}", err));
                    return;
                }
                let dropped = self.feed.refresh(point, self.config.alert_radius_m);
                if dropped > 0 {
                    self.logger
                        .record(&format!("{} incidents left the alert radius", dropped));
                }
            }
            LocationFix::Unavailable(reason) => {
                if self.observer != fix {
                    self.logger
                        .degraded(&format!("location unavailable: {}", reason));
                }
            }
            LocationFix::Pending => {}
        }
        if self.observer != fix {
            self.observer = fix;
            self.publish();
        }
    }

    pub fn observer_position(&self) -> Option<GeoPoint> {
        match &self.observer {
            LocationFix::Position(point) => Some(*point),
            _ => None,
        }
    }

    /// Evaluates `incident` against the current observer and offers it to the
    /// feed. Returns the entry if it was inserted. Does nothing while
    /// monitoring is off or before the first position arrives.
    pub fn ingest(&mut self, incident: Incident) -> Option<NearbyIncident> {
        if !self.monitoring {
            return None;
        }
        let observer = self.observer_position()?;
        if let Err(err) = incident.location.validate() {
            self.logger
                .degraded(&format!("ignoring incident {}: {}", incident.id, err));
            return None;
        }

        let nearby = evaluate(&observer, incident, self.config.alert_radius_m);
        self.metrics.record_evaluated();
        if !self.feed.upsert(nearby.clone()) {
            return None;
        }

        self.metrics.record_retained();
        self.logger.event("nearby", &nearby);
        self.publish();
        Some(nearby)
    }

    /// Alarm the caller should raise for a freshly inserted entry.
    pub fn escalation_for(&self, nearby: &NearbyIncident) -> Option<AlarmProfile> {
        escalation_profile(nearby, self.config.escalation_distance_m)
    }

    /// Flips the monitoring flag and returns its new value.
    pub fn toggle_monitoring(&mut self) -> bool {
        self.monitoring = !self.monitoring;
        self.logger.record(if self.monitoring {
            "monitoring resumed"
        } else {
            "monitoring paused"
        });
        self.publish();
        self.monitoring
    }

    pub fn clear(&mut self) {
        if !self.feed.is_empty() {
            self.feed.clear();
            self.publish();
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            monitoring: self.monitoring,
            observer: self.observer.clone(),
            alert_radius_m: self.config.alert_radius_m,
            entries: self.feed.to_vec(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshots.subscribe()
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}
