use crate::generator::incidents::IncidentGenerator;
use crate::generator::location::SimulatedLocation;
use crate::gui_bridge::model::StatusModel;
use crate::workflow::config::MonitorConfig;
use alertcore::alarm::{AlarmController, AlarmProfile, ToneOutput};
use alertcore::clock::Clock;
use alertcore::geo::{GeoPoint, LocationSource};
use alertcore::proximity::{Incident, NearbyIncident, ProximityMonitor};
use alertcore::telemetry::MetricsRecorder;
use anyhow::Context;
use log::info;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub type SharedRunner = Arc<Mutex<Runner>>;

/// What one call to [`Runner::step`] did.
#[derive(Debug, Default)]
pub struct StepReport {
    pub inserted: Option<NearbyIncident>,
    pub escalated: Option<AlarmProfile>,
}

/// Wires the location feed, incident source, proximity monitor and alarm
/// controller together.
pub struct Runner {
    alarm: AlarmController,
    monitor: ProximityMonitor,
    location: Box<dyn LocationSource>,
    generator: IncidentGenerator,
    clock: Arc<dyn Clock>,
    scan_interval_ms: u64,
    next_scan_ms: u64,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(
        config: &MonitorConfig,
        clock: Arc<dyn Clock>,
        output: Box<dyn ToneOutput>,
    ) -> anyhow::Result<Self> {
        let origin = GeoPoint::new(config.origin_latitude, config.origin_longitude)
            .context("validating simulation origin")?;
        let metrics = Arc::new(MetricsRecorder::new());

        let alarm = AlarmController::new(&config.to_alarm_config(), output, clock.clone())
            .with_metrics(metrics.clone());
        let monitor =
            ProximityMonitor::new(config.to_proximity_config()).with_metrics(metrics.clone());
        let location = Box::new(SimulatedLocation::new(
            origin,
            config.walk_step_deg,
            config.seed,
            clock.clone(),
        ));
        let generator = IncidentGenerator::new(
            config.seed,
            config.detection_probability,
            config.jitter_deg,
        );
        let scan_interval_ms = config.scan_interval_ms.max(1);
        let next_scan_ms = clock.now_ms() + scan_interval_ms;

        Ok(Self {
            alarm,
            monitor,
            location,
            generator,
            clock,
            scan_interval_ms,
            next_scan_ms,
            metrics,
        })
    }

    pub fn with_location(mut self, location: Box<dyn LocationSource>) -> Self {
        self.location = location;
        self
    }

    /// Polls the location, runs a scan when one is due, then lets the alarm
    /// fire whatever emissions have come due.
    pub fn step(&mut self) -> StepReport {
        let mut report = StepReport::default();
        self.monitor.update_location(self.location.poll());

        let now = self.clock.now_ms();
        if now >= self.next_scan_ms {
            self.next_scan_ms = now + self.scan_interval_ms;
            let candidate = match self.monitor.observer_position() {
                Some(observer) if self.monitor.is_monitoring() => {
                    self.generator.maybe_generate(&observer, now)
                }
                _ => None,
            };
            if let Some(incident) = candidate {
                let (inserted, escalated) = self.ingest(incident);
                report.inserted = inserted;
                report.escalated = escalated;
            }
        }

        self.alarm.poll();
        report
    }

    /// Offers an incident to the monitor and applies the escalation contract
    /// to whatever it inserts.
    pub fn ingest(&mut self, incident: Incident) -> (Option<NearbyIncident>, Option<AlarmProfile>) {
        let Some(nearby) = self.monitor.ingest(incident) else {
            return (None, None);
        };
        let escalated = self.monitor.escalation_for(&nearby);
        if let Some(profile) = escalated {
            info!(
                "escalating {} ({}) at {:.0} m to {}",
                nearby.id(),
                nearby.incident.kind.label(),
                nearby.distance_m,
                profile.id
            );
            self.metrics.record_escalation();
            self.alarm.start(profile);
        }
        (Some(nearby), escalated)
    }

    /// Milliseconds until something is next due, capped at `ceiling`.
    pub fn wait_hint(&self, ceiling: Duration) -> Duration {
        let now = self.clock.now_ms();
        let next = self
            .alarm
            .next_deadline()
            .map_or(self.next_scan_ms, |deadline| deadline.min(self.next_scan_ms));
        Duration::from_millis(next.saturating_sub(now)).min(ceiling)
    }

    pub fn alarm(&self) -> &AlarmController {
        &self.alarm
    }

    pub fn alarm_mut(&mut self) -> &mut AlarmController {
        &mut self.alarm
    }

    pub fn monitor(&self) -> &ProximityMonitor {
        &self.monitor
    }

    pub fn monitor_mut(&mut self) -> &mut ProximityMonitor {
        &mut self.monitor
    }

    pub fn status(&self) -> StatusModel {
        StatusModel {
            session: self.alarm.session(),
            feed: self.monitor.snapshot(),
            metrics: self.metrics.snapshot(),
        }
    }
}

/// Steps the shared runner until the task is aborted.
pub async fn drive(runner: SharedRunner, tick: Duration) {
    loop {
        let wait = {
            let mut guard = runner.lock().await;
            guard.step();
            guard.wait_hint(tick)
        };
        tokio::time::sleep(wait.max(Duration::from_millis(1))).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertcore::alarm::{AlarmCategory, NullOutput};
    use alertcore::clock::ManualClock;
    use alertcore::geo::{FixedLocation, LocationFix, EARTH_RADIUS_M};
    use alertcore::proximity::{IncidentKind, Severity};

    fn runner(config: &MonitorConfig) -> (Runner, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let origin = GeoPoint::new(0.0, 0.0).unwrap();
        let runner = Runner::new(config, clock.clone(), Box::new(NullOutput))
            .unwrap()
            .with_location(Box::new(FixedLocation::new(origin)));
        (runner, clock)
    }

    fn incident(id: &str, kind: IncidentKind, severity: Severity, meters_east: f64) -> Incident {
        Incident {
            id: id.into(),
            kind,
            severity,
            location: GeoPoint::new(0.0, (meters_east / EARTH_RADIUS_M).to_degrees()).unwrap(),
            created_at_ms: 0,
        }
    }

    #[test]
    fn critical_fire_nearby_starts_fire_alarm() {
        let (mut runner, _clock) = runner(&MonitorConfig::default());
        runner.step();
        let (inserted, escalated) =
            runner.ingest(incident("f", IncidentKind::Fire, Severity::Critical, 300.0));
        assert!(inserted.is_some());
        assert_eq!(escalated.map(|p| p.category), Some(AlarmCategory::Fire));
        assert!(runner.alarm().is_active());
        assert_eq!(runner.status().metrics.escalations, 1);
    }

    #[test]
    fn critical_incident_beyond_a_kilometer_stays_quiet() {
        let (mut runner, _clock) = runner(&MonitorConfig::default());
        runner.step();
        let (inserted, escalated) =
            runner.ingest(incident("m", IncidentKind::Medical, Severity::Critical, 2_000.0));
        assert!(inserted.is_some());
        assert!(escalated.is_none());
        assert!(!runner.alarm().is_active());
    }

    #[test]
    fn scans_generate_incidents_only_while_monitoring() {
        let config = MonitorConfig {
            detection_probability: 1.0,
            scan_interval_ms: 1_000,
            ..MonitorConfig::default()
        };
        let (mut runner, clock) = runner(&config);
        runner.step();
        clock.set(1_000);
        assert!(runner.step().inserted.is_some());

        runner.monitor_mut().toggle_monitoring();
        clock.set(2_000);
        assert!(runner.step().inserted.is_none());
        assert_eq!(runner.monitor().feed().len(), 1);
    }

    #[test]
    fn feed_stays_bounded_over_a_long_run() {
        let config = MonitorConfig {
            detection_probability: 1.0,
            scan_interval_ms: 100,
            ..MonitorConfig::default()
        };
        let (mut runner, clock) = runner(&config);
        for _ in 0..200 {
            runner.step();
            clock.advance(50);
        }
        assert_eq!(runner.monitor().feed().len(), 5);
        assert!(runner.status().metrics.incidents_retained >= 5);
    }

    #[test]
    fn wait_hint_points_at_next_emission() {
        let (mut runner, _clock) = runner(&MonitorConfig::default());
        runner.alarm_mut().start_category(AlarmCategory::General);
        assert_eq!(
            runner.wait_hint(Duration::from_secs(5)),
            Duration::from_millis(700)
        );
        assert_eq!(
            runner.wait_hint(Duration::from_millis(50)),
            Duration::from_millis(50)
        );
    }

    #[test]
    fn unavailable_location_blocks_ingest_and_scans() {
        let config = MonitorConfig {
            detection_probability: 1.0,
            scan_interval_ms: 1_000,
            ..MonitorConfig::default()
        };
        let (runner, clock) = runner(&config);
        let mut runner =
            runner.with_location(Box::new(FixedLocation::unavailable("permission denied")));
        runner.step();
        assert_eq!(
            runner.status().feed.observer,
            LocationFix::Unavailable("permission denied".into())
        );

        let (inserted, escalated) =
            runner.ingest(incident("f", IncidentKind::Fire, Severity::Critical, 300.0));
        assert!(inserted.is_none());
        assert!(escalated.is_none());

        clock.set(1_000);
        assert!(runner.step().inserted.is_none());
        assert!(runner.monitor().feed().is_empty());
        assert!(!runner.alarm().is_active());
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let config = MonitorConfig {
            origin_latitude: 95.0,
            ..MonitorConfig::default()
        };
        let clock = Arc::new(ManualClock::new(0));
        assert!(Runner::new(&config, clock, Box::new(NullOutput)).is_err());
    }
}
