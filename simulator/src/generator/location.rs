use alertcore::clock::Clock;
use alertcore::geo::{GeoPoint, LocationFix, LocationSource};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;

/// Observer that wanders from an origin in small random steps.
///
/// The first poll reports `Pending`, like a receiver acquiring a fix.
pub struct SimulatedLocation {
    rng: StdRng,
    current: GeoPoint,
    step_deg: f64,
    acquired: bool,
    clock: Arc<dyn Clock>,
}

impl SimulatedLocation {
    pub fn new(origin: GeoPoint, step_deg: f64, seed: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
            current: origin,
            step_deg: step_deg.abs(),
            acquired: false,
            clock,
        }
    }

    fn wander(&mut self) {
        if self.step_deg == 0.0 {
            return;
        }
        let d_lat = self.rng.gen_range(-self.step_deg..=self.step_deg);
        let d_lon = self.rng.gen_range(-self.step_deg..=self.step_deg);
        self.current.latitude = (self.current.latitude + d_lat).clamp(-90.0, 90.0);
        self.current.longitude = (self.current.longitude + d_lon).clamp(-180.0, 180.0);
    }
}

impl LocationSource for SimulatedLocation {
    fn poll(&mut self) -> LocationFix {
        if !self.acquired {
            self.acquired = true;
            return LocationFix::Pending;
        }
        self.wander();
        let accuracy = self.rng.gen_range(5.0..30.0);
        LocationFix::Position(
            self.current
                .with_accuracy(accuracy)
                .at(self.clock.now_ms()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertcore::clock::ManualClock;
    use alertcore::geo::distance;

    #[test]
    fn first_poll_is_pending_then_positions_follow() {
        let clock = Arc::new(ManualClock::new(500));
        let origin = GeoPoint::new(40.0, -74.0).unwrap();
        let mut source = SimulatedLocation::new(origin, 0.0001, 7, clock);
        assert_eq!(source.poll(), LocationFix::Pending);
        match source.poll() {
            LocationFix::Position(point) => {
                assert_eq!(point.timestamp_ms, 500);
                assert!(distance(&origin, &point) < 50.0);
                assert!(point.accuracy_m.is_some());
            }
            other => panic!("expected a position, got {:?}", other),
        }
    }

    #[test]
    fn zero_step_stays_put() {
        let clock = Arc::new(ManualClock::new(0));
        let origin = GeoPoint::new(1.0, 2.0).unwrap();
        let mut source = SimulatedLocation::new(origin, 0.0, 7, clock);
        source.poll();
        for _ in 0..10 {
            match source.poll() {
                LocationFix::Position(point) => {
                    assert_eq!((point.latitude, point.longitude), (1.0, 2.0))
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }
}
