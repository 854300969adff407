use alertcore::geo::GeoPoint;
use alertcore::proximity::{Incident, IncidentKind, Severity};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

const SEVERITIES: [Severity; 4] = [
    Severity::Low,
    Severity::Medium,
    Severity::High,
    Severity::Critical,
];

/// Produces synthetic incidents scattered around the observer.
pub struct IncidentGenerator {
    rng: StdRng,
    probability: f64,
    jitter_deg: f64,
    counter: u64,
}

impl IncidentGenerator {
    pub fn new(seed: u64, probability: f64, jitter_deg: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            probability: if probability.is_finite() {
                probability.clamp(0.0, 1.0)
            } else {
                0.0
            },
            jitter_deg: jitter_deg.abs(),
            counter: 0,
        }
    }

    /// Rolls the detection probability and generates an incident on success.
    pub fn maybe_generate(&mut self, observer: &GeoPoint, now_ms: u64) -> Option<Incident> {
        if self.rng.gen_bool(self.probability) {
            Some(self.generate(observer, now_ms))
        } else {
            None
        }
    }

    pub fn generate(&mut self, observer: &GeoPoint, now_ms: u64) -> Incident {
        self.counter += 1;
        let lat_offset = (self.rng.gen::<f64>() - 0.5) * self.jitter_deg;
        let lon_offset = (self.rng.gen::<f64>() - 0.5) * self.jitter_deg;
        let latitude = (observer.latitude + lat_offset).clamp(-90.0, 90.0);
        let longitude = wrap_longitude(observer.longitude + lon_offset);
        let kind = *IncidentKind::ALL
            .choose(&mut self.rng)
            .unwrap_or(&IncidentKind::Fire);
        let severity = *SEVERITIES.choose(&mut self.rng).unwrap_or(&Severity::High);

        Incident {
            id: format!("local-{}-{}", now_ms, self.counter),
            kind,
            severity,
            location: GeoPoint {
                latitude,
                longitude,
                accuracy_m: None,
                timestamp_ms: now_ms,
            },
            created_at_ms: now_ms,
        }
    }
}

fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}
