use crate::geo::point::GeoPoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IncidentKind {
    Fire,
    Medical,
    Security,
    Natural,
    Chemical,
    Power,
}

impl IncidentKind {
    pub const ALL: [IncidentKind; 6] = [
        IncidentKind::Fire,
        IncidentKind::Medical,
        IncidentKind::Security,
        IncidentKind::Natural,
        IncidentKind::Chemical,
        IncidentKind::Power,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IncidentKind::Fire => "Fire Emergency",
            IncidentKind::Medical => "Medical Emergency",
            IncidentKind::Security => "Security Breach",
            IncidentKind::Natural => "Natural Disaster",
            IncidentKind::Chemical => "Chemical Hazard",
            IncidentKind::Power => "Power Outage",
        }
    }
}

/// An incident reported at a location. Identity lasts only as long as the
/// process does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub kind: IncidentKind,
    pub severity: Severity,
    pub location: GeoPoint,
    pub created_at_ms: u64,
}

/// An incident classified against the observer's position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyIncident {
    #[serde(flatten)]
    pub incident: Incident,
    pub distance_m: f64,
    pub in_range: bool,
}

impl NearbyIncident {
    pub fn id(&self) -> &str {
        &self.incident.id
    }

    pub fn severity(&self) -> Severity {
        self.incident.severity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_critical_highest() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Low < Severity::Medium);
    }

    #[test]
    fn every_kind_has_a_distinct_label() {
        let mut labels: Vec<_> = IncidentKind::ALL.iter().map(|kind| kind.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), IncidentKind::ALL.len());
        assert_eq!(IncidentKind::Chemical.label(), "Chemical Hazard");
    }
}
