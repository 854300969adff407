use crate::geo::point::GeoPoint;
use serde::Serialize;

/// One reading from a location capability.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum LocationFix {
    /// No position yet; the provider is still acquiring.
    Pending,
    Position(GeoPoint),
    /// Location is denied or missing; carries a reason for display.
    Unavailable(String),
}

/// Provider of observer positions (GPS, network, simulation).
pub trait LocationSource: Send {
    fn poll(&mut self) -> LocationFix;
}

/// Source that always reports the same fix.
pub struct FixedLocation {
    fix: LocationFix,
}

impl FixedLocation {
    pub fn new(point: GeoPoint) -> Self {
        Self {
            fix: LocationFix::Position(point),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            fix: LocationFix::Unavailable(reason.into()),
        }
    }
}

impl LocationSource for FixedLocation {
    fn poll(&mut self) -> LocationFix {
        self.fix.clone()
    }
}
