use crate::geo::haversine::distance;
use crate::geo::point::GeoPoint;
use crate::proximity::incident::{Incident, NearbyIncident};

/// Classifies `incident` as inside or outside `alert_radius_m` of `observer`.
pub fn evaluate(observer: &GeoPoint, incident: Incident, alert_radius_m: f64) -> NearbyIncident {
    let distance_m = distance(observer, &incident.location);
    NearbyIncident {
        incident,
        distance_m,
        in_range: distance_m <= alert_radius_m,
    }
}
