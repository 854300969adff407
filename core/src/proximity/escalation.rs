use crate::alarm::profile::{AlarmCategory, AlarmProfile};
use crate::proximity::incident::{IncidentKind, NearbyIncident, Severity};

/// Profile the alarm controller should start for a freshly inserted feed
/// entry, if any. Only critical incidents in range and closer than
/// `max_distance_m` escalate; fires get the fire profile, everything else the
/// general one.
pub fn escalation_profile(nearby: &NearbyIncident, max_distance_m: f64) -> Option<AlarmProfile> {
    let escalates = nearby.severity() == Severity::Critical
        && nearby.in_range
        && nearby.distance_m < max_distance_m;
    if !escalates {
        return None;
    }
    let category = match nearby.incident.kind {
        IncidentKind::Fire => AlarmCategory::Fire,
        _ => AlarmCategory::General,
    };
    Some(AlarmProfile::for_category(category))
}
