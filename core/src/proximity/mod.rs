//! Distance-based classification of incidents around a moving observer and
//! the bounded feed of nearby ones.

pub mod escalation;
pub mod evaluator;
pub mod feed;
pub mod incident;
pub mod monitor;

pub use escalation::escalation_profile;
pub use evaluator::evaluate;
pub use feed::Feed;
pub use incident::{Incident, IncidentKind, NearbyIncident, Severity};
pub use monitor::{FeedSnapshot, ProximityMonitor};
