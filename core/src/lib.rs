//! Alarm tone scheduling and proximity alerting for the emergency monitor.
//!
//! Two independent components live here: the alarm controller, which plays a
//! catalog profile as a repeating tone pattern through an injected output,
//! and the proximity monitor, which classifies incidents against a moving
//! observer and keeps a short feed of nearby ones. Callers wire them together
//! through [`proximity::escalation_profile`].

pub mod alarm;
pub mod clock;
pub mod geo;
pub mod math;
pub mod prelude;
pub mod proximity;
pub mod synthesis;
pub mod telemetry;

pub use prelude::{AlarmConfig, AlertError, AlertResult, ProximityConfig};
