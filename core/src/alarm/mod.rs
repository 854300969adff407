//! Alarm tone synthesis: the profile catalog, the per-cycle schedule, the
//! gain envelope, and the controller that plays a profile until stopped.

pub mod controller;
pub mod envelope;
pub mod output;
pub mod profile;
pub mod schedule;

pub use controller::{AlarmController, AlarmSession};
pub use envelope::Envelope;
pub use output::{NullOutput, Tone, ToneOutput};
pub use profile::{AlarmCategory, AlarmProfile, Pattern, PatternStep, CATALOG};
pub use schedule::{schedule_cycle, ScheduledTone};
