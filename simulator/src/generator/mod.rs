pub mod incidents;
pub mod location;
