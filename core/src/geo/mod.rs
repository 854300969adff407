pub mod haversine;
pub mod location;
pub mod point;

pub use haversine::{distance, format_distance, EARTH_RADIUS_M};
pub use location::{FixedLocation, LocationFix, LocationSource};
pub use point::GeoPoint;
