use crate::geo::haversine::distance;
use crate::geo::point::GeoPoint;
use crate::proximity::incident::NearbyIncident;
use std::collections::VecDeque;

/// Bounded, newest-first list of in-range incidents, unique by id.
#[derive(Debug, Clone)]
pub struct Feed {
    entries: VecDeque<NearbyIncident>,
    capacity: usize,
}

impl Feed {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Inserts `candidate` at the front. Out-of-range candidates and ids
    /// already present leave the feed untouched; the first detection wins.
    /// Returns whether the feed changed.
    pub fn upsert(&mut self, candidate: NearbyIncident) -> bool {
        if !candidate.in_range || self.capacity == 0 || self.contains(candidate.id()) {
            return false;
        }
        self.entries.push_front(candidate);
        self.entries.truncate(self.capacity);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    /// Recomputes distances from a new observer position and drops entries
    /// that fell out of range. Returns how many were dropped.
    pub fn refresh(&mut self, observer: &GeoPoint, alert_radius_m: f64) -> usize {
        let before = self.entries.len();
        for entry in self.entries.iter_mut() {
            entry.distance_m = distance(observer, &entry.incident.location);
            entry.in_range = entry.distance_m <= alert_radius_m;
        }
        self.entries.retain(|entry| entry.in_range);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &NearbyIncident> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<NearbyIncident> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
