use super::TrackedObject;
use crate::orbit::GeodeticPosition;
use chrono::{DateTime, Utc};

/// Mean Earth radius used for great-circle distances, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Threshold below which two objects count as nearby, in kilometers.
pub const DEFAULT_NEARBY_THRESHOLD_KM: f64 = 250.0;

/// Great-circle surface distance between two geodetic positions in kilometers.
pub fn haversine_km(a: &GeodeticPosition, b: &GeodeticPosition) -> f64 {
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lon = (b.longitude() - a.longitude()).to_radians();
    let h_raw = (d_lat / 2.0).sin().powi(2)
        + a.latitude().to_radians().cos() * b.latitude().to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // rounding pushes h past 1 for near-antipodal points
    let h = h_raw.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Surface distance and altitude delta composed as a 3D distance.
pub fn geodetic_distance_km(a: &GeodeticPosition, b: &GeodeticPosition) -> f64 {
    let surface = haversine_km(a, b);
    let alt_diff = (a.altitude() - b.altitude()).abs();
    (surface * surface + alt_diff * alt_diff).sqrt()
}

/// Read-only proximity queries over tracked objects.
#[derive(Debug, Copy, Clone)]
pub struct ProximityEvaluator {
    threshold_km: f64,
}

impl Default for ProximityEvaluator {
    fn default() -> Self { Self { threshold_km: DEFAULT_NEARBY_THRESHOLD_KM } }
}

impl ProximityEvaluator {
    pub fn new(threshold_km: f64) -> Self { Self { threshold_km } }

    pub fn threshold_km(&self) -> f64 { self.threshold_km }

    /// Closeness of `a` and `b` at `at` in kilometers.
    ///
    /// # Returns
    /// `f64::INFINITY` if either object cannot produce a position.
    pub fn closeness(a: &TrackedObject, b: &TrackedObject, at: DateTime<Utc>) -> f64 {
        match (a.position_at(at), b.position_at(at)) {
            (Ok(pos_a), Ok(pos_b)) => geodetic_distance_km(&pos_a, &pos_b),
            _ => f64::INFINITY,
        }
    }

    /// Returns all candidates other than `target` that are closer than the
    /// threshold, in candidate order.
    ///
    /// # Arguments
    /// * `threshold_km` – Overrides the evaluator's threshold when given.
    pub fn find_nearby<'a, I>(
        &self,
        target: &TrackedObject,
        candidates: I,
        threshold_km: Option<f64>,
        at: DateTime<Utc>,
    ) -> Vec<(&'a TrackedObject, f64)>
    where
        I: IntoIterator<Item = &'a TrackedObject>,
    {
        let threshold = threshold_km.unwrap_or(self.threshold_km);
        let Ok(target_pos) = target.position_at(at) else {
            return Vec::new();
        };
        candidates
            .into_iter()
            .filter(|c| !std::ptr::eq(*c, target))
            .filter_map(|c| {
                let distance = c
                    .position_at(at)
                    .map_or(f64::INFINITY, |pos| geodetic_distance_km(&target_pos, &pos));
                (distance < threshold).then_some((c, distance))
            })
            .collect()
    }
}
