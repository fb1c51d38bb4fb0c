use chrono::{DateTime, Utc};
use std::{f64::consts::PI, fmt::Display};

/// WGS-84 equatorial radius in kilometers.
pub const WGS84_A_KM: f64 = 6378.137;
/// WGS-84 polar radius in kilometers.
pub const WGS84_B_KM: f64 = 6_356.752_314_2;

/// 2000-01-01T12:00:00Z in milliseconds since the unix epoch.
const J2000_UNIX_MS: i64 = 946_728_000_000;
const SECONDS_PER_DAY: f64 = 86400.0;
const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;
const GMST_BASE_DEG: f64 = 280.460_618_37;
const GMST_ROTATION_PER_DAY: f64 = 360.985_647_366_29;
const GMST_CORRECTION: f64 = 0.000_387_933;
const GMST_CUBIC_DIVISOR: f64 = 38_710_000.0;
const GEODETIC_ITERATIONS: usize = 20;

/// A position in the Earth-centered inertial frame, in kilometers.
#[derive(Debug, Copy, Clone, PartialEq, serde::Serialize)]
pub struct EciPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EciPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self { Self { x, y, z } }

    /// Euclidean norm of the position vector.
    pub fn abs(&self) -> f64 { (self.x * self.x + self.y * self.y + self.z * self.z).sqrt() }

    /// Converts this position to geodetic coordinates on the WGS-84 ellipsoid.
    ///
    /// # Arguments
    /// * `gmst` – Greenwich mean sidereal time in radians at the instant of the position.
    ///
    /// # Returns
    /// Latitude and longitude in degrees, altitude in kilometers.
    pub fn to_geodetic(&self, gmst: f64) -> GeodeticPosition {
        let f = (WGS84_A_KM - WGS84_B_KM) / WGS84_A_KM;
        let e2 = 2.0 * f - f * f;
        let r = (self.x * self.x + self.y * self.y).sqrt();

        let lon = wrap_pi(self.y.atan2(self.x) - gmst);
        let mut lat = self.z.atan2(r);
        for _ in 0..GEODETIC_ITERATIONS {
            let c = 1.0 / (1.0 - e2 * lat.sin() * lat.sin()).sqrt();
            lat = (self.z + WGS84_A_KM * c * e2 * lat.sin()).atan2(r);
        }
        // stays finite at the poles, unlike r / cos(lat)
        let alt = r * lat.cos() + self.z * lat.sin()
            - WGS84_A_KM * (1.0 - e2 * lat.sin() * lat.sin()).sqrt();
        GeodeticPosition::new(lat.to_degrees(), lon.to_degrees(), alt)
    }
}

/// Latitude/longitude in degrees, altitude above the ellipsoid in kilometers.
#[derive(Debug, Copy, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeodeticPosition {
    latitude: f64,
    longitude: f64,
    altitude: f64,
}

impl GeodeticPosition {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self { latitude, longitude, altitude }
    }

    pub fn latitude(&self) -> f64 { self.latitude }
    pub fn longitude(&self) -> f64 { self.longitude }
    pub fn altitude(&self) -> f64 { self.altitude }

    pub(crate) fn clamp_altitude(&mut self, min: f64, to: f64) {
        if self.altitude < min {
            self.altitude = to;
        }
    }

    /// Earth-centered, Earth-fixed coordinates of this position on the WGS-84 ellipsoid.
    pub fn to_ecef(&self) -> [f64; 3] {
        let f = (WGS84_A_KM - WGS84_B_KM) / WGS84_A_KM;
        let e2 = 2.0 * f - f * f;
        let (lat, lon) = (self.latitude.to_radians(), self.longitude.to_radians());
        let n = WGS84_A_KM / (1.0 - e2 * lat.sin() * lat.sin()).sqrt();
        [
            (n + self.altitude) * lat.cos() * lon.cos(),
            (n + self.altitude) * lat.cos() * lon.sin(),
            (n * (1.0 - e2) + self.altitude) * lat.sin(),
        ]
    }

    /// Elevation angle in degrees of `target` above the local horizon of `self`.
    pub fn elevation_to(&self, target: &GeodeticPosition) -> f64 {
        let obs = self.to_ecef();
        let tgt = target.to_ecef();
        let range = [tgt[0] - obs[0], tgt[1] - obs[1], tgt[2] - obs[2]];
        let range_abs = (range[0] * range[0] + range[1] * range[1] + range[2] * range[2]).sqrt();
        if range_abs <= f64::EPSILON {
            return 90.0;
        }
        let (lat, lon) = (self.latitude.to_radians(), self.longitude.to_radians());
        let up = [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()];
        let dot = range[0] * up[0] + range[1] * up[1] + range[2] * up[2];
        (dot / range_abs).clamp(-1.0, 1.0).asin().to_degrees()
    }
}

impl Display for GeodeticPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.3}°, {:.3}°, {:.1}km]", self.latitude, self.longitude, self.altitude)
    }
}

/// Greenwich mean sidereal time in radians.
pub fn greenwich_mean_sidereal_time(timestamp: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let days = (timestamp.timestamp_millis() - J2000_UNIX_MS) as f64 / (1000.0 * SECONDS_PER_DAY);
    let centuries = days / DAYS_PER_JULIAN_CENTURY;
    let gmst_deg = GMST_BASE_DEG + GMST_ROTATION_PER_DAY * days + GMST_CORRECTION * centuries * centuries
        - centuries * centuries * centuries / GMST_CUBIC_DIVISOR;
    gmst_deg.rem_euclid(360.0).to_radians()
}

fn wrap_pi(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI { wrapped + 2.0 * PI } else { wrapped }
}
