use super::{EciPosition, GeodeticPosition, OrbitalElementSet, ParseError, greenwich_mean_sidereal_time};
use chrono::{DateTime, Utc};
use std::{fmt::Debug, sync::Arc};
use strum_macros::Display;

/// The position of an object could not be derived at the requested time.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum PropagationFailure {
    /// The object has no propagation capability at all.
    Degraded,
    /// The SGP4 model rejected the requested instant.
    Sgp4(String),
}

impl std::error::Error for PropagationFailure {}

/// Per-object capability to derive a position at a given instant.
pub trait Orbit: Send + Sync + Debug {
    /// Earth-centered inertial position in kilometers at `at`.
    fn position_eci(&self, at: DateTime<Utc>) -> Result<EciPosition, PropagationFailure>;

    /// Geodetic position at `at`, converted from the inertial position via
    /// Greenwich mean sidereal time.
    fn position_geodetic(&self, at: DateTime<Utc>) -> Result<GeodeticPosition, PropagationFailure> {
        let eci = self.position_eci(at)?;
        Ok(eci.to_geodetic(greenwich_mean_sidereal_time(at)))
    }
}

/// Builds the [`Orbit`] of a freshly parsed element set.
pub trait Propagator: Send + Sync {
    /// # Returns
    /// The propagation capability, or [`ParseError::NoPropagation`] when the
    /// element values cannot be turned into a model.
    fn prepare(&self, elements: &OrbitalElementSet) -> Result<Arc<dyn Orbit>, ParseError>;
}

/// [`Propagator`] backed by the SGP4 model of the `sgp4` crate.
#[derive(Debug, Default, Copy, Clone)]
pub struct Sgp4Propagator;

impl Propagator for Sgp4Propagator {
    fn prepare(&self, elements: &OrbitalElementSet) -> Result<Arc<dyn Orbit>, ParseError> {
        let no_propagation = |reason: String| ParseError::NoPropagation {
            name: elements.name().to_string(),
            reason,
        };
        let parsed = sgp4::Elements::from_tle(
            Some(elements.name().to_string()),
            elements.line1().as_bytes(),
            elements.line2().as_bytes(),
        )
        .map_err(|e| no_propagation(e.to_string()))?;
        let constants =
            sgp4::Constants::from_elements(&parsed).map_err(|e| no_propagation(e.to_string()))?;
        Ok(Arc::new(Sgp4Orbit { constants, epoch: parsed.datetime.and_utc() }))
    }
}

/// SGP4 constants of one object together with its element epoch.
pub struct Sgp4Orbit {
    constants: sgp4::Constants,
    epoch: DateTime<Utc>,
}

impl Debug for Sgp4Orbit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sgp4Orbit").field("epoch", &self.epoch).finish_non_exhaustive()
    }
}

impl Orbit for Sgp4Orbit {
    fn position_eci(&self, at: DateTime<Utc>) -> Result<EciPosition, PropagationFailure> {
        #[allow(clippy::cast_precision_loss)]
        let minutes = (at - self.epoch).num_milliseconds() as f64 / 60_000.0;
        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes))
            .map_err(|e| PropagationFailure::Sgp4(e.to_string()))?;
        let [x, y, z] = prediction.position;
        Ok(EciPosition::new(x, y, z))
    }
}
