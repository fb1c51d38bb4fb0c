//! Element sets, propagation and the geodetic helpers needed for distance estimation.

mod element_set;
mod geodetic;
mod propagator;

pub use element_set::{ElementKey, OrbitalElementSet, ParseError, split_records};
pub use geodetic::{EciPosition, GeodeticPosition, greenwich_mean_sidereal_time};
pub use propagator::{Orbit, PropagationFailure, Propagator, Sgp4Orbit, Sgp4Propagator};
