//! The fleet of tracked satellites, their visibility and the single tracked object.

mod component;
mod ground_station;
mod notifier;
mod proximity;
mod registry;
mod snapshot;
mod source;
mod tracked_object;
mod tracking;

pub use component::{Component, ComponentError};
pub use ground_station::GroundStation;
pub use notifier::{LogNotifier, PassNotifier};
pub use proximity::{
    DEFAULT_NEARBY_THRESHOLD_KM, EARTH_RADIUS_KM, ProximityEvaluator, geodetic_distance_km, haversine_km,
};
pub use registry::{BatchReport, FleetRegistry, IngestOutcome, IngestReport};
pub use snapshot::FleetSnapshot;
pub use source::ElementSource;
pub use tracked_object::{PositionSample, TrackedObject};
pub use tracking::{TrackError, TrackOutcome, TrackingCoordinator, TrackingState};
