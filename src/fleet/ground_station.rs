use crate::orbit::GeodeticPosition;
use std::sync::Arc;

/// An observer on the ground. Objects hold a shared, read-only handle to its position.
#[derive(Debug, Clone)]
pub struct GroundStation {
    position: Arc<GeodeticPosition>,
}

impl GroundStation {
    /// Heights below this many kilometers are treated as sea level.
    const MIN_HEIGHT: f64 = 1.0;

    /// Creates a station, clamping heights below one to zero.
    pub fn new(mut position: GeodeticPosition) -> Self {
        position.clamp_altitude(Self::MIN_HEIGHT, 0.0);
        Self { position: Arc::new(position) }
    }

    pub fn position(&self) -> &GeodeticPosition { &self.position }

    /// Shared handle handed out to every tracked object.
    pub fn position_handle(&self) -> Arc<GeodeticPosition> { Arc::clone(&self.position) }

    /// `[latitude, longitude]` as published to the store.
    pub fn coordinates(&self) -> [f64; 2] { [self.position.latitude(), self.position.longitude()] }
}
