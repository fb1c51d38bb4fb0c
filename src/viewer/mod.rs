//! The seam towards the external 3D viewer.

mod log_viewer;

pub use log_viewer::LogViewer;

use crate::fleet::Component;
use crate::orbit::{ElementKey, GeodeticPosition};
use std::collections::BTreeSet;
use tokio::sync::broadcast;

/// Notifications fired by the viewer on user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// The entity followed by the camera changed, `None` if the camera was detached.
    TrackedEntityChanged(Option<ElementKey>),
}

/// Render and camera primitives of the external viewer.
///
/// All methods are fire-and-forget, the registry never waits for the viewer.
pub trait Viewer: Send + Sync {
    /// Creates the entity if needed and shows exactly `components`.
    fn show(&self, entity: &ElementKey, components: &BTreeSet<Component>);
    /// Removes every component of the entity from the scene.
    fn hide(&self, entity: &ElementKey);
    fn enable_component(&self, entity: &ElementKey, component: Component);
    fn disable_component(&self, entity: &ElementKey, component: Component);
    /// Makes the camera follow the entity.
    fn track(&self, entity: &ElementKey, position: &GeodeticPosition);
    /// Detaches the camera from whatever it follows.
    fn clear_track(&self);
    /// Releases global render resources once nothing is visible anymore.
    fn cleanup(&self);
    fn set_camera_target(&self, position: &GeodeticPosition);
    fn show_ground_station(&self, position: &GeodeticPosition);
    fn hide_ground_station(&self);
    /// Subscribes to viewer notifications.
    fn subscribe(&self) -> broadcast::Receiver<ViewerEvent>;
}
