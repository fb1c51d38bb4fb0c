use super::{Viewer, ViewerEvent};
use crate::fleet::Component;
use crate::orbit::{ElementKey, GeodeticPosition};
use crate::{event, info, log};
use itertools::Itertools;
use std::{collections::BTreeSet, sync::Mutex};
use tokio::sync::broadcast;

/// Headless [`Viewer`] that logs every primitive.
///
/// Like an interactive viewer it fires [`ViewerEvent::TrackedEntityChanged`]
/// whenever the followed entity actually changes.
pub struct LogViewer {
    /// Currently followed entity.
    tracked: Mutex<Option<ElementKey>>,
    /// Broadcast sender for viewer notifications.
    events: broadcast::Sender<ViewerEvent>,
}

impl LogViewer {
    const EVENT_CAPACITY: usize = 16;

    pub fn new() -> Self {
        let (events, _) = broadcast::channel(Self::EVENT_CAPACITY);
        Self { tracked: Mutex::new(None), events }
    }

    /// Simulates the user detaching the camera in the viewer.
    pub fn detach_camera(&self) { self.set_tracked(None); }

    fn set_tracked(&self, entity: Option<ElementKey>) {
        let changed = {
            let mut tracked = self.tracked.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            let changed = *tracked != entity;
            tracked.clone_from(&entity);
            changed
        };
        if changed {
            // nobody listening is fine
            let _ = self.events.send(ViewerEvent::TrackedEntityChanged(entity));
        }
    }
}

impl Default for LogViewer {
    fn default() -> Self { Self::new() }
}

impl Viewer for LogViewer {
    fn show(&self, entity: &ElementKey, components: &BTreeSet<Component>) {
        event!("Showing {entity} with [{}]", components.iter().join(", "));
    }

    fn hide(&self, entity: &ElementKey) {
        event!("Hiding {entity}");
    }

    fn enable_component(&self, entity: &ElementKey, component: Component) {
        event!("Enabling {component} on {entity}");
    }

    fn disable_component(&self, entity: &ElementKey, component: Component) {
        event!("Disabling {component} on {entity}");
    }

    fn track(&self, entity: &ElementKey, position: &GeodeticPosition) {
        info!("Camera follows {entity} at {position}");
        self.set_tracked(Some(entity.clone()));
    }

    fn clear_track(&self) {
        log!("Camera detached");
        self.set_tracked(None);
    }

    fn cleanup(&self) {
        log!("Nothing visible anymore, releasing render resources");
    }

    fn set_camera_target(&self, position: &GeodeticPosition) {
        log!("Camera target set to {position}");
    }

    fn show_ground_station(&self, position: &GeodeticPosition) {
        info!("Ground station placed at {position}");
    }

    fn hide_ground_station(&self) {
        event!("Removing ground station");
    }

    fn subscribe(&self) -> broadcast::Receiver<ViewerEvent> { self.events.subscribe() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_fires_once_per_change() {
        let viewer = LogViewer::new();
        let mut rx = viewer.subscribe();
        let key = ElementKey::new("25544", "ISS (ZARYA)");
        let pos = GeodeticPosition::new(0.0, 0.0, 400.0);

        viewer.track(&key, &pos);
        viewer.track(&key, &pos);
        viewer.detach_camera();

        assert_eq!(rx.try_recv().unwrap(), ViewerEvent::TrackedEntityChanged(Some(key)));
        assert_eq!(rx.try_recv().unwrap(), ViewerEvent::TrackedEntityChanged(None));
        assert!(rx.try_recv().is_err());
    }
}
