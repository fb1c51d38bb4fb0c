use super::Component;
use crate::orbit::{ElementKey, GeodeticPosition, Orbit, OrbitalElementSet, PropagationFailure};
use crate::viewer::Viewer;
use chrono::{DateTime, Utc};
use std::{collections::BTreeSet, sync::Arc};

/// The geodetic position of an object sampled at a given instant.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionSample {
    at: DateTime<Utc>,
    position: GeodeticPosition,
}

impl PositionSample {
    pub fn at(&self) -> DateTime<Utc> { self.at }
    pub fn position(&self) -> &GeodeticPosition { &self.position }
}

/// One satellite known to the registry.
///
/// Flags are only mutated by the registry and the tracking coordinator;
/// everyone else gets read access.
#[derive(Debug)]
pub struct TrackedObject {
    /// Parsed element set including its tags.
    elements: OrbitalElementSet,
    /// Propagation capability, `None` for degraded objects.
    orbit: Option<Arc<dyn Orbit>>,
    /// Components currently shown in the viewer.
    components: BTreeSet<Component>,
    /// Whether the object is selected in the UI.
    selected: bool,
    /// Whether the viewer camera follows this object.
    tracked: bool,
    /// Whether the object was created in the viewer and is visible.
    shown: bool,
    /// Shared position of the ground station, if one is set.
    ground_station: Option<Arc<GeodeticPosition>>,
    /// Last sampled position.
    sample: Option<PositionSample>,
}

impl TrackedObject {
    pub(crate) fn new(elements: OrbitalElementSet, orbit: Option<Arc<dyn Orbit>>) -> Self {
        Self {
            elements,
            orbit,
            components: BTreeSet::new(),
            selected: false,
            tracked: false,
            shown: false,
            ground_station: None,
            sample: None,
        }
    }

    pub fn key(&self) -> &ElementKey { self.elements.key() }
    pub fn name(&self) -> &str { self.elements.name() }
    pub fn elements(&self) -> &OrbitalElementSet { &self.elements }
    pub fn tags(&self) -> &BTreeSet<String> { self.elements.tags() }
    pub fn has_tag(&self, tag: &str) -> bool { self.elements.has_tag(tag) }
    pub fn components(&self) -> &BTreeSet<Component> { &self.components }
    pub fn is_selected(&self) -> bool { self.selected }
    pub fn is_tracked(&self) -> bool { self.tracked }
    pub fn is_shown(&self) -> bool { self.shown }
    pub fn is_degraded(&self) -> bool { self.orbit.is_none() }
    pub fn sample(&self) -> Option<&PositionSample> { self.sample.as_ref() }
    pub fn ground_station(&self) -> Option<&GeodeticPosition> { self.ground_station.as_deref() }

    /// Geodetic position at `at`, derived from the propagation capability.
    pub fn position_at(&self, at: DateTime<Utc>) -> Result<GeodeticPosition, PropagationFailure> {
        self.orbit.as_ref().ok_or(PropagationFailure::Degraded)?.position_geodetic(at)
    }

    /// Elevation in degrees of this object above the ground station's horizon at `at`.
    ///
    /// # Returns
    /// `None` without a ground station or without a position.
    pub fn elevation_from_station(&self, at: DateTime<Utc>) -> Option<f64> {
        let station = self.ground_station.as_ref()?;
        let position = self.position_at(at).ok()?;
        Some(station.elevation_to(&position))
    }

    /// Samples the position at `at`. A failed propagation clears the sample.
    pub(crate) fn refresh_position(&mut self, at: DateTime<Utc>) -> Option<&PositionSample> {
        self.sample = self.position_at(at).ok().map(|position| PositionSample { at, position });
        self.sample.as_ref()
    }

    pub(crate) fn merge_tags(&mut self, tags: &BTreeSet<String>) -> bool { self.elements.add_tags(tags) }

    /// Shows the object with exactly `components`.
    pub(crate) fn show(&mut self, components: &BTreeSet<Component>, viewer: &dyn Viewer) {
        self.components.clone_from(components);
        self.shown = true;
        viewer.show(self.elements.key(), &self.components);
    }

    pub(crate) fn hide(&mut self, viewer: &dyn Viewer) {
        if !self.shown {
            return;
        }
        self.components.clear();
        self.shown = false;
        viewer.hide(self.elements.key());
    }

    pub(crate) fn enable_component(&mut self, component: Component, viewer: &dyn Viewer) {
        if self.components.insert(component) {
            self.shown = true;
            viewer.enable_component(self.elements.key(), component);
        }
    }

    pub(crate) fn disable_component(&mut self, component: Component, viewer: &dyn Viewer) {
        if self.components.remove(&component) {
            viewer.disable_component(self.elements.key(), component);
        }
    }

    pub(crate) fn set_tracked(&mut self, tracked: bool) { self.tracked = tracked; }
    pub(crate) fn set_selected(&mut self, selected: bool) { self.selected = selected; }
    pub(crate) fn set_ground_station(&mut self, position: Arc<GeodeticPosition>) {
        self.ground_station = Some(position);
    }
}
