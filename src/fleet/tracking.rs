use super::{ProximityEvaluator, TrackedObject};
use crate::orbit::ElementKey;
use crate::viewer::Viewer;
use crate::{error, info, log};
use chrono::{DateTime, Utc};
use strum_macros::Display;

/// Where the coordinator currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingState {
    Untracked,
    /// A name was requested that is not yet in the registry.
    PendingExternalLookup(String),
    Tracked(ElementKey),
}

/// Result of a successful tracking request.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    /// The object is tracked. `nearby` lists visible objects within the
    /// proximity threshold at the time of the request, purely informational.
    Tracked { key: ElementKey, nearby: Vec<(String, f64)> },
    /// The name is parked until an object with that name is ingested.
    Pending(String),
    Untracked,
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum TrackError {
    /// The object exists but has no sampled position yet.
    NoSampledPosition(String),
}

impl std::error::Error for TrackError {}

/// Owns the single tracked object and the pending tracking request.
#[derive(Debug, Default)]
pub struct TrackingCoordinator {
    /// Name waiting for ingestion.
    pending: Option<String>,
    /// Evaluator for the informational nearby query.
    evaluator: ProximityEvaluator,
}

impl TrackingCoordinator {
    pub fn new(evaluator: ProximityEvaluator) -> Self { Self { pending: None, evaluator } }

    pub fn pending(&self) -> Option<&str> { self.pending.as_deref() }

    pub fn evaluator(&self) -> &ProximityEvaluator { &self.evaluator }

    pub fn tracked(objects: &[TrackedObject]) -> Option<&TrackedObject> { objects.iter().find(|o| o.is_tracked()) }

    /// Tracking wins over a pending request when both exist.
    pub fn state(&self, objects: &[TrackedObject]) -> TrackingState {
        if let Some(obj) = Self::tracked(objects) {
            TrackingState::Tracked(obj.key().clone())
        } else if let Some(name) = &self.pending {
            TrackingState::PendingExternalLookup(name.clone())
        } else {
            TrackingState::Untracked
        }
    }

    /// Requests the viewer to follow the object called `name`, or to stop following with `None`.
    ///
    /// # Returns
    /// * [`TrackOutcome::Pending`] if no object has that name yet.
    /// * [`TrackError::NoSampledPosition`] if the object has no position; state is unchanged.
    pub fn request_track(
        &mut self,
        name: Option<&str>,
        objects: &mut [TrackedObject],
        viewer: &dyn Viewer,
        at: DateTime<Utc>,
    ) -> Result<TrackOutcome, TrackError> {
        let Some(name) = name else {
            self.pending = None;
            if Self::tracked(objects).is_some() {
                viewer.clear_track();
            }
            objects.iter_mut().for_each(|o| o.set_tracked(false));
            return Ok(TrackOutcome::Untracked);
        };
        match objects.iter().position(|o| o.name() == name) {
            Some(index) => self.track_index(index, objects, viewer, at),
            None => {
                info!("{name} is not known yet, tracking it once it arrives");
                self.pending = Some(name.to_string());
                Ok(TrackOutcome::Pending(name.to_string()))
            }
        }
    }

    /// Promotes the freshly ingested object at `index` if it is the pending target.
    pub(crate) fn resolve_pending(
        &mut self,
        index: usize,
        objects: &mut [TrackedObject],
        viewer: &dyn Viewer,
        at: DateTime<Utc>,
    ) -> Option<Result<TrackOutcome, TrackError>> {
        if self.pending.as_deref() != Some(objects[index].name()) {
            return None;
        }
        objects[index].refresh_position(at);
        let res = self.track_index(index, objects, viewer, at);
        if let Err(e) = &res {
            error!("Pending target {} arrived but cannot be tracked: {e}", objects[index].name());
        }
        Some(res)
    }

    /// Re-derives the tracked flags from the entity the viewer reports.
    ///
    /// # Returns
    /// The index of the now tracked object, if any.
    pub(crate) fn sync_from_viewer(&mut self, entity: Option<&ElementKey>, objects: &mut [TrackedObject]) -> Option<usize> {
        let mut tracked = None;
        for (i, obj) in objects.iter_mut().enumerate() {
            let is_it = tracked.is_none() && Some(obj.key()) == entity;
            obj.set_tracked(is_it);
            if is_it {
                tracked = Some(i);
            }
        }
        tracked
    }

    fn track_index(
        &mut self,
        index: usize,
        objects: &mut [TrackedObject],
        viewer: &dyn Viewer,
        at: DateTime<Utc>,
    ) -> Result<TrackOutcome, TrackError> {
        let Some(position) = objects[index].sample().map(|s| *s.position()) else {
            error!("No sampled position for {}, not tracking", objects[index].name());
            return Err(TrackError::NoSampledPosition(objects[index].name().to_string()));
        };
        for (i, obj) in objects.iter_mut().enumerate() {
            obj.set_tracked(i == index);
        }
        let target = &objects[index];
        viewer.track(target.key(), &position);
        self.pending = None;

        let nearby: Vec<(String, f64)> = self
            .evaluator
            .find_nearby(target, objects.iter().filter(|o| o.is_shown()), None, at)
            .into_iter()
            .map(|(o, d)| (o.name().to_string(), d))
            .collect();
        for (name, distance) in &nearby {
            log!("Nearby satellite detected: {name} at distance {distance:.2} km");
        }
        Ok(TrackOutcome::Tracked { key: target.key().clone(), nearby })
    }
}
