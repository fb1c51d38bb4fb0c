use super::{
    Component, ComponentError, ElementSource, FleetSnapshot, GroundStation, LogNotifier, PassNotifier, TrackError,
    TrackOutcome, TrackedObject, TrackingCoordinator, TrackingState,
};
use crate::http_handler::FetchError;
use crate::orbit::{ElementKey, GeodeticPosition, OrbitalElementSet, ParseError, Propagator, split_records};
use crate::viewer::{Viewer, ViewerEvent};
use crate::{error, event, info, log, warn};
use chrono::{DateTime, Utc};
use futures::{StreamExt, stream::FuturesUnordered};
use itertools::Itertools;
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};
use tokio::sync::watch;

/// What happened to a single ingested record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A new object was appended.
    Added { active: bool, tracked: bool },
    /// The record denoted a known object, its tags were merged.
    Merged { shown: bool },
}

/// Counters of one ingested source body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub added: usize,
    pub merged: usize,
    pub degraded: usize,
    pub rejected: usize,
}

impl IngestReport {
    fn absorb(&mut self, other: IngestReport) {
        self.added += other.added;
        self.merged += other.merged;
        self.degraded += other.degraded;
        self.rejected += other.rejected;
    }
}

/// Counters of one batch ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub sources_ok: usize,
    pub sources_failed: usize,
    pub records: IngestReport,
}

/// An object is active if it carries an enabled tag or its name is enabled.
fn is_active(obj: &TrackedObject, tags: &BTreeSet<String>, names: &BTreeSet<String>) -> bool {
    obj.tags().iter().any(|t| tags.contains(t)) || names.contains(obj.name())
}

/// Degraded objects never report a position and are never shown.
fn is_visible(obj: &TrackedObject, tags: &BTreeSet<String>, names: &BTreeSet<String>) -> bool {
    !obj.is_degraded() && is_active(obj, tags, names)
}

/// Owns every tracked object and derives the active projection from the
/// enabled tag, name and component sets.
///
/// All mutation happens through `&mut self` on the control task; fetching
/// sources is the only suspension point.
pub struct FleetRegistry {
    /// Objects in ingestion order.
    objects: Vec<TrackedObject>,
    enabled_tags: BTreeSet<String>,
    enabled_names: BTreeSet<String>,
    enabled_components: BTreeSet<Component>,
    /// Names whose passes are announced.
    monitored: BTreeSet<String>,
    ground_station: Option<GroundStation>,
    /// Tracked object and pending tracking request.
    tracking: TrackingCoordinator,
    propagator: Arc<dyn Propagator>,
    source: Arc<dyn ElementSource>,
    viewer: Arc<dyn Viewer>,
    notifier: Arc<dyn PassNotifier>,
    /// Whether at least one object was visible after the last visibility change.
    any_visible: bool,
    /// Number of tag/name index publishes so far.
    index_revision: u64,
    /// Outbound store.
    store: watch::Sender<FleetSnapshot>,
}

impl FleetRegistry {
    /// Creates an empty registry.
    ///
    /// # Arguments
    /// * `propagator` – Builds the propagation capability of new objects.
    /// * `source` – Fetches element set sources.
    /// * `viewer` – Render and camera primitives.
    /// * `tracking` – Coordinator carrying the proximity threshold.
    pub fn new(
        propagator: Arc<dyn Propagator>,
        source: Arc<dyn ElementSource>,
        viewer: Arc<dyn Viewer>,
        tracking: TrackingCoordinator,
    ) -> Self {
        let enabled_components = Component::default_set();
        let (store, _) = watch::channel(FleetSnapshot {
            enabled_components: enabled_components.iter().copied().collect(),
            ..FleetSnapshot::default()
        });
        Self {
            objects: Vec::new(),
            enabled_tags: BTreeSet::new(),
            enabled_names: BTreeSet::new(),
            enabled_components,
            monitored: BTreeSet::new(),
            ground_station: None,
            tracking,
            propagator,
            source,
            viewer,
            notifier: Arc::new(LogNotifier),
            any_visible: false,
            index_revision: 0,
            store,
        }
    }

    /// Replaces the pass notifier, [`LogNotifier`] by default.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn PassNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Subscribes to the published state.
    pub fn subscribe(&self) -> watch::Receiver<FleetSnapshot> { self.store.subscribe() }

    /// The most recently published state.
    pub fn snapshot(&self) -> FleetSnapshot { self.store.borrow().clone() }

    pub fn objects(&self) -> &[TrackedObject] { &self.objects }

    /// First object with the given name.
    pub fn object(&self, name: &str) -> Option<&TrackedObject> { self.objects.iter().find(|o| o.name() == name) }

    pub fn object_names(&self) -> Vec<&str> { self.objects.iter().map(TrackedObject::name).collect() }

    pub fn objects_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TrackedObject> + 'a {
        self.objects.iter().filter(move |o| o.has_tag(tag))
    }

    pub fn is_active(&self, obj: &TrackedObject) -> bool { is_active(obj, &self.enabled_tags, &self.enabled_names) }

    pub fn active_objects(&self) -> impl Iterator<Item = &TrackedObject> {
        self.objects.iter().filter(|o| self.is_active(o))
    }

    pub fn visible_objects(&self) -> impl Iterator<Item = &TrackedObject> { self.objects.iter().filter(|o| o.is_shown()) }

    pub fn viewer(&self) -> &Arc<dyn Viewer> { &self.viewer }

    pub fn enabled_tags(&self) -> &BTreeSet<String> { &self.enabled_tags }
    pub fn enabled_names(&self) -> &BTreeSet<String> { &self.enabled_names }
    pub fn enabled_components(&self) -> &BTreeSet<Component> { &self.enabled_components }
    pub fn ground_station(&self) -> Option<&GroundStation> { self.ground_station.as_ref() }

    /// Every tag present on any object, in first-seen order.
    pub fn available_tags(&self) -> Vec<String> {
        self.objects.iter().flat_map(|o| o.tags().iter()).unique().cloned().collect()
    }

    /// For every tag, the sorted names of the objects carrying it.
    pub fn tag_index(&self) -> BTreeMap<String, Vec<String>> {
        let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for obj in &self.objects {
            for tag in obj.tags() {
                index.entry(tag.clone()).or_default().push(obj.name().to_string());
            }
        }
        index.values_mut().for_each(|names| names.sort());
        index
    }

    /// Union of the components currently shown on any object.
    pub fn components(&self) -> BTreeSet<Component> {
        self.objects.iter().flat_map(|o| o.components().iter().copied()).collect()
    }

    /// Parses one element record and merges it into the fleet.
    ///
    /// A record whose identity is already known only contributes its tags.
    /// A new object is appended, attached to the ground station, shown if it
    /// is active and promoted to tracked if it is the pending target.
    ///
    /// # Arguments
    /// * `text` – Name line and both data lines.
    /// * `tags` – Tags the record was fetched with.
    /// * `defer_index_update` – Skip publishing the tag/name index.
    ///
    /// # Returns
    /// * [`ParseError`] other than `NoPropagation` if the record was rejected.
    /// * [`ParseError::NoPropagation`] if the object was added in a degraded, position-less state.
    pub fn ingest<S: AsRef<str>>(
        &mut self,
        text: &str,
        tags: &[S],
        defer_index_update: bool,
    ) -> Result<IngestOutcome, ParseError> {
        let elements = OrbitalElementSet::parse(text, tags)?;
        let res = self.add(elements);
        if !defer_index_update {
            self.publish_index();
        }
        res
    }

    fn add(&mut self, elements: OrbitalElementSet) -> Result<IngestOutcome, ParseError> {
        if let Some(existing) = self.objects.iter_mut().find(|o| o.key() == elements.key()) {
            existing.merge_tags(elements.tags());
            let shown = !existing.is_degraded() && elements.tags().iter().any(|t| self.enabled_tags.contains(t));
            if shown {
                existing.show(&self.enabled_components, self.viewer.as_ref());
                self.any_visible = true;
            }
            event!("Merged tags into {}", existing.key());
            return Ok(IngestOutcome::Merged { shown });
        }

        let (orbit, degraded) = match self.propagator.prepare(&elements) {
            Ok(orbit) => (Some(orbit), None),
            Err(e) => {
                error!("Failed to initialize orbit for satellite: {}", elements.name());
                (None, Some(e))
            }
        };
        let mut obj = TrackedObject::new(elements, orbit);
        if let Some(gs) = &self.ground_station {
            obj.set_ground_station(gs.position_handle());
        }
        if self.monitored.contains(obj.name()) {
            self.notifier.notify_passes(obj.key());
        }
        self.objects.push(obj);
        let index = self.objects.len() - 1;

        let active = self.is_active(&self.objects[index]);
        let mut tracked = false;
        if is_visible(&self.objects[index], &self.enabled_tags, &self.enabled_names) {
            self.objects[index].show(&self.enabled_components, self.viewer.as_ref());
            self.any_visible = true;
            let now = Utc::now();
            if let Some(res) = self.tracking.resolve_pending(index, &mut self.objects, self.viewer.as_ref(), now) {
                tracked = res.is_ok();
                self.publish_state();
            }
        }
        match degraded {
            Some(e) => Err(e),
            None => Ok(IngestOutcome::Added { active, tracked }),
        }
    }

    /// Splits a source body into records and ingests each of them.
    pub fn ingest_text<S: AsRef<str>>(&mut self, body: &str, tags: &[S], defer_index_update: bool) -> IngestReport {
        let mut report = IngestReport::default();
        for record in split_records(body) {
            match self.ingest(&record, tags, true) {
                Ok(IngestOutcome::Added { .. }) => report.added += 1,
                Ok(IngestOutcome::Merged { .. }) => report.merged += 1,
                Err(ParseError::NoPropagation { .. }) => report.degraded += 1,
                Err(e) => {
                    warn!("Skipping malformed record: {e:?}");
                    report.rejected += 1;
                }
            }
        }
        if !defer_index_update {
            self.publish_index();
        }
        report
    }

    /// Fetches a single source and publishes the index afterwards.
    pub async fn ingest_from_source<S: AsRef<str>>(&mut self, address: &str, tags: &[S]) -> Result<IngestReport, FetchError> {
        let source = Arc::clone(&self.source);
        let body = source.fetch(address).await?;
        Ok(self.ingest_text(&body, tags, false))
    }

    /// Fetches all sources concurrently and ingests each as soon as it arrives.
    ///
    /// Failed sources are logged and skipped. The index is published exactly
    /// once, after every source has settled.
    pub async fn ingest_batch<S: AsRef<str>>(&mut self, sources: &[(S, Vec<String>)]) -> BatchReport {
        let mut fetches: FuturesUnordered<_> = sources
            .iter()
            .map(|(raw_address, tags)| {
                let source = Arc::clone(&self.source);
                let address = raw_address.as_ref().to_string();
                async move {
                    let body = source.fetch(&address).await;
                    (address, tags, body)
                }
            })
            .collect();

        let mut report = BatchReport::default();
        while let Some((address, tags, body)) = fetches.next().await {
            match body {
                Ok(body) => {
                    let records = self.ingest_text(&body, tags.as_slice(), true);
                    log!("Ingested {address}: {} added, {} merged", records.added, records.merged);
                    report.records.absorb(records);
                    report.sources_ok += 1;
                }
                Err(e) => {
                    warn!("Could not fetch {address}: {e:?}");
                    report.sources_failed += 1;
                }
            }
        }
        self.publish_index();
        report
    }

    /// Replaces the enabled tags and recomputes visibility.
    pub fn set_enabled_tags<I: IntoIterator<Item = String>>(&mut self, tags: I) {
        self.enabled_tags = tags.into_iter().collect();
        self.show_enabled();
        self.publish_index();
    }

    /// Replaces the enabled names and recomputes visibility.
    pub fn set_enabled_names<I: IntoIterator<Item = String>>(&mut self, names: I) {
        self.enabled_names = names.into_iter().collect();
        self.show_enabled();
        self.publish_index();
    }

    /// Replaces the enabled components.
    ///
    /// Only active objects are touched. Inactive ones pick up the full set
    /// the next time they are shown.
    pub fn set_enabled_components(&mut self, components: BTreeSet<Component>) {
        let added: Vec<Component> = components.difference(&self.enabled_components).copied().collect();
        let removed: Vec<Component> = self.enabled_components.difference(&components).copied().collect();
        for component in added {
            self.enable(component);
        }
        for component in removed {
            self.disable(component);
        }
        self.publish_state();
    }

    /// Validates component names, then behaves like [`Self::set_enabled_components`].
    pub fn set_enabled_component_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), ComponentError> {
        let components = Component::parse_all(names)?;
        self.set_enabled_components(components);
        Ok(())
    }

    pub fn enable_component(&mut self, name: &str) -> Result<(), ComponentError> {
        self.enable(Component::parse(name)?);
        self.publish_state();
        Ok(())
    }

    pub fn disable_component(&mut self, name: &str) -> Result<(), ComponentError> {
        self.disable(Component::parse(name)?);
        self.publish_state();
        Ok(())
    }

    fn enable(&mut self, component: Component) {
        self.enabled_components.insert(component);
        for obj in &mut self.objects {
            if is_visible(obj, &self.enabled_tags, &self.enabled_names) {
                obj.enable_component(component, self.viewer.as_ref());
            }
        }
    }

    fn disable(&mut self, component: Component) {
        self.enabled_components.remove(&component);
        for obj in &mut self.objects {
            if is_visible(obj, &self.enabled_tags, &self.enabled_names) {
                obj.disable_component(component, self.viewer.as_ref());
            }
        }
    }

    /// Shows every active object with the full enabled component set and hides
    /// the rest. Fires the viewer cleanup once when the last object disappears.
    fn show_enabled(&mut self) {
        for obj in &mut self.objects {
            if is_visible(obj, &self.enabled_tags, &self.enabled_names) {
                obj.show(&self.enabled_components, self.viewer.as_ref());
            } else {
                obj.hide(self.viewer.as_ref());
            }
        }
        let any_visible = self.objects.iter().any(TrackedObject::is_shown);
        if !any_visible && self.any_visible {
            self.viewer.cleanup();
        }
        self.any_visible = any_visible;
    }

    /// Requests tracking of `name`, or stops tracking with `None`.
    pub fn request_track(&mut self, name: Option<&str>) -> Result<TrackOutcome, TrackError> {
        let res = self.tracking.request_track(name, &mut self.objects, self.viewer.as_ref(), Utc::now());
        self.publish_state();
        res
    }

    pub fn tracking_state(&self) -> TrackingState { self.tracking.state(&self.objects) }

    pub fn pending_track_target(&self) -> Option<&str> { self.tracking.pending() }

    pub fn tracked_object(&self) -> Option<&TrackedObject> { TrackingCoordinator::tracked(&self.objects) }

    pub fn tracked_name(&self) -> Option<&str> { self.tracked_object().map(TrackedObject::name) }

    /// Applies a notification of the viewer.
    pub fn on_viewer_event(&mut self, event: &ViewerEvent) {
        match event {
            ViewerEvent::TrackedEntityChanged(entity) => self.on_tracked_entity_changed(entity.as_ref()),
        }
    }

    /// Re-derives the tracked object from what the viewer follows and publishes it.
    pub fn on_tracked_entity_changed(&mut self, entity: Option<&ElementKey>) {
        if let Some(index) = self.tracking.sync_from_viewer(entity, &mut self.objects) {
            self.objects[index].show(&self.enabled_components, self.viewer.as_ref());
            self.any_visible = true;
        }
        self.publish_state();
    }

    /// Replaces the monitored names. Monitored objects get their passes
    /// announced, every other object has its pass timers cleared.
    pub fn set_monitored_names<I: IntoIterator<Item = String>>(&mut self, names: I) {
        self.monitored = names.into_iter().collect();
        for obj in &self.objects {
            if self.monitored.contains(obj.name()) {
                self.notifier.notify_passes(obj.key());
            } else {
                self.notifier.clear_timers(obj.key());
            }
        }
        self.publish_state();
    }

    /// Names of the known objects that are monitored, in ingestion order.
    pub fn monitored_names(&self) -> Vec<&str> {
        self.objects.iter().map(TrackedObject::name).filter(|n| self.monitored.contains(*n)).collect()
    }

    /// Marks the object called `name` as selected, or clears the selection.
    ///
    /// # Returns
    /// `false` if no object has that name.
    pub fn select(&mut self, name: Option<&str>) -> bool {
        let mut found = false;
        for obj in &mut self.objects {
            let is_it = !found && name == Some(obj.name());
            obj.set_selected(is_it);
            found |= is_it;
        }
        self.publish_state();
        found || name.is_none()
    }

    pub fn selected_name(&self) -> Option<&str> { self.objects.iter().find(|o| o.is_selected()).map(TrackedObject::name) }

    /// Replaces the ground station and hands its position to every object.
    pub fn set_ground_station(&mut self, position: GeodeticPosition) {
        if self.ground_station.is_some() {
            self.viewer.hide_ground_station();
        }
        let station = GroundStation::new(position);
        self.viewer.show_ground_station(station.position());
        for obj in &mut self.objects {
            obj.set_ground_station(station.position_handle());
        }
        info!("Ground station set to {}", station.position());
        self.ground_station = Some(station);
        self.publish_state();
    }

    /// Points the viewer camera at the ground station, if there is one.
    pub fn focus_ground_station(&self) -> bool {
        self.ground_station.as_ref().is_some_and(|gs| {
            self.viewer.set_camera_target(gs.position());
            true
        })
    }

    /// Samples the position of every visible object at `at`.
    ///
    /// # Returns
    /// The number of objects that produced a position.
    pub fn refresh_positions(&mut self, at: DateTime<Utc>) -> usize {
        self.objects
            .iter_mut()
            .filter(|o| o.is_shown())
            .map(|o| o.refresh_position(at).is_some())
            .filter(|sampled| *sampled)
            .count()
    }

    /// Visible objects near the tracked one at `at`, informational only.
    pub fn nearby_tracked(&self, at: DateTime<Utc>) -> Vec<(String, f64)> {
        let Some(target) = self.tracked_object() else { return Vec::new() };
        self.tracking
            .evaluator()
            .find_nearby(target, self.visible_objects(), None, at)
            .into_iter()
            .map(|(o, d)| (o.name().to_string(), d))
            .collect()
    }

    fn publish_index(&mut self) {
        self.index_revision += 1;
        let available_tags = self.available_tags();
        let names_by_tag = self.tag_index();
        let revision = self.index_revision;
        self.store.send_modify(|s| {
            s.available_tags = available_tags;
            s.names_by_tag = names_by_tag;
            s.index_revision = revision;
        });
        self.publish_state();
    }

    fn publish_state(&self) {
        let enabled_tags = self.enabled_tags.iter().cloned().collect();
        let enabled_names = self.enabled_names.iter().cloned().collect();
        let enabled_components = self.enabled_components.iter().copied().collect();
        let tracked = self.tracked_name().map(str::to_string);
        let selected = self.selected_name().map(str::to_string);
        let ground_station = self.ground_station.as_ref().map(GroundStation::coordinates);
        let monitored = self.monitored_names().into_iter().map(str::to_string).collect();
        let visible = self.visible_objects().count();
        self.store.send_modify(|s| {
            s.enabled_tags = enabled_tags;
            s.enabled_names = enabled_names;
            s.enabled_components = enabled_components;
            s.tracked = tracked;
            s.selected = selected;
            s.ground_station = ground_station;
            s.monitored = monitored;
            s.visible = visible;
            s.sequence += 1;
        });
    }
}
