use super::Component;
use crate::logger::JsonDump;
use std::collections::BTreeMap;

/// State published to the external store after every mutation.
///
/// `index_revision` grows by exactly one per tag/name index publish,
/// `sequence` by exactly one per publish of any kind.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct FleetSnapshot {
    pub(super) available_tags: Vec<String>,
    pub(super) names_by_tag: BTreeMap<String, Vec<String>>,
    pub(super) enabled_tags: Vec<String>,
    pub(super) enabled_names: Vec<String>,
    pub(super) enabled_components: Vec<Component>,
    pub(super) tracked: Option<String>,
    pub(super) selected: Option<String>,
    pub(super) ground_station: Option<[f64; 2]>,
    pub(super) monitored: Vec<String>,
    pub(super) visible: usize,
    pub(super) index_revision: u64,
    pub(super) sequence: u64,
}

impl FleetSnapshot {
    pub fn available_tags(&self) -> &[String] { &self.available_tags }
    pub fn names_by_tag(&self) -> &BTreeMap<String, Vec<String>> { &self.names_by_tag }
    pub fn enabled_tags(&self) -> &[String] { &self.enabled_tags }
    pub fn enabled_names(&self) -> &[String] { &self.enabled_names }
    pub fn enabled_components(&self) -> &[Component] { &self.enabled_components }
    pub fn tracked(&self) -> Option<&str> { self.tracked.as_deref() }
    pub fn selected(&self) -> Option<&str> { self.selected.as_deref() }
    pub fn ground_station(&self) -> Option<[f64; 2]> { self.ground_station }
    pub fn monitored(&self) -> &[String] { &self.monitored }
    pub fn visible(&self) -> usize { self.visible }
    pub fn index_revision(&self) -> u64 { self.index_revision }
    pub fn sequence(&self) -> u64 { self.sequence }
}

impl JsonDump for FleetSnapshot {
    fn file_name(&self) -> String { format!("fleet_{:06}_r{:05}.json", self.sequence, self.index_revision) }

    fn dir_name(&self) -> &'static str { "fleet_snapshots" }
}
