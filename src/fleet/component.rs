use std::{collections::BTreeSet, str::FromStr};
use strum_macros::{Display, EnumString};

/// Visual components an object can show in the viewer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, serde::Serialize,
)]
pub enum Component {
    #[strum(to_string = "Point")]
    Point,
    #[strum(to_string = "Label")]
    Label,
    #[strum(to_string = "Orbit")]
    Orbit,
    #[strum(to_string = "Orbit track")]
    #[serde(rename = "Orbit track")]
    OrbitTrack,
    #[strum(to_string = "Ground track")]
    #[serde(rename = "Ground track")]
    GroundTrack,
    #[strum(to_string = "Sensor cone")]
    #[serde(rename = "Sensor cone")]
    SensorCone,
    #[strum(to_string = "3D model")]
    #[serde(rename = "3D model")]
    Model,
}

/// A component name outside the fixed catalog.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum ComponentError {
    Unknown(String),
}

impl std::error::Error for ComponentError {}

impl Component {
    /// Components enabled on a fresh registry.
    pub fn default_set() -> BTreeSet<Component> { BTreeSet::from([Component::Point, Component::Label]) }

    /// Validates a component name against the catalog.
    pub fn parse(name: &str) -> Result<Component, ComponentError> {
        Component::from_str(name.trim()).map_err(|_| ComponentError::Unknown(name.to_string()))
    }

    /// Validates a list of component names, failing on the first unknown one.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<BTreeSet<Component>, ComponentError> {
        names.iter().map(|n| Component::parse(n.as_ref())).collect()
    }
}
