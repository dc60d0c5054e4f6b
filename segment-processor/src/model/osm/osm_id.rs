use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// OSMID of a node element
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Deserialize, Serialize, Hash,
)]
pub struct OsmNodeId(pub i64);

/// OSMID of a way element. output features carry this value as `osm_id`.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Deserialize, Serialize, Hash,
)]
pub struct OsmWayId(pub i64);

impl Display for OsmNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for OsmWayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
