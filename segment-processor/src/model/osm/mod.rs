mod highway;
pub mod import_ops;
pub mod osm_element_filter;
mod osm_id;
mod osm_node_data;
mod osm_way_data;

pub use highway::Highway;
pub use osm_element_filter::ElementFilter;
pub use osm_node_data::OsmNodeData;
pub use osm_id::{OsmNodeId, OsmWayId};
pub use osm_way_data::OsmWayData;
use std::collections::HashMap;

pub type OsmNodes = HashMap<OsmNodeId, OsmNodeData>;
pub type OsmWays = HashMap<OsmWayId, OsmWayData>;
