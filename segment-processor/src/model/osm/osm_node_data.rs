use super::OsmNodeId;
use geo::{Coord, Intersects, Rect};
use serde::{Deserialize, Serialize};

/// an OSM node as read from the pbf. only the location is kept.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsmNodeData {
    pub osmid: OsmNodeId,
    pub x: f64,
    pub y: f64,
}

impl OsmNodeData {
    pub fn new(osmid: OsmNodeId, x: f64, y: f64) -> OsmNodeData {
        OsmNodeData {
            osmid,
            x,
            y,
        }
    }

    pub fn get_coord(&self) -> Coord<f64> {
        Coord::from((self.x, self.y))
    }
}

impl Intersects<Rect<f64>> for OsmNodeData {
    fn intersects(&self, rhs: &Rect<f64>) -> bool {
        rhs.intersects(&self.get_coord())
    }
}

impl From<&osmpbf::elements::Node<'_>> for OsmNodeData {
    fn from(node: &osmpbf::elements::Node) -> Self {
        OsmNodeData::new(OsmNodeId(node.id()), node.lon(), node.lat())
    }
}

impl From<&osmpbf::DenseNode<'_>> for OsmNodeData {
    fn from(node: &osmpbf::DenseNode) -> Self {
        OsmNodeData::new(OsmNodeId(node.id()), node.lon(), node.lat())
    }
}
