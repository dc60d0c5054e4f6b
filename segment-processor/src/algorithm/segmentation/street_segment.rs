use crate::model::{
    osm::{OsmNodeId, OsmNodes, OsmWayId},
    SegmentError,
};
use geo::{Coord, Haversine, Length, LineString};

/// the stretch of a single way between two consecutive intersections.
#[derive(Debug, Clone, PartialEq)]
pub struct StreetSegment {
    pub way_id: OsmWayId,
    pub src_node_id: OsmNodeId,
    pub dst_node_id: OsmNodeId,
    pub path: Vec<OsmNodeId>,
    pub geometry: LineString<f64>,
}

impl StreetSegment {
    pub fn new(
        way_id: OsmWayId,
        path: Vec<OsmNodeId>,
        nodes: &OsmNodes,
    ) -> Result<StreetSegment, SegmentError> {
        if path.len() < 2 {
            return Err(SegmentError::InternalError(format!(
                "segment of way {way_id} created with {} nodes, requires at least 2",
                path.len()
            )));
        }
        let (src_node_id, dst_node_id) = match (path.first(), path.last()) {
            (Some(src), Some(dst)) => (*src, *dst),
            _ => {
                return Err(SegmentError::InternalError(String::from(
                    "non-empty path has no source or destination node",
                )))
            }
        };
        let coords = path
            .iter()
            .map(|id| {
                nodes
                    .get(id)
                    .map(|n| Coord::from((n.x, n.y)))
                    .ok_or(SegmentError::MissingWayNode(*id, way_id))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StreetSegment {
            way_id,
            src_node_id,
            dst_node_id,
            path,
            geometry: LineString::new(coords),
        })
    }

    /// length along the WGS84 geometry in meters
    pub fn length_meters(&self) -> f64 {
        Haversine.length(&self.geometry)
    }
}
