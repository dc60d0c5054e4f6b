use super::{OsmNodeId, OsmNodes, OsmWayId};
use crate::model::SegmentError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsmWayData {
    pub osmid: OsmWayId,
    pub nodes: Vec<OsmNodeId>,
    pub access: Option<String>,
    pub area: Option<String>,
    pub highway: Option<String>,
    pub junction: Option<String>,
    pub lanes: Option<String>,
    pub maxspeed: Option<String>,
    pub name: Option<String>,
    pub oneway: Option<String>,
    pub _ref: Option<String>,
    pub service: Option<String>,
    pub surface: Option<String>,
}

impl OsmWayData {
    /// values of the `oneway` tag that denote a one way road, as used by osmnx.
    /// see https://wiki.openstreetmap.org/wiki/Key:oneway
    const ONEWAY_VALUES: [&'static str; 7] = ["yes", "true", "1", "-1", "reverse", "T", "F"];

    pub fn new(way: &osmpbf::elements::Way) -> OsmWayData {
        let mut out = OsmWayData {
            osmid: OsmWayId(way.id()),
            nodes: way.refs().map(OsmNodeId).collect_vec(),
            ..Default::default()
        };

        // a way may repeat a node consecutively, which would produce a zero-length
        // segment, so those repeats are dropped. non-consecutive repeats (loops) stay.
        out.nodes.dedup();
        if out.nodes.len() < 2 {
            log::warn!(
                "way {} has {} distinct consecutive nodes and cannot form a segment",
                way.id(),
                out.nodes.len()
            );
        }

        for (k, v) in way.tags() {
            let value = Some(String::from(v.trim()));
            match k {
                "access" => out.access = value,
                "area" => out.area = value,
                "highway" => out.highway = value,
                "junction" => out.junction = value,
                "lanes" => out.lanes = value,
                "maxspeed" => out.maxspeed = value,
                "name" => out.name = value,
                "oneway" => out.oneway = value,
                "ref" => out._ref = value,
                "service" => out.service = value,
                "surface" => out.surface = value,
                _ => {}
            }
        }
        out
    }

    /// true when travel is only permitted in one direction along this way.
    /// roundabouts are implicitly one way.
    pub fn is_one_way(&self) -> bool {
        let tagged = self
            .oneway
            .as_ref()
            .map(|o| Self::ONEWAY_VALUES.contains(&o.as_str()))
            .unwrap_or_default();
        let roundabout = self
            .junction
            .as_ref()
            .map(|j| j == "roundabout")
            .unwrap_or_default();
        tagged || roundabout
    }

    /// removes node references that are not present in the provided node collection.
    /// if `ignore_missing` is false, any missing node is an error. the node list is
    /// deduplicated again after removal.
    ///
    /// # Returns
    ///
    /// the number of node references removed
    pub fn retain_present_nodes(
        &mut self,
        raw_nodes: &OsmNodes,
        ignore_missing: bool,
    ) -> Result<usize, SegmentError> {
        if let Some(missing) = self.nodes.iter().find(|n| !raw_nodes.contains_key(n)) {
            if !ignore_missing {
                return Err(SegmentError::MissingWayNode(*missing, self.osmid));
            }
        }
        let before = self.nodes.len();
        self.nodes.retain(|n| raw_nodes.contains_key(n));
        self.nodes.dedup();
        Ok(before - self.nodes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::OsmWayData;
    use crate::model::osm::{OsmNodeData, OsmNodeId, OsmNodes, OsmWayId};
    use crate::model::SegmentError;
    use std::collections::HashMap;

    fn way(nodes: &[i64]) -> OsmWayData {
        OsmWayData {
            osmid: OsmWayId(100),
            nodes: nodes.iter().map(|n| OsmNodeId(*n)).collect(),
            ..Default::default()
        }
    }

    fn nodes(ids: &[i64]) -> OsmNodes {
        ids.iter()
            .map(|id| {
                let n = OsmNodeData::new(OsmNodeId(*id), *id as f64, 51.5);
                (n.osmid, n)
            })
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn oneway_tags() {
        let mut w = way(&[1, 2]);
        assert!(!w.is_one_way());
        w.oneway = Some(String::from("yes"));
        assert!(w.is_one_way());
        w.oneway = Some(String::from("no"));
        assert!(!w.is_one_way());
        w.junction = Some(String::from("roundabout"));
        assert!(w.is_one_way());
    }

    #[test]
    fn retain_present_nodes_drops_missing() {
        let mut w = way(&[1, 2, 3, 2, 4]);
        let raw = nodes(&[1, 2, 4]);
        match w.retain_present_nodes(&raw, true) {
            Ok(removed) => assert_eq!(removed, 2),
            Err(e) => panic!("{e}"),
        }
        // removing node 3 leaves 2,2 adjacent which is collapsed
        assert_eq!(w.nodes, vec![OsmNodeId(1), OsmNodeId(2), OsmNodeId(4)]);
    }

    #[test]
    fn retain_present_nodes_fails_when_strict() {
        let mut w = way(&[1, 2, 3]);
        let raw = nodes(&[1, 2]);
        match w.retain_present_nodes(&raw, false) {
            Err(SegmentError::MissingWayNode(n, w)) => {
                assert_eq!(n, OsmNodeId(3));
                assert_eq!(w, OsmWayId(100));
            }
            other => panic!("expected missing node error, found {other:?}"),
        }
    }
}
