use crate::model::osm::{OsmNodeId, OsmWays};
use std::collections::{HashMap, HashSet};

/// identifies the nodes at which ways are split into segments. a node is an
/// intersection when it
/// - is the first or last node of a way
/// - is shared by two or more distinct ways
/// - appears more than once in the same way (a loop)
pub fn find_intersections(ways: &OsmWays) -> HashSet<OsmNodeId> {
    let mut way_counts: HashMap<OsmNodeId, usize> = HashMap::new();
    let mut intersections: HashSet<OsmNodeId> = HashSet::new();

    for way in ways.values() {
        if let (Some(first), Some(last)) = (way.nodes.first(), way.nodes.last()) {
            intersections.insert(*first);
            intersections.insert(*last);
        }
        let mut seen: HashSet<&OsmNodeId> = HashSet::with_capacity(way.nodes.len());
        for node_id in way.nodes.iter() {
            if !seen.insert(node_id) {
                intersections.insert(*node_id);
                continue;
            }
            *way_counts.entry(*node_id).or_default() += 1;
        }
    }

    intersections.extend(
        way_counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(node_id, _)| node_id),
    );
    log::info!("found {} intersection nodes", intersections.len());
    intersections
}
