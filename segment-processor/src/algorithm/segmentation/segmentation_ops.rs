use super::{find_intersections, StreetSegment};
use crate::model::{
    osm::{OsmNodeId, OsmNodes, OsmWayData, OsmWays},
    SegmentError,
};
use itertools::Itertools;
use kdam::{tqdm, Bar, BarExt};
use rayon::prelude::*;
use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

/// splits every way at its intersections. the result is ordered by way id and
/// then by position along the way, independent of `parallelize`.
pub fn segment_ways(
    ways: &OsmWays,
    nodes: &OsmNodes,
    parallelize: bool,
) -> Result<Vec<StreetSegment>, SegmentError> {
    let intersections = find_intersections(ways);
    let sorted_ways = ways.values().sorted_by_key(|w| w.osmid).collect_vec();

    let segments_per_way = if parallelize {
        let bar = Arc::new(Mutex::new(
            Bar::builder()
                .desc("segmenting ways")
                .total(sorted_ways.len())
                .build()
                .map_err(SegmentError::InternalError)?,
        ));
        sorted_ways
            .into_par_iter()
            .map(|way| {
                if let Ok(mut bar) = bar.clone().lock() {
                    let _ = bar.update(1);
                }
                segment_way(way, &intersections, nodes)
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        let iter = tqdm!(
            sorted_ways.into_iter(),
            desc = "segmenting ways",
            total = ways.len()
        );
        iter.map(|way| segment_way(way, &intersections, nodes))
            .collect::<Result<Vec<_>, _>>()?
    };
    eprintln!();

    let segments = segments_per_way.into_iter().flatten().collect_vec();
    log::info!(
        "split {} ways into {} segments",
        ways.len(),
        segments.len()
    );
    Ok(segments)
}

/// splits a way into segments at each intersection node along it.
/// a way with fewer than two nodes has no segments.
pub fn segment_way(
    way: &OsmWayData,
    intersections: &HashSet<OsmNodeId>,
    nodes: &OsmNodes,
) -> Result<Vec<StreetSegment>, SegmentError> {
    let (first, rest) = match way.nodes.split_first() {
        Some((first, rest)) if !rest.is_empty() => (first, rest),
        _ => return Ok(vec![]),
    };
    let mut segments = vec![];
    let mut path = vec![*first];
    for (idx, node_id) in rest.iter().enumerate() {
        path.push(*node_id);
        let is_last = idx == rest.len() - 1;
        if is_last || intersections.contains(node_id) {
            let next_path = vec![*node_id];
            let segment_path = std::mem::replace(&mut path, next_path);
            segments.push(StreetSegment::new(way.osmid, segment_path, nodes)?);
        }
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::{segment_way, segment_ways};
    use crate::model::osm::{OsmNodeData, OsmNodeId, OsmNodes, OsmWayData, OsmWayId, OsmWays};
    use std::collections::{HashMap, HashSet};

    fn grid_nodes() -> OsmNodes {
        // 1 - 2 - 3 - 4 along y=0, 5 and 6 above/below node 3
        let coords = [
            (1, 0.0, 0.0),
            (2, 0.001, 0.0),
            (3, 0.002, 0.0),
            (4, 0.003, 0.0),
            (5, 0.002, 0.001),
            (6, 0.002, -0.001),
        ];
        coords
            .iter()
            .map(|(id, x, y)| (OsmNodeId(*id), OsmNodeData::new(OsmNodeId(*id), *x, *y)))
            .collect::<HashMap<_, _>>()
    }

    fn way(id: i64, nodes: &[i64]) -> OsmWayData {
        OsmWayData {
            osmid: OsmWayId(id),
            nodes: nodes.iter().map(|n| OsmNodeId(*n)).collect(),
            ..Default::default()
        }
    }

    fn paths(segments: &[crate::algorithm::segmentation::StreetSegment]) -> Vec<(i64, Vec<i64>)> {
        segments
            .iter()
            .map(|s| (s.way_id.0, s.path.iter().map(|n| n.0).collect()))
            .collect()
    }

    #[test]
    fn way_without_intersections_is_one_segment() {
        let w = way(10, &[1, 2, 3, 4]);
        let result = segment_way(&w, &HashSet::new(), &grid_nodes()).expect("segmenting failed");
        assert_eq!(paths(&result), vec![(10, vec![1, 2, 3, 4])]);
    }

    #[test]
    fn crossroads_splits_both_ways() {
        let ways: OsmWays = HashMap::from([
            (OsmWayId(20), way(20, &[5, 3, 6])),
            (OsmWayId(10), way(10, &[1, 2, 3, 4])),
        ]);
        for parallelize in [false, true] {
            let result = segment_ways(&ways, &grid_nodes(), parallelize).expect("segmenting failed");
            assert_eq!(
                paths(&result),
                vec![
                    (10, vec![1, 2, 3]),
                    (10, vec![3, 4]),
                    (20, vec![5, 3]),
                    (20, vec![3, 6]),
                ]
            );
        }
    }

    #[test]
    fn closed_way_is_one_loop_segment() {
        let ways: OsmWays = HashMap::from([(OsmWayId(10), way(10, &[1, 2, 5, 1]))]);
        let result = segment_ways(&ways, &grid_nodes(), false).expect("segmenting failed");
        assert_eq!(paths(&result), vec![(10, vec![1, 2, 5, 1])]);
    }

    #[test]
    fn lollipop_way_splits_at_repeated_node() {
        let ways: OsmWays = HashMap::from([(OsmWayId(10), way(10, &[1, 2, 3, 5, 2]))]);
        let result = segment_ways(&ways, &grid_nodes(), false).expect("segmenting failed");
        assert_eq!(
            paths(&result),
            vec![(10, vec![1, 2]), (10, vec![2, 3, 5, 2])]
        );
    }

    #[test]
    fn segment_length_is_positive() {
        let w = way(10, &[1, 2]);
        let result = segment_way(&w, &HashSet::new(), &grid_nodes()).expect("segmenting failed");
        let length = result[0].length_meters();
        // 0.001 degrees of longitude on the equator is roughly 111 meters
        assert!((length - 111.2).abs() < 1.0, "unexpected length {length}");
    }

    #[test]
    fn single_node_way_has_no_segments() {
        let w = way(10, &[1]);
        let result = segment_way(&w, &HashSet::new(), &grid_nodes()).expect("segmenting failed");
        assert!(result.is_empty());
    }
}
