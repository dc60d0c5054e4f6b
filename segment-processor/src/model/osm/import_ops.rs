use super::{ElementFilter, OsmNodeData, OsmNodeId, OsmNodes, OsmWayData, OsmWays};
use crate::model::SegmentError;
use geo::{Intersects, Rect};
use kdam::{term, tqdm, Bar, BarExt};
use osmpbf::{Element, ElementReader};
use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

/// reads a PBF file and stores the Ways and Nodes in lookup objects.
///
/// the file is read twice. the first pass keeps the ways accepted by the
/// [`ElementFilter`] and records which nodes they reference. the second pass
/// keeps only those referenced nodes. after reading:
/// - node references missing from the file are removed from their ways (or
///   fail the import when `ignore_missing` is false)
/// - if provided, ways without any node inside the extent are removed
/// - nodes no longer referenced by a way are removed
pub fn read_pbf(
    filepath: &str,
    filter: &ElementFilter,
    extent_opt: &Option<Rect<f64>>,
    ignore_missing: bool,
) -> Result<(OsmNodes, OsmWays), SegmentError> {
    let mut ways_map = read_ways(filepath, filter)?;
    if ways_map.is_empty() {
        return Err(SegmentError::NoWaysFound);
    }

    let referenced: HashSet<OsmNodeId> = ways_map
        .values()
        .flat_map(|w| w.nodes.iter().copied())
        .collect();
    let mut nodes_map = read_nodes(filepath, &referenced)?;
    if nodes_map.is_empty() {
        return Err(SegmentError::NoNodesFound);
    }

    retain_connected_ways(&mut ways_map, &nodes_map, ignore_missing)?;
    if let Some(extent) = extent_opt {
        retain_ways_in_extent(&mut ways_map, &nodes_map, extent);
    }
    remove_disconnected_nodes(&mut nodes_map, &ways_map);

    if ways_map.is_empty() {
        return Err(SegmentError::NoWaysFound);
    }

    log::info!(
        "{} ways and {} nodes collected from OSM pbf resource.",
        ways_map.len(),
        nodes_map.len(),
    );
    Ok((nodes_map, ways_map))
}

/// first pass: collect every way accepted by the filter.
fn read_ways(filepath: &str, filter: &ElementFilter) -> Result<OsmWays, SegmentError> {
    let reader = ElementReader::from_path(Path::new(filepath))
        .map_err(|e| SegmentError::PbfLibError { source: e })?;

    term::hide_cursor().map_err(|e| SegmentError::InternalError(e.to_string()))?;
    let mut reader_bar = Bar::builder()
        .desc(format!("{filepath} (ways)"))
        .position(0)
        .unit(" rows")
        .unit_scale(true)
        .build()
        .map_err(SegmentError::InternalError)?;
    let mut ways_bar = Bar::builder()
        .desc("ways retained")
        .position(1)
        .build()
        .map_err(SegmentError::InternalError)?;

    let mut ways_map: OsmWays = HashMap::default();
    reader
        .for_each(|e| {
            if let Element::Way(ref way) = e {
                if filter.accept(&e) {
                    let w = OsmWayData::new(way);
                    if ways_map.contains_key(&w.osmid) {
                        log::warn!(
                            "way with OSMID {} occurs more than once in this file",
                            w.osmid
                        );
                    }
                    let _ = ways_bar.update(1);
                    ways_map.insert(w.osmid, w);
                }
            }
            let _ = reader_bar.update(1);
        })
        .map_err(|e| SegmentError::PbfLibError { source: e })?;

    // close the nested progress bars
    eprintln!();
    eprintln!();
    term::show_cursor().map_err(|e| SegmentError::InternalError(e.to_string()))?;
    Ok(ways_map)
}

/// second pass: collect every node referenced by a retained way.
fn read_nodes(filepath: &str, referenced: &HashSet<OsmNodeId>) -> Result<OsmNodes, SegmentError> {
    let reader = ElementReader::from_path(Path::new(filepath))
        .map_err(|e| SegmentError::PbfLibError { source: e })?;

    term::hide_cursor().map_err(|e| SegmentError::InternalError(e.to_string()))?;
    let mut reader_bar = Bar::builder()
        .desc(format!("{filepath} (nodes)"))
        .position(0)
        .unit(" rows")
        .unit_scale(true)
        .build()
        .map_err(SegmentError::InternalError)?;
    let mut nodes_bar = Bar::builder()
        .desc("nodes retained")
        .position(1)
        .total(referenced.len())
        .build()
        .map_err(SegmentError::InternalError)?;

    let mut nodes_map: OsmNodes = HashMap::with_capacity(referenced.len());
    let mut keep = |n: OsmNodeData| {
        if referenced.contains(&n.osmid) {
            if nodes_map.contains_key(&n.osmid) {
                log::warn!(
                    "node with OSMID {} occurs more than once in this file",
                    n.osmid
                );
            }
            let _ = nodes_bar.update(1);
            nodes_map.insert(n.osmid, n);
        }
    };
    reader
        .for_each(|e| {
            match e {
                Element::Node(ref node) => keep(OsmNodeData::from(node)),
                // from documentation on DenseNode:
                // So, if you want to [pattern match on] `Node`, you also likely want to match [`DenseNode`].
                Element::DenseNode(ref dense) => keep(OsmNodeData::from(dense)),
                Element::Way(_) | Element::Relation(_) => {}
            }
            let _ = reader_bar.update(1);
        })
        .map_err(|e| SegmentError::PbfLibError { source: e })?;

    eprintln!();
    eprintln!();
    term::show_cursor().map_err(|e| SegmentError::InternalError(e.to_string()))?;
    Ok(nodes_map)
}

/// removes node references not found in the pbf and drops ways that can no longer
/// form a segment.
pub fn retain_connected_ways(
    ways_map: &mut OsmWays,
    nodes_map: &OsmNodes,
    ignore_missing: bool,
) -> Result<(), SegmentError> {
    let mut n_missing = 0;
    for way in ways_map.values_mut() {
        n_missing += way.retain_present_nodes(nodes_map, ignore_missing)?;
    }
    if n_missing > 0 {
        log::warn!("removed {n_missing} way node references that were not found in the pbf");
    }
    let before = ways_map.len();
    ways_map.retain(|_, w| w.nodes.len() >= 2);
    let n_removed = before - ways_map.len();
    if n_removed > 0 {
        log::info!("removed {n_removed} ways with fewer than 2 nodes");
    }
    Ok(())
}

/// removes any way that does not have at least one node inside the extent.
pub fn retain_ways_in_extent(ways_map: &mut OsmWays, nodes_map: &OsmNodes, extent: &Rect<f64>) {
    let before = ways_map.len();
    let outside = tqdm!(
        ways_map.values(),
        desc = "find ways outside of the extent",
        total = ways_map.len()
    )
    .filter(|way| {
        !way.nodes.iter().any(|n| {
            nodes_map
                .get(n)
                .map(|node| node.intersects(extent))
                .unwrap_or_default()
        })
    })
    .map(|way| way.osmid)
    .collect::<Vec<_>>();
    eprintln!();
    for way_id in outside.iter() {
        ways_map.remove(way_id);
    }
    log::info!(
        "removed {} of {} ways found outside of the extent",
        before - ways_map.len(),
        before
    );
}

/// removes nodes that are not referenced by any way.
pub fn remove_disconnected_nodes(nodes_map: &mut OsmNodes, ways_map: &OsmWays) {
    let connected: HashSet<OsmNodeId> = ways_map
        .values()
        .flat_map(|w| w.nodes.iter().copied())
        .collect();
    nodes_map.retain(|id, _| connected.contains(id));
}
