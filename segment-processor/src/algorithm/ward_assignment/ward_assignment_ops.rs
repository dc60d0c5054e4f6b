use super::AssignedSegment;
use crate::{
    algorithm::{segmentation::StreetSegment, spatial::WardIndex},
    model::SegmentError,
};
use geo::{Haversine, Length, LineString};
use itertools::Itertools;
use kdam::{tqdm, Bar, BarExt};
use rayon::prelude::*;
use std::sync::{Arc, Mutex};

/// assigns each segment to the wards it lies within:
/// - a segment that intersects no ward is outside the LAD and is dropped
/// - a segment within one ward is kept whole
/// - a segment crossing ward boundaries is clipped into one piece per ward
///
/// the result is ordered by input segment and then by ward code, independent
/// of `parallelize`.
pub fn assign_wards<'a>(
    segments: &'a [StreetSegment],
    index: &'a WardIndex,
    parallelize: bool,
) -> Result<Vec<AssignedSegment<'a>>, SegmentError> {
    let assigned_per_segment = if parallelize {
        let bar = Arc::new(Mutex::new(
            Bar::builder()
                .desc("assigning segments to wards")
                .total(segments.len())
                .build()
                .map_err(SegmentError::InternalError)?,
        ));
        segments
            .par_iter()
            .map(|segment| {
                if let Ok(mut bar) = bar.clone().lock() {
                    let _ = bar.update(1);
                }
                assign_segment(segment, index)
            })
            .collect::<Vec<_>>()
    } else {
        tqdm!(
            segments.iter(),
            desc = "assigning segments to wards",
            total = segments.len()
        )
        .map(|segment| assign_segment(segment, index))
        .collect::<Vec<_>>()
    };
    eprintln!();

    let n_outside = assigned_per_segment.iter().filter(|a| a.is_empty()).count();
    let n_split = assigned_per_segment
        .iter()
        .filter(|a| a.iter().any(|s| s.clipped))
        .count();
    let assigned = assigned_per_segment.into_iter().flatten().collect_vec();
    log::info!(
        "assigned {} segments to wards as {} features ({} outside all wards, {} split at ward boundaries)",
        segments.len() - n_outside,
        assigned.len(),
        n_outside,
        n_split
    );
    Ok(assigned)
}

/// assigns a single segment to the wards it intersects.
pub fn assign_segment<'a>(
    segment: &'a StreetSegment,
    index: &'a WardIndex,
) -> Vec<AssignedSegment<'a>> {
    let wards = index.intersecting(&segment.geometry);
    match wards.len() {
        0 => vec![],
        1 => wards
            .into_iter()
            .filter(|_| has_length(&segment.geometry))
            .map(|ward| AssignedSegment {
                segment,
                ward,
                geometry: segment.geometry.clone(),
                clipped: false,
            })
            .collect_vec(),
        _ => wards
            .into_iter()
            .flat_map(|ward| {
                ward.clip(&segment.geometry)
                    .into_iter()
                    .filter(has_length)
                    .map(move |geometry| AssignedSegment {
                        segment,
                        ward,
                        geometry,
                        clipped: true,
                    })
            })
            .collect_vec(),
    }
}

/// distinct nodes may share a location, so a segment or clipped piece can have
/// zero length. those are not emitted.
fn has_length(line: &LineString<f64>) -> bool {
    line.0.len() >= 2 && Haversine.length(line) > 0.0
}
