use crate::{algorithm::segmentation::StreetSegment, model::ons::Ward};
use geo::{Haversine, Length, LineString};

/// a segment, or the portion of a segment, that lies within a single ward.
#[derive(Debug, Clone)]
pub struct AssignedSegment<'a> {
    pub segment: &'a StreetSegment,
    pub ward: &'a Ward,
    /// the full segment geometry, or the clipped portion when the segment
    /// crosses a ward boundary
    pub geometry: LineString<f64>,
    pub clipped: bool,
}

impl AssignedSegment<'_> {
    pub fn length_meters(&self) -> f64 {
        Haversine.length(&self.geometry)
    }
}
