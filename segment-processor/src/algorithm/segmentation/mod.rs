mod intersection_ops;
mod segmentation_ops;
mod street_segment;

pub use intersection_ops::find_intersections;
pub use segmentation_ops::{segment_way, segment_ways};
pub use street_segment::StreetSegment;
