mod assigned_segment;
mod ward_assignment_ops;

pub use assigned_segment::AssignedSegment;
pub use ward_assignment_ops::{assign_segment, assign_wards};
