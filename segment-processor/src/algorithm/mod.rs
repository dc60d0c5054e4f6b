pub mod segmentation;
pub mod spatial;
pub mod ward_assignment;
