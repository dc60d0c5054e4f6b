mod buffer;
mod postcode_index;
mod ward_index;

pub use buffer::{buffer_rect, meters_to_degrees};
pub use postcode_index::PostcodeIndex;
pub use ward_index::WardIndex;
