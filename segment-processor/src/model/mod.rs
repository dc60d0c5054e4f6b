pub mod ons;
pub mod osm;
pub mod output;
mod segment_cli_error;
mod segment_error;
mod segment_source;

pub use segment_cli_error::SegmentCliError;
pub use segment_error::SegmentError;
pub use segment_source::SegmentSource;
