pub mod output_ops;
mod segment_feature;

pub use segment_feature::SegmentFeature;
