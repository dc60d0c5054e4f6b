mod segment_processor_config;

pub use segment_processor_config::SegmentProcessorConfiguration;
