use super::SegmentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegmentCliError {
    #[error("failure reading run configuration: {0}")]
    ConfigurationError(String),
    #[error("segment processing failed: {source}")]
    SegmentError {
        #[from]
        source: SegmentError,
    },
}
