use super::osm::{OsmNodeId, OsmWayId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("failure reading .pbf file: {source}")]
    PbfLibError { source: osmpbf::Error },
    #[error("node '{0}' present in way '{1}' not found in pbf nodelist")]
    MissingWayNode(OsmNodeId, OsmWayId),
    #[error("pbf does not contain any OSM 'node' elements referenced by accepted ways")]
    NoNodesFound,
    #[error("pbf does not contain any OSM 'way' elements accepted by the element filter")]
    NoWaysFound,
    #[error("invalid ward boundary data in {0}: {1}")]
    InvalidWardData(String, String),
    #[error("ward boundaries in {0} appear to use a projected CRS (found coordinate ({1}, {2})), expected WGS84 longitude/latitude")]
    ProjectedCoordinates(String, f64, f64),
    #[error("no wards found for LAD '{0}', check the name is correct")]
    NoWardsForLad(String),
    #[error("invalid postcode data in {0}: {1}")]
    InvalidPostcodeData(String, String),
    #[error("failure reading GeoJSON file {0}: {1}")]
    GeoJsonError(String, String),
    #[error("failure reading CSV file {0}: {1}")]
    CsvError(String, csv::Error),
    #[error("failure accessing {0}: {1}")]
    IoError(String, std::io::Error),
    #[error("output file {0} already exists and overwrite is disabled")]
    OutputExists(String),
    #[error("failure writing GeoJSON to {0}: {1}")]
    OutputWriteError(String, String),
    #[error("{0}")]
    InternalError(String),
}
