use crate::{
    algorithm::ward_assignment::AssignedSegment,
    model::osm::{OsmWayData, OsmWayId},
};
use geo::LineString;
use geojson::{feature::Id, Feature, JsonObject};
use serde_json::json;

/// one street segment (or ward portion of a segment) in the output dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentFeature {
    pub id: String,
    pub color: String,
    pub osm_id: OsmWayId,
    pub name: Option<String>,
    pub highway: Option<String>,
    pub _ref: Option<String>,
    pub oneway: bool,
    pub maxspeed: Option<String>,
    pub lanes: Option<String>,
    pub surface: Option<String>,
    pub length_m: f64,
    pub lad: String,
    pub lad_code: Option<String>,
    pub ward: String,
    pub ward_code: String,
    pub postcodes: Vec<String>,
    pub geometry: LineString<f64>,
}

impl SegmentFeature {
    pub const ID_PREFIX: &'static str = "segment_";
    pub const UNNAMED: &'static str = "Unnamed";
    pub const UNKNOWN_HIGHWAY: &'static str = "unknown";

    pub fn segment_id(index: usize) -> String {
        format!("{}{index}", Self::ID_PREFIX)
    }

    pub fn new(
        index: usize,
        color: &str,
        assigned: &AssignedSegment,
        way: &OsmWayData,
        postcodes: Vec<String>,
    ) -> SegmentFeature {
        SegmentFeature {
            id: Self::segment_id(index),
            color: String::from(color),
            osm_id: way.osmid,
            name: way.name.clone(),
            highway: way.highway.clone(),
            _ref: way._ref.clone(),
            oneway: way.is_one_way(),
            maxspeed: way.maxspeed.clone(),
            lanes: way.lanes.clone(),
            surface: way.surface.clone(),
            length_m: (assigned.length_meters() * 100.0).round() / 100.0,
            lad: assigned.ward.lad_name.clone(),
            lad_code: assigned.ward.lad_code.clone(),
            ward: assigned.ward.name.clone(),
            ward_code: assigned.ward.code.clone(),
            postcodes,
            geometry: assigned.geometry.clone(),
        }
    }

    fn properties(&self) -> JsonObject {
        let mut properties = JsonObject::new();
        properties.insert(String::from("id"), json!(self.id));
        properties.insert(String::from("color"), json!(self.color));
        properties.insert(String::from("osm_id"), json!(self.osm_id.0));
        properties.insert(
            String::from("name"),
            json!(self.name.as_deref().unwrap_or(Self::UNNAMED)),
        );
        properties.insert(
            String::from("highway"),
            json!(self.highway.as_deref().unwrap_or(Self::UNKNOWN_HIGHWAY)),
        );
        properties.insert(String::from("ref"), json!(self._ref));
        properties.insert(String::from("oneway"), json!(self.oneway));
        properties.insert(String::from("maxspeed"), json!(self.maxspeed));
        properties.insert(String::from("lanes"), json!(self.lanes));
        properties.insert(String::from("surface"), json!(self.surface));
        properties.insert(String::from("length_m"), json!(self.length_m));
        properties.insert(String::from("lad"), json!(self.lad));
        properties.insert(String::from("lad_code"), json!(self.lad_code));
        properties.insert(String::from("ward"), json!(self.ward));
        properties.insert(String::from("ward_code"), json!(self.ward_code));
        properties.insert(String::from("postcodes"), json!(self.postcodes));
        properties
    }
}

impl From<&SegmentFeature> for Feature {
    fn from(segment: &SegmentFeature) -> Self {
        let geometry = geojson::Geometry::from(&segment.geometry);
        Feature {
            bbox: None,
            geometry: Some(geometry),
            id: Some(Id::String(segment.id.clone())),
            properties: Some(segment.properties()),
            foreign_members: None,
        }
    }
}
