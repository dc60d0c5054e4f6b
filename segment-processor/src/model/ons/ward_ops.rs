use super::{OnsColumn, Ward, WardLookup};
use crate::model::SegmentError;
use geo::{BoundingRect, CoordsIter, Geometry, MultiPolygon, Rect};
use geojson::{feature::Id, Feature, FeatureCollection, GeoJson, JsonObject};
use itertools::Itertools;
use std::str::FromStr;

/// reads the wards of a Local Authority District from an ONS ward boundaries
/// GeoJSON file (e.g. `WD_MAY_2023_UK_BGC`).
///
/// ward code and name columns (`WD*CD`, `WD*NM`) and LAD columns (`LAD*CD`,
/// `LAD*NM`) are detected from the feature properties. when the boundaries do
/// not carry the LAD columns, or the ward name, the ward lookup is joined on ward
/// code to provide them.
///
/// # Arguments
///
/// * `filepath` - GeoJSON FeatureCollection of ward boundaries in WGS84
/// * `lad_name` - name of the Local Authority District, such as "Brent"
/// * `lookup`   - optional ONS ward to LAD lookup
///
/// # Returns
///
/// the wards of the LAD sorted by ward code, or an error if none are found.
pub fn read_wards(
    filepath: &str,
    lad_name: &str,
    lookup: Option<&WardLookup>,
) -> Result<Vec<Ward>, SegmentError> {
    let collection = read_geojson_feature_collection(filepath)?;
    log::info!("loaded {} wards total", collection.features.len());

    let property_names = collection
        .features
        .iter()
        .flat_map(|f| f.properties.iter().flat_map(|p| p.keys()))
        .map(String::as_str)
        .unique()
        .collect_vec();
    log::info!("available columns: {property_names:?}");
    let columns = WardColumns::detect(&property_names, lookup.is_some())
        .map_err(|e| SegmentError::InvalidWardData(String::from(filepath), e))?;
    log::info!("using ward columns {columns:?}");

    let mut wards = vec![];
    for feature in collection.features.into_iter() {
        let ward = match columns.ward_attributes(&feature, lookup) {
            Ok(Some(attrs)) if attrs.lad_name == lad_name.trim() => {
                let geometry = ward_geometry(feature, &attrs.code)
                    .map_err(|e| SegmentError::InvalidWardData(String::from(filepath), e))?;
                validate_lon_lat(filepath, &geometry)?;
                attrs.with_geometry(geometry)
            }
            Ok(_) => continue,
            Err(e) => return Err(SegmentError::InvalidWardData(String::from(filepath), e)),
        };
        wards.push(ward);
    }

    if wards.is_empty() {
        return Err(SegmentError::NoWardsForLad(String::from(lad_name)));
    }
    wards.sort_by(|a, b| a.code.cmp(&b.code));
    log::info!("filtered to {} wards in {lad_name}", wards.len());
    Ok(wards)
}

/// the LAD code shared by the wards, if the ward data provided one.
pub fn lad_code_of(wards: &[Ward]) -> Option<String> {
    let codes = wards
        .iter()
        .flat_map(|w| w.lad_code.clone())
        .unique()
        .collect_vec();
    if codes.len() > 1 {
        log::warn!("wards report more than one LAD code: {codes:?}, using the first");
    }
    codes.into_iter().next()
}

/// the bounding rectangle of all ward geometries.
pub fn wards_extent(wards: &[Ward]) -> Option<Rect<f64>> {
    wards
        .iter()
        .flat_map(|w| w.bounding_rect())
        .reduce(|a, b| {
            let min = geo::coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) };
            let max = geo::coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) };
            Rect::new(min, max)
        })
}

/// helper to read a FeatureCollection from a file
fn read_geojson_feature_collection(filepath: &str) -> Result<FeatureCollection, SegmentError> {
    let contents = std::fs::read_to_string(filepath)
        .map_err(|e| SegmentError::IoError(String::from(filepath), e))?;
    let dataset = GeoJson::from_str(&contents)
        .map_err(|e| SegmentError::GeoJsonError(String::from(filepath), e.to_string()))?;
    match dataset {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        GeoJson::Geometry(_) => Err(SegmentError::GeoJsonError(
            String::from(filepath),
            String::from("ward boundaries must be a FeatureCollection but found a single 'Geometry'"),
        )),
        GeoJson::Feature(_) => Err(SegmentError::GeoJsonError(
            String::from(filepath),
            String::from("ward boundaries must be a FeatureCollection but found a single 'Feature'"),
        )),
    }
}

/// property names used to read ward attributes
#[derive(Debug)]
struct WardColumns {
    ward_code: String,
    ward_name: Option<String>,
    lad_code: Option<String>,
    lad_name: Option<String>,
}

struct WardAttributes {
    code: String,
    name: String,
    lad_code: Option<String>,
    lad_name: String,
}

impl WardAttributes {
    fn with_geometry(self, geometry: MultiPolygon<f64>) -> Ward {
        Ward {
            code: self.code,
            name: self.name,
            lad_code: self.lad_code,
            lad_name: self.lad_name,
            geometry,
        }
    }
}

impl WardColumns {
    fn detect(property_names: &[&str], has_lookup: bool) -> Result<WardColumns, String> {
        let find = |c: OnsColumn| c.find(property_names.iter().copied()).map(String::from);
        let columns = WardColumns {
            ward_code: find(OnsColumn::WardCode)
                .ok_or_else(|| format!("could not find ward code column ({})", OnsColumn::WardCode))?,
            ward_name: find(OnsColumn::WardName),
            lad_code: find(OnsColumn::LadCode),
            lad_name: find(OnsColumn::LadName),
        };
        if !has_lookup {
            if columns.ward_name.is_none() {
                return Err(format!(
                    "could not find ward name column ({}) and no ward lookup was provided",
                    OnsColumn::WardName
                ));
            }
            if columns.lad_name.is_none() {
                return Err(format!(
                    "could not find LAD name column ({}) and no ward lookup was provided",
                    OnsColumn::LadName
                ));
            }
        }
        Ok(columns)
    }

    /// reads the attributes of a ward feature, falling back to the lookup.
    /// features without a ward code, or with no known LAD, are skipped with a warning.
    fn ward_attributes(
        &self,
        feature: &Feature,
        lookup: Option<&WardLookup>,
    ) -> Result<Option<WardAttributes>, String> {
        let properties = match &feature.properties {
            Some(p) => p,
            None => return Err(format!("feature {} has no properties", feature_id(feature))),
        };
        let code = match get_string(properties, Some(&self.ward_code)) {
            Some(code) => code,
            None => {
                log::warn!("feature {} has no ward code, skipping", feature_id(feature));
                return Ok(None);
            }
        };
        let row = lookup.and_then(|l| l.get(&code));
        let name = get_string(properties, self.ward_name.as_ref())
            .or_else(|| row.and_then(|r| r.ward_name.clone()))
            .unwrap_or_else(|| code.clone());
        let lad_code = get_string(properties, self.lad_code.as_ref())
            .or_else(|| row.and_then(|r| r.lad_code.clone()));
        let lad_name = match get_string(properties, self.lad_name.as_ref())
            .or_else(|| row.and_then(|r| r.lad_name.clone()))
        {
            Some(n) => n,
            None => {
                log::warn!("ward {code} has no LAD name in the boundaries or lookup, skipping");
                return Ok(None);
            }
        };
        Ok(Some(WardAttributes {
            code,
            name,
            lad_code,
            lad_name,
        }))
    }
}

fn get_string(properties: &JsonObject, column: Option<&String>) -> Option<String> {
    let value = properties.get(column?)?;
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(String::from(s.trim())),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn feature_id(feature: &Feature) -> String {
    match &feature.id {
        Some(Id::String(s)) => s.to_string(),
        Some(Id::Number(n)) => n.to_string(),
        None => String::from("<no id>"),
    }
}

/// decodes a ward feature geometry, which must be a POLYGON or MULTIPOLYGON.
fn ward_geometry(feature: Feature, ward_code: &str) -> Result<MultiPolygon<f64>, String> {
    let geom = feature
        .geometry
        .ok_or_else(|| format!("ward {ward_code} has no geometry which is invalid"))?;
    let geometry: Geometry<f64> = geom
        .try_into()
        .map_err(|e| format!("failed to decode geometry for ward {ward_code}: {e}"))?;
    match geometry {
        Geometry::Polygon(p) => Ok(MultiPolygon::new(vec![p])),
        Geometry::MultiPolygon(mp) => Ok(mp),
        _ => Err(format!(
            "ward {ward_code} geometry must be a POLYGON or MULTIPOLYGON"
        )),
    }
}

/// British National Grid coordinates are in meters, far outside lon/lat ranges.
fn validate_lon_lat(filepath: &str, geometry: &MultiPolygon<f64>) -> Result<(), SegmentError> {
    match geometry
        .coords_iter()
        .find(|c| !(-180.0..=180.0).contains(&c.x) || !(-90.0..=90.0).contains(&c.y))
    {
        Some(c) => Err(SegmentError::ProjectedCoordinates(
            String::from(filepath),
            c.x,
            c.y,
        )),
        None => Ok(()),
    }
}
