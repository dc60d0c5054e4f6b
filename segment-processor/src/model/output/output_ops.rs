use super::SegmentFeature;
use crate::{
    algorithm::{spatial::PostcodeIndex, ward_assignment::AssignedSegment},
    model::{osm::OsmWays, SegmentError},
};
use geojson::{Feature, FeatureCollection};
use itertools::Itertools;
use kdam::{tqdm, Bar, BarExt};
use rayon::prelude::*;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// builds the output features, attaching way metadata and nearby postcodes.
/// features are numbered `segment_0, segment_1, ...` in the order of `assigned`.
pub fn build_features(
    assigned: &[AssignedSegment],
    ways: &OsmWays,
    postcodes: &PostcodeIndex,
    postcode_buffer_meters: f64,
    color: &str,
    parallelize: bool,
) -> Result<Vec<SegmentFeature>, SegmentError> {
    let build = |(index, a): (usize, &AssignedSegment)| -> Result<SegmentFeature, SegmentError> {
        let way = ways.get(&a.segment.way_id).ok_or_else(|| {
            SegmentError::InternalError(format!(
                "segment references way {} which is not in the ways collection",
                a.segment.way_id
            ))
        })?;
        let matched = postcodes.within(&a.geometry, postcode_buffer_meters);
        Ok(SegmentFeature::new(index, color, a, way, matched))
    };

    let features = if parallelize {
        let bar = Arc::new(Mutex::new(
            Bar::builder()
                .desc("matching postcodes")
                .total(assigned.len())
                .build()
                .map_err(SegmentError::InternalError)?,
        ));
        assigned
            .par_iter()
            .enumerate()
            .map(|row| {
                if let Ok(mut bar) = bar.clone().lock() {
                    let _ = bar.update(1);
                }
                build(row)
            })
            .collect::<Result<Vec<_>, SegmentError>>()?
    } else {
        tqdm!(
            assigned.iter().enumerate(),
            desc = "matching postcodes",
            total = assigned.len()
        )
        .map(build)
        .collect::<Result<Vec<_>, SegmentError>>()?
    };
    eprintln!();

    let n_with_postcodes = features.iter().filter(|f| !f.postcodes.is_empty()).count();
    log::info!(
        "created {} features, {} with at least one postcode",
        features.len(),
        n_with_postcodes
    );
    Ok(features)
}

/// the output filename for a Local Authority District, such as
/// `brent_segments.geojson` or `kensington_and_chelsea_segments.geojson`.
pub fn output_filename(lad_name: &str) -> String {
    let stem = lad_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .join("_");
    format!("{stem}_segments.geojson")
}

/// helper function to "mkdir -p path" - make all directories along a path
pub fn create_dirs<P>(path: P) -> Result<(), SegmentError>
where
    P: AsRef<Path>,
{
    let dirspath = path.as_ref();
    if !dirspath.is_dir() {
        std::fs::create_dir_all(dirspath).map_err(|e| {
            SegmentError::IoError(dirspath.to_string_lossy().to_string(), e)
        })
    } else {
        Ok(())
    }
}

/// writes the features as a GeoJSON FeatureCollection into the output directory.
///
/// # Returns
///
/// the path of the written file
pub fn write_geojson(
    features: &[SegmentFeature],
    output_directory: &Path,
    lad_name: &str,
    overwrite: bool,
    pretty: bool,
) -> Result<PathBuf, SegmentError> {
    create_dirs(output_directory)?;
    let filepath = output_directory.join(output_filename(lad_name));
    let filepath_str = filepath.to_string_lossy().to_string();
    if filepath.exists() && !overwrite {
        return Err(SegmentError::OutputExists(filepath_str));
    }
    log::info!("saving to {filepath_str}");

    let collection = FeatureCollection {
        bbox: None,
        features: tqdm!(
            features.iter(),
            desc = "write segment features",
            total = features.len()
        )
        .map(Feature::from)
        .collect_vec(),
        foreign_members: None,
    };
    eprintln!();

    let file = File::create(&filepath).map_err(|e| SegmentError::IoError(filepath_str.clone(), e))?;
    let mut writer = BufWriter::new(file);
    let result = if pretty {
        serde_json::to_writer_pretty(&mut writer, &collection)
    } else {
        serde_json::to_writer(&mut writer, &collection)
    };
    result.map_err(|e| SegmentError::OutputWriteError(filepath_str.clone(), e.to_string()))?;
    writer
        .flush()
        .map_err(|e| SegmentError::IoError(filepath_str.clone(), e))?;

    log::info!(
        "successfully saved {} segments to {filepath_str}",
        features.len()
    );
    Ok(filepath)
}

#[cfg(test)]
mod tests {
    use super::{build_features, output_filename, write_geojson};
    use crate::algorithm::{
        segmentation::StreetSegment, spatial::PostcodeIndex, ward_assignment::AssignedSegment,
    };
    use crate::model::ons::{Postcode, Ward};
    use crate::model::osm::{OsmNodeId, OsmWayData, OsmWayId, OsmWays};
    use crate::model::SegmentError;
    use geo::{line_string, polygon, MultiPolygon, Point};
    use geojson::GeoJson;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn ward() -> Ward {
        Ward {
            code: String::from("E05013490"),
            name: String::from("Alperton"),
            lad_code: Some(String::from("E09000005")),
            lad_name: String::from("Brent"),
            geometry: MultiPolygon::new(vec![polygon![
                (x: -0.31, y: 51.53),
                (x: -0.28, y: 51.53),
                (x: -0.28, y: 51.56),
                (x: -0.31, y: 51.56),
                (x: -0.31, y: 51.53),
            ]]),
        }
    }

    fn segment(way_id: i64) -> StreetSegment {
        StreetSegment {
            way_id: OsmWayId(way_id),
            src_node_id: OsmNodeId(1),
            dst_node_id: OsmNodeId(2),
            path: vec![OsmNodeId(1), OsmNodeId(2)],
            geometry: line_string![(x: -0.30, y: 51.54), (x: -0.29, y: 51.54)],
        }
    }

    fn ways() -> OsmWays {
        let w = OsmWayData {
            osmid: OsmWayId(10),
            nodes: vec![OsmNodeId(1), OsmNodeId(2)],
            name: Some(String::from("Ealing Road")),
            highway: Some(String::from("secondary")),
            ..Default::default()
        };
        HashMap::from([(w.osmid, w)])
    }

    #[test]
    fn filename_from_lad_name() {
        assert_eq!(output_filename("Brent"), "brent_segments.geojson");
        assert_eq!(
            output_filename(" Kensington and  Chelsea "),
            "kensington_and_chelsea_segments.geojson"
        );
    }

    #[test]
    fn features_numbered_in_order() {
        let ward = ward();
        let segments = [segment(10), segment(10)];
        let assigned: Vec<AssignedSegment> = segments
            .iter()
            .map(|s| AssignedSegment {
                segment: s,
                ward: &ward,
                geometry: s.geometry.clone(),
                clipped: false,
            })
            .collect();
        let postcodes = PostcodeIndex::new(vec![Postcode {
            postcode: String::from("HA0 4AA"),
            point: Point::new(-0.295, 51.5401),
        }]);
        for parallelize in [false, true] {
            let features =
                build_features(&assigned, &ways(), &postcodes, 30.0, "#FF0000", parallelize)
                    .expect("build failed");
            let ids: Vec<&str> = features.iter().map(|f| f.id.as_str()).collect();
            assert_eq!(ids, vec!["segment_0", "segment_1"]);
            assert_eq!(features[0].postcodes, vec![String::from("HA0 4AA")]);
            assert_eq!(features[0].name.as_deref(), Some("Ealing Road"));
        }
    }

    #[test]
    fn missing_way_is_an_error() {
        let ward = ward();
        let s = segment(99);
        let assigned = vec![AssignedSegment {
            segment: &s,
            ward: &ward,
            geometry: s.geometry.clone(),
            clipped: false,
        }];
        let result = build_features(&assigned, &ways(), &PostcodeIndex::empty(), 30.0, "#FF0000", false);
        assert!(result.is_err());
    }

    #[test]
    fn writes_feature_collection() {
        let dir = std::env::temp_dir().join("segment_processor_output_test");
        let _ = std::fs::remove_dir_all(&dir);
        let ward = ward();
        let s = segment(10);
        let assigned = vec![AssignedSegment {
            segment: &s,
            ward: &ward,
            geometry: s.geometry.clone(),
            clipped: false,
        }];
        let features =
            build_features(&assigned, &ways(), &PostcodeIndex::empty(), 30.0, "#FF0000", false)
                .expect("build failed");
        let path = write_geojson(&features, &dir, "Brent", false, true).expect("write failed");
        assert!(path.ends_with("brent_segments.geojson"));

        let contents = std::fs::read_to_string(&path).expect("test invariant failed");
        match GeoJson::from_str(&contents) {
            Ok(GeoJson::FeatureCollection(fc)) => {
                assert_eq!(fc.features.len(), 1);
                let props = fc.features[0].properties.as_ref().expect("no properties");
                assert_eq!(props["id"], "segment_0");
                assert_eq!(props["color"], "#FF0000");
                assert_eq!(props["ward"], "Alperton");
                assert_eq!(props["postcodes"], serde_json::json!([]));
            }
            other => panic!("expected a FeatureCollection, found {other:?}"),
        }

        // a second write without overwrite is refused
        match write_geojson(&features, &dir, "Brent", false, true) {
            Err(SegmentError::OutputExists(_)) => {}
            other => panic!("expected OutputExists, found {other:?}"),
        }
        assert!(write_geojson(&features, &dir, "Brent", true, false).is_ok());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
