use super::{
    ons::{self, ward_ops, WardLookup},
    osm::import_ops,
    output::output_ops,
    SegmentError,
};
use crate::{
    algorithm::{
        segmentation,
        spatial::{buffer_rect, PostcodeIndex, WardIndex},
        ward_assignment,
    },
    config::SegmentProcessorConfiguration,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum SegmentSource {
    Pbf {
        pbf_filepath: String,
        ward_boundaries_filepath: String,
        ward_lookup_filepath: Option<String>,
        postcode_filepath: Option<String>,
        lad_name: String,
        lad_code: Option<String>,
        output_directory: String,
        configuration: SegmentProcessorConfiguration,
    },
}

impl SegmentSource {
    /// runs the street segment pipeline for a single Local Authority District,
    /// writing a GeoJSON FeatureCollection to the output directory.
    ///
    /// # Returns
    ///
    /// the path of the written GeoJSON file
    pub fn run(&self) -> Result<PathBuf, SegmentError> {
        match self {
            SegmentSource::Pbf {
                pbf_filepath,
                ward_boundaries_filepath,
                ward_lookup_filepath,
                postcode_filepath,
                lad_name,
                lad_code,
                output_directory,
                configuration: conf,
            } => {
                log::info!("processing street segments for {lad_name}");

                eprintln!();
                log::info!("  (((1))) loading ward boundaries");
                let lookup = match ward_lookup_filepath {
                    Some(f) => {
                        let lookup = WardLookup::from_csv(f)?;
                        log::info!("loaded ward lookup with {} wards from {f}", lookup.len());
                        Some(lookup)
                    }
                    None => None,
                };
                let wards = ward_ops::read_wards(ward_boundaries_filepath, lad_name, lookup.as_ref())?;
                let lad_code_opt = lad_code.clone().or_else(|| ward_ops::lad_code_of(&wards));
                let extent = ward_ops::wards_extent(&wards)
                    .map(|r| buffer_rect(&r, conf.extent_buffer_meters))
                    .ok_or_else(|| {
                        SegmentError::InvalidWardData(
                            ward_boundaries_filepath.clone(),
                            format!("wards of {lad_name} have empty geometries"),
                        )
                    })?;
                let ward_index = WardIndex::new(wards);
                log::info!("indexed {} wards of {lad_name}", ward_index.wards().len());

                eprintln!();
                log::info!("  (((2))) loading postcodes");
                let postcodes = load_postcodes(postcode_filepath.as_deref(), lad_code_opt.as_deref())?;

                eprintln!();
                log::info!("  (((3))) reading PBF source");
                let (nodes, ways) = import_ops::read_pbf(
                    pbf_filepath,
                    &conf.element_filter,
                    &Some(extent),
                    conf.ignore_missing_nodes,
                )?;

                eprintln!();
                log::info!("  (((4))) splitting ways into segments at intersections");
                let segments = segmentation::segment_ways(&ways, &nodes, conf.parallelize)?;

                eprintln!();
                log::info!("  (((5))) assigning segments to wards");
                let assigned =
                    ward_assignment::assign_wards(&segments, &ward_index, conf.parallelize)?;

                eprintln!();
                log::info!("  (((6))) matching postcodes and building features");
                let features = output_ops::build_features(
                    &assigned,
                    &ways,
                    &postcodes,
                    conf.postcode_buffer_meters,
                    &conf.default_color,
                    conf.parallelize,
                )?;

                eprintln!();
                log::info!("  (((7))) writing GeoJSON");
                output_ops::write_geojson(
                    &features,
                    Path::new(output_directory),
                    lad_name,
                    conf.overwrite,
                    conf.pretty,
                )
            }
        }
    }
}

/// helper that loads the postcode index when a postcode directory is available.
/// a missing file or unknown LAD code is not fatal, the features are written
/// with empty postcode lists.
fn load_postcodes(
    postcode_filepath: Option<&str>,
    lad_code: Option<&str>,
) -> Result<PostcodeIndex, SegmentError> {
    match (postcode_filepath, lad_code) {
        (None, _) => {
            log::info!("no postcode file provided, skipping postcode matching");
            Ok(PostcodeIndex::empty())
        }
        (Some(f), _) if !Path::new(f).exists() => {
            log::warn!("postcode file {f} not found, skipping postcode matching");
            Ok(PostcodeIndex::empty())
        }
        (Some(f), None) => {
            log::warn!(
                "no LAD code provided or found in ward data, unable to filter {f}, skipping postcode matching"
            );
            Ok(PostcodeIndex::empty())
        }
        (Some(f), Some(code)) => {
            let postcodes = ons::read_postcodes(f, code)?;
            Ok(PostcodeIndex::new(postcodes))
        }
    }
}
