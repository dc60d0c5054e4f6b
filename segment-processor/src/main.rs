use clap::{Parser, Subcommand};
use segment_processor::{
    config::SegmentProcessorConfiguration,
    model::{SegmentCliError, SegmentSource},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct SegmentAppArguments {
    #[command(subcommand)]
    app: App,
}

#[derive(Subcommand)]
pub enum App {
    Pbf {
        #[arg(long, help = "path to .pbf file covering the Local Authority District")]
        pbf_file: String,
        #[arg(long, help = "path to ONS ward boundaries GeoJSON in WGS84")]
        ward_boundaries_file: String,
        #[arg(long, help = "name of the Local Authority District, such as \"Brent\"")]
        lad_name: String,
        #[arg(long, help = "output directory for the segments GeoJSON")]
        output_directory: String,
        #[arg(long, help = "path to ONS ward to LAD lookup CSV")]
        ward_lookup_file: Option<String>,
        #[arg(long, help = "path to ONS Postcode Directory CSV (.csv or .csv.gz)")]
        postcode_file: Option<String>,
        #[arg(long, help = "LAD code used to filter postcodes, such as E09000005")]
        lad_code: Option<String>,
        #[arg(long, help = "path to .toml or .json file with segment processor parameters")]
        configuration_file: Option<String>,
    },
}

pub fn run(app: &App) -> Result<(), SegmentCliError> {
    env_logger::init();
    match app {
        App::Pbf {
            pbf_file,
            ward_boundaries_file,
            lad_name,
            output_directory,
            ward_lookup_file,
            postcode_file,
            lad_code,
            configuration_file,
        } => {
            let conf = match configuration_file {
                None => Ok(SegmentProcessorConfiguration::default()),
                Some(f) => {
                    log::info!("reading segment processor configuration from {f}");
                    SegmentProcessorConfiguration::try_from(f)
                }
            }?;
            if lad_name.trim().is_empty() {
                return Err(SegmentCliError::ConfigurationError(String::from(
                    "--lad-name must not be empty",
                )));
            }
            let source = SegmentSource::Pbf {
                pbf_filepath: pbf_file.clone(),
                ward_boundaries_filepath: ward_boundaries_file.clone(),
                ward_lookup_filepath: ward_lookup_file.clone(),
                postcode_filepath: postcode_file.clone(),
                lad_name: lad_name.trim().to_string(),
                lad_code: lad_code.clone(),
                output_directory: output_directory.clone(),
                configuration: conf,
            };
            match source.run() {
                Ok(path) => {
                    eprintln!("finished. segments written to {}", path.display());
                    Ok(())
                }
                Err(e) => {
                    log::error!("segment processing failed: {e}");
                    Err(e)?
                }
            }
        }
    }
}

fn main() {
    let args = SegmentAppArguments::parse();
    if let Err(e) = run(&args.app) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{App, SegmentAppArguments};
    use clap::Parser;

    #[test]
    fn parses_pbf_arguments() {
        let args = SegmentAppArguments::parse_from([
            "segment-processor",
            "pbf",
            "--pbf-file",
            "greater-london.osm.pbf",
            "--ward-boundaries-file",
            "wards.geojson",
            "--lad-name",
            "Brent",
            "--output-directory",
            "out",
            "--postcode-file",
            "ONSPD.csv.gz",
        ]);
        match args.app {
            App::Pbf {
                lad_name,
                postcode_file,
                ward_lookup_file,
                configuration_file,
                ..
            } => {
                assert_eq!(lad_name, "Brent");
                assert_eq!(postcode_file.as_deref(), Some("ONSPD.csv.gz"));
                assert!(ward_lookup_file.is_none());
                assert!(configuration_file.is_none());
            }
        }
    }

    #[test]
    fn missing_required_argument_fails() {
        let result = SegmentAppArguments::try_parse_from([
            "segment-processor",
            "pbf",
            "--pbf-file",
            "greater-london.osm.pbf",
        ]);
        assert!(result.is_err());
    }
}
