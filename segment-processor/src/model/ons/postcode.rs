use super::{ons_column::clean_column_name, OnsColumn};
use crate::model::SegmentError;
use flate2::read::GzDecoder;
use geo::Point;
use kdam::BarExt;
use std::{fs::File, io::Read, path::Path};

/// a postcode centroid from the ONS Postcode Directory
#[derive(Debug, Clone, PartialEq)]
pub struct Postcode {
    pub postcode: String,
    pub point: Point<f64>,
}

const POSTCODE_COLUMN: &str = "pcds";
const LATITUDE_COLUMN: &str = "lat";
const LONGITUDE_COLUMN: &str = "long";
/// pre-2019 postcode directories name the LAD code column `oslaua`
const LEGACY_LAD_CODE_COLUMN: &str = "oslaua";
/// the ONS Postcode Directory uses this latitude for postcodes without a grid reference
const NO_GRID_REFERENCE_LATITUDE: f64 = 99.999999;

/// reads the postcode centroids of a Local Authority District from an ONS Postcode
/// Directory CSV file, which may be gzip-compressed (`.csv.gz`).
///
/// rows without a usable location are skipped.
pub fn read_postcodes(filepath: &str, lad_code: &str) -> Result<Vec<Postcode>, SegmentError> {
    let file = File::open(Path::new(filepath))
        .map_err(|e| SegmentError::IoError(String::from(filepath), e))?;
    let source: Box<dyn Read> = if filepath.ends_with(".gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);
    let headers = reader
        .headers()
        .map_err(|e| SegmentError::CsvError(String::from(filepath), e))?
        .clone();

    let index_of = |name: &str| {
        headers
            .iter()
            .position(|h| clean_column_name(h).eq_ignore_ascii_case(name))
    };
    let missing = |name: &str| {
        SegmentError::InvalidPostcodeData(
            String::from(filepath),
            format!("missing column '{name}'"),
        )
    };
    let postcode_idx = index_of(POSTCODE_COLUMN).ok_or_else(|| missing(POSTCODE_COLUMN))?;
    let lat_idx = index_of(LATITUDE_COLUMN).ok_or_else(|| missing(LATITUDE_COLUMN))?;
    let lon_idx = index_of(LONGITUDE_COLUMN).ok_or_else(|| missing(LONGITUDE_COLUMN))?;
    let lad_idx = OnsColumn::LadCode
        .find(headers.iter())
        .and_then(|name| headers.iter().position(|h| h == name))
        .or_else(|| index_of(LEGACY_LAD_CODE_COLUMN))
        .ok_or_else(|| missing("LAD*CD"))?;

    let mut postcodes = vec![];
    let mut n_skipped: usize = 0;
    let mut bar = kdam::Bar::builder()
        .desc(filepath)
        .unit(" rows")
        .unit_scale(true)
        .build()
        .map_err(SegmentError::InternalError)?;
    for record in reader.records() {
        let _ = bar.update(1);
        let record = record.map_err(|e| SegmentError::CsvError(String::from(filepath), e))?;
        if record.get(lad_idx).map(str::trim) != Some(lad_code) {
            continue;
        }
        let postcode = record.get(postcode_idx).map(str::trim).unwrap_or_default();
        let location = parse_location(record.get(lat_idx), record.get(lon_idx));
        match (postcode.is_empty(), location) {
            (false, Some(point)) => postcodes.push(Postcode {
                postcode: String::from(postcode),
                point,
            }),
            _ => {
                log::debug!("skipping postcode row without a usable location: {record:?}");
                n_skipped += 1;
            }
        }
    }
    eprintln!();

    if n_skipped > 0 {
        log::info!("skipped {n_skipped} postcodes in LAD {lad_code} without a location");
    }
    log::info!(
        "loaded {} postcodes for LAD {lad_code} from {filepath}",
        postcodes.len()
    );
    Ok(postcodes)
}

/// parses a WGS84 point, rejecting the directory's "no grid reference" placeholder.
fn parse_location(lat: Option<&str>, lon: Option<&str>) -> Option<Point<f64>> {
    let lat = lat?.trim().parse::<f64>().ok()?;
    let lon = lon?.trim().parse::<f64>().ok()?;
    if lat >= NO_GRID_REFERENCE_LATITUDE || !(-90.0..=90.0).contains(&lat) {
        return None;
    }
    if !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    Some(Point::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::{parse_location, read_postcodes};
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    const CSV: &str = "pcds,dointr,doterm,lat,long,lad25cd\n\
        NW10 0AA,199001,,51.536,-0.245,E09000005\n\
        NW10 0AB,199001,,51.537,-0.246,E09000005\n\
        NW10 9ZZ,199001,,99.999999,0.000000,E09000005\n\
        W1A 1AA,199001,,51.518,-0.143,E09000033\n";

    #[test]
    fn reads_and_filters_by_lad() {
        let path = std::env::temp_dir().join("segment_processor_postcodes_test.csv");
        std::fs::write(&path, CSV).expect("test invariant failed");
        let postcodes = read_postcodes(path.to_str().unwrap(), "E09000005").expect("read failed");
        let codes: Vec<&str> = postcodes.iter().map(|p| p.postcode.as_str()).collect();
        assert_eq!(codes, vec!["NW10 0AA", "NW10 0AB"]);
        assert!((postcodes[0].point.x() + 0.245).abs() < 1e-9);
        assert!((postcodes[0].point.y() - 51.536).abs() < 1e-9);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn reads_gzip_compressed_directory() {
        let path = std::env::temp_dir().join("segment_processor_postcodes_test.csv.gz");
        {
            let file = std::fs::File::create(&path).expect("test invariant failed");
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(CSV.as_bytes()).unwrap();
            encoder.finish().unwrap();
        }
        let postcodes = read_postcodes(path.to_str().unwrap(), "E09000033").expect("read failed");
        assert_eq!(postcodes.len(), 1);
        assert_eq!(postcodes[0].postcode, "W1A 1AA");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn legacy_lad_column() {
        let path = std::env::temp_dir().join("segment_processor_postcodes_legacy.csv");
        std::fs::write(&path, "PCDS,OSLAUA,LAT,LONG\nHA0 1AA,E09000005,51.55,-0.30\n")
            .expect("test invariant failed");
        let postcodes = read_postcodes(path.to_str().unwrap(), "E09000005").expect("read failed");
        assert_eq!(postcodes.len(), 1);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn placeholder_location_rejected() {
        assert!(parse_location(Some("99.999999"), Some("0.000000")).is_none());
        assert!(parse_location(Some("abc"), Some("0.0")).is_none());
        assert!(parse_location(Some("51.5"), Some("-0.1")).is_some());
    }
}
