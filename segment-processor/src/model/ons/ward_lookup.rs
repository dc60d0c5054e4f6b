use super::{ons_column::clean_column_name, OnsColumn};
use crate::model::SegmentError;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WardLookupRow {
    pub ward_name: Option<String>,
    pub lad_code: Option<String>,
    pub lad_name: Option<String>,
}

/// the ONS ward to Local Authority District lookup, keyed by ward code.
#[derive(Debug, Clone, Default)]
pub struct WardLookup(HashMap<String, WardLookupRow>);

impl WardLookup {
    pub fn get(&self, ward_code: &str) -> Option<&WardLookupRow> {
        self.0.get(ward_code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// reads a lookup CSV with columns `WD*CD` and `LAD*NM`, plus the optional
    /// columns `WD*NM` and `LAD*CD`.
    pub fn from_csv(filepath: &str) -> Result<WardLookup, SegmentError> {
        let mut reader = csv::Reader::from_path(filepath)
            .map_err(|e| SegmentError::CsvError(String::from(filepath), e))?;
        let headers = reader
            .headers()
            .map_err(|e| SegmentError::CsvError(String::from(filepath), e))?
            .clone();
        let index_of = |col: OnsColumn| {
            let name = col.find(headers.iter())?;
            headers.iter().position(|h| h == name)
        };
        let missing = |col: OnsColumn| {
            SegmentError::InvalidWardData(
                String::from(filepath),
                format!("ward lookup has no {col} column, found {:?}", headers_vec(&headers)),
            )
        };
        let ward_code_idx = index_of(OnsColumn::WardCode).ok_or_else(|| missing(OnsColumn::WardCode))?;
        let lad_name_idx = index_of(OnsColumn::LadName).ok_or_else(|| missing(OnsColumn::LadName))?;
        let ward_name_idx = index_of(OnsColumn::WardName);
        let lad_code_idx = index_of(OnsColumn::LadCode);

        let mut rows = HashMap::new();
        for record in reader.records() {
            let record = record.map_err(|e| SegmentError::CsvError(String::from(filepath), e))?;
            let field = |idx: usize| {
                record
                    .get(idx)
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .map(String::from)
            };
            let ward_code = match field(ward_code_idx) {
                Some(code) => code,
                None => {
                    log::debug!("skipping ward lookup row without a ward code: {record:?}");
                    continue;
                }
            };
            let row = WardLookupRow {
                ward_name: ward_name_idx.and_then(field),
                lad_code: lad_code_idx.and_then(field),
                lad_name: field(lad_name_idx),
            };
            rows.insert(ward_code, row);
        }
        log::info!("loaded {} ward lookup rows from {filepath}", rows.len());
        Ok(WardLookup(rows))
    }
}

impl FromIterator<(String, WardLookupRow)> for WardLookup {
    fn from_iter<T: IntoIterator<Item = (String, WardLookupRow)>>(iter: T) -> Self {
        WardLookup(iter.into_iter().collect())
    }
}

fn headers_vec(headers: &csv::StringRecord) -> Vec<&str> {
    headers.iter().map(clean_column_name).collect()
}
