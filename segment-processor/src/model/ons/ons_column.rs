use std::fmt::Display;

/// ONS datasets carry a release year in their column names (`WD23CD`, `LAD25NM`, ...),
/// so columns are identified by prefix and suffix rather than by exact name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnsColumn {
    WardCode,
    WardName,
    LadCode,
    LadName,
}

impl OnsColumn {
    fn prefix(&self) -> &'static str {
        match self {
            OnsColumn::WardCode | OnsColumn::WardName => "WD",
            OnsColumn::LadCode | OnsColumn::LadName => "LAD",
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            OnsColumn::WardCode | OnsColumn::LadCode => "CD",
            // the Welsh-language name columns end in NMW and are not matched
            OnsColumn::WardName | OnsColumn::LadName => "NM",
        }
    }

    /// true if this column name matches, ignoring case and any byte order mark.
    pub fn matches(&self, column: &str) -> bool {
        let name = clean_column_name(column).to_uppercase();
        name.starts_with(self.prefix()) && name.ends_with(self.suffix())
    }

    /// finds the first matching column name in sorted order.
    pub fn find<'a, I>(&self, columns: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut matching: Vec<&str> = columns.into_iter().filter(|c| self.matches(c)).collect();
        matching.sort();
        matching.into_iter().next()
    }
}

impl Display for OnsColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*{}", self.prefix(), self.suffix())
    }
}

/// removes whitespace and the UTF-8 byte order mark that ONS CSV downloads
/// place before the first header.
pub fn clean_column_name(column: &str) -> &str {
    column.trim_start_matches('\u{feff}').trim()
}

#[cfg(test)]
mod tests {
    use super::OnsColumn;

    #[test]
    fn finds_year_versioned_columns() {
        let cols = ["FID", "WD23CD", "WD23NM", "WD23NMW", "LAD23CD", "LAD23NM", "geometry"];
        assert_eq!(OnsColumn::WardCode.find(cols), Some("WD23CD"));
        assert_eq!(OnsColumn::WardName.find(cols), Some("WD23NM"));
        assert_eq!(OnsColumn::LadCode.find(cols), Some("LAD23CD"));
        assert_eq!(OnsColumn::LadName.find(cols), Some("LAD23NM"));
    }

    #[test]
    fn ignores_case_and_bom() {
        assert!(OnsColumn::LadCode.matches("lad25cd"));
        assert!(OnsColumn::WardCode.matches("\u{feff}WD24CD"));
        assert!(!OnsColumn::WardName.matches("WD23NMW"));
    }

    #[test]
    fn missing_column() {
        assert_eq!(OnsColumn::LadName.find(["pcds", "lat", "long"]), None);
    }
}
