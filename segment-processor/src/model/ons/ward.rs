use geo::{BooleanOps, BoundingRect, Intersects, LineString, MultiLineString, MultiPolygon, Rect};

/// an ONS electoral ward within the Local Authority District being processed.
#[derive(Debug, Clone)]
pub struct Ward {
    pub code: String,
    pub name: String,
    pub lad_code: Option<String>,
    pub lad_name: String,
    pub geometry: MultiPolygon<f64>,
}

impl Ward {
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.geometry.bounding_rect()
    }

    pub fn intersects(&self, line: &LineString<f64>) -> bool {
        self.geometry.intersects(line)
    }

    /// the parts of a line that lie inside this ward, in line order.
    pub fn clip(&self, line: &LineString<f64>) -> MultiLineString<f64> {
        let mls = MultiLineString::new(vec![line.clone()]);
        self.geometry.clip(&mls, false)
    }
}
