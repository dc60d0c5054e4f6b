use super::buffer_rect;
use crate::model::ons::Postcode;
use geo::{BoundingRect, Closest, ClosestPoint, Distance, Haversine, LineString, Point};
use itertools::Itertools;
use rstar::primitives::GeomWithData;
use rstar::{RTree, AABB};

type PostcodePoint = GeomWithData<[f64; 2], usize>;

/// spatial index over postcode centroids used to find the postcodes near a segment.
pub struct PostcodeIndex {
    postcodes: Vec<Postcode>,
    rtree: RTree<PostcodePoint>,
}

impl PostcodeIndex {
    pub fn new(postcodes: Vec<Postcode>) -> PostcodeIndex {
        let points = postcodes
            .iter()
            .enumerate()
            .map(|(idx, p)| GeomWithData::new([p.point.x(), p.point.y()], idx))
            .collect_vec();
        let rtree = RTree::bulk_load(points);
        PostcodeIndex { postcodes, rtree }
    }

    pub fn empty() -> PostcodeIndex {
        PostcodeIndex::new(vec![])
    }

    pub fn len(&self) -> usize {
        self.postcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postcodes.is_empty()
    }

    /// finds all postcodes whose centroid lies within `meters` of the line.
    /// candidates are taken from the line's bounding box grown by the buffer and
    /// then tested by haversine distance to the closest point on the line.
    ///
    /// # Returns
    ///
    /// the unique postcodes, sorted
    pub fn within(&self, line: &LineString<f64>, meters: f64) -> Vec<String> {
        if self.postcodes.is_empty() {
            return vec![];
        }
        let rect = match line.bounding_rect() {
            Some(r) => buffer_rect(&r, meters),
            None => return vec![],
        };
        let envelope = AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);
        self.rtree
            .locate_in_envelope(&envelope)
            .filter_map(|obj| self.postcodes.get(obj.data))
            .filter(|p| distance_meters(line, &p.point) <= meters)
            .map(|p| p.postcode.clone())
            .sorted()
            .dedup()
            .collect_vec()
    }
}

/// haversine distance from a point to the nearest point of a line, in meters.
fn distance_meters(line: &LineString<f64>, point: &Point<f64>) -> f64 {
    match line.closest_point(point) {
        Closest::Intersection(c) | Closest::SinglePoint(c) => Haversine.distance(*point, c),
        Closest::Indeterminate => f64::INFINITY,
    }
}
