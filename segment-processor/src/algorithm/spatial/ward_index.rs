use crate::model::ons::Ward;
use geo::{BoundingRect, LineString};
use itertools::Itertools;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

type WardEnvelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// spatial index over ward bounding boxes. exact intersection tests are run
/// against the ward geometry for each envelope hit.
pub struct WardIndex {
    wards: Vec<Ward>,
    rtree: RTree<WardEnvelope>,
}

impl WardIndex {
    pub fn new(wards: Vec<Ward>) -> WardIndex {
        let envelopes = wards
            .iter()
            .enumerate()
            .filter_map(|(idx, ward)| match ward.bounding_rect() {
                Some(rect) => {
                    let r = Rectangle::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    );
                    Some(GeomWithData::new(r, idx))
                }
                None => {
                    log::warn!("ward {} has an empty geometry and is not indexed", ward.code);
                    None
                }
            })
            .collect_vec();
        let rtree = RTree::bulk_load(envelopes);
        WardIndex { wards, rtree }
    }

    pub fn wards(&self) -> &[Ward] {
        &self.wards
    }

    /// the wards that intersect the line, in ward code order.
    pub fn intersecting(&self, line: &LineString<f64>) -> Vec<&Ward> {
        let rect = match line.bounding_rect() {
            Some(r) => r,
            None => return vec![],
        };
        let envelope = AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);
        self.rtree
            .locate_in_envelope_intersecting(&envelope)
            .map(|obj| obj.data)
            .sorted()
            .filter_map(|idx| self.wards.get(idx))
            .filter(|ward| ward.intersects(line))
            .collect_vec()
    }
}
