use super::Highway;
use osmpbf::Element;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, str::FromStr};

/// selects which ways are read from the pbf as part of the road network.
#[derive(Default, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ElementFilter {
    NoFilter,
    /// the osmnx `network_type="all"` filter
    #[default]
    OsmnxAll,
    /// the osmnx `network_type="all_public"` filter
    OsmnxAllPublic,
    HighwayTags {
        tags: HashSet<Highway>,
    },
}

impl ElementFilter {
    pub fn accept(&self, element: &Element) -> bool {
        use ElementFilter as F;
        match element {
            Element::Node(_) | Element::DenseNode(_) => return true,
            Element::Relation(_) => return false,
            Element::Way(_) => {}
        }
        let tags = WayTags::from(element);
        match self {
            F::NoFilter => true,
            F::OsmnxAll => osmnx_all_filter(&tags),
            F::OsmnxAllPublic => osmnx_all_filter(&tags) && osmnx_public_filter(&tags),
            F::HighwayTags { tags: accepted } => match tags.highway() {
                Some(h) => accepted.contains(&h),
                None => false,
            },
        }
    }
}

/// the tags of a way that take part in filtering
#[derive(Default, Debug)]
struct WayTags<'a> {
    highway: Option<&'a str>,
    area: Option<&'a str>,
    access: Option<&'a str>,
    service: Option<&'a str>,
}

impl<'a> WayTags<'a> {
    fn highway(&self) -> Option<Highway> {
        self.highway.and_then(|h| Highway::from_str(h).ok())
    }
}

impl<'a> From<&Element<'a>> for WayTags<'a> {
    fn from(element: &Element<'a>) -> Self {
        let mut out = WayTags::default();
        if let Element::Way(way) = element {
            for (k, v) in way.tags() {
                match k {
                    "highway" => out.highway = Some(v),
                    "area" => out.area = Some(v),
                    "access" => out.access = Some(v),
                    "service" => out.service = Some(v),
                    _ => {}
                }
            }
        }
        out
    }
}

/// highway values excluded from every osmnx network type
const OSMNX_EXCLUDED_HIGHWAYS: [&str; 8] = [
    "abandoned",
    "construction",
    "no",
    "planned",
    "platform",
    "proposed",
    "raceway",
    "razed",
];

/// OSMNX definition:
/// filters["all"] = (
///     f'["highway"]["area"!~"yes"]'
///     f'["highway"!~"abandoned|construction|no|planned|platform|proposed|raceway|razed"]'
/// )
/// any highway value outside the exclusion list is accepted, including values
/// without a [`Highway`] variant.
fn osmnx_all_filter(tags: &WayTags) -> bool {
    // ["highway"]
    let highway = match tags.highway {
        Some(h) if !h.trim().is_empty() => h.trim(),
        _ => {
            log::debug!("no 'highway' tag");
            return false;
        }
    };
    // ["area"!~"yes"]
    if tags.area == Some("yes") {
        log::debug!("['area'!~'yes']");
        return false;
    }
    // ["highway"!~"abandoned|construction|..."]
    !OSMNX_EXCLUDED_HIGHWAYS.contains(&highway)
}

/// the additional criteria of filters["all_public"]:
///     settings.default_access aka ["access"!~"private"]
///     ["service"!~"private"]
fn osmnx_public_filter(tags: &WayTags) -> bool {
    tags.access != Some("private") && tags.service != Some("private")
}
