use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// values of the OSM `highway` key that may be selected by a
/// [`super::ElementFilter::HighwayTags`] filter.
///
/// see https://wiki.openstreetmap.org/wiki/Key:highway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highway {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Unclassified,
    Residential,
    MotorwayLink,
    TrunkLink,
    PrimaryLink,
    SecondaryLink,
    TertiaryLink,
    LivingStreet,
    Service,
    Pedestrian,
    Track,
    BusGuideway,
    Busway,
    Escape,
    Road,
    Footway,
    Bridleway,
    Steps,
    Corridor,
    Path,
    Cycleway,
    Elevator,
    Trailhead,
    Raceway,
    Proposed,
    Construction,
    Planned,
    Abandoned,
    Platform,
    Razed,
    No,
}

impl FromStr for Highway {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Highway as H;
        match s.trim() {
            "motorway" => Ok(H::Motorway),
            "trunk" => Ok(H::Trunk),
            "primary" => Ok(H::Primary),
            "secondary" => Ok(H::Secondary),
            "tertiary" => Ok(H::Tertiary),
            "unclassified" => Ok(H::Unclassified),
            "residential" => Ok(H::Residential),
            "motorway_link" => Ok(H::MotorwayLink),
            "trunk_link" => Ok(H::TrunkLink),
            "primary_link" => Ok(H::PrimaryLink),
            "secondary_link" => Ok(H::SecondaryLink),
            "tertiary_link" => Ok(H::TertiaryLink),
            "living_street" => Ok(H::LivingStreet),
            "service" => Ok(H::Service),
            "pedestrian" => Ok(H::Pedestrian),
            "track" => Ok(H::Track),
            "bus_guideway" => Ok(H::BusGuideway),
            "busway" => Ok(H::Busway),
            "escape" => Ok(H::Escape),
            "road" => Ok(H::Road),
            "footway" => Ok(H::Footway),
            "bridleway" => Ok(H::Bridleway),
            "steps" => Ok(H::Steps),
            "corridor" => Ok(H::Corridor),
            "path" => Ok(H::Path),
            "cycleway" => Ok(H::Cycleway),
            "elevator" => Ok(H::Elevator),
            "trailhead" => Ok(H::Trailhead),
            "raceway" => Ok(H::Raceway),
            "proposed" => Ok(H::Proposed),
            "construction" => Ok(H::Construction),
            "planned" => Ok(H::Planned),
            "abandoned" => Ok(H::Abandoned),
            "platform" => Ok(H::Platform),
            "razed" => Ok(H::Razed),
            "no" => Ok(H::No),
            other => Err(format!("unknown highway tag '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Highway;
    use std::str::FromStr;

    #[test]
    fn parses_osm_tag() {
        match Highway::from_str(" living_street") {
            Ok(h) => assert_eq!(h, Highway::LivingStreet),
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(Highway::from_str("moon_base").is_err());
    }

    #[test]
    fn deserializes_snake_case() {
        let tags: Vec<Highway> =
            serde_json::from_str(r#"["motorway_link", "bus_guideway"]"#).expect("decode failed");
        assert_eq!(tags, vec![Highway::MotorwayLink, Highway::BusGuideway]);
    }
}
