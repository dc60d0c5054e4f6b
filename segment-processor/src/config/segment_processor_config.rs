use crate::model::{osm::ElementFilter, SegmentCliError};
use serde::{Deserialize, Serialize};

/// defines behaviors for a street segment processing run
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct SegmentProcessorConfiguration {
    pub element_filter: ElementFilter,
    /// search radius around each segment for postcode centroids
    pub postcode_buffer_meters: f64,
    /// distance the ward extent is grown by before filtering ways
    pub extent_buffer_meters: f64,
    pub default_color: String,
    pub ignore_missing_nodes: bool,
    pub parallelize: bool,
    pub overwrite: bool,
    pub pretty: bool,
}

impl Default for SegmentProcessorConfiguration {
    fn default() -> Self {
        Self {
            element_filter: Default::default(),
            postcode_buffer_meters: 30.0,
            extent_buffer_meters: 500.0,
            default_color: String::from("#FF0000"),
            ignore_missing_nodes: true,
            parallelize: true,
            overwrite: true,
            pretty: true,
        }
    }
}

impl SegmentProcessorConfiguration {
    /// confirms the color is a `#RRGGBB` hex string and the buffers are
    /// non-negative finite distances.
    pub fn validate(&self) -> Result<(), SegmentCliError> {
        let hex = self.default_color.strip_prefix('#').unwrap_or_default();
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SegmentCliError::ConfigurationError(format!(
                "default_color must be a #RRGGBB hex string, found '{}'",
                self.default_color
            )));
        }
        for (name, value) in [
            ("postcode_buffer_meters", self.postcode_buffer_meters),
            ("extent_buffer_meters", self.extent_buffer_meters),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SegmentCliError::ConfigurationError(format!(
                    "{name} must be a non-negative distance, found {value}"
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<&String> for SegmentProcessorConfiguration {
    type Error = SegmentCliError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        let read = || {
            std::fs::read_to_string(f).map_err(|e| {
                SegmentCliError::ConfigurationError(format!("failure reading {f}: {e}"))
            })
        };
        let conf: SegmentProcessorConfiguration = if f.ends_with(".toml") {
            toml::from_str(&read()?).map_err(|e| {
                SegmentCliError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else if f.ends_with(".json") {
            serde_json::from_str(&read()?).map_err(|e| {
                SegmentCliError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else {
            return Err(SegmentCliError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )));
        };
        conf.validate()?;
        Ok(conf)
    }
}

#[cfg(test)]
mod tests {
    use super::SegmentProcessorConfiguration;
    use crate::model::{osm::ElementFilter, SegmentCliError};

    fn write_temp(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).expect("test invariant failed");
        path.to_string_lossy().to_string()
    }

    #[test]
    fn defaults() {
        let conf = SegmentProcessorConfiguration::default();
        assert_eq!(conf.postcode_buffer_meters, 30.0);
        assert_eq!(conf.extent_buffer_meters, 500.0);
        assert_eq!(conf.default_color, "#FF0000");
        assert!(matches!(conf.element_filter, ElementFilter::OsmnxAll));
        assert!(conf.validate().is_ok());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let f = write_temp(
            "segment_processor_partial.toml",
            r##"
postcode_buffer_meters = 50.0
default_color = "#00ff7f"

[element_filter]
type = "osmnx_all_public"
"##,
        );
        let conf = SegmentProcessorConfiguration::try_from(&f).expect("failed to read toml");
        assert_eq!(conf.postcode_buffer_meters, 50.0);
        assert_eq!(conf.default_color, "#00ff7f");
        assert_eq!(conf.extent_buffer_meters, 500.0);
        assert!(matches!(conf.element_filter, ElementFilter::OsmnxAllPublic));
        let _ = std::fs::remove_file(&f);
    }

    #[test]
    fn json_with_highway_tags() {
        let f = write_temp(
            "segment_processor_tags.json",
            r#"{ "element_filter": { "type": "highway_tags", "tags": ["residential", "primary"] }, "parallelize": false }"#,
        );
        let conf = SegmentProcessorConfiguration::try_from(&f).expect("failed to read json");
        assert!(!conf.parallelize);
        match conf.element_filter {
            ElementFilter::HighwayTags { tags } => assert_eq!(tags.len(), 2),
            other => panic!("unexpected filter {other:?}"),
        }
        let _ = std::fs::remove_file(&f);
    }

    #[test]
    fn invalid_color_rejected() {
        let f = write_temp(
            "segment_processor_bad_color.json",
            r#"{ "default_color": "red" }"#,
        );
        match SegmentProcessorConfiguration::try_from(&f) {
            Err(SegmentCliError::ConfigurationError(msg)) => assert!(msg.contains("red")),
            other => panic!("expected ConfigurationError, found {other:?}"),
        }
        let _ = std::fs::remove_file(&f);
    }

    #[test]
    fn unreadable_file_names_path() {
        let f = String::from("/no/such/segment_processor.toml");
        match SegmentProcessorConfiguration::try_from(&f) {
            Err(SegmentCliError::ConfigurationError(msg)) => assert!(msg.contains(&f)),
            other => panic!("expected ConfigurationError, found {other:?}"),
        }
    }

    #[test]
    fn undecodable_json_names_path() {
        let f = write_temp("segment_processor_broken.json", "{ \"parallelize\": ");
        match SegmentProcessorConfiguration::try_from(&f) {
            Err(SegmentCliError::ConfigurationError(msg)) => {
                assert!(msg.contains("failure decoding"));
                assert!(msg.contains(&f));
            }
            other => panic!("expected ConfigurationError, found {other:?}"),
        }
        let _ = std::fs::remove_file(&f);
    }

    #[test]
    fn unsupported_extension_rejected() {
        let f = String::from("config.yaml");
        assert!(SegmentProcessorConfiguration::try_from(&f).is_err());
    }
}
