//! Serde data model for the GeoJSON-shaped payloads this system exchanges:
//! isochrone and route responses from the remote service, and the static
//! venue source file.
//!
//! This is a deliberately narrow subset. The service is a black box that
//! happens to speak GeoJSON, so only the fields the session core reads are
//! modeled here; unknown fields are ignored on input.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Outer ring of the first feature, if that feature is a polygon.
    ///
    /// Only the first feature and its first ring are inspected. Holes and
    /// additional disjoint features are intentionally not honored; this
    /// matches the narrowed shape the session core stores and tests.
    pub fn first_outer_ring(&self) -> Option<&[[f64; 2]]> {
        match &self.features.first()?.geometry {
            Geometry::Polygon(rings) => rings.first().map(Vec::as_slice),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Option<Properties>,
}

impl Feature {
    /// Display name: the first property whose key is case-insensitively
    /// `name` and whose value is a non-empty string.
    pub fn display_name(&self) -> Option<&str> {
        self.properties.as_ref()?.display_name()
    }

    /// Route duration in seconds, from `properties.summary.duration`.
    pub fn duration_seconds(&self) -> Option<f64> {
        Some(self.properties.as_ref()?.summary.as_ref()?.duration)
    }
}

/// Geometry subset. All standard kinds parse so a mixed source file never
/// fails wholesale; consumers pick the kinds they understand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point([f64; 2]),
    MultiPoint(Vec<[f64; 2]>),
    LineString(Vec<[f64; 2]>),
    MultiLineString(Vec<Vec<[f64; 2]>>),
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Properties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Properties {
    pub fn display_name(&self) -> Option<&str> {
        self.extra
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("name"))
            .and_then(|(_, value)| value.as_str())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Summary block carried by route features.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    /// Travel time in seconds.
    pub duration: f64,
}
