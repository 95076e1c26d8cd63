//! Wire format for the remote isochrone/route service.
//!
//! The service speaks GeoJSON feature collections over two endpoints:
//! - `GET {base}/route?mode=isochrone&start={lat},{lng}&range={seconds}`
//!   returns a collection whose first feature carries the reachable-area
//!   polygon.
//! - `POST {base}/route` with the JSON body below returns a collection
//!   whose first feature carries the route line and
//!   `properties.summary.duration` in seconds.
//!
//! Non-2xx responses are fetch failures; the transport layer maps them to
//! `ServiceError`.

use formats::{FeatureCollection, Geometry};
use geom::{LatLng, Ring};
use serde::{Deserialize, Serialize};

/// JSON body of a route request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteRequestBody {
    pub mode: String,
    /// Start and destination in `[lng, lat]` wire order.
    pub coordinates: [[f64; 2]; 2],
}

impl RouteRequestBody {
    pub fn new(start: LatLng, destination: LatLng) -> Self {
        Self {
            mode: "route".to_string(),
            coordinates: [start.lng_lat(), destination.lng_lat()],
        }
    }
}

/// Query path for an isochrone request, relative to the service base URL.
pub fn isochrone_query(anchor: LatLng, range_seconds: u32) -> String {
    format!(
        "route?mode=isochrone&start={},{}&range={}",
        anchor.lat, anchor.lng, range_seconds
    )
}

/// Extracts the stored isochrone shape from a service response: the outer
/// ring of the first feature. Holes and additional features are dropped;
/// the upstream has never been observed to return them and the session
/// core does not model them.
pub fn parse_isochrone(collection: &FeatureCollection) -> Option<Ring> {
    let outer = collection.first_outer_ring()?;
    if outer.len() < 3 {
        return None;
    }
    Some(Ring::new(outer.to_vec()))
}

/// Route line plus its travel time, from the first feature of a response.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    /// Vertices in `[lng, lat]` wire order.
    pub path: Vec<[f64; 2]>,
    pub duration_seconds: f64,
}

pub fn parse_route(collection: &FeatureCollection) -> Option<RouteGeometry> {
    let feature = collection.features.first()?;
    let Geometry::LineString(path) = &feature.geometry else {
        return None;
    };
    let duration_seconds = feature.duration_seconds()?;
    Some(RouteGeometry {
        path: path.clone(),
        duration_seconds,
    })
}
