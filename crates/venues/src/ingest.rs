use formats::{FeatureCollection, Geometry};
use geom::{LatLng, ring};

use crate::venue::{DEFAULT_VENUE_NAME, VenueSet};

/// Builds the candidate-venue set from a static feature collection.
///
/// Point features become venues directly; polygon features are reduced to
/// the vertex centroid of their outer ring. Other geometry kinds are
/// skipped. Features without a usable name get the literal placeholder.
pub fn ingest_venues(set: &mut VenueSet, collection: &FeatureCollection) {
    for feature in &collection.features {
        let name = feature
            .display_name()
            .unwrap_or(DEFAULT_VENUE_NAME)
            .to_string();

        match &feature.geometry {
            Geometry::Point([lng, lat]) => {
                set.push(LatLng::new(*lat, *lng), name);
            }
            Geometry::Polygon(rings) => {
                let Some(outer) = rings.first() else { continue };
                let Some(centroid) = ring::centroid(outer) else {
                    continue;
                };
                set.push(centroid, name);
            }
            _ => {}
        }
    }
}
