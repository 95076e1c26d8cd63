use geom::{AreaHandle, LatLng, MarkerHandle, Ring};

/// Identifies one participant's contribution for the life of the session.
///
/// Ids are assigned monotonically and never reused, so a stored id stays
/// valid (or becomes a recorded no-op) across arbitrary removals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContributionId(pub u64);

/// One participant's anchor point plus the isochrone polygon fetched for it.
///
/// Only the outer ring of the first feature of the fetch response is kept;
/// holes and extra features are intentionally dropped upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub id: ContributionId,
    pub anchor: LatLng,
    pub outer_ring: Ring,
    /// Canvas object for the rendered isochrone area, once rendered.
    pub area: Option<AreaHandle>,
    /// Canvas object for the anchor marker, once rendered.
    pub marker: Option<MarkerHandle>,
}

impl Contribution {
    pub fn new(id: ContributionId, anchor: LatLng, outer_ring: Ring) -> Self {
        Self {
            id,
            anchor,
            outer_ring,
            area: None,
            marker: None,
        }
    }
}
