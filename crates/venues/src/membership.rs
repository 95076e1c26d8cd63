use std::collections::BTreeMap;

use session::Contribution;

use crate::venue::{VenueId, VenueSet};

/// Minimum number of contributions before any venue can qualify: a single
/// isochrone does not define a meeting region.
pub const MIN_CONTRIBUTIONS: usize = 2;

/// Recomputes per-venue membership against the current contribution set.
///
/// Membership is the conjunction over all contributions of an even-odd
/// point-in-ring test; evaluation order does not affect the result, and
/// the scan short-circuits on the first miss.
///
/// Notes:
/// - Only each contribution's stored outer ring is tested. Holes and
///   extra features from the upstream response are intentionally ignored;
///   this is a narrowing assumption, not an oversight.
/// - This is a full O(contributions × venues) re-scan per call. Counts in
///   this domain stay small, so no incremental index is kept.
pub fn recompute(venues: &VenueSet, contributions: &[Contribution]) -> BTreeMap<VenueId, bool> {
    let enough = contributions.len() >= MIN_CONTRIBUTIONS;

    let mut out = BTreeMap::new();
    for venue in venues.iter() {
        let inside = enough
            && contributions
                .iter()
                .all(|c| c.outer_ring.contains(venue.position));
        out.insert(venue.id, inside);
    }
    out
}
