use std::collections::BTreeMap;

use venues::{Presentation, VenueId, VenueSet};

use crate::canvas::MapCanvas;

/// Applies a fresh membership map to venue labels.
///
/// Transition table (previous → new):
/// - hidden → hidden: no-op
/// - hidden → shown: create one label at the venue with its display name
/// - shown → shown: no-op; the existing label is kept, never recreated
/// - shown → hidden: destroy the label handle
///
/// Each venue's `presentation` field is the persisted baseline for the
/// next comparison, so this must run after every membership recompute.
/// A venue can never hold two live label handles: the handle slot is
/// taken before the venue could transition back to shown.
pub fn reconcile_labels<C: MapCanvas>(
    venues: &mut VenueSet,
    membership: &BTreeMap<VenueId, bool>,
    canvas: &mut C,
) {
    for venue in venues.iter_mut() {
        let shown = membership.get(&venue.id).copied().unwrap_or(false);
        match (venue.presentation, shown) {
            (Presentation::Hidden, true) => {
                venue.label = Some(canvas.add_label(venue.position, &venue.name));
                venue.presentation = Presentation::Shown;
            }
            (Presentation::Shown, false) => {
                if let Some(handle) = venue.label.take() {
                    canvas.remove_label(handle);
                }
                venue.presentation = Presentation::Hidden;
            }
            _ => {}
        }
    }
}
