use formats::FeatureCollection;
use geom::LatLng;
use session::{Contribution, ContributionId};

use crate::service::ServiceError;

/// One planned route fetch from a contribution anchor to a destination.
///
/// The plan captures everything its completion needs — the typed
/// contribution identity, the palette position, and the epoch — so a late
/// response never has to be correlated back through rendered UI state.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub contribution: ContributionId,
    pub anchor: LatLng,
    pub destination: LatLng,
    /// Insertion index at dispatch time; selects the palette color.
    pub palette_index: usize,
    /// Session epoch at dispatch time. Completions carrying an older epoch
    /// than the session's current one are discarded instead of rendered.
    pub epoch: u64,
}

/// Plans one route request per contribution toward `destination`.
///
/// Ordering contract:
/// - Plans come out in insertion order with palette indices `0..n` by
///   current position (not by id), so removed-then-re-added contributions
///   keep cycling colors predictably.
pub fn dispatch(contributions: &[Contribution], destination: LatLng, epoch: u64) -> Vec<RoutePlan> {
    contributions
        .iter()
        .enumerate()
        .map(|(index, c)| RoutePlan {
            contribution: c.id,
            anchor: c.anchor,
            destination,
            palette_index: index,
            epoch,
        })
        .collect()
}

/// Outcome of one route fetch, delivered back onto the event-processing
/// context. Requests run concurrently and may complete in any order;
/// each completion is self-describing, so arrival order never matters.
#[derive(Debug)]
pub struct RouteCompletion {
    pub plan: RoutePlan,
    pub result: Result<FeatureCollection, ServiceError>,
}

/// Epoch gate: `true` when the plan still describes the current
/// contribution set.
pub fn is_current(plan: &RoutePlan, session_epoch: u64) -> bool {
    plan.epoch == session_epoch
}

/// Rounds a duration in seconds to whole minutes for display.
pub fn duration_minutes(seconds: f64) -> i64 {
    (seconds / 60.0).round() as i64
}

pub fn route_popup(duration_seconds: f64) -> String {
    format!("Driving time: {} minutes.", duration_minutes(duration_seconds))
}
