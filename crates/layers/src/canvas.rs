use geom::{AreaHandle, LabelHandle, LatLng, MarkerHandle, Ring, RouteHandle};
use session::ContributionId;

use crate::style::{AreaStyle, RouteStyle};

/// Presentation boundary implemented by the embedding UI.
///
/// The session core decides *what* exists — areas, markers, labels,
/// routes, popups — and owns the returned handles; the canvas decides how
/// those objects are drawn. Everything rendered is a derived view of core
/// state, never the source of truth.
pub trait MapCanvas {
    /// Renders an isochrone area.
    fn add_area(&mut self, ring: &Ring, style: AreaStyle) -> AreaHandle;
    fn remove_area(&mut self, handle: AreaHandle);

    /// Renders an anchor marker with a popup. The typed contribution id is
    /// passed so the UI can bind its removal affordance directly, instead
    /// of round-tripping an id through generated markup.
    fn add_marker(&mut self, at: LatLng, contribution: ContributionId, popup: &str)
    -> MarkerHandle;
    fn remove_marker(&mut self, handle: MarkerHandle);

    /// Renders a permanent text label at a venue.
    fn add_label(&mut self, at: LatLng, text: &str) -> LabelHandle;
    fn remove_label(&mut self, handle: LabelHandle);

    /// Renders a route line (vertices in `[lng, lat]` wire order) with a
    /// popup describing the driving time.
    fn add_route(&mut self, path: &[[f64; 2]], style: RouteStyle, popup: &str) -> RouteHandle;
    fn remove_route(&mut self, handle: RouteHandle);
}
