use geom::{AreaHandle, LabelHandle, LatLng, MarkerHandle, Ring, RouteHandle};
use layers::{AreaStyle, MapCanvas, RouteStyle};
use session::ContributionId;
use tracing::info;

/// Text-mode canvas: every render action becomes a log line. Handles are
/// sequential, and live object counts back the status display.
#[derive(Debug, Default)]
pub struct TermCanvas {
    next: u64,
    pub live_areas: usize,
    pub live_markers: usize,
    pub live_labels: usize,
    pub live_routes: usize,
}

impl TermCanvas {
    fn next_handle(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

impl MapCanvas for TermCanvas {
    fn add_area(&mut self, ring: &Ring, style: AreaStyle) -> AreaHandle {
        let h = self.next_handle();
        self.live_areas += 1;
        info!(
            "area a{h} rendered: {} vertices, color {:?}",
            ring.len(),
            style.color
        );
        AreaHandle(h)
    }

    fn remove_area(&mut self, handle: AreaHandle) {
        self.live_areas = self.live_areas.saturating_sub(1);
        info!("area a{} removed", handle.0);
    }

    fn add_marker(
        &mut self,
        at: LatLng,
        contribution: ContributionId,
        popup: &str,
    ) -> MarkerHandle {
        let h = self.next_handle();
        self.live_markers += 1;
        info!(
            "marker m{h} at {:.5},{:.5}: \"{popup}\" [remove {}]",
            at.lat, at.lng, contribution.0
        );
        MarkerHandle(h)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.live_markers = self.live_markers.saturating_sub(1);
        info!("marker m{} removed", handle.0);
    }

    fn add_label(&mut self, at: LatLng, text: &str) -> LabelHandle {
        let h = self.next_handle();
        self.live_labels += 1;
        info!("label l{h} at {:.5},{:.5}: \"{text}\"", at.lat, at.lng);
        LabelHandle(h)
    }

    fn remove_label(&mut self, handle: LabelHandle) {
        self.live_labels = self.live_labels.saturating_sub(1);
        info!("label l{} removed", handle.0);
    }

    fn add_route(&mut self, path: &[[f64; 2]], style: RouteStyle, popup: &str) -> RouteHandle {
        let h = self.next_handle();
        self.live_routes += 1;
        info!(
            "route r{h} rendered: {} vertices, color {:?}, \"{popup}\"",
            path.len(),
            style.color
        );
        RouteHandle(h)
    }

    fn remove_route(&mut self, handle: RouteHandle) {
        self.live_routes = self.live_routes.saturating_sub(1);
        info!("route r{} removed", handle.0);
    }
}
