use geom::{LatLng, RouteHandle};
use layers::{AreaStyle, MapCanvas, RouteStyle, reconcile_labels};
use routing::{RouteCompletion, RoutePlan, RouteService};
use session::{ClickMode, ContributionId, Event, EventBus, IsochroneSession};
use venues::{VenueSet, membership};

/// Supplies the travel-time budget when a click registers a new isochrone.
///
/// Returns the raw user entry, or `None` when the prompt was cancelled.
/// Validation happens in the engine so a rejected entry provably mutates
/// nothing.
pub trait TravelTimePrompt {
    fn travel_time_minutes(&mut self) -> Option<String>;
}

/// What a single click interaction produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// A contribution was registered and presentation state reconciled.
    IsochroneAdded(ContributionId),
    /// The travel-time entry was cancelled or not a positive integer; no
    /// state was mutated.
    InputRejected,
    /// The isochrone fetch failed; no state was mutated.
    FetchFailed,
    /// Route requests were planned, one per contribution. The caller runs
    /// them (concurrently, in any order) and feeds each completion back
    /// through [`Engine::apply_route_completion`].
    RoutesPlanned(Vec<RoutePlan>),
}

/// Owns the whole meeting-place session: contributions, candidate venues,
/// click mode, and the event record.
///
/// Notes:
/// - All mutation happens on the caller's single event-processing context;
///   the engine holds no locks and spawns nothing. Network fetches are the
///   only suspension points.
/// - Collaborators (canvas, service, prompt) are passed in per call, so
///   the engine itself stays a plain, inspectable state machine.
#[derive(Debug)]
pub struct Engine {
    session: IsochroneSession,
    venues: VenueSet,
    mode: ClickMode,
    events: EventBus,
    /// Counts every registered participant over the session's life; drives
    /// the marker popup text and never decreases on removal.
    participants: u64,
}

impl Engine {
    pub fn new(venues: VenueSet) -> Self {
        Self {
            session: IsochroneSession::new(),
            venues,
            mode: ClickMode::default(),
            events: EventBus::new(),
            participants: 0,
        }
    }

    pub fn mode(&self) -> ClickMode {
        self.mode
    }

    pub fn session(&self) -> &IsochroneSession {
        &self.session
    }

    pub fn venues(&self) -> &VenueSet {
        &self.venues
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Flips the click mode. The single persistent click handler dispatches
    /// on the returned value, so exactly one behavior is active at a time.
    pub fn toggle_mode(&mut self) -> ClickMode {
        self.mode = self.mode.toggled();
        self.events.emit(
            self.session.epoch(),
            "mode",
            format!("click mode is now {:?}", self.mode),
        );
        self.mode
    }

    /// Single persistent click entry point.
    pub async fn handle_click<C: MapCanvas>(
        &mut self,
        at: LatLng,
        service: &dyn RouteService,
        prompt: &mut dyn TravelTimePrompt,
        canvas: &mut C,
    ) -> ClickOutcome {
        match self.mode {
            ClickMode::AddIsochrone => self.add_isochrone_at(at, service, prompt, canvas).await,
            ClickMode::RouteToClick => self.plan_routes_to(at),
        }
    }

    /// Removes a contribution together with its canvas objects.
    ///
    /// Unknown ids are a recorded no-op; nothing is raised to the UI.
    /// Returns `true` if a contribution was removed.
    pub fn remove_contribution<C: MapCanvas>(
        &mut self,
        id: ContributionId,
        canvas: &mut C,
    ) -> bool {
        let Some(removed) = self.session.remove(id) else {
            self.events.emit(
                self.session.epoch(),
                "session",
                format!("remove ignored unknown contribution {}", id.0),
            );
            return false;
        };

        if let Some(handle) = removed.area {
            canvas.remove_area(handle);
        }
        if let Some(handle) = removed.marker {
            canvas.remove_marker(handle);
        }
        self.events.emit(
            self.session.epoch(),
            "session",
            format!("contribution {} removed", id.0),
        );
        self.reconcile(canvas);
        true
    }

    /// Removes every contribution and its canvas objects.
    pub fn clear_contributions<C: MapCanvas>(&mut self, canvas: &mut C) {
        let removed = self.session.clear();
        for contribution in removed {
            if let Some(handle) = contribution.area {
                canvas.remove_area(handle);
            }
            if let Some(handle) = contribution.marker {
                canvas.remove_marker(handle);
            }
        }
        self.events
            .emit(self.session.epoch(), "session", "all contributions cleared");
        self.reconcile(canvas);
    }

    /// Applies one route completion from the caller's executor.
    ///
    /// Completions tagged with a superseded epoch are discarded: the
    /// contribution set has changed since dispatch, so the response
    /// describes a session state that no longer exists. A failed fetch is
    /// contained to its own request; other in-flight requests and all
    /// session state are unaffected.
    pub fn apply_route_completion<C: MapCanvas>(
        &mut self,
        completion: RouteCompletion,
        canvas: &mut C,
    ) -> Option<RouteHandle> {
        let plan = completion.plan;
        if !routing::is_current(&plan, self.session.epoch()) {
            self.events.emit(
                self.session.epoch(),
                "routes",
                format!(
                    "discarded stale route response for contribution {}",
                    plan.contribution.0
                ),
            );
            return None;
        }

        match completion.result {
            Ok(collection) => {
                let Some(route) = routing::parse_route(&collection) else {
                    self.events.emit(
                        self.session.epoch(),
                        "fetch",
                        format!(
                            "route response for contribution {} had no line feature",
                            plan.contribution.0
                        ),
                    );
                    return None;
                };
                let popup = routing::route_popup(route.duration_seconds);
                let handle = canvas.add_route(
                    &route.path,
                    RouteStyle::for_index(plan.palette_index),
                    &popup,
                );
                self.events.emit(
                    self.session.epoch(),
                    "routes",
                    format!("route rendered for contribution {}", plan.contribution.0),
                );
                Some(handle)
            }
            Err(err) => {
                self.events.emit(
                    self.session.epoch(),
                    "fetch",
                    format!(
                        "route fetch failed for contribution {}: {err}",
                        plan.contribution.0
                    ),
                );
                None
            }
        }
    }

    async fn add_isochrone_at<C: MapCanvas>(
        &mut self,
        at: LatLng,
        service: &dyn RouteService,
        prompt: &mut dyn TravelTimePrompt,
        canvas: &mut C,
    ) -> ClickOutcome {
        let Some(entry) = prompt.travel_time_minutes() else {
            self.events.emit(
                self.session.epoch(),
                "input",
                "travel-time prompt cancelled",
            );
            return ClickOutcome::InputRejected;
        };
        let minutes: u32 = match entry.trim().parse() {
            Ok(m) if m > 0 => m,
            _ => {
                self.events.emit(
                    self.session.epoch(),
                    "input",
                    format!("invalid travel time {entry:?}"),
                );
                return ClickOutcome::InputRejected;
            }
        };
        let range_seconds = minutes.saturating_mul(60);

        let collection = match service.fetch_isochrone(at, range_seconds).await {
            Ok(collection) => collection,
            Err(err) => {
                self.events.emit(
                    self.session.epoch(),
                    "fetch",
                    format!("isochrone fetch failed: {err}"),
                );
                return ClickOutcome::FetchFailed;
            }
        };
        let Some(outer_ring) = routing::parse_isochrone(&collection) else {
            self.events.emit(
                self.session.epoch(),
                "fetch",
                "isochrone response had no polygon feature",
            );
            return ClickOutcome::FetchFailed;
        };

        self.participants += 1;
        let popup = if self.participants == 1 {
            "You are here!".to_string()
        } else {
            format!("Friend {} is here", self.participants - 1)
        };

        // Render before the ring moves into the session; the area handle is
        // attached right after the id exists.
        let index = self.session.len();
        let area = canvas.add_area(&outer_ring, AreaStyle::isochrone(index));
        let id = self.session.add(at, outer_ring);
        let marker = canvas.add_marker(at, id, &popup);
        if let Some(contribution) = self.session.get_mut(id) {
            contribution.area = Some(area);
            contribution.marker = Some(marker);
        }

        self.events.emit(
            self.session.epoch(),
            "session",
            format!("contribution {} added ({range_seconds}s budget)", id.0),
        );
        self.reconcile(canvas);
        ClickOutcome::IsochroneAdded(id)
    }

    fn plan_routes_to(&mut self, destination: LatLng) -> ClickOutcome {
        let plans = routing::dispatch(self.session.list(), destination, self.session.epoch());
        self.events.emit(
            self.session.epoch(),
            "routes",
            format!("dispatching {} route requests", plans.len()),
        );
        ClickOutcome::RoutesPlanned(plans)
    }

    /// Recompute membership and reconcile labels. Runs after every session
    /// mutation; stale "shown" state never survives a removal.
    fn reconcile<C: MapCanvas>(&mut self, canvas: &mut C) {
        let membership = membership::recompute(&self.venues, self.session.list());
        reconcile_labels(&mut self.venues, &membership, canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::{ClickOutcome, Engine, TravelTimePrompt};
    use formats::{Feature, FeatureCollection, Geometry, Properties, Summary};
    use geom::{AreaHandle, LabelHandle, LatLng, MarkerHandle, RouteHandle};
    use layers::{AreaStyle, MapCanvas, RouteStyle};
    use pretty_assertions::assert_eq;
    use routing::{BoxFuture, RouteCompletion, RouteService, ServiceError};
    use session::{ClickMode, ContributionId};
    use std::collections::BTreeSet;
    use std::sync::Mutex;
    use venues::{Presentation, VenueSet};

    /// Canvas fake tracking live objects by kind.
    #[derive(Default)]
    struct RecordingCanvas {
        next: u64,
        live_areas: BTreeSet<u64>,
        live_markers: BTreeSet<u64>,
        live_labels: BTreeSet<u64>,
        live_routes: BTreeSet<u64>,
        labels_created: usize,
        route_popups: Vec<String>,
        route_colors: Vec<[f32; 4]>,
    }

    impl RecordingCanvas {
        fn next(&mut self) -> u64 {
            self.next += 1;
            self.next
        }
    }

    impl MapCanvas for RecordingCanvas {
        fn add_area(&mut self, _ring: &geom::Ring, _style: AreaStyle) -> AreaHandle {
            let h = self.next();
            self.live_areas.insert(h);
            AreaHandle(h)
        }

        fn remove_area(&mut self, handle: AreaHandle) {
            assert!(self.live_areas.remove(&handle.0));
        }

        fn add_marker(
            &mut self,
            _at: LatLng,
            _contribution: ContributionId,
            _popup: &str,
        ) -> MarkerHandle {
            let h = self.next();
            self.live_markers.insert(h);
            MarkerHandle(h)
        }

        fn remove_marker(&mut self, handle: MarkerHandle) {
            assert!(self.live_markers.remove(&handle.0));
        }

        fn add_label(&mut self, _at: LatLng, _text: &str) -> LabelHandle {
            let h = self.next();
            self.labels_created += 1;
            self.live_labels.insert(h);
            LabelHandle(h)
        }

        fn remove_label(&mut self, handle: LabelHandle) {
            assert!(self.live_labels.remove(&handle.0));
        }

        fn add_route(
            &mut self,
            _path: &[[f64; 2]],
            style: RouteStyle,
            popup: &str,
        ) -> RouteHandle {
            let h = self.next();
            self.live_routes.insert(h);
            self.route_popups.push(popup.to_string());
            self.route_colors.push(style.color);
            RouteHandle(h)
        }

        fn remove_route(&mut self, handle: RouteHandle) {
            assert!(self.live_routes.remove(&handle.0));
        }
    }

    /// Service fake replaying queued isochrone responses.
    #[derive(Default)]
    struct FakeService {
        isochrones: Mutex<Vec<Result<FeatureCollection, ServiceError>>>,
    }

    impl FakeService {
        fn queue_square(&self, min: f64, max: f64) {
            self.isochrones
                .lock()
                .unwrap()
                .push(Ok(square_response(min, max)));
        }

        fn queue_error(&self, message: &str) {
            self.isochrones
                .lock()
                .unwrap()
                .push(Err(ServiceError::new(message)));
        }
    }

    impl RouteService for FakeService {
        fn fetch_isochrone(
            &self,
            _anchor: LatLng,
            _range_seconds: u32,
        ) -> BoxFuture<'_, Result<FeatureCollection, ServiceError>> {
            let next = {
                let mut queued = self.isochrones.lock().unwrap();
                if queued.is_empty() {
                    Err(ServiceError::new("no queued response"))
                } else {
                    queued.remove(0)
                }
            };
            Box::pin(async move { next })
        }

        fn fetch_route(
            &self,
            _start: LatLng,
            _destination: LatLng,
        ) -> BoxFuture<'_, Result<FeatureCollection, ServiceError>> {
            Box::pin(async move { Ok(line_response(120.0)) })
        }
    }

    struct FixedPrompt(Option<&'static str>);

    impl TravelTimePrompt for FixedPrompt {
        fn travel_time_minutes(&mut self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn square_response(min: f64, max: f64) -> FeatureCollection {
        FeatureCollection {
            features: vec![Feature {
                geometry: Geometry::Polygon(vec![vec![
                    [min, min],
                    [max, min],
                    [max, max],
                    [min, max],
                ]]),
                properties: None,
            }],
        }
    }

    fn line_response(duration: f64) -> FeatureCollection {
        FeatureCollection {
            features: vec![Feature {
                geometry: Geometry::LineString(vec![[0.0, 0.0], [1.0, 1.0]]),
                properties: Some(Properties {
                    summary: Some(Summary { duration }),
                    ..Properties::default()
                }),
            }],
        }
    }

    fn engine_with_venue_at(lat: f64, lng: f64) -> Engine {
        let mut venues = VenueSet::new();
        venues.push(LatLng::new(lat, lng), "P".into());
        Engine::new(venues)
    }

    fn presentation(engine: &Engine) -> Presentation {
        engine.venues().iter().next().unwrap().presentation
    }

    async fn add_square(
        engine: &mut Engine,
        service: &FakeService,
        canvas: &mut RecordingCanvas,
        min: f64,
        max: f64,
    ) -> ClickOutcome {
        service.queue_square(min, max);
        engine
            .handle_click(
                LatLng::new(0.0, 0.0),
                service,
                &mut FixedPrompt(Some("10")),
                canvas,
            )
            .await
    }

    #[tokio::test]
    async fn single_covering_contribution_keeps_venues_hidden() {
        let mut engine = engine_with_venue_at(0.5, 0.5);
        let service = FakeService::default();
        let mut canvas = RecordingCanvas::default();

        let outcome = add_square(&mut engine, &service, &mut canvas, -10.0, 10.0).await;
        assert!(matches!(outcome, ClickOutcome::IsochroneAdded(_)));
        assert_eq!(presentation(&engine), Presentation::Hidden);
        assert!(canvas.live_labels.is_empty());
        assert_eq!(canvas.live_areas.len(), 1);
        assert_eq!(canvas.live_markers.len(), 1);
    }

    #[tokio::test]
    async fn venue_inside_both_shows_then_third_excluding_hides() {
        let mut engine = engine_with_venue_at(0.5, 0.5);
        let service = FakeService::default();
        let mut canvas = RecordingCanvas::default();

        add_square(&mut engine, &service, &mut canvas, 0.0, 1.0).await;
        add_square(&mut engine, &service, &mut canvas, -1.0, 2.0).await;
        assert_eq!(presentation(&engine), Presentation::Shown);
        assert_eq!(canvas.live_labels.len(), 1);

        // A third isochrone that does not cover the venue hides it again.
        add_square(&mut engine, &service, &mut canvas, 5.0, 6.0).await;
        assert_eq!(presentation(&engine), Presentation::Hidden);
        assert!(canvas.live_labels.is_empty());
    }

    #[tokio::test]
    async fn removal_below_two_hides_and_releases_canvas_objects() {
        let mut engine = engine_with_venue_at(0.5, 0.5);
        let service = FakeService::default();
        let mut canvas = RecordingCanvas::default();

        let ClickOutcome::IsochroneAdded(first) =
            add_square(&mut engine, &service, &mut canvas, 0.0, 1.0).await
        else {
            panic!("expected contribution");
        };
        add_square(&mut engine, &service, &mut canvas, -1.0, 2.0).await;
        assert_eq!(presentation(&engine), Presentation::Shown);

        assert!(engine.remove_contribution(first, &mut canvas));
        assert_eq!(presentation(&engine), Presentation::Hidden);
        assert!(canvas.live_labels.is_empty());
        assert_eq!(canvas.live_areas.len(), 1);
        assert_eq!(canvas.live_markers.len(), 1);
    }

    #[tokio::test]
    async fn invalid_or_cancelled_entry_mutates_nothing() {
        let mut engine = engine_with_venue_at(0.5, 0.5);
        let service = FakeService::default();
        let mut canvas = RecordingCanvas::default();

        for entry in [None, Some("ten"), Some("0"), Some("-3")] {
            let outcome = engine
                .handle_click(
                    LatLng::new(0.0, 0.0),
                    &service,
                    &mut FixedPrompt(entry),
                    &mut canvas,
                )
                .await;
            assert_eq!(outcome, ClickOutcome::InputRejected);
        }
        assert!(engine.session().is_empty());
        assert_eq!(canvas.live_areas.len(), 0);
    }

    #[tokio::test]
    async fn fetch_failure_mutates_nothing() {
        let mut engine = engine_with_venue_at(0.5, 0.5);
        let service = FakeService::default();
        let mut canvas = RecordingCanvas::default();

        service.queue_error("upstream said 502");
        let outcome = engine
            .handle_click(
                LatLng::new(0.0, 0.0),
                &service,
                &mut FixedPrompt(Some("10")),
                &mut canvas,
            )
            .await;
        assert_eq!(outcome, ClickOutcome::FetchFailed);
        assert!(engine.session().is_empty());
        assert_eq!(engine.session().epoch(), 0);
    }

    #[tokio::test]
    async fn toggling_twice_restores_add_behavior() {
        let mut engine = engine_with_venue_at(0.5, 0.5);
        assert_eq!(engine.mode(), ClickMode::AddIsochrone);
        assert_eq!(engine.toggle_mode(), ClickMode::RouteToClick);
        assert_eq!(engine.toggle_mode(), ClickMode::AddIsochrone);
    }

    #[tokio::test]
    async fn route_click_plans_one_request_per_contribution() {
        let mut engine = engine_with_venue_at(0.5, 0.5);
        let service = FakeService::default();
        let mut canvas = RecordingCanvas::default();

        for _ in 0..3 {
            add_square(&mut engine, &service, &mut canvas, -10.0, 10.0).await;
        }
        engine.toggle_mode();

        let outcome = engine
            .handle_click(
                LatLng::new(0.2, 0.2),
                &service,
                &mut FixedPrompt(None),
                &mut canvas,
            )
            .await;
        let ClickOutcome::RoutesPlanned(plans) = outcome else {
            panic!("expected route plans");
        };
        assert_eq!(plans.len(), 3);
        let indices: Vec<_> = plans.iter().map(|p| p.palette_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn failed_route_is_contained_while_others_render() {
        let mut engine = engine_with_venue_at(0.5, 0.5);
        let service = FakeService::default();
        let mut canvas = RecordingCanvas::default();

        for _ in 0..3 {
            add_square(&mut engine, &service, &mut canvas, -10.0, 10.0).await;
        }
        engine.toggle_mode();
        let ClickOutcome::RoutesPlanned(plans) = engine
            .handle_click(
                LatLng::new(0.2, 0.2),
                &service,
                &mut FixedPrompt(None),
                &mut canvas,
            )
            .await
        else {
            panic!("expected route plans");
        };

        // Completions arrive out of dispatch order; the middle one failed.
        let [a, b, c] = <[_; 3]>::try_from(plans).unwrap();
        engine.apply_route_completion(
            RouteCompletion {
                plan: c,
                result: Ok(line_response(90.0)),
            },
            &mut canvas,
        );
        engine.apply_route_completion(
            RouteCompletion {
                plan: b,
                result: Err(ServiceError::new("upstream said 500")),
            },
            &mut canvas,
        );
        engine.apply_route_completion(
            RouteCompletion {
                plan: a,
                result: Ok(line_response(847.2)),
            },
            &mut canvas,
        );

        assert_eq!(canvas.live_routes.len(), 2);
        assert_eq!(
            canvas.route_popups,
            vec![
                "Driving time: 2 minutes.".to_string(),
                "Driving time: 14 minutes.".to_string(),
            ]
        );
        // Colors follow each plan's own palette index, not arrival order.
        assert_eq!(canvas.route_colors[0], RouteStyle::for_index(2).color);
        assert_eq!(canvas.route_colors[1], RouteStyle::for_index(0).color);
    }

    #[tokio::test]
    async fn stale_epoch_completion_is_discarded() {
        let mut engine = engine_with_venue_at(0.5, 0.5);
        let service = FakeService::default();
        let mut canvas = RecordingCanvas::default();

        let ClickOutcome::IsochroneAdded(first) =
            add_square(&mut engine, &service, &mut canvas, -10.0, 10.0).await
        else {
            panic!("expected contribution");
        };
        add_square(&mut engine, &service, &mut canvas, -10.0, 10.0).await;
        engine.toggle_mode();

        let ClickOutcome::RoutesPlanned(plans) = engine
            .handle_click(
                LatLng::new(0.2, 0.2),
                &service,
                &mut FixedPrompt(None),
                &mut canvas,
            )
            .await
        else {
            panic!("expected route plans");
        };

        // The contribution set changes while the requests are in flight.
        engine.remove_contribution(first, &mut canvas);

        for plan in plans {
            let rendered = engine.apply_route_completion(
                RouteCompletion {
                    plan,
                    result: Ok(line_response(60.0)),
                },
                &mut canvas,
            );
            assert!(rendered.is_none());
        }
        assert!(canvas.live_routes.is_empty());
    }

    #[tokio::test]
    async fn clear_releases_everything_and_hides_venues() {
        let mut engine = engine_with_venue_at(0.5, 0.5);
        let service = FakeService::default();
        let mut canvas = RecordingCanvas::default();

        add_square(&mut engine, &service, &mut canvas, 0.0, 1.0).await;
        add_square(&mut engine, &service, &mut canvas, -1.0, 2.0).await;
        assert_eq!(presentation(&engine), Presentation::Shown);

        engine.clear_contributions(&mut canvas);
        assert!(engine.session().is_empty());
        assert!(canvas.live_areas.is_empty());
        assert!(canvas.live_markers.is_empty());
        assert!(canvas.live_labels.is_empty());
    }

    #[tokio::test]
    async fn removing_unknown_id_is_a_recorded_noop() {
        let mut engine = engine_with_venue_at(0.5, 0.5);
        let mut canvas = RecordingCanvas::default();

        assert!(!engine.remove_contribution(ContributionId(42), &mut canvas));
        let events = engine.drain_events();
        assert!(
            events
                .iter()
                .any(|e| e.kind == "session" && e.message.contains("unknown contribution 42"))
        );
    }
}
