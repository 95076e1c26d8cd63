use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use engine::{ClickOutcome, Engine, TravelTimePrompt};
use formats::FeatureCollection;
use geom::LatLng;
use routing::{RouteCompletion, RouteService};
use session::ContributionId;
use venues::{ingest_venues, Presentation, VenueSet};

mod canvas;
mod http;

use canvas::TermCanvas;
use http::HttpRouteService;

#[derive(Parser, Debug)]
#[command(author, version, about = "Find meeting places reachable by every participant")]
struct Args {
    /// GeoJSON file with candidate venues (point and polygon features)
    #[arg(long, default_value = "data/meeting_places.geojson")]
    venues: String,

    /// Base URL of the isochrone/route service
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    service_url: String,

    /// Travel-time budget in minutes used when a click omits one
    #[arg(long, default_value_t = 10)]
    default_minutes: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

/// Travel-time entry carried by the click command itself: the console has
/// no modal prompt, so the optional third token plays that role, and `-`
/// stands for a cancelled prompt.
struct CommandPrompt {
    entry: Option<String>,
}

impl TravelTimePrompt for CommandPrompt {
    fn travel_time_minutes(&mut self) -> Option<String> {
        self.entry.take()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let text = tokio::fs::read_to_string(&args.venues).await?;
    let collection: FeatureCollection = serde_json::from_str(&text)?;
    let mut venue_set = VenueSet::new();
    ingest_venues(&mut venue_set, &collection);
    info!(
        "loaded {} candidate venues from {}",
        venue_set.len(),
        args.venues
    );

    let service = Arc::new(HttpRouteService::new(
        &args.service_url,
        Duration::from_secs(args.timeout_secs),
    )?);
    let mut engine = Engine::new(venue_set);
    let mut canvas = TermCanvas::default();

    let (tx, mut rx) = mpsc::channel::<RouteCompletion>(32);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("commands: click <lat> <lng> [minutes|-] | mode | remove <id> | clear | list | quit");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(line.trim(), &args, &mut engine, &mut canvas, &service, &tx).await {
                    break;
                }
            }
            Some(completion) = rx.recv() => {
                engine.apply_route_completion(completion, &mut canvas);
                log_events(&mut engine);
            }
        }
    }

    Ok(())
}

/// Returns `false` when the session should end.
async fn handle_line(
    line: &str,
    args: &Args,
    engine: &mut Engine,
    canvas: &mut TermCanvas,
    service: &Arc<HttpRouteService>,
    tx: &mpsc::Sender<RouteCompletion>,
) -> bool {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => {}
        Some("quit") | Some("exit") => return false,
        Some("mode") => {
            let mode = engine.toggle_mode();
            println!("mode: {mode:?}");
        }
        Some("click") => {
            let (Some(lat), Some(lng)) = (parse_f64(parts.next()), parse_f64(parts.next())) else {
                println!("usage: click <lat> <lng> [minutes|-]");
                return true;
            };
            let entry = match parts.next() {
                Some("-") => None,
                Some(token) => Some(token.to_string()),
                None => Some(args.default_minutes.to_string()),
            };
            let mut prompt = CommandPrompt { entry };
            let outcome = engine
                .handle_click(LatLng::new(lat, lng), service.as_ref(), &mut prompt, canvas)
                .await;
            match outcome {
                ClickOutcome::IsochroneAdded(id) => println!("contribution {} added", id.0),
                ClickOutcome::InputRejected => println!("invalid travel time; nothing changed"),
                ClickOutcome::FetchFailed => println!("isochrone fetch failed; nothing changed"),
                ClickOutcome::RoutesPlanned(plans) => {
                    println!("dispatching {} route requests", plans.len());
                    for plan in plans {
                        let service = Arc::clone(service);
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let result = service.fetch_route(plan.anchor, plan.destination).await;
                            let _ = tx.send(RouteCompletion { plan, result }).await;
                        });
                    }
                }
            }
        }
        Some("remove") => {
            let Some(id) = parts.next().and_then(|t| t.parse::<u64>().ok()) else {
                println!("usage: remove <id>");
                return true;
            };
            engine.remove_contribution(ContributionId(id), canvas);
        }
        Some("clear") => engine.clear_contributions(canvas),
        Some("list") => print_status(engine, canvas),
        Some(other) => println!("unknown command: {other}"),
    }
    log_events(engine);
    true
}

fn parse_f64(token: Option<&str>) -> Option<f64> {
    token?.parse().ok()
}

fn print_status(engine: &Engine, canvas: &TermCanvas) {
    println!("mode: {:?}", engine.mode());
    for c in engine.session().list() {
        println!(
            "  contribution {} anchored at {:.5},{:.5}",
            c.id.0, c.anchor.lat, c.anchor.lng
        );
    }
    let shown: Vec<&str> = engine
        .venues()
        .iter()
        .filter(|v| v.presentation == Presentation::Shown)
        .map(|v| v.name.as_str())
        .collect();
    println!("  meeting places ({}): {}", shown.len(), shown.join(", "));
    println!(
        "  canvas: {} areas, {} markers, {} labels, {} routes",
        canvas.live_areas, canvas.live_markers, canvas.live_labels, canvas.live_routes
    );
}

fn log_events(engine: &mut Engine) {
    for event in engine.drain_events() {
        let epoch = event.epoch;
        let kind = event.kind;
        let message = event.message;
        match kind {
            "fetch" | "input" => warn!(epoch, kind, "{message}"),
            _ => info!(epoch, kind, "{message}"),
        }
    }
}
