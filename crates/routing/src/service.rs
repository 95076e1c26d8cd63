use std::future::Future;
use std::pin::Pin;

use formats::FeatureCollection;
use geom::LatLng;

/// Error type for service operations.
#[derive(Debug)]
pub struct ServiceError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Remote isochrone/route computation service.
///
/// Implementations must be `Send + Sync` for use across async tasks;
/// methods return boxed futures for dyn-compatibility.
///
/// Notes:
/// - Non-2xx responses are reported as errors; the session core treats
///   every error as a contained fetch failure for that one operation.
/// - Implementations should impose a finite request timeout so a dead
///   upstream cannot leave a request pending forever.
pub trait RouteService: Send + Sync {
    /// Fetches the reachable-area polygon around `anchor` for a travel
    /// time budget in seconds.
    fn fetch_isochrone(
        &self,
        anchor: LatLng,
        range_seconds: u32,
    ) -> BoxFuture<'_, Result<FeatureCollection, ServiceError>>;

    /// Fetches a route from `start` to `destination`.
    fn fetch_route(
        &self,
        start: LatLng,
        destination: LatLng,
    ) -> BoxFuture<'_, Result<FeatureCollection, ServiceError>>;
}
