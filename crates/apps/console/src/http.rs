use std::time::Duration;

use formats::FeatureCollection;
use geom::LatLng;
use routing::{isochrone_query, BoxFuture, RouteRequestBody, RouteService, ServiceError};

/// reqwest-backed client for the isochrone/route service.
///
/// Non-2xx responses are reported as errors. A finite request timeout is
/// imposed so a dead upstream cannot leave a request pending forever.
#[derive(Debug, Clone)]
pub struct HttpRouteService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRouteService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::with_source("Failed to build HTTP client", e))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn decode(
        response: reqwest::Response,
        url: &str,
    ) -> Result<FeatureCollection, ServiceError> {
        if !response.status().is_success() {
            return Err(ServiceError::new(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        response
            .json::<FeatureCollection>()
            .await
            .map_err(|e| ServiceError::with_source("Failed to decode response body", e))
    }
}

impl RouteService for HttpRouteService {
    fn fetch_isochrone(
        &self,
        anchor: LatLng,
        range_seconds: u32,
    ) -> BoxFuture<'_, Result<FeatureCollection, ServiceError>> {
        let url = format!(
            "{}/{}",
            self.base_url,
            isochrone_query(anchor, range_seconds)
        );
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| ServiceError::with_source(format!("Request to {url} failed"), e))?;
            Self::decode(response, &url).await
        })
    }

    fn fetch_route(
        &self,
        start: LatLng,
        destination: LatLng,
    ) -> BoxFuture<'_, Result<FeatureCollection, ServiceError>> {
        let url = format!("{}/route", self.base_url);
        let body = RouteRequestBody::new(start, destination);
        Box::pin(async move {
            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| ServiceError::with_source(format!("Request to {url} failed"), e))?;
            Self::decode(response, &url).await
        })
    }
}
