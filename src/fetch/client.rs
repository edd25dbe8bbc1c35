//! Async client for the upstream place-lookup and measurements services.
//!
//! Both payloads are fetched in full and handed to the synchronous
//! [`StationLocator`]; nothing is cached between requests.

use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::error::LocateError;
use crate::fetch::error::FetchError;
use crate::fetch::request::SearchRequest;
use crate::options::LocatorOptions;
use crate::stations::candidates::parse_candidates;
use crate::stations::locate_station::StationLocator;
use crate::types::normalized::ResultEnvelope;
use crate::types::place::{LocationKind, PlaceMatch};
use bon::Builder;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const OS_PLACE_URL_VAR: &str = "OS_PLACE_API_URL";
const MEASUREMENTS_URL_VAR: &str = "MEASUREMENTS_API_URL";

/// Endpoints and search settings for [`MonitoringStationClient`].
///
/// # Examples
///
/// ```
/// use monitor_locate::{ClientConfig, LocationKind};
///
/// let config = ClientConfig::builder()
///     .os_place_url("https://places.example/api")
///     .measurements_url("https://measurements.example/api")
///     .build();
/// assert_eq!(config.location_kind, LocationKind::UkLocation);
/// assert_eq!(config.place_index, 0);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    #[builder(into)]
    pub os_place_url: String,
    #[builder(into)]
    pub measurements_url: String,
    #[builder(default)]
    pub location_kind: LocationKind,
    /// Which place match is used as the search origin.
    #[builder(default)]
    pub place_index: usize,
    #[builder(default)]
    pub locator: LocatorOptions,
}

impl ClientConfig {
    /// Reads the endpoints from `OS_PLACE_API_URL` and `MEASUREMENTS_API_URL`;
    /// everything else takes its default.
    pub fn from_env() -> Result<Self, FetchError> {
        let os_place_url =
            std::env::var(OS_PLACE_URL_VAR).map_err(|_| FetchError::MissingConfig(OS_PLACE_URL_VAR))?;
        let measurements_url = std::env::var(MEASUREMENTS_URL_VAR)
            .map_err(|_| FetchError::MissingConfig(MEASUREMENTS_URL_VAR))?;
        Ok(Self::builder()
            .os_place_url(os_place_url)
            .measurements_url(measurements_url)
            .build())
    }
}

#[derive(Deserialize)]
struct OsPlacesResponse {
    #[serde(rename = "getOSPlaces", default)]
    places: Option<Vec<PlaceMatch>>,
}

#[derive(Deserialize)]
struct MeasurementsResponse {
    #[serde(default)]
    measurements: Option<Vec<Value>>,
}

pub struct MonitoringStationClient {
    http: Client,
    config: ClientConfig,
    locator: StationLocator,
    sink: Arc<dyn DiagnosticSink>,
}

impl MonitoringStationClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(Client::new(), config)
    }

    pub fn with_http_client(http: Client, config: ClientConfig) -> Self {
        let sink: Arc<dyn DiagnosticSink> = Arc::new(LogSink);
        let locator = StationLocator::with_options(config.locator).with_sink(sink.clone());
        Self {
            http,
            config,
            locator,
            sink,
        }
    }

    /// Replaces the sink that receives fetch failures and the parsing and
    /// locating diagnostics (defaults to [`LogSink`]).
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.locator = self.locator.with_sink(sink.clone());
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Looks up the place matches for a name or postcode.
    pub async fn fetch_places(&self, user_location: &str) -> Result<Vec<PlaceMatch>, FetchError> {
        let url = &self.config.os_place_url;
        let request = self.http.post(url).json(&place_request_body(user_location));
        let response = send(request, url).await?;
        let places = match self.config.location_kind {
            LocationKind::UkLocation => read_json::<OsPlacesResponse>(response, url)
                .await?
                .places
                .unwrap_or_default(),
            LocationKind::NorthernIreland => read_json::<Vec<PlaceMatch>>(response, url).await?,
        };
        log::info!("Fetched {} place matches for '{}'", places.len(), user_location);
        Ok(places)
    }

    /// Fetches the raw station records from the measurements service.
    pub async fn fetch_measurements(&self) -> Result<Vec<Value>, FetchError> {
        let url = &self.config.measurements_url;
        let response = send(self.http.get(url), url).await?;
        let records = read_json::<MeasurementsResponse>(response, url)
            .await?
            .measurements
            .unwrap_or_default();
        log::info!("Fetched {} station records", records.len());
        Ok(records)
    }

    /// Fetches places and stations for `request` and resolves the stations
    /// within the requested radius.
    pub async fn find_monitoring_stations(
        &self,
        request: &SearchRequest,
    ) -> Result<ResultEnvelope, LocateError> {
        let (places, records) = tokio::try_join!(
            self.fetch_places(request.user_location()),
            self.fetch_measurements()
        )
        .inspect_err(|e| self.sink.error(&format!("Upstream fetch failed: {e}")))?;

        Ok(self.locate(&places, records, request))
    }

    fn locate(&self, places: &[PlaceMatch], records: Vec<Value>, request: &SearchRequest) -> ResultEnvelope {
        let stations = parse_candidates(records, self.sink.as_ref());
        let envelope = self.locator.resolve_nearest_stations(
            places,
            &stations,
            self.config.location_kind,
            request.radius_meters(),
            self.config.place_index,
        );
        if envelope.is_empty() {
            self.sink.info(&format!(
                "No nearest locations found for userLocation: {}, usermiles: {}",
                request.user_location(),
                request.user_miles()
            ));
        }
        envelope
    }
}

fn place_request_body(user_location: &str) -> Value {
    json!({ "userLocation": user_location })
}

async fn send(request: RequestBuilder, url: &str) -> Result<Response, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;
    match response.error_for_status() {
        Ok(resp) => Ok(resp),
        Err(e) => match e.status() {
            Some(status) => Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
                source: e,
            }),
            None => Err(FetchError::NetworkRequest(url.to_string(), e)),
        },
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, FetchError> {
    response
        .json::<T>()
        .await
        .map_err(|e| FetchError::JsonParse(url.to_string(), e))
}
