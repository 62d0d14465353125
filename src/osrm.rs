//! OSRM HTTP adapter for road distances.
//!
//! Queries the `table` service for driving distances, so graphs follow the
//! road network instead of straight lines. Pairs OSRM cannot route come back
//! as `None` and produce no edge.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::EngineError;
use crate::haversine::Coordinate;
use crate::shortest_path::Budget;
use crate::traits::DistanceSource;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, EngineError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// `table` request URL for `locations`. OSRM wants `lng,lat` order.
    pub fn table_url(&self, locations: &[Coordinate]) -> String {
        let coords = locations
            .iter()
            .map(|location| format!("{:.6},{:.6}", location.longitude, location.latitude))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=distance",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }

    /// Per-request timeout: the configured one, cut short by what is left of `budget`.
    fn request_timeout(&self, budget: &Budget) -> Duration {
        let configured = Duration::from_secs(self.config.timeout_secs);
        budget.remaining().map_or(configured, |left| left.min(configured))
    }
}

impl DistanceSource for OsrmClient {
    fn distances_for(&self, locations: &[Coordinate]) -> Result<Vec<Vec<Option<f64>>>, EngineError> {
        self.distances_within(locations, &Budget::unlimited())
    }

    fn distances_within(
        &self,
        locations: &[Coordinate],
        budget: &Budget,
    ) -> Result<Vec<Vec<Option<f64>>>, EngineError> {
        if locations.is_empty() {
            return Ok(Vec::new());
        }
        budget.check()?;

        let body = self
            .client
            .get(self.table_url(locations))
            .timeout(self.request_timeout(budget))
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>())?;

        debug!(locations = locations.len(), code = %body.code, "OSRM table response");
        table_to_km(body)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    /// Metres; `null` where no route exists.
    distances: Option<Vec<Vec<Option<f64>>>>,
}

fn table_to_km(body: OsrmTableResponse) -> Result<Vec<Vec<Option<f64>>>, EngineError> {
    if body.code != "Ok" {
        return Err(EngineError::Provider(format!(
            "OSRM returned {}: {}",
            body.code,
            body.message.unwrap_or_default()
        )));
    }

    let distances = body
        .distances
        .ok_or_else(|| EngineError::Provider("OSRM response has no distances".to_string()))?;

    Ok(distances
        .into_iter()
        .map(|row| row.into_iter().map(|metres| metres.map(|m| m / 1000.0)).collect())
        .collect())
}
