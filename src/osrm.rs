//! OSRM HTTP adapter for route geometry and point snapping.

use serde::Deserialize;

use crate::error::GeometryError;
use crate::polyline::Polyline;
use crate::traits::RouteGeometryProvider;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
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
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn service_url(&self, service: &str, coords: &str) -> String {
        format!(
            "{}/{}/v1/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            service,
            self.config.profile,
            coords
        )
    }
}

/// OSRM expects `lng,lat` pairs joined by `;`.
fn format_coords(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
        .collect::<Vec<_>>()
        .join(";")
}

fn check_code(code: String, message: Option<String>) -> Result<(), GeometryError> {
    if code == "Ok" {
        Ok(())
    } else {
        Err(GeometryError::Service {
            code,
            message: message.unwrap_or_default(),
        })
    }
}

impl RouteGeometryProvider for OsrmClient {
    fn route_geometry(&self, waypoints: &[(f64, f64)]) -> Result<Polyline, GeometryError> {
        if waypoints.len() < 2 {
            return Ok(Polyline::new(waypoints.to_vec()));
        }

        let url = self.service_url("route", &format_coords(waypoints));
        let body: OsrmRouteResponse = self
            .client
            .get(url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()?
            .json()?;

        check_code(body.code, body.message)?;
        let route = body
            .routes
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(GeometryError::EmptyResponse)?;

        Ok(Polyline::from_geojson(&route.geometry.coordinates))
    }

    fn nearest(&self, point: (f64, f64), radius_m: f64) -> Result<(f64, f64), GeometryError> {
        let url = self.service_url("nearest", &format_coords(&[point]));
        let body: OsrmNearestResponse = self
            .client
            .get(url)
            .query(&[("number", "1".to_string()), ("radiuses", format!("{:.0}", radius_m))])
            .send()?
            .json()?;

        check_code(body.code, body.message)?;
        let waypoint = body
            .waypoints
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(GeometryError::EmptyResponse)?;

        let [lng, lat] = waypoint.location;
        Ok((lat, lng))
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmNearestResponse {
    code: String,
    message: Option<String>,
    waypoints: Option<Vec<OsrmWaypoint>>,
}

#[derive(Debug, Deserialize)]
struct OsrmWaypoint {
    location: [f64; 2],
}
