// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Place-name geocoding.
//!
//! A [`Geocoder`] resolves free text to a single coordinate. The production
//! implementation talks to a Nominatim-compatible `search` endpoint and takes
//! the first match; there is no retry and no caching, every call is a fresh
//! request.

use std::time::Duration;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::geo::Coordinate;

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur while geocoding.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("no place matched the query")]
    NotFound,

    #[error("geocoding request failed: {0}")]
    Transport(String),

    #[error("invalid geocoding response: {0}")]
    Decode(String),
}

/// One candidate returned by the search endpoint.
///
/// Nominatim encodes coordinates as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceMatch {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

impl PlaceMatch {
    pub fn coordinate(&self) -> Result<Coordinate, GeocodeError> {
        let latitude = self
            .lat
            .trim()
            .parse::<f64>()
            .map_err(|e| GeocodeError::Decode(format!("latitude '{}': {}", self.lat, e)))?;
        let longitude = self
            .lon
            .trim()
            .parse::<f64>()
            .map_err(|e| GeocodeError::Decode(format!("longitude '{}': {}", self.lon, e)))?;
        Ok(Coordinate::new(latitude, longitude))
    }
}

/// Resolves place names to coordinates.
pub trait Geocoder: Send + Sync {
    /// Look up `query` and return the best (first) match.
    fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError>;
}

/// Decode a search response body and pick the first match.
pub fn first_match(body: &str) -> Result<Coordinate, GeocodeError> {
    let matches: Vec<PlaceMatch> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Decode(e.to_string()))?;

    let first = matches.first().ok_or(GeocodeError::NotFound)?;
    debug!(
        "Geocoder returned {} candidate(s), using '{}'",
        matches.len(),
        first.display_name
    );
    first.coordinate()
}

/// Geocoder backed by a Nominatim-compatible HTTP endpoint.
pub struct NominatimGeocoder {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl std::fmt::Debug for NominatimGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocoder")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl NominatimGeocoder {
    /// Create a geocoder for `base_url`.
    ///
    /// Nominatim's usage policy requires an identifying `User-Agent`.
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self, GeocodeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Full URL of the search endpoint.
    #[must_use]
    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        let url = self.search_url();
        debug!("Geocoding '{}' via {}", query, url);

        let response = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("q", query)])
            .send()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Transport(format!("HTTP {}", response.status())));
        }

        let body = response
            .text()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        first_match(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve_once;

    #[test]
    fn test_first_match_parses_string_coordinates() {
        let body = r#"[
            {"lat": "15.4989946", "lon": "73.8282141", "display_name": "Goa, India"},
            {"lat": "-6.1", "lon": "106.8", "display_name": "Goa, Indonesia"}
        ]"#;

        let coord = first_match(body).unwrap();
        assert_eq!(coord, Coordinate::new(15.498_994_6, 73.828_214_1));
    }

    #[test]
    fn test_first_match_empty_is_not_found() {
        assert!(matches!(first_match("[]"), Err(GeocodeError::NotFound)));
    }

    #[test]
    fn test_first_match_malformed_body() {
        assert!(matches!(
            first_match("<html>rate limited</html>"),
            Err(GeocodeError::Decode(_))
        ));
    }

    #[test]
    fn test_first_match_bad_latitude() {
        let body = r#"[{"lat": "north", "lon": "73.8"}]"#;
        let err = first_match(body).unwrap_err();
        assert!(err.to_string().contains("latitude 'north'"));
    }

    #[test]
    fn test_geocode_sends_encoded_query() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"lat": "15.2993", "lon": "74.1240", "display_name": "Goa, India"}]"#,
        );
        let geocoder = NominatimGeocoder::new(base_url, "test-agent").unwrap();

        let coord = geocoder.geocode("Goa, India").unwrap();
        assert_eq!(coord, Coordinate::new(15.2993, 74.124));

        let request_line = server.join().unwrap();
        assert!(request_line.starts_with("GET /search?"), "{request_line}");
        assert!(request_line.contains("format=json"), "{request_line}");
        assert!(request_line.contains("q=Goa%2C+India"), "{request_line}");
    }

    #[test]
    fn test_geocode_error_status_is_transport() {
        let (base_url, server) = serve_once("503 Service Unavailable", "busy");
        let geocoder = NominatimGeocoder::new(base_url, "test-agent").unwrap();

        match geocoder.geocode("Goa") {
            Err(GeocodeError::Transport(message)) => assert!(message.contains("503"), "{message}"),
            other => panic!("expected transport error, got {other:?}"),
        }
        server.join().unwrap();
    }

    #[test]
    fn test_geocode_empty_result_is_not_found() {
        let (base_url, server) = serve_once("200 OK", "[]");
        let geocoder = NominatimGeocoder::new(base_url, "test-agent").unwrap();

        assert!(matches!(geocoder.geocode("Atlantis"), Err(GeocodeError::NotFound)));
        server.join().unwrap();
    }

    #[test]
    fn test_search_url_trims_trailing_slash() {
        let geocoder = NominatimGeocoder::new("http://localhost:8080/", "test-agent").unwrap();
        assert_eq!(geocoder.search_url(), "http://localhost:8080/search");
    }
}
