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

//! Device position lookup.
//!
//! Desktops have no geolocation prompt, so "where am I" is answered by one of
//! a few [`DeviceLocator`] implementations chosen at startup: a configured
//! fixed position, an IP-based lookup, or a locator that always refuses.

use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;

use crate::geo::Coordinate;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur while locating the device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("geolocation is not supported on this device")]
    Unsupported,

    #[error("location access was denied")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Source of the device's current position.
pub trait DeviceLocator: Send + Sync {
    /// Block until a position is known or the lookup fails.
    fn locate(&self) -> Result<Coordinate, LocateError>;
}

/// Always reports the same position (GPS override from config or CLI).
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Coordinate);

impl DeviceLocator for FixedLocator {
    fn locate(&self) -> Result<Coordinate, LocateError> {
        Ok(self.0)
    }
}

/// Platform without any position source.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLocator;

impl DeviceLocator for UnsupportedLocator {
    fn locate(&self) -> Result<Coordinate, LocateError> {
        Err(LocateError::Unsupported)
    }
}

/// Location access switched off by the user.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedLocator;

impl DeviceLocator for DeniedLocator {
    fn locate(&self) -> Result<Coordinate, LocateError> {
        Err(LocateError::PermissionDenied)
    }
}

/// A JSON IP-geolocation service and the field names it uses.
#[derive(Debug, Clone)]
pub struct IpEndpoint {
    pub url: String,
    pub lat_field: &'static str,
    pub lon_field: &'static str,
}

impl IpEndpoint {
    #[must_use]
    pub fn ipapi_co() -> Self {
        Self {
            url: "https://ipapi.co/json/".to_string(),
            lat_field: "latitude",
            lon_field: "longitude",
        }
    }

    #[must_use]
    pub fn ip_api_com() -> Self {
        Self {
            url: "http://ip-api.com/json/".to_string(),
            lat_field: "lat",
            lon_field: "lon",
        }
    }

    /// Extract a coordinate from a response body, if it has one.
    #[must_use]
    pub fn parse(&self, body: &str) -> Option<Coordinate> {
        let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
        let latitude = value.get(self.lat_field).and_then(serde_json::Value::as_f64)?;
        let longitude = value.get(self.lon_field).and_then(serde_json::Value::as_f64)?;
        Some(Coordinate::new(latitude, longitude))
    }
}

/// Approximate position from the public IP address, trying endpoints in order.
pub struct IpLocator {
    client: reqwest::blocking::Client,
    endpoints: Vec<IpEndpoint>,
}

impl std::fmt::Debug for IpLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpLocator")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl IpLocator {
    pub fn new(user_agent: &str) -> Result<Self, LocateError> {
        Self::with_endpoints(user_agent, vec![IpEndpoint::ipapi_co(), IpEndpoint::ip_api_com()])
    }

    pub fn with_endpoints(user_agent: &str, endpoints: Vec<IpEndpoint>) -> Result<Self, LocateError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LocateError::Unavailable(e.to_string()))?;
        Ok(Self { client, endpoints })
    }

    fn fetch(&self, endpoint: &IpEndpoint) -> Result<Coordinate, String> {
        let response = self.client.get(&endpoint.url).send().map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }
        let body = response.text().map_err(|e| e.to_string())?;
        endpoint
            .parse(&body)
            .ok_or_else(|| "response had no coordinates".to_string())
    }
}

impl DeviceLocator for IpLocator {
    fn locate(&self) -> Result<Coordinate, LocateError> {
        if self.endpoints.is_empty() {
            return Err(LocateError::Unsupported);
        }

        let mut last_error = String::new();
        for endpoint in &self.endpoints {
            debug!("Requesting IP geolocation from {}", endpoint.url);
            match self.fetch(endpoint) {
                Ok(coord) => {
                    info!("Location found via {}: {}", endpoint.url, coord);
                    return Ok(coord);
                }
                Err(e) => {
                    warn!("IP geolocation via {} failed: {}", endpoint.url, e);
                    last_error = e;
                }
            }
        }

        Err(LocateError::Unavailable(last_error))
    }
}
