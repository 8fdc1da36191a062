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

//! Application configuration management.
//!
//! This module handles persistent configuration storage using TOML format.
//! It covers the geocoding endpoint, device location overrides, map zoom
//! levels, and the timings of the background tasks.

use std::time::Duration;

use hazard_core::connectivity::ConnectivityConfig;
use hazard_core::geocoder::DEFAULT_GEOCODER_URL;
use hazard_core::tally::TallySimulator;
use hazard_core::Coordinate;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "ocean-hazard-watch";
const CONFIG_NAME: &str = "config";

/// Environment variable that overrides the configured geocoder URL
pub const GEOCODER_URL_ENV: &str = "HAZARD_WATCH_GEOCODER_URL";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of a Nominatim-compatible geocoding service
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,

    /// User-Agent sent with geocoding and geolocation requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Zoom level when no location is selected
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,

    /// Zoom level after flying to a selected location
    #[serde(default = "default_selected_zoom")]
    pub selected_zoom: f64,

    /// Override device latitude (for devices without a position source)
    #[serde(default)]
    pub override_latitude: Option<f64>,

    /// Override device longitude (for devices without a position source)
    #[serde(default)]
    pub override_longitude: Option<f64>,

    /// Allow "Detect My Current Location" to use IP-based geolocation
    #[serde(default = "default_true")]
    pub allow_ip_geolocation: bool,

    /// Seconds between simulated hazard tally ticks
    #[serde(default = "default_tally_interval_secs")]
    pub tally_interval_secs: u64,

    /// Chance of a tally increment on each tick (0.0 - 1.0)
    #[serde(default = "default_tally_probability")]
    pub tally_probability: f64,

    /// Address probed to decide whether the network is reachable
    #[serde(default = "default_probe_address")]
    pub connectivity_probe_address: String,

    /// Seconds between connectivity probes
    #[serde(default = "default_connectivity_interval_secs")]
    pub connectivity_interval_secs: u64,
}

// Default value functions for serde
fn default_geocoder_url() -> String {
    DEFAULT_GEOCODER_URL.to_string()
}

fn default_user_agent() -> String {
    format!("{}/{}", APP_NAME, env!("CARGO_PKG_VERSION"))
}

fn default_zoom() -> f64 {
    5.0
}

fn default_selected_zoom() -> f64 {
    10.0
}

fn default_true() -> bool {
    true
}

fn default_tally_interval_secs() -> u64 {
    20
}

fn default_tally_probability() -> f64 {
    0.4
}

fn default_probe_address() -> String {
    "1.1.1.1:53".to_string()
}

fn default_connectivity_interval_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            geocoder_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            default_zoom: default_zoom(),
            selected_zoom: default_selected_zoom(),
            override_latitude: None,
            override_longitude: None,
            allow_ip_geolocation: true,
            tally_interval_secs: default_tally_interval_secs(),
            tally_probability: default_tally_probability(),
            connectivity_probe_address: default_probe_address(),
            connectivity_interval_secs: default_connectivity_interval_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, creating it with defaults if missing
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, CONFIG_NAME, self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// Device position override, only when both halves are set
    pub fn override_position(&self) -> Option<Coordinate> {
        match (self.override_latitude, self.override_longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }

    /// Resolve the geocoder URL from the environment or config
    pub fn resolve_geocoder_url(&self) -> String {
        Self::geocoder_url_from(std::env::var(GEOCODER_URL_ENV).ok(), &self.geocoder_url)
    }

    fn geocoder_url_from(env_value: Option<String>, configured: &str) -> String {
        // Environment variable takes precedence
        env_value
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| configured.to_string())
    }

    pub fn tally_simulator(&self) -> TallySimulator {
        TallySimulator::new(
            Duration::from_secs(self.tally_interval_secs),
            self.tally_probability,
        )
    }

    pub fn connectivity(&self) -> ConnectivityConfig {
        ConnectivityConfig {
            probe_address: self.connectivity_probe_address.clone(),
            interval: Duration::from_secs(self.connectivity_interval_secs.max(1)),
            ..Default::default()
        }
    }
}
