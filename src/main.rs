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

mod app;
mod config;
mod map;
mod ui;

use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use eframe::egui;
use hazard_core::device::{DeniedLocator, FixedLocator, IpLocator};
use hazard_core::{DeviceLocator, LocationSelector, NominatimGeocoder};
use log::{info, warn};
use mimalloc::MiMalloc;

use app::HazardWatchApp;
use config::AppConfig;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Report and view ocean hazards on a map")]
struct Args {
    /// Device latitude to report instead of looking it up
    #[arg(long, requires = "longitude", allow_negative_numbers = true)]
    latitude: Option<f64>,

    /// Device longitude to report instead of looking it up
    #[arg(long, requires = "latitude", allow_negative_numbers = true)]
    longitude: Option<f64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Overwrite the config file with defaults
    #[arg(long)]
    reset_config: bool,
}

fn load_config(args: &Args) -> AppConfig {
    let mut config = if args.reset_config {
        let config = AppConfig::default();
        match config.save() {
            Ok(()) => info!("Config reset to defaults"),
            Err(e) => warn!("Failed to reset config: {}", e),
        }
        config
    } else {
        AppConfig::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        })
    };

    if let Ok(path) = AppConfig::get_config_path() {
        info!("Config file: {}", path.display());
    }

    // Command line position wins over the config file
    if let (Some(lat), Some(lon)) = (args.latitude, args.longitude) {
        config.override_latitude = Some(lat);
        config.override_longitude = Some(lon);
    }
    config
}

fn device_locator(config: &AppConfig) -> Result<Arc<dyn DeviceLocator>, Box<dyn Error>> {
    if let Some(position) = config.override_position() {
        info!("Using fixed device position {}", position);
        return Ok(Arc::new(FixedLocator(position)));
    }
    if config.allow_ip_geolocation {
        info!("Using IP-based geolocation for device position");
        return Ok(Arc::new(IpLocator::new(&config.user_agent)?));
    }
    info!("Device location disabled");
    Ok(Arc::new(DeniedLocator))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    info!("Starting Ocean Hazard Watch...");
    let config = load_config(&args);

    let geocoder_url = config.resolve_geocoder_url();
    info!("Geocoding with {}", geocoder_url);
    let geocoder = NominatimGeocoder::new(geocoder_url, &config.user_agent)?;
    let locator = device_locator(&config)?;
    let selector = LocationSelector::new(Arc::new(geocoder), locator);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("hazard-watch-worker")
        .enable_all()
        .build()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Ocean Hazard Watch"),
        ..Default::default()
    };

    eframe::run_native(
        "Ocean Hazard Watch",
        options,
        Box::new(move |cc| Ok(Box::new(HazardWatchApp::new(cc, &config, selector, runtime)))),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_position_requires_both() {
        assert!(Args::try_parse_from(["ocean-hazard-watch", "--latitude", "15.3"]).is_err());

        let args = Args::try_parse_from([
            "ocean-hazard-watch",
            "--latitude",
            "-33.86",
            "--longitude",
            "151.21",
        ])
        .unwrap();
        assert_eq!(args.latitude, Some(-33.86));
        assert_eq!(args.longitude, Some(151.21));
        assert!(!args.verbose);
    }

    #[test]
    fn test_fixed_position_takes_precedence() {
        let config = AppConfig {
            override_latitude: Some(15.2993),
            override_longitude: Some(74.124),
            ..Default::default()
        };
        let locator = device_locator(&config).unwrap();
        let position = locator.locate().unwrap();
        assert_eq!(position, hazard_core::Coordinate::new(15.2993, 74.124));
    }

    #[test]
    fn test_disabled_ip_lookup_refuses() {
        let config = AppConfig {
            allow_ip_geolocation: false,
            ..Default::default()
        };
        let locator = device_locator(&config).unwrap();
        assert!(locator.locate().is_err());
    }
}
