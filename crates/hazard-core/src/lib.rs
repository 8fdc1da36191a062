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

//! Core state for Ocean Hazard Watch, independent of any UI toolkit.
//!
//! The crate is split into small layers that the desktop shell composes:
//!
//! - **Lookup layer**: [`geocoder`] turns place names into coordinates through
//!   a Nominatim-compatible endpoint, [`device`] answers "where am I".
//! - **Selection layer**: [`location`] keeps the device/searched choice
//!   exclusive and runs lookups in the background, last request wins.
//! - **Reporting layer**: [`report`] is the hazard report form state machine.
//! - **Shell signals**: [`tally`] drives the decorative hazard counters and
//!   [`connectivity`] watches network reachability.
//!
//! # Selecting a location
//!
//! ```no_run
//! use std::sync::Arc;
//! use hazard_core::device::UnsupportedLocator;
//! use hazard_core::geocoder::NominatimGeocoder;
//! use hazard_core::location::{LocationSelector, SelectionUpdate};
//!
//! let geocoder = NominatimGeocoder::new(
//!     hazard_core::geocoder::DEFAULT_GEOCODER_URL,
//!     "ocean-hazard-watch/0.1",
//! )
//! .unwrap();
//! let mut selector = LocationSelector::new(Arc::new(geocoder), Arc::new(UnsupportedLocator));
//!
//! selector.search_location("Goa");
//! loop {
//!     match selector.poll() {
//!         Some(SelectionUpdate::Changed(coord)) => {
//!             println!("Goa is at {coord}");
//!             break;
//!         }
//!         Some(SelectionUpdate::Failed(err)) => {
//!             eprintln!("{err}");
//!             break;
//!         }
//!         None => std::thread::sleep(std::time::Duration::from_millis(50)),
//!     }
//! }
//! ```
//!
//! # Filling a report
//!
//! ```
//! use std::time::Instant;
//! use hazard_core::report::{FormState, HazardType, ReportForm};
//!
//! let mut form = ReportForm::new();
//! form.set_hazard_type(Some(HazardType::OilSpillPollution));
//! form.set_location("Goa");
//!
//! let report = form.submit(Instant::now()).unwrap();
//! assert_eq!(report.location, "Goa");
//! assert!(matches!(form.state(), FormState::Submitted { .. }));
//! ```

pub mod connectivity;
pub mod device;
pub mod geo;
pub mod geocoder;
pub mod location;
pub mod report;
pub mod tally;

#[cfg(test)]
mod test_server;

pub use connectivity::{ConnectivityConfig, ConnectivityMonitor, ConnectivitySignal, ConnectivityStatus};
pub use device::{DeviceLocator, LocateError};
pub use geo::Coordinate;
pub use geocoder::{GeocodeError, Geocoder, NominatimGeocoder};
pub use location::{LocationError, LocationSelection, LocationSelector, SelectionUpdate};
pub use report::{Attachment, FormState, HazardReport, HazardType, ReportForm, ValidationError};
pub use tally::{HazardCategory, HazardTally, SharedTally, TallySimulator, TallyTicker};
