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

//! Active location selection.
//!
//! The selector owns the single "active coordinate" that drives map centering.
//! It comes either from the device or from a text search, never both. Lookups
//! run on background threads and report back through a channel that the UI
//! drains with [`LocationSelector::poll`]; only the newest request is ever
//! applied, and nothing is delivered once the selector is dropped.

use std::sync::Arc;

use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::device::{DeviceLocator, LocateError};
use crate::geo::Coordinate;
use crate::geocoder::{GeocodeError, Geocoder};

/// Identifier of a lookup, increasing with every request.
pub type RequestId = u64;

/// Which source the active coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocationSelection {
    #[default]
    None,
    Device(Coordinate),
    Searched(Coordinate),
}

impl LocationSelection {
    /// The coordinate currently driving the map, if any.
    #[must_use]
    pub fn active(&self) -> Option<Coordinate> {
        match self {
            Self::None => None,
            Self::Device(coord) | Self::Searched(coord) => Some(*coord),
        }
    }

    #[must_use]
    pub fn device(&self) -> Option<Coordinate> {
        match self {
            Self::Device(coord) => Some(*coord),
            _ => None,
        }
    }

    #[must_use]
    pub fn searched(&self) -> Option<Coordinate> {
        match self {
            Self::Searched(coord) => Some(*coord),
            _ => None,
        }
    }
}

/// User-facing lookup failures. `Display` is the alert text.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Geolocation not supported on this device.")]
    Unsupported,

    #[error("Unable to fetch your location.")]
    Device(#[source] LocateError),

    #[error("Location not found!")]
    NotFound,

    #[error("Error fetching location, please try again.")]
    Lookup(#[source] GeocodeError),
}

impl From<LocateError> for LocationError {
    fn from(err: LocateError) -> Self {
        match err {
            LocateError::Unsupported => Self::Unsupported,
            other => Self::Device(other),
        }
    }
}

impl From<GeocodeError> for LocationError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotFound => Self::NotFound,
            other => Self::Lookup(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LookupKind {
    Device,
    Search,
}

#[derive(Debug)]
struct LookupOutcome {
    request: RequestId,
    kind: LookupKind,
    result: Result<Coordinate, LocationError>,
}

/// Result of applying the newest finished lookup.
#[derive(Debug)]
pub enum SelectionUpdate {
    /// The active coordinate changed; the map should fly there.
    Changed(Coordinate),
    /// The lookup failed; the selection is unchanged.
    Failed(LocationError),
}

type Notify = Arc<dyn Fn() + Send + Sync>;

/// Owns the exclusive device/searched selection and its in-flight lookups.
pub struct LocationSelector {
    geocoder: Arc<dyn Geocoder>,
    locator: Arc<dyn DeviceLocator>,
    selection: LocationSelection,
    next_request: RequestId,
    in_flight: Option<RequestId>,
    outcome_tx: mpsc::UnboundedSender<LookupOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<LookupOutcome>,
    cancel_token: CancellationToken,
    notify: Option<Notify>,
}

impl std::fmt::Debug for LocationSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationSelector")
            .field("selection", &self.selection)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl LocationSelector {
    pub fn new(geocoder: Arc<dyn Geocoder>, locator: Arc<dyn DeviceLocator>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            geocoder,
            locator,
            selection: LocationSelection::None,
            next_request: 0,
            in_flight: None,
            outcome_tx,
            outcome_rx,
            cancel_token: CancellationToken::new(),
            notify: None,
        }
    }

    /// Called from the worker thread after an outcome is posted.
    ///
    /// The UI uses this to request a repaint.
    #[must_use]
    pub fn with_notify(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Some(Arc::new(notify));
        self
    }

    #[must_use]
    pub fn selection(&self) -> LocationSelection {
        self.selection
    }

    /// The active coordinate, device or searched, whichever was set last.
    #[must_use]
    pub fn active(&self) -> Option<Coordinate> {
        self.selection.active()
    }

    /// Whether a lookup is still outstanding.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Ask the device for its position.
    pub fn detect_device_location(&mut self) -> RequestId {
        let locator = Arc::clone(&self.locator);
        self.start(LookupKind::Device, move || {
            locator.locate().map_err(LocationError::from)
        })
    }

    /// Geocode `query`. Blank queries are ignored and return `None`.
    pub fn search_location(&mut self, query: &str) -> Option<RequestId> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let geocoder = Arc::clone(&self.geocoder);
        let query = query.to_string();
        Some(self.start(LookupKind::Search, move || {
            geocoder.geocode(&query).map_err(LocationError::from)
        }))
    }

    fn start<F>(&mut self, kind: LookupKind, lookup: F) -> RequestId
    where
        F: FnOnce() -> Result<Coordinate, LocationError> + Send + 'static,
    {
        self.next_request += 1;
        let request = self.next_request;
        if let Some(previous) = self.in_flight.replace(request) {
            debug!("Request {} superseded by {}", previous, request);
        }

        let outcome_tx = self.outcome_tx.clone();
        let cancel_token = self.cancel_token.clone();
        let notify = self.notify.clone();

        std::thread::spawn(move || {
            let result = lookup();
            if cancel_token.is_cancelled() {
                debug!("Dropping outcome of request {} after shutdown", request);
                return;
            }
            if outcome_tx
                .send(LookupOutcome {
                    request,
                    kind,
                    result,
                })
                .is_err()
            {
                return; // Selector dropped
            }
            if let Some(notify) = notify {
                notify();
            }
        });

        request
    }

    /// Apply finished lookups. Call once per frame.
    ///
    /// Outcomes of superseded requests are discarded.
    pub fn poll(&mut self) -> Option<SelectionUpdate> {
        let mut update = None;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if let Some(applied) = self.apply(outcome) {
                update = Some(applied);
            }
        }
        update
    }

    fn apply(&mut self, outcome: LookupOutcome) -> Option<SelectionUpdate> {
        if self.in_flight != Some(outcome.request) {
            debug!("Ignoring stale outcome of request {}", outcome.request);
            return None;
        }
        self.in_flight = None;

        match outcome.result {
            Ok(coord) => {
                self.selection = match outcome.kind {
                    LookupKind::Device => LocationSelection::Device(coord),
                    LookupKind::Search => LocationSelection::Searched(coord),
                };
                info!("Active location set to {} ({:?})", coord, outcome.kind);
                Some(SelectionUpdate::Changed(coord))
            }
            Err(err) => {
                warn!("Location lookup {} failed: {:?}", outcome.request, err);
                Some(SelectionUpdate::Failed(err))
            }
        }
    }

    /// Stop delivering outcomes of outstanding lookups.
    pub fn shutdown(&mut self) {
        self.cancel_token.cancel();
        self.in_flight = None;
    }
}

impl Drop for LocationSelector {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
