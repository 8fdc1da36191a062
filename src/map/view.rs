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

//! Map panel: location controls, the slippy map, and the fly-to animation.

use std::time::Instant;

use hazard_core::{Coordinate, LocationError, LocationSelection, LocationSelector, SelectionUpdate};
use log::{debug, warn};
use walkers::{HttpTiles, Map, MapMemory, Position};

use super::fly::FlyTo;
use super::overlays::HazardOverlay;
use super::tiles::{self, ATTRIBUTION_TEXT, ATTRIBUTION_URL};

/// Map center when nothing is selected (India)
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(20.5937, 78.9629);

fn to_position(coord: Coordinate) -> Position {
    walkers::lat_lon(coord.latitude, coord.longitude)
}

fn from_position(position: Position) -> Coordinate {
    Coordinate::new(position.y(), position.x())
}

/// Label for the device half of the selection
pub fn current_label(selection: &LocationSelection) -> Option<String> {
    selection.device().map(|c| format!("📍 Current: {}", c))
}

/// Label for the searched half of the selection
pub fn input_label(selection: &LocationSelection) -> Option<String> {
    selection.searched().map(|c| format!("🗺 Input: {}", c))
}

pub struct MapView {
    tiles: HttpTiles,
    memory: MapMemory,
    selector: LocationSelector,
    search_text: String,
    center: Coordinate,
    fly: Option<FlyTo>,
    selected_zoom: f64,
}

impl std::fmt::Debug for MapView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapView")
            .field("selector", &self.selector)
            .field("center", &self.center)
            .field("fly", &self.fly)
            .finish_non_exhaustive()
    }
}

impl MapView {
    pub fn new(ctx: &egui::Context, selector: LocationSelector, default_zoom: f64, selected_zoom: f64) -> Self {
        let mut memory = MapMemory::default();
        if let Err(e) = memory.set_zoom(default_zoom) {
            warn!("Invalid default zoom {}: {:?}", default_zoom, e);
        }

        Self {
            tiles: tiles::base_map_tiles(ctx),
            memory,
            selector,
            search_text: String::new(),
            center: DEFAULT_CENTER,
            fly: None,
            selected_zoom,
        }
    }

    pub fn selection(&self) -> LocationSelection {
        self.selector.selection()
    }

    /// Apply finished lookups, starting a flight when the location changed.
    ///
    /// Returns the failure to show in an alert, if any.
    pub fn poll(&mut self, now: Instant) -> Option<LocationError> {
        match self.selector.poll()? {
            SelectionUpdate::Changed(target) => {
                self.fly_to(target, now);
                None
            }
            SelectionUpdate::Failed(err) => Some(err),
        }
    }

    fn fly_to(&mut self, target: Coordinate, now: Instant) {
        let from = self
            .memory
            .detached()
            .map(from_position)
            .unwrap_or(self.center);
        debug!("Flying from {} to {}", from, target);
        self.fly = Some(FlyTo::new(from, self.memory.zoom(), target, self.selected_zoom, now));
    }

    /// Advance the fly-to animation
    fn animate(&mut self, ctx: &egui::Context, now: Instant) {
        let Some(fly) = self.fly else {
            return;
        };

        let zoom = fly.zoom_at(now);
        if let Err(e) = self.memory.set_zoom(zoom) {
            warn!("Invalid zoom {} during fly-to: {:?}", zoom, e);
        }

        if fly.is_finished(now) {
            self.center = fly.target();
            self.memory.center_at(to_position(fly.target()));
            self.fly = None;
        } else {
            self.memory.center_at(to_position(fly.position_at(now)));
            ctx.request_repaint();
        }
    }

    /// Device detection, search box and the current selection
    pub fn location_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            if ui.button("Detect My Current Location").clicked() {
                self.selector.detect_device_location();
            }

            let search = ui.add(
                egui::TextEdit::singleline(&mut self.search_text)
                    .hint_text("Enter a place or city")
                    .desired_width(220.0),
            );
            let submitted = search.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Find Location").clicked() || submitted {
                self.selector.search_location(&self.search_text);
            }

            if self.selector.pending() {
                ui.spinner();
            }
        });

        let selection = self.selector.selection();
        if let Some(label) = current_label(&selection) {
            ui.label(egui::RichText::new(label).color(egui::Color32::from_rgb(0, 110, 180)));
        }
        if let Some(label) = input_label(&selection) {
            ui.label(egui::RichText::new(label).color(egui::Color32::from_rgb(0, 140, 90)));
        }
    }

    /// The map itself with hazard overlays and attribution
    pub fn show_map(&mut self, ui: &mut egui::Ui) {
        self.animate(ui.ctx(), Instant::now());

        let map_rect = ui.available_rect_before_wrap();
        let overlay = HazardOverlay {
            selected: self.selector.active(),
        };
        let map = Map::new(Some(&mut self.tiles), &mut self.memory, to_position(self.center))
            .with_plugin(overlay);
        ui.add(map);

        // Attribution, bottom right
        let link_rect = egui::Rect::from_min_max(
            map_rect.max - egui::vec2(190.0, 20.0),
            map_rect.max,
        );
        ui.painter()
            .rect_filled(link_rect, 2.0, egui::Color32::from_white_alpha(200));
        ui.put(
            link_rect,
            egui::Hyperlink::from_label_and_url(egui::RichText::new(ATTRIBUTION_TEXT).small(), ATTRIBUTION_URL),
        );
    }

    /// Stop delivering lookup results
    pub fn shutdown(&mut self) {
        self.selector.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_conversion() {
        let goa = Coordinate::new(15.2993, 74.124);
        let position = to_position(goa);
        assert_eq!(position.y(), 15.2993);
        assert_eq!(position.x(), 74.124);
        assert_eq!(from_position(position), goa);
    }

    #[test]
    fn test_selection_labels() {
        let goa = Coordinate::new(15.2993, 74.124);

        let device = LocationSelection::Device(goa);
        assert_eq!(current_label(&device).as_deref(), Some("📍 Current: 15.29930, 74.12400"));
        assert_eq!(input_label(&device), None);

        let searched = LocationSelection::Searched(goa);
        assert_eq!(current_label(&searched), None);
        assert_eq!(input_label(&searched).as_deref(), Some("🗺 Input: 15.29930, 74.12400"));

        assert_eq!(current_label(&LocationSelection::None), None);
        assert_eq!(input_label(&LocationSelection::None), None);
    }
}
