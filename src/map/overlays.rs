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

//! Static hazard markers and zones drawn over the base map.

use hazard_core::Coordinate;
use walkers::{MapMemory, Plugin, Projector};

const PIN_RADIUS: f32 = 7.0;
const PIN_HOVER_RADIUS: f32 = 12.0;

/// A reported hazard shown as a pin
#[derive(Debug, Clone, Copy)]
pub struct HazardMarker {
    pub position: Coordinate,
    pub info: &'static str,
}

/// A circular hazard zone
#[derive(Debug, Clone, Copy)]
pub struct HazardCircle {
    pub center: Coordinate,
    pub radius_meters: f64,
    pub info: &'static str,
}

pub const HAZARD_MARKERS: [HazardMarker; 2] = [
    HazardMarker {
        position: Coordinate::new(19.076, 72.8777),
        info: "Oil spill reported near Mumbai",
    },
    HazardMarker {
        position: Coordinate::new(13.0827, 80.2707),
        info: "Plastic waste spotted near Chennai",
    },
];

pub const DANGER_POLYGON: [Coordinate; 4] = [
    Coordinate::new(20.0, 72.5),
    Coordinate::new(20.5, 73.0),
    Coordinate::new(20.2, 73.5),
    Coordinate::new(19.8, 73.2),
];

pub const DANGER_POLYGON_INFO: &str = "Hazard Zone: Reported multiple issues";

pub const DANGER_CIRCLE: HazardCircle = HazardCircle {
    center: Coordinate::new(15.2993, 74.124),
    radius_meters: 50_000.0,
    info: "High current zone near Goa",
};

pub const SELECTED_INFO: &str = "📍 Selected Location";

/// Even-odd ray casting test in screen space
pub fn point_in_polygon(point: egui::Pos2, polygon: &[egui::Pos2]) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn to_screen(projector: &Projector, coord: Coordinate) -> egui::Pos2 {
    let v = projector.project(walkers::lat_lon(coord.latitude, coord.longitude));
    egui::pos2(v.x, v.y)
}

fn draw_pin(painter: &egui::Painter, pos: egui::Pos2, radius: f32, color: egui::Color32) {
    // Teardrop: a triangle pointing at the spot with a head above it
    let head = pos - egui::vec2(0.0, radius * 2.0);
    painter.add(egui::Shape::convex_polygon(
        vec![
            pos,
            head + egui::vec2(-radius * 0.8, radius * 0.5),
            head + egui::vec2(radius * 0.8, radius * 0.5),
        ],
        color,
        egui::Stroke::NONE,
    ));
    painter.circle_filled(head, radius, color);
    painter.circle_stroke(head, radius, egui::Stroke::new(1.5, egui::Color32::WHITE));
    painter.circle_filled(head, radius * 0.35, egui::Color32::WHITE);
}

fn draw_popup(painter: &egui::Painter, anchor: egui::Pos2, text: &str) {
    let galley = painter.layout_no_wrap(
        text.to_string(),
        egui::FontId::proportional(12.0),
        egui::Color32::from_rgb(30, 30, 30),
    );

    let padding = egui::vec2(8.0, 5.0);
    let size = galley.size() + padding * 2.0;
    let box_rect = egui::Rect::from_min_size(
        anchor - egui::vec2(size.x / 2.0, size.y + 24.0),
        size,
    );

    painter.rect_filled(box_rect.translate(egui::vec2(1.0, 2.0)), 4.0, egui::Color32::from_black_alpha(60));
    painter.rect_filled(box_rect, 4.0, egui::Color32::WHITE);
    painter.galley(box_rect.min + padding, galley, egui::Color32::from_rgb(30, 30, 30));
}

/// Overlay feature that owns a popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupTarget {
    Zone,
    Circle,
    Marker(usize),
    Selected,
}

/// Screen geometry of the clickable overlay features for one frame
#[derive(Debug, Clone, Default)]
pub struct OverlayGeometry {
    pub polygon: Vec<egui::Pos2>,
    pub circle_center: egui::Pos2,
    pub circle_radius: f32,
    pub marker_heads: Vec<egui::Pos2>,
    pub selected_head: Option<egui::Pos2>,
}

impl OverlayGeometry {
    /// Topmost feature under the pointer. Pins sit above the zones.
    pub fn hit_test(&self, pointer: egui::Pos2) -> Option<PopupTarget> {
        if self
            .selected_head
            .is_some_and(|head| pointer.distance(head) <= PIN_HOVER_RADIUS)
        {
            return Some(PopupTarget::Selected);
        }
        if let Some(i) = self
            .marker_heads
            .iter()
            .rposition(|head| pointer.distance(*head) <= PIN_HOVER_RADIUS)
        {
            return Some(PopupTarget::Marker(i));
        }
        if pointer.distance(self.circle_center) <= self.circle_radius {
            return Some(PopupTarget::Circle);
        }
        if point_in_polygon(pointer, &self.polygon) {
            return Some(PopupTarget::Zone);
        }
        None
    }
}

/// Popup left open after a click. Clicking the open feature or bare map closes it.
pub fn toggle_popup(open: Option<PopupTarget>, clicked: Option<PopupTarget>) -> Option<PopupTarget> {
    match clicked {
        Some(target) if open != Some(target) => Some(target),
        _ => None,
    }
}

fn polygon_anchor(polygon: &[egui::Pos2]) -> egui::Pos2 {
    if polygon.is_empty() {
        return egui::Pos2::ZERO;
    }
    let sum = polygon.iter().fold(egui::Vec2::ZERO, |acc, p| acc + p.to_vec2());
    (sum / polygon.len() as f32).to_pos2()
}

/// Walkers plugin drawing the static zones, hazard pins and the selected location
#[derive(Debug, Clone, Copy, Default)]
pub struct HazardOverlay {
    pub selected: Option<Coordinate>,
}

impl HazardOverlay {
    fn popup_id() -> egui::Id {
        egui::Id::new("hazard_overlay_popup")
    }
}

impl Plugin for HazardOverlay {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let painter = ui.painter().with_clip_rect(response.rect);
        let mut geometry = OverlayGeometry::default();

        // Polygon zone
        geometry.polygon = DANGER_POLYGON.iter().map(|c| to_screen(projector, *c)).collect();
        painter.add(egui::Shape::convex_polygon(
            geometry.polygon.clone(),
            egui::Color32::from_rgba_unmultiplied(255, 0, 0, 102),
            egui::Stroke::new(2.0, egui::Color32::RED),
        ));

        // Circular zone, radius measured along the meridian
        geometry.circle_center = to_screen(projector, DANGER_CIRCLE.center);
        let edge = to_screen(projector, DANGER_CIRCLE.center.offset_north(DANGER_CIRCLE.radius_meters));
        geometry.circle_radius = geometry.circle_center.distance(edge);
        let orange = egui::Color32::from_rgb(255, 165, 0);
        painter.circle(
            geometry.circle_center,
            geometry.circle_radius,
            egui::Color32::from_rgba_unmultiplied(255, 165, 0, 77),
            egui::Stroke::new(2.0, orange),
        );

        // Hazard pins on top of zones
        let red = egui::Color32::from_rgb(220, 40, 40);
        let marker_pins: Vec<egui::Pos2> = HAZARD_MARKERS
            .iter()
            .map(|marker| to_screen(projector, marker.position))
            .collect();
        for pos in &marker_pins {
            draw_pin(&painter, *pos, PIN_RADIUS, red);
        }
        geometry.marker_heads = marker_pins
            .iter()
            .map(|pos| *pos - egui::vec2(0.0, PIN_RADIUS * 2.0))
            .collect();

        let selected_pin = self.selected.map(|selected| to_screen(projector, selected));
        if let Some(pos) = selected_pin {
            draw_pin(&painter, pos, PIN_RADIUS + 2.0, egui::Color32::from_rgb(200, 20, 60));
            geometry.selected_head = Some(pos - egui::vec2(0.0, (PIN_RADIUS + 2.0) * 2.0));
        }

        if response.hover_pos().and_then(|p| geometry.hit_test(p)).is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let id = Self::popup_id();
        let mut open = ui.ctx().data(|d| d.get_temp::<PopupTarget>(id));
        if response.clicked() {
            let hit = response.interact_pointer_pos().and_then(|p| geometry.hit_test(p));
            open = toggle_popup(open, hit);
        }
        if open == Some(PopupTarget::Selected) && selected_pin.is_none() {
            open = None;
        }
        ui.ctx().data_mut(|d| match open {
            Some(target) => d.insert_temp(id, target),
            None => d.remove::<PopupTarget>(id),
        });

        let popup = match open {
            Some(PopupTarget::Zone) => Some((polygon_anchor(&geometry.polygon), DANGER_POLYGON_INFO)),
            Some(PopupTarget::Circle) => Some((geometry.circle_center, DANGER_CIRCLE.info)),
            Some(PopupTarget::Marker(i)) => marker_pins
                .get(i)
                .zip(HAZARD_MARKERS.get(i))
                .map(|(pos, marker)| (*pos, marker.info)),
            Some(PopupTarget::Selected) => selected_pin.map(|pos| (pos, SELECTED_INFO)),
            None => None,
        };
        if let Some((anchor, text)) = popup {
            draw_popup(&painter, anchor, text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<egui::Pos2> {
        vec![
            egui::pos2(0.0, 0.0),
            egui::pos2(10.0, 0.0),
            egui::pos2(10.0, 10.0),
            egui::pos2(0.0, 10.0),
        ]
    }

    #[test]
    fn test_point_in_polygon() {
        assert!(point_in_polygon(egui::pos2(5.0, 5.0), &square()));
        assert!(!point_in_polygon(egui::pos2(15.0, 5.0), &square()));
        assert!(!point_in_polygon(egui::pos2(5.0, -1.0), &square()));
    }

    #[test]
    fn test_empty_polygon_contains_nothing() {
        assert!(!point_in_polygon(egui::pos2(0.0, 0.0), &[]));
    }

    fn geometry() -> OverlayGeometry {
        OverlayGeometry {
            polygon: vec![
                egui::pos2(0.0, 0.0),
                egui::pos2(40.0, 0.0),
                egui::pos2(40.0, 40.0),
                egui::pos2(0.0, 40.0),
            ],
            circle_center: egui::pos2(100.0, 100.0),
            circle_radius: 20.0,
            marker_heads: vec![egui::pos2(5.0, 5.0), egui::pos2(200.0, 200.0)],
            selected_head: None,
        }
    }

    #[test]
    fn test_hit_test_prefers_pins_over_zones() {
        let mut geometry = geometry();
        assert_eq!(geometry.hit_test(egui::pos2(5.0, 6.0)), Some(PopupTarget::Marker(0)));
        assert_eq!(geometry.hit_test(egui::pos2(35.0, 35.0)), Some(PopupTarget::Zone));
        assert_eq!(geometry.hit_test(egui::pos2(110.0, 100.0)), Some(PopupTarget::Circle));
        assert_eq!(geometry.hit_test(egui::pos2(201.0, 199.0)), Some(PopupTarget::Marker(1)));
        assert_eq!(geometry.hit_test(egui::pos2(50.0, 50.0)), None);

        geometry.selected_head = Some(egui::pos2(6.0, 5.0));
        assert_eq!(geometry.hit_test(egui::pos2(5.0, 6.0)), Some(PopupTarget::Selected));
    }

    #[test]
    fn test_click_toggles_popup() {
        let open = toggle_popup(None, Some(PopupTarget::Circle));
        assert_eq!(open, Some(PopupTarget::Circle));

        // Another feature replaces the open popup
        let open = toggle_popup(open, Some(PopupTarget::Marker(1)));
        assert_eq!(open, Some(PopupTarget::Marker(1)));

        // Same feature again closes it
        assert_eq!(toggle_popup(open, Some(PopupTarget::Marker(1))), None);
        // Bare map closes it
        assert_eq!(toggle_popup(open, None), None);
        assert_eq!(toggle_popup(None, None), None);
    }

    #[test]
    fn test_zone_popup_anchor_is_vertex_mean() {
        assert_eq!(polygon_anchor(&square()), egui::pos2(5.0, 5.0));
        assert_eq!(polygon_anchor(&[]), egui::Pos2::ZERO);
    }

    #[test]
    fn test_zone_data() {
        assert_eq!(HAZARD_MARKERS.len(), 2);
        assert_eq!(DANGER_POLYGON.len(), 4);
        assert_eq!(DANGER_CIRCLE.radius_meters, 50_000.0);
        assert_eq!(DANGER_CIRCLE.info, "High current zone near Goa");
    }
}
