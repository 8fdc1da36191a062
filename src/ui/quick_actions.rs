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

pub const QUICK_ACTIONS: [&str; 4] = [
    "🌀 Report Cyclone",
    "🌊 Report Flood/Tsunami",
    "🛢 Report Oil Spill",
    "🚩 Other Hazard",
];

pub const REPORT_BUTTON: &str = "📢 Report Hazard";

/// Row of quick-report buttons. Returns true if any was clicked.
pub fn show(ui: &mut egui::Ui) -> bool {
    let mut clicked = false;
    ui.horizontal_wrapped(|ui| {
        for label in QUICK_ACTIONS {
            let button = egui::Button::new(egui::RichText::new(label).size(13.0))
                .corner_radius(6.0)
                .min_size(egui::vec2(0.0, 28.0));
            clicked |= ui.add(button).clicked();
        }
    });
    clicked
}

/// Floating report button anchored to the bottom right of the screen
pub fn floating_button(ctx: &egui::Context) -> bool {
    let mut clicked = false;
    egui::Area::new(egui::Id::new("report_hazard_fab"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-20.0, -36.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            let button = egui::Button::new(
                egui::RichText::new(REPORT_BUTTON)
                    .color(egui::Color32::WHITE)
                    .size(15.0)
                    .strong(),
            )
            .fill(egui::Color32::from_rgb(220, 60, 50))
            .corner_radius(20.0)
            .min_size(egui::vec2(160.0, 40.0));
            clicked = ui.add(button).clicked();
        });
    clicked
}
