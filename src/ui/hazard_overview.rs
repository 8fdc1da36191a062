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

//! "Active Hazards" counters.

use hazard_core::{HazardCategory, HazardTally};

fn category_icon(category: HazardCategory) -> &'static str {
    match category {
        HazardCategory::Cyclone => "🌀",
        HazardCategory::Flood => "🌊",
        HazardCategory::Pollution => "🛢",
    }
}

fn category_color(category: HazardCategory) -> egui::Color32 {
    match category {
        HazardCategory::Cyclone => egui::Color32::from_rgb(90, 110, 200),
        HazardCategory::Flood => egui::Color32::from_rgb(0, 140, 200),
        HazardCategory::Pollution => egui::Color32::from_rgb(120, 90, 60),
    }
}

pub fn show(ui: &mut egui::Ui, tally: &HazardTally) {
    ui.label(egui::RichText::new("Active Hazards").size(15.0).strong());
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        for category in HazardCategory::ALL {
            egui::Frame::new()
                .fill(ui.visuals().faint_bg_color)
                .stroke(egui::Stroke::new(1.0, category_color(category)))
                .corner_radius(6.0)
                .inner_margin(egui::Margin::symmetric(12, 6))
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new(tally.get(category).to_string())
                                .size(20.0)
                                .strong()
                                .color(category_color(category)),
                        );
                        ui.label(format!("{} {}", category_icon(category), category.label()));
                    });
                });
        }

        ui.label(
            egui::RichText::new(format!("Total: {}", tally.total()))
                .color(egui::Color32::GRAY)
                .size(11.0),
        );
    });
}
