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

use hazard_core::ConnectivityStatus;

pub const TITLE: &str = "🌊 Ocean Hazard Watch";

/// Pill colors (fill, text) for the connectivity indicator
pub fn pill_colors(status: &ConnectivityStatus) -> (egui::Color32, egui::Color32) {
    if status.is_online() {
        (egui::Color32::from_rgb(220, 245, 225), egui::Color32::from_rgb(30, 130, 60))
    } else {
        (egui::Color32::from_rgb(250, 225, 225), egui::Color32::from_rgb(180, 40, 40))
    }
}

/// Title bar with the Online/Offline pill
pub fn show(ctx: &egui::Context, status: &ConnectivityStatus) {
    egui::TopBottomPanel::top("header")
        .frame(
            egui::Frame::new()
                .fill(egui::Color32::from_rgb(0, 70, 130))
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(TITLE)
                        .color(egui::Color32::WHITE)
                        .size(20.0)
                        .strong(),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (fill, text) = pill_colors(status);
                    egui::Frame::new()
                        .fill(fill)
                        .corner_radius(10.0)
                        .inner_margin(egui::Margin::symmetric(10, 3))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(format!("● {}", status.label()))
                                    .color(text)
                                    .size(12.0)
                                    .strong(),
                            );
                        });
                });
            });
        });
}
