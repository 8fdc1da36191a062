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

//! Slide-in hazard report form.

use std::time::Instant;

use hazard_core::report::ATTACHMENT_EXTENSIONS;
use hazard_core::{Attachment, Coordinate, HazardType, ReportForm, ValidationError};
use log::{debug, warn};

/// Human readable file size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

pub const SIDEBAR_TITLE: &str = "Report Ocean Hazard";
pub const SIDEBAR_SUBTITLE: &str = "Help save lives by reporting dangers along India's coastline.";
pub const LOCATION_HINT: &str = "Location (auto-detected or enter manually)";

#[derive(Debug, Default)]
pub struct ReportSidebar {
    validation: Option<ValidationError>,
}

impl ReportSidebar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validation failure from the last submit attempt, if still relevant
    pub fn validation(&self) -> Option<ValidationError> {
        self.validation
    }

    /// Submit the form, keeping any validation error for inline display
    pub fn submit(&mut self, form: &mut ReportForm, now: Instant) {
        match form.submit(now) {
            Ok(report) => {
                debug!("Report {} accepted", report.id);
                self.validation = None;
            }
            Err(e) => {
                warn!("Report rejected: {}", e);
                self.validation = Some(e);
            }
        }
    }

    /// Render the sidebar. Returns true when Close was clicked.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        open: bool,
        form: &mut ReportForm,
        selected: Option<Coordinate>,
        now: Instant,
    ) -> bool {
        let mut closed = false;
        egui::SidePanel::right("report_sidebar")
            .resizable(false)
            .exact_width(320.0)
            .show_animated(ctx, open, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(SIDEBAR_TITLE);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        closed = ui.button("Close").clicked();
                    });
                });
                ui.label(egui::RichText::new(SIDEBAR_SUBTITLE).color(egui::Color32::GRAY));
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_fields(ui, form, selected);
                    ui.add_space(12.0);
                    self.render_submit(ui, form, now);
                });
            });
        closed
    }

    fn render_fields(&mut self, ui: &mut egui::Ui, form: &mut ReportForm, selected: Option<Coordinate>) {
        ui.label("Hazard Type");
        let selected_text = form.hazard_type().map_or("Select a hazard type", HazardType::label);
        egui::ComboBox::from_id_salt("hazard_type")
            .selected_text(selected_text)
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for hazard in HazardType::ALL {
                    if ui
                        .selectable_label(form.hazard_type() == Some(hazard), hazard.label())
                        .clicked()
                    {
                        form.set_hazard_type(Some(hazard));
                        self.clear_validation(ValidationError::MissingHazardType);
                    }
                }
            });

        ui.add_space(8.0);
        ui.label("Location");
        let mut location = form.location().to_string();
        let response = ui.add(
            egui::TextEdit::singleline(&mut location)
                .hint_text(LOCATION_HINT)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            form.set_location(location);
            self.clear_validation(ValidationError::MissingLocation);
        }
        if let Some(coord) = selected {
            if ui.small_button("Use selected map location").clicked() {
                form.set_location(coord.to_string());
                self.clear_validation(ValidationError::MissingLocation);
            }
        }

        ui.add_space(8.0);
        ui.label("Description (optional)");
        let mut description = form.description().to_string();
        if ui
            .add(
                egui::TextEdit::multiline(&mut description)
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            )
            .changed()
        {
            form.set_description(description);
        }

        ui.add_space(8.0);
        ui.label("Photo or Video (optional)");
        ui.horizontal(|ui| {
            if ui.button("Choose File...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Photos and Videos", ATTACHMENT_EXTENSIONS)
                    .pick_file()
                {
                    if !Attachment::is_media(&path) {
                        warn!("Attaching file with unexpected type: {}", path.display());
                    }
                    form.set_attachment(Attachment::from_path(path));
                }
            }

            let mut clear = false;
            if let Some(attachment) = form.attachment() {
                let text = match attachment.size_bytes {
                    Some(size) => format!("{} ({})", attachment.file_name, format_size(size)),
                    None => attachment.file_name.clone(),
                };
                ui.label(egui::RichText::new(text).size(11.0))
                    .on_hover_text(attachment.path.display().to_string());
                clear = ui.small_button("✖").on_hover_text("Remove attachment").clicked();
            } else {
                ui.label(egui::RichText::new("No file chosen").color(egui::Color32::GRAY));
            }
            if clear {
                form.clear_attachment();
            }
        });
    }

    fn render_submit(&mut self, ui: &mut egui::Ui, form: &mut ReportForm, now: Instant) {
        let fill = if form.can_submit() {
            egui::Color32::from_rgb(0, 110, 180)
        } else {
            egui::Color32::from_rgb(40, 150, 80)
        };
        let button = egui::Button::new(
            egui::RichText::new(form.submit_label())
                .color(egui::Color32::WHITE)
                .strong(),
        )
        .fill(fill)
        .min_size(egui::vec2(ui.available_width(), 34.0));

        if ui.add_enabled(form.can_submit(), button).clicked() {
            self.submit(form, now);
        }

        if let Some(error) = self.validation() {
            ui.colored_label(egui::Color32::from_rgb(200, 50, 50), error.to_string());
        }
    }

    fn clear_validation(&mut self, fixed: ValidationError) {
        if self.validation == Some(fixed) {
            self.validation = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024 + 512 * 1024), "5.5 MB");
    }

    #[test]
    fn test_sidebar_copy() {
        assert_eq!(SIDEBAR_TITLE, "Report Ocean Hazard");
        assert!(SIDEBAR_SUBTITLE.contains("India's coastline"));
        assert!(LOCATION_HINT.starts_with("Location"));
    }

    #[test]
    fn test_submit_keeps_validation_error() {
        let mut sidebar = ReportSidebar::new();
        let mut form = ReportForm::new();
        let now = Instant::now();

        sidebar.submit(&mut form, now);
        assert_eq!(sidebar.validation(), Some(ValidationError::MissingHazardType));

        form.set_hazard_type(Some(HazardType::OilSpillPollution));
        sidebar.submit(&mut form, now);
        assert_eq!(sidebar.validation(), Some(ValidationError::MissingLocation));

        form.set_location("Goa");
        sidebar.submit(&mut form, now);
        assert_eq!(sidebar.validation(), None);
        assert!(!form.can_submit());
        assert_eq!(form.submit_label(), "Thank You! Report Submitted.");
    }

    #[test]
    fn test_clear_validation_only_for_fixed_field() {
        let mut sidebar = ReportSidebar::new();
        sidebar.validation = Some(ValidationError::MissingLocation);

        sidebar.clear_validation(ValidationError::MissingHazardType);
        assert_eq!(sidebar.validation(), Some(ValidationError::MissingLocation));

        sidebar.clear_validation(ValidationError::MissingLocation);
        assert_eq!(sidebar.validation(), None);
    }
}
