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

/// Blocking alert with a single OK button
#[derive(Debug, Default)]
pub struct AlertDialog {
    message: Option<String>,
}

impl AlertDialog {
    /// Show `message`, replacing any alert still open
    pub fn open(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn dismiss(&mut self) {
        self.message = None;
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(message) = self.message() else {
            return;
        };

        let mut ok = false;
        let modal = egui::Modal::new(egui::Id::new("location_alert")).show(ctx, |ui| {
            ui.set_width(300.0);
            ui.label(egui::RichText::new(message).size(14.0));
            ui.add_space(10.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ok = ui.button("OK").clicked();
            });
        });

        if ok || modal.should_close() {
            self.dismiss();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_message_wins() {
        let mut alert = AlertDialog::default();
        assert_eq!(alert.message(), None);

        alert.open("Location not found!");
        alert.open("Unable to fetch your location.");
        assert_eq!(alert.message(), Some("Unable to fetch your location."));

        alert.dismiss();
        assert_eq!(alert.message(), None);
    }
}
