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

//! Hazard report form.
//!
//! The form is a small state machine: `Idle` until the first edit, `Filling`
//! while the user edits, `Submitted` for [`SUBMIT_RESET_DELAY`] after a
//! successful submit, then back to `Filling` with the fields kept.
//!
//! Submitting only logs the report. Nothing is transmitted or stored.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{error, info};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// How long the "submitted" confirmation stays up.
pub const SUBMIT_RESET_DELAY: Duration = Duration::from_secs(3);

/// File extensions accepted as a photo or video attachment.
pub const ATTACHMENT_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "heic", "bmp", "mp4", "mov", "m4v", "webm", "mkv", "avi",
];

/// Report categories offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HazardType {
    #[serde(rename = "Cyclone/Storm")]
    CycloneStorm,
    #[serde(rename = "Tsunami/Flood")]
    TsunamiFlood,
    #[serde(rename = "Oil Spill/Pollution")]
    OilSpillPollution,
    #[serde(rename = "Rip Current")]
    RipCurrent,
    #[serde(rename = "Debris/Navigation Hazard")]
    DebrisNavigation,
    #[serde(rename = "Missing Person")]
    MissingPerson,
    #[serde(rename = "Other")]
    Other,
}

impl HazardType {
    pub const ALL: [HazardType; 7] = [
        HazardType::CycloneStorm,
        HazardType::TsunamiFlood,
        HazardType::OilSpillPollution,
        HazardType::RipCurrent,
        HazardType::DebrisNavigation,
        HazardType::MissingPerson,
        HazardType::Other,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            HazardType::CycloneStorm => "Cyclone/Storm",
            HazardType::TsunamiFlood => "Tsunami/Flood",
            HazardType::OilSpillPollution => "Oil Spill/Pollution",
            HazardType::RipCurrent => "Rip Current",
            HazardType::DebrisNavigation => "Debris/Navigation Hazard",
            HazardType::MissingPerson => "Missing Person",
            HazardType::Other => "Other",
        }
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single photo or video picked for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: Option<u64>,
}

impl Attachment {
    /// Describe the file at `path`. The size is read if the file exists.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let size_bytes = std::fs::metadata(&path).ok().map(|m| m.len());
        Self {
            path,
            file_name,
            size_bytes,
        }
    }

    /// Whether `path` has one of the [`ATTACHMENT_EXTENSIONS`].
    #[must_use]
    pub fn is_media(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ATTACHMENT_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
    }
}

/// A validated report, built on submit.
#[derive(Debug, Clone, Serialize)]
pub struct HazardReport {
    pub id: Uuid,
    pub hazard_type: HazardType,
    pub location: String,
    pub description: Option<String>,
    pub attachment: Option<Attachment>,
    pub submitted_at: DateTime<Utc>,
}

/// Form lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Filling,
    Submitted { at: Instant },
}

/// Reasons a submit is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a hazard type.")]
    MissingHazardType,

    #[error("Please enter a location.")]
    MissingLocation,

    #[error("A report was just submitted.")]
    AlreadySubmitted,
}

/// Local state of the report form.
#[derive(Debug, Clone)]
pub struct ReportForm {
    hazard_type: Option<HazardType>,
    location: String,
    description: String,
    attachment: Option<Attachment>,
    state: FormState,
}

impl Default for ReportForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportForm {
    #[must_use]
    pub fn new() -> Self {
        Self {
            hazard_type: None,
            location: String::new(),
            description: String::new(),
            attachment: None,
            state: FormState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> FormState {
        self.state
    }

    #[must_use]
    pub fn hazard_type(&self) -> Option<HazardType> {
        self.hazard_type
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    fn touch(&mut self) {
        if self.state == FormState::Idle {
            self.state = FormState::Filling;
        }
    }

    pub fn set_hazard_type(&mut self, hazard_type: Option<HazardType>) {
        self.hazard_type = hazard_type;
        self.touch();
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    /// Replace any previous attachment.
    pub fn set_attachment(&mut self, attachment: Attachment) {
        self.attachment = Some(attachment);
        self.touch();
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
        self.touch();
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !matches!(self.state, FormState::Submitted { .. })
    }

    /// Label of the submit control for the current state.
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.can_submit() {
            "Submit Report"
        } else {
            "Thank You! Report Submitted."
        }
    }

    /// Validate the form and simulate a submit at `now`.
    ///
    /// The report is logged and returned. Fields are kept.
    pub fn submit(&mut self, now: Instant) -> Result<HazardReport, ValidationError> {
        if !self.can_submit() {
            return Err(ValidationError::AlreadySubmitted);
        }
        let hazard_type = self.hazard_type.ok_or(ValidationError::MissingHazardType)?;
        let location = self.location.trim();
        if location.is_empty() {
            return Err(ValidationError::MissingLocation);
        }

        let description = self.description.trim();
        let report = HazardReport {
            id: Uuid::new_v4(),
            hazard_type,
            location: location.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            attachment: self.attachment.clone(),
            submitted_at: Utc::now(),
        };

        match serde_json::to_string(&report) {
            Ok(json) => info!("Hazard report submitted (not transmitted): {}", json),
            Err(e) => error!("Failed to serialize hazard report {}: {}", report.id, e),
        }

        self.state = FormState::Submitted { at: now };
        Ok(report)
    }

    /// Advance timers. Returns `true` when the confirmation just ended.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state {
            FormState::Submitted { at } if now.saturating_duration_since(at) >= SUBMIT_RESET_DELAY => {
                self.state = FormState::Filling;
                true
            }
            _ => false,
        }
    }

    /// Time left before the confirmation ends, if one is showing.
    #[must_use]
    pub fn confirmation_remaining(&self, now: Instant) -> Option<Duration> {
        match self.state {
            FormState::Submitted { at } => {
                Some(SUBMIT_RESET_DELAY.saturating_sub(now.saturating_duration_since(at)))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(hazard: Option<HazardType>, location: &str) -> ReportForm {
        let mut form = ReportForm::new();
        form.set_hazard_type(hazard);
        form.set_location(location);
        form
    }

    #[test]
    fn test_new_form_is_idle() {
        let form = ReportForm::new();
        assert_eq!(form.state(), FormState::Idle);
        assert!(form.can_submit());
        assert_eq!(form.submit_label(), "Submit Report");
    }

    #[test]
    fn test_first_edit_starts_filling() {
        let mut form = ReportForm::new();
        form.set_description("Oil sheen");
        assert_eq!(form.state(), FormState::Filling);
    }

    #[test]
    fn test_missing_hazard_type_rejected() {
        let mut form = filled(None, "Goa");
        assert_eq!(form.submit(Instant::now()).unwrap_err(), ValidationError::MissingHazardType);
        assert_eq!(form.state(), FormState::Filling);
    }

    #[test]
    fn test_blank_location_rejected() {
        let mut form = filled(Some(HazardType::RipCurrent), "  ");
        assert_eq!(form.submit(Instant::now()).unwrap_err(), ValidationError::MissingLocation);
        assert_eq!(form.state(), FormState::Filling);

        let mut empty = filled(Some(HazardType::RipCurrent), "");
        assert!(empty.submit(Instant::now()).is_err());
        assert_eq!(empty.state(), FormState::Filling);
    }

    #[test]
    fn test_submit_then_reset_keeps_fields() {
        let mut form = filled(Some(HazardType::OilSpillPollution), "Goa");
        let start = Instant::now();

        let report = form.submit(start).unwrap();
        assert_eq!(report.hazard_type, HazardType::OilSpillPollution);
        assert_eq!(report.location, "Goa");
        assert_eq!(report.description, None);
        assert_eq!(report.attachment, None);

        assert_eq!(form.state(), FormState::Submitted { at: start });
        assert!(!form.can_submit());
        assert_eq!(form.submit_label(), "Thank You! Report Submitted.");
        assert_eq!(form.submit(start).unwrap_err(), ValidationError::AlreadySubmitted);

        assert!(!form.tick(start + Duration::from_millis(2_999)));
        assert!(!form.can_submit());

        assert!(form.tick(start + SUBMIT_RESET_DELAY));
        assert_eq!(form.state(), FormState::Filling);
        assert!(form.can_submit());
        assert_eq!(form.hazard_type(), Some(HazardType::OilSpillPollution));
        assert_eq!(form.location(), "Goa");
    }

    #[test]
    fn test_confirmation_remaining() {
        let mut form = filled(Some(HazardType::Other), "Kochi");
        let start = Instant::now();
        assert_eq!(form.confirmation_remaining(start), None);

        form.submit(start).unwrap();
        assert_eq!(
            form.confirmation_remaining(start + Duration::from_secs(1)),
            Some(Duration::from_secs(2))
        );
        assert_eq!(
            form.confirmation_remaining(start + Duration::from_secs(10)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_description_is_trimmed() {
        let mut form = filled(Some(HazardType::DebrisNavigation), " Mangalore ");
        form.set_description("  floating logs near the harbour  ");
        let report = form.submit(Instant::now()).unwrap();
        assert_eq!(report.location, "Mangalore");
        assert_eq!(report.description.as_deref(), Some("floating logs near the harbour"));
    }

    #[test]
    fn test_attachment_replace_and_clear() {
        let mut form = ReportForm::new();
        form.set_attachment(Attachment::from_path("/tmp/first.jpg"));
        form.set_attachment(Attachment::from_path("/tmp/second.mp4"));
        assert_eq!(form.attachment().map(|a| a.file_name.as_str()), Some("second.mp4"));

        form.clear_attachment();
        assert_eq!(form.attachment(), None);
        assert_eq!(form.state(), FormState::Filling);
    }

    #[test]
    fn test_is_media() {
        assert!(Attachment::is_media(Path::new("wave.JPG")));
        assert!(Attachment::is_media(Path::new("clip.mov")));
        assert!(!Attachment::is_media(Path::new("notes.txt")));
        assert!(!Attachment::is_media(Path::new("no_extension")));
    }

    #[test]
    fn test_hazard_type_labels_match_serialized_names() {
        assert_eq!(HazardType::ALL.len(), 7);
        for hazard in HazardType::ALL {
            let json = serde_json::to_value(hazard).unwrap();
            assert_eq!(json, serde_json::Value::from(hazard.label()));
        }
    }

    #[test]
    fn test_report_serializes_labels() {
        let mut form = filled(Some(HazardType::OilSpillPollution), "Goa");
        let report = form.submit(Instant::now()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["hazard_type"], "Oil Spill/Pollution");
        assert_eq!(json["location"], "Goa");
        assert!(json["description"].is_null());
    }
}
