//! UI components for Ocean Hazard Watch.
//!
//! This module contains the panels and dialogs that make up the shell
//! around the map.

pub mod alert;
pub mod hazard_overview;
pub mod header;
pub mod quick_actions;
pub mod report_sidebar;

pub use alert::AlertDialog;
pub use report_sidebar::ReportSidebar;
