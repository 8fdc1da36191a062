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

//! Application shell.
//!
//! Owns every component and the background tasks, and lays out the panels
//! each frame: header, report sidebar, then the central column with the
//! location controls, quick actions, hazard overview and the map.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use eframe::egui;
use hazard_core::{
    ConnectivityMonitor, ConnectivityStatus, HazardTally, LocationSelector, ReportForm, SharedTally,
    TallyTicker,
};
use log::info;
use tokio::runtime::Runtime;

use crate::config::AppConfig;
use crate::map::MapView;
use crate::ui::{hazard_overview, header, quick_actions, AlertDialog, ReportSidebar};

/// Sidebar visibility. Opened by the report buttons, closed only by the form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Shell {
    pub sidebar_open: bool,
}

impl Shell {
    pub fn open_sidebar(&mut self) {
        self.sidebar_open = true;
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }
}

pub struct HazardWatchApp {
    shell: Shell,
    map: MapView,
    form: ReportForm,
    sidebar: ReportSidebar,
    alert: AlertDialog,
    tally: SharedTally,
    connectivity: ConnectivityStatus,
    monitor: ConnectivityMonitor,
    ticker: TallyTicker,
    // Dropped last so the tasks above are cancelled first
    _runtime: Runtime,
}

impl std::fmt::Debug for HazardWatchApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HazardWatchApp")
            .field("shell", &self.shell)
            .field("map", &self.map)
            .field("form", &self.form)
            .field("connectivity", &self.connectivity)
            .finish_non_exhaustive()
    }
}

impl HazardWatchApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &AppConfig,
        selector: LocationSelector,
        runtime: Runtime,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();

        let repaint_ctx = ctx.clone();
        let selector = selector.with_notify(move || repaint_ctx.request_repaint());
        let map = MapView::new(&ctx, selector, config.default_zoom, config.selected_zoom);

        let tally: SharedTally = Arc::new(Mutex::new(HazardTally::default()));
        let repaint_ctx = ctx.clone();
        let ticker = TallyTicker::spawn(
            runtime.handle(),
            Arc::clone(&tally),
            config.tally_simulator(),
            move || repaint_ctx.request_repaint(),
        );

        let repaint_ctx = ctx;
        let monitor = ConnectivityMonitor::spawn(runtime.handle(), config.connectivity(), move || {
            repaint_ctx.request_repaint();
        });

        Self {
            shell: Shell::default(),
            map,
            form: ReportForm::new(),
            sidebar: ReportSidebar::new(),
            alert: AlertDialog::default(),
            tally,
            connectivity: ConnectivityStatus::default(),
            monitor,
            ticker,
            _runtime: runtime,
        }
    }

    fn tally_snapshot(&self) -> HazardTally {
        match self.tally.lock() {
            Ok(tally) => *tally,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Drain background results before drawing
    fn process_events(&mut self, ctx: &egui::Context, now: Instant) {
        while let Some(signal) = self.monitor.try_next() {
            if self.connectivity.apply(signal) {
                info!("Connectivity changed: {}", self.connectivity.label());
            }
        }

        if let Some(err) = self.map.poll(now) {
            self.alert.open(err.to_string());
        }

        self.form.tick(now);
        if let Some(remaining) = self.form.confirmation_remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }
}

impl eframe::App for HazardWatchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.process_events(ctx, now);

        header::show(ctx, &self.connectivity);

        let selected = self.map.selection().active();
        if self
            .sidebar
            .show(ctx, self.shell.sidebar_open, &mut self.form, selected, now)
        {
            self.shell.close_sidebar();
        }

        let tally = self.tally_snapshot();
        egui::CentralPanel::default().show(ctx, |ui| {
            self.map.location_panel(ui);
            ui.add_space(6.0);

            if quick_actions::show(ui) {
                self.shell.open_sidebar();
            }
            ui.add_space(6.0);

            hazard_overview::show(ui, &tally);
            ui.separator();

            self.map.show_map(ui);
        });

        if !self.shell.sidebar_open && quick_actions::floating_button(ctx) {
            self.shell.open_sidebar();
        }

        self.alert.show(ctx);
    }
}

impl Drop for HazardWatchApp {
    fn drop(&mut self) {
        self.map.shutdown();
        self.ticker.shutdown();
        self.monitor.shutdown();
        info!("Background tasks stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_opens_and_only_closes_explicitly() {
        let mut shell = Shell::default();
        assert!(!shell.sidebar_open);

        shell.open_sidebar();
        shell.open_sidebar();
        assert!(shell.sidebar_open);

        shell.close_sidebar();
        assert!(!shell.sidebar_open);
    }
}
