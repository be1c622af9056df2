use std::path::PathBuf;

use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PopScopeApp {
    pub state: AppState,
}

impl PopScopeApp {
    pub fn new() -> Self {
        Self {
            state: AppState::with_data_dir(PathBuf::from("data")),
        }
    }
}

impl Default for PopScopeApp {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for PopScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: dataset, year, dimension filters ----
        egui::SidePanel::left("settings_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: summary, chart, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &self.state);
        });
    }
}
