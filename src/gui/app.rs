//! Farmer Dashboard Main Application
//! Main window with the filter panel and the dashboard view.

use crate::data::schema::{FARMING_METHOD, LOCATION};
use crate::data::unique_strings;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::report::DashboardModel;
use crate::stats::SeasonalConfig;
use egui::SidePanel;
use polars::prelude::*;
use tracing::{error, info};

/// Main application window.
///
/// Owns the loaded records and the seasonal config; every filter change
/// rebuilds the whole dashboard from them.
pub struct FarmerDashboardApp {
    df: DataFrame,
    config: SeasonalConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl FarmerDashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, df: DataFrame, config: SeasonalConfig) -> Self {
        let fruits = config
            .fruit_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let control_panel = ControlPanel::new(
            unique_strings(&df, LOCATION),
            unique_strings(&df, FARMING_METHOD),
            fruits,
        );

        let mut app = Self {
            df,
            config,
            control_panel,
            chart_viewer: ChartViewer::new(),
        };
        app.rebuild();
        app
    }

    /// Re-run filter → aggregation → view-model for the current selection.
    fn rebuild(&mut self) {
        let filter = self.control_panel.filter();
        match DashboardModel::build(
            &self.df,
            &self.config,
            &filter,
            &self.control_panel.selected_fruit,
        ) {
            Ok(model) => {
                let status = match model.warnings.len() {
                    0 => format!("Showing {} records", model.record_count),
                    n => format!("Showing {} records, {n} warning(s)", model.record_count),
                };
                info!(records = model.record_count, "dashboard rebuilt");
                self.control_panel.set_status(&status);
                self.chart_viewer.set_model(model);
            }
            Err(e) => {
                error!("dashboard rebuild failed: {e}");
                self.control_panel.set_status(&format!("Error: {e}"));
                self.chart_viewer.set_error(e.to_string());
            }
        }
    }
}

impl eframe::App for FarmerDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Filters
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::FiltersChanged => self.rebuild(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
