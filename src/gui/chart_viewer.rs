//! Chart Viewer Widget
//! Scrollable central panel laying out every dashboard section.

use crate::charts::ChartPlotter;
use crate::report::{DashboardModel, DrillDown};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;
const WARNING_COLOR: Color32 = Color32::from_rgb(220, 120, 0);

/// Central dashboard area.
#[derive(Default)]
pub struct ChartViewer {
    pub model: Option<DashboardModel>,
    pub error: Option<String>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_model(&mut self, model: DashboardModel) {
        self.model = Some(model);
        self.error = None;
    }

    pub fn set_error(&mut self, error: String) {
        self.model = None;
        self.error = Some(error);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(model) = &self.model else {
            let text = self.error.as_deref().unwrap_or("No Data");
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(text).size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::header(ui);

                for warning in &model.warnings {
                    ui.label(RichText::new(format!("⚠️ {warning}")).color(WARNING_COLOR));
                }

                ui.collapsing("🧾 Available Columns", |ui| {
                    ui.label(model.columns.join(", "));
                });
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "🗺️ Farmer Locations");
                if model.markers.is_empty() {
                    ui.label("No farmers to map.");
                } else {
                    ChartPlotter::draw_map(
                        ui,
                        &model.markers,
                        &model.regions,
                        model.view_centre,
                    );
                }
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "📊 Seasonal Yield Summary");
                ChartPlotter::draw_totals_table(
                    ui,
                    "season_summary",
                    "Season",
                    &model.season_summary,
                );
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "📈 Seasonal Yield Trends");
                ChartPlotter::draw_season_trend(ui, &model.season_trend);
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "🍍 Top Performing Fruits");
                ChartPlotter::draw_fruit_bars(ui, "top_fruits", &model.ranking, &model.fruits);
                ui.add_space(SECTION_SPACING);

                match &model.drill_down {
                    DrillDown::Rows(rows) => {
                        let title = format!("🧑‍🌾 {} Yield by Farmer", model.selected_fruit);
                        Self::section(ui, &title);
                        ChartPlotter::draw_yield_table(ui, &model.selected_fruit, rows);
                    }
                    DrillDown::Unavailable(message) => {
                        ui.label(RichText::new(format!("⚠️ {message}")).color(WARNING_COLOR));
                    }
                }
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new(format!("🔍 {}", model.banner)).strong());
                ui.add_space(5.0);
                Self::section(ui, "👤 Farmer Profiles");
                ChartPlotter::draw_profile_cards(ui, &model.profiles);
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "🏆 Fruit Ranking");
                ChartPlotter::draw_fruit_bars(
                    ui,
                    "fruit_ranking",
                    &model.ranking,
                    &model.fruits,
                );
            });
    }

    fn header(ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(Color32::from_rgb(0xe0, 0xf7, 0xfa))
            .rounding(10.0)
            .inner_margin(15.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new("Welcome, steward of data 🌱")
                        .size(18.0)
                        .strong()
                        .color(Color32::from_rgb(0x00, 0x79, 0x6b)),
                );
                ui.label(
                    RichText::new(
                        "This dashboard is built to honor farmers, guide decisions, \
                         and uplift communities with clarity and dignity.",
                    )
                    .color(Color32::from_rgb(33, 33, 33)),
                );
            });
        ui.add_space(SECTION_SPACING);
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(18.0).strong());
        ui.add_space(8.0);
    }
}
