//! Chart Plotter Module
//! Draws the dashboard widgets using egui_plot.

use crate::data::Coordinate;
use crate::report::{FarmerProfile, MapMarker, Region};
use crate::stats::{FruitRanking, RecordYield};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points, Polygon};

pub const MARKER_COLOR: Color32 = Color32::from_rgb(0, 128, 0);
pub const REGION_FILL: Color32 = Color32::from_rgba_premultiplied(0, 0, 40, 40);
pub const REGION_STROKE: Color32 = Color32::from_rgba_premultiplied(0, 0, 200, 200);
pub const TREND_COLOR: Color32 = Color32::from_rgb(52, 152, 219);

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

const CHART_HEIGHT: f32 = 320.0;
/// Half-width, in degrees, of the map area shown around the view centre.
const MAP_VIEW_HALF_SPAN: f64 = 0.15;
const PROFILE_COLUMNS: usize = 5;

/// Draws the individual dashboard widgets.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Farmer markers plus a blue square around each selected location.
    ///
    /// The initial bounds always cover the area around `centre`.
    pub fn draw_map(
        ui: &mut egui::Ui,
        markers: &[MapMarker],
        regions: &[Region],
        centre: Option<Coordinate>,
    ) {
        let mut plot = Plot::new("farmer_map")
            .height(420.0)
            .data_aspect(1.0)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .allow_scroll(false)
            .label_formatter(|name, value| {
                let point = format!("lat {:.4}, lon {:.4}", value.y, value.x);
                if name.is_empty() {
                    point
                } else {
                    format!("{name}\n{point}")
                }
            });
        if let Some(([min_lon, min_lat], [max_lon, max_lat])) = centre.map(Self::view_bounds) {
            plot = plot
                .include_x(min_lon)
                .include_x(max_lon)
                .include_y(min_lat)
                .include_y(max_lat);
        }

        plot.show(ui, |plot_ui| {
            for region in regions {
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(region.ring.clone()))
                        .fill_color(REGION_FILL)
                        .stroke(egui::Stroke::new(2.0, REGION_STROKE))
                        .name(&region.location),
                );
            }

            for marker in markers {
                let c = marker.coordinate;
                plot_ui.points(
                    Points::new(vec![[c.longitude, c.latitude]])
                        .radius(4.0)
                        .color(MARKER_COLOR)
                        .name(&marker.farmer),
                );
            }
        });
    }

    /// Line chart of season column totals, in the order given.
    pub fn draw_season_trend(ui: &mut egui::Ui, season_totals: &[(String, f64)]) {
        let labels: Vec<String> = season_totals.iter().map(|(s, _)| s.clone()).collect();
        let points: Vec<[f64; 2]> = season_totals
            .iter()
            .enumerate()
            .map(|(i, (_, total))| [i as f64, *total])
            .collect();

        Plot::new("season_trend")
            .height(CHART_HEIGHT)
            .x_axis_label("Season")
            .y_axis_label("Total Yield")
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .color(TREND_COLOR)
                        .width(2.0)
                        .name("Total Yield"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .radius(4.0)
                        .color(TREND_COLOR),
                );
            });
    }

    /// `[lon, lat]` corners of the map area around a centre point.
    fn view_bounds(centre: Coordinate) -> ([f64; 2], [f64; 2]) {
        let (lat, lon, d) = (centre.latitude, centre.longitude, MAP_VIEW_HALF_SPAN);
        ([lon - d, lat - d], [lon + d, lat + d])
    }

    /// Bar chart of fruit totals, highest first; each fruit keeps its own colour.
    pub fn draw_fruit_bars(
        ui: &mut egui::Ui,
        id: &str,
        ranking: &FruitRanking,
        fruit_order: &[String],
    ) {
        let labels: Vec<String> = ranking.iter().map(|(f, _)| f.clone()).collect();
        let bars: Vec<Bar> = ranking
            .iter()
            .enumerate()
            .map(|(i, (fruit, total))| {
                Bar::new(i as f64, *total)
                    .name(fruit)
                    .fill(Self::fruit_color(fruit_order, fruit))
                    .width(0.6)
            })
            .collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .x_axis_label("Fruit")
            .y_axis_label("Total Yield")
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }

    fn fruit_color(fruit_order: &[String], fruit: &str) -> Color32 {
        let idx = fruit_order.iter().position(|f| f == fruit).unwrap_or(0);
        PALETTE[idx % PALETTE.len()]
    }

    fn category_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if idx < 0.0 || (idx - value).abs() > f64::EPSILON {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// Two-column table: name and total.
    pub fn draw_totals_table(ui: &mut egui::Ui, id: &str, header: &str, rows: &[(String, f64)]) {
        Self::table_frame(ui, |ui| {
            egui::Grid::new(ui.make_persistent_id(id))
                .striped(true)
                .min_col_width(120.0)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    ui.label(RichText::new(header).strong());
                    ui.label(RichText::new("Total Fruits").strong());
                    ui.end_row();

                    for (name, total) in rows {
                        ui.label(name.as_str());
                        ui.label(format!("{total}"));
                        ui.end_row();
                    }
                });
        });
    }

    /// Per-farmer yield table for the drill-down fruit.
    pub fn draw_yield_table(ui: &mut egui::Ui, fruit: &str, rows: &[RecordYield]) {
        Self::table_frame(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("yield_table_scroll")
                .max_height(260.0)
                .show(ui, |ui| {
                    egui::Grid::new(ui.make_persistent_id(format!("yield_table_{fruit}")))
                        .striped(true)
                        .min_col_width(120.0)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            ui.label(RichText::new("Farmer Name").strong());
                            ui.label(RichText::new("Location").strong());
                            ui.label(RichText::new("Total Yield").strong());
                            ui.end_row();

                            for row in rows {
                                ui.label(row.farmer.as_str());
                                ui.label(row.location.as_str());
                                ui.label(format!("{}", row.total));
                                ui.end_row();
                            }
                        });
                });
        });
    }

    /// Farmer cards in a five-column layout, tinted by farming method.
    pub fn draw_profile_cards(ui: &mut egui::Ui, profiles: &[FarmerProfile]) {
        ui.columns(PROFILE_COLUMNS, |columns| {
            for (i, profile) in profiles.iter().enumerate() {
                let ui = &mut columns[i % PROFILE_COLUMNS];
                let [r, g, b] = profile.tint.rgb();
                let text = Color32::from_rgb(33, 33, 33);

                egui::Frame::none()
                    .fill(Color32::from_rgb(r, g, b))
                    .stroke(egui::Stroke::new(1.0, Color32::from_rgb(204, 204, 204)))
                    .rounding(8.0)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(
                            RichText::new(format!("👤 {}", profile.farmer))
                                .strong()
                                .color(text),
                        );
                        ui.label(
                            RichText::new(format!("📍 Location: {}", profile.location))
                                .color(text),
                        );
                        ui.label(
                            RichText::new(format!(
                                "🌱 Farming Method: {}",
                                profile.farming_method
                            ))
                            .color(text),
                        );
                        ui.label(
                            RichText::new(format!("💧 Irrigation Type: {}", profile.irrigation))
                                .color(text),
                        );
                    });
                ui.add_space(10.0);
            }
        });
    }

    fn table_frame(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, add_contents);
    }
}
