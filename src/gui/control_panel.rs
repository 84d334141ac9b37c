//! Control Panel Widget
//! Left side panel with the Location / Farming Method filters and fruit selection.

use crate::data::RecordFilter;
use egui::{Color32, ComboBox, RichText, ScrollArea};
use std::collections::BTreeSet;

/// Filter controls for the dashboard.
pub struct ControlPanel {
    pub locations: Vec<String>,
    pub methods: Vec<String>,
    pub fruits: Vec<String>,
    pub selected_locations: BTreeSet<String>,
    pub selected_methods: BTreeSet<String>,
    pub selected_fruit: String,
    pub status: String,
}

impl ControlPanel {
    pub fn new(locations: Vec<String>, methods: Vec<String>, fruits: Vec<String>) -> Self {
        let selected_fruit = fruits.first().cloned().unwrap_or_default();
        Self {
            locations,
            methods,
            fruits,
            selected_locations: BTreeSet::new(),
            selected_methods: BTreeSet::new(),
            selected_fruit,
            status: "Ready".to_string(),
        }
    }

    /// Current Location / Farming Method selection.
    pub fn filter(&self) -> RecordFilter {
        RecordFilter {
            locations: self.selected_locations.clone(),
            methods: self.selected_methods.clone(),
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌿 Farmer Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(0, 121, 107)),
            );
            ui.label(
                RichText::new("Stewarding data for impact")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Location filter =====
        if Self::multi_select(
            ui,
            "📍 Filter by Location",
            "locations",
            &self.locations,
            &mut self.selected_locations,
        ) {
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Farming method filter =====
        if Self::multi_select(
            ui,
            "🌱 Filter by Farming Method",
            "methods",
            &self.methods,
            &mut self.selected_methods,
        ) {
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Drill-down fruit =====
        ui.label(RichText::new("🍓 Select a fruit to explore").size(14.0).strong());
        ui.add_space(5.0);
        ComboBox::from_id_salt("selected_fruit")
            .width(180.0)
            .selected_text(&self.selected_fruit)
            .show_ui(ui, |ui| {
                for fruit in &self.fruits {
                    if ui
                        .selectable_label(self.selected_fruit == *fruit, fruit)
                        .clicked()
                        && self.selected_fruit != *fruit
                    {
                        self.selected_fruit = fruit.clone();
                        action = ControlPanelAction::FiltersChanged;
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") || self.status.contains("warning") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Checkbox list with Select All / Clear All. Returns true when the selection changed.
    fn multi_select(
        ui: &mut egui::Ui,
        title: &str,
        id: &str,
        options: &[String],
        selected: &mut BTreeSet<String>,
    ) -> bool {
        let mut changed = false;

        ui.label(RichText::new(title).size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(id)
                    .max_height(140.0)
                    .show(ui, |ui| {
                        for option in options {
                            let mut checked = selected.contains(option);
                            if ui.checkbox(&mut checked, option.as_str()).changed() {
                                if checked {
                                    selected.insert(option.clone());
                                } else {
                                    selected.remove(option);
                                }
                                changed = true;
                            }
                        }
                    });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                selected.extend(options.iter().cloned());
                changed = true;
            }
            if ui.small_button("Clear All").clicked() && !selected.is_empty() {
                selected.clear();
                changed = true;
            }
        });

        changed
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    FiltersChanged,
}
