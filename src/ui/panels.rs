use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use happiness_atlas::data::filter::ContinentFilter;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Continent ----
            ui.strong("Continent");
            let current = state.continent_filter;
            egui::ComboBox::from_id_salt("continent")
                .selected_text(current.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    let options = std::iter::once(ContinentFilter::All)
                        .chain(dataset.continents().into_iter().map(ContinentFilter::Only));
                    for option in options {
                        if ui
                            .selectable_label(current == option, option.to_string())
                            .clicked()
                        {
                            state.set_continent_filter(option);
                        }
                    }
                });
            ui.separator();

            // ---- Indicator ----
            ui.strong("Indicator");
            let current = state.indicator.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("indicator")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &dataset.schema.indicator_columns {
                        if ui.selectable_label(current == *col, col).clicked() {
                            state.set_indicator(col.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Country ----
            ui.strong("Country");
            let current = state.country.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("country")
                .selected_text(&current)
                .height(400.0)
                .show_ui(ui, |ui: &mut Ui| {
                    for country in dataset.countries() {
                        if ui.selectable_label(current == country, &country).clicked() {
                            state.set_country(country);
                        }
                    }
                });
            ui.separator();

            // ---- Hidden countries ----
            if !dataset.unresolved_countries.is_empty() {
                let header = format!(
                    "Hidden countries  ({})",
                    dataset.unresolved_countries.len()
                );
                egui::CollapsingHeader::new(RichText::new(header).strong())
                    .id_salt("unresolved")
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.label("No continent could be assigned:");
                        for name in &dataset.unresolved_countries {
                            ui.label(name);
                        }
                    });
            }

            // ---- Legend ----
            ui.separator();
            ui.strong("Legend");
            for (label, color) in state.colors.legend_entries(&dataset.continents()) {
                ui.label(RichText::new(label).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload sources").clicked() {
                state.load_startup();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
            if let Some(source) = &state.source {
                ui.separator();
                ui.label(format!("source: {source}"));
            }
            if ds.ranks_derived {
                ui.separator();
                ui.label("ranks derived from score");
            }
        }

        for warning in &state.warnings {
            ui.separator();
            ui.label(RichText::new(warning).color(Color32::YELLOW));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open happiness data")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    // Cancelling only counts as a failed upload when nothing is loaded yet.
    if file.is_none() && state.dataset.is_some() {
        log::info!("file dialog cancelled");
        return;
    }
    state.load_upload(file);
}
