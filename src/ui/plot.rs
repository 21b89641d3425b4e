use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoint, PlotPoints,
    Points, Polygon, Text,
};

use crate::color::{scale_position, sequential_color};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render every chart for the current selection.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
            Some(msg) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {
                ui.heading("Open a file to view the dashboard  (File → Open…)");
            }
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(msg) = &state.status_message {
                ui.label(RichText::new(msg).color(Color32::RED));
                ui.separator();
            }

            let indicator = state.indicator.as_deref().unwrap_or("");

            ui.heading(format!("{indicator} by country"));
            value_table(ui, state);
            ui.separator();

            ui.heading(format!("{indicator} distribution by continent"));
            box_plot(ui, state);
            ui.separator();

            if let Some((x, _)) = &state.view.scatter {
                ui.heading(format!("{x} vs. {indicator}"));
                scatter_plot(ui, state);
                ui.separator();
            }

            let country = state.country.as_deref().unwrap_or("");
            ui.columns(2, |cols: &mut [Ui]| {
                let title = match state.view.radar.as_ref().and_then(|r| r.year) {
                    Some(year) => format!("{country} indicators (normalized, {year})"),
                    None => format!("{country} indicators (normalized)"),
                };
                cols[0].heading(title);
                radar_chart(&mut cols[0], state);

                cols[1].heading(format!("{country} score over time"));
                score_line(&mut cols[1], state);
            });
            ui.separator();

            ui.heading(format!("{country} rank over time"));
            rank_bars(ui, state);
        });
}

// ---------------------------------------------------------------------------
// Per-country value grid (coloured with the sequential scale)
// ---------------------------------------------------------------------------

fn value_table(ui: &mut Ui, state: &AppState) {
    let values = &state.view.values;
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v.value), hi.max(v.value))
        });

    ui.push_id("value_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(true)
            .max_scroll_height(220.0)
            .column(Column::auto().at_least(160.0))
            .column(Column::auto().at_least(110.0))
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for title in ["Country", "Continent", "Year", "Value", ""] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for v in values {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(&v.country);
                        });
                        row.col(|ui| {
                            ui.label(
                                RichText::new(v.continent.to_string())
                                    .color(state.colors.color_for(v.continent)),
                            );
                        });
                        row.col(|ui| {
                            ui.label(v.year.to_string());
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.3}", v.value));
                        });
                        row.col(|ui| {
                            let color = sequential_color(scale_position(v.value, min, max));
                            let (rect, _) = ui.allocate_exact_size(
                                egui::vec2(60.0, 12.0),
                                egui::Sense::hover(),
                            );
                            ui.painter().rect_filled(rect, 2.0, color);
                        });
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Box plot per continent
// ---------------------------------------------------------------------------

/// Horizontal offset for the `j`-th point of a box, spread over
/// `[-width / 2, width / 2)` by the golden-ratio sequence so the layout is
/// stable between frames.
fn jitter(j: usize, width: f64) -> f64 {
    const GOLDEN: f64 = 0.618_033_988_749_895;
    ((j as f64 * GOLDEN).fract() - 0.5) * width
}

fn box_plot(ui: &mut Ui, state: &AppState) {
    let boxes = &state.view.boxes;
    let labels: Vec<String> = boxes.iter().map(|b| b.continent.to_string()).collect();

    Plot::new("box_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label(state.indicator.clone().unwrap_or_default())
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                labels.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, b) in boxes.iter().enumerate() {
                let color = state.colors.color_for(b.continent);
                let s = &b.summary;
                let name = b.continent.to_string();
                let elem = BoxElem::new(
                    i as f64,
                    BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max),
                )
                .name(format!("{} (n={})", b.continent, s.count))
                .box_width(0.5)
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&name));

                let points: PlotPoints = b
                    .values
                    .iter()
                    .enumerate()
                    .map(|(j, v)| [i as f64 + jitter(j, 0.4), *v])
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .radius(2.0)
                        .color(color.gamma_multiply(0.8))
                        .name(&name),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter plot coloured by continent
// ---------------------------------------------------------------------------

fn scatter_plot(ui: &mut Ui, state: &AppState) {
    let Some((x_col, points)) = &state.view.scatter else {
        return;
    };

    Plot::new("scatter_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_col.clone())
        .y_axis_label(state.indicator.clone().unwrap_or_default())
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let mut by_continent: std::collections::BTreeMap<_, Vec<[f64; 2]>> =
                std::collections::BTreeMap::new();
            for p in points {
                by_continent.entry(p.continent).or_default().push(p.xy);
            }
            for (continent, xy) in by_continent {
                plot_ui.points(
                    Points::new(PlotPoints::from(xy))
                        .radius(3.0)
                        .color(state.colors.color_for(continent))
                        .name(continent.to_string()),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Radar chart (polar polygon drawn on a square plot)
// ---------------------------------------------------------------------------

/// Unit-circle position of axis `i` of `n`, starting at twelve o'clock and
/// going clockwise.
fn axis_point(i: usize, n: usize, radius: f64) -> [f64; 2] {
    let angle = FRAC_PI_2 - TAU * i as f64 / n as f64;
    [radius * angle.cos(), radius * angle.sin()]
}

fn radar_chart(ui: &mut Ui, state: &AppState) {
    let Some(profile) = &state.view.radar else {
        ui.label("No data for this country.");
        return;
    };
    let n = profile.axes.len();
    if n < 3 {
        ui.label("Not enough indicators matched for a radar chart.");
        return;
    }

    Plot::new("radar_chart")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            // Rings at 0.25 .. 1.0 and spokes.
            for step in 1..=4 {
                let r = step as f64 / 4.0;
                let ring: PlotPoints = (0..=n).map(|i| axis_point(i % n, n, r)).collect();
                plot_ui.line(Line::new(ring).color(Color32::from_gray(90)).width(0.5));
            }
            for (i, axis) in profile.axes.iter().enumerate() {
                let spoke: PlotPoints = vec![[0.0, 0.0], axis_point(i, n, 1.0)].into();
                plot_ui.line(Line::new(spoke).color(Color32::from_gray(90)).width(0.5));
                let [x, y] = axis_point(i, n, 1.18);
                plot_ui.text(Text::new(PlotPoint::new(x, y), axis.as_str()));
            }

            let outline: PlotPoints = profile
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| axis_point(i, n, *v))
                .collect();
            plot_ui.polygon(
                Polygon::new(outline)
                    .name(&profile.country)
                    .fill_color(Color32::from_rgba_unmultiplied(33, 113, 181, 80))
                    .stroke(Stroke::new(2.0, Color32::from_rgb(33, 113, 181))),
            );
        });
}

// ---------------------------------------------------------------------------
// Score over time
// ---------------------------------------------------------------------------

fn score_line(ui: &mut Ui, state: &AppState) {
    let series = &state.view.score_over_time;
    if series.is_empty() {
        ui.label("No score data for this country.");
        return;
    }
    Plot::new("score_line")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Score")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(series.clone()))
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(series.clone()))
                    .radius(4.0)
                    .color(Color32::LIGHT_BLUE),
            );
        });
}

// ---------------------------------------------------------------------------
// Rank over time
// ---------------------------------------------------------------------------

fn rank_bars(ui: &mut Ui, state: &AppState) {
    let ranks = &state.view.rank_over_time;
    if ranks.is_empty() {
        ui.label("No rank data for this country.");
        return;
    }
    let bars: Vec<Bar> = ranks
        .iter()
        .map(|(year, rank)| {
            Bar::new(*year as f64, *rank as f64)
                .name(format!("{year}: rank {rank}"))
                .width(0.6)
        })
        .collect();

    Plot::new("rank_bars")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Rank (lower is better)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(203, 24, 29)));
        });
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn first_axis_points_up_and_axes_go_clockwise() {
        let [x, y] = axis_point(0, 4, 1.0);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 1.0, epsilon = 1e-12);
        let [x, y] = axis_point(1, 4, 0.5);
        assert_abs_diff_eq!(x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn jitter_stays_inside_the_box_and_spreads_points() {
        let offsets: Vec<f64> = (0..50).map(|j| jitter(j, 0.4)).collect();
        assert!(offsets.iter().all(|o| (-0.2..0.2).contains(o)));
        assert_eq!(jitter(7, 0.4), jitter(7, 0.4));
        let mut sorted = offsets.clone();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();
        assert_eq!(sorted.len(), offsets.len());
    }
}
