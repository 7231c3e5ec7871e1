use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{
    GridMark, MarkerShape, Plot, PlotBounds, PlotPoint, PlotPoints, PlotResponse, Points,
};

use crate::color::marker_color;
use crate::data::query::ChartSeries;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Measurement scatter plot (central panel)
// ---------------------------------------------------------------------------

/// Render the scatter plot of the selected series in the central panel.
pub fn series_plot(ui: &mut Ui, state: &AppState) {
    let series = match &state.series {
        Some(s) => s,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Pick a device, a parameter and a date range");
            });
            return;
        }
    };

    // A series only exists for a complete selection.
    let (Some(start), Some(end)) = (state.selection.start_date, state.selection.end_date) else {
        return;
    };

    if series.is_empty() {
        ui.label(RichText::new("No measurements in range").color(Color32::GRAY));
    }

    show_series(ui, series, (start, end));
}

/// Draw `series` as a scatter plot over the selected days.
///
/// Bounds are set every frame: x spans the selected days, y is the
/// parameter's display range whatever the data holds.
fn show_series(ui: &mut Ui, series: &ChartSeries, days: (NaiveDate, NaiveDate)) -> PlotResponse<()> {
    let parameter = series.parameter;
    let [y_min, y_max] = series.y_range();
    let [x_min, x_max] = day_span(days.0, days.1);

    // NaN readings are missing data, not points.
    let points: PlotPoints = series
        .points
        .iter()
        .filter(|p| p.value.is_finite())
        .map(|p| [to_plot_x(p.time), p.value])
        .collect();

    Plot::new(("sensor_plot", parameter))
        .x_axis_label("Time")
        .y_axis_label(parameter.label())
        .x_axis_formatter(|mark: GridMark, _range| format_x(mark.value, "%b %e"))
        .label_formatter(move |_name, value: &PlotPoint| {
            format!("{}\n{}: {:.2}", format_x(value.x, "%Y-%m-%d %H:%M"), parameter, value.y)
        })
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));
            plot_ui.points(
                Points::new(points)
                    .name(parameter.label())
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(5.0)
                    .color(marker_color(parameter)),
            );
        })
}

/// Plot x extent from the start of the earlier day to the end of the later one.
fn day_span(a: NaiveDate, b: NaiveDate) -> [f64; 2] {
    let (first, last) = (a.min(b), a.max(b));
    [
        to_plot_x(first.and_time(NaiveTime::MIN)),
        to_plot_x(last.and_time(NaiveTime::MIN) + Duration::days(1)),
    ]
}

/// Plot x coordinate: seconds since the Unix epoch.
fn to_plot_x(time: NaiveDateTime) -> f64 {
    time.and_utc().timestamp() as f64
}

fn format_x(x: f64, fmt: &str) -> String {
    DateTime::from_timestamp(x.round() as i64, 0)
        .map(|dt| dt.naive_utc().format(fmt).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use eframe::egui;

    use super::*;
    use crate::data::model::Parameter;
    use crate::data::query::SeriesPoint;

    fn point(day: u32, value: f64) -> SeriesPoint {
        SeriesPoint {
            time: NaiveDate::from_ymd_opt(2018, 9, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            value,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 9, d).unwrap()
    }

    /// Run a few headless frames and return the bounds of the last one.
    fn rendered_bounds(series: &ChartSeries, days: (NaiveDate, NaiveDate)) -> PlotBounds {
        let ctx = egui::Context::default();
        let mut bounds = None;
        for _ in 0..3 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    let response = show_series(ui, series, days);
                    bounds = Some(*response.transform.bounds());
                });
            });
        }
        bounds.unwrap()
    }

    #[test]
    fn y_axis_stays_on_display_range_despite_outliers() {
        let series = ChartSeries::new(
            Parameter::AmbientTemperature,
            vec![point(12, 180.0), point(13, 20.0), point(14, -15.0)],
        );
        let bounds = rendered_bounds(&series, (day(12), day(14)));
        assert!((bounds.min()[1] - 0.0).abs() < 1e-9, "y min was {}", bounds.min()[1]);
        assert!((bounds.max()[1] - 40.0).abs() < 1e-9, "y max was {}", bounds.max()[1]);
    }

    #[test]
    fn y_axis_follows_selected_parameter() {
        let series = ChartSeries::new(Parameter::SoilTemperature, vec![point(12, 18.0)]);
        let bounds = rendered_bounds(&series, (day(12), day(12)));
        assert!((bounds.min()[1] - 0.0).abs() < 1e-9, "y min was {}", bounds.min()[1]);
        assert!((bounds.max()[1] - 70.0).abs() < 1e-9, "y max was {}", bounds.max()[1]);
    }

    #[test]
    fn x_axis_spans_whole_selected_days() {
        let series = ChartSeries::new(Parameter::SoilMoisture, Vec::new());
        let bounds = rendered_bounds(&series, (day(11), day(13)));
        assert_eq!(bounds.min()[0], to_plot_x(day(11).and_hms_opt(0, 0, 0).unwrap()));
        assert_eq!(bounds.max()[0], to_plot_x(day(14).and_hms_opt(0, 0, 0).unwrap()));
        assert_eq!(bounds.max()[1], 110.0);
    }

    #[test]
    fn day_span_orders_inverted_range() {
        assert_eq!(day_span(day(14), day(12)), day_span(day(12), day(14)));
    }

    #[test]
    fn axis_labels_round_trip_timestamps() {
        let t = NaiveDate::from_ymd_opt(2018, 9, 12)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let x = to_plot_x(t);
        assert_eq!(format_x(x, "%Y-%m-%d %H:%M"), "2018-09-12 14:30");
        assert_eq!(format_x(x, "%b %e"), "Sep 12");
    }
}
