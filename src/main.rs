mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::SensorDashApp;
use clap::Parser;
use eframe::egui;

use config::Cli;
use data::loader;
use data::model::Dataset;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mapping = cli.column_mapping()?;

    // The dataset is loaded once, before any window exists; failure is fatal.
    let dataset = loader::load_file(&cli.data, &mapping)
        .with_context(|| format!("loading {}", cli.data.display()))
        .inspect_err(|e| log::error!("{e:#}"))?;

    if cli.print_summary {
        for line in summary(&dataset) {
            println!("{line}");
        }
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Farm Sensor Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SensorDashApp::new(dataset)))),
    )
    .map_err(|e| anyhow!("running UI: {e}"))
}

/// Human-readable overview of a loaded dataset: rows, devices, date span.
fn summary(dataset: &Dataset) -> Vec<String> {
    let mut lines = vec![format!("Measurements: {}", dataset.len())];

    let devices = dataset.devices();
    if devices.is_empty() {
        lines.push("Devices: none".to_string());
    } else {
        let names: Vec<&str> = devices.iter().collect();
        lines.push(format!("Devices ({}): {}", devices.len(), names.join(", ")));
    }

    match dataset.date_bounds() {
        Some((first, last)) => lines.push(format!("Span: {first} to {last}")),
        None => lines.push("Span: no measurements".to_string()),
    }
    lines
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::Measurement;

    fn row(day: u32, dev: &str) -> Measurement {
        Measurement {
            time: NaiveDate::from_ymd_opt(2018, 9, day)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            device_id: dev.to_string(),
            ambient_temperature: 20.0,
            relative_humidity: 60.0,
            soil_temperature: 18.0,
            soil_moisture: 40.0,
        }
    }

    #[test]
    fn summary_reports_rows_devices_and_span() {
        let ds = Dataset::from_measurements(vec![
            row(22, "greenhouse-south"),
            row(11, "greenhouse-north"),
            row(15, "greenhouse-south"),
        ]);
        assert_eq!(
            summary(&ds),
            vec![
                "Measurements: 3",
                "Devices (2): greenhouse-south, greenhouse-north",
                "Span: 2018-09-11 to 2018-09-22",
            ]
        );
    }

    #[test]
    fn summary_of_empty_dataset() {
        let ds = Dataset::from_measurements(Vec::new());
        assert_eq!(
            summary(&ds),
            vec!["Measurements: 0", "Devices: none", "Span: no measurements"]
        );
    }
}
