use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use super::error::QueryError;

// ---------------------------------------------------------------------------
// Parameter – the four measured quantities
// ---------------------------------------------------------------------------

/// One of the four readings a device reports.
///
/// Replaces label-string column lookup: the display label is still the
/// selection key, but access to the reading goes through [`Parameter::value_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Parameter {
    AmbientTemperature,
    RelativeHumidity,
    SoilTemperature,
    SoilMoisture,
}

impl Parameter {
    /// All parameters in selector order.
    pub const ALL: [Parameter; 4] = [
        Parameter::AmbientTemperature,
        Parameter::RelativeHumidity,
        Parameter::SoilTemperature,
        Parameter::SoilMoisture,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Parameter::AmbientTemperature => "Ambient Temperature",
            Parameter::RelativeHumidity => "Relative Humidity",
            Parameter::SoilTemperature => "Soil Temperature",
            Parameter::SoilMoisture => "Soil Moisture",
        }
    }

    /// Fixed `[min, max]` used for the chart's y axis. Not derived from data.
    pub fn display_range(self) -> [f64; 2] {
        match self {
            Parameter::AmbientTemperature => [0.0, 40.0],
            Parameter::RelativeHumidity => [0.0, 110.0],
            Parameter::SoilTemperature => [0.0, 70.0],
            Parameter::SoilMoisture => [0.0, 110.0],
        }
    }

    /// Look a parameter up by its exact display label.
    pub fn from_label(label: &str) -> Result<Self, QueryError> {
        Parameter::ALL
            .into_iter()
            .find(|p| p.label() == label)
            .ok_or_else(|| QueryError::UnknownParameter(label.to_string()))
    }

    /// Read this parameter's value out of a measurement.
    pub fn value_of(self, m: &Measurement) -> f64 {
        match self {
            Parameter::AmbientTemperature => m.ambient_temperature,
            Parameter::RelativeHumidity => m.relative_humidity,
            Parameter::SoilTemperature => m.soil_temperature,
            Parameter::SoilMoisture => m.soil_moisture,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Parameter {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameter::from_label(s)
    }
}

// ---------------------------------------------------------------------------
// Measurement – one row of the source file
// ---------------------------------------------------------------------------

/// A single sensor reading (one row of the source CSV, renamed columns only).
///
/// A missing reading in the source is stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub time: NaiveDateTime,
    pub device_id: String,
    pub ambient_temperature: f64,
    pub relative_humidity: f64,
    pub soil_temperature: f64,
    pub soil_moisture: f64,
}

impl Measurement {
    pub fn date(&self) -> NaiveDate {
        self.time.date()
    }
}

// ---------------------------------------------------------------------------
// DeviceCatalog – distinct device identifiers
// ---------------------------------------------------------------------------

/// Distinct device ids, in order of first appearance in the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceCatalog {
    devices: Vec<String>,
}

impl DeviceCatalog {
    /// Collect distinct ids, keeping the first occurrence of each.
    pub fn from_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut devices: Vec<String> = Vec::new();
        for id in ids {
            if seen.insert(id) {
                devices.push(id.to_string());
            }
        }
        DeviceCatalog { devices }
    }

    pub fn contains(&self, device_id: &str) -> bool {
        self.devices.iter().any(|d| d == device_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full, time-sorted measurement table with its device catalog.
///
/// Built once by the loader and never mutated afterwards; there are no
/// `&mut self` methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    measurements: Vec<Measurement>,
    devices: DeviceCatalog,
}

impl Dataset {
    /// Build the catalog from source order, then sort by time.
    ///
    /// The sort is stable so rows sharing a timestamp keep their source order.
    pub fn from_measurements(mut measurements: Vec<Measurement>) -> Self {
        let devices = DeviceCatalog::from_ids(measurements.iter().map(|m| m.device_id.as_str()));
        measurements.sort_by_key(|m| m.time);
        Dataset {
            measurements,
            devices,
        }
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn devices(&self) -> &DeviceCatalog {
        &self.devices
    }

    /// First and last calendar date covered, or `None` for an empty dataset.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.measurements.first()?;
        let last = self.measurements.last()?;
        Some((first.date(), last.date()))
    }

    /// Number of measurements.
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}
