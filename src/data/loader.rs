use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::Deserialize;

use super::error::LoadError;
use super::model::{Dataset, Measurement};

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Source column names for the six retained fields.
///
/// Defaults match the farm-monitoring export (`_source.*` columns). Any field
/// may be overridden from a JSON file; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMapping {
    pub time: String,
    pub device_id: String,
    pub ambient_temperature: String,
    pub relative_humidity: String,
    pub soil_temperature: String,
    pub soil_moisture: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            time: "_source.time".to_string(),
            device_id: "_source.dev_id".to_string(),
            ambient_temperature: "_source.temperature_2".to_string(),
            relative_humidity: "_source.relative_humidity_3".to_string(),
            soil_temperature: "_source.analog_in_4".to_string(),
            soil_moisture: "_source.analog_in_5".to_string(),
        }
    }
}

impl ColumnMapping {
    fn names(&self) -> [&str; 6] {
        [
            &self.time,
            &self.device_id,
            &self.ambient_temperature,
            &self.relative_humidity,
            &self.soil_temperature,
            &self.soil_moisture,
        ]
    }
}

/// Header positions of the mapped columns, in [`ColumnMapping::names`] order.
struct ColumnIndex([usize; 6]);

impl ColumnIndex {
    fn resolve(headers: &StringRecord, mapping: &ColumnMapping) -> Result<Self, LoadError> {
        let mut idx = [0usize; 6];
        let mut missing = Vec::new();

        for (slot, name) in idx.iter_mut().zip(mapping.names()) {
            match headers.iter().position(|h| h.trim() == name) {
                Some(i) => *slot = i,
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(LoadError::Schema { missing });
        }
        log::debug!("Resolved source columns {:?} at positions {:?}", mapping.names(), idx);
        Ok(ColumnIndex(idx))
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the measurement table from a CSV file on disk.
pub fn load_file(path: &Path, mapping: &ColumnMapping) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::FileNotFound(path.to_path_buf()),
        _ => LoadError::Io(e),
    })?;
    let dataset = load_reader(file, mapping)?;

    log::info!(
        "Loaded {} measurements from {} device(s) out of {}",
        dataset.len(),
        dataset.devices().len(),
        path.display()
    );
    Ok(dataset)
}

/// Load the measurement table from any CSV source.
///
/// Keeps only the mapped columns, parses timestamps, and returns the rows
/// sorted by time. Fails on the first row that cannot be parsed.
pub fn load_reader<R: Read>(source: R, mapping: &ColumnMapping) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers()?.clone();
    let ColumnIndex([time_idx, dev_idx, ambient_idx, humidity_idx, soil_temp_idx, moisture_idx]) =
        ColumnIndex::resolve(&headers, mapping)?;

    let mut measurements = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let row = row_no + 1;
        let cell = |i: usize| record.get(i).unwrap_or("").trim();

        let time = parse_time(cell(time_idx)).ok_or_else(|| LoadError::Parse {
            row,
            column: mapping.time.clone(),
            value: cell(time_idx).to_string(),
        })?;

        let reading = |i: usize, column: &str| -> Result<f64, LoadError> {
            parse_reading(cell(i)).ok_or_else(|| LoadError::Parse {
                row,
                column: column.to_string(),
                value: cell(i).to_string(),
            })
        };

        measurements.push(Measurement {
            time,
            device_id: cell(dev_idx).to_string(),
            ambient_temperature: reading(ambient_idx, &mapping.ambient_temperature)?,
            relative_humidity: reading(humidity_idx, &mapping.relative_humidity)?,
            soil_temperature: reading(soil_temp_idx, &mapping.soil_temperature)?,
            soil_moisture: reading(moisture_idx, &mapping.soil_moisture)?,
        });
    }

    Ok(Dataset::from_measurements(measurements))
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp cell.
///
/// Offset-carrying RFC 3339 values are normalised to UTC before the offset is
/// dropped, so the calendar date is the UTC date.
fn parse_time(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Empty cell → missing reading (`NaN`); anything else must be numeric.
fn parse_reading(s: &str) -> Option<f64> {
    if s.is_empty() {
        return Some(f64::NAN);
    }
    s.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::Timelike;

    use super::*;

    const HEADER: &str = "_id,_source.time,_source.dev_id,_source.temperature_2,\
_source.relative_humidity_3,_source.analog_in_1,_source.analog_in_4,_source.analog_in_5";

    fn csv(rows: &[&str]) -> String {
        let mut s = String::from(HEADER);
        for r in rows {
            s.push('\n');
            s.push_str(r);
        }
        s
    }

    fn load(text: &str) -> Result<Dataset, LoadError> {
        load_reader(text.as_bytes(), &ColumnMapping::default())
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("farm-sensor-dash-{}-{name}", std::process::id()))
    }

    #[test]
    fn loads_renames_and_sorts() {
        let ds = load(&csv(&[
            "2,2018-09-14T08:00:00.000Z,dev-A,25.0,60,3.3,18.5,40",
            "1,2018-09-12T08:00:00.000Z,dev-A,22.5,55,3.3,17.0,42",
            "3,2018-09-13 09:30:00,dev-B,21.0,70,3.3,16.0,50",
        ]))
        .unwrap();

        assert_eq!(ds.len(), 3);
        let first = &ds.measurements()[0];
        assert_eq!(first.device_id, "dev-A");
        assert_eq!(first.date(), NaiveDate::from_ymd_opt(2018, 9, 12).unwrap());
        assert_eq!(first.ambient_temperature, 22.5);
        assert_eq!(first.relative_humidity, 55.0);
        assert_eq!(first.soil_temperature, 17.0);
        assert_eq!(first.soil_moisture, 42.0);

        assert_eq!(ds.measurements()[1].device_id, "dev-B");
        let devices: Vec<_> = ds.devices().iter().collect();
        assert_eq!(devices, vec!["dev-A", "dev-B"]);
    }

    #[test]
    fn offset_timestamps_are_taken_as_utc() {
        let ds = load(&csv(&["1,2018-09-12T23:30:00-02:00,dev-A,1,1,1,1,1"])).unwrap();
        let t = ds.measurements()[0].time;
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2018, 9, 13).unwrap());
        assert_eq!(t.hour(), 1);
    }

    #[test]
    fn bare_date_is_midnight() {
        let ds = load(&csv(&["1,2018-09-12,dev-A,1,1,1,1,1"])).unwrap();
        let t = ds.measurements()[0].time;
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2018, 9, 12).unwrap());
        assert_eq!(t.hour(), 0);
    }

    #[test]
    fn naive_t_separated_time_keeps_fraction() {
        let ds = load(&csv(&["1,2018-09-12T08:00:00.5,dev-A,1,1,1,1,1"])).unwrap();
        let t = ds.measurements()[0].time;
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2018, 9, 12).unwrap());
        assert_eq!((t.hour(), t.minute(), t.second()), (8, 0, 0));
        assert_eq!(t.nanosecond(), 500_000_000);
    }

    #[test]
    fn ragged_row_is_a_csv_error() {
        let err = load(&csv(&[
            "1,2018-09-12 08:00:00,dev-A,1,1,1,1,1",
            "2,2018-09-12 08:00:00,dev-A,1",
        ]))
        .unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)), "got {err:?}");
    }

    #[test]
    fn empty_reading_becomes_nan() {
        let ds = load(&csv(&["1,2018-09-12 08:00:00,dev-A,,55,3.3,17.0,42"])).unwrap();
        assert!(ds.measurements()[0].ambient_temperature.is_nan());
    }

    #[test]
    fn bad_time_is_a_parse_error() {
        let err = load(&csv(&[
            "1,2018-09-12 08:00:00,dev-A,1,1,1,1,1",
            "2,yesterday,dev-A,1,1,1,1,1",
        ]))
        .unwrap_err();
        match err {
            LoadError::Parse { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "_source.time");
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_reading_is_a_parse_error() {
        let err = load(&csv(&["1,2018-09-12 08:00:00,dev-A,warm,1,1,1,1"])).unwrap_err();
        assert!(matches!(err, LoadError::Parse { ref column, .. } if column == "_source.temperature_2"));
    }

    #[test]
    fn missing_columns_are_a_schema_error() {
        let text = "_source.time,_source.dev_id,_source.temperature_2\n2018-09-12,dev-A,1";
        match load(text).unwrap_err() {
            LoadError::Schema { missing } => assert_eq!(
                missing,
                vec![
                    "_source.relative_humidity_3",
                    "_source.analog_in_4",
                    "_source.analog_in_5",
                ]
            ),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn custom_mapping_selects_other_columns() {
        let mapping = ColumnMapping {
            time: "ts".into(),
            device_id: "dev".into(),
            ambient_temperature: "t_air".into(),
            relative_humidity: "rh".into(),
            soil_temperature: "t_soil".into(),
            soil_moisture: "moist".into(),
        };
        let text = "moist,t_soil,rh,t_air,dev,ts\n40,18,60,24,g1,2018-09-15 12:00:00";
        let ds = load_reader(text.as_bytes(), &mapping).unwrap();
        let m = &ds.measurements()[0];
        assert_eq!(m.device_id, "g1");
        assert_eq!(m.ambient_temperature, 24.0);
        assert_eq!(m.soil_moisture, 40.0);
    }

    #[test]
    fn missing_file_is_reported() {
        let path = temp_path("does-not-exist.csv");
        let err = load_file(&path, &ColumnMapping::default()).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(p) if p == path));
    }

    #[test]
    fn loading_twice_yields_equal_datasets() {
        let path = temp_path("round-trip.csv");
        std::fs::write(
            &path,
            csv(&[
                "2,2018-09-14T08:00:00Z,dev-A,25.0,60,3.3,18.5,40",
                "1,2018-09-12T08:00:00Z,dev-B,22.5,55,3.3,17.0,42",
            ]),
        )
        .unwrap();

        let a = load_file(&path, &ColumnMapping::default()).unwrap();
        let b = load_file(&path, &ColumnMapping::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(a, b);
    }

    #[test]
    fn mapping_json_overrides_only_given_fields() {
        let mapping: ColumnMapping = serde_json::from_str(r#"{ "device_id": "greenhouse" }"#).unwrap();
        assert_eq!(mapping.device_id, "greenhouse");
        assert_eq!(mapping.time, ColumnMapping::default().time);

        assert!(serde_json::from_str::<ColumnMapping>(r#"{ "devcie_id": "x" }"#).is_err());
    }
}
