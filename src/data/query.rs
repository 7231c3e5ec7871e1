use chrono::{NaiveDate, NaiveDateTime};

use super::error::QueryError;
use super::model::{Dataset, Parameter};

// ---------------------------------------------------------------------------
// Selection – what the user has picked so far
// ---------------------------------------------------------------------------

/// The user's current choice. Any field may still be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub device_id: Option<String>,
    pub parameter: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Selection {
    pub fn is_complete(&self) -> bool {
        self.device_id.is_some()
            && self.parameter.is_some()
            && self.start_date.is_some()
            && self.end_date.is_some()
    }
}

// ---------------------------------------------------------------------------
// Series types
// ---------------------------------------------------------------------------

/// One plotted point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub time: NaiveDateTime,
    pub value: f64,
}

/// `None` is "no series": the selection is incomplete.
/// `Some(vec![])` is a complete selection that matched nothing.
pub type SeriesResult = Option<Vec<SeriesPoint>>;

/// A series ready for charting, with the fixed axis range of its parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub parameter: Parameter,
    pub axis_range: [f64; 2],
    pub points: Vec<SeriesPoint>,
}

impl ChartSeries {
    pub fn new(parameter: Parameter, points: Vec<SeriesPoint>) -> Self {
        Self {
            parameter,
            axis_range: parameter.display_range(),
            points,
        }
    }

    /// The y axis range to draw: the parameter's display range.
    pub fn y_range(&self) -> [f64; 2] {
        self.axis_range
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Filter `dataset` to one device, one parameter and an inclusive date range.
///
/// * An unknown `parameter_label` is rejected, even when other fields are unset.
/// * Any unset input → `Ok(None)`.
/// * Rows match when the device id is equal (case-sensitive) and the row's
///   calendar date lies in `[start_date, end_date]`. Time of day is ignored.
/// * `start_date > end_date` or an unknown device → `Ok(Some(vec![]))`.
///
/// Output keeps the dataset's ascending time order.
pub fn query(
    dataset: &Dataset,
    device_id: Option<&str>,
    parameter_label: Option<&str>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<SeriesResult, QueryError> {
    let parameter = parameter_label.map(Parameter::from_label).transpose()?;

    let (Some(device_id), Some(parameter), Some(start), Some(end)) =
        (device_id, parameter, start_date, end_date)
    else {
        return Ok(None);
    };

    let points = dataset
        .measurements()
        .iter()
        .filter(|m| m.device_id == device_id)
        .filter(|m| (start..=end).contains(&m.date()))
        .map(|m| SeriesPoint {
            time: m.time,
            value: parameter.value_of(m),
        })
        .collect();

    Ok(Some(points))
}

/// [`query`] driven by a [`Selection`].
pub fn query_selection(dataset: &Dataset, selection: &Selection) -> Result<SeriesResult, QueryError> {
    query(
        dataset,
        selection.device_id.as_deref(),
        selection.parameter.as_deref(),
        selection.start_date,
        selection.end_date,
    )
}

// ---------------------------------------------------------------------------
// SeriesSource – the seam the UI consumes
// ---------------------------------------------------------------------------

/// Anything that can turn a [`Selection`] into a chartable series.
pub trait SeriesSource {
    fn series(&self, selection: &Selection) -> Result<Option<ChartSeries>, QueryError>;
}

impl SeriesSource for Dataset {
    fn series(&self, selection: &Selection) -> Result<Option<ChartSeries>, QueryError> {
        let parameter = selection
            .parameter
            .as_deref()
            .map(Parameter::from_label)
            .transpose()?;
        let (Some(parameter), Some(points)) = (parameter, query_selection(self, selection)?) else {
            return Ok(None);
        };
        Ok(Some(ChartSeries::new(parameter, points)))
    }
}
