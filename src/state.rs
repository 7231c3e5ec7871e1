use chrono::{NaiveDate, Utc};

use crate::data::model::{Dataset, Parameter};
use crate::data::query::{ChartSeries, Selection, SeriesSource};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Measurements loaded at startup. Read-only for the life of the app.
    pub dataset: Dataset,

    /// Current device / parameter / date-range choice.
    pub selection: Selection,

    /// Result of the last query (cached); `None` while the selection is incomplete.
    pub series: Option<ChartSeries>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            selection: Selection::default(),
            series: None,
            status_message: None,
        }
    }

    /// Re-run the query for the current selection.
    pub fn refresh(&mut self) {
        match self.dataset.series(&self.selection) {
            Ok(series) => {
                match &series {
                    Some(s) => log::debug!(
                        "{:?} → {} point(s) of {}",
                        self.selection,
                        s.points.len(),
                        s.parameter
                    ),
                    None => log::debug!("{:?} is incomplete, nothing to plot", self.selection),
                }
                self.series = series;
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Query rejected: {e}");
                self.series = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn set_device(&mut self, device_id: Option<String>) {
        if let Some(dev) = device_id.as_deref().filter(|d| !self.dataset.devices().contains(d)) {
            log::warn!("Device '{dev}' is not in the dataset");
        }
        self.selection.device_id = device_id;
        self.refresh();
    }

    pub fn set_parameter(&mut self, parameter: Option<Parameter>) {
        self.selection.parameter = parameter.map(|p| p.label().to_string());
        self.refresh();
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.selection.start_date = date;
        self.refresh();
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        self.selection.end_date = date;
        self.refresh();
    }

    /// Clear every selection field.
    pub fn reset(&mut self) {
        self.selection = Selection::default();
        self.refresh();
    }

    /// Date a picker starts at when first switched on: the data's first
    /// (start) or last (end) day, today if there is no data.
    pub fn default_date(&self, end: bool) -> NaiveDate {
        match self.dataset.date_bounds() {
            Some((first, last)) => {
                if end {
                    last
                } else {
                    first
                }
            }
            None => Utc::now().date_naive(),
        }
    }

    /// Currently selected parameter, if its label is a known one.
    pub fn selected_parameter(&self) -> Option<Parameter> {
        self.selection
            .parameter
            .as_deref()
            .and_then(|label| label.parse::<Parameter>().ok())
    }
}
