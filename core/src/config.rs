use crate::error::{GenError, GenResult};
use chrono::{
    format::{Item, StrftimeItems},
    NaiveDate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_NUMBER_FORMAT: &str = "en";
pub const DEFAULT_SEPARATOR: &str = ",";

/// Immutable description of one reporting period.
///
/// Only the two reporting dates feed the generator. The remaining fields
/// are presentation settings carried through to the exported document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportingSettings {
    pub previous_reporting_date: NaiveDate,
    pub current_reporting_date: NaiveDate,
    #[serde(default)]
    pub consideration_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub consideration_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub with_cutoff: bool,
    #[serde(default)]
    pub income_amount: f64,
    #[serde(default)]
    pub is_percentual_interest: bool,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_number_format")]
    pub number_format: String,
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.into()
}

fn default_number_format() -> String {
    DEFAULT_NUMBER_FORMAT.into()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.into()
}

impl ReportingSettings {
    /// Settings for the period `[previous, current]` with default
    /// presentation fields. Fails if the period is empty or reversed.
    pub fn new(previous: NaiveDate, current: NaiveDate) -> GenResult<Self> {
        let settings = Self {
            previous_reporting_date: previous,
            current_reporting_date: current,
            consideration_start_date: None,
            consideration_end_date: None,
            with_cutoff: false,
            income_amount: 0.0,
            is_percentual_interest: false,
            date_format: default_date_format(),
            number_format: default_number_format(),
            separator: default_separator(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Load from a JSON settings file.
    /// In tests, use ReportingSettings::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let settings: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reporting year 2020: 2020-01-01 .. 2020-12-31.
    pub fn default_test() -> Self {
        Self {
            previous_reporting_date: ymd(2020, 1, 1),
            current_reporting_date: ymd(2020, 12, 31),
            consideration_start_date: None,
            consideration_end_date: None,
            with_cutoff: false,
            income_amount: 0.0,
            is_percentual_interest: false,
            date_format: default_date_format(),
            number_format: default_number_format(),
            separator: default_separator(),
        }
    }

    pub fn validate(&self) -> GenResult<()> {
        if self.previous_reporting_date >= self.current_reporting_date {
            return Err(GenError::invalid_config(format!(
                "previousReportingDate ({}) must be before currentReportingDate ({})",
                self.previous_reporting_date, self.current_reporting_date
            )));
        }
        if let (Some(start), Some(end)) =
            (self.consideration_start_date, self.consideration_end_date)
        {
            if start > end {
                return Err(GenError::invalid_config(format!(
                    "considerationStartDate ({start}) is after considerationEndDate ({end})"
                )));
            }
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(GenError::invalid_config(format!(
                "dateFormat '{}' is not a valid strftime pattern",
                self.date_format
            )));
        }
        Ok(())
    }

    pub fn consideration_start(&self) -> NaiveDate {
        self.consideration_start_date
            .unwrap_or(self.previous_reporting_date)
    }

    pub fn consideration_end(&self) -> NaiveDate {
        self.consideration_end_date
            .unwrap_or(self.current_reporting_date)
    }
}

/// Only for hard-coded calendar dates.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid built-in date {year}-{month:02}-{day:02}"))
}
