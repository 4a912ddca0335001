use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::models::FilterPeriod;
use crate::error::AppResult;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    // Success with message
    pub fn success_with_message(data: Option<T>, message: &str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.to_string()),
        }
    }
}

impl ApiResponse<()> {
    // Error response (no data)
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

/// `?from=&to=` window of statistics endpoints. Missing bounds default to the
/// calendar year of `today`.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl PeriodQuery {
    pub fn to_filter_period(&self, today: NaiveDate) -> AppResult<FilterPeriod> {
        let year = FilterPeriod::year_of(today);
        FilterPeriod::new(
            self.from.unwrap_or(year.start_date()),
            self.to.unwrap_or(year.end_date()),
        )
    }
}
