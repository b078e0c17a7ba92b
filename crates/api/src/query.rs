//! Shared query parameter types for API handlers.

use serde::Deserialize;

use editoria_core::lifecycle::EntryStatus;
use editoria_core::types::Date;

/// Inclusive date range (`?start=YYYY-MM-DD&end=YYYY-MM-DD`).
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start: Date,
    pub end: Date,
}

/// Calendar listing filter (`?start=&end=&status=`).
#[derive(Debug, Deserialize)]
pub struct CalendarListParams {
    pub start: Date,
    pub end: Date,
    pub status: Option<EntryStatus>,
}

/// Single date (`?date=YYYY-MM-DD`).
#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: Date,
}

/// Optional result cap (`?limit=`).
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}
