//! # Parsing utils
//!
//! This module contains structures and functions related to parsing synthetic traffic files.
//!

use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder};
use serde::Deserialize;
use std::{fs::File, path::Path};

/// The header row of every traffic file, in column order.
pub const TRAFFIC_HEADER: [&str; 8] = [
    "date",
    "visitors",
    "pageviews",
    "sessions",
    "bounced_sessions",
    "avg_session_duration_secs",
    "awards_week",
    "awards_night",
];

/// This represents a row/record from a traffic file (<site>_live_web_analytics.csv)
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct Record {
    /// The calendar day, written as YYYY-MM-DD.
    pub date: NaiveDate,
    pub visitors: u64,
    pub pageviews: u64,
    pub sessions: u64,
    pub bounced_sessions: u64,
    pub avg_session_duration_secs: u32,
    /// 1 if the day lies in the awards week, 0 otherwise.
    pub awards_week: u8,
    /// 1 on the awards night, 0 otherwise.
    pub awards_night: u8,
}

/// Produces a csv reader with a predefined buffer capacity that expects the traffic header row.
pub fn customised_csv_reader<P: AsRef<Path>>(
    path: P,
    buffer_capacity: usize,
) -> csv::Result<Reader<File>> {
    ReaderBuilder::new()
        .has_headers(true)
        .buffer_capacity(buffer_capacity)
        .from_path(path)
}

/// Reads back a whole traffic file.
///
/// Fails if the header does not match [`TRAFFIC_HEADER`] or if any row cannot be parsed.
pub fn read_traffic_file<P: AsRef<Path>>(path: P) -> csv::Result<Vec<Record>> {
    let mut reader = customised_csv_reader(path, 64 * 1024)?;
    let headers = reader.headers()?.clone();
    if !headers.iter().eq(TRAFFIC_HEADER.iter().copied()) {
        let message = format!(
            "unexpected header {:?}, expected {:?}",
            headers.iter().collect::<Vec<_>>(),
            TRAFFIC_HEADER
        );
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, message).into());
    }
    reader.deserialize().collect()
}
