use chrono::NaiveDate;
use rand::Rng;

use crate::configuration::{FloatRange, IntRange};

pub(crate) mod traffic_generation;

/// Source of the uniform draws behind every generated column.
///
/// Implemented for every [`Rng`]; tests may substitute a deterministic source.
pub trait TrafficSource {
    /// An integer drawn uniformly from `[range.low, range.high)`.
    fn draw_int(&mut self, range: IntRange) -> u64;
    /// A float drawn uniformly from `[range.low, range.high)`.
    fn draw_float(&mut self, range: FloatRange) -> f64;
}

impl<R: Rng> TrafficSource for R {
    fn draw_int(&mut self, range: IntRange) -> u64 {
        self.gen_range(range.low..range.high)
    }

    fn draw_float(&mut self, range: FloatRange) -> f64 {
        self.gen_range(range.low..range.high)
    }
}

/// All derived metrics for a single site on a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTrafficRecord {
    pub date: NaiveDate,
    pub visitors: u64,
    pub pageviews: u64,
    pub sessions: u64,
    pub bounced_sessions: u64,
    pub avg_session_duration_secs: u32,
    pub awards_week: bool,
    pub awards_night: bool,
}

impl From<common_utils::parsing_utils::Record> for DailyTrafficRecord {
    fn from(record: common_utils::parsing_utils::Record) -> Self {
        Self {
            date: record.date,
            visitors: record.visitors,
            pageviews: record.pageviews,
            sessions: record.sessions,
            bounced_sessions: record.bounced_sessions,
            avg_session_duration_secs: record.avg_session_duration_secs,
            awards_week: record.awards_week != 0,
            awards_night: record.awards_night != 0,
        }
    }
}
