// This module holds every parameter of the synthetic traffic generation.
// The defaults reproduce the grammy / recording academy datasets.
use std::{collections::HashSet, fs::File, io::BufReader, path::Path};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use common_utils::{date_utils::AwardsWindow, file_utils::TrafficFilesConfig};
use serde::{Deserialize, Serialize};

/// Half-open integer range `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub low: u64,
    pub high: u64,
}

impl IntRange {
    pub const fn new(low: u64, high: u64) -> Self {
        Self { low, high }
    }
}

/// Half-open float range `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub low: f64,
    pub high: f64,
}

impl FloatRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// Visitor multipliers applied around the awards event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AwardsSpike {
    /// Drawn independently for every day of the awards week.
    pub week_factor: FloatRange,
    /// Applied on top of the week factor on the awards night.
    #[serde(default = "AwardsSpike::default_night_factor")]
    pub night_factor: f64,
}

impl AwardsSpike {
    pub const DEFAULT_NIGHT_FACTOR: f64 = 5.0;

    fn default_night_factor() -> f64 {
        Self::DEFAULT_NIGHT_FACTOR
    }
}

/// The parameter ranges governing one site's synthetic traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Short key used to name the output file, see [`TrafficFilesConfig::file_name`].
    pub key: String,
    pub visitors: IntRange,
    pub pageview_ratio: FloatRange,
    pub session_ratio: FloatRange,
    pub bounce_rate: FloatRange,
    pub duration_secs: IntRange,
    /// Sites without a spike keep their base traffic through the awards window.
    #[serde(default)]
    pub awards_spike: Option<AwardsSpike>,
}

impl SiteProfile {
    /// High traffic, high volatility.
    pub fn grammy() -> Self {
        Self {
            key: "grammy".to_string(),
            visitors: IntRange::new(5000, 15000),
            pageview_ratio: FloatRange::new(1.8, 2.5),
            session_ratio: FloatRange::new(0.95, 1.1),
            bounce_rate: FloatRange::new(0.60, 0.70),
            duration_secs: IntRange::new(80, 120),
            awards_spike: Some(AwardsSpike {
                week_factor: FloatRange::new(1.5, 3.0),
                night_factor: AwardsSpike::DEFAULT_NIGHT_FACTOR,
            }),
        }
    }

    /// Roughly a tenth of the grammy traffic with more pages per visit and longer sessions.
    pub fn recording_academy() -> Self {
        Self {
            key: "ra".to_string(),
            visitors: IntRange::new(500, 1500),
            pageview_ratio: FloatRange::new(2.5, 4.0),
            session_ratio: FloatRange::new(0.90, 1.05),
            bounce_rate: FloatRange::new(0.40, 0.50),
            duration_secs: IntRange::new(120, 180),
            awards_spike: None,
        }
    }

    pub fn file_name(&self) -> String {
        TrafficFilesConfig::file_name(&self.key)
    }

    /// Rejects profiles the generator cannot sample from.
    pub fn check(&self) -> Result<()> {
        let int_ranges = [("visitors", self.visitors), ("duration_secs", self.duration_secs)];
        for (name, range) in int_ranges.iter() {
            if range.low >= range.high {
                bail!(
                    "site {}: {} range [{}, {}) is empty",
                    self.key,
                    name,
                    range.low,
                    range.high
                );
            }
        }
        let mut float_ranges = vec![
            ("pageview_ratio", self.pageview_ratio),
            ("session_ratio", self.session_ratio),
            ("bounce_rate", self.bounce_rate),
        ];
        if let Some(spike) = self.awards_spike {
            float_ranges.push(("awards_spike.week_factor", spike.week_factor));
        }
        for (name, range) in float_ranges {
            if !(range.low.is_finite() && range.high.is_finite() && range.low < range.high) {
                bail!(
                    "site {}: {} range [{}, {}) is empty or not finite",
                    self.key,
                    name,
                    range.low,
                    range.high
                );
            }
            if range.low < 0.0 {
                bail!("site {}: {} range must not be negative", self.key, name);
            }
        }
        if self.duration_secs.low == 0 {
            bail!("site {}: duration_secs must start at 1 or above", self.key);
        }
        if self.duration_secs.high > u64::from(u32::MAX) + 1 {
            bail!(
                "site {}: duration_secs must stay below {} seconds",
                self.key,
                u64::from(u32::MAX) + 1
            );
        }
        if self.pageview_ratio.low <= 1.0 {
            bail!("site {}: pageview_ratio must be greater than 1", self.key);
        }
        if self.bounce_rate.high > 1.0 {
            bail!("site {}: bounce_rate must stay within [0, 1]", self.key);
        }
        if let Some(spike) = self.awards_spike {
            if !(spike.night_factor.is_finite() && spike.night_factor >= 0.0) {
                bail!("site {}: night_factor must be a non-negative number", self.key);
            }
        }
        Ok(())
    }
}

/// Everything needed to produce the traffic files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub awards: AwardsWindow,
    pub sites: Vec<SiteProfile>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            start_date: ymd(2022, 1, 1),
            end_date: ymd(2023, 4, 30),
            awards: AwardsWindow::new(ymd(2023, 2, 5), 7),
            sites: vec![SiteProfile::grammy(), SiteProfile::recording_academy()],
        }
    }
}

impl GenerationConfig {
    /// Loads a configuration from a JSON file and checks it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open the config file: {:?}", path.as_os_str()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse the config file: {:?}", path.as_os_str()))?;
        config.check()?;
        Ok(config)
    }

    /// Rejects configurations the generator cannot sample from.
    pub fn check(&self) -> Result<()> {
        if self.end_date < self.start_date {
            bail!(
                "end date {} precedes start date {}",
                self.end_date,
                self.start_date
            );
        }
        if self.awards.half_width_days < 0 {
            bail!("the awards half width must not be negative");
        }
        let mut file_names = HashSet::new();
        for site in self.sites.iter() {
            site.check()?;
            if !file_names.insert(site.file_name()) {
                bail!("more than one site writes to {}", site.file_name());
            }
        }
        Ok(())
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("hardcoded calendar day")
}
