use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use common_utils::file_utils;
use tracing::{debug, info};

pub mod configuration;
mod generation;
mod writing;

pub use generation::{DailyTrafficRecord, TrafficSource};

use configuration::{GenerationConfig, SiteProfile};

/// Produces the traffic table of a single site over the configured date range.
///
/// Fails without drawing anything when the configuration or the profile does not pass its check.
pub fn generate_site_traffic<S: TrafficSource>(
    config: &GenerationConfig,
    profile: &SiteProfile,
    source: &mut S,
) -> Result<Vec<DailyTrafficRecord>> {
    config.check()?;
    profile.check()?;
    generation::traffic_generation::generate_site_traffic(
        config.start_date,
        config.end_date,
        &config.awards,
        profile,
        source,
    )
}

/// Generates every configured site in turn and writes each table to `<directory_path>/<site>_live_web_analytics.csv`.
///
/// The configuration is checked first. The directory (and its parents) is created when missing. Any I/O failure aborts the run,
/// files written for earlier sites are left in place.
pub fn run<S: TrafficSource>(
    directory_path: &Path,
    config: &GenerationConfig,
    source: &mut S,
) -> Result<Vec<PathBuf>> {
    config
        .check()
        .with_context(|| "The generation configuration is invalid")?;
    file_utils::ensure_directory(directory_path).with_context(|| {
        format!(
            "Failed creating directory: {:?}",
            directory_path.as_os_str()
        )
    })?;
    debug!(
        first_day = %config.awards.first_day(),
        last_day = %config.awards.last_day(),
        night = %config.awards.reference_date,
        "awards window"
    );
    let mut written = Vec::with_capacity(config.sites.len());
    for profile in config.sites.iter() {
        let records = generation::traffic_generation::generate_site_traffic(
            config.start_date,
            config.end_date,
            &config.awards,
            profile,
            source,
        )?;
        let file_path = file_utils::traffic_file_path(directory_path, &profile.key);
        writing::write_traffic_file(file_path.as_path(), &records)?;
        info!(
            site = %profile.key,
            rows = records.len(),
            path = ?file_path.as_os_str(),
            "traffic table written"
        );
        written.push(file_path);
    }
    Ok(written)
}
