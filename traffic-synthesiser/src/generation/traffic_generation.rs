use super::*;

use std::convert::TryFrom;

use anyhow::{Context, Result};
use common_utils::date_utils::{self, AwardsWindow};

use crate::configuration::SiteProfile;

/// Produces one record per day of `[start, end]` for the given site.
///
/// Visitors are drawn first and spiked over the awards window: every awards-week day is
/// multiplied by its own week factor and the awards night is then multiplied by the night
/// factor as well, so the night compounds both. Pageviews and sessions derive from the
/// spiked visitors, bounced sessions from sessions. Counts are truncated at the very end.
pub(crate) fn generate_site_traffic<S: TrafficSource>(
    start: NaiveDate,
    end: NaiveDate,
    awards: &AwardsWindow,
    profile: &SiteProfile,
    source: &mut S,
) -> Result<Vec<DailyTrafficRecord>> {
    let days = date_utils::days_inclusive(start, end);
    let (awards_week, awards_night) = awards.masks(&days);

    days.into_iter()
        .zip(awards_week.into_iter().zip(awards_night.into_iter()))
        .map(|(date, (is_week, is_night))| -> Result<DailyTrafficRecord> {
            let mut visitors = source.draw_int(profile.visitors) as f64;
            if let Some(spike) = profile.awards_spike {
                if is_week {
                    visitors *= source.draw_float(spike.week_factor);
                }
                if is_night {
                    visitors *= spike.night_factor;
                }
            }
            let pageviews = visitors * source.draw_float(profile.pageview_ratio);
            let sessions = visitors * source.draw_float(profile.session_ratio);
            let bounced_sessions = sessions * source.draw_float(profile.bounce_rate);
            let duration = source.draw_int(profile.duration_secs);
            let avg_session_duration_secs = u32::try_from(duration).with_context(|| {
                format!(
                    "site {}: duration of {} seconds does not fit a u32",
                    profile.key, duration
                )
            })?;
            Ok(DailyTrafficRecord {
                date,
                visitors: visitors as u64,
                pageviews: pageviews as u64,
                sessions: sessions as u64,
                bounced_sessions: bounced_sessions as u64,
                avg_session_duration_secs,
                awards_week: is_week,
                awards_night: is_night,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{AwardsSpike, FloatRange, GenerationConfig, IntRange};
    use itertools::Itertools;
    use rand::prelude::*;
    use rand_pcg::Pcg64;

    // Always answers with the middle of the requested range.
    struct MidpointSource;

    impl TrafficSource for MidpointSource {
        fn draw_int(&mut self, range: IntRange) -> u64 {
            range.low + (range.high - range.low) / 2
        }

        fn draw_float(&mut self, range: FloatRange) -> f64 {
            (range.low + range.high) / 2.0
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Ranges whose midpoints are exact in binary floating point.
    fn mock_profile() -> SiteProfile {
        SiteProfile {
            key: "mock".to_string(),
            visitors: IntRange::new(1000, 3000),
            pageview_ratio: FloatRange::new(1.5, 2.5),
            session_ratio: FloatRange::new(0.5, 1.5),
            bounce_rate: FloatRange::new(0.25, 0.75),
            duration_secs: IntRange::new(100, 200),
            awards_spike: Some(AwardsSpike {
                week_factor: FloatRange::new(1.5, 2.5),
                night_factor: 5.0,
            }),
        }
    }

    fn default_traffic(profile: &SiteProfile, seed: u64) -> Vec<DailyTrafficRecord> {
        let config = GenerationConfig::default();
        let mut rng = Pcg64::seed_from_u64(seed);
        generate_site_traffic(
            config.start_date,
            config.end_date,
            &config.awards,
            profile,
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn midpoint_rows_outside_the_awards_window() {
        let awards = AwardsWindow::new(ymd(2023, 2, 5), 7);
        let records = generate_site_traffic(
            ymd(2022, 1, 1),
            ymd(2022, 1, 3),
            &awards,
            &mock_profile(),
            &mut MidpointSource,
        )
        .unwrap();
        let expected: Vec<DailyTrafficRecord> = [ymd(2022, 1, 1), ymd(2022, 1, 2), ymd(2022, 1, 3)]
            .iter()
            .map(|date| DailyTrafficRecord {
                date: *date,
                visitors: 2000,
                pageviews: 4000,
                sessions: 2000,
                bounced_sessions: 1000,
                avg_session_duration_secs: 150,
                awards_week: false,
                awards_night: false,
            })
            .collect();
        assert_eq!(expected, records);
    }

    #[test]
    fn midpoint_rows_compound_week_and_night_spikes() {
        let awards = AwardsWindow::new(ymd(2023, 2, 5), 7);
        let records = generate_site_traffic(
            ymd(2023, 1, 28),
            ymd(2023, 2, 5),
            &awards,
            &mock_profile(),
            &mut MidpointSource,
        )
        .unwrap();
        // 2023-01-28 lies just before the week.
        assert_eq!(2000, records[0].visitors);
        assert!(!records[0].awards_week);
        // inside the week: 2000 * 2.0
        assert_eq!(4000, records[1].visitors);
        assert_eq!(8000, records[1].pageviews);
        assert!(records[1].awards_week && !records[1].awards_night);
        // the night: 2000 * 2.0 * 5.0
        let night = records.last().unwrap();
        assert_eq!(20_000, night.visitors);
        assert_eq!(40_000, night.pageviews);
        assert_eq!(20_000, night.sessions);
        assert_eq!(10_000, night.bounced_sessions);
        assert!(night.awards_week && night.awards_night);
    }

    #[test]
    fn sites_without_a_spike_keep_base_traffic_but_carry_flags() {
        let mut profile = mock_profile();
        profile.awards_spike = None;
        let awards = AwardsWindow::new(ymd(2023, 2, 5), 7);
        let records = generate_site_traffic(
            ymd(2023, 2, 1),
            ymd(2023, 2, 10),
            &awards,
            &profile,
            &mut MidpointSource,
        )
        .unwrap();
        assert!(records.iter().all(|record| record.visitors == 2000));
        assert!(records.iter().all(|record| record.awards_week));
        assert_eq!(1, records.iter().filter(|record| record.awards_night).count());
    }

    #[test]
    fn oversized_durations_are_an_error_rather_than_truncated() {
        let mut profile = mock_profile();
        profile.duration_secs = IntRange::new(4_294_967_296, 4_294_967_298);
        let awards = AwardsWindow::new(ymd(2023, 2, 5), 7);
        let generated = generate_site_traffic(
            ymd(2022, 1, 1),
            ymd(2022, 1, 3),
            &awards,
            &profile,
            &mut MidpointSource,
        );
        assert!(generated.is_err());
    }

    #[test]
    fn dates_are_contiguous_and_span_the_range() {
        let config = GenerationConfig::default();
        for profile in config.sites.iter() {
            let records = default_traffic(profile, 3);
            assert_eq!(485, records.len());
            assert_eq!(config.start_date, records[0].date);
            assert_eq!(config.end_date, records.last().unwrap().date);
            assert!(records
                .iter()
                .tuple_windows()
                .all(|(earlier, later)| later.date.pred_opt() == Some(earlier.date)));
        }
    }

    #[test]
    fn counts_stay_within_profile_bounds() {
        for profile in [SiteProfile::grammy(), SiteProfile::recording_academy()].iter() {
            let records = default_traffic(profile, 4);
            for record in records.iter() {
                assert!(record.bounced_sessions <= record.sessions);
                assert!(record.visitors >= profile.visitors.low);
                assert!(record.pageviews >= record.visitors);
                assert!(
                    (profile.duration_secs.low..profile.duration_secs.high)
                        .contains(&(record.avg_session_duration_secs as u64))
                );
                if !record.awards_week || profile.awards_spike.is_none() {
                    assert!(record.visitors < profile.visitors.high);
                }
            }
        }
    }

    #[test]
    fn awards_flags_mark_fifteen_consecutive_days() {
        let records = default_traffic(&SiteProfile::recording_academy(), 5);
        let week_positions: Vec<usize> = records
            .iter()
            .positions(|record| record.awards_week)
            .collect();
        assert_eq!(15, week_positions.len());
        assert!(week_positions
            .iter()
            .tuple_windows()
            .all(|(earlier, later)| later - earlier == 1));
        let nights: Vec<&DailyTrafficRecord> =
            records.iter().filter(|record| record.awards_night).collect();
        assert_eq!(1, nights.len());
        assert_eq!(ymd(2023, 2, 5), nights[0].date);
        assert_eq!(nights[0].date, records[week_positions[7]].date);
    }

    #[test]
    fn awards_night_outweighs_quiet_days_by_the_night_factor() {
        let profile = SiteProfile::grammy();
        let awards = AwardsWindow::new(ymd(2023, 2, 5), 7);
        let mut rng = Pcg64::seed_from_u64(6);
        let mut night_total = 0f64;
        let mut quiet_total = 0f64;
        let mut quiet_days = 0f64;
        const RUNS: usize = 50;
        for _ in 0..RUNS {
            let records =
                generate_site_traffic(ymd(2023, 1, 1), ymd(2023, 2, 28), &awards, &profile, &mut rng)
                    .unwrap();
            for record in records.iter() {
                if record.awards_night {
                    night_total += record.visitors as f64;
                } else if !record.awards_week {
                    quiet_total += record.visitors as f64;
                    quiet_days += 1.0;
                }
            }
        }
        let night_mean = night_total / RUNS as f64;
        let quiet_mean = quiet_total / quiet_days;
        assert!(night_mean >= quiet_mean * AwardsSpike::DEFAULT_NIGHT_FACTOR);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let profile = SiteProfile::grammy();
        assert_eq!(default_traffic(&profile, 7), default_traffic(&profile, 7));
        assert_ne!(default_traffic(&profile, 7), default_traffic(&profile, 8));
    }
}
