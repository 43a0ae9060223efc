//! Revisit-interval statistics and forward projection.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::{
    error::{FlybyError, Result},
    model::{CaptureSet, IntervalStatistic, Prediction},
};

/// Sort the capture dates and average the gaps between consecutive captures.
///
/// The mean is taken with microsecond precision and truncated. Fewer than two
/// dates, or a mean of zero, are errors.
pub fn interval_statistic(mut dates: Vec<DateTime<Utc>>) -> Result<IntervalStatistic> {
    if dates.len() < 2 {
        return Err(FlybyError::InsufficientData { count: dates.len() });
    }

    dates.sort_unstable();

    let mut total_us: i128 = 0;
    for pair in dates.windows(2) {
        let gap = (pair[1] - pair[0]).num_microseconds().ok_or(FlybyError::OutOfRange)?;
        total_us += i128::from(gap);
    }

    let gaps = dates.len() - 1;
    let mean_us = i64::try_from(total_us / gaps as i128).map_err(|_| FlybyError::OutOfRange)?;
    if mean_us == 0 {
        return Err(FlybyError::ZeroInterval);
    }

    Ok(IntervalStatistic {
        earliest: dates[0],
        latest: dates[gaps],
        gaps,
        mean_interval: Duration::microseconds(mean_us),
    })
}

/// First instant of the form `latest + k * mean` (k >= 1) that lies strictly after `now`.
pub fn project(statistic: IntervalStatistic, now: DateTime<Utc>) -> Result<Prediction> {
    let mean_us = statistic.mean_interval.num_microseconds().ok_or(FlybyError::OutOfRange)?;
    if mean_us <= 0 {
        return Err(FlybyError::ZeroInterval);
    }

    let first = statistic
        .latest
        .checked_add_signed(statistic.mean_interval)
        .ok_or(FlybyError::OutOfRange)?;

    if first > now {
        return Ok(Prediction { next_capture: first, statistic, intervals_ahead: 1 });
    }

    // first <= now, so the elapsed span is at least one mean interval
    let elapsed_us = (now - statistic.latest).num_microseconds().ok_or(FlybyError::OutOfRange)?;
    let intervals_ahead = elapsed_us / mean_us + 1;
    let offset_us = intervals_ahead.checked_mul(mean_us).ok_or(FlybyError::OutOfRange)?;

    let next_capture = statistic
        .latest
        .checked_add_signed(Duration::microseconds(offset_us))
        .ok_or(FlybyError::OutOfRange)?;

    Ok(Prediction { next_capture, statistic, intervals_ahead })
}

/// Predict the next capture after `now` from a set of historical captures.
pub fn predict_next_capture(captures: &CaptureSet, now: DateTime<Utc>) -> Result<Prediction> {
    let dates: Vec<DateTime<Utc>> = captures.results.iter().map(|r| r.date).collect();

    let statistic = interval_statistic(dates)?;
    debug!(
        gaps = statistic.gaps,
        latest = %statistic.latest,
        mean_interval_s = statistic.mean_interval.num_seconds(),
        "computed revisit interval"
    );

    project(statistic, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn sample() -> CaptureSet {
        CaptureSet::from_dates([day(2024, 1, 1), day(2024, 1, 3), day(2024, 1, 5)])
    }

    #[test]
    fn mean_interval_of_evenly_spaced_dates() {
        let stat = interval_statistic(vec![day(2024, 1, 1), day(2024, 1, 3), day(2024, 1, 5)])
            .expect("statistic");

        assert_eq!(stat.mean_interval, Duration::days(2));
        assert_eq!(stat.latest, day(2024, 1, 5));
        assert_eq!(stat.earliest, day(2024, 1, 1));
        assert_eq!(stat.gaps, 2);
    }

    #[test]
    fn prediction_without_advancing() {
        let p = predict_next_capture(&sample(), day(2024, 1, 6)).expect("prediction");
        assert_eq!(p.next_capture, day(2024, 1, 7));
        assert_eq!(p.intervals_ahead, 1);
    }

    #[test]
    fn prediction_advances_past_now() {
        let p = predict_next_capture(&sample(), day(2024, 1, 10)).expect("prediction");
        assert_eq!(p.next_capture, day(2024, 1, 11));
        assert_eq!(p.intervals_ahead, 3);
    }

    #[test]
    fn prediction_equal_to_now_is_not_in_the_future() {
        let p = predict_next_capture(&sample(), day(2024, 1, 7)).expect("prediction");
        assert_eq!(p.next_capture, day(2024, 1, 9));

        let p = predict_next_capture(&sample(), day(2024, 1, 9)).expect("prediction");
        assert_eq!(p.next_capture, day(2024, 1, 11));
    }

    #[test]
    fn input_order_does_not_matter() {
        let shuffled = CaptureSet::from_dates([day(2024, 1, 5), day(2024, 1, 1), day(2024, 1, 3)]);
        let now = day(2024, 3, 1);

        assert_eq!(
            predict_next_capture(&shuffled, now).unwrap(),
            predict_next_capture(&sample(), now).unwrap()
        );
    }

    #[test]
    fn uneven_gaps_are_averaged() {
        let stat = interval_statistic(vec![day(2024, 1, 1), day(2024, 1, 2), day(2024, 1, 5)])
            .expect("statistic");
        // (1 day + 3 days) / 2
        assert_eq!(stat.mean_interval, Duration::days(2));

        let stat = interval_statistic(vec![day(2024, 1, 1), day(2024, 1, 2), day(2024, 1, 2)])
            .expect("statistic");
        assert_eq!(stat.mean_interval, Duration::hours(12));
    }

    #[test]
    fn identical_dates_are_a_zero_interval() {
        let set = CaptureSet::from_dates([day(2024, 1, 1); 4]);
        let err = predict_next_capture(&set, day(2024, 2, 1)).unwrap_err();
        assert!(matches!(err, FlybyError::ZeroInterval));
    }

    #[test]
    fn fewer_than_two_captures_is_insufficient() {
        for set in [CaptureSet::from_dates(Vec::new()), CaptureSet::from_dates([day(2024, 1, 1)])] {
            let err = predict_next_capture(&set, day(2024, 2, 1)).unwrap_err();
            assert!(matches!(err, FlybyError::InsufficientData { .. }));
        }
    }

    #[test]
    fn distant_now_with_small_interval_stays_aligned() {
        let set = CaptureSet::from_dates([
            Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 1).unwrap(),
        ]);
        let now = Utc.with_ymd_and_hms(2030, 6, 15, 12, 0, 0).unwrap();

        let p = predict_next_capture(&set, now).expect("prediction");
        assert_eq!(p.next_capture, now + Duration::seconds(1));
    }
}
