//! Monthly consumption derived from a transaction history
//!
//! Everything here is pure: the reference time is passed in, so results only
//! depend on the arguments. Record timestamps use the backend's integer unit,
//! which is [`TIMESTAMP_SCALE`] times an epoch in seconds; calendar math is
//! done in seconds and scaled exactly once when comparing.

use chrono::{DateTime, Datelike, Offset, TimeZone};
use tracing::debug;

use crate::error::AggregationError;
use crate::models::{ConsumptionAggregate, TransactionRecord};

/// Record timestamp units per second
pub const TIMESTAMP_SCALE: i64 = 1_000_000;

/// Local midnight on the first day of `now`'s month
pub fn month_start<Tz: TimeZone>(now: &DateTime<Tz>) -> Result<DateTime<Tz>, AggregationError> {
    now.timezone()
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .earliest()
        .ok_or(AggregationError::NonexistentMonthStart)
}

/// [`month_start`] expressed in record timestamp units
pub fn month_start_boundary<Tz: TimeZone>(now: &DateTime<Tz>) -> Result<i64, AggregationError> {
    Ok(month_start(now)?.timestamp() * TIMESTAMP_SCALE)
}

/// Energy of every session started this month
pub fn kwh_this_month<Tz: TimeZone>(
    records: &[TransactionRecord],
    now: &DateTime<Tz>,
) -> Result<f64, AggregationError> {
    let boundary = month_start_boundary(now)?;
    Ok(sum_since(records, boundary, |_| true))
}

/// Energy of sessions started this month on one charge box
pub fn kwh_this_month_for_box<Tz: TimeZone>(
    records: &[TransactionRecord],
    box_id: &str,
    now: &DateTime<Tz>,
) -> Result<f64, AggregationError> {
    let boundary = month_start_boundary(now)?;
    Ok(sum_since(records, boundary, |r| r.charge_box_id == box_id))
}

/// Stop time of the latest session, in `tz`
pub fn last_charge<Tz: TimeZone>(
    records: &[TransactionRecord],
    tz: &Tz,
) -> Result<DateTime<Tz>, AggregationError> {
    let latest = records
        .iter()
        .map(|r| r.stop_time_local)
        .max()
        .ok_or(AggregationError::EmptyHistory)?;
    from_record_time(latest, tz)
}

/// Compute every consumption figure in one pass over the inputs.
///
/// Fails with [`AggregationError::EmptyHistory`] when there are no records
/// rather than reporting zeros.
pub fn aggregate<Tz: TimeZone>(
    records: &[TransactionRecord],
    box_id: Option<&str>,
    now: &DateTime<Tz>,
) -> Result<ConsumptionAggregate, AggregationError> {
    let last = last_charge(records, &now.timezone())?;
    let kwh_this_month_for_box = match box_id {
        Some(id) => Some(kwh_this_month_for_box(records, id, now)?),
        None => None,
    };

    let kwh_this_month = kwh_this_month(records, now)?;
    debug!(
        records = records.len(),
        kwh_this_month,
        ?kwh_this_month_for_box,
        "Aggregated transaction history"
    );

    Ok(ConsumptionAggregate {
        kwh_this_month,
        kwh_this_month_for_box,
        last_charge: last.with_timezone(&last.offset().fix()),
    })
}

fn sum_since(
    records: &[TransactionRecord],
    boundary: i64,
    include: impl Fn(&TransactionRecord) -> bool,
) -> f64 {
    records
        .iter()
        .filter(|r| r.start_time_utc >= boundary && include(r))
        .map(|r| r.kwh)
        .sum()
}

fn from_record_time<Tz: TimeZone>(value: i64, tz: &Tz) -> Result<DateTime<Tz>, AggregationError> {
    let secs = value.div_euclid(TIMESTAMP_SCALE);
    // sub-second remainder is in microseconds
    let nanos = (value.rem_euclid(TIMESTAMP_SCALE) * 1_000) as u32;
    tz.timestamp_opt(secs, nanos)
        .single()
        .ok_or(AggregationError::InvalidTimestamp(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;

    fn cet() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        cet().with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn record(box_id: &str, start: DateTime<FixedOffset>, kwh: f64) -> TransactionRecord {
        let start_ts = start.timestamp() * TIMESTAMP_SCALE;
        let stop_ts = start_ts + 3_600 * TIMESTAMP_SCALE;
        TransactionRecord {
            id: format!("{}-{}", box_id, start_ts),
            charge_box_id: box_id.to_string(),
            transaction_id: start_ts / TIMESTAMP_SCALE,
            start_time_local: start_ts,
            stop_time_local: stop_ts,
            start_time_utc: start_ts,
            stop_time_utc: stop_ts,
            kwh,
        }
    }

    fn march_history() -> Vec<TransactionRecord> {
        vec![
            record("home", at(2024, 2, 20, 18, 0), 100.0),
            record("home", at(2024, 3, 1, 0, 0), 10.0),
            record("public", at(2024, 3, 15, 12, 0), 5.0),
            record("home", at(2024, 3, 28, 23, 59), 7.0),
        ]
    }

    #[test]
    fn test_month_start_is_local_midnight() {
        let start = month_start(&at(2024, 3, 20, 12, 0)).unwrap();
        assert_eq!(start, at(2024, 3, 1, 0, 0));
        assert_eq!(
            month_start_boundary(&at(2024, 3, 20, 12, 0)).unwrap(),
            at(2024, 3, 1, 0, 0).timestamp() * 1_000_000
        );
    }

    #[test]
    fn test_previous_month_excluded() {
        let kwh = kwh_this_month(&march_history(), &at(2024, 3, 29, 8, 0)).unwrap();
        assert_eq!(kwh, 22.0);
    }

    #[test]
    fn test_reference_day_within_month_does_not_matter() {
        let history = march_history();
        let early = kwh_this_month(&history, &at(2024, 3, 2, 0, 0)).unwrap();
        let late = kwh_this_month(&history, &at(2024, 3, 31, 23, 0)).unwrap();
        assert_eq!(early, late);
    }

    #[test]
    fn test_box_total_never_exceeds_month_total() {
        let history = march_history();
        let now = at(2024, 3, 29, 8, 0);
        let total = kwh_this_month(&history, &now).unwrap();
        for box_id in ["home", "public", "elsewhere"] {
            let for_box = kwh_this_month_for_box(&history, box_id, &now).unwrap();
            assert!(for_box <= total, "{} exceeded total", box_id);
        }
        assert_eq!(kwh_this_month_for_box(&history, "home", &now).unwrap(), 17.0);
    }

    #[test]
    fn test_box_total_absent_without_box_and_zero_without_matches() {
        let history = march_history();
        let now = at(2024, 3, 29, 8, 0);
        assert_eq!(aggregate(&history, None, &now).unwrap().kwh_this_month_for_box, None);
        assert_eq!(
            aggregate(&history, Some("elsewhere"), &now)
                .unwrap()
                .kwh_this_month_for_box,
            Some(0.0)
        );
    }

    #[test]
    fn test_last_charge_uses_latest_stop_time() {
        let mut history = march_history();
        history.swap(0, 3);
        let last = last_charge(&history, &cet()).unwrap();
        assert_eq!(last, at(2024, 3, 29, 0, 59));
    }

    #[test]
    fn test_empty_history_is_an_error() {
        let now = at(2024, 3, 29, 8, 0);
        assert_eq!(
            aggregate(&[], Some("home"), &now),
            Err(AggregationError::EmptyHistory)
        );
    }

    #[test]
    fn test_sub_second_precision_survives() {
        let tz = cet();
        let t = from_record_time(1_700_000_000_250_000, &tz).unwrap();
        assert_eq!(t.timestamp(), 1_700_000_000);
        assert_eq!(t.timestamp_subsec_micros(), 250_000);
    }
}
