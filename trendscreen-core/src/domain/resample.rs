//! Daily → weekly resampling.
//!
//! Weeks are ISO weeks (Monday start). Each weekly bar is stamped with the
//! date of the last daily bar in its week, so a partial current week is
//! still represented.

use super::bar::Bar;
use chrono::Datelike;

/// Aggregate time-ordered daily bars into weekly bars.
///
/// open = first open, high = max high, low = min low, close = last close,
/// volume = sum. NaN fields are ignored by the max/min/sum; a week whose
/// closes are all NaN keeps a NaN close.
pub fn resample_weekly(daily: &[Bar]) -> Vec<Bar> {
    let mut weekly: Vec<Bar> = Vec::new();
    let mut current_week = None;

    for bar in daily {
        let iso = bar.date.iso_week();
        let key = (iso.year(), iso.week());

        if current_week == Some(key) {
            if let Some(agg) = weekly.last_mut() {
                agg.date = bar.date;
                agg.high = agg.high.max(bar.high);
                agg.low = agg.low.min(bar.low);
                if !bar.close.is_nan() {
                    agg.close = bar.close;
                }
                if !bar.volume.is_nan() {
                    agg.volume = if agg.volume.is_nan() {
                        bar.volume
                    } else {
                        agg.volume + bar.volume
                    };
                }
            }
        } else {
            current_week = Some(key);
            weekly.push(bar.clone());
        }
    }

    weekly
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32, close: f64) -> Bar {
        Bar::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            close - 0.5,
            close + 1.0,
            close - 1.0,
            close,
            100.0,
        )
    }

    #[test]
    fn groups_by_iso_week() {
        // Mon 2024-01-08 .. Fri 2024-01-12, then Mon 2024-01-15 .. Tue 2024-01-16
        let daily = vec![
            day(2024, 1, 8, 10.0),
            day(2024, 1, 9, 12.0),
            day(2024, 1, 10, 9.0),
            day(2024, 1, 11, 11.0),
            day(2024, 1, 12, 13.0),
            day(2024, 1, 15, 14.0),
            day(2024, 1, 16, 15.0),
        ];
        let weekly = resample_weekly(&daily);
        assert_eq!(weekly.len(), 2);

        let w1 = &weekly[0];
        assert_eq!(w1.date, NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
        assert_eq!(w1.open, 9.5);
        assert_eq!(w1.high, 14.0);
        assert_eq!(w1.low, 8.0);
        assert_eq!(w1.close, 13.0);
        assert_eq!(w1.volume, 500.0);

        let w2 = &weekly[1];
        assert_eq!(w2.date, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
        assert_eq!(w2.close, 15.0);
        assert_eq!(w2.volume, 200.0);
    }

    #[test]
    fn year_boundary_uses_iso_year() {
        // 2024-12-30 (Mon) and 2025-01-02 (Thu) share ISO week 2025-W01
        let daily = vec![day(2024, 12, 30, 10.0), day(2025, 1, 2, 11.0)];
        let weekly = resample_weekly(&daily);
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].close, 11.0);
    }

    #[test]
    fn nan_close_keeps_last_valid() {
        let mut late = day(2024, 1, 9, 12.0);
        late.close = f64::NAN;
        late.volume = f64::NAN;
        let weekly = resample_weekly(&[day(2024, 1, 8, 10.0), late]);
        assert_eq!(weekly[0].close, 10.0);
        assert_eq!(weekly[0].volume, 100.0);
    }

    #[test]
    fn empty_input() {
        assert!(resample_weekly(&[]).is_empty());
    }
}
