use crate::models::{DailySnapshot, IssueRecord};
use crate::window::DateWindow;
use chrono::NaiveDate;

/// Builds one cumulative snapshot per calendar day, from the day the first
/// issue was created through `today`.
///
/// `closed` is derived from the current status and `updated_at` of every
/// record, so an issue that was reopened and closed again only counts from
/// its latest transition.
pub fn aggregate(records: &[IssueRecord], today: NaiveDate) -> Vec<DailySnapshot> {
    aggregate_between(records, NaiveDate::MIN, today)
}

/// The days of `aggregate(records, today)` that fall inside `window`, without
/// building the days before it.
pub fn aggregate_window(
    records: &[IssueRecord],
    window: DateWindow,
    today: NaiveDate,
) -> Vec<DailySnapshot> {
    aggregate_between(records, window.start(), today.min(window.end()))
}

fn aggregate_between(records: &[IssueRecord], from: NaiveDate, to: NaiveDate) -> Vec<DailySnapshot> {
    let mut created_days: Vec<NaiveDate> = records
        .iter()
        .map(|record| record.created_at.date_naive())
        .collect();
    created_days.sort_unstable();

    let Some(&first_day) = created_days.first() else {
        return Vec::new();
    };

    // A record never counts as closed before it exists.
    let mut closed_days: Vec<NaiveDate> = records
        .iter()
        .filter(|record| record.status.is_closed())
        .map(|record| record.updated_at.date_naive().max(record.created_at.date_naive()))
        .collect();
    closed_days.sort_unstable();

    let mut snapshots = Vec::new();
    let mut created_seen = 0;
    let mut closed_seen = 0;

    for day in first_day.max(from).iter_days().take_while(|day| *day <= to) {
        created_seen += created_days[created_seen..].partition_point(|created| *created <= day);
        closed_seen += closed_days[closed_seen..].partition_point(|closed| *closed <= day);
        snapshots.push(DailySnapshot::new(
            day,
            created_seen as u32,
            closed_seen as u32,
        ));
    }

    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IssueStatus;
    use crate::window::filter_window;
    use chrono::{DateTime, TimeZone, Utc};
    use itertools::Itertools;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn record(created: DateTime<Utc>, updated: DateTime<Utc>, status: IssueStatus) -> IssueRecord {
        IssueRecord {
            created_at: created,
            updated_at: updated,
            status,
        }
    }

    #[test]
    fn no_records_yield_no_snapshots() {
        assert!(aggregate(&[], date(2024, 1, 3)).is_empty());
    }

    #[test]
    fn single_open_record_spans_until_today() {
        let records = [record(at(2024, 1, 1, 9), at(2024, 1, 1, 9), IssueStatus::New)];
        let snapshots = aggregate(&records, date(2024, 1, 3));

        assert_eq!(
            snapshots,
            vec![
                DailySnapshot::new(date(2024, 1, 1), 1, 0),
                DailySnapshot::new(date(2024, 1, 2), 1, 0),
                DailySnapshot::new(date(2024, 1, 3), 1, 0),
            ]
        );
        assert!(snapshots.iter().all(|s| s.open == 1));
    }

    #[test]
    fn closed_record_counts_from_its_update_day() {
        let records = [
            record(at(2024, 1, 1, 10), at(2024, 1, 3, 15), IssueStatus::Closed),
            record(at(2024, 1, 2, 8), at(2024, 1, 2, 8), IssueStatus::Open),
        ];
        let snapshots = aggregate(&records, date(2024, 1, 3));

        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0], DailySnapshot::new(date(2024, 1, 1), 1, 0));
        assert_eq!(snapshots[1], DailySnapshot::new(date(2024, 1, 2), 2, 0));
        assert_eq!(
            snapshots[2],
            DailySnapshot {
                date: date(2024, 1, 3),
                total: 2,
                closed: 1,
                open: 1,
            }
        );
    }

    #[test]
    fn resolved_is_not_closed() {
        let records = [record(at(2024, 1, 1, 0), at(2024, 1, 1, 1), IssueStatus::Resolved)];
        let snapshots = aggregate(&records, date(2024, 1, 2));
        assert!(snapshots.iter().all(|s| s.closed == 0));
    }

    #[test]
    fn close_before_creation_is_clamped_to_creation_day() {
        let records = [
            record(at(2024, 1, 1, 0), at(2024, 1, 1, 0), IssueStatus::New),
            record(at(2024, 1, 3, 0), at(2024, 1, 2, 0), IssueStatus::Closed),
        ];
        let snapshots = aggregate(&records, date(2024, 1, 4));

        assert_eq!(snapshots[1], DailySnapshot::new(date(2024, 1, 2), 1, 0));
        assert_eq!(snapshots[2], DailySnapshot::new(date(2024, 1, 3), 2, 1));
    }

    #[test]
    fn records_created_after_today_produce_nothing() {
        let records = [record(at(2024, 2, 1, 0), at(2024, 2, 1, 0), IssueStatus::New)];
        assert!(aggregate(&records, date(2024, 1, 31)).is_empty());
    }

    #[test]
    fn windowed_aggregation_matches_the_full_sequence() {
        let records = [
            record(at(2024, 1, 1, 10), at(2024, 1, 3, 15), IssueStatus::Closed),
            record(at(2024, 1, 2, 8), at(2024, 1, 6, 8), IssueStatus::Closed),
            record(at(2024, 1, 5, 8), at(2024, 1, 5, 8), IssueStatus::New),
        ];
        let today = date(2024, 1, 8);
        let full = aggregate(&records, today);

        for (start, end) in [(2, 4), (1, 8), (6, 20), (9, 12)] {
            let window = DateWindow::new(date(2024, 1, start), date(2024, 1, end)).unwrap();
            assert_eq!(
                aggregate_window(&records, window, today),
                filter_window(&full, window).to_vec()
            );
        }
        let before = DateWindow::new(date(2023, 12, 1), date(2023, 12, 31)).unwrap();
        assert!(aggregate_window(&records, before, today).is_empty());
    }

    #[test]
    fn far_past_record_only_builds_window_days() {
        let records = [
            record(at(1, 1, 1, 0), at(1, 1, 1, 0), IssueStatus::Closed),
            record(at(2024, 1, 2, 8), at(2024, 1, 2, 8), IssueStatus::New),
        ];
        let window = DateWindow::last_days(date(2024, 1, 30), 30);
        let snapshots = aggregate_window(&records, window, date(2024, 1, 30));

        assert_eq!(snapshots.len(), 30);
        assert_eq!(snapshots[0], DailySnapshot::new(date(2024, 1, 1), 1, 1));
        assert_eq!(snapshots[29], DailySnapshot::new(date(2024, 1, 30), 2, 1));
    }

    #[test]
    fn sequence_is_gap_free_monotonic_and_consistent() {
        let statuses = [
            IssueStatus::New,
            IssueStatus::Closed,
            IssueStatus::InProgress,
            IssueStatus::Closed,
            IssueStatus::Reopened,
        ];
        let records: Vec<IssueRecord> = (0..40u32)
            .map(|i| {
                let created = at(2024, 3, 1 + (i * 7) % 28, i % 24);
                let updated = at(2024, 4, 1 + (i * 3) % 30, (i * 5) % 24);
                record(created, updated, statuses[i as usize % statuses.len()])
            })
            .collect();

        let snapshots = aggregate(&records, date(2024, 5, 15));

        assert_eq!(snapshots.first().unwrap().date, date(2024, 3, 1));
        assert_eq!(snapshots.last().unwrap().date, date(2024, 5, 15));
        assert_eq!(snapshots.last().unwrap().total, 40);
        assert_eq!(snapshots.last().unwrap().closed, 16);

        for (previous, next) in snapshots.iter().tuple_windows() {
            assert_eq!((next.date - previous.date).num_days(), 1);
            assert!(previous.total <= next.total);
        }
        for snapshot in &snapshots {
            assert!(snapshot.closed <= snapshot.total);
            assert_eq!(snapshot.open, snapshot.total - snapshot.closed);
        }
    }
}
