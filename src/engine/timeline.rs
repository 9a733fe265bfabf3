//! Chronological views: the event stream, monthly buckets, and the
//! announcement-to-effect delay.

use crate::models::{Dataset, RateValue};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Announcement,
    Implementation,
}

/// One dated event. A record with both dates emits two events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub kind: EventKind,
    pub country: String,
    pub target: Option<String>,
    pub rate: Option<RateValue>,
    pub date: NaiveDate,
    pub description: String,
}

/// Monthly aggregate over implementation events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    /// Display label, e.g. "Feb 2025".
    pub label: String,
    pub event_count: usize,
    /// Mean over event rates, percent-scaled; non-numeric rates count as 0.
    pub avg_rate: f64,
}

/// Average gap between announcement and entry into effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImplementationDelay {
    pub average_days: f64,
    pub sample_count: usize,
}

fn describe(kind: EventKind, country: &str, rate: Option<&RateValue>, target: Option<&str>) -> String {
    let verb = match kind {
        EventKind::Announcement => "Announced",
        EventKind::Implementation => "Implemented",
    };
    let rate_text = rate.map_or_else(|| "unspecified".to_string(), ToString::to_string);
    let target_text = target.unwrap_or("goods");
    format!("{country}: {verb} {rate_text} tariff on {target_text}")
}

/// Flatten the dataset into dated events, sorted ascending by date. Records
/// whose date fields are absent, sentinels, or unparseable emit no event for
/// that field. The sort is stable, so same-day events keep dataset order.
pub fn timeline_events(dataset: &Dataset) -> Vec<TimelineEvent> {
    let mut events = Vec::new();

    for (country, record) in dataset.records() {
        let mut push = |kind, date| {
            events.push(TimelineEvent {
                kind,
                country: country.to_string(),
                target: record.target.clone(),
                rate: record.rate.clone(),
                date,
                description: describe(kind, country, record.rate.as_ref(), record.target.as_deref()),
            });
        };
        if let Some(date) = record.announced_date() {
            push(EventKind::Announcement, date);
        }
        if let Some(date) = record.effective_date() {
            push(EventKind::Implementation, date);
        }
    }

    events.sort_by_key(|event| event.date);
    events
}

/// Keep events within the inclusive `[from, to]` window. Either bound may
/// be open.
pub fn events_in_range(
    events: Vec<TimelineEvent>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<TimelineEvent> {
    events
        .into_iter()
        .filter(|event| from.map_or(true, |f| event.date >= f))
        .filter(|event| to.map_or(true, |t| event.date <= t))
        .collect()
}

/// Bucket implementation events up to `today` by calendar month, in
/// chronological order. Future-dated implementations are excluded; the
/// caller supplies "today" so output is reproducible.
pub fn month_buckets(events: &[TimelineEvent], today: NaiveDate) -> Vec<MonthBucket> {
    let mut buckets: BTreeMap<(i32, u32), (usize, f64)> = BTreeMap::new();

    for event in events {
        if event.kind != EventKind::Implementation || event.date > today {
            continue;
        }
        let percent = event.rate.as_ref().and_then(RateValue::percent).unwrap_or(0.0);
        let slot = buckets.entry((event.date.year(), event.date.month())).or_insert((0, 0.0));
        slot.0 += 1;
        slot.1 += percent;
    }

    buckets
        .into_iter()
        .map(|((year, month), (count, sum))| {
            // First of the month is always a valid date.
            let label = NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_default();
            MonthBucket {
                year,
                month,
                label,
                event_count: count,
                avg_rate: sum / count as f64,
            }
        })
        .collect()
}

/// Average days between announcement and entry into effect, over records
/// carrying both real dates. Returns `None` when no record qualifies.
pub fn implementation_delay(dataset: &Dataset) -> Option<ImplementationDelay> {
    let mut total_days = 0i64;
    let mut samples = 0usize;

    for (_, record) in dataset.records() {
        let (Some(announced), Some(effective)) = (record.announced_date(), record.effective_date())
        else {
            continue;
        };
        total_days += (effective - announced).num_days();
        samples += 1;
    }

    (samples > 0).then(|| ImplementationDelay {
        average_days: total_days as f64 / samples as f64,
        sample_count: samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TariffRecord;

    fn record(announced: Option<&str>, effective: Option<&str>, rate: Option<RateValue>) -> TariffRecord {
        TariffRecord {
            target: Some("steel".to_string()),
            rate,
            date_announced: announced.map(String::from),
            date_in_effect: effective.map(String::from),
            ..Default::default()
        }
    }

    fn date(s: &str) -> NaiveDate {
        crate::models::parse_date(s).unwrap()
    }

    #[test]
    fn test_timeline_events_sorted_and_described() {
        let ds = Dataset::from_entries(vec![(
            "Canada".to_string(),
            vec![record(
                Some("2025-02-01"),
                Some("2025-03-04"),
                Some(RateValue::Number(0.25)),
            )],
        )]);

        let events = timeline_events(&ds);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::Announcement);
        assert_eq!(events[0].description, "Canada: Announced 25.0% tariff on steel");
        assert_eq!(events[1].kind, EventKind::Implementation);
        assert_eq!(events[1].description, "Canada: Implemented 25.0% tariff on steel");
    }

    #[test]
    fn test_timeline_skips_sentinel_and_bad_dates() {
        let ds = Dataset::from_entries(vec![(
            "A".to_string(),
            vec![
                record(Some("TBD"), Some("not-a-date"), None),
                record(None, Some("2025-04-09"), Some(RateValue::Text("Exempt".to_string()))),
            ],
        )]);

        let events = timeline_events(&ds);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Implementation);
        assert_eq!(events[0].description, "A: Implemented Exempt tariff on steel");
    }

    #[test]
    fn test_describe_fallbacks() {
        let desc = describe(EventKind::Announcement, "B", None, None);
        assert_eq!(desc, "B: Announced unspecified tariff on goods");
    }

    #[test]
    fn test_events_in_range_inclusive() {
        let ds = Dataset::from_entries(vec![(
            "A".to_string(),
            vec![
                record(Some("2025-01-01"), None, None),
                record(Some("2025-02-01"), None, None),
                record(Some("2025-03-01"), None, None),
            ],
        )]);
        let events = timeline_events(&ds);

        let windowed = events_in_range(events.clone(), Some(date("2025-02-01")), Some(date("2025-02-28")));
        assert_eq!(windowed.len(), 1);
        assert_eq!(windowed[0].date, date("2025-02-01"));

        let open_start = events_in_range(events, None, Some(date("2025-01-31")));
        assert_eq!(open_start.len(), 1);
    }

    #[test]
    fn test_month_buckets_excludes_future_and_averages() {
        let ds = Dataset::from_entries(vec![(
            "A".to_string(),
            vec![
                record(None, Some("2025-03-04"), Some(RateValue::Number(0.25))),
                record(None, Some("2025-03-12"), Some(RateValue::Text("TBD".to_string()))),
                record(None, Some("2025-09-01"), Some(RateValue::Number(0.5))),
            ],
        )]);
        let events = timeline_events(&ds);

        let buckets = month_buckets(&events, date("2025-06-30"));
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].label, "Mar 2025");
        assert_eq!(buckets[0].event_count, 2);
        // The non-numeric rate counts as 0 in the mean.
        assert_eq!(buckets[0].avg_rate, 12.5);
    }

    #[test]
    fn test_implementation_delay() {
        let ds = Dataset::from_entries(vec![(
            "A".to_string(),
            vec![
                record(Some("2025-02-01"), Some("2025-02-11"), None),
                record(Some("2025-03-01"), Some("2025-03-21"), None),
                record(Some("2025-04-01"), None, None),
            ],
        )]);

        let delay = implementation_delay(&ds).unwrap();
        assert_eq!(delay.sample_count, 2);
        assert_eq!(delay.average_days, 15.0);
    }

    #[test]
    fn test_implementation_delay_empty() {
        assert!(implementation_delay(&Dataset::default()).is_none());
    }
}
