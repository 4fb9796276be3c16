mod aggregate;
mod service;

pub use aggregate::compute_summary;
pub use service::InvoiceService;

use billing_client::{db::MeterRollup, domain::Customer};
use rust_decimal::Decimal;
use time::{Date, OffsetDateTime};

/// The immutable result of aggregating readings over a billing period,
/// prior to rendering. Totals are exact decimal sums of the per-meter
/// rollups and are zero when no readings matched.
#[derive(Debug, Clone)]
pub struct InvoiceSummary {
    pub customer: Customer,
    pub period_start: Date,
    pub period_end: Date,
    pub meters: Vec<MeterRollup>,
    pub total_usage: Decimal,
    pub total_cost: Decimal,
}

/// Resolve the inclusive period end: the given date, or the last calendar
/// day of the month containing `start`.
pub fn resolve_period_end(start: Date, end: Option<Date>) -> Date {
    match end {
        Some(end) => end,
        None => {
            let last_day = time::util::days_in_year_month(start.year(), start.month());
            // `start` is a valid date of the same month, so this cannot fail.
            start.replace_day(last_day).unwrap_or(start)
        }
    }
}

/// Translate the closed-closed `[start, end]` date period into the
/// half-open event-time window `[start 00:00, day-after-end 00:00)` in UTC.
///
/// A reading at the last instant of `end` falls inside the window; one at
/// the first instant of the following day does not.
pub fn period_window(start: Date, end: Date) -> (OffsetDateTime, OffsetDateTime) {
    let from = start.midnight().assume_utc();
    let to = end
        .next_day()
        .unwrap_or(Date::MAX)
        .midnight()
        .assume_utc();
    (from, to)
}

pub(crate) fn build_summary(
    customer: Customer,
    period_start: Date,
    period_end: Date,
    meters: Vec<MeterRollup>,
) -> InvoiceSummary {
    let total_usage = meters.iter().map(|m| m.usage).sum();
    let total_cost = meters.iter().map(|m| m.cost).sum();
    InvoiceSummary {
        customer,
        period_start,
        period_end,
        meters,
        total_usage,
        total_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn customer() -> Customer {
        Customer {
            id: 1,
            name: "Janez Novak".to_string(),
            address: "Celovška cesta 123, Ljubljana".to_string(),
            email: "janez@example.com".to_string(),
            default_meter_id: None,
        }
    }

    #[test]
    fn period_end_defaults_to_last_day_of_start_month() {
        assert_eq!(
            resolve_period_end(date!(2024 - 01 - 15), None),
            date!(2024 - 01 - 31)
        );
        assert_eq!(
            resolve_period_end(date!(2023 - 02 - 01), None),
            date!(2023 - 02 - 28)
        );
        // Leap February.
        assert_eq!(
            resolve_period_end(date!(2024 - 02 - 10), None),
            date!(2024 - 02 - 29)
        );
    }

    #[test]
    fn explicit_period_end_is_kept() {
        assert_eq!(
            resolve_period_end(date!(2024 - 01 - 01), Some(date!(2024 - 03 - 15))),
            date!(2024 - 03 - 15)
        );
    }

    #[test]
    fn window_includes_the_entire_end_day() {
        let (from, to) = period_window(date!(2024 - 01 - 01), date!(2024 - 01 - 31));
        assert_eq!(from, datetime!(2024-01-01 0:00 UTC));

        let last_instant = datetime!(2024-01-31 23:59:59.999999999 UTC);
        let next_instant = datetime!(2024-02-01 0:00 UTC);
        assert!(last_instant >= from && last_instant < to);
        assert!(!(next_instant < to));
    }

    #[test]
    fn totals_are_exact_sums_of_rollups() {
        let meters = vec![
            MeterRollup {
                meter_id: 1,
                serial_number: None,
                usage: "0.10000".parse().unwrap(),
                cost: "0.30000".parse().unwrap(),
            },
            MeterRollup {
                meter_id: 2,
                serial_number: None,
                usage: "0.20000".parse().unwrap(),
                cost: "0.30000".parse().unwrap(),
            },
        ];
        let summary = build_summary(customer(), date!(2024 - 01 - 01), date!(2024 - 01 - 31), meters);

        // Exact decimal equality; 0.1 + 0.2 has no float drift.
        assert_eq!(summary.total_usage, "0.30000".parse().unwrap());
        assert_eq!(summary.total_cost, "0.60000".parse().unwrap());
    }

    #[test]
    fn empty_rollups_yield_zero_totals() {
        let summary = build_summary(customer(), date!(2024 - 01 - 01), date!(2024 - 01 - 31), vec![]);
        assert!(summary.meters.is_empty());
        assert_eq!(summary.total_usage, Decimal::ZERO);
        assert_eq!(summary.total_cost, Decimal::ZERO);
    }

    #[test]
    fn worked_example_for_january() {
        // usage 100 at 0.20 plus usage 50 at 0.25.
        let usage_a: Decimal = "100.00000".parse().unwrap();
        let price_a: Decimal = "0.20000".parse().unwrap();
        let usage_b: Decimal = "50.00000".parse().unwrap();
        let price_b: Decimal = "0.25000".parse().unwrap();

        let meters = vec![MeterRollup {
            meter_id: 1,
            serial_number: Some("MTR-1".to_string()),
            usage: usage_a + usage_b,
            cost: usage_a * price_a + usage_b * price_b,
        }];
        let summary = build_summary(customer(), date!(2024 - 01 - 01), date!(2024 - 01 - 31), meters);

        assert_eq!(summary.total_usage, "150.00000".parse().unwrap());
        assert_eq!(summary.total_cost, "32.50000".parse().unwrap());
    }
}
