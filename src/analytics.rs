use crate::labels::{long_date, short_label};
use crate::models::{AnalyticsSnapshot, DailyTrendEntry, NewOrder, Order};
use crate::price::normalize_price;
use chrono::{DateTime, NaiveDate, TimeZone};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Map;

pub const VISITS_PER_ORDER: u64 = 3;
pub const RECENT_ORDERS_LIMIT: usize = 8;
pub const DAILY_TRENDS_LIMIT: usize = 14;

pub const DEFAULT_CUSTOMER: &str = "عميل عبر الموقع";
pub const DEFAULT_SOURCE: &str = "موقع Boostly";
pub const STATUS_LABEL: &str = "قيد المراجعة";
pub const STATUS_CODE: &str = "processing";

/// Folds one order into the snapshot and returns the order record that was
/// prepended to `recent_orders`.
pub fn apply_order_at<Tz: TimeZone>(
    snapshot: &mut AnalyticsSnapshot,
    order: &NewOrder,
    now: &DateTime<Tz>,
) -> Order {
    let price = normalize_price(order.price.as_ref());
    let today = now.date_naive();

    let metrics = &mut snapshot.metrics;
    metrics.orders = metrics.orders.saturating_add(1);
    metrics.sales = round_to(metrics.sales + price, 2);
    metrics.visits = metrics.visits.saturating_add(VISITS_PER_ORDER);
    metrics.avg_order_value = round_to(metrics.sales / metrics.orders as f64, 2);
    metrics.conversion_rate = round_to(metrics.orders as f64 / metrics.visits as f64 * 100.0, 1);

    let record = Order {
        id: order_id(now, metrics.orders),
        customer: order
            .customer_name
            .clone()
            .unwrap_or_else(|| DEFAULT_CUSTOMER.to_string()),
        package: format!("{} - {}", order.platform, order.package_name),
        total: round_to(price, 2),
        status: STATUS_LABEL.to_string(),
        status_code: STATUS_CODE.to_string(),
        date: long_date(today),
        source: order
            .source
            .clone()
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        extra: Map::new(),
    };

    snapshot.recent_orders.insert(0, record.clone());
    snapshot.recent_orders.truncate(RECENT_ORDERS_LIMIT);

    record_daily_trend(&mut snapshot.daily_trends, today, price);

    record
}

/// Adds one order to the bucket for `date`, creating it if needed, then keeps
/// the newest `DAILY_TRENDS_LIMIT` buckets in ascending date order.
pub fn record_daily_trend(trends: &mut Vec<DailyTrendEntry>, date: NaiveDate, value: f64) {
    let key = date_key(date);
    match trends.iter_mut().find(|entry| entry.date == key) {
        Some(entry) => {
            entry.orders = entry.orders.saturating_add(1);
            entry.visits = entry.visits.saturating_add(VISITS_PER_ORDER);
            entry.sales = round_to(entry.sales + value, 2);
        }
        None => trends.push(DailyTrendEntry {
            date: key,
            label: short_label(date),
            visits: VISITS_PER_ORDER,
            orders: 1,
            sales: round_to(value, 2),
            extra: Map::new(),
        }),
    }

    trends.sort_by(|a, b| a.date.cmp(&b.date));
    if trends.len() > DAILY_TRENDS_LIMIT {
        let excess = trends.len() - DAILY_TRENDS_LIMIT;
        trends.drain(..excess);
    }
}

/// Rounds the exact binary value half away from zero, matching
/// `Number.prototype.toFixed`: `8.345` is stored as 8.3449.. and gives 8.34.
pub fn round_to(value: f64, places: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|exact| exact.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(value)
}

/// `ORD-YYYYMMDD-HHMM-NNNN`; the trailing sequence is the order count after
/// this order, so two orders in the same minute still get distinct ids.
fn order_id<Tz: TimeZone>(now: &DateTime<Tz>, sequence: u64) -> String {
    let naive = now.naive_local();
    format!("ORD-{}-{:04}", naive.format("%Y%m%d-%H%M"), sequence)
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceInput;
    use chrono::{Duration, FixedOffset};

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, day, hour, minute, 0)
            .unwrap()
    }

    fn order(price: &str) -> NewOrder {
        NewOrder::new("Instagram", "1000 متابع", Some(PriceInput::from(price)))
    }

    #[test]
    fn repeated_orders_aggregate_metrics() {
        let mut snapshot = AnalyticsSnapshot::default();
        for _ in 0..3 {
            apply_order_at(&mut snapshot, &order("2.5 KWD"), &at(19, 14, 30));
        }

        let metrics = &snapshot.metrics;
        assert_eq!(metrics.orders, 3);
        assert_eq!(metrics.sales, 7.5);
        assert_eq!(metrics.visits, 9);
        assert_eq!(metrics.avg_order_value, 2.5);
        assert_eq!(metrics.conversion_rate, 33.3);
    }

    #[test]
    fn order_record_uses_defaults_and_labels() {
        let mut snapshot = AnalyticsSnapshot::default();
        let record = apply_order_at(&mut snapshot, &order("5"), &at(19, 9, 7));

        assert_eq!(record.id, "ORD-20261019-0907-0001");
        assert_eq!(record.customer, DEFAULT_CUSTOMER);
        assert_eq!(record.source, DEFAULT_SOURCE);
        assert_eq!(record.package, "Instagram - 1000 متابع");
        assert_eq!(record.total, 5.0);
        assert_eq!(record.status, STATUS_LABEL);
        assert_eq!(record.status_code, STATUS_CODE);
        assert_eq!(record.date, "١٩ أكتوبر ٢٠٢٦");
        assert_eq!(snapshot.recent_orders[0], record);
    }

    #[test]
    fn same_minute_orders_get_distinct_ids() {
        let mut snapshot = AnalyticsSnapshot::default();
        let first = apply_order_at(&mut snapshot, &order("1"), &at(19, 10, 0));
        let second = apply_order_at(&mut snapshot, &order("1"), &at(19, 10, 0));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn recent_orders_capped_and_newest_first() {
        let mut snapshot = AnalyticsSnapshot::default();
        for minute in 0..12 {
            apply_order_at(&mut snapshot, &order("1"), &at(19, 10, minute));
        }

        assert_eq!(snapshot.recent_orders.len(), RECENT_ORDERS_LIMIT);
        assert_eq!(snapshot.recent_orders[0].id, "ORD-20261019-1011-0012");
        assert_eq!(snapshot.recent_orders[7].id, "ORD-20261019-1004-0005");
    }

    #[test]
    fn same_day_orders_share_one_trend_entry() {
        let mut snapshot = AnalyticsSnapshot::default();
        apply_order_at(&mut snapshot, &order("1.5"), &at(19, 8, 0));
        apply_order_at(&mut snapshot, &order("2.25"), &at(19, 20, 0));

        assert_eq!(snapshot.daily_trends.len(), 1);
        let entry = &snapshot.daily_trends[0];
        assert_eq!(entry.date, "2026-10-19");
        assert_eq!(entry.label, "١٩ أكتوبر");
        assert_eq!(entry.orders, 2);
        assert_eq!(entry.visits, 6);
        assert_eq!(entry.sales, 3.75);
    }

    #[test]
    fn trends_capped_sorted_and_unique() {
        let mut trends = Vec::new();
        let start = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        // Out of order on purpose, with repeats.
        for offset in (0..20).rev().chain(15..20) {
            record_daily_trend(&mut trends, start + Duration::days(offset), 1.0);
        }

        assert_eq!(trends.len(), DAILY_TRENDS_LIMIT);
        assert!(trends.windows(2).all(|pair| pair[0].date < pair[1].date));
        assert_eq!(trends.last().unwrap().date, "2026-09-20");
        assert_eq!(trends.first().unwrap().date, "2026-09-07");
        assert_eq!(trends.last().unwrap().orders, 2);
    }

    #[test]
    fn existing_trend_entry_keeps_its_label() {
        let mut trends = vec![DailyTrendEntry {
            date: "2026-10-19".into(),
            label: "seeded".into(),
            visits: 10,
            orders: 2,
            sales: 4.0,
            extra: Map::from_iter([("note".to_string(), serde_json::json!("kept"))]),
        }];
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        record_daily_trend(&mut trends, date, 0.5);

        assert_eq!(trends[0].label, "seeded");
        assert_eq!(trends[0].visits, 13);
        assert_eq!(trends[0].sales, 4.5);
        assert_eq!(trends[0].extra["note"], "kept");
    }

    #[test]
    fn rounding_follows_binary_value_like_to_fixed() {
        assert_eq!(round_to(8.345, 2), 8.34);
        assert_eq!(round_to(1.005, 2), 1.0);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(33.35, 1), 33.4);
        assert_eq!(round_to(100.0 / 3.0, 1), 33.3);
    }
}
