//! Admin dashboard aggregates
//!
//! Every read here degrades instead of failing: a storage error is logged and
//! the widget gets its zero value, so one broken query never blanks the page.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::aggregates::customer::{display_name, initials, short_name};
use crate::domain::aggregates::{Order, OrderStatus};
use crate::domain::value_objects::Money;
use crate::store::{CategoryStock, RevenueRow, Store};
use crate::Result;

/// Variants below this count show up in the low-stock KPI.
pub const ALERT_STOCK_THRESHOLD: i32 = 5;
/// Variants below this count are listed in the inventory widget.
pub const INVENTORY_STOCK_THRESHOLD: i32 = 10;
const INVENTORY_LIMIT: i64 = 10;
const RECENT_ORDER_LIMIT: i64 = 5;
const TOP_CUSTOMER_LIMIT: usize = 5;
const URGENT_REVIEW_MAX_RATING: i32 = 3;
const URGENT_REVIEW_LIMIT: i64 = 5;
/// Slices shown in the category chart before the tail folds into "Others".
const DISTRIBUTION_SLICES: usize = 6;

const GUEST_CUSTOMER: &str = "Guest Customer";
const NO_COMMENT: &str = "No comment provided.";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_revenue: i64,
    pub customer_count: i64,
    pub product_count: i64,
    pub average_rating: f64,
    pub low_stock_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentOrder {
    pub id: String,
    pub customer: String,
    pub amount: i64,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockItem {
    pub name: String,
    pub variant: String,
    pub stock: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenuePoint {
    /// `YYYY-MM-DD`, UTC.
    pub date: String,
    pub revenue: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueWindow {
    Today,
    Week,
    Month,
    Year,
}

impl RevenueWindow {
    pub const ALL: [RevenueWindow; 4] = [Self::Today, Self::Week, Self::Month, Self::Year];

    /// Days before today covered by the window; today itself is always included.
    pub fn days(self) -> i64 {
        match self {
            Self::Today => 0,
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevenueCharts {
    pub today: Vec<RevenuePoint>,
    pub week: Vec<RevenuePoint>,
    pub month: Vec<RevenuePoint>,
    pub year: Vec<RevenuePoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevenueSummary {
    pub today: i64,
    pub week: i64,
    pub month: i64,
    pub year: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevenueSeries {
    pub charts: RevenueCharts,
    pub summary: RevenueSummary,
}

impl RevenueSeries {
    fn insert(&mut self, window: RevenueWindow, points: Vec<RevenuePoint>) {
        let total = points.iter().map(|p| p.revenue).sum();
        let (chart, summary) = match window {
            RevenueWindow::Today => (&mut self.charts.today, &mut self.summary.today),
            RevenueWindow::Week => (&mut self.charts.week, &mut self.summary.week),
            RevenueWindow::Month => (&mut self.charts.month, &mut self.summary.month),
            RevenueWindow::Year => (&mut self.charts.year, &mut self.summary.year),
        };
        *chart = points;
        *summary = total;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub id: String,
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCustomer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub spent: i64,
    pub initials: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrgentReview {
    pub id: String,
    pub user: String,
    pub rating: i32,
    pub comment: String,
    pub product: String,
}

/// Midnight UTC `days` before `today`.
pub fn window_start(today: NaiveDate, days: i64) -> DateTime<Utc> {
    Utc.from_utc_datetime(&(today - Duration::days(days)).and_time(NaiveTime::MIN))
}

/// Zero-fills one bucket per day from `days` ago through `today`, then adds
/// each order into the bucket of its creation date. Orders outside the
/// range are ignored. Points come out oldest first, floored to whole units.
pub fn bucket_revenue(today: NaiveDate, days: i64, orders: &[RevenueRow]) -> Vec<RevenuePoint> {
    let mut buckets: BTreeMap<NaiveDate, Money> = (0..=days).map(|back| (today - Duration::days(back), Money::ZERO)).collect();
    for order in orders {
        if let Some(bucket) = buckets.get_mut(&order.created_at.date_naive()) {
            *bucket += Money::new(order.total_price);
        }
    }
    buckets
        .into_iter()
        .map(|(date, revenue)| RevenuePoint { date: date.format("%Y-%m-%d").to_string(), revenue: revenue.whole() })
        .collect()
}

/// Drops empty categories and orders the rest by stock, largest first (ties
/// by id). More than six slices collapse into the top five plus "Others".
pub fn collapse_distribution(rows: Vec<CategoryStock>) -> Vec<CategoryShare> {
    let mut rows: Vec<CategoryStock> = rows.into_iter().filter(|r| r.stock > 0).collect();
    rows.sort_by_key(|r| (Reverse(r.stock), r.id));

    let share = |r: CategoryStock| CategoryShare { id: r.id.to_string(), name: r.name, count: r.stock };
    if rows.len() <= DISTRIBUTION_SLICES {
        return rows.into_iter().map(share).collect();
    }
    let tail = rows.split_off(DISTRIBUTION_SLICES - 1);
    let mut shares: Vec<CategoryShare> = rows.into_iter().map(share).collect();
    shares.push(CategoryShare { id: "others".into(), name: "Others".into(), count: tail.iter().map(|r| r.stock).sum() });
    shares
}

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn Store>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Headline KPIs. The five aggregates run concurrently; if any of them
    /// fails the whole card falls back to zeros.
    pub async fn metrics(&self) -> Metrics {
        match self.try_metrics().await {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::error!(error = %e, "failed to compute dashboard metrics");
                Metrics::default()
            }
        }
    }

    async fn try_metrics(&self) -> Result<Metrics> {
        let store = &*self.store;
        let (revenue, customer_count, product_count, average_rating, low_stock_count) = tokio::try_join!(
            store.paid_revenue(),
            store.customer_count(),
            store.active_product_count(),
            store.average_rating(),
            store.variants_below(ALERT_STOCK_THRESHOLD),
        )?;
        Ok(Metrics {
            total_revenue: Money::new(revenue).whole(),
            customer_count,
            product_count,
            average_rating: average_rating.unwrap_or(0.0),
            low_stock_count,
        })
    }

    pub async fn recent_orders(&self) -> Vec<RecentOrder> {
        match self.store.orders(None, Some(RECENT_ORDER_LIMIT)).await {
            Ok(rows) => rows
                .into_iter()
                .map(|o| RecentOrder {
                    id: Order::display_id(&o.id),
                    customer: o.customer_name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| GUEST_CUSTOMER.to_string()),
                    amount: Money::new(o.total_price).whole(),
                    status: o.status,
                })
                .collect(),
            Err(e) => {
                tracing::error!(error = %e, "failed to load recent orders");
                Vec::new()
            }
        }
    }

    pub async fn low_stock(&self) -> Vec<LowStockItem> {
        match self.store.low_stock_variants(INVENTORY_STOCK_THRESHOLD, INVENTORY_LIMIT).await {
            Ok(rows) => rows
                .into_iter()
                .map(|r| LowStockItem {
                    name: r.product_title,
                    variant: format!("{}: {}", r.variant_type, r.variant_value),
                    stock: r.stock,
                })
                .collect(),
            Err(e) => {
                tracing::error!(error = %e, "failed to load low-stock variants");
                Vec::new()
            }
        }
    }

    pub async fn revenue_series(&self) -> RevenueSeries {
        self.revenue_series_at(Utc::now()).await
    }

    /// Each window issues its own query, one after another.
    pub async fn revenue_series_at(&self, now: DateTime<Utc>) -> RevenueSeries {
        let today = now.date_naive();
        let mut series = RevenueSeries::default();
        for window in RevenueWindow::ALL {
            match self.store.paid_orders_since(window_start(today, window.days())).await {
                Ok(orders) => series.insert(window, bucket_revenue(today, window.days(), &orders)),
                Err(e) => {
                    tracing::error!(error = %e, ?window, "failed to load revenue window");
                    return RevenueSeries::default();
                }
            }
        }
        series
    }

    pub async fn category_distribution(&self) -> Vec<CategoryShare> {
        match self.store.category_stock().await {
            Ok(rows) => collapse_distribution(rows),
            Err(e) => {
                tracing::error!(error = %e, "failed to load category distribution");
                Vec::new()
            }
        }
    }

    /// Customers ranked by what they spent on completed orders.
    pub async fn top_customers(&self) -> Vec<TopCustomer> {
        let rows = match self.store.customers(None).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(error = %e, "failed to load top customers");
                return Vec::new();
            }
        };
        let mut ranked: Vec<(Decimal, TopCustomer)> = rows
            .into_iter()
            .map(|c| {
                let customer = TopCustomer {
                    id: c.id.to_string(),
                    name: display_name(c.name.as_deref(), &c.first_name, &c.last_name),
                    initials: initials(&c.first_name, &c.last_name),
                    email: c.email,
                    image: c.image,
                    spent: Money::new(c.completed_spend).whole(),
                };
                (c.completed_spend, customer)
            })
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked.into_iter().take(TOP_CUSTOMER_LIMIT).map(|(_, c)| c).collect()
    }

    /// Newest low-rated reviews.
    pub async fn urgent_reviews(&self) -> Vec<UrgentReview> {
        match self.store.reviews_at_most(URGENT_REVIEW_MAX_RATING, URGENT_REVIEW_LIMIT).await {
            Ok(rows) => rows
                .into_iter()
                .map(|r| UrgentReview {
                    id: r.id.to_string(),
                    user: short_name(r.user_name.as_deref(), &r.first_name, &r.last_name),
                    rating: r.rating,
                    comment: r.comment.filter(|c| !c.trim().is_empty()).unwrap_or_else(|| NO_COMMENT.to_string()),
                    product: r.product_title,
                })
                .collect(),
            Err(e) => {
                tracing::error!(error = %e, "failed to load urgent reviews");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::Review;
    use crate::store::fixtures::{draft, order, user};
    use crate::store::MemoryStore;
    use uuid::Uuid;

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn stock(name: &str, stock: i64) -> CategoryStock {
        CategoryStock { id: Uuid::new_v4(), name: name.into(), stock }
    }

    #[test]
    fn test_bucket_revenue_zero_fills_and_orders_oldest_first() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let rows = vec![
            RevenueRow { total_price: Decimal::new(1050, 2), created_at: noon(2024, 3, 1) },
            RevenueRow { total_price: Decimal::new(1075, 2), created_at: noon(2024, 3, 1) },
            // Outside the window on both sides.
            RevenueRow { total_price: Decimal::new(999, 0), created_at: noon(2024, 2, 20) },
            RevenueRow { total_price: Decimal::new(999, 0), created_at: noon(2024, 3, 3) },
        ];
        let points = bucket_revenue(today, 2, &rows);
        let dates: Vec<_> = points.iter().map(|p| p.date.as_str()).collect();
        // 2024 is a leap year.
        assert_eq!(dates, ["2024-02-29", "2024-03-01", "2024-03-02"]);
        // 10.50 + 10.75 floors to 21, not 10 + 10.
        assert_eq!(points.iter().map(|p| p.revenue).collect::<Vec<_>>(), [0, 21, 0]);
    }

    #[test]
    fn test_today_window_is_one_bucket() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(bucket_revenue(today, 0, &[]), vec![RevenuePoint { date: "2024-06-15".into(), revenue: 0 }]);
        assert_eq!(bucket_revenue(today, 365, &[]).len(), 366);
        assert_eq!(window_start(today, 7), Utc.with_ymd_and_hms(2024, 6, 8, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_distribution_collapses_tail() {
        let rows = [50, 40, 30, 20, 10, 5, 1].iter().enumerate().map(|(i, s)| stock(&format!("C{i}"), *s)).collect();
        let shares = collapse_distribution(rows);
        assert_eq!(shares.len(), 6);
        assert_eq!(shares.iter().take(5).map(|s| s.count).collect::<Vec<_>>(), [50, 40, 30, 20, 10]);
        assert_eq!(shares[0].name, "C0");
        assert_eq!(shares[5], CategoryShare { id: "others".into(), name: "Others".into(), count: 6 });
    }

    #[test]
    fn test_distribution_keeps_six_or_fewer() {
        let rows = vec![stock("A", 3), stock("Empty", 0), stock("B", 9), stock("C", 1), stock("D", 2), stock("E", 4), stock("F", 5)];
        let shares = collapse_distribution(rows);
        assert_eq!(shares.len(), 6);
        assert!(shares.iter().all(|s| s.id != "others" && s.count > 0));
        assert_eq!(shares.iter().map(|s| s.count).collect::<Vec<_>>(), [9, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_distribution_ties_break_on_id() {
        let mut a = stock("A", 5);
        let mut b = stock("B", 5);
        a.id = Uuid::from_u128(2);
        b.id = Uuid::from_u128(1);
        let shares = collapse_distribution(vec![a, b]);
        assert_eq!(shares[0].name, "B");
    }

    #[tokio::test]
    async fn test_revenue_windows() {
        let store = Arc::new(MemoryStore::new());
        let buyer = user("ada@example.com", "Ada", "Lovelace", None);
        let buyer_id = buyer.id;
        store.insert_user(buyer).await.unwrap();

        let now = noon(2024, 6, 15);
        for (total, at) in [(100, now), (200, now), (50, now - Duration::days(10))] {
            store.insert_order(order(buyer_id, Decimal::from(total), OrderStatus::Completed, true, at), vec![]).await.unwrap();
        }
        // Unpaid orders never count.
        store.insert_order(order(buyer_id, Decimal::from(1000), OrderStatus::Pending, false, now), vec![]).await.unwrap();

        let series = DashboardService::new(store).revenue_series_at(now).await;
        assert_eq!(series.summary, RevenueSummary { today: 300, week: 300, month: 350, year: 350 });
        assert_eq!(series.charts.week.len(), 8);
        assert_eq!(series.charts.week.last().unwrap(), &RevenuePoint { date: "2024-06-15".into(), revenue: 300 });
        assert_eq!(series.charts.month.len(), 31);
    }

    #[tokio::test]
    async fn test_metrics() {
        let store = Arc::new(MemoryStore::new());
        let cat = store.insert_category("Audio", "audio").await.unwrap();
        let p = store.insert_product(&draft(cat.id, "speaker", &[2, 20])).await.unwrap();
        let archived = store.insert_product(&draft(cat.id, "old", &[4])).await.unwrap();
        store.set_product_archived(archived.product.id, true).await.unwrap();

        let buyer = user("ada@example.com", "Ada", "Lovelace", None);
        let buyer_id = buyer.id;
        store.insert_user(buyer).await.unwrap();
        store.insert_order(order(buyer_id, Decimal::new(10099, 2), OrderStatus::Completed, true, Utc::now()), vec![]).await.unwrap();
        for rating in [4, 5] {
            let review = Review { id: Uuid::new_v4(), product_id: p.product.id, user_id: buyer_id, rating, comment: None, created_at: Utc::now() };
            store.insert_review(review).await.unwrap();
        }

        let metrics = DashboardService::new(store).metrics().await;
        assert_eq!(metrics, Metrics { total_revenue: 100, customer_count: 1, product_count: 1, average_rating: 4.5, low_stock_count: 2 });
    }

    #[tokio::test]
    async fn test_empty_store_gives_zeros() {
        let svc = DashboardService::new(Arc::new(MemoryStore::new()));
        assert_eq!(svc.metrics().await, Metrics::default());
        assert!(svc.category_distribution().await.is_empty());
        assert!(svc.recent_orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_widget_formatting() {
        let store = Arc::new(MemoryStore::new());
        let cat = store.insert_category("Audio", "audio").await.unwrap();
        let p = store.insert_product(&draft(cat.id, "speaker", &[3, 50])).await.unwrap();

        let named = user("jd@example.com", "John", "Doe", Some("JD"));
        let guest = user("jane@example.com", "Jane", "Smith", None);
        let (named_id, guest_id) = (named.id, guest.id);
        store.insert_user(named).await.unwrap();
        store.insert_user(guest).await.unwrap();

        let big = order(guest_id, Decimal::new(50099, 2), OrderStatus::Completed, true, Utc::now());
        let big_display = Order::display_id(&big.id);
        store.insert_order(order(named_id, Decimal::new(2000, 2), OrderStatus::Completed, true, Utc::now() - Duration::hours(1)), vec![]).await.unwrap();
        store.insert_order(big, vec![]).await.unwrap();
        store.insert_order(order(named_id, Decimal::new(99999, 2), OrderStatus::Cancelled, false, Utc::now()), vec![]).await.unwrap();

        let review = Review { id: Uuid::new_v4(), product_id: p.product.id, user_id: guest_id, rating: 2, comment: None, created_at: Utc::now() };
        store.insert_review(review).await.unwrap();
        let review = Review { id: Uuid::new_v4(), product_id: p.product.id, user_id: named_id, rating: 5, comment: None, created_at: Utc::now() };
        store.insert_review(review).await.unwrap();

        let svc = DashboardService::new(store);

        let recent = svc.recent_orders().await;
        assert_eq!(recent.len(), 3);
        let shown = recent.iter().find(|o| o.id == big_display).unwrap();
        assert_eq!((shown.customer.as_str(), shown.amount), (GUEST_CUSTOMER, 500));
        assert_eq!(shown.id.len(), 7);

        let low = svc.low_stock().await;
        assert_eq!(low, vec![LowStockItem { name: "Product speaker".into(), variant: "Size: S0".into(), stock: 3 }]);

        let top = svc.top_customers().await;
        assert_eq!(top.iter().map(|c| (c.name.as_str(), c.spent)).collect::<Vec<_>>(), [("Jane Smith", 500), ("JD", 20)]);
        assert_eq!(top[0].initials, "JS");

        let urgent = svc.urgent_reviews().await;
        assert_eq!(urgent.len(), 1);
        assert_eq!((urgent[0].user.as_str(), urgent[0].comment.as_str()), ("Jane S.", NO_COMMENT));
    }
}
