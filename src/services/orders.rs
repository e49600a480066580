//! Order table for the admin
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::search_term;
use crate::domain::aggregates::customer::display_name;
use crate::domain::aggregates::OrderStatus;
use crate::domain::value_objects::Money;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListing {
    pub id: Uuid,
    pub customer_name: String,
    pub email: String,
    pub items_count: i64,
    pub total: i64,
    pub status: OrderStatus,
    pub payment_status: String,
    pub tx_ref: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub pending: usize,
    pub completed: usize,
    /// Sum of floored totals of completed orders.
    pub total_revenue: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrdersPage {
    pub orders: Vec<OrderListing>,
    pub stats: OrderStats,
}

impl OrderStats {
    fn tally(orders: &[OrderListing]) -> Self {
        orders.iter().fold(Self::default(), |mut stats, o| {
            match o.status {
                OrderStatus::Pending => stats.pending += 1,
                OrderStatus::Completed => {
                    stats.completed += 1;
                    stats.total_revenue += o.total;
                }
                _ => {}
            }
            stats
        })
    }
}

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn Store>,
}

impl OrderService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Newest first, optionally filtered by id, transaction reference or customer name.
    pub async fn list(&self, query: Option<&str>) -> OrdersPage {
        let search = search_term(query);
        let rows = match self.store.orders(search.as_deref(), None).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(error = %e, "failed to load orders");
                return OrdersPage::default();
            }
        };
        let orders: Vec<OrderListing> = rows
            .into_iter()
            .map(|o| OrderListing {
                id: o.id,
                customer_name: display_name(o.customer_name.as_deref(), &o.first_name, &o.last_name),
                email: o.email,
                items_count: o.items_count,
                total: Money::new(o.total_price).whole(),
                status: o.status,
                payment_status: o.payment_status,
                tx_ref: o.tx_ref,
                date: o.created_at,
            })
            .collect();
        let stats = OrderStats::tally(&orders);
        OrdersPage { orders, stats }
    }
}
