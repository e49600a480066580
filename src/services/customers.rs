//! Customer directory for the admin
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::search_term;
use crate::domain::aggregates::customer::display_name;
use crate::domain::value_objects::Money;
use crate::store::{CustomerRow, Store};

const VIP_MIN_ORDERS: i64 = 15;
const VIP_MIN_SPEND: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListing {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub total_orders: i64,
    pub total_spent: i64,
    pub joined_at: DateTime<Utc>,
    pub is_vip: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStats {
    pub total_count: usize,
    pub vip_count: usize,
    pub total_revenue: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomersPage {
    pub customers: Vec<CustomerListing>,
    pub stats: CustomerStats,
}

/// More than 15 completed orders, or more than 1000 spent on them.
pub fn is_vip(completed_orders: i64, completed_spend: Decimal) -> bool {
    completed_orders > VIP_MIN_ORDERS || completed_spend > VIP_MIN_SPEND
}

impl From<CustomerRow> for CustomerListing {
    fn from(c: CustomerRow) -> Self {
        Self {
            id: c.id,
            name: display_name(c.name.as_deref(), &c.first_name, &c.last_name),
            email: c.email,
            image: c.image,
            total_orders: c.completed_orders,
            total_spent: Money::new(c.completed_spend).whole(),
            joined_at: c.created_at,
            is_vip: is_vip(c.completed_orders, c.completed_spend),
        }
    }
}

#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn Store>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Shopper accounts only, newest first.
    pub async fn list(&self, query: Option<&str>) -> CustomersPage {
        let search = search_term(query);
        let customers: Vec<CustomerListing> = match self.store.customers(search.as_deref()).await {
            Ok(rows) => rows.into_iter().map(CustomerListing::from).collect(),
            Err(e) => {
                tracing::error!(error = %e, "failed to load customers");
                return CustomersPage::default();
            }
        };
        let stats = CustomerStats {
            total_count: customers.len(),
            vip_count: customers.iter().filter(|c| c.is_vip).count(),
            total_revenue: customers.iter().map(|c| c.total_spent).sum(),
        };
        CustomersPage { customers, stats }
    }
}
