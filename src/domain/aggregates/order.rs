//! Order Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

/// Payment status value written by the payment provider callback on success.
pub const PAYMENT_SUCCESS: &str = "success";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub payment_status: String,
    pub tx_ref: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    /// Cleared when the product is deleted; the line itself survives.
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub price: Decimal,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PAYMENT_SUCCESS
    }

    /// Short id shown on the dashboard: last seven characters, upper-cased.
    pub fn display_id(id: &Uuid) -> String {
        let full = id.simple().to_string();
        full[full.len() - 7..].to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_id() {
        let id = Uuid::parse_str("0190d3f2-7c1a-7b2e-9a55-00000abcdef1").unwrap();
        assert_eq!(Order::display_id(&id), "ABCDEF1");
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&OrderStatus::Completed).unwrap(), "\"COMPLETED\"");
        let parsed: OrderStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(parsed, OrderStatus::Cancelled);
    }
}
