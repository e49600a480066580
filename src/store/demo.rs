//! Demo catalog for running without a database

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{MemoryStore, Store};
use crate::domain::aggregates::order::PAYMENT_SUCCESS;
use crate::domain::aggregates::{ImageDraft, Order, OrderItem, OrderStatus, ProductDraft, Review, Role, User, VariantDraft};
use crate::Result;

struct DemoProduct {
    title: &'static str,
    slug: &'static str,
    price: i64,
    variants: &'static [(&'static str, &'static str, i32)],
}

const CATALOG: &[(&str, &str, &[DemoProduct])] = &[
    (
        "Audio",
        "audio",
        &[
            DemoProduct { title: "Studio Headphones", slug: "studio-headphones", price: 14999, variants: &[("Color", "Black", 34), ("Color", "White", 3)] },
            DemoProduct { title: "Bookshelf Speakers", slug: "bookshelf-speakers", price: 22900, variants: &[("Finish", "Walnut", 12)] },
        ],
    ),
    (
        "Computing",
        "computing",
        &[
            DemoProduct { title: "Mechanical Keyboard", slug: "mechanical-keyboard", price: 8950, variants: &[("Switch", "Brown", 40), ("Switch", "Red", 8)] },
            DemoProduct { title: "Portable SSD", slug: "portable-ssd", price: 11900, variants: &[("Storage", "1TB", 25), ("Storage", "2TB", 4)] },
        ],
    ),
    ("Gift Cards", "gift-cards", &[]),
];

impl MemoryStore {
    /// Fills an empty store with a small catalog, a few customers and a month of orders.
    pub async fn seed_demo(&self) -> Result<()> {
        let mut product_ids = Vec::new();
        for (name, slug, products) in CATALOG {
            let category = self.insert_category(name, slug).await?;
            for p in *products {
                let price = Decimal::new(p.price, 2);
                let draft = ProductDraft {
                    title: p.title.into(),
                    slug: p.slug.into(),
                    description: format!("{} from the demo catalog.", p.title),
                    title_price: price,
                    discounted_price: None,
                    category_id: category.id,
                    main_image_url: format!("https://images.example.com/{}.jpg", p.slug),
                    is_featured: false,
                    is_archived: false,
                    colors: Vec::new(),
                    images: vec![ImageDraft {
                        url: format!("https://images.example.com/{}-1.jpg", p.slug),
                        key: format!("{}-1", p.slug),
                        alt_text: Some(p.title.into()),
                        order: 0,
                    }],
                    variants: p
                        .variants
                        .iter()
                        .map(|(kind, value, stock)| VariantDraft { kind: (*kind).into(), value: (*value).into(), price, stock: *stock })
                        .collect(),
                    tags: vec!["demo".into()],
                };
                let detail = self.insert_product(&draft).await?;
                product_ids.push((detail.product.id, price));
            }
        }

        let now = Utc::now();
        let people = [("amara@example.com", "Amara", "Okafor", Some("Amara O.")), ("li@example.com", "Li", "Wei", None)];
        for (i, (email, first, last, name)) in people.into_iter().enumerate() {
            let user = User {
                id: Uuid::now_v7(),
                email: email.into(),
                first_name: first.into(),
                last_name: last.into(),
                name: name.map(Into::into),
                image: None,
                role: Role::User,
                created_at: now - Duration::days(60),
            };
            let user_id = user.id;
            self.insert_user(user).await?;

            for (day, (product_id, price)) in product_ids.iter().enumerate() {
                let status = if (day + i) % 3 == 0 { OrderStatus::Pending } else { OrderStatus::Completed };
                let order = Order {
                    id: Uuid::now_v7(),
                    user_id,
                    total_price: *price,
                    status,
                    payment_status: if status == OrderStatus::Completed { PAYMENT_SUCCESS.into() } else { "pending".into() },
                    tx_ref: format!("demo-{i}-{day}"),
                    created_at: now - Duration::days((day * 6 + i) as i64),
                };
                let item = OrderItem { id: Uuid::now_v7(), order_id: order.id, product_id: Some(*product_id), quantity: 1, price: *price };
                self.insert_order(order, vec![item]).await?;
            }

            if let Some((product_id, _)) = product_ids.get(i) {
                let review = Review {
                    id: Uuid::now_v7(),
                    product_id: *product_id,
                    user_id,
                    rating: if i == 0 { 2 } else { 5 },
                    comment: (i == 0).then(|| "Arrived with a scratched housing.".to_string()),
                    created_at: now - Duration::days(i as i64),
                };
                self.insert_review(review).await?;
            }
        }
        tracing::info!(products = product_ids.len(), "demo data seeded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_populates_every_widget_source() {
        let store = MemoryStore::new();
        store.seed_demo().await.unwrap();
        assert_eq!(store.list_categories().await.unwrap().len(), 3);
        assert_eq!(store.count_products(None).await.unwrap(), 4);
        assert_eq!(store.customer_count().await.unwrap(), 2);
        assert_eq!(store.orders(None, None).await.unwrap().len(), 8);
        assert_eq!(store.reviews_at_most(3, 5).await.unwrap().len(), 1);
        assert!(store.paid_revenue().await.unwrap() > Decimal::ZERO);
    }
}
