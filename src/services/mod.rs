//! Back-office actions over a [`Store`](crate::store::Store)
pub mod categories;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod slug;

pub use categories::CategoryService;
pub use customers::CustomerService;
pub use dashboard::DashboardService;
pub use orders::OrderService;
pub use products::ProductService;

/// Trims a free-text search box value; blank means "no filter".
pub(crate) fn search_term(query: Option<&str>) -> Option<String> {
    query.map(str::trim).filter(|q| !q.is_empty()).map(str::to_string)
}
