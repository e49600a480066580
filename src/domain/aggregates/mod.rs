//! Aggregates module
pub mod category;
pub mod customer;
pub mod order;
pub mod product;

pub use category::{Category, CategoryInput, CategoryListing, CategoryOption, CategoryUpdate};
pub use customer::{Review, Role, User};
pub use order::{Order, OrderItem, OrderStatus};
pub use product::{
    ImageDraft, ImageInput, Product, ProductDetail, ProductDraft, ProductImage, ProductInput, ProductListing, Tag, Variant,
    VariantDraft, VariantInput,
};
