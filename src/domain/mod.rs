//! Domain model: aggregates, value objects and catalog events
pub mod aggregates;
pub mod alerts;
pub mod events;
pub mod product_form;
pub mod value_objects;
