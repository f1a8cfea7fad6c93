//! Warehouse operations over the ODX proxy client.
//!
//! Typed record shapes and call-sites for the product catalog,
//! stock-receiving, and company selection flows, plus the validated settings
//! collaborator that configures the client.

pub mod companies;
pub mod models;
pub mod products;
pub mod receiving;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

pub use models::{Company, Picking, Product, StockMove};
pub use settings::{Settings, SettingsError};
