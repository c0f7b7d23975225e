//! Canonical wire representations returned by the service layer.

pub mod categories;
pub mod products;
pub mod users;
