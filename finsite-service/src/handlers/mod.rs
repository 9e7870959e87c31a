//! HTTP handlers for finsite-service.

pub mod calculators;
pub mod chat;
pub mod health;
pub mod market;
pub mod stocks;
pub mod subscribe;

pub use health::{health_check, metrics};
