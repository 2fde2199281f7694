pub mod config;
pub mod engine;
pub mod error;
pub mod geo;
pub mod identity;
pub mod models;
pub mod observability;
pub mod session;
pub mod store;
