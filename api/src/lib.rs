pub mod config;
pub mod error;
pub mod media;
pub mod metrics;
pub mod observability;
pub mod query;
pub mod state;
pub mod validation;
