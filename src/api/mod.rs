//! Request client for the lead management REST API

pub mod auth;
mod client;
pub mod metrics;
mod request;
mod resources;

pub use client::ApiClient;
pub use metrics::MetricsApi;
pub use request::RequestDescriptor;
pub use resources::*;
