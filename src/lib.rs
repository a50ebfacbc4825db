//! kamleads - client for the KAM lead management API
//!
//! The library holds the data-access and session layer: a request client
//! for the REST API, a session store that persists and resolves the logged-in
//! user, and the view-filter that decides which actions a session may offer.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod session;
pub mod views;

pub use api::ApiClient;
pub use config::Config;
pub use error::Error;
pub use policy::{can_perform, Action};
pub use session::{SessionState, SessionStore};
