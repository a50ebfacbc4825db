//! Configuration management for kamleads

pub mod loader;
mod schema;

pub use loader::{find_config_from, load_config, load_config_from_path, save_config};
pub use schema::*;
