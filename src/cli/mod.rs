//! CLI interface for kamleads

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

use crate::models::Role;

#[derive(Parser)]
#[command(name = "kamleads")]
#[command(version)]
#[command(about = "Manage restaurant leads, contacts and interactions", long_about = None)]
pub struct Cli {
    /// API base URL, overriding kamleads.toml
    #[arg(long, global = true, env = "KAM_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new kamleads.toml configuration file
    Init,

    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        email: String,

        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account and log into it
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(long)]
        phone: String,

        /// KAM, Manager or Admin
        #[arg(short, long, default_value = "KAM")]
        role: Role,

        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Manage restaurant leads
    Restaurants {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Manage restaurant contacts
    Contacts {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Manage logged interactions
    Interactions {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Show dashboard metrics
    Metrics {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// List records
    List {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show a single record
    Show {
        id: i64,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Create a record from a JSON document
    Create {
        /// JSON body, e.g. '{"name": "Blue Door"}'
        #[arg(short, long)]
        data: String,
    },

    /// Update a record from a JSON document
    Update {
        id: i64,

        #[arg(short, long)]
        data: String,
    },

    /// Delete a record
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
