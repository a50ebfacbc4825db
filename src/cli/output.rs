//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use dialoguer::{theme::ColorfulTheme, Confirm, Password};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

use crate::models::{
    AverageInteractionDuration, Contact, Interaction, PerformanceScore, Restaurant,
    RestaurantStatus, UnderperformingRestaurant, User,
};

use super::OutputFormat;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Confirm an action with the user
pub fn confirm(message: &str) -> anyhow::Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(false)
        .interact()?)
}

/// Read a password without echoing it
pub fn prompt_password(confirmation: bool) -> anyhow::Result<String> {
    let theme = ColorfulTheme::default();
    let mut prompt = Password::with_theme(&theme).with_prompt("Password");
    if confirmation {
        prompt = prompt.with_confirmation("Repeat password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

/// Spinner shown while waiting on the API
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// A record that can be shown as a table row
pub trait TableRow {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<Cell>;
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl TableRow for Restaurant {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Address", "Status", "Call Frequency", "Last Call"]
    }

    fn row(&self) -> Vec<Cell> {
        let status_color = match self.status {
            RestaurantStatus::Converted => Color::Green,
            RestaurantStatus::Lost => Color::Red,
            RestaurantStatus::Contacted => Color::Yellow,
            RestaurantStatus::New => Color::Blue,
        };
        vec![
            Cell::new(self.id),
            Cell::new(&self.name),
            Cell::new(opt(&self.address)),
            Cell::new(self.status).fg(status_color),
            Cell::new(self.call_frequency),
            Cell::new(opt(&self.last_call_date.map(|d| d.format("%Y-%m-%d")))),
        ]
    }
}

impl TableRow for Contact {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Role", "Email", "Phone", "Restaurant"]
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::new(self.id),
            Cell::new(&self.name),
            Cell::new(&self.role),
            Cell::new(opt(&self.email)),
            Cell::new(opt(&self.phone)),
            Cell::new(opt(&self.restaurant_id)),
        ]
    }
}

impl TableRow for Interaction {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Date", "Type", "Outcome", "Details", "Restaurant"]
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::new(self.id),
            Cell::new(self.interaction_date.format("%Y-%m-%d")),
            Cell::new(self.kind),
            Cell::new(opt(&self.outcome)),
            Cell::new(opt(&self.details)),
            Cell::new(opt(&self.restaurant_id)),
        ]
    }
}

impl TableRow for User {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Email", "Role", "Created"]
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::new(self.id),
            Cell::new(&self.name),
            Cell::new(&self.email),
            Cell::new(self.role).fg(Color::Cyan),
            Cell::new(opt(&self.created_at.map(|d| d.format("%Y-%m-%d")))),
        ]
    }
}

fn header_table(headers: Vec<&'static str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .into_iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    table
}

/// Print serializable data as JSON or YAML
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Table => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
        }
    }
    Ok(())
}

/// Print a list of records in the requested format
pub fn print_records<T: TableRow + Serialize>(
    records: &[T],
    format: OutputFormat,
    noun: &str,
) -> anyhow::Result<()> {
    if !matches!(format, OutputFormat::Table) {
        return print_structured(records, format);
    }

    if records.is_empty() {
        info(&format!("No {} found", noun));
        return Ok(());
    }

    let mut table = header_table(T::headers());
    for record in records {
        table.add_row(record.row());
    }
    println!("{table}");
    Ok(())
}

/// Print detailed user information
pub fn print_user_detail(user: &User) {
    println!("{}", "Current User".bold().underline());
    println!();
    println!("  {} {}", "ID:".bold(), user.id);
    println!("  {} {}", "Name:".bold(), user.name);
    println!("  {} {}", "Email:".bold(), user.email);
    println!("  {} {}", "Phone:".bold(), opt(&user.phone));
    println!("  {} {}", "Role:".bold(), user.role.to_string().cyan());
}

/// Print the three dashboard tables
pub fn print_metrics(
    durations: &[AverageInteractionDuration],
    underperforming: &[UnderperformingRestaurant],
    scores: &[PerformanceScore],
) {
    println!("{}", "Average Interaction Duration".bold().underline());
    let mut table = header_table(vec!["Restaurant", "Minutes"]);
    for d in durations {
        table.add_row(vec![
            Cell::new(&d.name),
            Cell::new(opt(&d.average_interaction_duration.map(|m| format!("{:.1}", m)))),
        ]);
    }
    println!("{table}");

    println!();
    println!("{}", "Underperforming Restaurants".bold().underline());
    let mut table = header_table(vec!["Restaurant", "Days Since Last Interaction"]);
    for u in underperforming {
        table.add_row(vec![
            Cell::new(&u.name),
            Cell::new(opt(&u.time_since_last_interaction)).fg(Color::Red),
        ]);
    }
    println!("{table}");

    println!();
    println!("{}", "Performance Scores".bold().underline());
    let mut table = header_table(vec!["Restaurant", "Score"]);
    for s in scores {
        table.add_row(vec![
            Cell::new(&s.name),
            Cell::new(opt(&s.performance_score.map(|p| format!("{:.2}", p)))).fg(Color::Green),
        ]);
    }
    println!("{table}");
}
