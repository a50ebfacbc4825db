//! CLI command implementations

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::sync::Arc;

use crate::api::{ApiClient, ApiResource, Contacts, Interactions, Restaurants, Users};
use crate::cli::{
    confirm, error, info, print_metrics, print_records, print_structured, print_user_detail,
    prompt_password, spinner, success, warn, OutputFormat, RecordAction, TableRow,
};
use crate::config::{self, Config};
use crate::error::Error;
use crate::models::{Record, Registration, ResourceKind, Saved};
use crate::policy::Action;
use crate::session::{FileCredentialStore, SessionState, SessionStore};
use crate::views::RecordList;

/// Initialize a new kamleads.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new(config::loader::CONFIG_FILENAME);

    if config_path.exists() {
        warn("kamleads.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created kamleads.toml");
    info("Set the API URL in the configuration file and run 'kamleads login --email <email>'");

    Ok(())
}

/// Log in with email and password
pub async fn login(api_url: Option<&str>, email: &str, password: Option<String>) -> Result<()> {
    let session = open_session(api_url)?;
    let password = match password {
        Some(p) => p,
        None => prompt_password(false)?,
    };

    let pb = spinner("Logging in...");
    let result = session.sign_in(email, &password).await;
    pb.finish_and_clear();

    report_login(result)
}

/// Register a new account and log into it
pub async fn register(
    api_url: Option<&str>,
    mut form: Registration,
    password: Option<String>,
) -> Result<()> {
    let session = open_session(api_url)?;
    form.password = match password {
        Some(p) => p,
        None => prompt_password(true)?,
    };

    let pb = spinner("Creating account...");
    let result = session.register(&form).await;
    pb.finish_and_clear();

    report_login(result)
}

fn report_login(result: crate::error::Result<SessionState>) -> Result<()> {
    match result {
        Ok(SessionState::Authenticated(s)) => {
            success(&format!("Logged in as {} ({})", s.user.name, s.user.role));
            Ok(())
        }
        Ok(_) => {
            error("Signed in, but the user record could not be loaded");
            bail!("session could not be resolved")
        }
        Err(e) => {
            error(&format!("Login failed: {}", e));
            Err(e.into())
        }
    }
}

/// Forget the stored session
pub async fn logout(api_url: Option<&str>) -> Result<()> {
    let session = open_session(api_url)?;
    session.logout()?;
    success("Logged out");
    Ok(())
}

/// Show the logged-in user
pub async fn whoami(api_url: Option<&str>, format: OutputFormat) -> Result<()> {
    let session = restore_session(api_url).await?;
    let user = session.current_user().ok_or(Error::NotAuthenticated)?;

    match format {
        OutputFormat::Table => print_user_detail(&user),
        _ => print_structured(&user, format)?,
    }
    Ok(())
}

pub async fn restaurants(api_url: Option<&str>, action: RecordAction) -> Result<()> {
    records::<Restaurants>(api_url, action).await
}

pub async fn contacts(api_url: Option<&str>, action: RecordAction) -> Result<()> {
    records::<Contacts>(api_url, action).await
}

pub async fn interactions(api_url: Option<&str>, action: RecordAction) -> Result<()> {
    records::<Interactions>(api_url, action).await
}

/// Users are listed through the role-scoped endpoint; everything else is
/// the generic flow
pub async fn users(api_url: Option<&str>, action: RecordAction) -> Result<()> {
    let RecordAction::List { format } = action else {
        return records::<Users>(api_url, action).await;
    };

    let session = restore_session(api_url).await?;
    session.authorize(Action::List(ResourceKind::Users), None)?;
    let pb = spinner("Fetching users...");
    let result = session.visible_users().await;
    pb.finish_and_clear();
    print_records(&result?, format, "users")
}

/// Shared list/show/create/update/delete flow for every collection.
///
/// Each action is checked against the policy first, the way a view hides
/// an affordance, before any request is sent.
async fn records<R>(api_url: Option<&str>, action: RecordAction) -> Result<()>
where
    R: ApiResource,
    R::Record: Serialize + TableRow,
    R::Draft: DeserializeOwned,
{
    let session = restore_session(api_url).await?;
    let client = session.client();
    let kind = R::KIND;

    match action {
        RecordAction::List { format } => {
            session.authorize(Action::List(kind), None)?;
            let pb = spinner(&format!("Fetching {}...", kind.plural()));
            let mut list = RecordList::<R>::new();
            let result = list.refresh(client).await.map(|_| ());
            pb.finish_and_clear();
            result?;
            print_records(list.items(), format, kind.plural())?;
        }
        RecordAction::Show { id, format } => {
            session.authorize(Action::View(kind), Some(id))?;
            let record = client.resource::<R>().get(id).await?;
            print_records(std::slice::from_ref(&record), format, kind.plural())?;
        }
        RecordAction::Create { data } => {
            session.authorize(Action::Create(kind), None)?;
            let draft: R::Draft = parse_draft(&data)?;
            let saved = client.resource::<R>().create(&draft).await?;
            success(&describe_saved(&saved, "Created", kind.singular()));
        }
        RecordAction::Update { id, data } => {
            session.authorize(Action::Edit(kind), Some(id))?;
            let draft: R::Draft = parse_draft(&data)?;
            let saved = client.resource::<R>().update(id, &draft).await?;
            success(&describe_saved(&saved, "Updated", kind.singular()));
        }
        RecordAction::Delete { id, force } => {
            session.authorize(Action::Delete(kind), Some(id))?;
            if !force {
                let message = format!("Delete {} #{}?", kind.singular(), id);
                if !confirm(&message)? {
                    info("Cancelled");
                    return Ok(());
                }
            }
            client.resource::<R>().delete(id).await?;
            success(&format!("Deleted {} #{}", kind.singular(), id));
        }
    }

    Ok(())
}

/// Show the dashboard metrics. A failing endpoint leaves its table empty.
pub async fn metrics(api_url: Option<&str>, format: OutputFormat) -> Result<()> {
    let session = restore_session(api_url).await?;
    session.authorize(Action::ViewMetrics, None)?;
    let api = session.client().metrics();

    let pb = spinner("Fetching metrics...");
    let durations = api.average_interaction_duration().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "error fetching metrics");
        Vec::new()
    });
    let underperforming = api.underperforming().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "error fetching metrics");
        Vec::new()
    });
    let scores = api.performance_scores().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "error fetching metrics");
        Vec::new()
    });
    pb.finish_and_clear();

    match format {
        OutputFormat::Table => print_metrics(&durations, &underperforming, &scores),
        _ => print_structured(
            &serde_json::json!({
                "average_interaction_duration": durations,
                "underperforming": underperforming,
                "performance_scores": scores,
            }),
            format,
        )?,
    }
    Ok(())
}

// Helper functions

fn load_config(api_url: Option<&str>) -> Result<Config> {
    let mut config = match config::load_config() {
        Ok(config) => config,
        Err(Error::ConfigNotFound) => Config::default(),
        Err(e) => return Err(anyhow::anyhow!("{}", e)),
    };
    if let Some(url) = api_url {
        config.api.base_url = url.to_string();
    }
    Ok(config)
}

/// Build a session store without touching the network
fn open_session(api_url: Option<&str>) -> Result<SessionStore> {
    let config = load_config(api_url)?;
    let credentials = Arc::new(FileCredentialStore::new(
        config.session.credentials_path.clone(),
    ));
    let client = ApiClient::from_config(&config, credentials)?;
    Ok(SessionStore::new(client))
}

/// Restore the stored session and require it to be authenticated
async fn restore_session(api_url: Option<&str>) -> Result<SessionStore> {
    let session = open_session(api_url)?;
    match session.initialize().await {
        SessionState::Authenticated(_) => Ok(session),
        _ => Err(Error::NotAuthenticated.into()),
    }
}

fn parse_draft<T: DeserializeOwned>(data: &str) -> Result<T> {
    serde_json::from_str(data).context("Invalid JSON body")
}

fn describe_saved<T: Record>(saved: &Saved<T>, verb: &str, noun: &str) -> String {
    match (saved, saved.id()) {
        (Saved::Ack { message: Some(m), .. }, _) => m.clone(),
        (_, Some(id)) => format!("{} {} #{}", verb, noun, id),
        _ => format!("{} {}", verb, noun),
    }
}
