use chefbook_client::CancelMode;
use clap::Parser;
use engine::{Actor, Role};
use serde::Deserialize;

use crate::{
    commands::Command,
    error::{AppError, Result},
};

const DEFAULT_CONFIG_PATH: &str = "config/chefbook.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub actor_id: String,
    pub role: Role,
    pub cancel_mode: CancelMode,
    pub timeout_secs: u64,
    /// Label printed in front of amounts.
    pub currency: String,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api/".to_string(),
            token: None,
            actor_id: String::new(),
            role: Role::Client,
            cancel_mode: CancelMode::Status,
            timeout_secs: 10,
            currency: "KSH".to_string(),
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// The signed-in user the bookings are loaded for.
    pub fn actor(&self) -> Actor {
        Actor::new(self.actor_id.clone(), self.role)
    }
}

#[derive(Debug, Parser)]
#[command(name = "chefbook", about = "Request and manage private chef bookings")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8000/api/).
    #[arg(long)]
    base_url: Option<String>,
    /// Bearer token of the signed-in user.
    #[arg(long)]
    token: Option<String>,
    /// Override the signed-in user id.
    #[arg(long)]
    actor_id: Option<String>,
    /// Override the signed-in user role (client or chef).
    #[arg(long)]
    role: Option<Role>,
    /// How cancellations are persisted (status or delete).
    #[arg(long)]
    cancel_mode: Option<CancelMode>,
    /// Override log level.
    #[arg(long)]
    level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

pub fn load() -> Result<(AppConfig, Command)> {
    let args = Args::parse();
    let settings = resolve(&args)?;
    Ok((settings, args.command))
}

/// Layer the config file, `CHEFBOOK_*` environment variables and `args`.
fn resolve(args: &Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("CHEFBOOK"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(token) = &args.token {
        settings.token = Some(token.clone());
    }
    if let Some(actor_id) = &args.actor_id {
        settings.actor_id = actor_id.clone();
    }
    if let Some(role) = args.role {
        settings.role = role;
    }
    if let Some(cancel_mode) = args.cancel_mode {
        settings.cancel_mode = cancel_mode;
    }
    if let Some(level) = &args.level {
        settings.level = level.clone();
    }

    settings.token = settings.token.filter(|token| !token.trim().is_empty());
    settings.actor_id = settings.actor_id.trim().to_string();
    if settings.actor_id.is_empty() {
        return Err(AppError::InvalidArgument(
            "actor_id is required (--actor-id or CHEFBOOK_ACTOR_ID)".to_string(),
        ));
    }
    if settings.timeout_secs == 0 {
        return Err(AppError::InvalidArgument(
            "timeout_secs must be positive".to_string(),
        ));
    }

    Ok(settings)
}
