mod commands;
mod config;
mod error;

use std::{process::ExitCode, time::Duration};

use chefbook_client::{BookingStore, HttpRepository};

use crate::error::Result;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let (settings, command) = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "chefbook={level},chefbook_client={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let repository = HttpRepository::new(
        &settings.base_url,
        settings.token.clone(),
        Some(Duration::from_secs(settings.timeout_secs)),
    )?;
    let actor = settings.actor();
    tracing::debug!("signed in as {} {}", actor.role, actor.id);

    let store = BookingStore::new(repository, actor).with_cancel_mode(settings.cancel_mode);
    let output = commands::execute(&store, command, &settings.currency).await?;
    println!("{output}");
    Ok(())
}
