use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use canvas_api::client::{client, Session};
use canvas_api::creds::{CredentialStore, Creds, FileCredentialStore, ProxyConfig};
use canvas_api::services::lms_service::LmsService;
use canvas_api::user::User;
use dotenvy::dotenv;
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry, EnvFilter};

pub const DEFAULT_CREDS_PATH: &str = ".canvas-creds.json";

/// Loads `.env`, finds a credential, and logs in.
pub async fn init_from_env() -> Result<Session<impl LmsService>> {
    load_dotenv();

    let store = credential_store_from_env();
    let creds = creds_from(&store)?;
    session(creds).await
}

pub fn load_dotenv() {
    if let Err(err) = dotenv() {
        debug!(%err, "no .env loaded");
    }
}

pub fn credential_store_from_env() -> FileCredentialStore {
    let path = env::var("CREDS_PATH").unwrap_or_else(|_| DEFAULT_CREDS_PATH.to_owned());
    FileCredentialStore::new(PathBuf::from(path))
}

/// A stored credential wins over `CANVAS_TOKEN`.
pub fn creds_from(store: &impl CredentialStore) -> Result<Creds> {
    if let Some(creds) = store.get()? {
        debug!("using stored credentials");
        return Ok(creds);
    }
    Creds::from_env().context("not logged in: run `login` or set CANVAS_TOKEN")
}

pub async fn session(creds: Creds) -> Result<Session<impl LmsService>> {
    let canvas = client(creds, ProxyConfig::from_env())?;
    let session = canvas.login().await?;
    info!(user = session.user().name(), "logged in");
    Ok(session)
}

/// Checks the credential against the LMS before storing it.
pub async fn login(store: &impl CredentialStore, creds: Creds) -> Result<User> {
    let session = session(creds.clone()).await?;
    store.set(&creds).context("could not store credentials")?;
    Ok(session.user().clone())
}

pub fn logout(store: &impl CredentialStore) -> Result<()> {
    store.clear().context("could not clear credentials")
}

pub fn init_tracing() {
    registry()
        .with(fmt::layer().event_format(format().pretty()))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}
