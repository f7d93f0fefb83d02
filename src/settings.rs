use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};

use secrecy::Secret;

use serde::Deserialize;
use serde_aux::prelude::*;

use sqlx::sqlite::SqliteConnectOptions;

use url::Url;

use crate::client::EmailClient;
use crate::notifier::NotifierConfig;

/// Plain environment variable names that override the layered settings,
/// as (variable, settings key) pairs
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DB_PATH", "database.path"),
    ("PORT", "app.port"),
    ("EMAILJS_SERVICE_ID", "email.service_id"),
    ("EMAILJS_TEMPLATE_ID", "email.template_id"),
    ("EMAILJS_WELCOME_TEMPLATE_ID", "email.welcome_template_id"),
    ("EMAILJS_PUBLIC_KEY", "email.public_key"),
    ("EMAILJS_PRIVATE_KEY", "email.private_key"),
    ("TO_EMAIL", "email.to_email"),
];

/// Runtime environment, either `Dev` for local development, or `Prod` for release
#[derive(Debug)]
pub enum Runtime {
    Dev,
    Prod,
}

impl Runtime {
    pub fn as_str(&self) -> &str {
        match self {
            Runtime::Dev => "dev",
            Runtime::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => anyhow::bail!("{} is not a valid runtime environment", other),
        }
    }
}

/// Application settings wrapper
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email: EmailSettings,
}

impl Settings {
    /// Load application settings from the settings directory
    pub fn load() -> anyhow::Result<Self> {
        // Get the path to the settings directory
        let path = env::current_dir()?.join("settings");
        // Get the current environment based on the `APP_ENV` environment variable, default to `Dev`
        let runtime: Runtime = env::var("APP_ENV")
            .unwrap_or_else(|_| "dev".into())
            .try_into()?;

        Self::load_from(runtime, &path)
    }

    /// Load application settings from a specified path and runtime
    pub fn load_from(runtime: Runtime, base_path: &Path) -> anyhow::Result<Self> {
        let builder = Config::builder()
            // Include the base settings
            .add_source(File::from(base_path.join("base")).required(true))
            // Include the runtime settings
            .add_source(File::from(base_path.join(runtime.as_str())).required(true))
            // Override/include any settings from environment variables
            // NOTE: Should be used for any prod secrets. Takes the form `APP_<settings category>__<setting name>`.
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            );

        with_env_overrides(builder, |name| env::var(name).ok())?
            .build()?
            .try_deserialize()
            .context("Failed to load/deserialize settings")
    }
}

/// Apply the plain environment variable overrides, looked up through `lookup`
fn with_env_overrides<F>(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: F,
) -> anyhow::Result<ConfigBuilder<DefaultState>>
where
    F: Fn(&str) -> Option<String>,
{
    for (name, key) in ENV_OVERRIDES {
        builder = builder
            .set_override_option(*key, lookup(name))
            .with_context(|| format!("Failed to apply {} override", name))?;
    }
    Ok(builder)
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,

    landing_page: PathBuf,
}

impl ApplicationSettings {
    /// The application address to bind to
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
    /// The static page served at the root path
    pub fn landing_page(&self) -> &Path {
        &self.landing_page
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    path: PathBuf,
}

impl DatabaseSettings {
    /// The location of the SQLite database file
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// The database connection options, creating the file if it is missing
    pub fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailSettings {
    api_base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    api_timeout_milliseconds: u64,

    service_id: Option<String>,
    template_id: Option<String>,
    welcome_template_id: Option<String>,
    public_key: Option<String>,
    private_key: Option<Secret<String>>,
    to_email: Option<String>,
}

impl EmailSettings {
    /// The email REST API timeout duration
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_milliseconds)
    }
    /// The base URL for the email REST service
    pub fn api_base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.api_base_url).context("Failed to parse email base URL")
    }
    /// The REST client for the email provider
    pub fn client(&self) -> anyhow::Result<EmailClient> {
        EmailClient::new(self.api_base_url()?, self.api_timeout())
    }
    /// The provider identifiers and keys, any of which may be unset
    pub fn notifier_config(&self) -> NotifierConfig {
        NotifierConfig {
            service_id: self.service_id.clone(),
            template_id: self.template_id.clone(),
            welcome_template_id: self.welcome_template_id.clone(),
            public_key: self.public_key.clone(),
            private_key: self.private_key.clone(),
            to_email: self.to_email.clone(),
        }
    }
}
