use std::fmt;
use std::time::Duration;

use anyhow::Context;

use reqwest::Client;

use serde::Serialize;

use secrecy::Secret;

use url::Url;

const SEND_EMAIL_PATH: &str = "api/v1.0/email/send";

/// REST client for the EmailJS template-send API
#[derive(Debug)]
pub struct EmailClient {
    client: Client,
    api_send_email_url: Url,
}

impl EmailClient {
    pub fn new(api_base_url: Url, api_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        let api_send_email_url = api_base_url
            .join(SEND_EMAIL_PATH)
            .context("Failed to create send email endpoint URL")?;

        Ok(Self {
            client,
            api_send_email_url,
        })
    }

    /// Render and deliver a template, returning the provider's reply text
    #[tracing::instrument(
        name = "Send an email via API",
        skip(self, email),
        fields(template_id = %email.template_id)
    )]
    pub async fn send<P>(&self, email: &Email<'_, P>) -> Result<String, SendEmailError>
    where
        P: Serialize + fmt::Debug,
    {
        let body = email.as_request();

        let res = self
            .client
            .post(self.api_send_email_url.clone())
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;

        if status.is_success() {
            Ok(text)
        } else {
            Err(SendEmailError::Rejected {
                status: status.as_u16(),
                text,
            })
        }
    }
}

/// A template email addressed through the provider account
#[derive(Debug)]
pub struct Email<'a, P> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub public_key: &'a str,
    pub private_key: &'a Secret<String>,
    pub template_params: P,
}

impl<P: Serialize> Email<'_, P> {
    fn as_request(&self) -> SendEmailRequest<'_, P> {
        use secrecy::ExposeSecret;

        SendEmailRequest {
            service_id: self.service_id,
            template_id: self.template_id,
            user_id: self.public_key,
            access_token: self.private_key.expose_secret(),
            template_params: &self.template_params,
        }
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a, P> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken")]
    access_token: &'a str,
    template_params: &'a P,
}

/// Failures while handing an email to the provider
#[derive(Debug, thiserror::Error)]
pub enum SendEmailError {
    #[error("Email provider rejected the request with status {status}: {text}")]
    Rejected { status: u16, text: String },

    #[error("Failed to reach the email provider: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SendEmailError {
    /// The explanation given by the provider or the transport, if there is one
    pub fn provider_message(&self) -> Option<String> {
        match self {
            Self::Rejected { text, .. } if text.trim().is_empty() => None,
            Self::Rejected { text, .. } => Some(text.clone()),
            Self::Transport(e) => Some(e.to_string()),
        }
    }

    /// Raw fault description in the provider's `{status, text}` shape
    pub fn details(&self) -> serde_json::Value {
        match self {
            Self::Rejected { status, text } => serde_json::json!({
                "status": status,
                "text": text,
            }),
            Self::Transport(e) => serde_json::json!({
                "status": e.status().map(|s| s.as_u16()),
                "text": e.to_string(),
            }),
        }
    }
}
