use std::fmt;

use secrecy::{ExposeSecret, Secret};

use serde::Serialize;

use crate::client::{Email, EmailClient, SendEmailError};
use crate::model::{NewContact, NotificationStatus};

// Names reported for unset settings, matching the environment variables that set them
const SERVICE_ID: &str = "EMAILJS_SERVICE_ID";
const TEMPLATE_ID: &str = "EMAILJS_TEMPLATE_ID";
const PUBLIC_KEY: &str = "EMAILJS_PUBLIC_KEY";
const PRIVATE_KEY: &str = "EMAILJS_PRIVATE_KEY";
const TO_EMAIL: &str = "TO_EMAIL";

const CONTACT_REQUIRED: &[&str] = &[SERVICE_ID, TEMPLATE_ID, PUBLIC_KEY, PRIVATE_KEY, TO_EMAIL];
const WELCOME_REQUIRED: &[&str] = &[SERVICE_ID, TEMPLATE_ID, PUBLIC_KEY, PRIVATE_KEY];

const COMPANY_FALLBACK: &str = "Not specified";
const PHONE_FALLBACK: &str = "Not provided";

const WELCOME_SENDER_NAME: &str = "Logistics AI Platform";
const WELCOME_MESSAGE: &str = "Thank you for your interest in our Logistics AI Platform. \
We have received your inquiry and will get back to you within 24 hours.";

/// Provider identifiers and keys. Every field may be unset; an empty value counts as unset.
#[derive(Debug, Clone, Default)]
pub struct NotifierConfig {
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    /// Falls back to `template_id` when unset
    pub welcome_template_id: Option<String>,
    pub public_key: Option<String>,
    pub private_key: Option<Secret<String>>,
    /// Owner address that receives contact notifications
    pub to_email: Option<String>,
}

impl NotifierConfig {
    fn service_id(&self) -> Option<&str> {
        non_empty(&self.service_id)
    }

    fn template_id(&self) -> Option<&str> {
        non_empty(&self.template_id)
    }

    fn welcome_template_id(&self) -> Option<&str> {
        non_empty(&self.welcome_template_id).or_else(|| self.template_id())
    }

    fn public_key(&self) -> Option<&str> {
        non_empty(&self.public_key)
    }

    fn private_key(&self) -> Option<&Secret<String>> {
        self.private_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
    }

    fn to_email(&self) -> Option<&str> {
        non_empty(&self.to_email)
    }

    /// Names of the unset required settings, in a fixed order
    fn missing(&self) -> Vec<&'static str> {
        [
            (SERVICE_ID, self.service_id().is_some()),
            (TEMPLATE_ID, self.template_id().is_some()),
            (PUBLIC_KEY, self.public_key().is_some()),
            (PRIVATE_KEY, self.private_key().is_some()),
            (TO_EMAIL, self.to_email().is_some()),
        ]
        .into_iter()
        .filter_map(|(name, is_set)| (!is_set).then_some(name))
        .collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Result of `Notifier::validate_configuration`
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationStatus {
    pub is_valid: bool,
    pub missing: Vec<&'static str>,
}

/// Normalized result of a single send. Provider faults never escape the notifier,
/// they are reported as a `Failure` value instead.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationOutcome {
    Success {
        message_id: String,
        message: String,
    },
    Failure {
        error: String,
        details: serde_json::Value,
    },
}

impl NotificationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The log status matching this outcome
    pub fn status(&self) -> NotificationStatus {
        match self {
            Self::Success { .. } => NotificationStatus::Sent,
            Self::Failure { .. } => NotificationStatus::Failed,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }
}

/// Why a send could not be completed
#[derive(Debug, thiserror::Error)]
enum DeliveryError {
    #[error("Email service is not configured")]
    NotConfigured(Vec<&'static str>),

    #[error(transparent)]
    Provider(#[from] SendEmailError),
}

impl DeliveryError {
    fn into_outcome(self, fallback_error: &str) -> NotificationOutcome {
        match self {
            Self::NotConfigured(missing) => NotificationOutcome::Failure {
                error: not_configured_message(&missing),
                details: serde_json::json!({ "missing": missing }),
            },
            Self::Provider(e) => NotificationOutcome::Failure {
                error: e
                    .provider_message()
                    .unwrap_or_else(|| fallback_error.to_string()),
                details: e.details(),
            },
        }
    }
}

fn not_configured_message(missing: &[&str]) -> String {
    format!("Email service is not configured, missing {}", missing.join(", "))
}

#[derive(Debug, Serialize)]
struct ContactEmailParams<'a> {
    from_name: &'a str,
    from_email: &'a str,
    company: &'a str,
    phone: &'a str,
    message: &'a str,
    to_email: &'a str,
    reply_to: &'a str,
}

#[derive(Debug, Serialize)]
struct WelcomeEmailParams<'a> {
    to_name: &'a str,
    to_email: &'a str,
    from_name: &'a str,
    message: &'a str,
}

/// Sends the transactional emails for contact submissions through the provider
#[derive(Debug)]
pub struct Notifier {
    client: EmailClient,
    config: NotifierConfig,
}

impl Notifier {
    pub fn new(client: EmailClient, config: NotifierConfig) -> Self {
        Self { client, config }
    }

    /// Report which required settings are unset. Reads configuration only.
    pub fn validate_configuration(&self) -> ConfigurationStatus {
        let missing = self.config.missing();
        ConfigurationStatus {
            is_valid: missing.is_empty(),
            missing,
        }
    }

    /// Notify the owner about a new contact submission
    #[tracing::instrument(name = "Send contact notification", skip(self, contact))]
    pub async fn send_contact_email(&self, contact: &NewContact) -> NotificationOutcome {
        let email = contact.email.as_ref();
        let params = ContactEmailParams {
            from_name: contact.name.as_ref(),
            from_email: email,
            company: contact.company.as_deref().unwrap_or(COMPANY_FALLBACK),
            phone: contact.phone.as_deref().unwrap_or(PHONE_FALLBACK),
            message: contact.message.as_ref(),
            to_email: self.config.to_email().unwrap_or_default(),
            reply_to: email,
        };

        match self
            .deliver(self.config.template_id(), params, CONTACT_REQUIRED)
            .await
        {
            Ok(message_id) => NotificationOutcome::Success {
                message_id,
                message: "Email sent successfully".into(),
            },
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, "Failed to send contact notification");
                e.into_outcome("Failed to send email")
            }
        }
    }

    /// Greet the submitter of a contact form
    #[tracing::instrument(name = "Send welcome email", skip(self, contact))]
    pub async fn send_welcome_email(&self, contact: &NewContact) -> NotificationOutcome {
        let params = WelcomeEmailParams {
            to_name: contact.name.as_ref(),
            to_email: contact.email.as_ref(),
            from_name: WELCOME_SENDER_NAME,
            message: WELCOME_MESSAGE,
        };

        match self
            .deliver(self.config.welcome_template_id(), params, WELCOME_REQUIRED)
            .await
        {
            Ok(message_id) => NotificationOutcome::Success {
                message_id,
                message: "Welcome email sent successfully".into(),
            },
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, "Failed to send welcome email");
                e.into_outcome("Failed to send welcome email")
            }
        }
    }

    async fn deliver<P>(
        &self,
        template_id: Option<&str>,
        template_params: P,
        required: &[&str],
    ) -> Result<String, DeliveryError>
    where
        P: Serialize + fmt::Debug,
    {
        let missing: Vec<&'static str> = self
            .config
            .missing()
            .into_iter()
            .filter(|name| required.contains(name))
            .collect();

        let (Some(service_id), Some(template_id), Some(public_key), Some(private_key), true) = (
            self.config.service_id(),
            template_id,
            self.config.public_key(),
            self.config.private_key(),
            missing.is_empty(),
        ) else {
            return Err(DeliveryError::NotConfigured(missing));
        };

        let email = Email {
            service_id,
            template_id,
            public_key,
            private_key,
            template_params,
        };

        Ok(self.client.send(&email).await?)
    }
}
