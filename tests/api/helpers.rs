use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, Method, Response};

use secrecy::Secret;

use serde::Serialize;

use sqlx::SqlitePool;

use url::Url;

use wiremock::MockServer;

use contact_desk::app::{self, LandingPage};
use contact_desk::client::EmailClient;
use contact_desk::model::NotificationLog;
use contact_desk::notifier::{Notifier, NotifierConfig};
use contact_desk::repo::{ContactStore, NotificationLogRepo};

pub const CONTACT_TEMPLATE: &str = "template_contact";
pub const WELCOME_TEMPLATE: &str = "template_welcome";

#[derive(Debug, Default, Serialize)]
pub struct ContactBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ContactBody {
    pub fn valid() -> Self {
        Self {
            name: Some("Test Contact".into()),
            email: Some("test@test.com".into()),
            company: None,
            phone: None,
            message: Some("I would like a demo".into()),
        }
    }
}

pub fn test_notifier_config() -> NotifierConfig {
    NotifierConfig {
        service_id: Some("service_test".into()),
        template_id: Some(CONTACT_TEMPLATE.into()),
        welcome_template_id: Some(WELCOME_TEMPLATE.into()),
        public_key: Some("public_test".into()),
        private_key: Some(Secret::new("private_test".into())),
        to_email: Some("owner@test.com".into()),
    }
}

pub struct TestApp {
    addr: String,

    pub client: Client,
    pub email_server: MockServer,
}

impl TestApp {
    pub async fn spawn(pool: &SqlitePool) -> Self {
        Self::spawn_with(pool, test_notifier_config()).await
    }

    pub async fn spawn_with(pool: &SqlitePool, notifier_config: NotifierConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();

        let addr = format!("http://127.0.0.1:{}", port);

        let store = ContactStore::initialize(pool.clone())
            .await
            .expect("Failed to initialize contact store");

        let email_server = MockServer::start().await;

        let notifier = {
            let api_base_url =
                Url::parse(&email_server.uri()).expect("Failed to parse mock server uri");
            let api_timeout = Duration::from_secs(2);

            let client =
                EmailClient::new(api_base_url, api_timeout).expect("Failed to create email client");
            Notifier::new(client, notifier_config)
        };

        let landing = LandingPage(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static/index.html"));

        let server =
            app::run(listener, store, notifier, landing).expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        let client = Client::new();

        Self {
            addr,
            client,
            email_server,
        }
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "health").send().await
    }

    pub async fn landing_page(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "").send().await
    }

    pub async fn contact_submit(&self, body: &ContactBody) -> reqwest::Result<Response> {
        self.request(Method::POST, "contact").json(body).send().await
    }

    pub async fn contact_submit_form(&self, body: &ContactBody) -> reqwest::Result<Response> {
        self.request(Method::POST, "contact").form(body).send().await
    }

    pub async fn contacts_list(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "contacts").send().await
    }

    pub async fn contact_fetch(&self, id: &str) -> reqwest::Result<Response> {
        self.request(Method::GET, &format!("contacts/{}", id))
            .send()
            .await
    }

    pub async fn send_email(&self, body: &ContactBody) -> reqwest::Result<Response> {
        self.request(Method::POST, "send-email")
            .json(body)
            .send()
            .await
    }
}

pub async fn contact_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("select count(*) from contacts")
        .fetch_one(pool)
        .await
        .expect("Failed to count contacts")
}

pub async fn log_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("select count(*) from notification_logs")
        .fetch_one(pool)
        .await
        .expect("Failed to count notification logs")
}

pub async fn logs_for(pool: &SqlitePool, contact_id: i64) -> Vec<NotificationLog> {
    NotificationLogRepo::fetch_all_by_contact_id(pool, contact_id)
        .await
        .expect("Failed to fetch notification logs")
}
