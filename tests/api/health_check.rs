use reqwest::StatusCode;

use sqlx::SqlitePool;

use contact_desk::notifier::NotifierConfig;

use crate::helpers::{test_notifier_config, TestApp};

#[sqlx::test]
async fn is_present(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app.health_check().await.expect("Failed to execute request");

    assert!(res.status().is_success());

    let body: serde_json::Value = res.json().await.expect("Failed to parse body");
    assert_eq!(
        serde_json::json!({
            "status": "OK",
            "database": "Connected",
            "email": "Configured",
            "missingConfig": [],
        }),
        body
    );

    Ok(())
}

#[sqlx::test]
async fn reports_missing_email_settings(pool: SqlitePool) -> sqlx::Result<()> {
    let config = NotifierConfig {
        service_id: None,
        private_key: None,
        ..test_notifier_config()
    };
    let app = TestApp::spawn_with(&pool, config).await;

    let res = app.health_check().await.expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());

    let body: serde_json::Value = res.json().await.expect("Failed to parse body");
    assert_eq!("Not configured", body["email"]);
    assert_eq!(
        serde_json::json!(["EMAILJS_SERVICE_ID", "EMAILJS_PRIVATE_KEY"]),
        body["missingConfig"]
    );

    Ok(())
}

#[sqlx::test]
async fn reports_unreachable_database(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    pool.close().await;

    let res = app.health_check().await.expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());

    let body: serde_json::Value = res.json().await.expect("Failed to parse body");
    assert_eq!("Disconnected", body["database"]);

    Ok(())
}

#[sqlx::test]
async fn landing_page_is_served(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app.landing_page().await.expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());

    let content_type = res
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = res.text().await.expect("Failed to read body");
    assert!(body.contains("<form"));

    Ok(())
}
